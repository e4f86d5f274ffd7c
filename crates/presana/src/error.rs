use thiserror::Error;

/// Failure to obtain a usable response from the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("backend answered {url} with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("backend worker stopped: {0}")]
    Worker(String),
}

/// Why a run intent was refused before any request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunRejected {
    #[error("Start and Destination cannot be the same!")]
    SameEndpoints,

    #[error("A route search is already in progress.")]
    Busy,
}
