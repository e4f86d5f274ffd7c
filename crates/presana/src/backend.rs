use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TransportError;
use crate::metadata::ModelKind;
use crate::network::{NetworkResponse, NetworkSnapshot};

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parameters of one route computation. Built fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub start: String,
    pub dest: String,
    pub model: ModelKind,
}

/// Best route found by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRoute {
    pub path: Vec<String>,
    pub cost: f64,
}

/// Outcome of a route computation. Exactly one variant per response.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Success { logs: Vec<String>, best: BestRoute },
    Unreachable { logs: Vec<String> },
    Failure { error: String },
}

impl RunResult {
    #[cfg(test)]
    pub fn logs(&self) -> &[String] {
        match self {
            Self::Success { logs, .. } | Self::Unreachable { logs } => logs,
            Self::Failure { .. } => &[],
        }
    }
}

#[derive(Debug, Serialize)]
struct RunRequestBody<'a> {
    start: &'a str,
    dest: &'a str,
    model_type: &'a str,
}

/// Body of `POST /api/run`, before dispatch on shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub best: Option<BestRoute>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<RunResponse> for RunResult {
    /// `error` takes precedence, then `best`; anything else is unreachable.
    fn from(response: RunResponse) -> Self {
        match (response.error, response.best) {
            (Some(error), _) => Self::Failure { error },
            (None, Some(best)) => Self::Success {
                logs: response.logs,
                best,
            },
            (None, None) => Self::Unreachable {
                logs: response.logs,
            },
        }
    }
}

/// The remote route-search service.
pub trait Backend {
    fn fetch_network(&self) -> Result<NetworkSnapshot, TransportError>;

    fn run_route(&self, request: &RunRequest) -> Result<RunResult, TransportError>;

    fn randomize(&self) -> Result<(), TransportError>;
}

/// [`Backend`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn request_error(url: &str, source: ureq::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        source: Box::new(source),
    }
}

fn decode_error(url: &str, source: ureq::Error) -> TransportError {
    TransportError::Decode {
        url: url.to_string(),
        source: Box::new(source),
    }
}

impl Backend for HttpBackend {
    fn fetch_network(&self) -> Result<NetworkSnapshot, TransportError> {
        let url = self.endpoint("/api/network");
        debug!(%url, "fetching network");
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| request_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let decoded: NetworkResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| decode_error(&url, e))?;
        let snapshot = NetworkSnapshot::from(decoded);
        info!(edges = snapshot.edges.len(), "network fetched");
        Ok(snapshot)
    }

    fn run_route(&self, request: &RunRequest) -> Result<RunResult, TransportError> {
        let url = self.endpoint("/api/run");
        let body = RunRequestBody {
            start: &request.start,
            dest: &request.dest,
            model_type: request.model.id(),
        };
        debug!(%url, start = %request.start, dest = %request.dest, model = request.model.id(), "requesting route");
        let mut response = self
            .agent
            .post(&url)
            .send_json(&body)
            .map_err(|e| request_error(&url, e))?;
        let status = response.status();

        // A rejected request still carries a well-formed `{"error": ...}` body.
        match response.body_mut().read_json::<RunResponse>() {
            Ok(decoded) if status.is_success() || decoded.error.is_some() => Ok(decoded.into()),
            Ok(_) => Err(TransportError::Status {
                url,
                status: status.as_u16(),
            }),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                url,
                status: status.as_u16(),
            }),
            Err(e) => Err(decode_error(&url, e)),
        }
    }

    fn randomize(&self) -> Result<(), TransportError> {
        let url = self.endpoint("/api/randomize");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| request_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }
        info!("network randomized");
        Ok(())
    }
}
