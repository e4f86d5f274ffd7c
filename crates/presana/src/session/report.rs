use std::fmt;

use crate::metadata::ModelKind;

pub const SESSION_HEADER_PREFIX: &str = "--- PreSaNa Session Started";
pub const SUCCESS_LINE: &str = "SUCCESS: Route optimized.";
pub const UNREACHABLE_LINE: &str = "ERROR: Goal unreachable.";
pub const SYSTEM_ERROR_LINE: &str = "SYSTEM ERROR: Could not reach the PreSaNa backend.";
pub const RANDOMIZED_LINE: &str = "PreSaNa data randomized. Previous state cleared.";
pub const UNREACHABLE_MESSAGE: &str = "No feasible route found. All paths are blocked.";
pub const PATH_SEPARATOR: &str = " \u{2794} ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Plain,
    Header,
    Success,
    Error,
    Placeholder,
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub tag: LogTag,
    pub text: String,
}

impl LogLine {
    pub fn new(tag: LogTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LogTag::Plain, text)
    }

    pub fn header(model: ModelKind) -> Self {
        Self::new(
            LogTag::Header,
            format!(
                "{SESSION_HEADER_PREFIX} (Model: {}) ---",
                model.id().to_uppercase()
            ),
        )
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LogTag::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogTag::Error, text)
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(LogTag::Placeholder, text)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Terminal summary panel of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Route {
        path: Vec<String>,
        cost: f64,
        model: ModelKind,
    },
    Unreachable,
}

impl Report {
    /// "A ➔ B ➔ C"
    pub fn path_label(&self) -> Option<String> {
        match self {
            Self::Route { path, .. } => Some(path.join(PATH_SEPARATOR)),
            Self::Unreachable => None,
        }
    }

    pub fn cost_label(&self) -> Option<String> {
        match self {
            Self::Route { cost, .. } => Some(cost.to_string()),
            Self::Unreachable => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Route { .. })
    }

    /// Report body as display lines.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Route { model, .. } => vec![
                "PreSaNa has concluded its search.".to_string(),
                format!(
                    "Optimal Route Found: {}",
                    self.path_label().unwrap_or_default()
                ),
                format!(
                    "Total Estimated Cost: {}",
                    self.cost_label().unwrap_or_default()
                ),
                format!(
                    "This route was selected using PreSaNa's {model} model. It balances \
                     distance, traffic congestion, and road quality to achieve the goal."
                ),
            ],
            Self::Unreachable => vec![UNREACHABLE_MESSAGE.to_string()],
        }
    }
}
