//! Error types for the scenario runner
//!
//! Only configuration and file-system problems surface as `Err`. Per-call
//! failures (no response, non-JSON body, missing test case) are recorded in
//! the result store instead, see [`CallFailure`].

use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenario runner
#[derive(Error, Debug)]
pub enum Error {
    // === Project Input Errors ===
    #[error("Required file not found: {path}. Check the [paths] section of apichain.toml")]
    ConfigNotFound { path: String },

    #[error("Invalid file '{path}': {reason}")]
    ConfigInvalid { path: String, reason: String },

    #[error("Scenario '{0}' has no entry in the test case file")]
    ScenarioNotFound(String),

    #[error("API '{0}' is referenced by the interaction graph but missing from the API registry")]
    UnknownApi(String),

    // === Tool Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Transport Errors ===
    #[error("HTTP client error: {0}")]
    Transport(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a not-found error for a project file
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an invalid-file error for a project file
    pub fn config_invalid(path: &Path, reason: impl fmt::Display) -> Self {
        Self::ConfigInvalid {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a single API call
///
/// These never abort a run. Their text becomes the `error` field of the
/// captured response, or the reason a step was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// Transport produced nothing (connection refused, DNS, timeout)
    NoResponse(String),
    /// Body could not be parsed as JSON; holds the HTTP reason phrase
    NonJsonResponse(String),
    /// No input values for this API at the current iteration
    MissingTestCase { api: String, iteration: usize },
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailure::NoResponse(_) => write!(f, "No response from server"),
            CallFailure::NonJsonResponse(reason) => write!(f, "{}", reason),
            CallFailure::MissingTestCase { api, iteration } => {
                write!(f, "No testcase #{} for {}", iteration + 1, api)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_failure_messages() {
        assert_eq!(
            CallFailure::NoResponse("connection refused".into()).to_string(),
            "No response from server"
        );
        assert_eq!(
            CallFailure::NonJsonResponse("Not Found".into()).to_string(),
            "Not Found"
        );
        assert_eq!(
            CallFailure::MissingTestCase {
                api: "Login".into(),
                iteration: 1
            }
            .to_string(),
            "No testcase #2 for Login"
        );
    }

    #[test]
    fn test_config_errors_name_the_file() {
        let err = Error::config_invalid(Path::new("configs/api_config.json"), "expected map");
        assert!(err.to_string().contains("configs/api_config.json"));
        assert!(err.to_string().contains("expected map"));
    }
}
