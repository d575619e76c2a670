//! Workspace Errors
//!
//! Failures the active-workspace subsystem handles internally.
//! None of these are surfaced to collaborators; they are logged and degraded.

use serde::{Deserialize, Serialize};

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkspaceError {
    /// The workspace list could not be fetched or decoded
    ListFetch(String),
    /// An update arrived for a torn-down or superseded observation
    StaleContext(String),
    /// Invalid console configuration
    Config(String),
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceError::ListFetch(msg) => write!(f, "Workspace list fetch failed: {}", msg),
            WorkspaceError::StaleContext(msg) => write!(f, "Stale context update: {}", msg),
            WorkspaceError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for WorkspaceError {}
