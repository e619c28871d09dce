//! Scan-level errors, kept distinct from `colscan_core::error::Error`:
//! a scan failure is reported with scan-specific context (which column,
//! which predicate) even though most of it wraps a core error underneath.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("predicate error: {0}")]
    Predicate(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("scan was cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] colscan_core::error::Error),
}

impl ScanError {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            ScanError::Predicate(msg) => ScanError::Predicate(format!("{ctx}: {msg}")),
            ScanError::Exec(msg) => ScanError::Exec(format!("{ctx}: {msg}")),
            other => other,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        false
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ScanError::Predicate(msg) if msg.contains("kind") => vec![
                "Check that the literal's element kind matches the column's".into(),
            ],
            ScanError::Cancelled => vec!["The caller's cancellation token was set; re-issue the scan if needed".into()],
            _ => vec![],
        }
    }
}
