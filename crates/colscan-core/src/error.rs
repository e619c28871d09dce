use thiserror::Error;

/// Canonical result for the core value/segment model.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds raised by colscan-core and, by convention, by the
/// `colscan-stats`/`colscan-scan` crates built on top of it.
///
/// Per the scan/statistics contract: out-of-range literals, null
/// comparisons and unsupported predicates are never errors — they are
/// values of the result (empty matches, "cannot prune", etc). Only
/// programmer errors and broken invariants raise.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller passed malformed input: unsorted data into a range filter
    /// builder, a non-positive bin/range count, and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A predicate condition recognized by the vocabulary but not
    /// implemented by the statistic/scan path that was asked about it.
    /// Never actually raised in practice (unsupported predicates answer
    /// "cannot prune" instead); the variant exists so callers have
    /// somewhere to route it if that contract ever changes.
    #[error("unsupported predicate: {0}")]
    Unsupported(String),

    /// An internal invariant was violated (e.g. a dictionary segment
    /// whose `dictionary` is not strictly ascending, or a literal whose
    /// element kind does not match the column it is compared against).
    /// These indicate a bug in the producer of the segment/predicate,
    /// not bad input from an end user.
    #[error("internal invariant failed: {0}")]
    Fatal(String),

    /// Error with an attached context chain, for surfacing where in a
    /// scan/orchestration pipeline a lower-level error occurred.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wrap `self` with a short description of what was being attempted.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Type mismatch between a predicate literal and a column's element
    /// kind is a programmer error, always fatal.
    pub fn kind_mismatch(
        expected: crate::value::ElementKind,
        found: crate::value::ElementKind,
    ) -> Self {
        Error::Fatal(format!(
            "literal element kind {found:?} does not match column element kind {expected:?}"
        ))
    }

    /// Caller-facing hints for common mistakes, attached per-variant
    /// rather than one generic "check your input" message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::InvalidArgument(msg) if msg.contains("sorted") => {
                vec!["range filters are built from distinct values in ascending order; sort the input first".into()]
            }
            Error::InvalidArgument(msg) if msg.contains("max_ranges") || msg.contains("bin") => {
                vec!["range/bin counts must be at least 1".into()]
            }
            Error::Fatal(msg) if msg.contains("element kind") => {
                vec!["check that the predicate literal was built with the same Value variant as the column".into()]
            }
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidArgument(e.to_string())
    }
}
