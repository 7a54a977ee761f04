use thiserror::Error;

/// Errors surfaced by report construction and field access.
///
/// `Clone` is deliberate: field accessors memoize their first result,
/// including failures, so re-accessing a broken field hands back the same
/// error instead of re-parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The first line of the buffer is not a JSON object with `bug_type`.
    #[error("malformed report header: {0}")]
    MalformedInput(String),

    /// A field with no sensible default is absent where required
    /// (e.g. `faultingThread` in a modern-format body).
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A legacy frame line does not match the
    /// `... <addr-or-symbol> + <offset>` shape. Hard error: continuing
    /// would silently misattribute fields.
    #[error("unexpected frame line shape: {0:?}")]
    FrameShape(String),

    /// Reading from an input handle failed. Carries the message only so
    /// the enum stays cloneable.
    #[error("failed to read report: {0}")]
    Read(String),
}

impl ReportError {
    pub fn missing(field: impl Into<String>) -> Self {
        ReportError::MissingField(field.into())
    }
}
