//! Buffer splitting, format detection, and the field-source seam.
//!
//! A report buffer is `metadata-line "\n" body`. The body arrives in one of
//! two encodings: modern JSON or the legacy labeled-section text. Format
//! detection and per-field extraction both live here; everything downstream
//! talks to the [`FieldSource`] trait and never branches on encoding again.

pub mod json;
pub mod legacy;

use serde_json::Value;

use crate::error::ReportError;
use crate::model::{Frame, Metadata, Register};

pub use json::JsonFields;
pub use legacy::LegacyFields;

/// Split a raw buffer into parsed metadata and the body text.
///
/// The first line (up to the first newline) must decode as a JSON object
/// carrying at least `bug_type`; anything after the newline is the body.
/// A buffer with no newline is accepted with an empty body.
pub fn split_metadata(buf: &str) -> Result<(Metadata, &str), ReportError> {
    let (header, body) = match buf.split_once('\n') {
        Some((header, body)) => (header, body),
        None => (buf, ""),
    };

    let value: Value = serde_json::from_str(header)
        .map_err(|e| ReportError::MalformedInput(format!("first line is not valid JSON: {e}")))?;

    let map = value
        .as_object()
        .ok_or_else(|| ReportError::MalformedInput("first line is not a JSON object".into()))?;

    // bug_type appears as a string in practice, but tolerate a bare number.
    let bug_type = match map.get("bug_type") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(ReportError::MalformedInput(format!(
                "bug_type has unsupported type: {other}"
            )))
        }
        None => return Err(ReportError::MalformedInput("first line lacks bug_type".into())),
    };

    let opt_string = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    let metadata = Metadata {
        bug_type,
        incident_id: opt_string("incident_id"),
        timestamp: opt_string("timestamp"),
        name: opt_string("name"),
    };

    Ok((metadata, body))
}

/// Body text tagged with its detected encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Body decoded as a JSON value. Any body that parses as valid JSON is
    /// treated as modern format, whether or not it resembles a crash
    /// structure.
    Json(Value),
    /// Body kept as raw text; the legacy labeled-section encoding.
    Legacy(String),
}

impl Body {
    /// Best-effort format detection: try the JSON decode, fall back to
    /// legacy text. Decode failure is the expected legacy signal, not an
    /// error, so detection is total.
    pub fn detect(body: &str) -> Body {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Legacy(body.to_string()),
        }
    }

    /// Build the matching field source for this body.
    pub fn into_fields(self) -> Box<dyn FieldSource> {
        match self {
            Body::Json(value) => Box::new(JsonFields::new(value)),
            Body::Legacy(text) => Box::new(LegacyFields::new(text)),
        }
    }
}

/// Per-field extraction over one body encoding.
///
/// One implementation per encoding, selected once at report construction.
/// Fallible accessors fail only when the source offers no usable value at
/// all; optional sections map to `None` instead.
pub trait FieldSource {
    /// Index of the thread whose state is reported as the incident cause.
    fn faulting_thread(&self) -> Result<usize, ReportError>;

    /// Stack frames of the faulting thread, in call order.
    fn frames(&self) -> Result<Vec<Frame>, ReportError>;

    /// Thread-state registers in source order.
    fn registers(&self) -> Result<Vec<Register>, ReportError>;

    fn exception_type(&self) -> Option<String>;

    fn exception_subtype(&self) -> Option<String>;

    fn application_specific_information(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_requires_json_object_header() {
        let err = split_metadata("Triggered by Thread: 7\nbody").unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(_)));

        let err = split_metadata("[1, 2]\nbody").unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(_)));
    }

    #[test]
    fn split_requires_bug_type() {
        let err = split_metadata("{\"incident_id\": \"X\"}\nbody").unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(_)));
    }

    #[test]
    fn split_accepts_numeric_bug_type() {
        let (meta, body) = split_metadata("{\"bug_type\": 109}\nrest").unwrap();
        assert_eq!(meta.bug_type, "109");
        assert_eq!(body, "rest");
    }

    #[test]
    fn split_without_newline_yields_empty_body() {
        let (meta, body) = split_metadata("{\"bug_type\": \"109\"}").unwrap();
        assert_eq!(meta.bug_type, "109");
        assert_eq!(body, "");
    }

    #[test]
    fn detection_is_total() {
        assert!(matches!(Body::detect("{\"faultingThread\": 0}"), Body::Json(_)));
        // Valid JSON that is not a crash structure still counts as JSON.
        assert!(matches!(Body::detect("null"), Body::Json(_)));
        assert!(matches!(Body::detect("Exception Type: EXC_CRASH"), Body::Legacy(_)));
        // Trailing garbage after a JSON value makes the whole body legacy.
        assert!(matches!(Body::detect("{} trailing"), Body::Legacy(_)));
    }
}
