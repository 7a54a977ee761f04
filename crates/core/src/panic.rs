//! Seam for the kernel-panic parsing collaborator.
//!
//! Kernel-mode reports (full panic, force reset) are the territory of a
//! dedicated panic parser. This module defines the contract a kernel-mode
//! report composes against, plus a minimal built-in implementation that
//! surfaces the panic string without interpreting it further.

use serde_json::Value;

/// Contract for a kernel-panic parser.
///
/// Implementations receive the report body at construction and expose a
/// classification code plus their own rendering. [`KernelModeReport`]
/// forwards to the delegate instead of inheriting from it.
///
/// [`KernelModeReport`]: crate::report::KernelModeReport
pub trait PanicLog {
    /// Bug-type code this log was classified under.
    fn bug_type(&self) -> &str;

    /// Human-readable description of the panic.
    fn describe(&self) -> String;
}

/// Built-in panic log that carries the body verbatim.
///
/// For a JSON body the top-level `panicString` is surfaced when present;
/// a legacy body is passed through as-is.
#[derive(Debug, Clone)]
pub struct RawPanicLog {
    bug_type: String,
    description: String,
}

impl RawPanicLog {
    pub fn new(bug_type: impl Into<String>, body: &str) -> Self {
        let description = match serde_json::from_str::<Value>(body) {
            Ok(value) => value
                .get("panicString")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.trim().to_string()),
            Err(_) => body.trim().to_string(),
        };
        Self { bug_type: bug_type.into(), description }
    }
}

impl PanicLog for RawPanicLog {
    fn bug_type(&self) -> &str {
        &self.bug_type
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
