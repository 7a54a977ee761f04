//! crashlog-core
//!
//! Core library for parsing Apple crash/panic report (`.ips`) files.
//!
//! An `.ips` file is a JSON metadata line followed by a body in one of two
//! encodings: the legacy labeled-section text or the modern nested JSON
//! structure. This crate splits the two layers apart, detects the body
//! encoding, classifies the report by its bug-type code, and exposes a
//! uniform accessor surface (faulting thread, frames, registers, exception
//! info) plus a plain-text renderer.
//!
//! The goal is to keep all substantive logic here so it is fully testable
//! and reusable from multiple frontends (CLI, batch tooling, etc.).

pub mod error;
pub mod model;
pub mod panic;
pub mod parse;
pub mod render;
pub mod report;

pub use error::ReportError;
pub use model::{BugType, Frame, Metadata, Register, ReportKind};
pub use render::render;
pub use report::{CrashReport, ReportSummary};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
