//! Normalized data model for crash reports.
//!
//! Everything in here is format-agnostic: both the legacy text parser and
//! the modern JSON parser produce these types, so downstream code (rendering,
//! the CLI `--json` path) never cares which encoding a report arrived in.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Report header parsed from the first line of an `.ips` file.
///
/// The first line is a small JSON object; `bug_type` is the only key we
/// require. Parsed once at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Raw bug-type code (e.g. `"109"`). Kept verbatim so unrecognized
    /// codes survive a round trip through the model.
    pub bug_type: String,
    pub incident_id: Option<String>,
    /// Raw timestamp string as it appears in the header, e.g.
    /// `2021-10-22 00:14:53.00 +0300`. See [`Metadata::timestamp_parsed`].
    pub timestamp: Option<String>,
    /// Process or device name attached by the reporter.
    pub name: Option<String>,
}

impl Metadata {
    /// Parse the header timestamp into a [`NaiveDateTime`].
    ///
    /// The trailing `[+-]HHMM` offset is dropped: the wall-clock reading is
    /// returned as written, since the device-local time is what matters for
    /// triage.
    pub fn timestamp_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        chrono::DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %z")
            .map(|dt| dt.naive_local())
            .ok()
    }
}

/// Recognized bug-type codes.
///
/// The code-to-variant table is shipped statically with the crate rather
/// than read from the host OS submission config. Unrecognized codes are a
/// valid state, modeled as `BugType::from_code` returning `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BugType {
    /// Ordinary user-mode crash dump (legacy reporter).
    Crash109,
    /// Ordinary user-mode crash dump (modern reporter).
    Crash309,
    /// EXC_RESOURCE crash.
    ExcResource327,
    /// EXC_RESOURCE crash.
    ExcResource385,
    /// Full kernel panic.
    FullPanic,
    /// Kernel-initiated force reset.
    ForceReset,
}

/// Semantic category a bug type maps to; drives report classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    /// User-mode crash dump: exception info, registers, and frames apply.
    CrashDump,
    /// Kernel panic / force reset: handled by the panic delegate.
    KernelPanic,
    /// Anything else: metadata passthrough only.
    Other,
}

impl BugType {
    /// Look up a raw code. Pure table lookup; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<BugType> {
        match code {
            "109" => Some(BugType::Crash109),
            "309" => Some(BugType::Crash309),
            "327" => Some(BugType::ExcResource327),
            "385" => Some(BugType::ExcResource385),
            "110" => Some(BugType::FullPanic),
            "210" => Some(BugType::ForceReset),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            BugType::Crash109 => "109",
            BugType::Crash309 => "309",
            BugType::ExcResource327 => "327",
            BugType::ExcResource385 => "385",
            BugType::FullPanic => "110",
            BugType::ForceReset => "210",
        }
    }

    pub fn kind(self) -> ReportKind {
        match self {
            BugType::Crash109
            | BugType::Crash309
            | BugType::ExcResource327
            | BugType::ExcResource385 => ReportKind::CrashDump,
            BugType::FullPanic | BugType::ForceReset => ReportKind::KernelPanic,
        }
    }
}

/// Classify a raw code, including the unrecognized-passthrough case.
pub fn kind_of_code(code: &str) -> ReportKind {
    BugType::from_code(code).map_or(ReportKind::Other, BugType::kind)
}

/// One stack-trace entry of the faulting thread.
///
/// Addressing comes in two shapes depending on symbolication: symbolicated
/// frames carry `symbol` + `symbol_offset`, raw frames carry `image_base` +
/// `image_offset`. Modern JSON reports may carry both; the binary-image
/// header case may have neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub image_name: Option<String>,
    pub image_base: Option<u64>,
    pub image_offset: Option<u64>,
    pub symbol: Option<String>,
    pub symbol_offset: Option<u64>,
}

/// One thread-state register. Order within a report is significant and
/// mirrors the source: general-purpose registers first, then the named
/// special registers in their declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Register {
    pub name: String,
    pub value: u64,
}
