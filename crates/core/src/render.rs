//! Plain-text rendering of parsed reports.
//!
//! The renderer emits a metadata banner for every report; crash dumps add
//! exception info, a register dump, and the frame list, while kernel-mode
//! reports append the panic delegate's description. Output is deterministic:
//! rendering the same report twice is byte-identical. ANSI styling is left
//! to frontends.

use std::fmt::Write;

use crate::error::ReportError;
use crate::model::Frame;
use crate::report::{CrashReport, UserModeReport};

/// Placeholder for a frame with no resolvable address, e.g. the
/// binary-image header entry of a non-symbolicated dump.
const HEADER_PLACEHOLDER: &str = "_HEADER";

/// Render a report into its human-readable form.
///
/// Fails only when a crash dump is missing a field rendering depends on
/// (lazy accessors surface their errors here on first use).
pub fn render(report: &CrashReport) -> Result<String, ReportError> {
    let mut out = banner(report);

    match report {
        CrashReport::UserMode(r) => render_crash_dump(r, &mut out)?,
        CrashReport::KernelMode(r) => {
            let _ = writeln!(out, "{}", r.describe());
        }
        CrashReport::Generic(_) => {}
    }

    Ok(out)
}

fn banner(report: &CrashReport) -> String {
    let metadata = report.metadata();
    format!(
        "{} {}\n{}\n\n",
        metadata.incident_id.as_deref().unwrap_or(""),
        metadata.timestamp.as_deref().unwrap_or(""),
        report.filename(),
    )
}

fn render_crash_dump(report: &UserModeReport, out: &mut String) -> Result<(), ReportError> {
    let _ = writeln!(
        out,
        "Exception: {}",
        report.exception_type().map(String::as_str).unwrap_or("")
    );
    if let Some(subtype) = report.exception_subtype() {
        let _ = writeln!(out, "Exception Subtype: {subtype}");
    }
    if let Some(asi) = report.application_specific_information() {
        let _ = write!(out, "Application Specific Information: {asi}");
    }
    out.push('\n');

    out.push_str("Registers:");
    for (i, register) in report.registers()?.iter().enumerate() {
        if i % 4 == 0 {
            out.push('\n');
        }
        let entry = format!("{} = 0x{:016x} ", register.name, register.value);
        let _ = write!(out, "{entry:>30}");
    }
    out.push_str("\n\n");

    out.push_str("Frames:\n");
    for frame in report.frames()? {
        let _ = writeln!(out, "\t{}", frame_line(frame));
    }

    Ok(())
}

/// `[image] symbol + offset` for symbolicated frames, `[image] 0xbase +
/// 0xoffset` otherwise, with `_HEADER` standing in when neither resolves.
fn frame_line(frame: &Frame) -> String {
    let image = frame.image_name.as_deref().unwrap_or("???");
    match (&frame.symbol, frame.image_base) {
        (Some(symbol), _) => {
            format!("[{image}] {symbol} + {}", frame.symbol_offset.unwrap_or(0))
        }
        (None, Some(base)) => {
            format!("[{image}] 0x{base:x} + 0x{:x}", frame.image_offset.unwrap_or(0))
        }
        (None, None) => format!("[{image}] {HEADER_PLACEHOLDER}"),
    }
}
