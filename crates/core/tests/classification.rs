use std::io::Write;

use crashlog_core::{render, BugType, CrashReport, ReportError, ReportKind};
use serde_json::json;

#[test]
fn version_is_non_empty() {
    assert!(!crashlog_core::version().is_empty());
}

#[test]
fn unknown_bug_type_passes_through_as_generic() {
    let buf = format!(
        "{}\nsome body text that is not parsed\n",
        json!({"bug_type": "999", "incident_id": "X-1", "timestamp": "2022-01-01 00:00:00.00 +0000"})
    );
    let report = CrashReport::from_str(&buf, "unknown.ips").unwrap();

    assert_eq!(report.kind(), ReportKind::Other);
    assert_eq!(report.bug_type(), None);

    // Rendering emits only the metadata banner.
    let text = render(&report).unwrap();
    assert_eq!(text, "X-1 2022-01-01 00:00:00.00 +0000\nunknown.ips\n\n");
    assert!(!text.contains("Registers:"));
    assert!(!text.contains("Frames:"));
}

#[test]
fn kernel_codes_select_the_panic_delegate() {
    let buf = format!(
        "{}\n{}",
        json!({"bug_type": "210", "incident_id": "K-1"}),
        json!({"panicString": "force reset: SoC watchdog"})
    );
    let report = CrashReport::from_str(&buf, "panic.ips").unwrap();

    assert_eq!(report.kind(), ReportKind::KernelPanic);
    assert_eq!(report.bug_type(), Some(BugType::ForceReset));

    let text = render(&report).unwrap();
    assert!(text.starts_with("K-1 \npanic.ips\n\n"));
    assert!(text.contains("force reset: SoC watchdog"));
}

#[test]
fn legacy_panic_body_renders_verbatim() {
    let buf = format!("{}\npanic(cpu 0): bad things\n", json!({"bug_type": "110"}));
    let report = CrashReport::from_str(&buf, "full.ips").unwrap();

    assert_eq!(report.bug_type(), Some(BugType::FullPanic));
    assert!(render(&report).unwrap().contains("panic(cpu 0): bad things"));
}

#[test]
fn first_line_must_be_json_with_bug_type() {
    let err = CrashReport::from_str("not json\nbody", "x.ips").unwrap_err();
    assert!(matches!(err, ReportError::MalformedInput(_)));

    let err = CrashReport::from_str("{\"incident_id\": \"A\"}\nbody", "x.ips").unwrap_err();
    assert!(matches!(err, ReportError::MalformedInput(_)));
}

#[test]
fn from_reader_matches_from_str() {
    let buf = format!("{}\nbody\n", json!({"bug_type": "999", "incident_id": "R-1"}));

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(buf.as_bytes()).expect("write");
    let handle = file.reopen().expect("reopen");

    let from_reader = CrashReport::from_reader(handle, "r.ips").unwrap();
    let from_str = CrashReport::from_str(&buf, "r.ips").unwrap();

    assert_eq!(from_reader.metadata(), from_str.metadata());
    assert_eq!(render(&from_reader).unwrap(), render(&from_str).unwrap());
}

#[test]
fn summary_serializes_for_generic_reports() {
    let buf = format!("{}\nbody\n", json!({"bug_type": "999", "incident_id": "G-1"}));
    let report = CrashReport::from_str(&buf, "g.ips").unwrap();
    let summary = report.summary().unwrap();

    assert_eq!(summary.bug_type, "999");
    assert_eq!(summary.kind, ReportKind::Other);
    assert_eq!(summary.faulting_thread, None);
    assert!(summary.registers.is_empty());

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"incident_id\":\"G-1\""));
}
