//! Report construction, classification, and memoized field access.

use std::cell::OnceCell;
use std::io::Read;

use serde::Serialize;

use crate::error::ReportError;
use crate::model::{kind_of_code, BugType, Frame, Metadata, Register, ReportKind};
use crate::panic::{PanicLog, RawPanicLog};
use crate::parse::{split_metadata, Body, FieldSource};

/// A parsed crash report, polymorphic over the bug-type axis.
///
/// The classifier is a pure lookup: user-mode crash-dump codes produce
/// [`UserModeReport`], kernel-panic codes produce [`KernelModeReport`], and
/// everything else passes through as [`GenericReport`]. Each report owns its
/// metadata and parsed fields exclusively; one input buffer produces one
/// independent report.
#[derive(Debug)]
pub enum CrashReport {
    Generic(GenericReport),
    UserMode(UserModeReport),
    KernelMode(KernelModeReport),
}

impl CrashReport {
    /// Parse a report from its full file contents.
    pub fn from_str(buf: &str, filename: impl Into<String>) -> Result<CrashReport, ReportError> {
        let filename = filename.into();
        let (metadata, body) = split_metadata(buf)?;

        Ok(match kind_of_code(&metadata.bug_type) {
            ReportKind::CrashDump => CrashReport::UserMode(UserModeReport::new(
                metadata,
                filename,
                Body::detect(body).into_fields(),
            )),
            ReportKind::KernelPanic => {
                let panic = RawPanicLog::new(metadata.bug_type.clone(), body);
                CrashReport::KernelMode(KernelModeReport::new(metadata, filename, Box::new(panic)))
            }
            ReportKind::Other => CrashReport::Generic(GenericReport {
                metadata,
                filename,
                body: body.to_string(),
            }),
        })
    }

    /// Parse a report from an open handle. Equivalent to reading the handle
    /// to a string and calling [`CrashReport::from_str`].
    pub fn from_reader<R: Read>(
        mut reader: R,
        filename: impl Into<String>,
    ) -> Result<CrashReport, ReportError> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|e| ReportError::Read(e.to_string()))?;
        CrashReport::from_str(&buf, filename)
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            CrashReport::Generic(r) => &r.metadata,
            CrashReport::UserMode(r) => &r.metadata,
            CrashReport::KernelMode(r) => &r.metadata,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            CrashReport::Generic(r) => &r.filename,
            CrashReport::UserMode(r) => &r.filename,
            CrashReport::KernelMode(r) => &r.filename,
        }
    }

    /// Recognized bug type, if the code is in the static table.
    pub fn bug_type(&self) -> Option<BugType> {
        BugType::from_code(&self.metadata().bug_type)
    }

    pub fn kind(&self) -> ReportKind {
        kind_of_code(&self.metadata().bug_type)
    }

    /// Flatten the report into a serializable summary.
    ///
    /// Crash-specific fields are populated for user-mode reports only;
    /// required-field failures propagate.
    pub fn summary(&self) -> Result<ReportSummary, ReportError> {
        let metadata = self.metadata().clone();
        let mut summary = ReportSummary {
            filename: self.filename().to_string(),
            kind: self.kind(),
            bug_type: metadata.bug_type,
            incident_id: metadata.incident_id,
            timestamp: metadata.timestamp,
            name: metadata.name,
            faulting_thread: None,
            exception_type: None,
            exception_subtype: None,
            application_specific_information: None,
            registers: Vec::new(),
            frames: Vec::new(),
            panic: None,
        };

        match self {
            CrashReport::UserMode(r) => {
                summary.faulting_thread = Some(r.faulting_thread()?);
                summary.exception_type = r.exception_type().cloned();
                summary.exception_subtype = r.exception_subtype().cloned();
                summary.application_specific_information =
                    r.application_specific_information().cloned();
                summary.registers = r.registers()?.to_vec();
                summary.frames = r.frames()?.to_vec();
            }
            CrashReport::KernelMode(r) => summary.panic = Some(r.describe()),
            CrashReport::Generic(_) => {}
        }
        Ok(summary)
    }
}

/// Serializable flat view of a report, used by the CLI `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub filename: String,
    pub kind: ReportKind,
    pub bug_type: String,
    pub incident_id: Option<String>,
    pub timestamp: Option<String>,
    pub name: Option<String>,
    pub faulting_thread: Option<usize>,
    pub exception_type: Option<String>,
    pub exception_subtype: Option<String>,
    pub application_specific_information: Option<String>,
    pub registers: Vec<Register>,
    pub frames: Vec<Frame>,
    pub panic: Option<String>,
}

/// Passthrough report for unrecognized bug types: metadata plus the raw
/// body, nothing interpreted.
#[derive(Debug)]
pub struct GenericReport {
    metadata: Metadata,
    filename: String,
    body: String,
}

impl GenericReport {
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// User-mode crash dump with lazily computed, memoized fields.
///
/// Each field is computed on first access from the format-specific
/// [`FieldSource`] and cached for the lifetime of the report; the backing
/// body never mutates, so there is no invalidation. Failures are cached
/// too and re-surface identically on re-access.
pub struct UserModeReport {
    metadata: Metadata,
    filename: String,
    fields: Box<dyn FieldSource>,
    faulting_thread: OnceCell<Result<usize, ReportError>>,
    frames: OnceCell<Result<Vec<Frame>, ReportError>>,
    registers: OnceCell<Result<Vec<Register>, ReportError>>,
    exception_type: OnceCell<Option<String>>,
    exception_subtype: OnceCell<Option<String>>,
    asi: OnceCell<Option<String>>,
}

impl std::fmt::Debug for UserModeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserModeReport")
            .field("metadata", &self.metadata)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

impl UserModeReport {
    pub fn new(metadata: Metadata, filename: String, fields: Box<dyn FieldSource>) -> Self {
        Self {
            metadata,
            filename,
            fields,
            faulting_thread: OnceCell::new(),
            frames: OnceCell::new(),
            registers: OnceCell::new(),
            exception_type: OnceCell::new(),
            exception_subtype: OnceCell::new(),
            asi: OnceCell::new(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn faulting_thread(&self) -> Result<usize, ReportError> {
        self.faulting_thread
            .get_or_init(|| self.fields.faulting_thread())
            .clone()
    }

    pub fn frames(&self) -> Result<&[Frame], ReportError> {
        self.frames
            .get_or_init(|| self.fields.frames())
            .as_deref()
            .map_err(Clone::clone)
    }

    pub fn registers(&self) -> Result<&[Register], ReportError> {
        self.registers
            .get_or_init(|| self.fields.registers())
            .as_deref()
            .map_err(Clone::clone)
    }

    pub fn exception_type(&self) -> Option<&String> {
        self.exception_type
            .get_or_init(|| self.fields.exception_type())
            .as_ref()
    }

    pub fn exception_subtype(&self) -> Option<&String> {
        self.exception_subtype
            .get_or_init(|| self.fields.exception_subtype())
            .as_ref()
    }

    pub fn application_specific_information(&self) -> Option<&String> {
        self.asi
            .get_or_init(|| self.fields.application_specific_information())
            .as_ref()
    }
}

/// Kernel-mode report: metadata plus a composed panic-log delegate.
pub struct KernelModeReport {
    metadata: Metadata,
    filename: String,
    panic: Box<dyn PanicLog>,
}

impl std::fmt::Debug for KernelModeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelModeReport")
            .field("metadata", &self.metadata)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

impl KernelModeReport {
    pub fn new(metadata: Metadata, filename: String, panic: Box<dyn PanicLog>) -> Self {
        Self { metadata, filename, panic }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The delegate's own rendering of the panic.
    pub fn describe(&self) -> String {
        self.panic.describe()
    }
}
