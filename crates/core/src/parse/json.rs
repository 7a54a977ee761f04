//! Field extraction for the modern JSON body encoding.

use serde_json::Value;

use crate::error::ReportError;
use crate::model::{Frame, Register};
use crate::parse::FieldSource;

/// Field source over a decoded JSON crash body.
#[derive(Debug, Clone)]
pub struct JsonFields {
    body: Value,
}

impl JsonFields {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Thread-state object of the faulting thread.
    fn thread_state(&self) -> Result<&Value, ReportError> {
        let thread = self.faulting_thread_entry()?;
        thread
            .get("threadState")
            .ok_or_else(|| ReportError::missing("threadState"))
    }

    /// `threads[faultingThread]`, or `MissingField` when the thread list
    /// does not cover the declared index.
    fn faulting_thread_entry(&self) -> Result<&Value, ReportError> {
        let index = self.faulting_thread()?;
        self.body
            .get("threads")
            .and_then(Value::as_array)
            .and_then(|threads| threads.get(index))
            .ok_or_else(|| ReportError::missing("threads"))
    }
}

impl FieldSource for JsonFields {
    fn faulting_thread(&self) -> Result<usize, ReportError> {
        self.body
            .get("faultingThread")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .ok_or_else(|| ReportError::missing("faultingThread"))
    }

    fn frames(&self) -> Result<Vec<Frame>, ReportError> {
        let thread = self.faulting_thread_entry()?;
        let frames = thread
            .get("frames")
            .and_then(Value::as_array)
            .ok_or_else(|| ReportError::missing("frames"))?;
        let images = self.body.get("usedImages").and_then(Value::as_array);

        let mut result = Vec::with_capacity(frames.len());
        for frame in frames {
            // Resolve the image by index; a missing or dangling reference
            // degrades to absent markers rather than an error.
            let image = frame
                .get("imageIndex")
                .and_then(Value::as_u64)
                .and_then(|idx| images.and_then(|imgs| imgs.get(idx as usize)));

            result.push(Frame {
                image_name: image
                    .and_then(|img| img.get("path"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                image_base: image.and_then(|img| img.get("base")).and_then(Value::as_u64),
                image_offset: frame.get("imageOffset").and_then(Value::as_u64),
                symbol: frame.get("symbol").and_then(Value::as_str).map(str::to_string),
                symbol_offset: frame.get("symbolLocation").and_then(Value::as_u64),
            });
        }
        Ok(result)
    }

    fn registers(&self) -> Result<Vec<Register>, ReportError> {
        let state = self.thread_state()?;
        let mut result = Vec::new();

        // General-purpose registers come as an anonymous array; names are
        // synthesized by position.
        if let Some(gprs) = state.get("x").and_then(Value::as_array) {
            for (i, reg) in gprs.iter().enumerate() {
                if let Some(value) = reg.get("value").and_then(Value::as_u64) {
                    result.push(Register { name: format!("x{i}"), value });
                }
            }
        }

        // Every remaining entry that is an object with a `value` key is a
        // named special register. Document key order is preserved, which is
        // why serde_json runs with `preserve_order`.
        if let Some(entries) = state.as_object() {
            for (name, entry) in entries {
                if name == "x" || !entry.is_object() {
                    continue;
                }
                if let Some(value) = entry.get("value").and_then(Value::as_u64) {
                    result.push(Register { name: name.clone(), value });
                }
            }
        }

        Ok(result)
    }

    fn exception_type(&self) -> Option<String> {
        self.body
            .get("exception")?
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn exception_subtype(&self) -> Option<String> {
        self.body
            .get("exception")?
            .get("subtype")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn application_specific_information(&self) -> Option<String> {
        match self.body.get("asi") {
            None | Some(Value::Null) => None,
            // Empty strings normalize to absent, never to "".
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(other) => Some(other.to_string()),
        }
    }
}
