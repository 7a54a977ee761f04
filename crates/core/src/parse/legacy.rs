//! Field extraction for the legacy plain-text body encoding.
//!
//! The legacy body is a header plus named sections, each introduced by a
//! recognizable label line. All extraction here is forward-only, single-pass
//! and line-oriented; a section that never appears yields `None` or an empty
//! list. The one hard check is the frame-line shape: a malformed frame line
//! aborts frame extraction instead of silently misattributing fields.

use crate::error::ReportError;
use crate::model::{Frame, Register};
use crate::parse::FieldSource;

/// Field source over a raw legacy crash body.
#[derive(Debug, Clone)]
pub struct LegacyFields {
    body: String,
}

impl LegacyFields {
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Extract the value of the first `Label:` line, if any.
    fn label_value(&self, label: &str) -> Option<String> {
        let prefix = format!("{label}:");
        self.body
            .lines()
            .find_map(|line| line.strip_prefix(&prefix))
            .map(|rest| rest.trim().to_string())
    }

    /// Lines following the first line that starts with `header`.
    fn section_lines(&self, header: &str) -> Option<std::str::Lines<'_>> {
        let mut lines = self.body.lines();
        lines.by_ref().find(|line| line.starts_with(header))?;
        Some(lines)
    }
}

/// Interpret one whitespace-tokenized frame line.
///
/// Tokens are read from the end: `<addr-or-symbol> + <offset>`. A hex
/// address (`0x…`) means a non-symbolicated frame (image base + image
/// offset); anything else is a symbol name with a symbol offset. The image
/// name is the second token.
fn parse_frame_line(line: &str) -> Result<Frame, ReportError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let n = tokens.len();
    if n < 4 || tokens[n - 2] != "+" {
        return Err(ReportError::FrameShape(line.trim().to_string()));
    }

    let offset: u64 = tokens[n - 1]
        .parse()
        .map_err(|_| ReportError::FrameShape(line.trim().to_string()))?;

    let mut frame = Frame {
        image_name: Some(tokens[1].to_string()),
        image_base: None,
        image_offset: None,
        symbol: None,
        symbol_offset: None,
    };

    let addr_or_symbol = tokens[n - 3];
    match addr_or_symbol.strip_prefix("0x").and_then(|hex| u64::from_str_radix(hex, 16).ok()) {
        Some(base) => {
            frame.image_base = Some(base);
            frame.image_offset = Some(offset);
        }
        None => {
            frame.symbol = Some(addr_or_symbol.to_string());
            frame.symbol_offset = Some(offset);
        }
    }
    Ok(frame)
}

/// Consume `name: value` hex pairs from one register line.
///
/// Stops at the first token that does not end in `:`; a trailing odd token
/// is dropped. Both quirks reproduce the historical scanner exactly.
fn parse_register_line(line: &str, out: &mut Vec<Register>) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut i = 0;
    while i + 1 < tokens.len() {
        let Some(name) = tokens[i].strip_suffix(':') else { break };
        let raw = tokens[i + 1].trim_start_matches("0x");
        let Ok(value) = u64::from_str_radix(raw, 16) else { break };
        out.push(Register { name: name.to_string(), value });
        i += 2;
    }
}

impl FieldSource for LegacyFields {
    fn faulting_thread(&self) -> Result<usize, ReportError> {
        self.label_value("Triggered by Thread")
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| ReportError::missing("Triggered by Thread"))
    }

    fn frames(&self) -> Result<Vec<Frame>, ReportError> {
        let thread = self.faulting_thread()?;
        let header = format!("Thread {thread} Crashed:");

        let mut result = Vec::new();
        let Some(lines) = self.section_lines(&header) else {
            return Ok(result);
        };
        for line in lines {
            if line.split_whitespace().next().is_none() {
                break;
            }
            result.push(parse_frame_line(line)?);
        }
        Ok(result)
    }

    fn registers(&self) -> Result<Vec<Register>, ReportError> {
        let thread = self.faulting_thread()?;
        let header = format!("Thread {thread} crashed with ARM Thread State");

        let mut result = Vec::new();
        let Some(lines) = self.section_lines(&header) else {
            return Ok(result);
        };
        for line in lines {
            if line.split_whitespace().next().is_none() {
                break;
            }
            parse_register_line(line, &mut result);
        }
        Ok(result)
    }

    fn exception_type(&self) -> Option<String> {
        self.label_value("Exception Type")
    }

    fn exception_subtype(&self) -> Option<String> {
        self.label_value("Exception Subtype")
    }

    fn application_specific_information(&self) -> Option<String> {
        let lines = self.section_lines("Application Specific Information:")?;
        let mut collected = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            collected.push(line);
        }
        if collected.is_empty() {
            None
        } else {
            Some(collected.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_line_non_symbolicated() {
        let frame =
            parse_frame_line("0   libsystem_kernel.dylib  0x00000001c3e1a334 0x1c3df1000 + 168756")
                .unwrap();
        assert_eq!(frame.image_name.as_deref(), Some("libsystem_kernel.dylib"));
        assert_eq!(frame.image_base, Some(0x1c3df1000));
        assert_eq!(frame.image_offset, Some(168756));
        assert_eq!(frame.symbol, None);
        assert_eq!(frame.symbol_offset, None);
    }

    #[test]
    fn frame_line_symbolicated() {
        let frame = parse_frame_line("4   kaki  0x0000000100e0bd54 main + 108").unwrap();
        assert_eq!(frame.image_name.as_deref(), Some("kaki"));
        assert_eq!(frame.symbol.as_deref(), Some("main"));
        assert_eq!(frame.symbol_offset, Some(108));
        assert_eq!(frame.image_base, None);
        assert_eq!(frame.image_offset, None);
    }

    #[test]
    fn frame_line_without_plus_is_a_hard_error() {
        let err = parse_frame_line("0 img 0x1000 168756").unwrap_err();
        assert!(matches!(err, ReportError::FrameShape(_)));
    }

    #[test]
    fn register_line_stops_at_non_name_token() {
        let mut regs = Vec::new();
        parse_register_line("x0: 0x0 x1: 0x2 (rest of line)", &mut regs);
        assert_eq!(
            regs,
            vec![
                Register { name: "x0".into(), value: 0 },
                Register { name: "x1".into(), value: 2 },
            ]
        );
    }

    #[test]
    fn register_line_drops_trailing_odd_token() {
        let mut regs = Vec::new();
        parse_register_line("x0: 0x10 x1:", &mut regs);
        assert_eq!(regs, vec![Register { name: "x0".into(), value: 0x10 }]);
    }

    #[test]
    fn missing_sections_yield_empty_or_none() {
        let fields = LegacyFields::new("Triggered by Thread:  3\n".to_string());
        assert_eq!(fields.faulting_thread().unwrap(), 3);
        assert_eq!(fields.frames().unwrap(), vec![]);
        assert_eq!(fields.registers().unwrap(), vec![]);
        assert_eq!(fields.exception_type(), None);
        assert_eq!(fields.application_specific_information(), None);
    }
}
