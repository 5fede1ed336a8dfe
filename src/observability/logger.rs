//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity` and `ts`, then fields in alphabetical order
//! - Synchronous, no buffering
//! - ERROR and above go to stderr, everything else to stdout

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-request detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that writes JSON lines
pub struct Logger;

impl Logger {
    /// Log an event at its default severity
    pub fn emit(event: Event, fields: &[(&str, &str)]) {
        Self::log(event.severity(), event, fields);
    }

    /// Log an event at an explicit severity
    pub fn log(severity: Severity, event: Event, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, &Self::timestamp(), fields);
        if severity >= Severity::Error {
            Self::write_line(&mut io::stderr(), &line);
        } else {
            Self::write_line(&mut io::stdout(), &line);
        }
    }

    fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn write_line<W: Write>(writer: &mut W, line: &str) {
        // Logging never fails the caller.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Builds one log line, newline included
    fn render(severity: Severity, event: Event, ts: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":");
        push_json_string(&mut output, event.as_str());
        output.push_str(",\"severity\":");
        push_json_string(&mut output, severity.as_str());
        output.push_str(",\"ts\":");
        push_json_string(&mut output, ts);

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            output.push(',');
            push_json_string(&mut output, key);
            output.push(':');
            push_json_string(&mut output, value);
        }

        output.push_str("}\n");
        output
    }
}

fn push_json_string(output: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => output.push_str(&quoted),
        Err(_) => output.push_str("\"\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(event: Event, fields: &[(&str, &str)]) -> String {
        Logger::render(event.severity(), event, "2024-01-01T00:00:00.000Z", fields)
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_log_line_is_json() {
        let output = capture(Event::StoreOpened, &[("backend", "memory")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "STORE_OPENED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["backend"], "memory");
    }

    #[test]
    fn test_fields_sorted_and_event_first() {
        let a = capture(Event::InsertFailed, &[("zeta", "1"), ("collection", "orders")]);
        let b = capture(Event::InsertFailed, &[("collection", "orders"), ("zeta", "1")]);
        assert_eq!(a, b);

        assert!(a.starts_with("{\"event\""));
        assert!(a.find("collection").unwrap() < a.find("zeta").unwrap());
    }

    #[test]
    fn test_special_chars_escaped() {
        let output = capture(Event::FindFailed, &[("error", "bad \"quote\"\nnext")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["error"], "bad \"quote\"\nnext");
        assert_eq!(output.matches('\n').count(), 1);
    }
}
