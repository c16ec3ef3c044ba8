//! WAL Record Module
//!
//! One logical write and its line encoding.
//!
//! ```text
//! <escaped key> TAB <escaped value> LF
//! ```
//!
//! Backslash, newline, tab and carriage return are escaped in both fields, so
//! the first raw TAB on a line is always the delimiter and a record never
//! spans more than one line.

// == Constants ==
/// Separates key from value on a log line.
pub const FIELD_DELIMITER: char = '\t';

/// Terminates every log line.
pub const RECORD_TERMINATOR: char = '\n';

// == WAL Record ==
/// A single accepted `set`, as persisted in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    pub key: String,
    pub value: String,
}

impl WalRecord {
    // == Constructor ==
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    // == Encode ==
    /// Encodes the record as one terminated line.
    pub fn encode(&self) -> String {
        let mut line = String::with_capacity(self.key.len() + self.value.len() + 2);
        escape_into(&self.key, &mut line);
        line.push(FIELD_DELIMITER);
        escape_into(&self.value, &mut line);
        line.push(RECORD_TERMINATOR);
        line
    }

    // == Decode ==
    /// Decodes a line with its terminator already stripped.
    ///
    /// Returns `None` when the line has no delimiter.
    pub fn decode(line: &str) -> Option<Self> {
        let (key, value) = line.split_once(FIELD_DELIMITER)?;
        Some(Self {
            key: unescape(key),
            value: unescape(value),
        })
    }
}

fn escape_into(field: &str, out: &mut String) {
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

/// Reverses `escape_into`. Unknown sequences and a dangling backslash are
/// kept verbatim, which keeps older lines (newline-only escaping) readable.
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
