//! Error types.
//!
//! Formatting itself never fails; template defects degrade into diagnostic
//! tokens inside the output. [`Error`] covers the two genuinely fallible
//! surfaces: writer I/O in [`write_template`](crate::write_template) and
//! value construction in [`to_value`](crate::to_value). [`WrapError`] is the
//! error value produced by [`format_error`](crate::format_error), carrying
//! the formatted message plus any arguments the `%w` verb marked as causes.

use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// Alias for results produced by this crate's fallible entry points.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The destination writer failed while receiving rendered output.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be captured during serialization.
    #[error("{0}")]
    Serialize(String),
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serialize(msg.to_string())
    }
}

/// An error carrying a formatted message and zero or more wrapped causes.
///
/// Produced by [`format_error`](crate::format_error). Arguments consumed by
/// a `%w` verb are retained as causes and render into the message exactly as
/// `%v` would.
#[derive(Debug, Clone)]
pub struct WrapError {
    msg: String,
    causes: Vec<Value>,
}

impl WrapError {
    pub(crate) fn new(msg: String, causes: Vec<Value>) -> Self {
        WrapError { msg, causes }
    }

    /// The formatted message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// The first wrapped cause, when exactly the single-`%w` case applies.
    #[must_use]
    pub fn cause(&self) -> Option<&Value> {
        self.causes.first()
    }

    /// All wrapped causes, in template order (argument order when explicit
    /// indexes were used).
    #[must_use]
    pub fn causes(&self) -> &[Value] {
        &self.causes
    }
}

impl fmt::Display for WrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::error::Error for WrapError {}

/// Rewrites `%w` verbs to `%v`, recording which argument position each one
/// consumed and whether explicit `[n]` indexes appeared anywhere.
pub(crate) fn rewrite_wrap_verbs(template: &str) -> (String, Vec<usize>, bool) {
    let fmt = template.as_bytes();
    let end = fmt.len();
    let mut out = String::with_capacity(template.len());
    let mut wrapped = Vec::new();
    let mut reordered = false;
    let mut arg_num = 0usize;
    let mut i = 0usize;

    while i < end {
        if fmt[i] != b'%' {
            let start = i;
            while i < end && fmt[i] != b'%' {
                i += 1;
            }
            out.push_str(&template[start..i]);
            continue;
        }
        if i + 1 < end && fmt[i + 1] == b'%' {
            out.push_str("%%");
            i += 2;
            continue;
        }
        out.push('%');
        i += 1;

        if i < end && fmt[i] == b'[' {
            reordered = true;
            let start = i;
            while i < end && fmt[i] != b']' {
                i += 1;
            }
            if i < end {
                i += 1;
                let index: usize = template[start + 1..i - 1]
                    .bytes()
                    .filter(u8::is_ascii_digit)
                    .fold(0, |n, d| n * 10 + (d - b'0') as usize);
                arg_num = index.saturating_sub(1);
                out.push_str(&template[start..i]);
            }
        }

        // Flags, width, and precision pass through untouched; `*` consumes
        // an argument position just as the dispatcher will.
        while i < end {
            match fmt[i] {
                b'+' | b'-' | b'0' | b'#' | b' ' | b'.' => {
                    out.push(fmt[i] as char);
                    i += 1;
                }
                b'*' => {
                    out.push('*');
                    arg_num += 1;
                    i += 1;
                }
                d if d.is_ascii_digit() => {
                    out.push(d as char);
                    i += 1;
                }
                _ => break,
            }
        }

        if i < end {
            if fmt[i] == b'w' {
                wrapped.push(arg_num);
                out.push('v');
            } else {
                out.push(fmt[i] as char);
            }
            i += 1;
        }
        arg_num += 1;
    }

    (out, wrapped, reordered)
}
