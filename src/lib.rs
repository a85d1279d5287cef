//! # vfmt
//!
//! A verb-driven text-formatting engine: given a format template and a list
//! of heterogeneous values, it produces an exact textual rendering with
//! printf-family semantics (numeric bases, padding, precision, composite
//! and reference rendering, cycle safety), reusing pooled formatter state
//! to keep steady-state calls allocation-light.
//!
//! ## Key features
//!
//! - **Two-tier rendering**: concrete scalars go through direct fast paths;
//!   composites, references, and capability-bearing values go through a
//!   generic renderer that recurses and detects cycles
//! - **Printf-compatible verbs**: `%v %+v %#v %T %t %d %b %o %x %X %c %q %s
//!   %p %f %e %g` with the `# 0 + - space` flags, `*` or literal width and
//!   precision, and `%[n]` argument indexes
//! - **Visible degradation**: malformed templates never return errors; they
//!   render diagnostic tokens such as `%!d(MISSING)` in place
//! - **Serde bridge**: any `#[derive(Serialize)]` type becomes a renderable
//!   [`Value`] tree via [`to_value`], field names included
//!
//! ## Quick start
//!
//! ```rust
//! use vfmt::{args, format_template, format_values};
//!
//! let out = format_template("%s has %d items (%05.2f%%)", &args!["cart", 3, 7.5]);
//! assert_eq!(out, "cart has 3 items (07.50%)");
//!
//! assert_eq!(format_values(&args![1, 2]), "1 2");
//! assert_eq!(format_template("%x", &args![255]), "ff");
//! assert_eq!(format_template("%d", &args![]), "%!d(MISSING)");
//! ```
//!
//! ## Rendering your own types
//!
//! ```rust
//! use serde::Serialize;
//! use vfmt::{args, format_template, to_value};
//!
//! #[derive(Serialize)]
//! struct User { id: u32, name: String }
//!
//! let user = to_value(&User { id: 7, name: "ada".into() }).unwrap();
//! assert_eq!(format_template("%v", &args![user.clone()]), "{7 ada}");
//! assert_eq!(format_template("%+v", &args![user]), "{id:7 name:ada}");
//! ```
//!
//! ## Wrapped errors
//!
//! ```rust
//! use vfmt::{args, format_error, Value};
//!
//! let cause = Value::from_error("connection refused");
//! let err = format_error("dial failed: %w", &args![cause]);
//! assert_eq!(err.message(), "dial failed: connection refused");
//! assert!(err.cause().is_some());
//! ```

pub mod error;
pub mod macros;
pub mod map;
pub mod ser;
pub mod value;

mod flags;
mod float;
mod num;
mod pool;
mod printer;
mod render;
mod state;

pub use error::{Error, Result, WrapError};
pub use map::ValueMap;
pub use ser::{to_value, ValueSerializer};
pub use value::{Formattable, Value};

use std::io;

fn with_formatter<F: FnOnce(&mut state::Formatter)>(run: F) -> String {
    let mut f = pool::DEFAULT_POOL.acquire();
    run(&mut f);
    let out = f.buf.clone();
    pool::DEFAULT_POOL.release(f);
    out
}

/// Renders each argument in its default format, concatenated.
///
/// Exactly one space separates two consecutive operands unless at least one
/// of the pair is string-like (a string or byte sequence).
///
/// # Examples
///
/// ```rust
/// use vfmt::{args, format_values};
///
/// assert_eq!(format_values(&args!["Hello ", "World!"]), "Hello World!");
/// assert_eq!(format_values(&args![1, 2]), "1 2");
/// ```
#[must_use]
pub fn format_values(args: &[Value]) -> String {
    with_formatter(|f| f.do_values(args))
}

/// Renders a format template against an argument list.
///
/// Template defects degrade into diagnostic tokens in the output rather
/// than failing the call.
///
/// # Examples
///
/// ```rust
/// use vfmt::{args, format_template};
///
/// assert_eq!(format_template("%#X", &args![255]), "0XFF");
/// assert_eq!(format_template("%z", &args![1]), "%!z(BADVERB)");
/// ```
#[must_use]
pub fn format_template(template: &str, args: &[Value]) -> String {
    with_formatter(|f| f.do_template(template, args))
}

/// Renders a template and writes the result to `writer`, returning the
/// number of bytes written.
///
/// Only writer failures produce an error; template defects degrade in the
/// output exactly as in [`format_template`].
pub fn write_template<W: io::Write>(
    writer: &mut W,
    template: &str,
    args: &[Value],
) -> Result<usize> {
    let mut f = pool::DEFAULT_POOL.acquire();
    f.do_template(template, args);
    let written = f.buf.len();
    let outcome = writer.write_all(f.buf.as_bytes());
    pool::DEFAULT_POOL.release(f);
    outcome?;
    Ok(written)
}

/// Appends the default-format concatenation of `args` to `buf`.
#[must_use]
pub fn append_values(mut buf: String, args: &[Value]) -> String {
    let mut f = pool::DEFAULT_POOL.acquire();
    f.do_values(args);
    buf.push_str(&f.buf);
    pool::DEFAULT_POOL.release(f);
    buf
}

/// Appends the rendering of a template to `buf`.
#[must_use]
pub fn append_template(mut buf: String, template: &str, args: &[Value]) -> String {
    let mut f = pool::DEFAULT_POOL.acquire();
    f.do_template(template, args);
    buf.push_str(&f.buf);
    pool::DEFAULT_POOL.release(f);
    buf
}

/// Formats an error message, capturing any `%w` operands as causes.
///
/// `%w` renders like `%v` and marks its argument as a wrapped cause,
/// available through [`WrapError::cause`] and [`WrapError::causes`].
/// Duplicate positions collapse to one cause; with explicit `[n]` indexes
/// the causes come back in argument order.
#[must_use]
pub fn format_error(template: &str, args: &[Value]) -> WrapError {
    if args.is_empty() {
        return WrapError::new(template.to_string(), Vec::new());
    }
    if args.len() == 1 {
        match template {
            "%s" | "%v" => {
                if let Some(msg) = simple_message(&args[0]) {
                    return WrapError::new(msg, Vec::new());
                }
            }
            "%w" => {
                if let Some(msg) = simple_message(&args[0]) {
                    return WrapError::new(msg, vec![args[0].clone()]);
                }
            }
            _ => {}
        }
    }

    let (rewritten, mut wrapped, reordered) = error::rewrite_wrap_verbs(template);
    let msg = format_template(&rewritten, args);
    if reordered {
        wrapped.sort_unstable();
    }
    wrapped.dedup();
    let causes = wrapped
        .into_iter()
        .filter_map(|i| args.get(i).cloned())
        .collect();
    WrapError::new(msg, causes)
}

/// The message a single-argument fast path can use without running the
/// template loop.
fn simple_message(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        Value::Dyn(d) => d.error_text().or_else(|| d.display_text()),
        _ => None,
    }
}
