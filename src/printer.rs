//! Template scanning and verb dispatch.
//!
//! The loop copies literal runs, parses one directive at a time (flags,
//! optional `[n]` argument index, width, precision, verb), consumes
//! arguments, and routes each value to the scalar or reflective tier.
//! Malformed directives never fail the call; they degrade into the
//! diagnostic tokens and, for a missing argument, halt further processing.

use crate::state::{
    Formatter, BAD_PREC, BAD_WIDTH, COMMA_SPACE, EXTRA_PREFIX, MISSING, NIL_ANGLE, NO_VERB,
};
use crate::value::Value;
use std::rc::Rc;

/// Width or precision magnitudes beyond this are refused.
const TOO_LARGE: usize = 1_000_000;

/// Every recognized verb character; anything else is `(BADVERB)`.
const VERBS: &str = "vtTdbBoOxXcqspfFeEgG";

/// Parses a run of decimal digits. Returns the number, whether any digit was
/// seen, and the index one past the run.
fn parse_num(fmt: &[u8], start: usize, end: usize) -> (usize, bool, usize) {
    let mut num = 0usize;
    let mut isnum = false;
    let mut i = start;
    while i < end && fmt[i].is_ascii_digit() {
        if num < TOO_LARGE {
            num = num * 10 + (fmt[i] - b'0') as usize;
        } else {
            // Keep consuming digits; the magnitude check rejects it later.
            num = TOO_LARGE + 1;
        }
        isnum = true;
        i += 1;
    }
    (num, isnum, i)
}

/// Parses a bracketed one-indexed argument number with the opening bracket at
/// `start`. Returns the zero-based index and the position past `]`, or `None`
/// with the position past `[` when malformed.
fn parse_arg_number(fmt: &[u8], start: usize, end: usize) -> (Option<usize>, usize) {
    let mut close = start + 1;
    while close < end && fmt[close] != b']' {
        close += 1;
    }
    if close >= end {
        return (None, start + 1);
    }
    let (num, isnum, newi) = parse_num(fmt, start + 1, close);
    if !isnum || newi != close || num == 0 || num > TOO_LARGE {
        return (None, close + 1);
    }
    (Some(num - 1), close + 1)
}

fn int_arg(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Uint(u) => i64::try_from(*u).ok(),
        _ => None,
    }
}

fn string_like(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::Bytes(_))
}

impl Formatter {
    /// Concatenation shortcut for templates made of literals and bare `%s`
    /// directives with exactly matching string arguments. Returns false when
    /// the template needs the full loop.
    fn try_fast_strings(&mut self, template: &str, args: &[Value]) -> bool {
        let fmt = template.as_bytes();
        let mut count = 0usize;
        let mut i = 0usize;
        while i < fmt.len() {
            if fmt[i] == b'%' {
                if i + 1 >= fmt.len() || fmt[i + 1] != b's' {
                    return false;
                }
                count += 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        if count != args.len() || !args.iter().all(|a| matches!(a, Value::Str(_))) {
            return false;
        }

        let mut arg_num = 0usize;
        let mut i = 0usize;
        while i < fmt.len() {
            let start = i;
            while i < fmt.len() && fmt[i] != b'%' {
                i += 1;
            }
            self.buf.push_str(&template[start..i]);
            if i < fmt.len() {
                if let Value::Str(s) = &args[arg_num] {
                    self.buf.push_str(s);
                }
                arg_num += 1;
                i += 2;
            }
        }
        true
    }

    /// The template interpretation loop.
    pub(crate) fn do_template(&mut self, template: &str, args: &[Value]) {
        if self.try_fast_strings(template, args) {
            return;
        }
        let fmt = template.as_bytes();
        let end = fmt.len();
        let mut arg_num = 0usize;
        let mut after_index = false;
        let mut reordered = false;
        let mut halted = false;
        let mut i = 0usize;

        while i < end {
            let lasti = i;
            while i < end && fmt[i] != b'%' {
                i += 1;
            }
            if i > lasti {
                self.buf.push_str(&template[lasti..i]);
            }
            if i >= end {
                break;
            }
            i += 1;

            if i < end && fmt[i] == b'%' {
                self.buf.push('%');
                i += 1;
                continue;
            }

            self.flags.clear();

            while i < end {
                match fmt[i] {
                    b'#' => self.flags.sharp = true,
                    b'0' => self.flags.zero = true,
                    b'+' => self.flags.plus = true,
                    b'-' => self.flags.minus = true,
                    b' ' => self.flags.space = true,
                    _ => break,
                }
                i += 1;
            }

            let mut good_arg_num = true;
            if i < end && fmt[i] == b'[' {
                reordered = true;
                let (parsed, newi) = parse_arg_number(fmt, i, end);
                i = newi;
                match parsed {
                    Some(n) => {
                        arg_num = n;
                        after_index = true;
                    }
                    None => good_arg_num = false,
                }
            }

            // Width: literal digits or `*` consuming one argument.
            if i < end && fmt[i] == b'*' {
                i += 1;
                if arg_num >= args.len() {
                    self.buf.push_str(MISSING);
                    halted = true;
                    break;
                }
                match int_arg(&args[arg_num]) {
                    Some(w) if w.unsigned_abs() <= TOO_LARGE as u64 => {
                        self.flags.wid = w.unsigned_abs() as usize;
                        self.flags.wid_present = true;
                        if w < 0 {
                            self.flags.minus = true;
                        }
                    }
                    _ => self.buf.push_str(BAD_WIDTH),
                }
                arg_num += 1;
            } else {
                let (num, isnum, newi) = parse_num(fmt, i, end);
                i = newi;
                if isnum {
                    if num > TOO_LARGE {
                        self.buf.push_str(BAD_WIDTH);
                    } else {
                        self.flags.wid = num;
                        self.flags.wid_present = true;
                    }
                }
            }

            if i < end && fmt[i] == b'.' {
                i += 1;
                if i < end && fmt[i] == b'*' {
                    i += 1;
                    if arg_num >= args.len() {
                        self.buf.push_str(MISSING);
                        halted = true;
                        break;
                    }
                    match int_arg(&args[arg_num]) {
                        // A negative precision through `*` means none at all.
                        Some(p) if p < 0 => {}
                        Some(p) if p <= TOO_LARGE as i64 => {
                            self.flags.prec = p as usize;
                            self.flags.prec_present = true;
                        }
                        _ => self.buf.push_str(BAD_PREC),
                    }
                    arg_num += 1;
                } else {
                    // A bare `.` with no digits means precision zero.
                    let (num, _, newi) = parse_num(fmt, i, end);
                    i = newi;
                    if num > TOO_LARGE {
                        self.buf.push_str(BAD_PREC);
                    } else {
                        self.flags.prec = num;
                        self.flags.prec_present = true;
                    }
                }
            }

            if i >= end {
                self.buf.push_str(NO_VERB);
                break;
            }
            let verb = fmt[i] as char;
            i += 1;

            if !good_arg_num {
                self.bad_arg_num(verb);
                continue;
            }
            if arg_num >= args.len() {
                if after_index {
                    // An explicit index pointing past the arguments is an
                    // index defect, not exhaustion; processing continues.
                    self.bad_arg_num(verb);
                    after_index = false;
                    continue;
                }
                self.missing_arg(verb);
                halted = true;
                break;
            }
            let value = &args[arg_num];
            arg_num += 1;
            after_index = false;

            if verb == 'v' {
                // The numeric meanings of `+` and `#` become the field-name
                // and type-wrap meanings under the default verb.
                self.flags.plus_v = self.flags.plus;
                self.flags.plus = false;
                self.flags.sharp_v = self.flags.sharp;
                self.flags.sharp = false;
            }

            if !VERBS.contains(verb) {
                self.write_bad_verb(verb);
                continue;
            }

            self.print_arg(value, verb);
        }

        if !reordered && !halted && arg_num < args.len() {
            self.buf.push_str(EXTRA_PREFIX);
            for (k, value) in args[arg_num..].iter().enumerate() {
                if k > 0 {
                    self.buf.push_str(COMMA_SPACE);
                }
                if value.is_null() {
                    self.buf.push_str(NIL_ANGLE);
                    continue;
                }
                self.buf.push_str(&value.type_name());
                self.buf.push('=');
                self.flags.clear();
                self.print_arg(value, 'v');
            }
            self.buf.push(')');
        }
    }

    /// Default-format concatenation: one space between two consecutive
    /// operands unless at least one of the pair is string-like.
    pub(crate) fn do_values(&mut self, args: &[Value]) {
        let mut prev_string_like = false;
        for (k, arg) in args.iter().enumerate() {
            let cur = string_like(arg);
            if k > 0 && !prev_string_like && !cur {
                self.buf.push(' ');
            }
            self.flags.clear();
            self.print_arg(arg, 'v');
            prev_string_like = cur;
        }
    }

    /// Routes one argument to the right renderer for a recognized verb.
    pub(crate) fn print_arg(&mut self, value: &Value, verb: char) {
        if value.is_null() {
            self.write_nil(verb);
            return;
        }
        match verb {
            'T' => {
                let name = value.type_name();
                self.pad(&name);
            }
            'p' => self.fmt_addr(value, verb),
            _ => {
                if !self.render_scalar(value, verb) {
                    self.render_composite(value, verb);
                }
            }
        }
    }

    /// The address verb: reference identity in hex. The alternate flag drops
    /// the `0x` prefix.
    fn fmt_addr(&mut self, value: &Value, verb: char) {
        let addr = match value {
            Value::Ref(cell) => Rc::as_ptr(cell) as usize as u64,
            Value::Dyn(d) => Rc::as_ptr(d) as *const () as usize as u64,
            _ => {
                self.bad_verb(verb, value);
                return;
            }
        };
        let digits = crate::num::encode(addr, 16, false);
        if self.flags.sharp {
            self.pad(&digits);
        } else {
            let mut body = String::with_capacity(digits.len() + 2);
            body.push_str("0x");
            body.push_str(&digits);
            self.pad(&body);
        }
    }
}
