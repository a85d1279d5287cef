//! Per-call formatter state.
//!
//! A [`Formatter`] owns the output buffer, the active flag set, the
//! visited-identity set used for cycle detection, and the recursion marker
//! that decides whether `%#v` type wrapping applies at the outermost level.
//! Instances live in the pool; exactly one in-flight call uses an instance at
//! a time, and the pool clears buffer, flags, and visited entries on acquire.
//!
//! This module also hosts the padding engine and the string-family renderers
//! (plain, quoted, hex-encoded, char, bool) shared by the fast path and the
//! reflective renderer.

use crate::flags::Flags;
use crate::value::Value;
use std::collections::HashSet;

pub(crate) const NIL_ANGLE: &str = "<nil>";
pub(crate) const NIL_PAREN: &str = "(nil)";
pub(crate) const PERCENT_BANG: &str = "%!";
pub(crate) const MISSING: &str = "(MISSING)";
pub(crate) const BAD_INDEX: &str = "(BADINDEX)";
pub(crate) const BAD_VERB: &str = "(BADVERB)";
pub(crate) const NO_VERB: &str = "%!(NOVERB)";
pub(crate) const BAD_WIDTH: &str = "%!(BADWIDTH)";
pub(crate) const BAD_PREC: &str = "%!(BADPREC)";
pub(crate) const MAP_PREFIX: &str = "map[";
pub(crate) const PANIC_PREFIX: &str = "(PANIC=";
pub(crate) const EXTRA_PREFIX: &str = "%!(EXTRA ";
pub(crate) const COMMA_SPACE: &str = ", ";
pub(crate) const CYCLIC: &str = "(CYCLIC REFERENCE)";

/// One rendering call's worth of mutable state.
#[derive(Default)]
pub(crate) struct Formatter {
    pub(crate) buf: String,
    pub(crate) flags: Flags,
    /// Reference identities on the current descent path.
    pub(crate) visited: HashSet<usize>,
    /// Set while rendering below the outermost value.
    pub(crate) recursing: bool,
}

impl Formatter {
    /// Clears everything a fresh call must not observe; buffer capacity is
    /// kept so pooled instances amortize allocation.
    pub(crate) fn reset(&mut self) {
        self.buf.clear();
        self.flags.clear();
        self.visited.clear();
        self.recursing = false;
    }

    /// Applies width and justification to already-assembled content.
    ///
    /// Zero-fill never happens here: the numeric renderers fold zeros into
    /// digit emission so they land between sign and digits.
    pub(crate) fn pad(&mut self, s: &str) {
        if !self.flags.wid_present || self.flags.wid == 0 {
            self.buf.push_str(s);
            return;
        }
        let runes = s.chars().count();
        if runes >= self.flags.wid {
            self.buf.push_str(s);
            return;
        }
        let fill = self.flags.wid - runes;
        if self.flags.minus {
            self.buf.push_str(s);
            for _ in 0..fill {
                self.buf.push(' ');
            }
        } else {
            for _ in 0..fill {
                self.buf.push(' ');
            }
            self.buf.push_str(s);
        }
    }

    /// Right-justified zero fill for a signed numeric body: the sign stays in
    /// front of the inserted zeros.
    pub(crate) fn pad_number(&mut self, s: &str) {
        let f = self.flags;
        if !(f.zero && f.wid_present && !f.minus) {
            self.pad(s);
            return;
        }
        let runes = s.chars().count();
        if runes >= f.wid {
            self.buf.push_str(s);
            return;
        }
        let fill = f.wid - runes;
        let mut rest = s;
        if let Some(first) = s.chars().next() {
            if first == '-' || first == '+' || first == ' ' {
                self.buf.push(first);
                rest = &s[first.len_utf8()..];
            }
        }
        for _ in 0..fill {
            self.buf.push('0');
        }
        self.buf.push_str(rest);
    }

    pub(crate) fn fmt_bool(&mut self, v: bool) {
        self.pad(if v { "true" } else { "false" });
    }

    /// Plain string rendering: precision truncates by character count, then
    /// width pads.
    pub(crate) fn fmt_str(&mut self, s: &str) {
        let truncated = self.truncate(s);
        if self.flags.wid_present {
            self.pad(truncated);
        } else {
            self.buf.push_str(truncated);
        }
    }

    fn truncate<'a>(&self, s: &'a str) -> &'a str {
        if self.flags.prec_present {
            if let Some((idx, _)) = s.char_indices().nth(self.flags.prec) {
                return &s[..idx];
            }
        }
        s
    }

    /// Double-quoted string with escapes for quotes, backslashes, and control
    /// characters.
    pub(crate) fn fmt_quoted(&mut self, s: &str) {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        push_escaped(&mut out, self.truncate(s));
        out.push('"');
        self.pad(&out);
    }

    /// Single-quoted character for `%q` on chars and code points.
    pub(crate) fn fmt_quoted_char(&mut self, c: char) {
        let mut out = String::with_capacity(6);
        out.push('\'');
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
        out.push('\'');
        self.pad(&out);
    }

    pub(crate) fn fmt_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        let s: &str = c.encode_utf8(&mut tmp);
        self.pad(s);
    }

    /// Per-byte hex encoding for `%x`/`%X` on strings and byte sequences.
    /// The space flag separates bytes; `#` prefixes `0x`/`0X`.
    pub(crate) fn fmt_hex(&mut self, data: &[u8], uppercase: bool) {
        let digits = if uppercase {
            crate::num::UPPER_DIGITS
        } else {
            crate::num::LOWER_DIGITS
        };
        let mut out = String::with_capacity(data.len() * 2 + 2);
        for (k, b) in data.iter().enumerate() {
            if k > 0 && self.flags.space {
                out.push(' ');
            }
            if self.flags.sharp && (k == 0 || self.flags.space) {
                out.push('0');
                out.push(if uppercase { 'X' } else { 'x' });
            }
            out.push(digits[(b >> 4) as usize] as char);
            out.push(digits[(b & 0xF) as usize] as char);
        }
        self.pad(&out);
    }

    /// Raw byte emission for byte sequences under `s`/`v`; invalid UTF-8 is
    /// replaced rather than rejected since the output is a string.
    pub(crate) fn fmt_bytes(&mut self, data: &[u8]) {
        match std::str::from_utf8(data) {
            Ok(s) => self.fmt_str(s),
            Err(_) => {
                let lossy = String::from_utf8_lossy(data).into_owned();
                self.fmt_str(&lossy);
            }
        }
    }

    /// The nil-argument diagnostic: `<nil>` for `v`/`T`, `%!<verb>(<nil>)`
    /// otherwise.
    pub(crate) fn write_nil(&mut self, verb: char) {
        match verb {
            'v' | 'T' => self.buf.push_str(NIL_ANGLE),
            _ => {
                self.buf.push_str(PERCENT_BANG);
                self.buf.push(verb);
                self.buf.push('(');
                self.buf.push_str(NIL_ANGLE);
                self.buf.push(')');
            }
        }
    }

    /// Wrong-verb-for-kind diagnostic: `%!<verb>(<type>=<value>)`.
    pub(crate) fn bad_verb(&mut self, verb: char, value: &Value) {
        self.buf.push_str(PERCENT_BANG);
        self.buf.push(verb);
        self.buf.push('(');
        self.buf.push_str(&value.type_name());
        self.buf.push('=');
        // Default-render the offending value without the failed verb's flags.
        let saved = self.flags;
        self.flags.clear();
        self.render_value(value, 'v');
        self.flags = saved;
        self.buf.push(')');
    }

    /// Unknown-verb diagnostic: `%!<verb>(BADVERB)`.
    pub(crate) fn write_bad_verb(&mut self, verb: char) {
        self.buf.push_str(PERCENT_BANG);
        self.buf.push(verb);
        self.buf.push_str(BAD_VERB);
    }

    pub(crate) fn missing_arg(&mut self, verb: char) {
        self.buf.push_str(PERCENT_BANG);
        self.buf.push(verb);
        self.buf.push_str(MISSING);
    }

    pub(crate) fn bad_arg_num(&mut self, verb: char) {
        self.buf.push_str(PERCENT_BANG);
        self.buf.push(verb);
        self.buf.push_str(BAD_INDEX);
    }
}

fn push_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_width(wid: usize, minus: bool) -> Formatter {
        let mut f = Formatter::default();
        f.flags.wid = wid;
        f.flags.wid_present = true;
        f.flags.minus = minus;
        f
    }

    #[test]
    fn pad_right_justifies_by_default() {
        let mut f = with_width(5, false);
        f.pad("ab");
        assert_eq!(f.buf, "   ab");
    }

    #[test]
    fn pad_left_justifies_under_minus() {
        let mut f = with_width(5, true);
        f.pad("ab");
        assert_eq!(f.buf, "ab   ");
    }

    #[test]
    fn pad_number_keeps_sign_in_front_of_zeros() {
        let mut f = with_width(6, false);
        f.flags.zero = true;
        f.pad_number("-3.14");
        assert_eq!(f.buf, "-03.14");
    }

    #[test]
    fn precision_truncates_by_chars() {
        let mut f = Formatter::default();
        f.flags.prec = 2;
        f.flags.prec_present = true;
        f.fmt_str("héllo");
        assert_eq!(f.buf, "hé");
    }

    #[test]
    fn quoting_escapes_controls() {
        let mut f = Formatter::default();
        f.fmt_quoted("a\"b\n\x01");
        assert_eq!(f.buf, "\"a\\\"b\\n\\x01\"");
    }

    #[test]
    fn hex_with_space_and_sharp() {
        let mut f = Formatter::default();
        f.fmt_hex(b"ab", false);
        assert_eq!(f.buf, "6162");

        let mut f = Formatter::default();
        f.flags.space = true;
        f.flags.sharp = true;
        f.fmt_hex(b"ab", false);
        assert_eq!(f.buf, "0x61 0x62");
    }
}
