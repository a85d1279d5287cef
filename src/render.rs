//! Kind-directed rendering over [`Value`].
//!
//! Two tiers share these routines: the dispatcher tries [`render_scalar`]
//! first (the fast path for concrete scalar kinds), and falls back to
//! [`render_value`] for composites, references, and capability-bearing
//! values. The fallback recurses through sequences, maps, and records, calls
//! back into the scalar tier for leaves, and tracks reference identities in
//! the visited set so self-referential data terminates.
//!
//! [`render_scalar`]: Formatter::render_scalar
//! [`render_value`]: Formatter::render_value

use crate::state::{Formatter, CYCLIC, NIL_ANGLE, NIL_PAREN, PANIC_PREFIX, PERCENT_BANG};
use crate::value::{Formattable, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Code point for an integer under `%c`/`%q`; out-of-range values render the
/// replacement character.
fn code_point(mag: u64, negative: bool) -> char {
    if negative {
        return char::REPLACEMENT_CHARACTER;
    }
    u32::try_from(mag)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl Formatter {
    /// Renders a concrete scalar under the given verb. Returns false when the
    /// kind is not a fast-path scalar and the reflective tier must take over.
    pub(crate) fn render_scalar(&mut self, value: &Value, verb: char) -> bool {
        match value {
            Value::Bool(b) => match verb {
                'v' | 't' => self.fmt_bool(*b),
                _ => self.bad_verb(verb, value),
            },
            Value::Int(i) => self.render_integer(i.unsigned_abs(), *i < 0, verb, value),
            Value::Uint(u) => self.render_integer(*u, false, verb, value),
            Value::F32(v) => match verb {
                'v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' => self.fmt_f32(*v, verb),
                _ => self.bad_verb(verb, value),
            },
            Value::F64(v) => match verb {
                'v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' => self.fmt_f64(*v, verb),
                _ => self.bad_verb(verb, value),
            },
            Value::Complex(re, im) => match verb {
                'v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' => self.fmt_complex(*re, *im, verb),
                _ => self.bad_verb(verb, value),
            },
            Value::Char(c) => match verb {
                'v' | 'c' | 's' => self.fmt_char(*c),
                'q' => self.fmt_quoted_char(*c),
                'd' => self.fmt_integer(*c as u64, false, verb, 10),
                'b' | 'B' => self.fmt_integer(*c as u64, false, verb, 2),
                'o' | 'O' => self.fmt_integer(*c as u64, false, verb, 8),
                'x' | 'X' => self.fmt_integer(*c as u64, false, verb, 16),
                _ => self.bad_verb(verb, value),
            },
            Value::Str(s) => match verb {
                'v' if self.flags.sharp_v => self.fmt_quoted(s),
                'v' | 's' => self.fmt_str(s),
                'q' => self.fmt_quoted(s),
                'x' => self.fmt_hex(s.as_bytes(), false),
                'X' => self.fmt_hex(s.as_bytes(), true),
                _ => self.bad_verb(verb, value),
            },
            Value::Bytes(data) => match verb {
                'v' | 's' => self.fmt_bytes(data),
                'q' => {
                    let text = String::from_utf8_lossy(data).into_owned();
                    self.fmt_quoted(&text);
                }
                'x' => self.fmt_hex(data, false),
                'X' => self.fmt_hex(data, true),
                _ => self.bad_verb(verb, value),
            },
            _ => return false,
        }
        true
    }

    fn render_integer(&mut self, mag: u64, negative: bool, verb: char, value: &Value) {
        match verb {
            'v' | 'd' => self.fmt_integer(mag, negative, verb, 10),
            'b' | 'B' => self.fmt_integer(mag, negative, verb, 2),
            'o' | 'O' => self.fmt_integer(mag, negative, verb, 8),
            'x' | 'X' => self.fmt_integer(mag, negative, verb, 16),
            'c' => self.fmt_char(code_point(mag, negative)),
            'q' => self.fmt_quoted_char(code_point(mag, negative)),
            _ => self.bad_verb(verb, value),
        }
    }

    /// Reflective rendering with width applied to the whole result: the
    /// composite is assembled at the buffer tail without padding, then the
    /// tail is re-emitted through [`Formatter::pad`].
    pub(crate) fn render_composite(&mut self, value: &Value, verb: char) {
        if !self.flags.wid_present {
            self.render_value(value, verb);
            return;
        }
        let start = self.buf.len();
        let saved = self.flags;
        self.flags.wid = 0;
        self.flags.wid_present = false;
        self.flags.minus = false;
        self.render_value(value, verb);
        self.flags = saved;
        let body = self.buf.split_off(start);
        self.pad(&body);
    }

    /// The reflective tier: composites, references, and capability-bearing
    /// values. Scalar leaves funnel back through [`Self::render_scalar`] so
    /// both tiers stay byte-for-byte consistent.
    pub(crate) fn render_value(&mut self, value: &Value, verb: char) {
        if let Value::Null = value {
            // The syntax form spells nested nil differently.
            if verb == 'v' && self.flags.sharp_v {
                self.buf.push_str(NIL_PAREN);
            } else {
                self.buf.push_str(NIL_ANGLE);
            }
            return;
        }

        // Capability dispatch happens before any type wrapping, so a syntax
        // or error text replaces the whole rendering.
        if let Value::Dyn(d) = value {
            if !self.handle_capabilities(d, verb) {
                if verb == 'v' {
                    let name = d.type_name().to_string();
                    self.buf.push_str(&name);
                } else {
                    self.bad_verb(verb, value);
                }
            }
            return;
        }

        // Reference identity check happens on every descent. An identity is
        // held only while its subtree renders, so a reference repeated on
        // the current path is a cycle while two siblings sharing a pointee
        // are not.
        if let Value::Ref(cell) = value {
            let id = Rc::as_ptr(cell) as usize;
            if !self.visited.insert(id) {
                self.buf.push('&');
                self.buf.push_str(&cell.borrow().type_name());
                self.buf.push_str(CYCLIC);
                return;
            }
        }

        let wrap = verb == 'v' && self.flags.sharp_v && !self.recursing;
        if wrap {
            self.buf.push_str(&value.type_name());
            // Records supply their own braces; every other kind is wrapped
            // in parentheses.
            if !matches!(value, Value::Struct { .. }) {
                self.buf.push('(');
            }
        }

        let was_recursing = self.recursing;
        self.recursing = true;
        self.render_body(value, verb);
        self.recursing = was_recursing;

        if let Value::Ref(cell) = value {
            self.visited.remove(&(Rc::as_ptr(cell) as usize));
        }

        if wrap && !matches!(value, Value::Struct { .. }) {
            self.buf.push(')');
        }
    }

    fn render_body(&mut self, value: &Value, verb: char) {
        match value {
            Value::Seq(items) => {
                self.buf.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(' ');
                    }
                    self.render_element(item, verb);
                }
                self.buf.push(']');
            }
            Value::Map(map) => {
                self.buf.push_str(crate::state::MAP_PREFIX);
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(' ');
                    }
                    self.buf.push_str(k);
                    self.buf.push(':');
                    self.render_element(v, verb);
                }
                self.buf.push(']');
            }
            Value::Struct { fields, .. } => {
                let named = self.flags.plus_v || self.flags.sharp_v;
                self.buf.push('{');
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(' ');
                    }
                    if named {
                        self.buf.push_str(name);
                        self.buf.push(':');
                    }
                    self.render_element(v, verb);
                }
                self.buf.push('}');
            }
            Value::Ref(cell) => {
                self.buf.push('&');
                let inner = cell.borrow();
                self.render_element(&inner, verb);
            }
            other => {
                if !self.render_scalar(other, verb) {
                    self.buf.push_str(NIL_ANGLE);
                }
            }
        }
    }

    /// Nested elements never pad individually; width applies to the whole
    /// composite, which the dispatcher already handled.
    fn render_element(&mut self, value: &Value, verb: char) {
        let saved = self.flags;
        self.flags.wid = 0;
        self.flags.wid_present = false;
        self.flags.minus = false;
        self.render_value(value, verb);
        self.flags = saved;
    }

    /// Capability dispatch with panic containment. Priority: syntax form
    /// under the alternate flag, then the error capability for any verb,
    /// then the display capability for `v`/`s`.
    pub(crate) fn handle_capabilities(&mut self, d: &Rc<dyn Formattable>, verb: char) -> bool {
        if self.flags.sharp_v && self.try_capability(d, verb, "Syntax", |f| f.syntax_text()) {
            return true;
        }
        if self.try_capability(d, verb, "Error", |f| f.error_text()) {
            return true;
        }
        if verb == 'v' || verb == 's' {
            return self.try_capability(d, verb, "Display", |f| f.display_text());
        }
        false
    }

    fn try_capability(
        &mut self,
        d: &Rc<dyn Formattable>,
        verb: char,
        method: &str,
        call: fn(&dyn Formattable) -> Option<String>,
    ) -> bool {
        match catch_unwind(AssertUnwindSafe(|| call(d.as_ref()))) {
            Ok(Some(text)) => {
                self.capability_text(&text, verb);
                true
            }
            Ok(None) => false,
            Err(payload) => {
                self.buf.push_str(PERCENT_BANG);
                self.buf.push(verb);
                self.buf.push_str(PANIC_PREFIX);
                self.buf.push_str(method);
                self.buf.push_str(" method: ");
                let text = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| String::from("?"));
                self.fmt_str(&text);
                self.buf.push(')');
                true
            }
        }
    }

    /// Routes capability output through the string renderers. The quoting
    /// and hex verbs keep their meaning; every other verb takes the text
    /// as-is, which is what lets the error capability serve any verb.
    fn capability_text(&mut self, text: &str, verb: char) {
        match verb {
            'q' => self.fmt_quoted(text),
            'x' => self.fmt_hex(text.as_bytes(), false),
            'X' => self.fmt_hex(text.as_bytes(), true),
            _ => self.fmt_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn render(value: &Value, verb: char) -> String {
        let mut f = Formatter::default();
        f.render_value(value, verb);
        f.buf
    }

    #[test]
    fn sequences_space_separate() {
        let v = Value::seq(vec![1, 2, 3]);
        assert_eq!(render(&v, 'v'), "[1 2 3]");
    }

    #[test]
    fn nested_composites() {
        let inner = Value::seq(vec![1, 2]);
        let v = Value::Seq(vec![inner, Value::from("x")]);
        assert_eq!(render(&v, 'v'), "[[1 2] x]");
    }

    #[test]
    fn maps_keep_insertion_order() {
        let mut m = crate::ValueMap::new();
        m.insert("b", Value::from(2));
        m.insert("a", Value::from(1));
        assert_eq!(render(&Value::Map(m), 'v'), "map[b:2 a:1]");
    }

    #[test]
    fn record_field_names_under_plus_v() {
        let v = Value::record(
            "Point",
            vec![("x", Value::from(1)), ("y", Value::from(2))],
        );
        assert_eq!(render(&v, 'v'), "{1 2}");

        let mut f = Formatter::default();
        f.flags.plus_v = true;
        f.render_value(&v, 'v');
        assert_eq!(f.buf, "{x:1 y:2}");
    }

    #[test]
    fn sharp_v_wraps_outermost_only() {
        let v = Value::record("Point", vec![("x", Value::from(1))]);
        let mut f = Formatter::default();
        f.flags.sharp_v = true;
        f.render_value(&v, 'v');
        assert_eq!(f.buf, "Point{x:1}");

        let seq = Value::seq(vec![1, 2]);
        let mut f = Formatter::default();
        f.flags.sharp_v = true;
        f.render_value(&seq, 'v');
        assert_eq!(f.buf, "seq([1 2])");
    }

    #[test]
    fn references_dereference_with_ampersand() {
        let v = Value::reference(Value::from(7));
        assert_eq!(render(&v, 'v'), "&7");
    }

    #[test]
    fn cycles_terminate() {
        let cell = Rc::new(RefCell::new(Value::Null));
        let node = Value::record(
            "Node",
            vec![("next", Value::Ref(Rc::clone(&cell)))],
        );
        *cell.borrow_mut() = node;
        let out = render(&Value::Ref(cell), 'v');
        assert!(out.contains("(CYCLIC REFERENCE)"), "{out}");
    }

    struct Panicky;
    impl Formattable for Panicky {
        fn type_name(&self) -> &str {
            "Panicky"
        }
        fn display_text(&self) -> Option<String> {
            panic!("boom");
        }
    }

    #[test]
    fn capability_panics_are_contained() {
        let v = Value::dynamic(Panicky);
        let out = render(&v, 'v');
        assert_eq!(out, "%!v(PANIC=Display method: boom)");
    }

    struct Plain;
    impl Formattable for Plain {
        fn type_name(&self) -> &str {
            "Plain"
        }
    }

    #[test]
    fn capability_less_dyn_falls_back_to_type_name() {
        let v = Value::dynamic(Plain);
        assert_eq!(render(&v, 'v'), "Plain");
    }
}
