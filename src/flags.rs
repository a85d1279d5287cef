//! Per-verb formatting directives.
//!
//! A [`Flags`] value captures everything parsed between a `%` and its verb:
//! the flag characters `# 0 + - ' '`, the width and precision (with explicit
//! presence booleans, since `0` is a meaningful width), and the two
//! `v`-specific reinterpretations of `+` and `#` (field names and type-wrapped
//! syntax form). Flags are reset before each verb, not before each call.

/// Parsed directives for the verb currently being rendered.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Flags {
    pub wid: usize,
    pub prec: usize,
    pub wid_present: bool,
    pub prec_present: bool,
    /// `-` left-justify.
    pub minus: bool,
    /// `+` force sign on numbers.
    pub plus: bool,
    /// `#` alternate form (base prefixes, syntax hooks).
    pub sharp: bool,
    /// Space flag: leading space in place of a sign for non-negative numbers.
    pub space: bool,
    /// `0` zero-fill instead of space padding.
    pub zero: bool,
    /// `+` applied to the `v` verb: render aggregate field names.
    pub plus_v: bool,
    /// `#` applied to the `v` verb: type-wrapped syntax form.
    pub sharp_v: bool,
}

impl Flags {
    /// Resets every directive; called once per verb.
    #[inline]
    pub(crate) fn clear(&mut self) {
        *self = Flags::default();
    }
}
