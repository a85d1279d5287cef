//! Floating-point rendering.
//!
//! The standard formatter supplies round-trip shortest decimal output and
//! fixed-precision expansion; this module reshapes that into the verb
//! surface: explicit exponent signs with two-digit minimum exponents,
//! the fixed/exponent switch for `g`, trailing-zero trimming, and the
//! alternate-form decimal point under `#`.

use crate::state::Formatter;

/// Decimal exponent of a finite non-zero value, read back from the shortest
/// exponential rendering.
fn exponent_of(v: f64) -> i32 {
    let s = format!("{:e}", v);
    match s.rsplit_once('e') {
        Some((_, e)) => e.parse().unwrap_or(0),
        None => 0,
    }
}

/// Rewrites a `3.141500e0`-style tail into `3.141500e+00`.
fn fix_exponent(s: &str, uppercase: bool) -> String {
    let (mantissa, exp) = match s.rsplit_once('e') {
        Some(parts) => parts,
        None => (s, "0"),
    };
    let e: i32 = exp.parse().unwrap_or(0);
    let marker = if uppercase { 'E' } else { 'e' };
    let sign = if e < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, marker, sign, e.unsigned_abs())
}

fn trim_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0');
    s.strip_suffix('.').unwrap_or(s)
}

/// `g`-style output with an explicit significant-digit count.
fn general(v: f64, prec: usize, uppercase: bool, sharp: bool) -> String {
    let prec = prec.max(1);
    let exp = if v == 0.0 { 0 } else { exponent_of(v) };
    if exp < -4 || exp >= prec as i32 {
        let body = fix_exponent(&format!("{:.*e}", prec - 1, v), uppercase);
        if sharp {
            return body;
        }
        match body.split_once(if uppercase { 'E' } else { 'e' }) {
            Some((m, e)) => {
                let marker = if uppercase { "E" } else { "e" };
                format!("{}{}{}", trim_zeros(m), marker, e)
            }
            None => body,
        }
    } else {
        let frac = (prec as i32 - 1 - exp).max(0) as usize;
        let body = format!("{:.*}", frac, v);
        if sharp {
            body
        } else {
            trim_zeros(&body).to_string()
        }
    }
}

/// Shortest `g`-style output: fixed form unless the exponent falls outside
/// [-4, 21).
fn general_shortest(v: f64, short: &str, uppercase: bool) -> String {
    let exp = if v == 0.0 { 0 } else { exponent_of(v) };
    if exp < -4 || exp >= 21 {
        fix_exponent(short, uppercase)
    } else {
        format!("{}", v)
    }
}

impl Formatter {
    pub(crate) fn fmt_f64(&mut self, v: f64, verb: char) {
        let short = format!("{:e}", v);
        self.fmt_float_inner(v, verb, short);
    }

    /// Single-precision values format through their own shortest rendering so
    /// `0.1f32` stays `0.1` rather than its eight-digit f64 expansion.
    pub(crate) fn fmt_f32(&mut self, v: f32, verb: char) {
        if self.flags.prec_present {
            // Explicit precision expands the same digits either way.
            self.fmt_float_inner(v as f64, verb, format!("{:e}", v));
            return;
        }
        match verb {
            'v' | 'g' | 'G' => {
                let exp = if v == 0.0 {
                    0
                } else {
                    exponent_of(v as f64)
                };
                let body = if exp < -4 || exp >= 21 {
                    fix_exponent(&format!("{:e}", v), verb == 'G')
                } else {
                    format!("{}", v)
                };
                self.finish_float(v.is_sign_negative(), v.is_nan(), body);
            }
            _ => self.fmt_float_inner(v as f64, verb, format!("{:e}", v)),
        }
    }

    fn fmt_float_inner(&mut self, v: f64, verb: char, short: String) {
        if v.is_nan() || v.is_infinite() {
            self.fmt_float_special(v);
            return;
        }
        let f = self.flags;
        let uppercase = matches!(verb, 'E' | 'G' | 'F');
        let body = match verb {
            'f' | 'F' => {
                let prec = if f.prec_present { f.prec } else { 6 };
                format!("{:.*}", prec, v)
            }
            'e' | 'E' => {
                let prec = if f.prec_present { f.prec } else { 6 };
                fix_exponent(&format!("{:.*e}", prec, v), verb == 'E')
            }
            'g' | 'G' => {
                if f.prec_present {
                    general(v, f.prec, verb == 'G', f.sharp)
                } else {
                    general_shortest(v, &short, verb == 'G')
                }
            }
            // The default verb renders like shortest g.
            _ => general_shortest(v, &short, uppercase),
        };
        self.finish_float(v.is_sign_negative(), false, body);
    }

    /// Applies the sign flags and zero-aware padding to an assembled body.
    fn finish_float(&mut self, negative: bool, nan: bool, body: String) {
        let signed = if !nan && !negative && (self.flags.plus || self.flags.space) {
            let mut s = String::with_capacity(body.len() + 1);
            s.push(if self.flags.plus { '+' } else { ' ' });
            s.push_str(&body);
            s
        } else {
            body
        };
        self.pad_number(&signed);
    }

    /// NaN and the infinities: fixed spellings, space padding only.
    fn fmt_float_special(&mut self, v: f64) {
        let text = if v.is_nan() {
            if self.flags.plus {
                "+NaN"
            } else if self.flags.space {
                " NaN"
            } else {
                "NaN"
            }
        } else if v > 0.0 {
            if self.flags.plus {
                "+Inf"
            } else if self.flags.space {
                " Inf"
            } else {
                "+Inf"
            }
        } else {
            "-Inf"
        };
        let saved_zero = self.flags.zero;
        self.flags.zero = false;
        self.pad(text);
        self.flags.zero = saved_zero;
    }

    /// Complex rendering: `(re+imi)`. The plus flag is forced on the
    /// imaginary part so it always carries a sign.
    pub(crate) fn fmt_complex(&mut self, re: f64, im: f64, verb: char) {
        let mut part = Formatter::default();
        part.flags = self.flags;
        part.flags.wid_present = false;
        part.flags.wid = 0;
        part.flags.zero = false;
        part.buf.push('(');
        part.fmt_f64(re, verb);
        part.flags.plus = true;
        part.flags.space = false;
        part.fmt_f64(im, verb);
        part.buf.push('i');
        part.buf.push(')');
        let body = part.buf;
        self.pad(&body);
    }
}
