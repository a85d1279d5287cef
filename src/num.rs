//! Integer digit emission.
//!
//! Digits are written right-to-left into a scratch buffer sized for the worst
//! case (64 binary digits plus sign and a two-character prefix); precision
//! zero-fill and zero-flag width fill happen inside the same pass so padding
//! never has to re-inspect the number. Base 10 uses divide/mod; the
//! power-of-two bases use shift/mask.

use crate::state::Formatter;

pub(crate) const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
pub(crate) const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

const DEC_SINGLES: &str = "0123456789";
const DEC_PAIRS: &str = "0001020304050607080910111213141516171819\
                         2021222324252627282930313233343536373839\
                         4041424344454647484950515253545556575859\
                         6061626364656667686970717273747576777879\
                         8081828384858687888990919293949596979899";

/// Precomputed decimal text for 0..=99, shortcutting the common case of a
/// small non-negative integer with no flags and no width.
#[inline]
pub(crate) fn small_decimal(n: u64) -> &'static str {
    debug_assert!(n < 100);
    let n = n as usize;
    if n < 10 {
        &DEC_SINGLES[n..n + 1]
    } else {
        &DEC_PAIRS[2 * n..2 * n + 2]
    }
}

/// Converts a magnitude to its digit string in the given base.
///
/// Sign and prefix assembly stay with the caller; this is the bare
/// base-conversion used by the address verb and by tests.
pub(crate) fn encode(mut mag: u64, base: u32, uppercase: bool) -> String {
    debug_assert!(matches!(base, 2 | 8 | 10 | 16));
    let digits = if uppercase { UPPER_DIGITS } else { LOWER_DIGITS };
    let mut scratch = [0u8; 64];
    let mut i = scratch.len();
    match base {
        10 => {
            while mag >= 10 {
                i -= 1;
                scratch[i] = b'0' + (mag % 10) as u8;
                mag /= 10;
            }
            i -= 1;
            scratch[i] = b'0' + mag as u8;
        }
        16 => {
            while mag >= 16 {
                i -= 1;
                scratch[i] = digits[(mag & 0xF) as usize];
                mag >>= 4;
            }
            i -= 1;
            scratch[i] = digits[mag as usize];
        }
        8 => {
            while mag >= 8 {
                i -= 1;
                scratch[i] = b'0' + (mag & 7) as u8;
                mag >>= 3;
            }
            i -= 1;
            scratch[i] = b'0' + mag as u8;
        }
        _ => {
            while mag >= 2 {
                i -= 1;
                scratch[i] = b'0' + (mag & 1) as u8;
                mag >>= 1;
            }
            i -= 1;
            scratch[i] = b'0' + mag as u8;
        }
    }
    // Digits are ASCII by construction.
    String::from_utf8_lossy(&scratch[i..]).into_owned()
}

impl Formatter {
    /// Renders an integer magnitude with sign, base prefix, precision fill,
    /// and width padding.
    pub(crate) fn fmt_integer(&mut self, mag: u64, negative: bool, verb: char, base: u32) {
        let f = self.flags;

        if !negative
            && base == 10
            && mag < 100
            && !f.wid_present
            && !f.prec_present
            && !f.plus
            && !f.space
            && !f.sharp
        {
            self.buf.push_str(small_decimal(mag));
            return;
        }

        let digits = if verb == 'X' { UPPER_DIGITS } else { LOWER_DIGITS };

        // Explicit precision wins over zero-fill; zero-fill to width is folded
        // into the same fill count so zeros land between sign and digits.
        let mut fill_to: usize = 0;
        if f.prec_present {
            if f.prec == 0 && mag == 0 {
                // Zero with precision zero renders no digits at all.
                self.pad("");
                return;
            }
            fill_to = f.prec;
        } else if f.zero && !f.minus && f.wid_present {
            let mut w = f.wid;
            if negative || f.plus || f.space {
                w = w.saturating_sub(1);
            }
            if verb == 'O' {
                w = w.saturating_sub(2);
            } else if f.sharp {
                w = w.saturating_sub(match base {
                    8 => 1,
                    _ => 2,
                });
            }
            fill_to = w;
        }

        let cap = 72 + fill_to;
        let mut scratch = vec![0u8; cap];
        let mut i = cap;
        let mut m = mag;
        match base {
            10 => {
                while m >= 10 {
                    i -= 1;
                    scratch[i] = b'0' + (m % 10) as u8;
                    m /= 10;
                }
                i -= 1;
                scratch[i] = b'0' + m as u8;
            }
            16 => {
                while m >= 16 {
                    i -= 1;
                    scratch[i] = digits[(m & 0xF) as usize];
                    m >>= 4;
                }
                i -= 1;
                scratch[i] = digits[m as usize];
            }
            8 => {
                while m >= 8 {
                    i -= 1;
                    scratch[i] = b'0' + (m & 7) as u8;
                    m >>= 3;
                }
                i -= 1;
                scratch[i] = b'0' + m as u8;
            }
            _ => {
                while m >= 2 {
                    i -= 1;
                    scratch[i] = b'0' + (m & 1) as u8;
                    m >>= 1;
                }
                i -= 1;
                scratch[i] = b'0' + m as u8;
            }
        }

        while cap - i < fill_to {
            i -= 1;
            scratch[i] = b'0';
        }

        if verb == 'O' {
            i -= 1;
            scratch[i] = b'o';
            i -= 1;
            scratch[i] = b'0';
        } else if f.sharp {
            match base {
                2 => {
                    i -= 1;
                    scratch[i] = if verb == 'B' { b'B' } else { b'b' };
                    i -= 1;
                    scratch[i] = b'0';
                }
                8 => {
                    if scratch[i] != b'0' {
                        i -= 1;
                        scratch[i] = b'0';
                    }
                }
                16 => {
                    i -= 1;
                    scratch[i] = if verb == 'X' { b'X' } else { b'x' };
                    i -= 1;
                    scratch[i] = b'0';
                }
                _ => {}
            }
        }

        if negative {
            i -= 1;
            scratch[i] = b'-';
        } else if f.plus {
            i -= 1;
            scratch[i] = b'+';
        } else if f.space {
            i -= 1;
            scratch[i] = b' ';
        }

        let body = std::str::from_utf8(&scratch[i..]).unwrap_or_default();
        self.pad(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_table_matches_decimal() {
        for n in 0..100u64 {
            assert_eq!(small_decimal(n), n.to_string());
        }
    }

    #[test]
    fn encode_all_bases() {
        assert_eq!(encode(255, 16, false), "ff");
        assert_eq!(encode(255, 16, true), "FF");
        assert_eq!(encode(8, 8, false), "10");
        assert_eq!(encode(5, 2, false), "101");
        assert_eq!(encode(0, 10, false), "0");
        assert_eq!(encode(u64::MAX, 2, false).len(), 64);
    }

    #[test]
    fn encode_roundtrips() {
        for &mag in &[0u64, 1, 7, 64, 12345, u64::MAX] {
            for &base in &[2u32, 8, 10, 16] {
                let s = encode(mag, base, false);
                assert_eq!(u64::from_str_radix(&s, base).unwrap(), mag);
            }
        }
    }
}
