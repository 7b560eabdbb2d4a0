//! Strict decimal parsing for integer and floating-point option values.
//!
//! Neither parser trims whitespace or accepts anything beyond the grammar
//! below; a token that is not entirely consumed is rejected.

/// Parse `[+-]digits` into an `i64`, rejecting overflow.
pub fn parse_i64(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let (neg, digits) = match bytes.first()? {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return None;
    }

    // Accumulate unsigned, then range-check against the signed limits.
    let limit: u64 = if neg {
        i64::MAX as u64 + 1
    } else {
        i64::MAX as u64
    };
    let mut acc: u64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return None;
        }
        let d = (c - b'0') as u64;
        if acc > limit / 10 || (acc == limit / 10 && d > limit % 10) {
            return None;
        }
        acc = acc * 10 + d;
    }

    if neg {
        Some((acc as i64).wrapping_neg())
    } else {
        Some(acc as i64)
    }
}

/// Parse an integer that must fit an `i32`.
pub fn parse_int(s: &str) -> Option<i32> {
    parse_i64(s).and_then(|v| i32::try_from(v).ok())
}

const POW10: [f64; 9] = [1e1, 1e2, 1e4, 1e8, 1e16, 1e32, 1e64, 1e128, 1e256];
const POW10_EXP: [i64; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

// Exact up to 10^19, the widest fraction kept in a u64.
const FRAC_SCALE: [f64; 20] = [
    1.0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19,
];

const MAX_EXPONENT: i64 = 308;
const UNDERFLOW_EXPONENT: i64 = -400;

/// Parse `[+-] digits [. digits] [(e|E) [+-] digits]` into an `f64`.
///
/// Either the integer or the fraction digits may be empty, not both; a
/// `.` must be followed by at least one digit. Exponents above 308
/// overflow (`None`), strongly negative ones collapse to signed zero.
pub fn parse_double(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;

    let neg = match bytes.first()? {
        b'-' => {
            i += 1;
            true
        }
        b'+' => {
            i += 1;
            false
        }
        _ => false,
    };
    if i == bytes.len() {
        return None;
    }

    // Integer part. Digits past u64 precision only shift the exponent.
    let mut int_part: u64 = 0;
    let mut int_shift: i64 = 0;
    let mut have_int = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        let d = (bytes[i] - b'0') as u64;
        if int_part <= (u64::MAX - d) / 10 {
            int_part = int_part * 10 + d;
        } else {
            int_shift += 1;
        }
        have_int = true;
        i += 1;
    }

    // Fraction: 19 digits exact, the tail accumulated by weight.
    let mut frac_acc: u64 = 0;
    let mut frac_digits = 0usize;
    let mut frac_tail = 0.0f64;
    let mut tail_scale = 1e-20f64;
    let mut have_frac = false;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            let d = (bytes[i] - b'0') as u64;
            if frac_digits < 19 {
                frac_acc = frac_acc * 10 + d;
            } else {
                frac_tail += d as f64 * tail_scale;
                tail_scale *= 0.1;
            }
            frac_digits += 1;
            have_frac = true;
            i += 1;
        }
        if !have_frac {
            return None;
        }
    }

    if !have_int && !have_frac {
        return None;
    }

    let mut exponent: i64 = 0;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        let exp_neg = match bytes.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            Some(_) => false,
            None => return None,
        };
        let mut got_digit = false;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            if exponent < 10_000 {
                exponent = exponent * 10 + (bytes[i] - b'0') as i64;
            }
            got_digit = true;
            i += 1;
        }
        if !got_digit {
            return None;
        }
        if exp_neg {
            exponent = -exponent;
        }
    }

    if i != bytes.len() {
        return None;
    }

    let mut value = int_part as f64;
    if frac_digits > 0 {
        let used = frac_digits.min(19);
        value += frac_acc as f64 / FRAC_SCALE[used] + frac_tail;
    }

    let signed_zero = if neg { -0.0 } else { 0.0 };
    if value == 0.0 {
        return Some(signed_zero);
    }

    let total = exponent + int_shift;
    if total > MAX_EXPONENT {
        return None;
    }
    if total < UNDERFLOW_EXPONENT {
        return Some(signed_zero);
    }

    let mut scaled = value;
    let mut rest = total.abs();
    for k in (0..POW10.len()).rev() {
        if rest >= POW10_EXP[k] {
            if total > 0 {
                scaled *= POW10[k];
                if !scaled.is_finite() {
                    return None;
                }
            } else {
                scaled /= POW10[k];
            }
            rest -= POW10_EXP[k];
        }
    }

    Some(if neg { -scaled } else { scaled })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_accepts_sign_and_digits() {
        assert_eq!(parse_int("16"), Some(16));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("007"), Some(7));
    }

    #[test]
    fn int_rejects_garbage() {
        for s in ["", "-", "+", "1.5", "12a", " 3", "3 ", "0x10", "1e3", "--1"] {
            assert_eq!(parse_int(s), None, "{:?}", s);
        }
    }

    #[test]
    fn int_range_is_checked() {
        assert_eq!(parse_int("2147483647"), Some(i32::MAX));
        assert_eq!(parse_int("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_int("2147483648"), None);
        assert_eq!(parse_int("-2147483649"), None);
    }

    #[test]
    fn i64_limits() {
        assert_eq!(parse_i64("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_i64("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_i64("9223372036854775808"), None);
        assert_eq!(parse_i64("99999999999999999999"), None);
    }

    #[test]
    fn double_basic_forms() {
        assert_eq!(parse_double("0"), Some(0.0));
        assert_eq!(parse_double("3"), Some(3.0));
        assert_eq!(parse_double("-2.5"), Some(-2.5));
        assert_eq!(parse_double("+0.25"), Some(0.25));
        assert_eq!(parse_double(".5"), Some(0.5));
        assert_eq!(parse_double("1.5e3"), Some(1500.0));
        assert_eq!(parse_double("15E-1"), Some(1.5));
        assert_eq!(parse_double("2e+2"), Some(200.0));
    }

    #[test]
    fn double_rejects_malformed() {
        for s in ["", "+", "-", ".", "1.", "e5", "1e", "1e+", "1.2.3", "abc", "1,5", "nan", "inf"] {
            assert_eq!(parse_double(s), None, "{:?}", s);
        }
    }

    #[test]
    fn double_close_to_std() {
        for s in ["0.1", "123.456", "6.02214076e23", "1e-10", "9.999e100", "2.2250738585072014e-308"] {
            let ours = parse_double(s).unwrap();
            let std: f64 = s.parse().unwrap();
            let rel = ((ours - std) / std).abs();
            assert!(rel < 1e-12, "{}: {} vs {}", s, ours, std);
        }
    }

    #[test]
    fn double_overflow_and_underflow() {
        assert_eq!(parse_double("1e309"), None);
        let max = parse_double("1e308").unwrap();
        assert!((max / 1e308 - 1.0).abs() < 1e-12);
        assert_eq!(parse_double("9e308"), None);
        let z = parse_double("-1e-500").unwrap();
        assert_eq!(z, 0.0);
        assert!(z.is_sign_negative());
        let z = parse_double("-0.0").unwrap();
        assert!(z.is_sign_negative());
    }

    #[test]
    fn double_long_integer_part_keeps_magnitude() {
        let s = format!("1{}", "0".repeat(30));
        let v = parse_double(&s).unwrap();
        assert!((v / 1e30 - 1.0).abs() < 1e-12);
    }
}
