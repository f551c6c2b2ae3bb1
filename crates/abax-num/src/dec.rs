//! Arbitrary-precision decimal floating point.
//!
//! `BigDecimal` supplies the digit arithmetic; this wrapper adds the
//! IEEE-style specials the calculator needs (`1/0` is the decimal
//! infinity, not an error) and rounds every result to the context
//! precision.

use abax_common::{CalcError, CalcResult};
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Dec {
    Num(BigDecimal),
    /// `true` for negative infinity.
    Inf(bool),
    NaN,
}

fn count_digits(i: &BigInt) -> i64 {
    if i.is_zero() {
        return 1;
    }
    // number of decimal digits of |i|
    i.magnitude().to_string().len() as i64
}

fn pow10(n: u64) -> BigInt {
    BigInt::from(10u32).pow(n as u32)
}

impl Dec {
    pub fn zero() -> Dec {
        Dec::Num(BigDecimal::zero())
    }

    pub fn one() -> Dec {
        Dec::Num(BigDecimal::one())
    }

    pub fn nan() -> Dec {
        Dec::NaN
    }

    pub fn inf(negative: bool) -> Dec {
        Dec::Inf(negative)
    }

    pub fn from_bigint(i: &BigInt) -> Dec {
        Dec::Num(BigDecimal::from(i.clone()))
    }

    pub fn from_i64(i: i64) -> Dec {
        Dec::Num(BigDecimal::from(i))
    }

    pub fn from_f64(x: f64) -> Dec {
        if x.is_nan() {
            Dec::NaN
        } else if x.is_infinite() {
            Dec::Inf(x < 0.0)
        } else {
            match BigDecimal::from_f64(x) {
                Some(d) => Dec::Num(d),
                None => Dec::NaN,
            }
        }
    }

    /// Parse a plain decimal literal (`123.45`, `1e-3`, …).
    pub fn parse(s: &str, prec: u32) -> CalcResult<Dec> {
        let d = BigDecimal::from_str(s)
            .map_err(|_| CalcError::syntax(format!("invalid number '{s}'")))?;
        Ok(Dec::Num(d).round_prec(prec))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Dec::NaN)
    }

    pub fn is_inf(&self) -> bool {
        matches!(self, Dec::Inf(_))
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Dec::Num(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Dec::Num(d) if d.is_zero())
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Dec::Num(d) => d.is_negative(),
            Dec::Inf(neg) => *neg,
            Dec::NaN => false,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Dec::Num(d) if d.is_integer())
    }

    /// Round to `prec` significant digits and drop trailing zeros.
    pub fn round_prec(self, prec: u32) -> Dec {
        match self {
            Dec::Num(d) => {
                let d = if d.digits() > prec as u64 {
                    d.with_prec(prec as u64)
                } else {
                    d
                };
                Dec::Num(d.normalized())
            }
            other => other,
        }
    }

    pub fn neg(&self) -> Dec {
        match self {
            Dec::Num(d) => Dec::Num(-d),
            Dec::Inf(neg) => Dec::Inf(!neg),
            Dec::NaN => Dec::NaN,
        }
    }

    pub fn abs(&self) -> Dec {
        match self {
            Dec::Num(d) => Dec::Num(d.abs()),
            Dec::Inf(_) => Dec::Inf(false),
            Dec::NaN => Dec::NaN,
        }
    }

    pub fn add(&self, rhs: &Dec, prec: u32) -> Dec {
        match (self, rhs) {
            (Dec::NaN, _) | (_, Dec::NaN) => Dec::NaN,
            (Dec::Inf(a), Dec::Inf(b)) => {
                if a == b {
                    Dec::Inf(*a)
                } else {
                    Dec::NaN
                }
            }
            (Dec::Inf(a), _) => Dec::Inf(*a),
            (_, Dec::Inf(b)) => Dec::Inf(*b),
            (Dec::Num(a), Dec::Num(b)) => Dec::Num(a + b).round_prec(prec),
        }
    }

    pub fn sub(&self, rhs: &Dec, prec: u32) -> Dec {
        self.add(&rhs.neg(), prec)
    }

    pub fn mul(&self, rhs: &Dec, prec: u32) -> Dec {
        match (self, rhs) {
            (Dec::NaN, _) | (_, Dec::NaN) => Dec::NaN,
            (Dec::Inf(a), Dec::Inf(b)) => Dec::Inf(a != b),
            (Dec::Inf(a), Dec::Num(d)) | (Dec::Num(d), Dec::Inf(a)) => {
                if d.is_zero() {
                    Dec::NaN
                } else {
                    Dec::Inf(*a != d.is_negative())
                }
            }
            (Dec::Num(a), Dec::Num(b)) => Dec::Num(a * b).round_prec(prec),
        }
    }

    /// Division correctly rounded (half to even) to `prec` digits.
    /// Division by zero yields ±Inf, and `0/0` yields NaN.
    pub fn div(&self, rhs: &Dec, prec: u32) -> Dec {
        match (self, rhs) {
            (Dec::NaN, _) | (_, Dec::NaN) => Dec::NaN,
            (Dec::Inf(_), Dec::Inf(_)) => Dec::NaN,
            (Dec::Inf(a), Dec::Num(d)) => Dec::Inf(*a != d.is_negative()),
            (Dec::Num(_), Dec::Inf(_)) => Dec::Num(BigDecimal::zero()),
            (Dec::Num(a), Dec::Num(b)) => {
                if b.is_zero() {
                    return if a.is_zero() {
                        Dec::NaN
                    } else {
                        Dec::Inf(a.is_negative())
                    };
                }
                if a.is_zero() {
                    return Dec::Num(BigDecimal::zero());
                }
                let (ia, sa) = a.as_bigint_and_exponent();
                let (ib, sb) = b.as_bigint_and_exponent();
                let negative = ia.is_negative() != ib.is_negative();
                let na = ia.magnitude().clone();
                let nb = ib.magnitude().clone();
                let shift =
                    (prec as i64 + 2 + count_digits(&ib) - count_digits(&ia)).max(0) as u64;
                let num = BigInt::from(na) * pow10(shift);
                let den = BigInt::from(nb);
                let (mut q, r) = num.div_rem(&den);
                // round half to even
                let twice = &r * 2u32;
                match twice.cmp(&den) {
                    Ordering::Greater => q += 1u32,
                    Ordering::Equal => {
                        if q.is_odd() {
                            q += 1u32;
                        }
                    }
                    Ordering::Less => {}
                }
                if negative {
                    q = -q;
                }
                Dec::Num(BigDecimal::new(q, sa - sb + shift as i64)).round_prec(prec)
            }
        }
    }

    /// Floor-convention remainder: `a - floor(a/b)*b` (exact, then
    /// rounded). The result takes the sign of `b`.
    pub fn rem_floor(&self, rhs: &Dec, prec: u32) -> Dec {
        match self.divrem_floor(rhs, prec) {
            Some((_, r)) => r,
            None => Dec::NaN,
        }
    }

    /// Floor division quotient and remainder, exact before rounding.
    pub fn divrem_floor(&self, rhs: &Dec, prec: u32) -> Option<(Dec, Dec)> {
        let (Dec::Num(a), Dec::Num(b)) = (self, rhs) else {
            return None;
        };
        if b.is_zero() {
            return None;
        }
        let (ia, sa) = a.as_bigint_and_exponent();
        let (ib, sb) = b.as_bigint_and_exponent();
        let m = sa.max(sb);
        let na = ia * pow10((m - sa) as u64);
        let nb = ib * pow10((m - sb) as u64);
        let (q, _) = na.div_mod_floor(&nb);
        let qd = Dec::Num(BigDecimal::from(q.clone()));
        let r = Dec::Num(a - BigDecimal::from(q) * b).round_prec(prec);
        Some((qd, r))
    }

    pub fn cmp(&self, rhs: &Dec) -> Option<Ordering> {
        match (self, rhs) {
            (Dec::NaN, _) | (_, Dec::NaN) => None,
            (Dec::Inf(a), Dec::Inf(b)) => Some(b.cmp(a)),
            (Dec::Inf(true), Dec::Num(_)) => Some(Ordering::Less),
            (Dec::Inf(false), Dec::Num(_)) => Some(Ordering::Greater),
            (Dec::Num(_), Dec::Inf(true)) => Some(Ordering::Greater),
            (Dec::Num(_), Dec::Inf(false)) => Some(Ordering::Less),
            (Dec::Num(a), Dec::Num(b)) => a.partial_cmp(b),
        }
    }

    fn with_scale0(&self, mode: RoundingMode) -> Dec {
        match self {
            Dec::Num(d) => Dec::Num(d.with_scale_round(0, mode).normalized()),
            other => other.clone(),
        }
    }

    /// Round toward zero to an integer value (still a Decimal).
    pub fn trunc(&self) -> Dec {
        self.with_scale0(RoundingMode::Down)
    }

    pub fn floor(&self) -> Dec {
        self.with_scale0(RoundingMode::Floor)
    }

    pub fn ceil(&self) -> Dec {
        self.with_scale0(RoundingMode::Ceiling)
    }

    /// Round to nearest, ties away from zero.
    pub fn round_ties_away(&self) -> Dec {
        self.with_scale0(RoundingMode::HalfUp)
    }

    /// Integer part, truncated toward zero. `None` for NaN/Inf.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self.trunc() {
            Dec::Num(d) => {
                let (i, scale) = d.into_bigint_and_exponent();
                // scale <= 0 after truncation to an integer value
                Some(i * pow10((-scale).max(0) as u64))
            }
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Dec::Num(d) => d.to_f64().unwrap_or(f64::NAN),
            Dec::Inf(true) => f64::NEG_INFINITY,
            Dec::Inf(false) => f64::INFINITY,
            Dec::NaN => f64::NAN,
        }
    }

    /// User-facing text form: the stored digits, normalized, always
    /// containing `.` or `e`; `NaN` and `Inf` print literally.
    pub fn to_display_string(&self) -> String {
        let d = match self {
            Dec::NaN => return "NaN".to_string(),
            Dec::Inf(true) => return "-Inf".to_string(),
            Dec::Inf(false) => return "Inf".to_string(),
            Dec::Num(d) => d.normalized(),
        };
        if d.is_zero() {
            return "0.0".to_string();
        }
        let (i, scale) = d.as_bigint_and_exponent();
        let negative = i.is_negative();
        let digits = i.magnitude().to_string();
        let ndigits = digits.len() as i64;
        let adjusted = ndigits - 1 - scale;
        let sign = if negative { "-" } else { "" };
        if (-6..=20).contains(&adjusted) {
            if scale <= 0 {
                // integer value; keep a fractional marker
                let zeros = "0".repeat((-scale) as usize);
                format!("{sign}{digits}{zeros}.0")
            } else if ndigits > scale {
                let (int_part, frac_part) = digits.split_at((ndigits - scale) as usize);
                format!("{sign}{int_part}.{frac_part}")
            } else {
                let zeros = "0".repeat((scale - ndigits) as usize);
                format!("{sign}0.{zeros}{digits}")
            }
        } else {
            let (first, rest) = digits.split_at(1);
            if rest.is_empty() {
                format!("{sign}{first}e{adjusted:+}")
            } else {
                format!("{sign}{first}.{rest}e{adjusted:+}")
            }
        }
    }
}

impl PartialEq for Dec {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Some(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Dec {
        Dec::parse(s, 16).unwrap()
    }

    #[test]
    fn exact_sums_stay_short() {
        let r = dec("0.1").add(&dec("0.2"), 16);
        assert_eq!(r.to_display_string(), "0.3");
    }

    #[test]
    fn integers_keep_a_fraction_marker() {
        assert_eq!(dec("2").to_display_string(), "2.0");
        let r = dec("3.0").mul(&dec("3.0"), 16);
        assert_eq!(r.to_display_string(), "9.0");
    }

    #[test]
    fn division_rounds_to_context_precision() {
        let r = Dec::from_i64(1).div(&Dec::from_i64(4), 16);
        assert_eq!(r.to_display_string(), "0.25");
        let r = Dec::from_i64(2).div(&Dec::from_i64(3), 16);
        assert_eq!(r.to_display_string(), "0.6666666666666667");
    }

    #[test]
    fn division_by_zero_is_signed_infinity() {
        assert_eq!(
            Dec::from_i64(1).div(&Dec::zero(), 16).to_display_string(),
            "Inf"
        );
        assert_eq!(
            Dec::from_i64(-1).div(&Dec::zero(), 16).to_display_string(),
            "-Inf"
        );
        assert!(Dec::zero().div(&Dec::zero(), 16).is_nan());
    }

    #[test]
    fn nan_never_compares() {
        assert_eq!(Dec::nan().cmp(&Dec::nan()), None);
        assert!(Dec::nan() != Dec::nan());
        assert_eq!(
            Dec::inf(true).cmp(&Dec::inf(false)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn rounding_family() {
        assert_eq!(dec("2.5").trunc().to_display_string(), "2.0");
        assert_eq!(dec("-2.5").trunc().to_display_string(), "-2.0");
        assert_eq!(dec("2.5").floor().to_display_string(), "2.0");
        assert_eq!(dec("-2.5").floor().to_display_string(), "-3.0");
        assert_eq!(dec("2.5").ceil().to_display_string(), "3.0");
        assert_eq!(dec("-2.5").ceil().to_display_string(), "-2.0");
        assert_eq!(dec("2.5").round_ties_away().to_display_string(), "3.0");
        assert_eq!(dec("2.4").round_ties_away().to_display_string(), "2.0");
        assert_eq!(dec("-2.5").round_ties_away().to_display_string(), "-3.0");
    }

    #[test]
    fn floor_remainder_takes_divisor_sign() {
        let r = dec("7").rem_floor(&dec("-2"), 16);
        assert_eq!(r.to_display_string(), "-1.0");
    }

    #[test]
    fn large_magnitudes_use_an_exponent() {
        let r = dec("1e30");
        assert_eq!(r.to_display_string(), "1e+30");
        let r = dec("1.5e-9");
        assert_eq!(r.to_display_string(), "1.5e-9");
    }

    #[test]
    fn to_bigint_truncates() {
        assert_eq!(dec("2.9").to_bigint().unwrap(), BigInt::from(2));
        assert_eq!(dec("-2.9").to_bigint().unwrap(), BigInt::from(-2));
        assert!(Dec::nan().to_bigint().is_none());
    }
}
