//! Arbitrary-precision binary floating point on top of the astro-float
//! backend.
//!
//! All operations round to an explicit precision `p` (mantissa bits)
//! with round-to-nearest-even, and transcendentals share the context's
//! constants cache. Conversions between binary and decimal worlds go
//! through the backend's parse/format surface, which round-trips.

use crate::dec::Dec;
use abax_common::{CalcError, CalcResult};
use astro_float::{BigFloat, Consts, Radix, RoundingMode};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use std::cmp::Ordering;
use std::str::FromStr;

const RM: RoundingMode = RoundingMode::ToEven;

#[derive(Debug, Clone)]
pub struct Flt(BigFloat);

impl Flt {
    pub fn nan() -> Flt {
        Flt(astro_float::NAN.clone())
    }

    pub fn inf(negative: bool) -> Flt {
        if negative {
            Flt(astro_float::INF_NEG.clone())
        } else {
            Flt(astro_float::INF_POS.clone())
        }
    }

    pub fn zero(p: usize) -> Flt {
        Flt(BigFloat::from_f64(0.0, p))
    }

    pub fn from_f64(x: f64, p: usize) -> Flt {
        Flt(BigFloat::from_f64(x, p))
    }

    pub fn from_bigint(i: &BigInt, p: usize, cc: &mut Consts) -> Flt {
        Flt(BigFloat::parse(&i.to_string(), Radix::Dec, p, RM, cc))
    }

    pub fn from_dec(d: &Dec, p: usize, cc: &mut Consts) -> Flt {
        match d {
            Dec::NaN => Flt::nan(),
            Dec::Inf(neg) => Flt::inf(*neg),
            Dec::Num(x) => {
                let (i, scale) = x.as_bigint_and_exponent();
                let s = format!("{}e{}", i, -scale);
                Flt(BigFloat::parse(&s, Radix::Dec, p, RM, cc))
            }
        }
    }

    /// Parse a decimal literal at `p` bits.
    pub fn parse(s: &str, p: usize, cc: &mut Consts) -> CalcResult<Flt> {
        let v = BigFloat::parse(s, Radix::Dec, p, RM, cc);
        if v.is_nan() {
            return Err(CalcError::syntax(format!("invalid number '{s}'")));
        }
        Ok(Flt(v))
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    pub fn is_inf(&self) -> bool {
        self.0.is_inf_pos() || self.0.is_inf_neg()
    }

    pub fn is_finite(&self) -> bool {
        !self.is_nan() && !self.is_inf()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn neg(&self) -> Flt {
        Flt(self.0.neg())
    }

    pub fn abs(&self) -> Flt {
        Flt(self.0.abs())
    }

    pub fn add(&self, rhs: &Flt, p: usize) -> Flt {
        Flt(self.0.add(&rhs.0, p, RM))
    }

    pub fn sub(&self, rhs: &Flt, p: usize) -> Flt {
        Flt(self.0.sub(&rhs.0, p, RM))
    }

    pub fn mul(&self, rhs: &Flt, p: usize) -> Flt {
        Flt(self.0.mul(&rhs.0, p, RM))
    }

    pub fn div(&self, rhs: &Flt, p: usize) -> Flt {
        if rhs.is_zero() && self.is_finite() {
            // IEEE semantics without relying on the backend here
            return if self.is_zero() {
                Flt::nan()
            } else {
                Flt::inf(self.is_negative())
            };
        }
        Flt(self.0.div(&rhs.0, p, RM))
    }

    pub fn cmp(&self, rhs: &Flt) -> Option<Ordering> {
        if self.is_nan() || rhs.is_nan() {
            return None;
        }
        self.0.partial_cmp(&rhs.0)
    }

    /// Exact decimal image of this float (round-trip digits).
    pub fn to_dec_exact(&self) -> Dec {
        if self.is_nan() {
            return Dec::NaN;
        }
        if self.0.is_inf_neg() {
            return Dec::Inf(true);
        }
        if self.0.is_inf_pos() {
            return Dec::Inf(false);
        }
        match BigDecimal::from_str(&self.0.to_string()) {
            Ok(d) => Dec::Num(d),
            Err(_) => Dec::NaN,
        }
    }

    /// Decimal image rounded to `prec` digits.
    pub fn to_dec(&self, prec: u32) -> Dec {
        self.to_dec_exact().round_prec(prec)
    }

    /// Integer part, truncated toward zero.
    pub fn to_bigint(&self) -> Option<BigInt> {
        self.to_dec_exact().to_bigint()
    }

    fn map_int(&self, p: usize, cc: &mut Consts, f: impl Fn(&Dec) -> Dec) -> Flt {
        if !self.is_finite() {
            return self.clone();
        }
        Flt::from_dec(&f(&self.to_dec_exact()), p, cc)
    }

    pub fn trunc(&self, p: usize, cc: &mut Consts) -> Flt {
        self.map_int(p, cc, Dec::trunc)
    }

    pub fn floor(&self, p: usize, cc: &mut Consts) -> Flt {
        self.map_int(p, cc, Dec::floor)
    }

    pub fn ceil(&self, p: usize, cc: &mut Consts) -> Flt {
        self.map_int(p, cc, Dec::ceil)
    }

    pub fn round_ties_away(&self, p: usize, cc: &mut Consts) -> Flt {
        self.map_int(p, cc, Dec::round_ties_away)
    }

    /// Floor-convention remainder, like the fraction and decimal kinds.
    pub fn rem_floor(&self, rhs: &Flt, p: usize, cc: &mut Consts) -> Flt {
        if !self.is_finite() || !rhs.is_finite() || rhs.is_zero() {
            return Flt::nan();
        }
        let (da, db) = (self.to_dec_exact(), rhs.to_dec_exact());
        let prec = (p as f64 / std::f64::consts::LOG2_10).ceil() as u32 + 4;
        match da.divrem_floor(&db, prec) {
            Some((_, r)) => Flt::from_dec(&r, p, cc),
            None => Flt::nan(),
        }
    }

    pub fn sqrt(&self, p: usize) -> Flt {
        Flt(self.0.sqrt(p, RM))
    }

    pub fn exp(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.exp(p, RM, cc))
    }

    pub fn ln(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.ln(p, RM, cc))
    }

    pub fn log2(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.log2(p, RM, cc))
    }

    pub fn log10(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.log10(p, RM, cc))
    }

    pub fn sin(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.sin(p, RM, cc))
    }

    pub fn cos(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.cos(p, RM, cc))
    }

    pub fn tan(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.tan(p, RM, cc))
    }

    pub fn asin(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.asin(p, RM, cc))
    }

    pub fn acos(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.acos(p, RM, cc))
    }

    pub fn atan(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.atan(p, RM, cc))
    }

    pub fn sinh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.sinh(p, RM, cc))
    }

    pub fn cosh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.cosh(p, RM, cc))
    }

    pub fn tanh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.tanh(p, RM, cc))
    }

    pub fn asinh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.asinh(p, RM, cc))
    }

    pub fn acosh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.acosh(p, RM, cc))
    }

    pub fn atanh(&self, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.atanh(p, RM, cc))
    }

    pub fn pow(&self, rhs: &Flt, p: usize, cc: &mut Consts) -> Flt {
        Flt(self.0.pow(&rhs.0, p, RM, cc))
    }

    pub fn pi(p: usize, cc: &mut Consts) -> Flt {
        Flt(cc.pi(p, RM))
    }

    /// Two-argument arctangent, composed from `atan` with the usual
    /// quadrant corrections.
    pub fn atan2(&self, x: &Flt, p: usize, cc: &mut Consts) -> Flt {
        let y = self;
        if y.is_nan() || x.is_nan() {
            return Flt::nan();
        }
        let pi = Flt::pi(p, cc);
        if x.is_zero() {
            if y.is_zero() {
                return Flt::zero(p);
            }
            let half = pi.div(&Flt::from_f64(2.0, p), p);
            return if y.is_negative() { half.neg() } else { half };
        }
        let base = y.div(x, p).atan(p, cc);
        if x.is_negative() {
            if y.is_negative() || y.is_zero() {
                base.sub(&pi, p)
            } else {
                base.add(&pi, p)
            }
        } else {
            base
        }
    }

    /// Shortest decimal representation that parses back to this exact
    /// value at `p` bits.
    pub fn to_display_string(&self, p: usize, cc: &mut Consts) -> String {
        if self.is_nan() {
            return "NaN".to_string();
        }
        if self.0.is_inf_neg() {
            return "-Inf".to_string();
        }
        if self.0.is_inf_pos() {
            return "Inf".to_string();
        }
        let exact = match self.to_dec_exact() {
            Dec::Num(d) => d,
            _ => return "NaN".to_string(),
        };
        if exact.is_zero() {
            return "0.0".to_string();
        }
        let max_digits = (p as f64 / std::f64::consts::LOG2_10).ceil() as u64 + 1;
        for n in 1..=max_digits {
            let cand = exact.with_prec(n).normalized();
            let (i, scale) = cand.as_bigint_and_exponent();
            let s = format!("{}e{}", i, -scale);
            let back = BigFloat::parse(&s, Radix::Dec, p, RM, cc);
            if back.partial_cmp(&self.0) == Some(Ordering::Equal) {
                return Dec::Num(cand).to_display_string();
            }
        }
        Dec::Num(exact).to_display_string()
    }

    /// Hexadecimal mantissa form used by the hex output mode.
    pub fn to_hex_string(&self, cc: &mut Consts) -> String {
        if self.is_nan() {
            return "NaN".to_string();
        }
        if self.0.is_inf_neg() {
            return "-Inf".to_string();
        }
        if self.0.is_inf_pos() {
            return "Inf".to_string();
        }
        match self.0.format(Radix::Hex, RM, cc) {
            Ok(s) => {
                if let Some(rest) = s.strip_prefix('-') {
                    format!("-0x{rest}")
                } else {
                    format!("0x{s}")
                }
            }
            Err(_) => "NaN".to_string(),
        }
    }
}

impl PartialEq for Flt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Some(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::NumCtx;

    fn f(x: f64, ctx: &NumCtx) -> Flt {
        Flt::from_f64(x, ctx.float_prec)
    }

    #[test]
    fn shortest_round_trip_matches_f64_printing() {
        let ctx = NumCtx::new();
        let p = ctx.float_prec;
        let a = f(0.1, &ctx).add(&f(0.2, &ctx), p);
        let s = a.to_display_string(p, &mut ctx.cc());
        assert_eq!(s, "0.30000000000000004");
        let b = f(2.0, &ctx);
        assert_eq!(b.to_display_string(p, &mut ctx.cc()), "2.0");
    }

    #[test]
    fn sqrt_at_binary64() {
        let ctx = NumCtx::new();
        let p = ctx.float_prec;
        let r = f(2.0, &ctx).sqrt(p);
        assert_eq!(r.to_display_string(p, &mut ctx.cc()), "1.4142135623730951");
    }

    #[test]
    fn integer_conversion_truncates() {
        let ctx = NumCtx::new();
        assert_eq!(f(2.9, &ctx).to_bigint().unwrap(), BigInt::from(2));
        assert_eq!(f(-2.9, &ctx).to_bigint().unwrap(), BigInt::from(-2));
        assert!(Flt::nan().to_bigint().is_none());
    }

    #[test]
    fn atan2_quadrants() {
        let ctx = NumCtx::new();
        let p = ctx.float_prec;
        let r = f(2.0, &ctx).atan2(&f(1.0, &ctx), p, &mut ctx.cc());
        assert_eq!(r.to_display_string(p, &mut ctx.cc()), "1.1071487177940904");
    }

    #[test]
    fn division_by_zero() {
        let ctx = NumCtx::new();
        let p = ctx.float_prec;
        assert!(f(1.0, &ctx).div(&f(0.0, &ctx), p).is_inf());
        assert!(f(0.0, &ctx).div(&f(0.0, &ctx), p).is_nan());
    }

    #[test]
    fn floor_family() {
        let ctx = NumCtx::new();
        let p = ctx.float_prec;
        let cc = &mut ctx.cc();
        let x = f(-2.5, &ctx);
        assert_eq!(x.floor(p, cc).to_bigint().unwrap(), BigInt::from(-3));
        assert_eq!(x.ceil(p, cc).to_bigint().unwrap(), BigInt::from(-2));
        assert_eq!(x.trunc(p, cc).to_bigint().unwrap(), BigInt::from(-2));
        assert_eq!(
            x.round_ties_away(p, cc).to_bigint().unwrap(),
            BigInt::from(-3)
        );
    }
}
