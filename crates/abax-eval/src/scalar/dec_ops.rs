//! Decimal floating-point operations.
//!
//! The decimal kind has no native transcendentals: those convert to a
//! binary float at `ceil(p*log2(10)) + 16` bits, apply the binary
//! operation, and convert back to `p` decimal digits.

use crate::context::Ctx;
use crate::dispatch::{Op1, Op2};
use crate::value::Value;
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::{Dec, Flt};
use num_traits::Signed;
use std::cmp::Ordering;
use std::rc::Rc;

fn to_dec(ctx: &Ctx, v: Value) -> CalcResult<Dec> {
    match v.kind() {
        Kind::Bool | Kind::Integer | Kind::Fraction | Kind::Decimal => {
            match crate::convert::convert(ctx, v, &Type::simple(Kind::Decimal))? {
                Value::Dec(d) => Ok(d),
                _ => Err(CalcError::ty("decimal expected")),
            }
        }
        _ => Err(CalcError::ty("decimal expected")),
    }
}

fn to_flt(ctx: &Ctx, d: &Dec) -> Flt {
    Flt::from_dec(d, ctx.dec_bits(), &mut ctx.num.cc())
}

fn back(ctx: &Ctx, f: Flt) -> Value {
    Value::Dec(f.to_dec(ctx.num.dec_prec))
}

/// Integer-exponent power by repeated squaring, exact where the
/// operands allow it.
fn pow_int(ctx: &Ctx, a: &Dec, e: &num_bigint::BigInt) -> Dec {
    let prec = ctx.num.dec_prec;
    let negative = e.is_negative();
    let mut e = e.magnitude().clone();
    let mut base = a.clone();
    let mut r = Dec::one();
    use num_traits::Zero;
    while !e.is_zero() {
        if e.bit(0) {
            r = r.mul(&base, prec);
        }
        e >>= 1;
        if !e.is_zero() {
            base = base.mul(&base, prec);
        }
    }
    if negative {
        r = Dec::one().div(&r, prec);
    }
    r
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let prec = ctx.num.dec_prec;
    let a = to_dec(ctx, a)?;
    let b = to_dec(ctx, b)?;
    match op {
        Op2::Add => Ok(Value::Dec(a.add(&b, prec))),
        Op2::Sub => Ok(Value::Dec(a.sub(&b, prec))),
        Op2::Mul | Op2::DotMul => Ok(Value::Dec(a.mul(&b, prec))),
        Op2::Div | Op2::FracDiv => Ok(Value::Dec(a.div(&b, prec))),
        Op2::Mod => Ok(Value::Dec(a.rem_floor(&b, prec))),
        Op2::DivRem => {
            let (q, r) = match a.divrem_floor(&b, prec) {
                Some(p) => p,
                None => (Dec::nan(), Dec::nan()),
            };
            Ok(Value::Array(Rc::new(vec![Value::Dec(q), Value::Dec(r)])))
        }
        Op2::Pow => {
            if a.is_finite() && b.is_integer() {
                if let Some(e) = b.to_bigint() {
                    return Ok(Value::Dec(pow_int(ctx, &a, &e)));
                }
            }
            let fa = to_flt(ctx, &a);
            let fb = to_flt(ctx, &b);
            let r = fa.pow(&fb, ctx.dec_bits(), &mut ctx.num.cc());
            Ok(back(ctx, r))
        }
        Op2::Atan2 => {
            let fa = to_flt(ctx, &a);
            let fb = to_flt(ctx, &b);
            let r = fa.atan2(&fb, ctx.dec_bits(), &mut ctx.num.cc());
            Ok(back(ctx, r))
        }
        Op2::CmpEq => Ok(Value::Bool(a.cmp(&b) == Some(Ordering::Equal))),
        Op2::CmpLt => Ok(Value::Bool(a.cmp(&b) == Some(Ordering::Less))),
        Op2::CmpLe => Ok(Value::Bool(matches!(
            a.cmp(&b),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ))),
        _ => Err(CalcError::ty("unsupported decimal operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let d = to_dec(ctx, v)?;
    let bits = ctx.dec_bits();
    match op {
        Op1::Neg => Ok(Value::Dec(d.neg())),
        Op1::Abs => Ok(Value::Dec(d.abs())),
        Op1::Trunc => Ok(Value::Dec(d.trunc())),
        Op1::Floor => Ok(Value::Dec(d.floor())),
        Op1::Ceil => Ok(Value::Dec(d.ceil())),
        Op1::Round => Ok(Value::Dec(d.round_ties_away())),
        Op1::Sqrt => {
            let f = to_flt(ctx, &d).sqrt(bits);
            Ok(back(ctx, f))
        }
        Op1::Exp => {
            let f = to_flt(ctx, &d).exp(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Log => {
            let f = to_flt(ctx, &d).ln(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Log2 => {
            let f = to_flt(ctx, &d).log2(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Log10 => {
            let f = to_flt(ctx, &d).log10(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Sin => {
            let f = to_flt(ctx, &d).sin(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Cos => {
            let f = to_flt(ctx, &d).cos(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Tan => {
            let f = to_flt(ctx, &d).tan(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Asin => {
            let f = to_flt(ctx, &d).asin(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Acos => {
            let f = to_flt(ctx, &d).acos(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        Op1::Atan => {
            let f = to_flt(ctx, &d).atan(bits, &mut ctx.num.cc());
            Ok(back(ctx, f))
        }
        _ => Err(CalcError::ty("unsupported decimal operation")),
    }
}

/// Decimal pi at the current precision.
pub fn dec_pi(ctx: &Ctx) -> Value {
    let f = Flt::pi(ctx.dec_bits(), &mut ctx.num.cc());
    Value::Dec(f.to_dec(ctx.num.dec_prec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn show(ctx: &Ctx, v: &Value) -> String {
        format_value(ctx, v)
    }

    #[test]
    fn integer_division_yields_decimal() {
        let c = Ctx::new();
        let r = op2(&c, Op2::Div, Value::int(1), Value::int(4)).unwrap();
        assert_eq!(show(&c, &r), "0.25");
    }

    #[test]
    fn division_by_zero_is_infinity_not_error() {
        let c = Ctx::new();
        let r = op2(&c, Op2::Div, Value::int(1), Value::int(0)).unwrap();
        assert_eq!(show(&c, &r), "Inf");
        let r = op2(&c, Op2::Div, Value::int(0), Value::int(0)).unwrap();
        assert_eq!(show(&c, &r), "NaN");
    }

    #[test]
    fn exact_integer_powers() {
        let c = Ctx::new();
        let a = to_dec(&c, Value::int(3)).unwrap();
        let r = pow_int(&c, &a, &num_bigint::BigInt::from(10));
        assert_eq!(r.to_display_string(), "59049.0");
        let a = to_dec(&c, Value::int(2)).unwrap();
        let r = pow_int(&c, &a, &num_bigint::BigInt::from(-2));
        assert_eq!(r.to_display_string(), "0.25");
    }

    #[test]
    fn sqrt_at_sixteen_digits() {
        let c = Ctx::new();
        let r = op1(&c, Op1::Sqrt, Value::int(2)).unwrap();
        assert_eq!(show(&c, &r), "1.414213562373095");
    }

    #[test]
    fn pi_at_current_precision() {
        let c = Ctx::new();
        assert_eq!(show(&c, &dec_pi(&c)), "3.141592653589793");
    }
}
