//! Binary floating-point operations at the context's float precision.

use crate::context::Ctx;
use crate::dispatch::{Op1, Op2};
use crate::value::Value;
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::Flt;
use num_traits::Signed;
use std::cmp::Ordering;
use std::rc::Rc;

fn to_flt(ctx: &Ctx, v: Value) -> CalcResult<Flt> {
    match v.kind() {
        Kind::Decimal => Err(CalcError::ty(
            "cannot mix Decimal and Float; convert explicitly",
        )),
        Kind::Bool | Kind::Integer | Kind::Fraction | Kind::Float => {
            match crate::convert::convert(ctx, v, &Type::simple(Kind::Float))? {
                Value::Float(f) => Ok(f),
                _ => Err(CalcError::ty("float expected")),
            }
        }
        _ => Err(CalcError::ty("float expected")),
    }
}

fn pow_int(ctx: &Ctx, a: &Flt, e: &num_bigint::BigInt) -> Flt {
    let p = ctx.num.float_prec;
    let negative = e.is_negative();
    let mut e = e.magnitude().clone();
    let mut base = a.clone();
    let mut r = Flt::from_f64(1.0, p);
    use num_traits::Zero;
    while !e.is_zero() {
        if e.bit(0) {
            r = r.mul(&base, p);
        }
        e >>= 1;
        if !e.is_zero() {
            base = base.mul(&base, p);
        }
    }
    if negative {
        r = Flt::from_f64(1.0, p).div(&r, p);
    }
    r
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let p = ctx.num.float_prec;
    let a = to_flt(ctx, a)?;
    let b = to_flt(ctx, b)?;
    match op {
        Op2::Add => Ok(Value::Float(a.add(&b, p))),
        Op2::Sub => Ok(Value::Float(a.sub(&b, p))),
        Op2::Mul | Op2::DotMul => Ok(Value::Float(a.mul(&b, p))),
        Op2::Div | Op2::FracDiv => Ok(Value::Float(a.div(&b, p))),
        Op2::Mod => Ok(Value::Float(a.rem_floor(&b, p, &mut ctx.num.cc()))),
        Op2::DivRem => {
            let q = a.div(&b, p).floor(p, &mut ctx.num.cc());
            let r = a.rem_floor(&b, p, &mut ctx.num.cc());
            Ok(Value::Array(Rc::new(vec![
                Value::Float(q),
                Value::Float(r),
            ])))
        }
        Op2::Pow => {
            if a.is_finite() && b.to_dec_exact().is_integer() {
                if let Some(e) = b.to_bigint() {
                    return Ok(Value::Float(pow_int(ctx, &a, &e)));
                }
            }
            Ok(Value::Float(a.pow(&b, p, &mut ctx.num.cc())))
        }
        Op2::Atan2 => Ok(Value::Float(a.atan2(&b, p, &mut ctx.num.cc()))),
        Op2::CmpEq => Ok(Value::Bool(a.cmp(&b) == Some(Ordering::Equal))),
        Op2::CmpLt => Ok(Value::Bool(a.cmp(&b) == Some(Ordering::Less))),
        Op2::CmpLe => Ok(Value::Bool(matches!(
            a.cmp(&b),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ))),
        _ => Err(CalcError::ty("unsupported float operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let p = ctx.num.float_prec;
    let f = to_flt(ctx, v)?;
    let r = match op {
        Op1::Neg => f.neg(),
        Op1::Abs => f.abs(),
        Op1::Trunc => f.trunc(p, &mut ctx.num.cc()),
        Op1::Floor => f.floor(p, &mut ctx.num.cc()),
        Op1::Ceil => f.ceil(p, &mut ctx.num.cc()),
        Op1::Round => f.round_ties_away(p, &mut ctx.num.cc()),
        Op1::Sqrt => f.sqrt(p),
        Op1::Exp => f.exp(p, &mut ctx.num.cc()),
        Op1::Log => f.ln(p, &mut ctx.num.cc()),
        Op1::Log2 => f.log2(p, &mut ctx.num.cc()),
        Op1::Log10 => f.log10(p, &mut ctx.num.cc()),
        Op1::Sin => f.sin(p, &mut ctx.num.cc()),
        Op1::Cos => f.cos(p, &mut ctx.num.cc()),
        Op1::Tan => f.tan(p, &mut ctx.num.cc()),
        Op1::Asin => f.asin(p, &mut ctx.num.cc()),
        Op1::Acos => f.acos(p, &mut ctx.num.cc()),
        Op1::Atan => f.atan(p, &mut ctx.num.cc()),
        _ => return Err(CalcError::ty("unsupported float operation")),
    };
    Ok(Value::Float(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    #[test]
    fn binary64_artifacts_show_through() {
        let c = Ctx::new();
        let a = Value::Float(Flt::from_f64(0.1, c.num.float_prec));
        let b = Value::Float(Flt::from_f64(0.2, c.num.float_prec));
        let r = op2(&c, Op2::Add, a, b).unwrap();
        assert_eq!(format_value(&c, &r), "0.30000000000000004l");
    }

    #[test]
    fn decimal_and_float_never_mix() {
        let c = Ctx::new();
        let a = Value::Float(Flt::from_f64(1.0, c.num.float_prec));
        let b = Value::Dec(abax_num::Dec::from_i64(1));
        assert!(op2(&c, Op2::Add, a, b).is_err());
    }
}
