//! Fraction operations. `BigRational` keeps every value reduced with a
//! positive denominator, which is exactly the §3 invariant.

use crate::context::Ctx;
use crate::dispatch::{Op1, Op2};
use crate::value::Value;
use abax_common::{CalcError, CalcResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use std::cmp::Ordering;
use std::rc::Rc;

fn to_frac(v: Value) -> CalcResult<BigRational> {
    match v {
        Value::Bool(b) => Ok(BigRational::from_integer(BigInt::from(b as i64))),
        Value::Int(n) => Ok(BigRational::from_integer(n)),
        Value::Frac(f) => Ok(f),
        _ => Err(CalcError::ty("fraction expected")),
    }
}

/// Floor-convention division: quotient rounded toward negative
/// infinity, remainder with the sign of the divisor.
fn divrem_floor(a: &BigRational, b: &BigRational) -> CalcResult<(BigInt, BigRational)> {
    if b.is_zero() {
        return Err(CalcError::range("division by zero"));
    }
    let q = (a / b).floor().to_integer();
    let r = a - BigRational::from_integer(q.clone()) * b;
    Ok((q, r))
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let _ = ctx;
    let a = to_frac(a)?;
    let b = to_frac(b)?;
    match op {
        Op2::Add => Ok(Value::Frac(a + b)),
        Op2::Sub => Ok(Value::Frac(a - b)),
        Op2::Mul | Op2::DotMul => Ok(Value::Frac(a * b)),
        Op2::Div | Op2::FracDiv => {
            if b.is_zero() {
                return Err(CalcError::range("division by zero"));
            }
            Ok(Value::Frac(a / b))
        }
        Op2::Mod => {
            let (_, r) = divrem_floor(&a, &b)?;
            Ok(Value::Frac(r))
        }
        Op2::DivRem => {
            let (q, r) = divrem_floor(&a, &b)?;
            Ok(Value::Array(Rc::new(vec![
                Value::Frac(BigRational::from_integer(q)),
                Value::Frac(r),
            ])))
        }
        Op2::CmpEq => Ok(Value::Bool(a == b)),
        Op2::CmpLt => Ok(Value::Bool(a.cmp(&b) == Ordering::Less)),
        Op2::CmpLe => Ok(Value::Bool(a.cmp(&b) != Ordering::Greater)),
        _ => Err(CalcError::ty("unsupported fraction operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let _ = ctx;
    let f = to_frac(v)?;
    match op {
        Op1::Neg => Ok(Value::Frac(-f)),
        Op1::Abs => {
            let f = if f < BigRational::zero() { -f } else { f };
            Ok(Value::Frac(f))
        }
        // the rounding family lands in Integer
        Op1::Trunc => Ok(Value::Int(f.trunc().to_integer())),
        Op1::Floor => Ok(Value::Int(f.floor().to_integer())),
        Op1::Ceil => Ok(Value::Int(f.ceil().to_integer())),
        Op1::Round => Ok(Value::Int(f.round().to_integer())),
        _ => Err(CalcError::ty("unsupported fraction operation")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Value {
        Value::Frac(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn mod_takes_divisor_sign() {
        // -2/3 mod 1/5 = 2/15
        let c = Ctx::new();
        let r = op2(&c, Op2::Mod, frac(-2, 3), frac(1, 5)).unwrap();
        match r {
            Value::Frac(f) => {
                assert_eq!(f, BigRational::new(2.into(), 15.into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rounding_family_returns_integers() {
        let c = Ctx::new();
        assert!(op1(&c, Op1::Trunc, frac(5, 2)).unwrap().eq_int(2));
        assert!(op1(&c, Op1::Floor, frac(5, 2)).unwrap().eq_int(2));
        assert!(op1(&c, Op1::Ceil, frac(5, 2)).unwrap().eq_int(3));
        assert!(op1(&c, Op1::Round, frac(5, 2)).unwrap().eq_int(3));
        assert!(op1(&c, Op1::Round, frac(-5, 2)).unwrap().eq_int(-3));
    }

    #[test]
    fn division_by_zero_fraction_fails() {
        let c = Ctx::new();
        assert!(op2(&c, Op2::Div, frac(1, 2), frac(0, 1)).is_err());
    }
}
