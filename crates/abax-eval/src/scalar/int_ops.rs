//! Integer (and Bool-promoted-to-integer) operations.

use crate::context::Ctx;
use crate::dispatch::{Op1, Op2};
use crate::value::Value;
use abax_common::{CalcError, CalcResult};
use abax_num::int;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Pow, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::rc::Rc;

fn to_int(v: Value) -> CalcResult<BigInt> {
    match v {
        Value::Bool(b) => Ok(BigInt::from(b as i64)),
        Value::Int(n) => Ok(n),
        _ => Err(CalcError::ty("integer expected")),
    }
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let _ = ctx;
    let a = to_int(a)?;
    let b = to_int(b)?;
    match op {
        Op2::Add => Ok(Value::Int(a + b)),
        Op2::Sub => Ok(Value::Int(a - b)),
        Op2::Mul | Op2::DotMul => Ok(Value::Int(a * b)),
        Op2::Mod => Ok(Value::Int(int::mod_euclid(&a, &b)?)),
        Op2::Pow => {
            let e = b
                .to_u32()
                .ok_or_else(|| CalcError::range("exponent too large"))?;
            Ok(Value::Int(Pow::pow(&a, e)))
        }
        Op2::Or => Ok(Value::Int(a | b)),
        Op2::And => Ok(Value::Int(a & b)),
        Op2::Xor => Ok(Value::Int(a ^ b)),
        Op2::Shl => Ok(Value::Int(int::shl_signed(&a, b.to_i64().unwrap_or(i64::MAX))?)),
        Op2::Shr => {
            let count = b
                .to_i64()
                .and_then(|c| c.checked_neg())
                .ok_or_else(|| CalcError::range("shift count too large"))?;
            Ok(Value::Int(int::shl_signed(&a, count)?))
        }
        Op2::DivRem => {
            let (q, r) = int::divrem_euclid(&a, &b)?;
            Ok(Value::Array(Rc::new(vec![Value::Int(q), Value::Int(r)])))
        }
        Op2::FracDiv => {
            if b.is_zero() {
                return Err(CalcError::range("division by zero"));
            }
            Ok(Value::Frac(BigRational::new(a, b)))
        }
        Op2::CmpEq => Ok(Value::Bool(a == b)),
        Op2::CmpLt => Ok(Value::Bool(a.cmp(&b) == Ordering::Less)),
        Op2::CmpLe => Ok(Value::Bool(a.cmp(&b) != Ordering::Greater)),
        Op2::Div | Op2::Atan2 => Err(CalcError::ty("unsupported integer operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let _ = ctx;
    let n = to_int(v)?;
    match op {
        Op1::Neg => Ok(Value::Int(-n)),
        Op1::Abs => Ok(Value::Int(n.abs())),
        Op1::Trunc | Op1::Floor | Op1::Ceil | Op1::Round => Ok(Value::Int(n)),
        _ => Err(CalcError::ty("unsupported integer operation")),
    }
}

/// Bitwise complement, two's-complement convention.
pub fn bit_not(v: Value) -> CalcResult<Value> {
    let n = to_int(v)?;
    Ok(Value::Int(-n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Ctx {
        Ctx::new()
    }

    #[test]
    fn euclidean_mod() {
        let c = ctx();
        let r = op2(&c, Op2::Mod, Value::int(-3), Value::int(2)).unwrap();
        assert!(r.eq_int(1));
        let r = op2(&c, Op2::Mod, Value::int(3), Value::int(-2)).unwrap();
        assert!(r.eq_int(1));
    }

    #[test]
    fn bool_promotes_to_integer() {
        let c = ctx();
        let r = op2(&c, Op2::Add, Value::int(1), Value::Bool(true)).unwrap();
        assert!(r.eq_int(2));
    }

    #[test]
    fn logic_is_twos_complement() {
        let c = ctx();
        let r = op2(&c, Op2::Or, Value::int(0xaa), Value::int(0x55)).unwrap();
        assert!(r.eq_int(255));
        let r = op2(&c, Op2::And, Value::int(-1), Value::int(0x7f)).unwrap();
        assert!(r.eq_int(0x7f));
        assert!(bit_not(Value::int(0)).unwrap().eq_int(-1));
    }

    #[test]
    fn shifts_by_signed_count() {
        let c = ctx();
        let r = op2(&c, Op2::Shl, Value::int(1), Value::int(32)).unwrap();
        assert!(r.eq_int(4294967296));
        let r = op2(&c, Op2::Shr, Value::int(-8), Value::int(1)).unwrap();
        assert!(r.eq_int(-4));
    }
}
