//! Numeric built-ins: constructors, rounding, complex accessors,
//! gcd/divrem and best rational approximation.

use crate::context::Ctx;
use crate::convert::convert;
use crate::dispatch::{self, Op1, Op2};
use crate::scalar::complex_ops;
use crate::value::Value;
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::int;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

pub fn integer_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    convert(ctx, v, &Type::simple(Kind::Integer))
}

pub fn neg(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::neg(ctx, v)
}

pub fn inverse(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::invert(ctx, v)
}

pub fn norm2(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    if v.kind() <= Kind::Float {
        return dispatch::mul(ctx, v.clone(), v);
    }
    if v.kind() == Kind::Complex {
        return complex_ops::norm2(ctx, &v);
    }
    Err(CalcError::ty("incompatible type"))
}

pub fn abs(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Abs, v)
}

pub fn trunc(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Trunc, v)
}

pub fn floor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Floor, v)
}

pub fn ceil(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Ceil, v)
}

pub fn round(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Round, v)
}

pub fn num(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match v {
        Value::Int(_) => Ok(v),
        Value::Frac(f) => Ok(Value::Int(f.numer().clone())),
        Value::RFrac(r) => Ok(Value::Poly(std::rc::Rc::new(r.num.clone()))),
        _ => Err(CalcError::ty("fraction expected")),
    }
}

pub fn den(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match v {
        Value::Int(_) => Ok(Value::int(1)),
        Value::Frac(f) => Ok(Value::Int(f.denom().clone())),
        Value::RFrac(r) => Ok(Value::Poly(std::rc::Rc::new(r.den.clone()))),
        _ => Err(CalcError::ty("fraction expected")),
    }
}

pub fn fact(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(Value::Int(int::factorial(v.as_int()?)?))
}

pub fn comb(_ctx: &Ctx, n: Value, k: Value) -> CalcResult<Value> {
    Ok(Value::Int(int::binomial(n.as_int()?, k.as_int()?)?))
}

pub fn xor(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    dispatch::op2(ctx, Op2::Xor, a, b)
}

pub fn divrem(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    dispatch::op2(ctx, Op2::DivRem, a, b)
}

pub fn gcd(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(Integer::gcd(x, y))),
        (Value::Poly(x), Value::Poly(y)) => crate::poly::gcd(ctx, x, y),
        _ => Err(CalcError::ty("incompatible types")),
    }
}

pub fn sqrt(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = dispatch::lift_negative_real(ctx, v)?;
    dispatch::op1(ctx, Op1::Sqrt, v)
}

pub fn conj(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Conj, v)
}

pub fn re(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Re, v)
}

pub fn im(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Im, v)
}

/// Argument (phase) of a complex or real value.
pub fn arg(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = if v.kind() <= Kind::Float {
        convert(ctx, v.clone(), &Type::complex(v.type_of()))?
    } else {
        v
    };
    let Value::Complex(c) = v else {
        return Err(CalcError::ty("incompatible type"));
    };
    crate::builtins::transc::atan2(ctx, c.im.clone(), c.re.clone())
}

pub fn fraction_ctor(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    dispatch::op2(ctx, Op2::FracDiv, a, b)
}

pub fn decimal_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    convert(ctx, v, &Type::simple(Kind::Decimal))
}

pub fn float_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    convert(ctx, v, &Type::simple(Kind::Float))
}

pub fn complex_ctor(ctx: &Ctx, re: Value, im: Value) -> CalcResult<Value> {
    complex_ops::make(ctx, re, im)
}

/// Best rational approximation with denominator at most `bound`, from
/// the continued-fraction convergents of a Decimal or Float input.
pub fn bestappr(_ctx: &Ctx, x: Value, bound: Value) -> CalcResult<Value> {
    let bound = bound.as_int()?.clone();
    if bound < BigInt::one() {
        return Err(CalcError::range("positive bound expected"));
    }
    let exact = match &x {
        Value::Dec(d) => d.clone(),
        Value::Float(f) => f.to_dec_exact(),
        _ => return Err(CalcError::ty("decimal or float expected")),
    };
    let abax_num::Dec::Num(d) = exact else {
        return Err(CalcError::range("finite number expected"));
    };
    let (i, scale) = d.as_bigint_and_exponent();
    let r = if scale >= 0 {
        BigRational::new(i, BigInt::from(10u32).pow(scale as u32))
    } else {
        BigRational::from_integer(i * BigInt::from(10u32).pow((-scale) as u32))
    };
    let (mut numer, mut denom) = (r.numer().clone(), r.denom().clone());
    let (mut h2, mut h1) = (BigInt::zero(), BigInt::one());
    let (mut k2, mut k1) = (BigInt::one(), BigInt::zero());
    let mut best: Option<(BigInt, BigInt)> = None;
    while !denom.is_zero() {
        let (a, rem) = numer.div_mod_floor(&denom);
        let h = &a * &h1 + &h2;
        let k = &a * &k1 + &k2;
        if k > bound {
            break;
        }
        best = Some((h.clone(), k.clone()));
        h2 = h1;
        h1 = h;
        k2 = k1;
        k1 = k;
        numer = denom;
        denom = rem;
    }
    match best {
        Some((h, k)) => Ok(Value::Frac(BigRational::new(h, k))),
        None => Err(CalcError::range("no approximation within bound")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;
    use crate::scalar::dec_ops::dec_pi;

    #[test]
    fn bestappr_of_pi() {
        let c = Ctx::new();
        let r = bestappr(&c, dec_pi(&c), Value::int(1000)).unwrap();
        assert_eq!(format_value(&c, &r), "355//113");
    }

    #[test]
    fn bestappr_rejects_fractions() {
        let c = Ctx::new();
        let f = Value::Frac(BigRational::new(1.into(), 3.into()));
        assert!(bestappr(&c, f, Value::int(10)).is_err());
    }

    #[test]
    fn fraction_constructor_reduces() {
        let c = Ctx::new();
        let r = fraction_ctor(&c, Value::int(10), Value::int(4)).unwrap();
        assert_eq!(format_value(&c, &r), "5//2");
    }
}
