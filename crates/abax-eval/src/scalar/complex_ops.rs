//! Complex arithmetic, built from the generic value operations so the
//! components promote exactly like free-standing scalars.

use crate::context::Ctx;
use crate::convert::{convert, promote_types};
use crate::dispatch::{self, Op1, Op2};
use crate::value::{Complex, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::Flt;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::rc::Rc;

/// Pair `re`/`im` into a complex value over their common real type.
pub fn make(ctx: &Ctx, re: Value, im: Value) -> CalcResult<Value> {
    if !re.kind().is_real_scalar() && re.kind() != Kind::Bool {
        return Err(CalcError::ty("real components expected"));
    }
    if !im.kind().is_real_scalar() && im.kind() != Kind::Bool {
        return Err(CalcError::ty("real components expected"));
    }
    let t = promote_types(&re.type_of(), &im.type_of())?;
    let t = if t.kind() == Kind::Bool {
        Type::simple(Kind::Integer)
    } else {
        t
    };
    let re = convert(ctx, re, &t)?;
    let im = convert(ctx, im, &t)?;
    Ok(Value::Complex(Rc::new(Complex { re, im })))
}

fn as_complex(v: &Value) -> &Rc<Complex> {
    match v {
        Value::Complex(c) => c,
        _ => unreachable!("operand converted to complex beforehand"),
    }
}

fn promote_pair(ctx: &Ctx, a: Value, b: Value) -> CalcResult<(Rc<Complex>, Rc<Complex>, Rc<Type>)> {
    let t = promote_types(&a.type_of(), &b.type_of())?;
    let t = if t.kind() == Kind::Complex {
        t
    } else {
        Type::complex(t)
    };
    let a = convert(ctx, a, &t)?;
    let b = convert(ctx, b, &t)?;
    let (ca, cb) = (as_complex(&a).clone(), as_complex(&b).clone());
    Ok((ca, cb, t))
}

/// Promote a complex value's element type to at least Decimal, for the
/// transcendental paths.
fn lift_elems(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let t = v.type_of();
    let elem = t.elem().expect("complex type");
    if elem.kind() < Kind::Decimal {
        convert(ctx, v, &Type::complex(Type::simple(Kind::Decimal)))
    } else {
        Ok(v)
    }
}

pub fn norm2(ctx: &Ctx, v: &Value) -> CalcResult<Value> {
    let c = as_complex(v);
    let rr = dispatch::mul(ctx, c.re.clone(), c.re.clone())?;
    let ii = dispatch::mul(ctx, c.im.clone(), c.im.clone())?;
    dispatch::add(ctx, rr, ii)
}

pub fn inverse(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Div, Value::int(1), v)
}

fn div_with(ctx: &Ctx, op: Op2, a: &Rc<Complex>, b: &Rc<Complex>) -> CalcResult<Value> {
    let t = {
        let rr = dispatch::mul(ctx, b.re.clone(), b.re.clone())?;
        let ii = dispatch::mul(ctx, b.im.clone(), b.im.clone())?;
        dispatch::add(ctx, rr, ii)?
    };
    let nre = dispatch::add(
        ctx,
        dispatch::mul(ctx, a.re.clone(), b.re.clone())?,
        dispatch::mul(ctx, a.im.clone(), b.im.clone())?,
    )?;
    let nim = dispatch::sub(
        ctx,
        dispatch::mul(ctx, a.im.clone(), b.re.clone())?,
        dispatch::mul(ctx, a.re.clone(), b.im.clone())?,
    )?;
    let re = dispatch::op2(ctx, op, nre, t.clone())?;
    let im = dispatch::op2(ctx, op, nim, t)?;
    make(ctx, re, im)
}

/// Rounded integer quotient, ties away from zero.
fn round_div(n: &BigInt, d: &BigInt) -> BigInt {
    let negative = n.is_negative() != d.is_negative();
    let (qa, ra) = n.magnitude().div_rem(d.magnitude());
    let mut qa = BigInt::from(qa);
    if &ra * 2u32 >= *d.magnitude() {
        qa += 1u32;
    }
    if negative { -qa } else { qa }
}

/// Gaussian-integer Euclidean division: `q = round(a/b)`, `r = a - qb`.
fn gaussian_divrem(ctx: &Ctx, a: &Rc<Complex>, b: &Rc<Complex>) -> CalcResult<Value> {
    let (are, aim) = (a.re.as_int()?, a.im.as_int()?);
    let (bre, bim) = (b.re.as_int()?, b.im.as_int()?);
    let nb: BigInt = bre * bre + bim * bim;
    if nb.is_zero() {
        return Err(CalcError::range("division by zero"));
    }
    let nre: BigInt = are * bre + aim * bim;
    let nim: BigInt = aim * bre - are * bim;
    let qre = round_div(&nre, &nb);
    let qim = round_div(&nim, &nb);
    let q = make(ctx, Value::Int(qre), Value::Int(qim))?;
    let qb = op2(ctx, Op2::Mul, q.clone(), Value::Complex(b.clone()))?;
    let r = dispatch::sub(ctx, Value::Complex(a.clone()), qb)?;
    Ok(Value::Array(Rc::new(vec![q, r])))
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    if op == Op2::Pow {
        return pow(ctx, a, b);
    }
    let (ca, cb, t) = promote_pair(ctx, a, b)?;
    match op {
        Op2::Add => {
            let re = dispatch::add(ctx, ca.re.clone(), cb.re.clone())?;
            let im = dispatch::add(ctx, ca.im.clone(), cb.im.clone())?;
            make(ctx, re, im)
        }
        Op2::Sub => {
            let re = dispatch::sub(ctx, ca.re.clone(), cb.re.clone())?;
            let im = dispatch::sub(ctx, ca.im.clone(), cb.im.clone())?;
            make(ctx, re, im)
        }
        Op2::Mul | Op2::DotMul => {
            let re = dispatch::sub(
                ctx,
                dispatch::mul(ctx, ca.re.clone(), cb.re.clone())?,
                dispatch::mul(ctx, ca.im.clone(), cb.im.clone())?,
            )?;
            let im = dispatch::add(
                ctx,
                dispatch::mul(ctx, ca.re.clone(), cb.im.clone())?,
                dispatch::mul(ctx, ca.im.clone(), cb.re.clone())?,
            )?;
            make(ctx, re, im)
        }
        Op2::Div => div_with(ctx, Op2::Div, &ca, &cb),
        Op2::FracDiv => div_with(ctx, Op2::FracDiv, &ca, &cb),
        Op2::DivRem => {
            if t.elem().map(|e| e.kind()) != Some(Kind::Integer) {
                return Err(CalcError::ty("Gaussian integers expected"));
            }
            gaussian_divrem(ctx, &ca, &cb)
        }
        Op2::CmpEq => {
            let re = dispatch::eq_bool(ctx, ca.re.clone(), cb.re.clone());
            let im = dispatch::eq_bool(ctx, ca.im.clone(), cb.im.clone());
            Ok(Value::Bool(re && im))
        }
        _ => Err(CalcError::ty("unsupported complex operation")),
    }
}

fn exp_complex(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = lift_elems(ctx, v)?;
    let c = as_complex(&v).clone();
    let er = dispatch::op1(ctx, Op1::Exp, c.re.clone())?;
    let cos = dispatch::op1(ctx, Op1::Cos, c.im.clone())?;
    let sin = dispatch::op1(ctx, Op1::Sin, c.im.clone())?;
    let re = dispatch::mul(ctx, er.clone(), cos)?;
    let im = dispatch::mul(ctx, er, sin)?;
    make(ctx, re, im)
}

fn log_complex(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = lift_elems(ctx, v)?;
    let c = as_complex(&v).clone();
    let n2 = norm2(ctx, &v)?;
    let re = dispatch::div(ctx, dispatch::op1(ctx, Op1::Log, n2)?, Value::int(2))?;
    let im = dispatch::op2(ctx, Op2::Atan2, c.im.clone(), c.re.clone())?;
    make(ctx, re, im)
}

fn pow(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    // a^b = exp(b * log(a)); integer exponents are handled upstream
    let (ca, _cb, _) = promote_pair(ctx, a, b.clone())?;
    let l = log_complex(ctx, Value::Complex(ca))?;
    let prod = dispatch::mul(ctx, b, l)?;
    exp_complex(ctx, prod)
}

fn half_pi(ctx: &Ctx, sample: &Value) -> CalcResult<Value> {
    let pi = if sample.kind() == Kind::Float {
        Value::Float(Flt::pi(ctx.num.float_prec, &mut ctx.num.cc()))
    } else {
        crate::scalar::dec_ops::dec_pi(ctx)
    };
    dispatch::div(ctx, pi, Value::int(2))
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    match op {
        Op1::Neg => {
            let c = as_complex(&v).clone();
            let re = dispatch::neg(ctx, c.re.clone())?;
            let im = dispatch::neg(ctx, c.im.clone())?;
            make(ctx, re, im)
        }
        Op1::Conj => {
            let c = as_complex(&v).clone();
            let im = dispatch::neg(ctx, c.im.clone())?;
            make(ctx, c.re.clone(), im)
        }
        Op1::Re => Ok(as_complex(&v).re.clone()),
        Op1::Im => Ok(as_complex(&v).im.clone()),
        Op1::Abs => {
            let n2 = norm2(ctx, &v)?;
            dispatch::op1(ctx, Op1::Sqrt, n2)
        }
        Op1::Sqrt => {
            // principal branch
            let v = lift_elems(ctx, v)?;
            let c = as_complex(&v).clone();
            let r = {
                let n2 = norm2(ctx, &v)?;
                dispatch::op1(ctx, Op1::Sqrt, n2)?
            };
            let re2 = dispatch::div(ctx, dispatch::add(ctx, r.clone(), c.re.clone())?, Value::int(2))?;
            let im2 = dispatch::div(ctx, dispatch::sub(ctx, r, c.re.clone())?, Value::int(2))?;
            let re = dispatch::op1(ctx, Op1::Sqrt, re2)?;
            let mut im = dispatch::op1(ctx, Op1::Sqrt, im2)?;
            if c.im.is_negative_value() {
                im = dispatch::neg(ctx, im)?;
            }
            make(ctx, re, im)
        }
        Op1::Exp => exp_complex(ctx, v),
        Op1::Log => log_complex(ctx, v),
        Op1::Log2 => {
            let l = log_complex(ctx, v)?;
            let ln2 = dispatch::op1(ctx, Op1::Log, Value::int(2))?;
            dispatch::div(ctx, l, ln2)
        }
        Op1::Log10 => {
            let l = log_complex(ctx, v)?;
            let ln10 = dispatch::op1(ctx, Op1::Log, Value::int(10))?;
            dispatch::div(ctx, l, ln10)
        }
        Op1::Sin | Op1::Cos | Op1::Tan => {
            let v = lift_elems(ctx, v)?;
            let iz = op2(ctx, Op2::Mul, v, make(ctx, Value::int(0), Value::int(1))?)?;
            let t = exp_complex(ctx, iz)?;
            let u = inverse(ctx, t.clone())?;
            let sin = || -> CalcResult<Value> {
                let num = dispatch::sub(ctx, t.clone(), u.clone())?;
                op2(ctx, Op2::Div, num, make(ctx, Value::int(0), Value::int(2))?)
            };
            let cos = || -> CalcResult<Value> {
                let num = dispatch::add(ctx, t.clone(), u.clone())?;
                dispatch::div(ctx, num, Value::int(2))
            };
            match op {
                Op1::Sin => sin(),
                Op1::Cos => cos(),
                _ => {
                    let s = sin()?;
                    let c = cos()?;
                    op2(ctx, Op2::Div, s, c)
                }
            }
        }
        Op1::Asin => {
            // asin z = -i log(iz + sqrt(1 - z^2))
            let v = lift_elems(ctx, v)?;
            let i = make(ctx, Value::int(0), Value::int(1))?;
            let z2 = op2(ctx, Op2::Mul, v.clone(), v.clone())?;
            let s = op1(ctx, Op1::Sqrt, dispatch::sub(ctx, Value::int(1), z2)?)?;
            let iz = op2(ctx, Op2::Mul, i.clone(), v)?;
            let l = log_complex(ctx, dispatch::add(ctx, iz, s)?)?;
            let mi = make(ctx, Value::int(0), Value::int(-1))?;
            op2(ctx, Op2::Mul, mi, l)
        }
        Op1::Acos => {
            let v = lift_elems(ctx, v)?;
            let sample = as_complex(&v).re.clone();
            let asin = op1(ctx, Op1::Asin, v)?;
            let hp = half_pi(ctx, &sample)?;
            dispatch::sub(ctx, hp, asin)
        }
        Op1::Atan => {
            // atan z = (i/2) (log(1 - iz) - log(1 + iz))
            let v = lift_elems(ctx, v)?;
            let i = make(ctx, Value::int(0), Value::int(1))?;
            let iz = op2(ctx, Op2::Mul, i.clone(), v)?;
            let la = log_complex(ctx, dispatch::sub(ctx, Value::int(1), iz.clone())?)?;
            let lb = log_complex(ctx, dispatch::add(ctx, Value::int(1), iz)?)?;
            let d = dispatch::sub(ctx, la, lb)?;
            let hi = make(ctx, Value::int(0), Value::int(1))?;
            dispatch::div(ctx, op2(ctx, Op2::Mul, hi, d)?, Value::int(2))
        }
        _ => Err(CalcError::ty("unsupported complex operation")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    #[test]
    fn gaussian_powers_stay_integral() {
        let c = Ctx::new();
        let z = make(&c, Value::int(1), Value::int(2)).unwrap();
        let r = dispatch::generic_pow(&c, z, BigInt::from(10)).unwrap();
        assert_eq!(show(&c, &r), "237-3116i");
    }

    #[test]
    fn principal_sqrt_keeps_sign() {
        let c = Ctx::new();
        // (2 - 3i)^2 = -5 - 12i; principal sqrt recovers 2 - 3i
        let z = make(&c, Value::int(-5), Value::int(-12)).unwrap();
        let r = op1(&c, Op1::Sqrt, z).unwrap();
        assert_eq!(show(&c, &r), "2.0-3.0i");
    }

    #[test]
    fn complex_division_promotes_to_decimal() {
        let c = Ctx::new();
        let a = make(&c, Value::int(1), Value::int(2)).unwrap();
        let b = make(&c, Value::int(1), Value::int(-1)).unwrap();
        let r = op2(&c, Op2::Div, a, b).unwrap();
        // (1+2i)/(1-i) = (-1+3i)/2
        assert_eq!(show(&c, &r), "-0.5+1.5i");
    }

    #[test]
    fn abs_of_gaussian_three_four() {
        let c = Ctx::new();
        let z = make(&c, Value::int(3), Value::int(4)).unwrap();
        let r = op1(&c, Op1::Abs, z).unwrap();
        assert_eq!(show(&c, &r), "5.0");
    }
}
