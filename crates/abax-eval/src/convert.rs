//! Cross-kind conversion and type promotion.
//!
//! `promote_types` implements the lattice rule (max tag, recursing on
//! element types); `convert` realizes a value in a target type. The two
//! are separate so dispatch can reject invalid pairs (Decimal × Float)
//! before any conversion happens.

use crate::context::Ctx;
use crate::value::{Complex, Poly, Series, Tensor, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::{Dec, Flt};
use num_rational::BigRational;
use std::rc::Rc;

/// Common implementation type for a binary operation on values of types
/// `a` and `b`.
pub fn promote_types(a: &Rc<Type>, b: &Rc<Type>) -> CalcResult<Rc<Type>> {
    if a == b {
        return Ok(a.clone());
    }
    let (ka, kb) = (a.kind(), b.kind());
    if ka == kb {
        if ka.has_elem() {
            let e = promote_types(a.elem().unwrap(), b.elem().unwrap())?;
            return Ok(Type::parametric(ka, e));
        }
        return Ok(a.clone());
    }
    let (lo, hi) = if ka < kb { (a, b) } else { (b, a) };
    let (klo, khi) = (lo.kind(), hi.kind());
    if !klo.is_numeric() || !khi.is_numeric() {
        return Err(CalcError::ty(format!("incompatible types {a} and {b}")));
    }
    if klo == Kind::Decimal && khi == Kind::Float {
        return Err(CalcError::ty(
            "cannot mix Decimal and Float; convert explicitly",
        ));
    }
    match khi {
        Kind::Bool | Kind::Integer | Kind::Fraction | Kind::Decimal | Kind::Float => {
            Ok(Type::simple(khi))
        }
        Kind::Tensor => {
            // any numeric kind can be a tensor element
            let e = promote_types(lo, hi.elem().unwrap())?;
            Ok(Type::tensor(e))
        }
        Kind::Complex | Kind::Polynomial | Kind::RationalFunction | Kind::Series => {
            let e_lo = if klo.has_elem() && klo != Kind::Complex {
                lo.elem().unwrap().clone()
            } else {
                lo.clone()
            };
            let e = promote_types(&e_lo, hi.elem().unwrap())?;
            Ok(Type::parametric(khi, e))
        }
        _ => Err(CalcError::ty(format!("incompatible types {a} and {b}"))),
    }
}

/// Zero value of a given type (numeric types only).
pub fn zero_of(ctx: &Ctx, t: &Rc<Type>) -> CalcResult<Value> {
    convert(ctx, Value::int(0), t)
}

pub fn one_of(ctx: &Ctx, t: &Rc<Type>) -> CalcResult<Value> {
    convert(ctx, Value::int(1), t)
}

fn conversion_error(v: &Value, target: &Type) -> CalcError {
    CalcError::ty(format!("cannot convert {} to {}", v.type_of(), target))
}

/// Realize `v` as a value of type `target`.
pub fn convert(ctx: &Ctx, v: Value, target: &Rc<Type>) -> CalcResult<Value> {
    if v.type_of() == *target {
        return Ok(v);
    }
    let prec = ctx.num.dec_prec;
    let p = ctx.num.float_prec;
    match target.kind() {
        Kind::Bool => match v {
            Value::Bool(_) => Ok(v),
            _ => Err(conversion_error(&v, target)),
        },
        Kind::Integer => match &v {
            Value::Bool(b) => Ok(Value::int(*b as i64)),
            Value::Int(_) => Ok(v),
            Value::Frac(f) => Ok(Value::Int(f.trunc().to_integer())),
            Value::Dec(d) => d
                .to_bigint()
                .map(Value::Int)
                .ok_or_else(|| CalcError::range("cannot convert to integer")),
            Value::Float(f) => f
                .to_bigint()
                .map(Value::Int)
                .ok_or_else(|| CalcError::range("cannot convert to integer")),
            _ => Err(conversion_error(&v, target)),
        },
        Kind::Fraction => match &v {
            Value::Bool(b) => Ok(Value::Frac(BigRational::from_integer((*b as i64).into()))),
            Value::Int(n) => Ok(Value::Frac(BigRational::from_integer(n.clone()))),
            Value::Frac(_) => Ok(v),
            _ => Err(conversion_error(&v, target)),
        },
        Kind::Decimal => match &v {
            Value::Bool(b) => Ok(Value::Dec(Dec::from_i64(*b as i64))),
            Value::Int(n) => Ok(Value::Dec(Dec::from_bigint(n).round_prec(prec))),
            Value::Frac(f) => {
                let num = Dec::from_bigint(f.numer());
                let den = Dec::from_bigint(f.denom());
                Ok(Value::Dec(num.div(&den, prec)))
            }
            Value::Dec(_) => Ok(v),
            Value::Float(f) => Ok(Value::Dec(f.to_dec(prec))),
            _ => Err(conversion_error(&v, target)),
        },
        Kind::Float => match &v {
            Value::Bool(b) => Ok(Value::Float(Flt::from_f64(*b as i64 as f64, p))),
            Value::Int(n) => Ok(Value::Float(Flt::from_bigint(n, p, &mut ctx.num.cc()))),
            Value::Frac(f) => {
                let num = Flt::from_bigint(f.numer(), p, &mut ctx.num.cc());
                let den = Flt::from_bigint(f.denom(), p, &mut ctx.num.cc());
                Ok(Value::Float(num.div(&den, p)))
            }
            Value::Dec(d) => Ok(Value::Float(Flt::from_dec(d, p, &mut ctx.num.cc()))),
            Value::Float(_) => Ok(v),
            _ => Err(conversion_error(&v, target)),
        },
        Kind::Complex => {
            let elem = target.elem().unwrap();
            match v {
                Value::Complex(c) => {
                    let re = convert(ctx, c.re.clone(), elem)?;
                    let im = convert(ctx, c.im.clone(), elem)?;
                    Ok(Value::Complex(Rc::new(Complex { re, im })))
                }
                other => {
                    let re = convert(ctx, other, elem)?;
                    let im = zero_of(ctx, elem)?;
                    Ok(Value::Complex(Rc::new(Complex { re, im })))
                }
            }
        }
        Kind::Polynomial => {
            let elem = target.elem().unwrap();
            match v {
                Value::Poly(p) => {
                    let coeffs = p
                        .coeffs
                        .iter()
                        .map(|c| convert(ctx, c.clone(), elem))
                        .collect::<CalcResult<Vec<_>>>()?;
                    Ok(crate::poly::poly_value(elem.clone(), coeffs))
                }
                other if other.kind() <= Kind::Complex => {
                    let c = convert(ctx, other, elem)?;
                    Ok(Value::Poly(Rc::new(Poly {
                        elem: elem.clone(),
                        coeffs: vec![c],
                    })))
                }
                other => Err(conversion_error(&other, target)),
            }
        }
        Kind::RationalFunction => {
            let elem = target.elem().unwrap();
            let pt = Type::polynomial(elem.clone());
            match v {
                Value::RFrac(r) => {
                    let num = convert(ctx, Value::Poly(Rc::new(r.num.clone())), &pt)?;
                    let den = convert(ctx, Value::Poly(Rc::new(r.den.clone())), &pt)?;
                    crate::rfrac::rfrac_new(ctx, num, den)
                }
                other if other.kind() <= Kind::Polynomial => {
                    let num = convert(ctx, other, &pt)?;
                    let den = one_of(ctx, &pt)?;
                    crate::rfrac::rfrac_new(ctx, num, den)
                }
                other => Err(conversion_error(&other, target)),
            }
        }
        Kind::Series => {
            let elem = target.elem().unwrap();
            match v {
                Value::Series(s) => {
                    let coeffs = s
                        .coeffs
                        .iter()
                        .map(|c| convert(ctx, c.clone(), elem))
                        .collect::<CalcResult<Vec<_>>>()?;
                    Ok(crate::series::series_value(Series {
                        elem: elem.clone(),
                        emin: s.emin,
                        coeffs,
                    }))
                }
                other => Err(conversion_error(&other, target)),
            }
        }
        Kind::Tensor => {
            let elem = target.elem().unwrap();
            match v {
                Value::Tensor(t) => {
                    let cells = t
                        .cells
                        .iter()
                        .map(|c| convert(ctx, c.clone(), elem))
                        .collect::<CalcResult<Vec<_>>>()?;
                    Ok(Value::Tensor(Rc::new(Tensor {
                        elem: elem.clone(),
                        dims: t.dims.clone(),
                        cells,
                    })))
                }
                other => Err(conversion_error(&other, target)),
            }
        }
        _ => Err(conversion_error(&v, target)),
    }
}

/// Promote every operand below Decimal for the transcendental entry
/// points.
pub fn to_dec_value(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    if v.kind() < Kind::Decimal {
        convert(ctx, v, &Type::simple(Kind::Decimal))
    } else {
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(k: Kind) -> Rc<Type> {
        Type::simple(k)
    }

    #[test]
    fn lattice_promotions() {
        let ty = promote_types(&t(Kind::Integer), &t(Kind::Fraction)).unwrap();
        assert_eq!(ty.to_string(), "Fraction");
        let ty = promote_types(&Type::complex(t(Kind::Integer)), &t(Kind::Fraction)).unwrap();
        assert_eq!(ty.to_string(), "Complex(Fraction)");
        let ty = promote_types(
            &Type::polynomial(t(Kind::Integer)),
            &Type::complex(t(Kind::Fraction)),
        )
        .unwrap();
        assert_eq!(ty.to_string(), "Polynomial(Complex(Fraction))");
        let ty = promote_types(
            &Type::tensor(t(Kind::Integer)),
            &Type::polynomial(t(Kind::Decimal)),
        )
        .unwrap();
        assert_eq!(ty.to_string(), "Tensor(Polynomial(Decimal))");
    }

    #[test]
    fn decimal_float_mix_is_rejected() {
        assert!(promote_types(&t(Kind::Decimal), &t(Kind::Float)).is_err());
        assert!(promote_types(&t(Kind::Float), &t(Kind::Decimal)).is_err());
    }

    #[test]
    fn promotion_is_idempotent() {
        for k in [Kind::Integer, Kind::Fraction, Kind::Decimal, Kind::Float] {
            let ty = promote_types(&t(k), &t(k)).unwrap();
            assert_eq!(ty.kind(), k);
        }
    }

    #[test]
    fn convert_truncates_toward_zero() {
        let ctx = Ctx::new();
        let v = convert(
            &ctx,
            Value::Frac(BigRational::new((-7).into(), 2.into())),
            &t(Kind::Integer),
        )
        .unwrap();
        assert!(v.eq_int(-3));
    }
}
