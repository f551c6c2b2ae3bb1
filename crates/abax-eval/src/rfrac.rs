//! Rational functions: reduced quotients of polynomials.

use crate::context::Ctx;
use crate::convert::{convert, promote_types};
use crate::dispatch::{self, Op1, Op2};
use crate::poly::{self, to_poly};
use crate::value::{Poly, RFrac, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use num_bigint::BigInt;
use std::rc::Rc;

fn ring_supports_gcd(elem: &Type) -> bool {
    match elem.kind() {
        Kind::Integer | Kind::Fraction => true,
        Kind::Complex => matches!(
            elem.elem().map(|e| e.kind()),
            Some(Kind::Integer) | Some(Kind::Fraction)
        ),
        _ => false,
    }
}

/// Normalize a numerator/denominator pair: common element type, gcd
/// reduction where the coefficient ring supports it, integer
/// polynomials rescaled so the quotients stay integral.
pub fn rfrac_new(ctx: &Ctx, num: Value, den: Value) -> CalcResult<Value> {
    let num = to_poly(ctx, num)?;
    let den = to_poly(ctx, den)?;
    let elem = promote_types(&num.elem, &den.elem)?;
    let t = Type::polynomial(elem.clone());
    let Value::Poly(mut num) = convert(ctx, Value::Poly(num), &t)? else {
        unreachable!()
    };
    let Value::Poly(mut den) = convert(ctx, Value::Poly(den), &t)? else {
        unreachable!()
    };
    if poly::deg(&den) < 0 {
        return Err(CalcError::range("division by zero"));
    }
    if ring_supports_gcd(&elem) {
        let Value::Poly(g) = poly::gcd(ctx, &num, &den)? else {
            unreachable!()
        };
        if elem.kind() == Kind::Integer {
            // scale so that dividing by g keeps integer coefficients
            let e = poly::deg(&num).max(poly::deg(&den)) - poly::deg(&g) + 1;
            let lead = g.coeffs[g.coeffs.len() - 1].clone();
            let mult = dispatch::generic_pow(ctx, lead, BigInt::from(e))?;
            let mp = to_poly(ctx, mult)?;
            let Value::Poly(n2) = poly::mul(ctx, &num, &mp)? else {
                unreachable!()
            };
            let Value::Poly(d2) = poly::mul(ctx, &den, &mp)? else {
                unreachable!()
            };
            num = n2;
            den = d2;
        }
        let (qn, _) = poly::divrem(ctx, &num, &g)?;
        let (qd, _) = poly::divrem(ctx, &den, &g)?;
        num = Rc::new(qn);
        den = Rc::new(qd);
    }
    Ok(Value::RFrac(Rc::new(RFrac {
        num: (*num).clone(),
        den: (*den).clone(),
    })))
}

fn to_rfrac(ctx: &Ctx, v: Value) -> CalcResult<Rc<RFrac>> {
    match v {
        Value::RFrac(r) => Ok(r),
        other if other.kind() <= Kind::Polynomial => {
            let r = rfrac_new(ctx, other, Value::int(1))?;
            let Value::RFrac(r) = r else { unreachable!() };
            Ok(r)
        }
        _ => Err(CalcError::ty("cannot convert to a rational function")),
    }
}

fn pv(p: &Poly) -> Value {
    Value::Poly(Rc::new(p.clone()))
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let a = to_rfrac(ctx, a)?;
    let b = to_rfrac(ctx, b)?;
    match op {
        Op2::Add | Op2::Sub => {
            let l = dispatch::mul(ctx, pv(&a.num), pv(&b.den))?;
            let r = dispatch::mul(ctx, pv(&b.num), pv(&a.den))?;
            let num = if op == Op2::Add {
                dispatch::add(ctx, l, r)?
            } else {
                dispatch::sub(ctx, l, r)?
            };
            let den = dispatch::mul(ctx, pv(&a.den), pv(&b.den))?;
            rfrac_new(ctx, num, den)
        }
        Op2::Mul | Op2::DotMul => {
            let num = dispatch::mul(ctx, pv(&a.num), pv(&b.num))?;
            let den = dispatch::mul(ctx, pv(&a.den), pv(&b.den))?;
            rfrac_new(ctx, num, den)
        }
        Op2::Div | Op2::FracDiv => {
            let num = dispatch::mul(ctx, pv(&a.num), pv(&b.den))?;
            let den = dispatch::mul(ctx, pv(&a.den), pv(&b.num))?;
            rfrac_new(ctx, num, den)
        }
        Op2::CmpEq => Ok(Value::Bool(
            poly::eq(ctx, &a.num, &b.num) && poly::eq(ctx, &a.den, &b.den),
        )),
        _ => Err(CalcError::ty("unsupported rational-function operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let Value::RFrac(r) = v else { unreachable!() };
    match op {
        Op1::Neg => {
            let num = dispatch::neg(ctx, pv(&r.num))?;
            rfrac_new(ctx, num, pv(&r.den))
        }
        _ => Err(CalcError::ty("unsupported rational-function operation")),
    }
}

/// Quotient-rule derivative.
pub fn deriv(ctx: &Ctx, r: &RFrac) -> CalcResult<Value> {
    let dn = poly::deriv(ctx, &r.num)?;
    let dd = poly::deriv(ctx, &r.den)?;
    let num = dispatch::sub(
        ctx,
        dispatch::mul(ctx, dn, pv(&r.den))?,
        dispatch::mul(ctx, pv(&r.num), dd)?,
    )?;
    let den = dispatch::mul(ctx, pv(&r.den), pv(&r.den))?;
    rfrac_new(ctx, num, den)
}

pub fn apply(ctx: &Ctx, r: &RFrac, x: &Value) -> CalcResult<Value> {
    let num = poly::apply(ctx, &r.num, x)?;
    let den = poly::apply(ctx, &r.den, x)?;
    dispatch::div(ctx, num, den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;
    use crate::poly::poly_x;

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    #[test]
    fn reduction_over_integer_coefficients() {
        let c = Ctx::new();
        // (2X - 2) // (X^2 - 1) = 2 // (X + 1)
        let num = dispatch::sub(
            &c,
            dispatch::mul(&c, Value::int(2), poly_x()).unwrap(),
            Value::int(2),
        )
        .unwrap();
        let den = dispatch::sub(
            &c,
            dispatch::mul(&c, poly_x(), poly_x()).unwrap(),
            Value::int(1),
        )
        .unwrap();
        let r = rfrac_new(&c, num, den).unwrap();
        assert_eq!(show(&c, &r), "(Polynomial(2))//(X+1)");
    }

    #[test]
    fn apply_evaluates_the_quotient() {
        let c = Ctx::new();
        // (X // (X^2 + 1))(2//1) = 2//5
        let den = dispatch::add(
            &c,
            dispatch::mul(&c, poly_x(), poly_x()).unwrap(),
            Value::int(1),
        )
        .unwrap();
        let Value::RFrac(r) = rfrac_new(&c, poly_x(), den).unwrap() else {
            unreachable!()
        };
        let two = Value::Frac(num_rational::BigRational::from_integer(2.into()));
        let v = apply(&c, &r, &two).unwrap();
        assert_eq!(show(&c, &v), "2//5");
    }

    #[test]
    fn quotient_rule() {
        let c = Ctx::new();
        // deriv((X^2 - X + 1)//(X - 1)) = (X^2 - 2X)//(X^2 - 2X + 1)
        let num = {
            let x2 = dispatch::mul(&c, poly_x(), poly_x()).unwrap();
            let t = dispatch::sub(&c, x2, poly_x()).unwrap();
            dispatch::add(&c, t, Value::int(1)).unwrap()
        };
        let den = dispatch::sub(&c, poly_x(), Value::int(1)).unwrap();
        let Value::RFrac(r) = rfrac_new(&c, num, den).unwrap() else {
            unreachable!()
        };
        let d = deriv(&c, &r).unwrap();
        assert_eq!(show(&c, &d), "(X^2-2*X)//(X^2-2*X+1)");
    }
}
