//! Dense univariate polynomials over any scalar element type.
//!
//! Little-endian coefficients (index = degree), always trimmed: either
//! a single coefficient or a nonzero leading one. The gcd uses
//! pseudo-division with primitive-part normalization over the integers
//! and a monic Euclidean loop over fields.

use crate::context::Ctx;
use crate::convert::{convert, one_of, promote_types, zero_of};
use crate::dispatch::{self, Op1, Op2};
use crate::value::{Poly, Tensor, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::Flt;
use num_bigint::BigInt;
use smallvec::smallvec;
use std::rc::Rc;

/// Drop zero leading coefficients, keeping at least one.
pub fn trim(coeffs: &mut Vec<Value>) {
    while coeffs.len() > 1 && coeffs.last().map(Value::is_zero_value) == Some(true) {
        coeffs.pop();
    }
}

/// Build a polynomial value, trimming the coefficient list.
pub fn poly_value(elem: Rc<Type>, mut coeffs: Vec<Value>) -> Value {
    trim(&mut coeffs);
    Value::Poly(Rc::new(Poly { elem, coeffs }))
}

/// The monomial `X` over integer coefficients.
pub fn poly_x() -> Value {
    Value::Poly(Rc::new(Poly {
        elem: Type::simple(Kind::Integer),
        coeffs: vec![Value::int(0), Value::int(1)],
    }))
}

/// Lift a scalar (or pass a polynomial through).
pub fn to_poly(ctx: &Ctx, v: Value) -> CalcResult<Rc<Poly>> {
    match v {
        Value::Poly(p) => Ok(p),
        other if other.kind() <= Kind::Complex => {
            let elem = other.type_of();
            let other = if other.kind() == Kind::Bool {
                convert(ctx, other, &Type::simple(Kind::Integer))?
            } else {
                other
            };
            let elem = if elem.kind() == Kind::Bool {
                Type::simple(Kind::Integer)
            } else {
                elem
            };
            Ok(Rc::new(Poly {
                elem,
                coeffs: vec![other],
            }))
        }
        _ => Err(CalcError::ty("cannot convert to a polynomial")),
    }
}

/// Degree; the zero polynomial has degree -1.
pub fn deg(p: &Poly) -> i64 {
    let n = p.coeffs.len() as i64 - 1;
    if n == 0 && p.coeffs[0].is_zero_value() {
        -1
    } else {
        n
    }
}

fn promote_elems(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<(Poly, Poly, Rc<Type>)> {
    let elem = promote_types(&a.elem, &b.elem)?;
    let t = Type::polynomial(elem.clone());
    let pa = convert(ctx, Value::Poly(Rc::new(a.clone())), &t)?;
    let pb = convert(ctx, Value::Poly(Rc::new(b.clone())), &t)?;
    let (Value::Poly(pa), Value::Poly(pb)) = (pa, pb) else {
        unreachable!()
    };
    Ok(((*pa).clone(), (*pb).clone(), elem))
}

fn add_or_sub(ctx: &Ctx, a: &Poly, b: &Poly, subtract: bool) -> CalcResult<Value> {
    let (a, b, elem) = promote_elems(ctx, a, b)?;
    let n = a.coeffs.len().max(b.coeffs.len());
    let mut coeffs = Vec::with_capacity(n);
    for i in 0..n {
        let ca = a
            .coeffs
            .get(i)
            .cloned()
            .map_or_else(|| zero_of(ctx, &elem), Ok)?;
        let cb = b
            .coeffs
            .get(i)
            .cloned()
            .map_or_else(|| zero_of(ctx, &elem), Ok)?;
        let c = if subtract {
            dispatch::sub(ctx, ca, cb)?
        } else {
            dispatch::add(ctx, ca, cb)?
        };
        coeffs.push(c);
    }
    Ok(poly_value(elem, coeffs))
}

pub fn mul(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<Value> {
    let (a, b, elem) = promote_elems(ctx, a, b)?;
    let n = a.coeffs.len() + b.coeffs.len() - 1;
    let mut coeffs = Vec::with_capacity(n);
    for _ in 0..n {
        coeffs.push(zero_of(ctx, &elem)?);
    }
    for (i, ca) in a.coeffs.iter().enumerate() {
        for (j, cb) in b.coeffs.iter().enumerate() {
            let prod = dispatch::mul(ctx, ca.clone(), cb.clone())?;
            coeffs[i + j] = dispatch::add(ctx, coeffs[i + j].clone(), prod)?;
        }
    }
    Ok(poly_value(elem, coeffs))
}

/// Coefficientwise division by a constant polynomial.
fn div_const(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<Value> {
    if b.coeffs.len() != 1 {
        return Err(CalcError::ty(
            "polynomial division: use divrem, %, or // for non-constant divisors",
        ));
    }
    let c = b.coeffs[0].clone();
    let mut coeffs = Vec::with_capacity(a.coeffs.len());
    for x in &a.coeffs {
        coeffs.push(dispatch::div(ctx, x.clone(), c.clone())?);
    }
    let elem = coeffs[0].type_of();
    Ok(poly_value(elem, coeffs))
}

/// Long division. Over integer (and Gaussian-integer) elements the
/// elimination uses exact division, which the callers pre-establish.
pub fn divrem(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<(Poly, Poly)> {
    let (a, b, elem) = promote_elems(ctx, a, b)?;
    if deg(&b) < 0 {
        return Err(CalcError::range("division by zero polynomial"));
    }
    let (n1, n2) = (a.coeffs.len(), b.coeffs.len());
    if n1 < n2 {
        let q = Poly {
            elem: elem.clone(),
            coeffs: vec![zero_of(ctx, &elem)?],
        };
        return Ok((q, a));
    }
    let is_int = elem.kind() == Kind::Integer
        || (elem.kind() == Kind::Complex
            && elem.elem().map(|e| e.kind()) == Some(Kind::Integer));
    let mut rem = a.coeffs.clone();
    let mut quo = vec![zero_of(ctx, &elem)?; n1 - n2 + 1];
    let lead = b.coeffs[n2 - 1].clone();
    for i in (0..=n1 - n2).rev() {
        let top = rem[i + n2 - 1].clone();
        if !top.is_zero_value() {
            let c = if is_int {
                dispatch::div_exact(ctx, top, lead.clone())?
            } else {
                dispatch::div(ctx, top, lead.clone())?
            };
            for j in 0..n2 {
                let t = dispatch::mul(ctx, b.coeffs[j].clone(), c.clone())?;
                rem[i + j] = dispatch::sub(ctx, rem[i + j].clone(), t)?;
            }
            quo[i] = c;
        }
    }
    trim(&mut quo);
    trim(&mut rem);
    let elem_q = quo[0].type_of();
    let elem_r = rem[0].type_of();
    Ok((
        Poly {
            elem: elem_q,
            coeffs: quo,
        },
        Poly {
            elem: elem_r,
            coeffs: rem,
        },
    ))
}

/// Pseudo-remainder: scale the dividend by `lead(b)^(deg a - deg b + 1)`
/// so the division stays in the base ring.
fn prem(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<Poly> {
    let da = deg(a);
    let db = deg(b);
    let a = if da >= db {
        let lead = b.coeffs[b.coeffs.len() - 1].clone();
        let scale = dispatch::generic_pow(ctx, lead, BigInt::from(da - db + 1))?;
        let Value::Poly(p) = mul(ctx, a, &*to_poly(ctx, scale)?)? else {
            unreachable!()
        };
        (*p).clone()
    } else {
        a.clone()
    };
    Ok(divrem(ctx, &a, b)?.1)
}

/// Gcd of the coefficients of an integer polynomial.
fn content(ctx: &Ctx, p: &Poly) -> CalcResult<Value> {
    if p.elem.kind() != Kind::Integer {
        return Err(CalcError::ty("integer polynomial expected"));
    }
    let mut g = p.coeffs[0].as_int()?.clone();
    for c in &p.coeffs[1..] {
        g = num_integer::Integer::gcd(&g, c.as_int()?);
    }
    let _ = ctx;
    Ok(Value::Int(g))
}

/// Primitive part: divide out the content, leading coefficient made
/// positive.
pub fn primpart(ctx: &Ctx, p: &Poly) -> CalcResult<Value> {
    if deg(p) < 0 {
        return Ok(Value::Poly(Rc::new(p.clone())));
    }
    let mut g = content(ctx, p)?;
    if p.coeffs[p.coeffs.len() - 1].is_negative_value() != g.is_negative_value() {
        g = dispatch::neg(ctx, g)?;
    }
    let mut coeffs = Vec::with_capacity(p.coeffs.len());
    for c in &p.coeffs {
        coeffs.push(dispatch::div_exact(ctx, c.clone(), g.clone())?);
    }
    Ok(poly_value(p.elem.clone(), coeffs))
}

/// Polynomial gcd: subresultant-style pseudo-division over the
/// integers, monic Euclidean algorithm over fields.
pub fn gcd(ctx: &Ctx, a: &Poly, b: &Poly) -> CalcResult<Value> {
    let (mut a, mut b, elem) = promote_elems(ctx, a, b)?;
    let is_int = elem.kind() == Kind::Integer;
    while deg(&b) >= 0 {
        let next = if is_int {
            let r = prem(ctx, &a, &b)?;
            let Value::Poly(r) = primpart(ctx, &r)? else {
                unreachable!()
            };
            (*r).clone()
        } else {
            divrem(ctx, &a, &b)?.1
        };
        a = b;
        b = next;
    }
    if !is_int {
        let lead = a.coeffs[a.coeffs.len() - 1].clone();
        return div_const(ctx, &a, &*to_poly(ctx, lead)?);
    }
    Ok(Value::Poly(Rc::new(a)))
}

pub fn deriv(ctx: &Ctx, p: &Poly) -> CalcResult<Value> {
    let n = p.coeffs.len();
    if n == 1 {
        return Ok(poly_value(p.elem.clone(), vec![zero_of(ctx, &p.elem)?]));
    }
    let mut coeffs = Vec::with_capacity(n - 1);
    for i in 1..n {
        coeffs.push(dispatch::mul(
            ctx,
            p.coeffs[i].clone(),
            Value::int(i as i64),
        )?);
    }
    Ok(poly_value(p.elem.clone(), coeffs))
}

/// Antiderivative with zero constant; the element type is promoted to
/// its field (integer coefficients become decimals).
pub fn integ(ctx: &Ctx, p: &Poly) -> CalcResult<Value> {
    let n = p.coeffs.len();
    let mut coeffs = Vec::with_capacity(n + 1);
    coeffs.push(Value::int(0));
    for i in 0..n {
        coeffs.push(dispatch::div(
            ctx,
            p.coeffs[i].clone(),
            Value::int(i as i64 + 1),
        )?);
    }
    let elem = coeffs[1].type_of();
    coeffs[0] = zero_of(ctx, &elem)?;
    Ok(poly_value(elem, coeffs))
}

/// Horner evaluation; `x` may be any value the generic operations
/// accept, including a series.
pub fn apply(ctx: &Ctx, p: &Poly, x: &Value) -> CalcResult<Value> {
    let n = p.coeffs.len();
    let mut v = p.coeffs[n - 1].clone();
    for i in (0..n - 1).rev() {
        v = dispatch::mul(ctx, v, x.clone())?;
        v = dispatch::add(ctx, v, p.coeffs[i].clone())?;
    }
    Ok(v)
}

pub fn eq(ctx: &Ctx, a: &Poly, b: &Poly) -> bool {
    if a.coeffs.len() != b.coeffs.len() {
        return false;
    }
    a.coeffs
        .iter()
        .zip(b.coeffs.iter())
        .all(|(x, y)| dispatch::eq_bool(ctx, x.clone(), y.clone()))
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let a = to_poly(ctx, a)?;
    let b = to_poly(ctx, b)?;
    match op {
        Op2::Add => add_or_sub(ctx, &a, &b, false),
        Op2::Sub => add_or_sub(ctx, &a, &b, true),
        Op2::Mul | Op2::DotMul => mul(ctx, &a, &b),
        Op2::Div => div_const(ctx, &a, &b),
        Op2::Mod => {
            let (_, r) = divrem(ctx, &a, &b)?;
            Ok(Value::Poly(Rc::new(r)))
        }
        Op2::DivRem => {
            let (q, r) = divrem(ctx, &a, &b)?;
            Ok(Value::Array(Rc::new(vec![
                Value::Poly(Rc::new(q)),
                Value::Poly(Rc::new(r)),
            ])))
        }
        Op2::FracDiv => crate::rfrac::rfrac_new(
            ctx,
            Value::Poly(a.clone()),
            Value::Poly(b.clone()),
        ),
        Op2::CmpEq => Ok(Value::Bool(eq(ctx, &a, &b))),
        _ => Err(CalcError::ty("unsupported polynomial operation")),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    match op {
        Op1::Neg => {
            let Value::Poly(p) = v else { unreachable!() };
            let mut coeffs = Vec::with_capacity(p.coeffs.len());
            for c in &p.coeffs {
                coeffs.push(dispatch::neg(ctx, c.clone())?);
            }
            Ok(poly_value(p.elem.clone(), coeffs))
        }
        _ => Err(CalcError::ty("unsupported polynomial operation")),
    }
}

/* ----------------------- Laguerre root finding ---------------------- */

/// One Laguerre iteration run: find a single root of `p` starting from
/// `z`, to tolerance `eps`, in at most `max_it` steps.
fn root_laguerre1(
    ctx: &Ctx,
    p: &Poly,
    initial_z: &Value,
    eps: &Value,
    max_it: usize,
) -> CalcResult<Value> {
    let d = p.coeffs.len() as i64 - 1;
    if d == 1 {
        let q = dispatch::div(ctx, p.coeffs[0].clone(), p.coeffs[1].clone())?;
        return dispatch::neg(ctx, q);
    }
    let mut z = initial_z.clone();
    let eps2 = dispatch::mul(ctx, eps.clone(), eps.clone())?;
    let Value::Poly(p1) = deriv(ctx, p)? else {
        unreachable!()
    };
    let Value::Poly(p2) = deriv(ctx, &p1)? else {
        unreachable!()
    };
    for _ in 0..max_it {
        let z0 = apply(ctx, p, &z)?;
        let t0 = crate::scalar::complex_ops::norm2(ctx, &z0)?;
        if dispatch::le_bool(ctx, t0, eps2.clone())? {
            break;
        }
        let z1 = apply(ctx, &p1, &z)?;
        let z2 = apply(ctx, &p2, &z)?;
        let t0 = dispatch::mul(ctx, Value::int(d - 1), z1.clone())?;
        let t0 = dispatch::mul(ctx, t0.clone(), t0)?;
        let t1 = dispatch::mul(
            ctx,
            dispatch::mul(ctx, Value::int(d * (d - 1)), z0.clone())?,
            z2,
        )?;
        let t0 = dispatch::op1(ctx, Op1::Sqrt, dispatch::sub(ctx, t0, t1)?)?;
        let d1 = dispatch::add(ctx, z1.clone(), t0.clone())?;
        let d2 = dispatch::sub(ctx, z1, t0)?;
        let n1 = crate::scalar::complex_ops::norm2(ctx, &d1)?;
        let n2 = crate::scalar::complex_ops::norm2(ctx, &d2)?;
        let denom = if dispatch::lt_bool(ctx, n1, n2)? { d2 } else { d1 };
        if denom.is_zero_value() {
            return Err(CalcError::range("root not found"));
        }
        let step = dispatch::div(ctx, dispatch::mul(ctx, Value::int(d), z0)?, denom)?;
        z = dispatch::sub(ctx, z, step)?;
    }
    Ok(z)
}

/// All complex roots by Laguerre iteration with deflation. Fixed start
/// points, 50 iterations per root, default tolerance 1e-10.
pub fn roots(ctx: &Ctx, p: Value, eps: Option<Value>) -> CalcResult<Value> {
    const START_POINTS: [f64; 3] = [0.1, -1.4, 1.7];
    let Value::Poly(p) = p else {
        return Err(CalcError::ty("polynomial expected"));
    };
    let d = p.coeffs.len() - 1;
    if d == 0 {
        return Err(CalcError::range("polynomial of degree >= 1 expected"));
    }
    // work in Complex(Float) for float polynomials, Complex(Decimal)
    // otherwise
    let real = match p.elem.kind() {
        Kind::Float => Type::simple(Kind::Float),
        Kind::Complex if p.elem.elem().map(|e| e.kind()) == Some(Kind::Float) => {
            Type::simple(Kind::Float)
        }
        _ => Type::simple(Kind::Decimal),
    };
    let eps = match eps {
        Some(e) => convert(ctx, e, &real)?,
        None => convert(
            ctx,
            Value::Float(Flt::from_f64(1e-10, ctx.num.float_prec)),
            &real,
        )?,
    };
    let celem = Type::complex(real);
    let pt = Type::polynomial(celem.clone());
    let Value::Poly(mut p) = convert(ctx, Value::Poly(p), &pt)? else {
        unreachable!()
    };
    let mut cells = Vec::with_capacity(d);
    for _ in 0..d {
        let mut found = None;
        let mut last_err = CalcError::range("root not found");
        for s in START_POINTS {
            let start = convert(ctx, Value::Float(Flt::from_f64(s, ctx.num.float_prec)), &celem)?;
            match root_laguerre1(ctx, &p, &start, &eps, 50) {
                Ok(z) => {
                    found = Some(z);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let Some(z) = found else {
            return Err(last_err);
        };
        cells.push(z.clone());
        // deflate by (X - z)
        let neg_z = dispatch::neg(ctx, z)?;
        let lin = Poly {
            elem: celem.clone(),
            coeffs: vec![neg_z, one_of(ctx, &celem)?],
        };
        let (q, _) = divrem(ctx, &p, &lin)?;
        p = Rc::new(q);
    }
    Ok(Value::Tensor(Rc::new(Tensor {
        elem: celem,
        dims: smallvec![d],
        cells,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn x() -> Value {
        poly_x()
    }

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    #[test]
    fn arithmetic_trims() {
        let c = Ctx::new();
        // (1 + X) + (1 - X) = 2
        let a = dispatch::add(&c, Value::int(1), x()).unwrap();
        let b = dispatch::sub(&c, Value::int(1), x()).unwrap();
        let s = dispatch::add(&c, a, b).unwrap();
        match &s {
            Value::Poly(p) => assert_eq!(p.coeffs.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(show(&c, &s), "Polynomial(2)");
    }

    #[test]
    fn divrem_round_trip() {
        let c = Ctx::new();
        // a = q*b + r with q = 1+X+X^2, b = X^2-1, r = 1+X
        let q = {
            let x2 = dispatch::mul(&c, x(), x()).unwrap();
            dispatch::add(&c, dispatch::add(&c, Value::int(1), x()).unwrap(), x2).unwrap()
        };
        let b = {
            let x2 = dispatch::mul(&c, x(), x()).unwrap();
            dispatch::sub(&c, x2, Value::int(1)).unwrap()
        };
        let r = dispatch::add(&c, Value::int(1), x()).unwrap();
        let a = dispatch::add(&c, dispatch::mul(&c, q.clone(), b.clone()).unwrap(), r.clone())
            .unwrap();
        let m = dispatch::modulo(&c, a, b).unwrap();
        assert_eq!(show(&c, &m), "X+1");
    }

    #[test]
    fn integer_gcd_is_primitive() {
        let c = Ctx::new();
        // gcd(2X-2, X^2-1) = X - 1
        let a = {
            let two_x = dispatch::mul(&c, Value::int(2), x()).unwrap();
            dispatch::sub(&c, two_x, Value::int(2)).unwrap()
        };
        let b = {
            let x2 = dispatch::mul(&c, x(), x()).unwrap();
            dispatch::sub(&c, x2, Value::int(1)).unwrap()
        };
        let (Value::Poly(pa), Value::Poly(pb)) = (a, b) else {
            unreachable!()
        };
        let g = gcd(&c, &pa, &pb).unwrap();
        assert_eq!(show(&c, &g), "X-1");
    }

    #[test]
    fn deriv_integ_round_trip() {
        let c = Ctx::new();
        // deriv(1 - 2X^2 + 2X^3) = 6X^2 - 4X
        let p = {
            let x2 = dispatch::mul(&c, x(), x()).unwrap();
            let x3 = dispatch::mul(&c, x2.clone(), x()).unwrap();
            let t = dispatch::sub(
                &c,
                Value::int(1),
                dispatch::mul(&c, Value::int(2), x2).unwrap(),
            )
            .unwrap();
            dispatch::add(&c, t, dispatch::mul(&c, Value::int(2), x3).unwrap()).unwrap()
        };
        let Value::Poly(p) = p else { unreachable!() };
        let d = deriv(&c, &p).unwrap();
        assert_eq!(show(&c, &d), "6*X^2-4*X");
        let Value::Poly(d) = d else { unreachable!() };
        let i = integ(&c, &d).unwrap();
        assert_eq!(show(&c, &i), "2.0*X^3-2.0*X^2");
    }

    #[test]
    fn horner_evaluation() {
        let c = Ctx::new();
        let p = {
            let x2 = dispatch::mul(&c, x(), x()).unwrap();
            dispatch::add(&c, dispatch::add(&c, Value::int(1), x()).unwrap(), x2).unwrap()
        };
        let Value::Poly(p) = p else { unreachable!() };
        let v = apply(&c, &p, &Value::int(2)).unwrap();
        assert!(v.eq_int(7));
    }

    #[test]
    fn laguerre_finds_simple_roots() {
        let c = Ctx::new();
        // (X - 1)(X - 2) = X^2 - 3X + 2
        let p = poly_value(
            Type::simple(Kind::Integer),
            vec![Value::int(2), Value::int(-3), Value::int(1)],
        );
        let r = roots(&c, p, None).unwrap();
        let Value::Tensor(t) = &r else { unreachable!() };
        assert_eq!(t.cells.len(), 2);
        for cell in &t.cells {
            let re = dispatch::op1(&c, Op1::Re, cell.clone()).unwrap();
            let near_1 = {
                let d = dispatch::sub(&c, re.clone(), Value::int(1)).unwrap();
                let d = dispatch::op1(&c, Op1::Abs, d).unwrap();
                dispatch::lt_bool(&c, d, Value::Dec(abax_num::Dec::parse("1e-9", 16).unwrap()))
                    .unwrap()
            };
            let near_2 = {
                let d = dispatch::sub(&c, re, Value::int(2)).unwrap();
                let d = dispatch::op1(&c, Op1::Abs, d).unwrap();
                dispatch::lt_bool(&c, d, Value::Dec(abax_num::Dec::parse("1e-9", 16).unwrap()))
                    .unwrap()
            };
            assert!(near_1 || near_2);
        }
    }
}
