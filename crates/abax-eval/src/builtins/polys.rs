//! Polynomial, rational-function and series built-ins.

use crate::context::Ctx;
use crate::convert::{convert, promote_types};
use crate::value::Value;
use crate::{poly, rfrac, series};
use abax_common::{CalcError, CalcResult, Kind, Type};

/// `Polynomial(v)`: from a coefficient vector (tensor or array,
/// little-endian), idempotent on polynomials, constant otherwise.
pub fn polynomial_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let coeffs: Vec<Value> = match &v {
        Value::Poly(_) => return Ok(v),
        Value::Tensor(t) => {
            if t.rank() != 1 {
                return Err(CalcError::ty("coefficient vector expected"));
            }
            t.cells.clone()
        }
        Value::Array(items) => items.iter().cloned().collect(),
        other if other.kind() <= Kind::Complex => {
            return Ok(Value::Poly(poly::to_poly(ctx, v)?));
        }
        _ => return Err(CalcError::ty("cannot convert to a polynomial")),
    };
    if coeffs.is_empty() {
        return Err(CalcError::range("at least one coefficient expected"));
    }
    let mut elem = Type::simple(Kind::Integer);
    for c in &coeffs {
        elem = promote_types(&elem, &c.type_of())?;
    }
    let coeffs = coeffs
        .into_iter()
        .map(|c| convert(ctx, c, &elem))
        .collect::<CalcResult<Vec<_>>>()?;
    Ok(poly::poly_value(elem, coeffs))
}

pub fn deg(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::Poly(p) => Ok(Value::int(poly::deg(p))),
        _ => Err(CalcError::ty("polynomial expected")),
    }
}

pub fn deriv(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::Poly(p) => poly::deriv(ctx, p),
        Value::RFrac(r) => rfrac::deriv(ctx, r),
        Value::Series(s) => series::deriv(ctx, s),
        _ => Err(CalcError::ty("incompatible type")),
    }
}

pub fn integ(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::Poly(p) => poly::integ(ctx, p),
        Value::Series(s) => series::integ(ctx, s),
        _ => Err(CalcError::ty("incompatible type")),
    }
}

pub fn primpart(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::Poly(p) => poly::primpart(ctx, p),
        _ => Err(CalcError::ty("integer polynomial expected")),
    }
}

pub fn rfrac_ctor(ctx: &Ctx, num: Value, den: Value) -> CalcResult<Value> {
    rfrac::rfrac_new(ctx, num, den)
}

pub fn big_o(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    series::big_o(ctx, v)
}

/// `polroots(p [, eps])`.
pub fn polroots(ctx: &Ctx, mut args: Vec<Value>) -> CalcResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(CalcError::ty("one or two arguments expected"));
    }
    let eps = if args.len() == 2 { args.pop() } else { None };
    let p = args.pop().expect("argument checked");
    poly::roots(ctx, p, eps)
}
