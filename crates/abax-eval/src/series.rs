//! Truncated power series with a valuation.
//!
//! `emin` may be negative (Laurent tails); the stored coefficient list
//! starts at `X^emin` and is trimmed so its first entry is nonzero.
//! `exp` composes a Taylor expansion, `log` integrates `p'/p`, and
//! the circular functions go through the complex exponential.

use crate::context::Ctx;
use crate::convert::{convert, promote_types, zero_of};
use crate::dispatch::{self, Op1, Op2};
use crate::poly::to_poly;
use crate::scalar::complex_ops;
use crate::value::{Series, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::int::factorial;
use num_bigint::BigInt;
use std::rc::Rc;

/// Element type of the reciprocal: integers land in the field
/// (Decimal, or Fraction when fraction division was requested).
fn inverse_elem(elem: &Rc<Type>, is_frac: bool) -> Rc<Type> {
    let target = if is_frac { Kind::Fraction } else { Kind::Decimal };
    match elem.kind() {
        Kind::Integer => Type::simple(target),
        Kind::Complex if elem.elem().map(|e| e.kind()) == Some(Kind::Integer) => {
            Type::complex(Type::simple(target))
        }
        _ => elem.clone(),
    }
}

/// Canonicalize: strip zero coefficients from the low end into `emin`.
pub fn series_value(mut s: Series) -> Value {
    let mut skip = 0;
    while skip < s.coeffs.len() && s.coeffs[skip].is_zero_value() {
        skip += 1;
    }
    if skip > 0 {
        s.coeffs.drain(..skip);
        s.emin += skip as i64;
    }
    Value::Series(Rc::new(s))
}

fn empty(elem: Rc<Type>, emin: i64) -> Value {
    Value::Series(Rc::new(Series {
        elem,
        emin,
        coeffs: Vec::new(),
    }))
}

/// Truncation order: the exponent of the O() term.
fn order(s: &Series) -> i64 {
    s.emin + s.coeffs.len() as i64
}

/// Lift a value into a series with `n` significant terms.
pub fn to_series(ctx: &Ctx, v: Value, n: i64) -> CalcResult<Value> {
    match v {
        Value::Series(_) => Ok(v),
        Value::RFrac(r) => {
            let num = Value::Poly(Rc::new(r.num.clone()));
            let den = to_series(ctx, Value::Poly(Rc::new(r.den.clone())), n)?;
            dispatch::div(ctx, num, den)
        }
        other if other.kind() <= Kind::Polynomial => {
            let p = to_poly(ctx, other)?;
            if n <= 0 {
                return Ok(empty(p.elem.clone(), 0));
            }
            let mut e = 0;
            while e < p.coeffs.len() && p.coeffs[e].is_zero_value() {
                e += 1;
            }
            let e = e.min(p.coeffs.len().saturating_sub(1));
            let mut coeffs = Vec::with_capacity(n as usize);
            for i in 0..n as usize {
                match p.coeffs.get(e + i) {
                    Some(c) => coeffs.push(c.clone()),
                    None => coeffs.push(zero_of(ctx, &p.elem)?),
                }
            }
            Ok(series_value(Series {
                elem: p.elem.clone(),
                emin: e as i64,
                coeffs,
            }))
        }
        _ => Err(CalcError::ty("cannot convert to a series")),
    }
}

/// `O(expr)`: an empty series whose order is read off a monomial (or a
/// `1/X^k` rational function).
pub fn big_o(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::RFrac(r) => {
            if crate::poly::deg(&r.num) != 0 {
                return Err(CalcError::range("invalid polynomial degree for O()"));
            }
            let n = crate::poly::deg(&r.den);
            Ok(empty(r.num.elem.clone(), -n))
        }
        other if other.kind() <= Kind::Polynomial => {
            let p = to_poly(ctx, v)?;
            let n = crate::poly::deg(&p);
            if n < 0 {
                return Err(CalcError::range("invalid polynomial degree for O()"));
            }
            Ok(empty(p.elem.clone(), n))
        }
        _ => Err(CalcError::ty("invalid type for O()")),
    }
}

fn as_series(v: &Value) -> &Rc<Series> {
    match v {
        Value::Series(s) => s,
        _ => unreachable!("operand lifted to series beforehand"),
    }
}

fn add_or_sub(ctx: &Ctx, a: Value, b: Value, subtract: bool) -> CalcResult<Value> {
    let b = if subtract { dispatch::neg(ctx, b)? } else { b };
    // orient so `a` is the series
    let (a, b) = if a.kind() == Kind::Series { (a, b) } else { (b, a) };
    let sa = as_series(&a).clone();
    let d = order(&sa);
    let b = match b.kind() {
        Kind::Series => b,
        Kind::RationalFunction => {
            let Value::RFrac(r) = &b else { unreachable!() };
            let mut en = 0;
            while en < r.num.coeffs.len() && r.num.coeffs[en].is_zero_value() {
                en += 1;
            }
            let mut ed = 0;
            while ed < r.den.coeffs.len() && r.den.coeffs[ed].is_zero_value() {
                ed += 1;
            }
            let e = en as i64 - ed as i64;
            if d <= e {
                return Ok(a);
            }
            to_series(ctx, b, d - e)?
        }
        _ => {
            if d <= 0 {
                return Ok(a);
            }
            to_series(ctx, b, d)?
        }
    };
    let sb = as_series(&b).clone();
    let d = d.min(order(&sb));
    let emin = sa.emin.min(sb.emin);
    let n = (d - emin).max(0) as usize;
    let elem = promote_types(&sa.elem, &sb.elem)?;
    let mut coeffs = Vec::with_capacity(n);
    for i in 0..n {
        let pick = |s: &Series| -> CalcResult<Value> {
            let j = i as i64 + emin - s.emin;
            if j >= 0 && (j as usize) < s.coeffs.len() {
                Ok(s.coeffs[j as usize].clone())
            } else {
                zero_of(ctx, &elem)
            }
        };
        let c = dispatch::add(ctx, pick(&sa)?, pick(&sb)?)?;
        coeffs.push(c);
    }
    Ok(series_value(Series { elem, emin, coeffs }))
}

fn mul(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    let (a, b) = lift_pair(ctx, a, b)?;
    let sa = as_series(&a).clone();
    let sb = as_series(&b).clone();
    let emin = sa.emin + sb.emin;
    let n = sa.coeffs.len().min(sb.coeffs.len());
    let elem = promote_types(&sa.elem, &sb.elem)?;
    let mut coeffs = Vec::with_capacity(n);
    for _ in 0..n {
        coeffs.push(zero_of(ctx, &elem)?);
    }
    for i in 0..n {
        for j in 0..n - i {
            let prod = dispatch::mul(ctx, sa.coeffs[i].clone(), sb.coeffs[j].clone())?;
            coeffs[i + j] = dispatch::add(ctx, coeffs[i + j].clone(), prod)?;
        }
    }
    Ok(series_value(Series { elem, emin, coeffs }))
}

fn lift_pair(ctx: &Ctx, a: Value, b: Value) -> CalcResult<(Value, Value)> {
    let (a, b) = match (a.kind(), b.kind()) {
        (Kind::Series, Kind::Series) => (a, b),
        (Kind::Series, _) => {
            let n = as_series(&a).coeffs.len() as i64;
            let b = to_series(ctx, b, n)?;
            (a, b)
        }
        (_, Kind::Series) => {
            let n = as_series(&b).coeffs.len() as i64;
            let a = to_series(ctx, a, n)?;
            (a, b)
        }
        _ => unreachable!("series dispatch without a series operand"),
    };
    Ok((a, b))
}

/// Reciprocal by the forward recurrence
/// `d_0 = 1/c_0`, `d_k = -(1/c_0) * sum c_j d_{k-j}`.
pub fn inverse(ctx: &Ctx, v: Value, is_frac: bool) -> CalcResult<Value> {
    let s = as_series(&v).clone();
    let n = s.coeffs.len();
    if n == 0 {
        return Err(CalcError::range("division by zero"));
    }
    let elem = inverse_elem(&s.elem, is_frac);
    let d0 = if is_frac {
        dispatch::op2(ctx, Op2::FracDiv, Value::int(1), s.coeffs[0].clone())?
    } else {
        dispatch::div(ctx, Value::int(1), s.coeffs[0].clone())?
    };
    let mut out: Vec<Value> = Vec::with_capacity(n);
    out.push(convert(ctx, d0, &elem)?);
    for i in 1..n {
        let mut sum = Value::int(0);
        for j in 1..=i {
            let prod = dispatch::mul(ctx, s.coeffs[j].clone(), out[i - j].clone())?;
            sum = dispatch::add(ctx, sum, prod)?;
        }
        let term = dispatch::neg(ctx, dispatch::mul(ctx, sum, out[0].clone())?)?;
        out.push(convert(ctx, term, &elem)?);
    }
    Ok(series_value(Series {
        elem,
        emin: -s.emin,
        coeffs: out,
    }))
}

fn div(ctx: &Ctx, a: Value, b: Value, is_frac: bool) -> CalcResult<Value> {
    let (a, b) = lift_pair(ctx, a, b)?;
    let is_frac = is_frac || is_fraction_family_strict(&as_series(&a).elem);
    let inv = inverse(ctx, b, is_frac)?;
    mul(ctx, a, inv)
}

/// Fraction (not integer) element families force fraction division.
fn is_fraction_family_strict(elem: &Rc<Type>) -> bool {
    match elem.kind() {
        Kind::Fraction => true,
        Kind::Complex => elem.elem().map(|e| e.kind()) == Some(Kind::Fraction),
        _ => false,
    }
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    match op {
        Op2::Add => add_or_sub(ctx, a, b, false),
        Op2::Sub => add_or_sub(ctx, a, b, true),
        Op2::Mul | Op2::DotMul => {
            let (a, b) = lift_pair(ctx, a, b)?;
            mul(ctx, a, b)
        }
        Op2::Div => div(ctx, a, b, false),
        Op2::FracDiv => div(ctx, a, b, true),
        Op2::CmpEq => {
            let (a, b) = lift_pair(ctx, a, b)?;
            let (sa, sb) = (as_series(&a), as_series(&b));
            let eq = sa.emin == sb.emin
                && sa.coeffs.len() == sb.coeffs.len()
                && sa
                    .coeffs
                    .iter()
                    .zip(sb.coeffs.iter())
                    .all(|(x, y)| dispatch::eq_bool(ctx, x.clone(), y.clone()));
            Ok(Value::Bool(eq))
        }
        _ => Err(CalcError::ty("unsupported series operation")),
    }
}

/// Coefficient of `X^k` (zero beyond the tracked precision).
pub fn coeff_at(ctx: &Ctx, s: &Series, k: i64) -> CalcResult<Value> {
    let idx = k - s.emin;
    if idx < 0 || idx as usize >= s.coeffs.len() {
        zero_of(ctx, &s.elem)
    } else {
        Ok(s.coeffs[idx as usize].clone())
    }
}

/// Evaluate by Horner on the stored coefficients, then scale by
/// `x^emin`.
pub fn apply(ctx: &Ctx, s: &Series, x: &Value) -> CalcResult<Value> {
    if s.coeffs.is_empty() {
        return zero_of(ctx, &s.elem);
    }
    let n = s.coeffs.len();
    let mut v = s.coeffs[n - 1].clone();
    for i in (0..n - 1).rev() {
        v = dispatch::mul(ctx, v, x.clone())?;
        v = dispatch::add(ctx, v, s.coeffs[i].clone())?;
    }
    if s.emin != 0 {
        let scale = dispatch::generic_pow(ctx, x.clone(), BigInt::from(s.emin))?;
        v = dispatch::mul(ctx, v, scale)?;
    }
    Ok(v)
}

pub fn deriv(ctx: &Ctx, s: &Series) -> CalcResult<Value> {
    if s.coeffs.is_empty() && s.emin == 0 {
        return Ok(empty(s.elem.clone(), 0));
    }
    let mut coeffs = Vec::with_capacity(s.coeffs.len());
    for (i, c) in s.coeffs.iter().enumerate() {
        let k = s.emin + i as i64;
        coeffs.push(dispatch::mul(ctx, c.clone(), Value::int(k))?);
    }
    Ok(series_value(Series {
        elem: s.elem.clone(),
        emin: s.emin - 1,
        coeffs,
    }))
}

pub fn integ(ctx: &Ctx, s: &Series) -> CalcResult<Value> {
    let elem = inverse_elem(&s.elem, false);
    let mut coeffs = Vec::with_capacity(s.coeffs.len());
    for (i, c) in s.coeffs.iter().enumerate() {
        let k = s.emin + i as i64;
        if k == -1 {
            if !c.is_zero_value() {
                return Err(CalcError::range("cannot represent integ(1/X)"));
            }
            coeffs.push(zero_of(ctx, &elem)?);
        } else {
            coeffs.push(dispatch::div(ctx, c.clone(), Value::int(k + 1))?);
        }
    }
    Ok(series_value(Series {
        elem,
        emin: s.emin + 1,
        coeffs,
    }))
}

/// Drop the constant term (used by `exp` after factoring `exp(c_0)`).
fn shift_down(s: &Series) -> Series {
    Series {
        elem: s.elem.clone(),
        emin: s.emin + 1,
        coeffs: s.coeffs[1..].to_vec(),
    }
}

pub fn exp(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let s = as_series(&v).clone();
    if s.emin < 0 {
        return Err(CalcError::range("negative exponent in exp"));
    }
    if s.coeffs.is_empty() && s.emin == 0 {
        // exp(O(1)) carries no usable term
        return Ok(v);
    }
    let n = order(&s);
    let (c, arg) = if s.emin > 0 {
        (convert(ctx, Value::int(1), &s.elem)?, s)
    } else {
        if is_fraction_family_strict(&s.elem) {
            return Err(CalcError::range(
                "non zero constant term in exp with rational type",
            ));
        }
        let c = dispatch::op1(ctx, Op1::Exp, s.coeffs[0].clone())?;
        (c, Rc::new(shift_down(&s)))
    };
    // Taylor coefficients c / i!, composed with the argument
    let elem = inverse_elem(&arg.elem, false);
    let mut coeffs = Vec::with_capacity(n.max(0) as usize);
    for i in 0..n.max(0) {
        let f = Value::Int(factorial(&BigInt::from(i))?);
        coeffs.push(dispatch::div(ctx, c.clone(), f)?);
    }
    let taylor = Series {
        elem,
        emin: 0,
        coeffs,
    };
    apply(ctx, &taylor, &Value::Series(arg))
}

pub fn log(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let s = as_series(&v).clone();
    if s.emin != 0 {
        return Err(CalcError::range(
            "log argument must have a non zero constant term",
        ));
    }
    let d = deriv(ctx, &s)?;
    let q = dispatch::div(ctx, d, v.clone())?;
    let Value::Series(qs) = &q else { unreachable!() };
    let mut r = integ(ctx, qs)?;
    if !s.coeffs[0].eq_int(1) {
        if is_fraction_family_strict(&s.elem) {
            return Err(CalcError::range(
                "non unit constant term in log with rational type",
            ));
        }
        let c = dispatch::op1(ctx, Op1::Log, s.coeffs[0].clone())?;
        r = dispatch::add(ctx, r, c)?;
    }
    Ok(r)
}

fn re_or_im(ctx: &Ctx, v: &Value, take_im: bool) -> CalcResult<Value> {
    let s = as_series(v).clone();
    let elem = s.elem.elem().cloned().unwrap_or_else(|| s.elem.clone());
    let mut coeffs = Vec::with_capacity(s.coeffs.len());
    for c in &s.coeffs {
        let part = dispatch::op1(ctx, if take_im { Op1::Im } else { Op1::Re }, c.clone())?;
        coeffs.push(part);
    }
    let _ = ctx;
    Ok(series_value(Series {
        elem,
        emin: s.emin,
        coeffs,
    }))
}

fn circular(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let real_elem = {
        let s = as_series(&v);
        s.elem.kind() != Kind::Complex
    };
    let i_unit = complex_ops::make(ctx, Value::int(0), Value::int(1))?;
    let t = exp(ctx, dispatch::mul(ctx, v.clone(), i_unit)?)?;
    match op {
        Op1::Sin => {
            if real_elem {
                re_or_im(ctx, &t, true)
            } else {
                let u = inverse(ctx, t.clone(), false)?;
                let num = dispatch::sub(ctx, t, u)?;
                let two_i = complex_ops::make(ctx, Value::int(0), Value::int(2))?;
                dispatch::div(ctx, num, two_i)
            }
        }
        Op1::Cos => {
            if real_elem {
                re_or_im(ctx, &t, false)
            } else {
                let u = inverse(ctx, t.clone(), false)?;
                let num = dispatch::add(ctx, t, u)?;
                dispatch::div(ctx, num, Value::int(2))
            }
        }
        _ => {
            let s = circular(ctx, Op1::Sin, v.clone())?;
            let c = circular(ctx, Op1::Cos, v)?;
            dispatch::div(ctx, s, c)
        }
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    match op {
        Op1::Neg => {
            let s = as_series(&v).clone();
            let mut coeffs = Vec::with_capacity(s.coeffs.len());
            for c in &s.coeffs {
                coeffs.push(dispatch::neg(ctx, c.clone())?);
            }
            Ok(series_value(Series {
                elem: s.elem.clone(),
                emin: s.emin,
                coeffs,
            }))
        }
        Op1::Exp => exp(ctx, v),
        Op1::Log => log(ctx, v),
        Op1::Sin | Op1::Cos | Op1::Tan => circular(ctx, op, v),
        Op1::Re => re_or_im(ctx, &v, false),
        Op1::Im => re_or_im(ctx, &v, true),
        _ => Err(CalcError::ty("unsupported series operation")),
    }
}
