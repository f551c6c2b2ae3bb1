//! Transcendental built-ins. The hyperbolic family and the dB/degree
//! helpers are defined through the generic `exp`/`log` operations, so
//! they work for every kind the dispatch accepts (including complex
//! numbers and series).

use crate::context::Ctx;
use crate::convert::to_dec_value;
use crate::dispatch::{self, Op1, Op2};
use crate::scalar::dec_ops::dec_pi;
use crate::value::Value;
use abax_common::{CalcResult, Kind};

pub fn exp(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Exp, v)
}

pub fn log(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = dispatch::lift_negative_real(ctx, v)?;
    dispatch::op1(ctx, Op1::Log, v)
}

pub fn log2(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = dispatch::lift_negative_real(ctx, v)?;
    dispatch::op1(ctx, Op1::Log2, v)
}

pub fn log10(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let v = dispatch::lift_negative_real(ctx, v)?;
    dispatch::op1(ctx, Op1::Log10, v)
}

pub fn sin(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Sin, v)
}

pub fn cos(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Cos, v)
}

pub fn tan(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Tan, v)
}

pub fn asin(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Asin, v)
}

pub fn acos(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Acos, v)
}

pub fn atan(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::op1(ctx, Op1::Atan, v)
}

pub fn atan2(ctx: &Ctx, y: Value, x: Value) -> CalcResult<Value> {
    let (y, x) = if y.kind() < Kind::Decimal && x.kind() < Kind::Decimal {
        (to_dec_value(ctx, y)?, x)
    } else {
        (y, x)
    };
    dispatch::op2(ctx, Op2::Atan2, y, x)
}

pub fn sinh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let e = exp(ctx, v)?;
    let inv = dispatch::invert(ctx, e.clone())?;
    dispatch::div(ctx, dispatch::sub(ctx, e, inv)?, Value::int(2))
}

pub fn cosh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let e = exp(ctx, v)?;
    let inv = dispatch::invert(ctx, e.clone())?;
    dispatch::div(ctx, dispatch::add(ctx, e, inv)?, Value::int(2))
}

pub fn tanh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let e = exp(ctx, dispatch::mul(ctx, Value::int(2), v)?)?;
    dispatch::div(
        ctx,
        dispatch::sub(ctx, e.clone(), Value::int(1))?,
        dispatch::add(ctx, e, Value::int(1))?,
    )
}

pub fn asinh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let r = dispatch::op1(
        ctx,
        Op1::Sqrt,
        dispatch::add(ctx, dispatch::mul(ctx, v.clone(), v.clone())?, Value::int(1))?,
    )?;
    log(ctx, dispatch::add(ctx, r, v)?)
}

pub fn acosh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let r = dispatch::op1(
        ctx,
        Op1::Sqrt,
        dispatch::sub(ctx, dispatch::mul(ctx, v.clone(), v.clone())?, Value::int(1))?,
    )?;
    log(ctx, dispatch::add(ctx, r, v)?)
}

pub fn atanh(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let q = dispatch::div(
        ctx,
        dispatch::add(ctx, Value::int(1), v.clone())?,
        dispatch::sub(ctx, Value::int(1), v)?,
    )?;
    dispatch::div(ctx, log(ctx, q)?, Value::int(2))
}

/// Normalized sinc: `sin(pi x) / (pi x)`, `1` at zero.
pub fn sinc(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let x = to_dec_value(ctx, v)?;
    if x.is_zero_value() {
        return to_dec_value(ctx, Value::int(1));
    }
    let px = dispatch::mul(ctx, x, dec_pi(ctx))?;
    dispatch::div(ctx, sin(ctx, px.clone())?, px)
}

pub fn todb(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::mul(ctx, log10(ctx, v)?, Value::int(10))
}

pub fn fromdb(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let ln10 = log(ctx, Value::int(10))?;
    exp(
        ctx,
        dispatch::mul(ctx, v, dispatch::div(ctx, ln10, Value::int(10))?)?,
    )
}

pub fn todeg(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::mul(ctx, v, dispatch::div(ctx, Value::int(180), dec_pi(ctx))?)
}

pub fn fromdeg(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    dispatch::mul(ctx, v, dispatch::div(ctx, dec_pi(ctx), Value::int(180))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    #[test]
    fn transcendentals_promote_integers_to_decimal() {
        let c = Ctx::new();
        assert_eq!(show(&c, &exp(&c, Value::int(0)).unwrap()), "1.0");
        assert_eq!(show(&c, &log2(&c, Value::int(5)).unwrap()), "2.321928094887361");
        assert_eq!(
            show(&c, &log10(&c, Value::int(5)).unwrap()),
            "0.6989700043360186"
        );
    }

    #[test]
    fn log_of_negative_real_is_complex() {
        let c = Ctx::new();
        let r = log(&c, Value::int(-10)).unwrap();
        assert_eq!(r.kind(), Kind::Complex);
    }

    #[test]
    fn hyperbolics_at_decimal_precision() {
        let c = Ctx::new();
        let r = sinh(&c, Value::int(1)).unwrap();
        let s = show(&c, &r);
        assert!(s.starts_with("1.175201193643"), "{s}");
        let r = atanh(&c, Value::Dec(abax_num::Dec::parse("0.5", 16).unwrap())).unwrap();
        let s = show(&c, &r);
        assert!(s.starts_with("0.5493061443340"), "{s}");
    }

    #[test]
    fn sinc_and_degree_helpers() {
        let c = Ctx::new();
        assert_eq!(show(&c, &sinc(&c, Value::int(0)).unwrap()), "1.0");
        let r = todeg(&c, dec_pi(&c)).unwrap();
        assert_eq!(show(&c, &r), "180.0");
    }
}
