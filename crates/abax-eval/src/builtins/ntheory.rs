//! Number-theory built-ins, thin wrappers over the integer layer.

use crate::context::Ctx;
use crate::value::Value;
use abax_common::{CalcError, CalcResult};
use abax_num::int;
use std::rc::Rc;

pub fn invmod(_ctx: &Ctx, a: Value, m: Value) -> CalcResult<Value> {
    Ok(Value::Int(int::invmod(a.as_int()?, m.as_int()?)?))
}

pub fn pmod(_ctx: &Ctx, a: Value, b: Value, m: Value) -> CalcResult<Value> {
    Ok(Value::Int(int::pmod(a.as_int()?, b.as_int()?, m.as_int()?)?))
}

pub fn ilog2(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(Value::int(int::ilog2(v.as_int()?)?))
}

pub fn ctz(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(Value::int(int::ctz(v.as_int()?)))
}

/// `isprime(n [, t])`: deterministic trial division, then Miller-Rabin
/// with `t` rounds (64 by default).
pub fn isprime(_ctx: &Ctx, args: Vec<Value>) -> CalcResult<Value> {
    if args.len() > 2 {
        return Err(CalcError::ty("at most two arguments expected"));
    }
    let n = args[0].as_int()?;
    let t = match args.get(1) {
        Some(t) => usize::try_from(t.to_i64()?)
            .map_err(|_| CalcError::range("invalid round count"))?,
        None => 0,
    };
    Ok(Value::Bool(int::is_prime(n, t)))
}

pub fn nextprime(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(Value::Int(int::next_prime(v.as_int()?)))
}

pub fn factor(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let fs = int::factor(v.as_int()?)?;
    Ok(Value::Array(Rc::new(
        fs.into_iter().map(Value::Int).collect(),
    )))
}
