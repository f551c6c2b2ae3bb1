//! Tensor and matrix built-ins.

use crate::context::Ctx;
use crate::value::Value;
use crate::{matrix, tensor};
use abax_common::{CalcError, CalcResult};

pub fn tensor_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    tensor::tensor_ctor(ctx, v)
}

pub fn zeros(ctx: &Ctx, args: Vec<Value>) -> CalcResult<Value> {
    let dims = args
        .iter()
        .map(|a| a.to_i64())
        .collect::<CalcResult<Vec<_>>>()?;
    tensor::zeros(ctx, &dims)
}

pub fn shape(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(tensor::shape(v.as_tensor()?))
}

pub fn idn(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let n = v.to_i64()?;
    if n < 1 {
        return Err(CalcError::range("integer >= 1 expected"));
    }
    matrix::identity(ctx, n as usize, &abax_common::Type::simple(abax_common::Kind::Integer))
}

pub fn diag(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::diag(ctx, v.as_tensor()?)
}

pub fn mathilbert(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let n = v.to_i64()?;
    if n < 1 {
        return Err(CalcError::range("integer >= 1 expected"));
    }
    matrix::hilbert(ctx, n as usize)
}

pub fn trace(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::trace(ctx, v.as_tensor()?)
}

pub fn trans(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    tensor::transpose(ctx, v.as_tensor()?)
}

pub fn charpoly(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::charpoly(ctx, v.as_tensor()?)
}

pub fn dp(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    tensor::dot_product(ctx, a.as_tensor()?, b.as_tensor()?)
}

pub fn cp(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    tensor::cross_product(ctx, a.as_tensor()?, b.as_tensor()?)
}

pub fn det(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::det(ctx, v)
}

pub fn rank(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::rank(ctx, v.as_tensor()?)
}

pub fn ker(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::kernel(ctx, v.as_tensor()?)
}

pub fn eigenvals(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    matrix::eigenvals(ctx, v.as_tensor()?)
}
