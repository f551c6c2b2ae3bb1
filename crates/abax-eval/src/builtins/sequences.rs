//! Array and string built-ins.

use crate::context::Ctx;
use crate::seq;
use crate::value::Value;
use abax_common::{CalcError, CalcResult};
use std::rc::Rc;

pub fn array_ctor(_ctx: &Ctx, args: Vec<Value>) -> CalcResult<Value> {
    Ok(Value::Array(Rc::new(args)))
}

pub fn len(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match &v {
        Value::Str(s) => Ok(Value::int(seq::string_len(s))),
        Value::Array(items) => Ok(Value::int(items.len() as i64)),
        Value::Tensor(t) => {
            if t.rank() == 0 {
                return Err(CalcError::ty("scalar tensors have no length"));
            }
            Ok(Value::int(t.dims[t.rank() - 1] as i64))
        }
        other => Err(CalcError::ty(format!("{} has no length", other.kind()))),
    }
}

pub fn chr(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    seq::chr(v.to_i64()?)
}

pub fn ord(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    seq::ord(v.as_str()?)
}
