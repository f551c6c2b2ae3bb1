//! Unit conversion, type inspection, and context-dependent constants.

use crate::context::Ctx;
use crate::scalar::dec_ops::dec_pi;
use crate::units;
use crate::value::Value;
use abax_common::CalcResult;

pub fn convert_units(ctx: &Ctx, v: Value, from: Value, to: Value) -> CalcResult<Value> {
    let from = from.as_str()?.to_string();
    let to = to.as_str()?.to_string();
    units::convert_units(ctx, v, &from, &to)
}

pub fn type_of(_ctx: &Ctx, v: Value) -> CalcResult<Value> {
    Ok(Value::str(v.type_of().to_string()))
}

/// `PI` is a getter binding: recomputed at the current decimal
/// precision on each access.
pub fn pi_getter(ctx: &Ctx) -> CalcResult<Value> {
    Ok(dec_pi(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    #[test]
    fn typeof_spells_the_full_type() {
        let c = Ctx::new();
        let t = crate::tensor::from_items(
            &c,
            vec![Value::Dec(abax_num::Dec::from_i64(1))],
        )
        .unwrap();
        let s = type_of(&c, t).unwrap();
        assert_eq!(format_value(&c, &s), "\"Tensor(Decimal)\"");
    }
}
