//! Generic operation dispatch.
//!
//! `op2` picks the implementation kind from the larger operand tag and
//! the handful of special rules (integer `/` yields Decimal, `//` yields
//! Fraction, Decimal and Float never mix, `+` concatenates strings);
//! `op1` promotes sub-Decimal operands to Decimal for the
//! transcendental set.

use crate::context::Ctx;
use crate::convert::{self, one_of, to_dec_value};
use crate::value::Value;
use crate::{matrix, poly, rfrac, scalar, seq, series, tensor};
use abax_common::{CalcError, CalcResult, Kind, Type};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op2 {
    Add,
    Sub,
    Mul,
    DotMul,
    /// Integer operands produce a Decimal quotient.
    Div,
    /// Integer operands produce a Fraction; polynomials a rational
    /// function; series a fraction-coefficient expansion.
    FracDiv,
    Mod,
    Pow,
    Atan2,
    /// Quotient and remainder as a two-element array.
    DivRem,
    Or,
    And,
    Xor,
    Shl,
    Shr,
    CmpEq,
    CmpLt,
    CmpLe,
}

impl Op2 {
    pub fn is_cmp(self) -> bool {
        matches!(self, Op2::CmpEq | Op2::CmpLt | Op2::CmpLe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op1 {
    Neg,
    Abs,
    Trunc,
    Floor,
    Ceil,
    Round,
    Conj,
    Re,
    Im,
    Sqrt,
    Exp,
    Log,
    Log2,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl Op1 {
    /// Operations that promote Bool/Integer/Fraction to Decimal first.
    pub fn is_transcendental(self) -> bool {
        matches!(
            self,
            Op1::Sqrt
                | Op1::Exp
                | Op1::Log
                | Op1::Log2
                | Op1::Log10
                | Op1::Sin
                | Op1::Cos
                | Op1::Tan
                | Op1::Asin
                | Op1::Acos
                | Op1::Atan
        )
    }
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    #[cfg(feature = "tracing")]
    tracing::trace!(?op, a = %a.type_of(), b = %b.type_of(), "op2");
    let (ka, kb) = (a.kind(), b.kind());
    if ka == Kind::String && kb == Kind::String && op == Op2::Add {
        return seq::string_concat(a, b);
    }
    if op == Op2::Pow {
        return pow(ctx, a, b);
    }
    match ka.max(kb) {
        Kind::Bool | Kind::Integer => {
            if op == Op2::Div {
                scalar::dec_ops::op2(ctx, op, a, b)
            } else {
                scalar::int_ops::op2(ctx, op, a, b)
            }
        }
        Kind::Fraction => scalar::frac_ops::op2(ctx, op, a, b),
        Kind::Decimal => scalar::dec_ops::op2(ctx, op, a, b),
        Kind::Float => scalar::flt_ops::op2(ctx, op, a, b),
        Kind::Complex => scalar::complex_ops::op2(ctx, op, a, b),
        Kind::Polynomial => poly::op2(ctx, op, a, b),
        Kind::RationalFunction => rfrac::op2(ctx, op, a, b),
        Kind::Series => series::op2(ctx, op, a, b),
        Kind::Tensor => tensor::op2(ctx, op, a, b),
        _ => Err(CalcError::ty("incompatible types")),
    }
}

/// The power ladder: integer exponents use binary exponentiation over
/// the base's kind (including matrices and series); everything else
/// promotes like the other arithmetic operations.
fn pow(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    let (ka, kb) = (a.kind(), b.kind());
    let maxk = ka.max(kb);
    if maxk <= Kind::Integer {
        if b.is_negative_value() {
            return scalar::dec_ops::op2(ctx, Op2::Pow, a, b);
        }
        return scalar::int_ops::op2(ctx, Op2::Pow, a, b);
    }
    if maxk == Kind::Decimal {
        return scalar::dec_ops::op2(ctx, Op2::Pow, a, b);
    }
    if maxk == Kind::Float {
        return scalar::flt_ops::op2(ctx, Op2::Pow, a, b);
    }
    if ka == Kind::Tensor && kb == Kind::Tensor {
        return tensor::op2(ctx, Op2::Pow, a, b);
    }
    if kb == Kind::Integer || kb == Kind::Bool {
        let e = match b {
            Value::Bool(x) => BigInt::from(x as i64),
            Value::Int(n) => n,
            _ => unreachable!(),
        };
        return generic_pow(ctx, a, e);
    }
    if maxk == Kind::Complex {
        return scalar::complex_ops::op2(ctx, Op2::Pow, a, b);
    }
    if ka == Kind::Series {
        // a^b = exp(b * log(a))
        let l = series::log(ctx, a)?;
        let prod = op2(ctx, Op2::Mul, l, b)?;
        return series::exp(ctx, prod);
    }
    Err(CalcError::ty("incompatible types"))
}

/// `1/v` in the kind-appropriate field: decimal for integers, matrix
/// inverse for tensors, reciprocal series for series.
pub fn invert(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match v.kind() {
        k if k <= Kind::Float => op2(ctx, Op2::Div, Value::int(1), v),
        Kind::Polynomial | Kind::RationalFunction => op2(ctx, Op2::Div, Value::int(1), v),
        Kind::Complex => scalar::complex_ops::inverse(ctx, v),
        Kind::Tensor => matrix::inverse(ctx, v),
        Kind::Series => series::inverse(ctx, v, false),
        _ => Err(CalcError::ty("incompatible type")),
    }
}

/// Binary exponentiation with an arbitrary-precision integer exponent.
pub fn generic_pow(ctx: &Ctx, a: Value, e: BigInt) -> CalcResult<Value> {
    let one = match &a {
        Value::Tensor(t) => {
            let n = matrix::check_square(t)?;
            matrix::identity(ctx, n, &t.elem)?
        }
        Value::Series(s) => series::to_series(ctx, Value::int(1), s.coeffs.len() as i64)?,
        other => one_of(ctx, &other.type_of())?,
    };
    if e.is_zero() {
        return Ok(one);
    }
    let (mut base, mut e) = if e.is_negative() {
        (invert(ctx, a)?, -e)
    } else {
        (a, e)
    };
    let mut r = one;
    loop {
        if e.bit(0) {
            r = op2(ctx, Op2::Mul, r, base.clone())?;
        }
        e >>= 1;
        if e.is_zero() {
            break;
        }
        base = op2(ctx, Op2::Mul, base.clone(), base)?;
    }
    Ok(r)
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let mut v = v;
    if op.is_transcendental() {
        if v.kind() < Kind::Decimal {
            v = to_dec_value(ctx, v)?;
        }
    } else if matches!(op, Op1::Conj | Op1::Re | Op1::Im) && v.kind() <= Kind::Float {
        return if op == Op1::Im {
            convert::zero_of(ctx, &v.type_of())
        } else {
            Ok(v)
        };
    }
    match v.kind() {
        Kind::Bool | Kind::Integer => scalar::int_ops::op1(ctx, op, v),
        Kind::Fraction => scalar::frac_ops::op1(ctx, op, v),
        Kind::Decimal => scalar::dec_ops::op1(ctx, op, v),
        Kind::Float => scalar::flt_ops::op1(ctx, op, v),
        Kind::Complex => scalar::complex_ops::op1(ctx, op, v),
        Kind::Polynomial => poly::op1(ctx, op, v),
        Kind::RationalFunction => rfrac::op1(ctx, op, v),
        Kind::Series => series::op1(ctx, op, v),
        Kind::Tensor => tensor::op1(ctx, op, v),
        _ => Err(CalcError::ty("unsupported type")),
    }
}

/* thin wrappers used across the algebraic modules */

pub fn add(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Add, a, b)
}

pub fn sub(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Sub, a, b)
}

pub fn mul(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Mul, a, b)
}

pub fn div(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Div, a, b)
}

pub fn modulo(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    op2(ctx, Op2::Mod, a, b)
}

pub fn neg(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    op1(ctx, Op1::Neg, v)
}

/// Negative real scalars silently lift to Complex before `sqrt` and
/// the logarithms; the named built-ins use this, the raw `op1` path
/// (and therefore tensor cells) does not.
pub fn lift_negative_real(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    if v.kind() <= Kind::Float && v.is_negative_value() {
        let t = Type::complex(v.type_of());
        return convert::convert(ctx, v, &t);
    }
    Ok(v)
}

/// `a == b` as a plain bool (errors collapse to false).
pub fn eq_bool(ctx: &Ctx, a: Value, b: Value) -> bool {
    matches!(op2(ctx, Op2::CmpEq, a, b), Ok(Value::Bool(true)))
}

pub fn lt_bool(ctx: &Ctx, a: Value, b: Value) -> CalcResult<bool> {
    match op2(ctx, Op2::CmpLt, a, b)? {
        Value::Bool(r) => Ok(r),
        _ => Ok(false),
    }
}

pub fn le_bool(ctx: &Ctx, a: Value, b: Value) -> CalcResult<bool> {
    match op2(ctx, Op2::CmpLe, a, b)? {
        Value::Bool(r) => Ok(r),
        _ => Ok(false),
    }
}

/// Exact division for integer and Gaussian-integer elements; range
/// error when the division leaves a remainder.
pub fn div_exact(ctx: &Ctx, a: Value, b: Value) -> CalcResult<Value> {
    let arr = op2(ctx, Op2::DivRem, a, b)?;
    let Value::Array(items) = arr else {
        return Err(CalcError::ty("divrem expected an array result"));
    };
    let q = items[0].clone();
    let r = items[1].clone();
    if !r.is_zero_value() {
        return Err(CalcError::range("division is not exact"));
    }
    Ok(q)
}
