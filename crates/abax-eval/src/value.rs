//! The tagged value representation.
//!
//! One variant per kind. Compound payloads sit behind `Rc`: cloning a
//! value is cheap, and the tensor/array kinds use clone-on-write
//! (`Rc::make_mut`) for indexed assignment so sharing stays sound.

use abax_common::{CalcError, CalcResult, Kind, Type};
use abax_num::{Dec, Flt};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use smallvec::SmallVec;
use std::rc::Rc;

use crate::context::Ctx;

pub const MAX_DIMS: usize = 4;

/// Complex number; `re` and `im` always share the same real kind.
#[derive(Debug, Clone)]
pub struct Complex {
    pub re: Value,
    pub im: Value,
}

/// Dense univariate polynomial, little-endian (index = degree).
/// `coeffs.len() >= 1`; the leading coefficient is nonzero unless the
/// polynomial is the constant zero.
#[derive(Debug, Clone)]
pub struct Poly {
    pub elem: Rc<Type>,
    pub coeffs: Vec<Value>,
}

/// Quotient of two polynomials over the same element type, reduced when
/// the element ring supports a gcd.
#[derive(Debug, Clone)]
pub struct RFrac {
    pub num: Poly,
    pub den: Poly,
}

/// Truncated power series `X^emin * (c_0 + c_1 X + ...) + O(X^{emin+len})`.
/// `c_0 != 0` whenever `coeffs` is non-empty.
#[derive(Debug, Clone)]
pub struct Series {
    pub elem: Rc<Type>,
    pub emin: i64,
    pub coeffs: Vec<Value>,
}

/// Dense tensor of up to [`MAX_DIMS`] dimensions. `dims[0]` is the
/// innermost axis (matrix width); a matrix stores `(r, c)` at
/// `r * width + c`.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub elem: Rc<Type>,
    pub dims: SmallVec<[usize; MAX_DIMS]>,
    pub cells: Vec<Value>,
}

impl Tensor {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Half-open integer range with optionally-unspecified bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeVal {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

pub type Func0 = fn(&Ctx) -> CalcResult<Value>;
pub type Func1 = fn(&Ctx, Value) -> CalcResult<Value>;
pub type Func2 = fn(&Ctx, Value, Value) -> CalcResult<Value>;
pub type Func3 = fn(&Ctx, Value, Value, Value) -> CalcResult<Value>;
pub type FuncVar = fn(&Ctx, Vec<Value>) -> CalcResult<Value>;

#[derive(Debug, Clone, Copy)]
pub enum Callable {
    F0(Func0),
    F1(Func1),
    F2(Func2),
    F3(Func3),
    Var(FuncVar),
}

#[derive(Debug)]
pub struct Function {
    pub name: String,
    /// Fixed arity, or the minimum argument count for varargs.
    pub arity: usize,
    pub var_args: bool,
    pub call: Callable,
}

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Frac(BigRational),
    Dec(Dec),
    Float(Flt),
    Complex(Rc<Complex>),
    Poly(Rc<Poly>),
    RFrac(Rc<RFrac>),
    Series(Rc<Series>),
    Tensor(Rc<Tensor>),
    Array(Rc<Vec<Value>>),
    Str(Rc<str>),
    Func(Rc<Function>),
    Null,
    Range(RangeVal),
}

impl Value {
    pub fn int(i: i64) -> Value {
        Value::Int(BigInt::from(i))
    }

    pub fn str(s: impl Into<String>) -> Value {
        let s: String = s.into();
        Value::Str(Rc::from(s.as_str()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Integer,
            Value::Frac(_) => Kind::Fraction,
            Value::Dec(_) => Kind::Decimal,
            Value::Float(_) => Kind::Float,
            Value::Complex(_) => Kind::Complex,
            Value::Poly(_) => Kind::Polynomial,
            Value::RFrac(_) => Kind::RationalFunction,
            Value::Series(_) => Kind::Series,
            Value::Tensor(_) => Kind::Tensor,
            Value::Array(_) => Kind::Array,
            Value::Str(_) => Kind::String,
            Value::Func(_) => Kind::Function,
            Value::Null => Kind::Null,
            Value::Range(_) => Kind::Range,
        }
    }

    /// Full recursive type descriptor.
    pub fn type_of(&self) -> Rc<Type> {
        match self {
            Value::Complex(c) => Type::complex(c.re.type_of()),
            Value::Poly(p) => Type::polynomial(p.elem.clone()),
            Value::RFrac(r) => Type::rational_function(r.num.elem.clone()),
            Value::Series(s) => Type::series(s.elem.clone()),
            Value::Tensor(t) => Type::tensor(t.elem.clone()),
            other => Type::simple(other.kind()),
        }
    }

    /// Exact comparison against a small integer, across every numeric
    /// kind. Non-numeric kinds always compare false.
    pub fn eq_int(&self, i: i64) -> bool {
        match self {
            Value::Bool(b) => (*b as i64) == i,
            Value::Int(n) => *n == BigInt::from(i),
            Value::Frac(f) => f.is_integer() && f.to_integer() == BigInt::from(i),
            Value::Dec(d) => *d == Dec::from_i64(i),
            Value::Float(f) => match f.to_dec_exact() {
                Dec::Num(_) => f.to_dec_exact() == Dec::from_i64(i),
                _ => false,
            },
            Value::Complex(c) => c.re.eq_int(i) && c.im.eq_int(0),
            _ => false,
        }
    }

    pub fn is_zero_value(&self) -> bool {
        self.eq_int(0)
    }

    /// True for real scalars strictly below zero.
    pub fn is_negative_value(&self) -> bool {
        match self {
            Value::Int(n) => n.is_negative(),
            Value::Frac(f) => f.is_negative(),
            Value::Dec(d) => d.is_negative() && !d.is_zero(),
            Value::Float(f) => f.is_negative() && !f.is_zero(),
            _ => false,
        }
    }

    /// Extract a machine integer (indices, sizes, shift counts).
    pub fn to_i64(&self) -> CalcResult<i64> {
        match self {
            Value::Bool(b) => Ok(*b as i64),
            Value::Int(n) => n
                .to_i64()
                .ok_or_else(|| CalcError::range("integer too large")),
            _ => Err(CalcError::ty("integer expected")),
        }
    }

    pub fn as_int(&self) -> CalcResult<&BigInt> {
        match self {
            Value::Int(n) => Ok(n),
            _ => Err(CalcError::ty("integer expected")),
        }
    }

    pub fn as_str(&self) -> CalcResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(CalcError::ty("string expected")),
        }
    }

    pub fn as_tensor(&self) -> CalcResult<&Rc<Tensor>> {
        match self {
            Value::Tensor(t) => Ok(t),
            _ => Err(CalcError::ty("tensor expected")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abax_common::Kind;

    #[test]
    fn type_of_recurses() {
        let c = Value::Complex(Rc::new(Complex {
            re: Value::int(1),
            im: Value::int(0),
        }));
        assert_eq!(c.type_of().to_string(), "Complex(Integer)");
        assert_eq!(c.kind(), Kind::Complex);
    }

    #[test]
    fn eq_int_across_kinds() {
        assert!(Value::int(3).eq_int(3));
        assert!(Value::Bool(true).eq_int(1));
        assert!(Value::Dec(Dec::from_i64(3)).eq_int(3));
        assert!(!Value::Dec(Dec::nan()).eq_int(0));
        assert!(!Value::str("3").eq_int(3));
    }
}
