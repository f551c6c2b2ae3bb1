//! The closed set of value kinds.
//!
//! The declaration order is load-bearing: binary dispatch promotes a pair
//! of operands to the kind with the **larger** tag, so `Kind` derives
//! `Ord` and every reordering here is a semantic change.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Bool,
    Integer,
    Fraction,
    Decimal,
    Float,
    Complex,

    Polynomial,
    RationalFunction,
    Series,
    Tensor,

    Array,
    Function,
    String,
    Null,
    Range,
}

impl Kind {
    /// User-visible name, as reported by `typeof`.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "Boolean",
            Kind::Integer => "Integer",
            Kind::Fraction => "Fraction",
            Kind::Decimal => "Decimal",
            Kind::Float => "Float",
            Kind::Complex => "Complex",
            Kind::Polynomial => "Polynomial",
            Kind::RationalFunction => "RationalFunction",
            Kind::Series => "Series",
            Kind::Tensor => "Tensor",
            Kind::Array => "Array",
            Kind::Function => "Function",
            Kind::String => "String",
            Kind::Null => "Null",
            Kind::Range => "Range",
        }
    }

    /// Kinds that carry a recursive element type.
    pub fn has_elem(self) -> bool {
        matches!(
            self,
            Kind::Complex
                | Kind::Polynomial
                | Kind::RationalFunction
                | Kind::Series
                | Kind::Tensor
        )
    }

    /// Kinds usable as tensor cells and polynomial/series coefficients.
    pub fn is_numeric(self) -> bool {
        self >= Kind::Bool && self <= Kind::Series
    }

    /// Scalar numeric kinds (the element types allowed inside Complex).
    pub fn is_real_scalar(self) -> bool {
        matches!(
            self,
            Kind::Integer | Kind::Fraction | Kind::Decimal | Kind::Float
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_order_is_the_declaration_order() {
        assert!(Kind::Bool < Kind::Integer);
        assert!(Kind::Integer < Kind::Fraction);
        assert!(Kind::Fraction < Kind::Decimal);
        assert!(Kind::Decimal < Kind::Float);
        assert!(Kind::Float < Kind::Complex);
        assert!(Kind::Complex < Kind::Polynomial);
        assert!(Kind::Polynomial < Kind::RationalFunction);
        assert!(Kind::RationalFunction < Kind::Series);
        assert!(Kind::Series < Kind::Tensor);
        assert!(Kind::Tensor < Kind::Array);
    }

    #[test]
    fn elem_kinds() {
        assert!(Kind::Complex.has_elem());
        assert!(Kind::Tensor.has_elem());
        assert!(!Kind::Integer.has_elem());
        assert!(!Kind::Array.has_elem());
    }
}
