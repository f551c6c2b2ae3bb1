//! Recursive type descriptors.
//!
//! A `Type` is a kind tag plus, for the parametric kinds
//! (Complex, Polynomial, RationalFunction, Series, Tensor), the element
//! type. Descriptors are shared through `Rc` and compared structurally;
//! they are never cyclic.

use crate::kind::Kind;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    kind: Kind,
    elem: Option<Rc<Type>>,
}

impl Type {
    /// Descriptor for a non-parametric kind.
    pub fn simple(kind: Kind) -> Rc<Type> {
        debug_assert!(!kind.has_elem());
        Rc::new(Type { kind, elem: None })
    }

    /// Descriptor for a parametric kind over `elem`.
    pub fn parametric(kind: Kind, elem: Rc<Type>) -> Rc<Type> {
        debug_assert!(kind.has_elem());
        Rc::new(Type {
            kind,
            elem: Some(elem),
        })
    }

    pub fn complex(elem: Rc<Type>) -> Rc<Type> {
        Type::parametric(Kind::Complex, elem)
    }

    pub fn polynomial(elem: Rc<Type>) -> Rc<Type> {
        Type::parametric(Kind::Polynomial, elem)
    }

    pub fn rational_function(elem: Rc<Type>) -> Rc<Type> {
        Type::parametric(Kind::RationalFunction, elem)
    }

    pub fn series(elem: Rc<Type>) -> Rc<Type> {
        Type::parametric(Kind::Series, elem)
    }

    pub fn tensor(elem: Rc<Type>) -> Rc<Type> {
        Type::parametric(Kind::Tensor, elem)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Element type; present exactly when `self.kind().has_elem()`.
    pub fn elem(&self) -> Option<&Rc<Type>> {
        self.elem.as_ref()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem {
            Some(e) => write!(f, "{}({})", self.kind, e),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let a = Type::complex(Type::simple(Kind::Fraction));
        let b = Type::complex(Type::simple(Kind::Fraction));
        let c = Type::complex(Type::simple(Kind::Integer));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nested_display() {
        let t = Type::polynomial(Type::complex(Type::simple(Kind::Integer)));
        assert_eq!(t.to_string(), "Polynomial(Complex(Integer))");
    }
}
