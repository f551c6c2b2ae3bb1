//! Algebraic-law properties over randomly generated operands.

use abax_eval::dispatch;
use abax_eval::format::format_value;
use abax_eval::interpreter::eval_line;
use abax_eval::poly::poly_value;
use abax_eval::{Ctx, Value};
use abax_common::{Kind, Type};
use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;

fn int(i: i64) -> Value {
    Value::int(i)
}

fn frac(n: i64, d: i64) -> Value {
    Value::Frac(BigRational::new(BigInt::from(n), BigInt::from(d)))
}

fn eq(ctx: &Ctx, a: &Value, b: &Value) -> bool {
    dispatch::eq_bool(ctx, a.clone(), b.clone())
}

proptest! {
    #[test]
    fn integer_ring_laws(a in -1000i64..1000, b in -1000i64..1000, c in -1000i64..1000) {
        let ctx = Ctx::new();
        let ab = dispatch::add(&ctx, int(a), int(b)).unwrap();
        let ba = dispatch::add(&ctx, int(b), int(a)).unwrap();
        prop_assert!(eq(&ctx, &ab, &ba));

        let left = dispatch::mul(&ctx, int(a), dispatch::add(&ctx, int(b), int(c)).unwrap()).unwrap();
        let right = dispatch::add(
            &ctx,
            dispatch::mul(&ctx, int(a), int(b)).unwrap(),
            dispatch::mul(&ctx, int(a), int(c)).unwrap(),
        )
        .unwrap();
        prop_assert!(eq(&ctx, &left, &right));

        let with_zero = dispatch::add(&ctx, int(a), int(0)).unwrap();
        prop_assert!(eq(&ctx, &with_zero, &int(a)));
        let with_one = dispatch::mul(&ctx, int(a), int(1)).unwrap();
        prop_assert!(eq(&ctx, &with_one, &int(a)));
    }

    #[test]
    fn fraction_field_laws(
        an in -50i64..50, ad in 1i64..50,
        bn in -50i64..50, bd in 1i64..50,
    ) {
        let ctx = Ctx::new();
        let a = frac(an, ad);
        let b = frac(bn, bd);
        // a + b - b = a
        let s = dispatch::add(&ctx, a.clone(), b.clone()).unwrap();
        let r = dispatch::sub(&ctx, s, b.clone()).unwrap();
        prop_assert!(eq(&ctx, &r, &a));
        // (a * b) / b = a for b != 0
        if bn != 0 {
            let p = dispatch::mul(&ctx, a.clone(), b.clone()).unwrap();
            let q = dispatch::div(&ctx, p, b).unwrap();
            prop_assert!(eq(&ctx, &q, &a));
        }
    }

    #[test]
    fn integer_format_parse_round_trip(a in any::<i64>()) {
        let mut ctx = Ctx::new();
        let shown = format_value(&ctx, &int(a));
        let values = eval_line(&mut ctx, &shown).unwrap();
        prop_assert!(eq(&ctx, &values[0].0, &int(a)));
    }

    #[test]
    fn factor_multiplies_back(n in 1u64..50_000) {
        let mut ctx = Ctx::new();
        let values = eval_line(&mut ctx, &format!("factor({n})")).unwrap();
        let Value::Array(fs) = &values[0].0 else {
            prop_assert!(false, "array expected");
            unreachable!()
        };
        let mut prod = int(1);
        for f in fs.iter() {
            let cmd = format!("isprime({})", format_value(&ctx, f));
            let values = eval_line(&mut ctx, &cmd).unwrap();
            prop_assert!(matches!(values[0].0, Value::Bool(true)));
            prod = dispatch::mul(&ctx, prod, f.clone()).unwrap();
        }
        prop_assert!(eq(&ctx, &prod, &int(n as i64)));
    }

    #[test]
    fn deriv_of_integ_restores_fraction_polynomials(
        c0 in -9i64..9, c1 in -9i64..9, c2 in -9i64..9,
    ) {
        let ctx = Ctx::new();
        let elem = Type::simple(Kind::Fraction);
        let p = poly_value(
            elem,
            vec![frac(c0, 1), frac(c1, 1), frac(c2, 1)],
        );
        let values = {
            let Value::Poly(p_rc) = &p else { unreachable!() };
            let i = abax_eval::poly::integ(&ctx, p_rc).unwrap();
            let Value::Poly(i_rc) = &i else { unreachable!() };
            abax_eval::poly::deriv(&ctx, i_rc).unwrap()
        };
        prop_assert!(eq(&ctx, &values, &p));
    }

    #[test]
    fn broadcast_matches_cellwise(a in -20i64..20, xs in proptest::collection::vec(-20i64..20, 1..6)) {
        let ctx = Ctx::new();
        let cells: Vec<Value> = xs.iter().map(|x| int(*x)).collect();
        let t = abax_eval::tensor::from_items(&ctx, cells).unwrap();
        let broadcast = dispatch::add(&ctx, t.clone(), int(a)).unwrap();
        let cellwise =
            abax_eval::tensor::from_items(
                &ctx,
                xs.iter()
                    .map(|x| dispatch::add(&ctx, int(*x), int(a)).unwrap())
                    .collect(),
            )
            .unwrap();
        prop_assert!(eq(&ctx, &broadcast, &cellwise));
    }
}

#[test]
fn tensor_constructor_is_idempotent() {
    let mut ctx = Ctx::new();
    let values = eval_line(&mut ctx, "Tensor(Tensor(3)) == Tensor(3)").unwrap();
    assert!(matches!(values[0].0, Value::Bool(true)));
    let values = eval_line(&mut ctx, "Polynomial(Polynomial(5)) == Polynomial(5)").unwrap();
    assert!(matches!(values[0].0, Value::Bool(true)));
}

#[test]
fn matrix_inverse_law_is_exact_over_fractions() {
    let mut ctx = Ctx::new();
    let values =
        eval_line(&mut ctx, "h=mathilbert(3);h*inverse(h) == idn(3)").unwrap();
    assert!(matches!(values.last().unwrap().0, Value::Bool(true)));
}

#[test]
fn series_composition_law() {
    let mut ctx = Ctx::new();
    let values = eval_line(&mut ctx, "exp(log(1+X+O(X^7)+0//1)) == 1+X+O(X^7)+0//1").unwrap();
    assert!(matches!(values[0].0, Value::Bool(true)));
}

#[test]
fn promotion_to_own_kind_is_identity() {
    let ctx = Ctx::new();
    for v in [
        int(7),
        frac(2, 3),
        Value::Dec(abax_num::Dec::from_i64(4)),
    ] {
        let t = v.type_of();
        let c = abax_eval::convert::convert(&ctx, v.clone(), &t).unwrap();
        assert!(eq(&ctx, &c, &v));
    }
}
