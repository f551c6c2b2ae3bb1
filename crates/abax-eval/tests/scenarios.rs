//! End-to-end scenarios through parse -> eval -> format, at the
//! default precisions (16 decimal digits, 53 mantissa bits).

use abax_common::CalcErrorKind;
use abax_eval::dispatch::{self, Op1};
use abax_eval::format::format_value;
use abax_eval::interpreter::eval_line;
use abax_eval::{Ctx, Value};

fn run(ctx: &mut Ctx, src: &str) -> String {
    let values = eval_line(ctx, src).unwrap_or_else(|e| panic!("{src}: {e}"));
    let (v, _) = values.last().expect("at least one statement");
    format_value(ctx, v)
}

fn run_value(ctx: &mut Ctx, src: &str) -> Value {
    let values = eval_line(ctx, src).unwrap_or_else(|e| panic!("{src}: {e}"));
    values.last().expect("at least one statement").0.clone()
}

fn run_err(ctx: &mut Ctx, src: &str) -> abax_common::CalcError {
    eval_line(ctx, src).expect_err(src)
}

#[test]
fn fraction_power() {
    let mut c = Ctx::new();
    assert_eq!(run(&mut c, "(3//5)^10"), "59049//9765625");
}

#[test]
fn modular_inverse() {
    let mut c = Ctx::new();
    assert_eq!(run(&mut c, "invmod(3, 101)"), "34");
}

#[test]
fn factoring_with_a_large_prime_cofactor() {
    let mut c = Ctx::new();
    assert_eq!(
        run(&mut c, "factor((2^89-1)*2^3*11*13^2*1009)"),
        "Array(2, 2, 2, 11, 13, 13, 1009, 618970019642690137449562111)"
    );
}

#[test]
fn hilbert_characteristic_polynomial() {
    let mut c = Ctx::new();
    assert_eq!(
        run(&mut c, "charpoly(mathilbert(4))"),
        "1//1*X^4-176//105*X^3+3341//12600*X^2-41//23625*X+1//6048000"
    );
}

#[test]
fn series_power_with_series_exponent() {
    let mut c = Ctx::new();
    let s = run_value(&mut c, "(1+X+O(X^6))^(2+X)");
    let Value::Series(s) = &s else {
        panic!("series expected");
    };
    assert_eq!(s.emin, 0);
    assert_eq!(s.coeffs.len(), 6);
    // leading coefficients of (1+X)^(2+X): 1, 2, 2, 3/2, 5/6, ...
    let expected = [1.0, 2.0, 2.0, 1.5, 5.0 / 6.0];
    for (i, want) in expected.iter().enumerate() {
        let got = &s.coeffs[i];
        let close = close_to(&c, got, *want, 1e-12);
        assert!(close, "coefficient {i}: {:?}", got);
    }
}

fn close_to(ctx: &Ctx, v: &Value, want: f64, tol: f64) -> bool {
    let want = Value::Dec(abax_num::Dec::from_f64(want));
    let d = dispatch::sub(ctx, v.clone(), want).unwrap();
    let d = dispatch::op1(ctx, Op1::Abs, d).unwrap();
    let tol = Value::Dec(abax_num::Dec::from_f64(tol));
    dispatch::lt_bool(ctx, d, tol).unwrap()
}

#[test]
fn polroots_finds_all_roots_as_a_set() {
    let mut c = Ctx::new();
    let r = run_value(&mut c, "polroots((X-1)*(X-2)*(X-3)*(X-4)*(X-0.1))");
    let Value::Tensor(t) = &r else {
        panic!("tensor expected");
    };
    assert_eq!(t.cells.len(), 5);
    let expected = [0.1, 1.0, 2.0, 3.0, 4.0];
    for want in expected {
        let hit = t.cells.iter().any(|z| {
            let re = dispatch::op1(&c, Op1::Re, z.clone()).unwrap();
            let im = dispatch::op1(&c, Op1::Im, z.clone()).unwrap();
            close_to(&c, &re, want, 1e-9) && close_to(&c, &im, 0.0, 1e-9)
        });
        assert!(hit, "no root near {want}");
    }
}

#[test]
fn temperature_conversion() {
    let mut c = Ctx::new();
    assert_eq!(
        run(&mut c, "convert(100, \"\u{b0}C\", \"\u{b0}F\")"),
        "211.9999999999999"
    );
}

#[test]
fn kernel_basis() {
    let mut c = Ctx::new();
    assert_eq!(
        run(&mut c, "ker([[1,2,1],[-2,-3,1],[3,5,0]])"),
        "[[5//1], [-3//1], [1//1]]"
    );
}

#[test]
fn division_by_zero_is_a_value_not_an_error() {
    let mut c = Ctx::new();
    assert_eq!(run(&mut c, "1/0"), "Inf");
}

#[test]
fn error_taxonomy() {
    let mut c = Ctx::new();
    let e = run_err(&mut c, "invmod(2, 4)");
    assert_eq!(e.kind, CalcErrorKind::Range);
    assert!(e.message.contains("not invertible"));

    let e = run_err(&mut c, "\"abc\" + 1");
    assert_eq!(e.kind, CalcErrorKind::Type);

    let e = run_err(&mut c, "some_unbound_name");
    assert_eq!(e.kind, CalcErrorKind::Reference);

    let e = run_err(&mut c, "\"abc\"[10]");
    assert_eq!(e.kind, CalcErrorKind::Range);
}

#[test]
fn end_to_end_output_table() {
    let mut c = Ctx::new();
    // integers
    assert_eq!(run(&mut c, "1+2*3"), "7");
    assert_eq!(run(&mut c, "(-3) % 2"), "1");
    assert_eq!(run(&mut c, "3 % (-2)"), "1");
    assert_eq!(run(&mut c, "divrem(-10,3)"), "Array(-4, 2)");
    assert_eq!(run(&mut c, "fact(10)"), "3628800");
    assert_eq!(run(&mut c, "comb(100,30)"), "29372339821610944823963760");
    assert_eq!(run(&mut c, "3 ^^ 1"), "2");
    assert_eq!(run(&mut c, "isprime(961)"), "false");
    assert_eq!(run(&mut c, "isprime(2^107-1)"), "true");
    assert_eq!(run(&mut c, "nextprime(2^89)"), "618970019642690137449562141");
    // fractions
    assert_eq!(run(&mut c, "Fraction(5, 2)"), "5//2");
    assert_eq!(run(&mut c, "-2//3%1//5"), "2//15");
    assert_eq!(run(&mut c, "-2//3 / 1//5"), "-10//3");
    assert_eq!(run(&mut c, "trunc(5//2)"), "2");
    assert_eq!(run(&mut c, "round(5//2)"), "3");
    assert_eq!(run(&mut c, "num(5//2)"), "5");
    assert_eq!(run(&mut c, "bestappr(PI,1000)"), "355//113");
    // decimals
    assert_eq!(run(&mut c, "Decimal(2)"), "2.0");
    assert_eq!(run(&mut c, "3.0^10"), "59049.0");
    assert_eq!(run(&mut c, "sqrt(2)"), "1.414213562373095");
    assert_eq!(run(&mut c, "int(2.5)"), "2");
    assert_eq!(run(&mut c, "floor(-2.5)"), "-3.0");
    assert_eq!(run(&mut c, "round(2.5)"), "3.0");
    assert_eq!(run(&mut c, "PI"), "3.141592653589793");
    assert_eq!(run(&mut c, "0/0"), "NaN");
    assert_eq!(run(&mut c, "NaN < NaN"), "false");
    assert_eq!(run(&mut c, "-Inf < Inf"), "true");
    // floats
    assert_eq!(run(&mut c, "Float(2)"), "2.0l");
    assert_eq!(run(&mut c, "sqrt(2.0l)"), "1.4142135623730951l");
    assert_eq!(run(&mut c, "int(2.5l)"), "2");
    // complex
    assert_eq!(run(&mut c, "Complex(2,3.0)"), "2.0+3.0i");
    assert_eq!(run(&mut c, "a=(2-3*I);sqrt(a*a)"), "2.0-3.0i");
    assert_eq!(run(&mut c, "(1+2*I)^10"), "237-3116i");
    assert_eq!(run(&mut c, "re(1)"), "1");
    assert_eq!(run(&mut c, "im(1)"), "0");
    // polynomials
    assert_eq!(run(&mut c, "Polynomial([1,2,3.0])"), "3.0*X^2+2.0*X+1.0");
    assert_eq!(run(&mut c, "-(1-X)^2"), "-X^2+2*X-1");
    assert_eq!(run(&mut c, "deg(X^2+1)"), "2");
    assert_eq!(run(&mut c, "r=1+X;q=1+X+X^2;b=X^2-1;a=q*b+r;a%b"), "X+1");
    assert_eq!(
        run(&mut c, "r=1+X;q=1+X+X^2;b=X^2-1;a=q*b+r;divrem(a, b)"),
        "Array(X^2+X+1, X+1)"
    );
    assert_eq!(run(&mut c, "(1+X+X^2)(2)"), "7");
    assert_eq!(run(&mut c, "deriv(1-2*X^2+2*X^3)"), "6*X^2-4*X");
    assert_eq!(run(&mut c, "integ(6*X^2-4*X)"), "2.0*X^3-2.0*X^2");
    // rational functions
    assert_eq!(run(&mut c, "(2*X-2)//(X^2-1)"), "(Polynomial(2))//(X+1)");
    assert_eq!(run(&mut c, "((X)//(X^2+1))(2//1)"), "2//5");
    assert_eq!(
        run(&mut c, "deriv((X^2-X+1)//(X-1))"),
        "(X^2-2*X)//(X^2-2*X+1)"
    );
    // series
    assert_eq!(run(&mut c, "O(1+X^2)"), "O(X^2)");
    assert_eq!(run(&mut c, "O(1//X^2)"), "O(X^-2)");
    assert_eq!(run(&mut c, "-(X-X^2+O(X^3))"), "-X+X^2+O(X^3)");
    assert_eq!(run(&mut c, "(X+O(X^3))+(-X^2+X^3)"), "X-X^2+O(X^3)");
    assert_eq!(run(&mut c, "(X+O(X^3))+(1+O(X^2))"), "1+X+O(X^2)");
    assert_eq!(run(&mut c, "1//(1+X+O(X^3))"), "1//1-1//1*X+1//1*X^2+O(X^3)");
    assert_eq!(
        run(&mut c, "log(1+X+O(X^5)+0//1)"),
        "1//1*X-1//2*X^2+1//3*X^3-1//4*X^4+O(X^5)"
    );
    assert_eq!(
        run(&mut c, "sin(X+O(X^6)+0//1)"),
        "1//1*X-1//6*X^3+1//120*X^5+O(X^6)"
    );
    assert_eq!(run(&mut c, "(X+X^2+O(X^5))^3"), "X^3+3*X^4+3*X^5+X^6+O(X^7)");
    assert_eq!(run(&mut c, "(X+X^2+O(X^5))^0"), "1+O(X^4)");
    // tensors
    assert_eq!(run(&mut c, "Tensor(3)"), "Tensor(3)");
    assert_eq!(run(&mut c, "shape([1, -2])"), "Array(2)");
    assert_eq!(run(&mut c, "[1, 2.0, 1/5]"), "[1.0, 2.0, 0.2]");
    assert_eq!(run(&mut c, "abs([1, -2])"), "[1, 2]");
    assert_eq!(run(&mut c, "sqrt([1, 2, -2])"), "[1.0, 1.414213562373095, NaN]");
    assert_eq!(run(&mut c, "[1,2]+[2,3]"), "[3, 5]");
    assert_eq!(run(&mut c, "[1,2].*[2,3]"), "[2, 6]");
    assert_eq!(run(&mut c, "[7,5]%[2,3]"), "[1, 2]");
    assert_eq!(run(&mut c, "typeof([1,2]/[2,3])"), "\"Tensor(Decimal)\"");
    assert_eq!(run(&mut c, "[1,2]+[[2],[3]]"), "[[3, 4], [4, 5]]");
    assert_eq!(run(&mut c, "trace([[1,2],[3,4]])"), "5");
    assert_eq!(run(&mut c, "[[1,2],[3,4]]*[[3],[4]]"), "[[11], [25]]");
    assert_eq!(run(&mut c, "[[1,2],[3,4]]^3"), "[[37, 54], [81, 118]]");
    assert_eq!(run(&mut c, "trans([[1,2,3],[4,5,6]])"), "[[1, 4], [2, 5], [3, 6]]");
    assert_eq!(run(&mut c, "inverse([[1,2],[3,4]])"), "[[-2.0, 1.0], [1.5, -0.5]]");
    assert_eq!(run(&mut c, "charpoly([[1,2],[3,4]])"), "X^2-5*X-2");
    assert_eq!(run(&mut c, "dp([1, 2, 3], [3, -4, -7])"), "-26");
    assert_eq!(run(&mut c, "cp([1, 2, 3], [3, -4, -7])"), "[-2, 16, -10]");
    assert_eq!(run(&mut c, "det(mathilbert(4))"), "1//6048000");
    assert_eq!(run(&mut c, "rank([[1,2,1],[-2,-3,1],[3,5,0]])"), "2");
    // strings
    assert_eq!(run(&mut c, "len('ab\u{20ac}d')"), "4");
    assert_eq!(run(&mut c, "\"a\u{20ac}cd\"[1]"), "\"\u{20ac}\"");
    assert_eq!(run(&mut c, "\"a\u{20ac}cd\"[1:3]"), "\"\u{20ac}c\"");
    assert_eq!(run(&mut c, "\"a\u{20ac}cd\"[:-1]"), "\"a\u{20ac}c\"");
    assert_eq!(run(&mut c, "chr(0x20ac)"), "\"\u{20ac}\"");
    assert_eq!(run(&mut c, "ord(\"\u{20ac}\")"), "8364");
    // units
    assert_eq!(run(&mut c, "convert(1, \"c\", \"km/s\")"), "299792.458");
    assert_eq!(run(&mut c, "convert(20000, \"m\u{b2}\", \"ha\")"), "2.0");
}

#[test]
fn getter_constants_track_precision_changes() {
    let mut c = Ctx::new();
    assert_eq!(run(&mut c, "PI"), "3.141592653589793");
    c.num.dec_prec = 30;
    assert_eq!(run(&mut c, "PI"), "3.14159265358979323846264338328");
}

#[test]
fn assignment_is_an_expression() {
    let mut c = Ctx::new();
    assert_eq!(run(&mut c, "a=2;a*a"), "4");
    // rebinding a builtin name shadows it for later lookups
    assert_eq!(run(&mut c, "abs=3;abs+1"), "4");
}
