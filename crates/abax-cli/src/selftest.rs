//! Built-in self test (`-t`): evaluates a table of expressions and
//! compares the formatted results.

use abax_eval::format::format_value;
use abax_eval::interpreter::eval_line;
use abax_eval::Ctx;

const CASES: &[(&str, &str)] = &[
    // integers
    ("1+2*3", "7"),
    ("1 << 31", "2147483648"),
    ("1 << 32", "4294967296"),
    ("(-3) % 2", "1"),
    ("3 % (-2)", "1"),
    ("1 == 1", "true"),
    ("1 != 2", "true"),
    ("1 <= 1", "true"),
    ("1 + true", "2"),
    ("0xaa | 0x55", "255"),
    ("3 & 1", "1"),
    ("3 ^^ 1", "2"),
    ("divrem(10,3)", "Array(3, 1)"),
    ("divrem(-10,3)", "Array(-4, 2)"),
    ("fact(10)", "3628800"),
    ("comb(100,30)", "29372339821610944823963760"),
    ("invmod(3,101)", "34"),
    ("pmod(123,1234567,618970019642690137449562111)", "184445118581190103495826148"),
    ("pmod(123,-41234,618970019642690137449562111)", "190069040174992308417613731"),
    ("pmod(123,0,13)", "1"),
    ("ilog2(1023)", "9"),
    ("ilog2(0)", "-1"),
    ("ctz(1022)", "1"),
    ("isprime(961)", "false"),
    ("isprime(1021)", "true"),
    ("isprime(2^107-1)", "true"),
    ("isprime((2^107-1)*(2^89-1))", "false"),
    ("nextprime(2^89)", "618970019642690137449562141"),
    (
        "factor((2^89-1)*2^3*11*13^2*1009)",
        "Array(2, 2, 2, 11, 13, 13, 1009, 618970019642690137449562111)",
    ),
    ("factor(1)", "Array()"),
    // fractions
    ("Fraction(5, 2)", "5//2"),
    ("1//3 + 1", "4//3"),
    ("1//3 + true", "4//3"),
    ("(3//5)^10", "59049//9765625"),
    ("trunc(5//2)", "2"),
    ("floor(5//2)", "2"),
    ("ceil(5//2)", "3"),
    ("round(5//2)", "3"),
    ("-2//3%1//5", "2//15"),
    ("-2//3 / 1//5", "-10//3"),
    ("int(5//2)", "2"),
    ("num(5//2)", "5"),
    ("den(5//2)", "2"),
    ("bestappr(PI,1000)", "355//113"),
    // decimals
    ("Decimal(2)", "2.0"),
    ("1/4", "0.25"),
    ("0.1+0.2", "0.3"),
    ("0.1+true", "1.1"),
    ("3.0^10", "59049.0"),
    ("int(2.5)", "2"),
    ("trunc(2.5)", "2.0"),
    ("trunc(-2.5)", "-2.0"),
    ("floor(2.5)", "2.0"),
    ("floor(-2.5)", "-3.0"),
    ("ceil(2.5)", "3.0"),
    ("ceil(-2.5)", "-2.0"),
    ("round(2.5)", "3.0"),
    ("round(2.4)", "2.0"),
    ("sqrt(2)", "1.414213562373095"),
    ("log2(5)", "2.321928094887361"),
    ("log10(5)", "0.6989700043360186"),
    ("2^-2", "0.25"),
    ("PI", "3.141592653589793"),
    ("1/0", "Inf"),
    ("0/0", "NaN"),
    ("1.0 < 2.0", "true"),
    ("NaN < NaN", "false"),
    ("NaN == NaN", "false"),
    ("-Inf < Inf", "true"),
    ("123_456.7_89e-0_1", "12345.6789"),
    ("sinc(0)", "1.0"),
    ("todeg(PI)", "180.0"),
    // floats
    ("Float(2)", "2.0l"),
    ("0.1l+0.2l", "0.30000000000000004l"),
    ("0.1l+true", "1.1l"),
    ("int(2.5l)", "2"),
    ("floor(-2.5l)", "-3.0l"),
    ("sqrt(2.0l)", "1.4142135623730951l"),
    // complex
    ("Complex(2,3.0)", "2.0+3.0i"),
    ("a=(2-3*I);sqrt(a*a)", "2.0-3.0i"),
    ("(1+2*I)^10", "237-3116i"),
    ("re(1)", "1"),
    ("im(1)", "0"),
    // polynomials
    ("Polynomial([1,2,3.0])", "3.0*X^2+2.0*X+1.0"),
    ("-(1-X)^2", "-X^2+2*X-1"),
    ("deg(X^2+1)", "2"),
    ("r=1+X;q=1+X+X^2;b=X^2-1;a=q*b+r;a%b", "X+1"),
    ("r=1+X;q=1+X+X^2;b=X^2-1;a=q*b+r;divrem(a, b)", "Array(X^2+X+1, X+1)"),
    ("(1+X+X^2)(2)", "7"),
    ("deriv(1-2*X^2+2*X^3)", "6*X^2-4*X"),
    ("integ(6*X^2-4*X)", "2.0*X^3-2.0*X^2"),
    ("(1+2*X+3*X^2)[1]", "2"),
    ("(1+2*X+3*X^2)[-1]", "3"),
    // rational functions
    ("(2*X-2)//(X^2-1)", "(Polynomial(2))//(X+1)"),
    ("((X)//(X^2+1))(2//1)", "2//5"),
    ("deriv((X^2-X+1)//(X-1))", "(X^2-2*X)//(X^2-2*X+1)"),
    // series
    ("O(1+X^2)", "O(X^2)"),
    ("O(1//X^2)", "O(X^-2)"),
    ("-(X-X^2+O(X^3))", "-X+X^2+O(X^3)"),
    ("(X+O(X^3))+(-X^2+X^3)", "X-X^2+O(X^3)"),
    ("(X+O(X^3))+(1+O(X^2))", "1+X+O(X^2)"),
    ("1//(1+X+O(X^3))", "1//1-1//1*X+1//1*X^2+O(X^3)"),
    ("log(1+X+O(X^5)+0//1)", "1//1*X-1//2*X^2+1//3*X^3-1//4*X^4+O(X^5)"),
    ("sin(X+O(X^6)+0//1)", "1//1*X-1//6*X^3+1//120*X^5+O(X^6)"),
    ("tan(X+O(X^6)+0//1)", "1//1*X+1//3*X^3+2//15*X^5+O(X^6)"),
    ("(X+X^2+O(X^5))^3", "X^3+3*X^4+3*X^5+X^6+O(X^7)"),
    ("(X+X^2+O(X^5))^0", "1+O(X^4)"),
    // tensors
    ("Tensor(3)", "Tensor(3)"),
    ("shape([1, -2])", "Array(2)"),
    ("[1, 2.0, 1/5]", "[1.0, 2.0, 0.2]"),
    ("abs([1, -2])", "[1, 2]"),
    ("sqrt([1, 2, -2])", "[1.0, 1.414213562373095, NaN]"),
    ("[1,2]+[2,3]", "[3, 5]"),
    ("[1,2].*[2,3]", "[2, 6]"),
    ("[7,5]%[2,3]", "[1, 2]"),
    ("typeof([1,2]/[2,3])", "\"Tensor(Decimal)\""),
    ("[1,2]+[[2],[3]]", "[[3, 4], [4, 5]]"),
    ("[[1,2],[3,4]]+[-1,1]", "[[0, 3], [2, 5]]"),
    ("a=[[1,2,3],[4,5,6]];a[1,2]", "6"),
    ("a=[[1,2,3],[4,5,6]];a[1]", "[4, 5, 6]"),
    ("a=[[1,2,3],[4,5,6]];a[1,1:2]", "[5]"),
    ("a=[[1,2,3],[4,5,6]];a[:,1]", "[2, 5]"),
    ("a=[[1,2,3],[4,5,6]];a[0:2,1:3]", "[[2, 3], [5, 6]]"),
    ("a=[1,2,3];a[1:3]=[4,5];a", "[1, 4, 5]"),
    ("a=[1,2,3];a[1]=4;a", "[1, 4, 3]"),
    ("a=Tensor(3);a[]", "3"),
    ("a=Tensor(3);a[]=4;a", "Tensor(4)"),
    ("trace([[1,2],[3,4]])", "5"),
    ("[[1,2],[3,4]]*[[3],[4]]", "[[11], [25]]"),
    ("[[1,2],[3,4]]^3", "[[37, 54], [81, 118]]"),
    (
        "[ [[1,2],[3,4]], [[-1,2],[3,4]] ] * [[3],[4]]",
        "[[[11], [25]], [[5], [25]]]",
    ),
    ("trans([[1,2,3],[4,5,6]])", "[[1, 4], [2, 5], [3, 6]]"),
    ("trans([1,2,3])", "[[1], [2], [3]]"),
    ("inverse([[1,2],[3,4]])", "[[-2.0, 1.0], [1.5, -0.5]]"),
    (
        "charpoly(mathilbert(4))",
        "1//1*X^4-176//105*X^3+3341//12600*X^2-41//23625*X+1//6048000",
    ),
    ("charpoly([[1,2],[3,4]])", "X^2-5*X-2"),
    ("dp([1, 2, 3], [3, -4, -7])", "-26"),
    ("cp([1, 2, 3], [3, -4, -7])", "[-2, 16, -10]"),
    ("det(mathilbert(4))", "1//6048000"),
    ("rank([[1,2,1],[-2,-3,1],[3,5,0]])", "2"),
    ("ker([[1,2,1],[-2,-3,1],[3,5,0]])", "[[5//1], [-3//1], [1//1]]"),
    // strings
    ("len('ab\u{20ac}d')", "4"),
    ("\"a\u{20ac}cd\"[1]", "\"\u{20ac}\""),
    ("\"a\u{20ac}cd\"[1:3]", "\"\u{20ac}c\""),
    ("\"a\u{20ac}cd\"[:-1]", "\"a\u{20ac}c\""),
    ("\"a\u{20ac}cd\"+\"efg\"", "\"a\u{20ac}cdefg\""),
    ("chr(0x20ac)", "\"\u{20ac}\""),
    ("ord(\"\u{20ac}\")", "8364"),
    // units
    ("convert(1, \"c\", \"km/s\")", "299792.458"),
    ("convert(100, \"\u{b0}C\", \"\u{b0}F\")", "211.9999999999999"),
    ("convert(100, \"square feet\", \"m^2\")", "9.290304000000001"),
    ("convert(20000, \"m\u{b2}\", \"ha\")", "2.0"),
];

/// JS-mode cases (array literals, xor caret).
const JS_CASES: &[(&str, &str)] = &[
    ("a=[1, 2, 3, 4];a[2]", "3"),
    ("a=[1, 2, 3, 4];a[1:3]", "[2, 3]"),
    ("a=[1, 2, 3, 4];a[1:]", "[2, 3, 4]"),
    ("a=[1, 2, 3, null];a[:]", "[1, 2, 3, null]"),
    ("len([1,2,3])", "3"),
    ("2^3", "1"),
];

fn check(ctx: &mut Ctx, input: &str, expected: &str) -> bool {
    match eval_line(ctx, input) {
        Ok(values) => {
            let Some((v, _)) = values.last() else {
                eprintln!("ERROR: input='{input}' produced no value");
                return false;
            };
            let result = format_value(ctx, v);
            if result != expected {
                eprintln!("ERROR: input='{input}' result='{result}' expected='{expected}'");
                return false;
            }
            true
        }
        Err(e) => {
            eprintln!("ERROR: input='{input}' error='{e}' expected='{expected}'");
            false
        }
    }
}

pub fn run() -> bool {
    let mut ok = true;
    let mut ctx = Ctx::new();
    for (input, expected) in CASES {
        ok &= check(&mut ctx, input, expected);
    }
    let mut ctx = Ctx::new();
    ctx.js_mode = true;
    for (input, expected) in JS_CASES {
        ok &= check(&mut ctx, input, expected);
    }
    if ok {
        println!("self test passed");
    }
    ok
}

#[cfg(test)]
mod tests {
    #[test]
    fn self_test_table_passes() {
        assert!(super::run());
    }
}
