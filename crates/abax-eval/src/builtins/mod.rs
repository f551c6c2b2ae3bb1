//! Built-in function and constant registration.

mod misc;
mod ntheory;
mod numeric;
mod polys;
mod sequences;
mod tensors;
mod transc;

use crate::context::Ctx;
use crate::scalar::complex_ops;
use crate::value::{Callable, Value};
use abax_num::Dec;

pub fn register_all(ctx: &mut Ctx) {
    use Callable::*;

    ctx.def_func("Integer", 1, F1(numeric::integer_ctor));
    ctx.def_func("int", 1, F1(numeric::integer_ctor));
    ctx.def_func("neg", 1, F1(numeric::neg));
    ctx.def_func("inverse", 1, F1(numeric::inverse));
    ctx.def_func("norm2", 1, F1(numeric::norm2));
    ctx.def_func("abs", 1, F1(numeric::abs));
    ctx.def_func("trunc", 1, F1(numeric::trunc));
    ctx.def_func("floor", 1, F1(numeric::floor));
    ctx.def_func("ceil", 1, F1(numeric::ceil));
    ctx.def_func("round", 1, F1(numeric::round));
    ctx.def_func("num", 1, F1(numeric::num));
    ctx.def_func("den", 1, F1(numeric::den));

    ctx.def_func("fact", 1, F1(numeric::fact));
    ctx.def_func("comb", 2, F2(numeric::comb));
    ctx.def_func("xor", 2, F2(numeric::xor));
    ctx.def_func("divrem", 2, F2(numeric::divrem));
    ctx.def_func("gcd", 2, F2(numeric::gcd));
    ctx.def_func("sqrt", 1, F1(numeric::sqrt));

    ctx.def_func("conj", 1, F1(numeric::conj));
    ctx.def_func("re", 1, F1(numeric::re));
    ctx.def_func("im", 1, F1(numeric::im));
    ctx.def_func("arg", 1, F1(numeric::arg));
    ctx.def_func("invmod", 2, F2(ntheory::invmod));
    ctx.def_func("pmod", 3, F3(ntheory::pmod));
    ctx.def_func("ilog2", 1, F1(ntheory::ilog2));
    ctx.def_func("ctz", 1, F1(ntheory::ctz));
    ctx.def_func2("isprime", 1, true, Var(ntheory::isprime));
    ctx.def_func("nextprime", 1, F1(ntheory::nextprime));
    ctx.def_func("factor", 1, F1(ntheory::factor));
    ctx.def_func("bestappr", 2, F2(numeric::bestappr));

    ctx.def_func("exp", 1, F1(transc::exp));
    ctx.def_func("log", 1, F1(transc::log));
    ctx.def_func("log2", 1, F1(transc::log2));
    ctx.def_func("log10", 1, F1(transc::log10));

    ctx.def_func("sin", 1, F1(transc::sin));
    ctx.def_func("cos", 1, F1(transc::cos));
    ctx.def_func("tan", 1, F1(transc::tan));
    ctx.def_func("asin", 1, F1(transc::asin));
    ctx.def_func("acos", 1, F1(transc::acos));
    ctx.def_func("atan", 1, F1(transc::atan));
    ctx.def_func("atan2", 2, F2(transc::atan2));

    ctx.def_func("sinh", 1, F1(transc::sinh));
    ctx.def_func("cosh", 1, F1(transc::cosh));
    ctx.def_func("tanh", 1, F1(transc::tanh));
    ctx.def_func("asinh", 1, F1(transc::asinh));
    ctx.def_func("acosh", 1, F1(transc::acosh));
    ctx.def_func("atanh", 1, F1(transc::atanh));

    ctx.def_func("sinc", 1, F1(transc::sinc));
    ctx.def_func("todb", 1, F1(transc::todb));
    ctx.def_func("fromdb", 1, F1(transc::fromdb));
    ctx.def_func("todeg", 1, F1(transc::todeg));
    ctx.def_func("fromdeg", 1, F1(transc::fromdeg));

    ctx.def_func("Fraction", 2, F2(numeric::fraction_ctor));
    ctx.def_func("Decimal", 1, F1(numeric::decimal_ctor));
    ctx.def_func("Float", 1, F1(numeric::float_ctor));
    ctx.def_func("Complex", 2, F2(numeric::complex_ctor));

    ctx.def_func2("Array", 0, true, Var(sequences::array_ctor));
    ctx.def_func("len", 1, F1(sequences::len));

    ctx.def_func("chr", 1, F1(sequences::chr));
    ctx.def_func("ord", 1, F1(sequences::ord));

    ctx.def_func("Tensor", 1, F1(tensors::tensor_ctor));
    ctx.def_func2("zeros", 0, true, Var(tensors::zeros));
    ctx.def_func("shape", 1, F1(tensors::shape));

    ctx.def_func("idn", 1, F1(tensors::idn));
    ctx.def_func("diag", 1, F1(tensors::diag));
    ctx.def_func("mathilbert", 1, F1(tensors::mathilbert));
    ctx.def_func("trace", 1, F1(tensors::trace));
    ctx.def_func("trans", 1, F1(tensors::trans));
    ctx.def_func("charpoly", 1, F1(tensors::charpoly));
    ctx.def_func("dp", 2, F2(tensors::dp));
    ctx.def_func("cp", 2, F2(tensors::cp));
    ctx.def_func("det", 1, F1(tensors::det));
    ctx.def_func("rank", 1, F1(tensors::rank));
    ctx.def_func("ker", 1, F1(tensors::ker));
    ctx.def_func("eigenvals", 1, F1(tensors::eigenvals));

    ctx.def_func("Polynomial", 1, F1(polys::polynomial_ctor));
    ctx.def_func("deg", 1, F1(polys::deg));
    ctx.def_func("deriv", 1, F1(polys::deriv));
    ctx.def_func("integ", 1, F1(polys::integ));
    ctx.def_func("primpart", 1, F1(polys::primpart));

    ctx.def_func("RationalFunction", 2, F2(polys::rfrac_ctor));

    ctx.def_func("O", 1, F1(polys::big_o));
    ctx.def_func2("polroots", 1, true, Var(polys::polroots));

    ctx.def_func("convert", 3, F3(misc::convert_units));
    ctx.def_func("typeof", 1, F1(misc::type_of));

    // constants
    ctx.set_variable("true", Value::Bool(true), false, false);
    ctx.set_variable("false", Value::Bool(false), false, false);
    ctx.set_variable("null", Value::Null, false, false);
    let i = complex_ops::make(ctx, Value::int(0), Value::int(1)).expect("imaginary unit");
    ctx.set_variable("I", i, false, false);
    ctx.set_variable("Inf", Value::Dec(Dec::inf(false)), false, false);
    ctx.set_variable("NaN", Value::Dec(Dec::nan()), false, false);
    ctx.def_getter("PI", Callable::F0(misc::pi_getter));
    ctx.set_variable("X", crate::poly::poly_x(), false, false);
}
