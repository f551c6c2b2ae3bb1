//! AST evaluation: literals are realized at the current precision,
//! identifiers resolve through the binding table, operators feed the
//! generic dispatch, and indexed assignment clones-on-write.

use crate::context::Ctx;
use crate::dispatch::{self, Op2};
use crate::scalar::{complex_ops, int_ops};
use crate::seq;
use crate::tensor::{self, AxisSel};
use crate::value::{Callable, RangeVal, Value};
use abax_common::{CalcError, CalcResult};
use abax_num::{Dec, Flt};
use abax_parse::{AstNode, BinOp, IndexExpr, NumberLit, Parser, UnOp};
use num_bigint::BigInt;

/// Evaluate one input line; returns each statement's value and whether
/// it should be printed.
pub fn eval_line(ctx: &mut Ctx, src: &str) -> CalcResult<Vec<(Value, bool)>> {
    let program = Parser::parse(src, ctx.js_mode)?;
    let mut out = Vec::with_capacity(program.len());
    for stmt in &program {
        let v = eval_statement(ctx, &stmt.expr)?;
        out.push((v, stmt.print));
    }
    Ok(out)
}

pub fn eval_statement(ctx: &mut Ctx, node: &AstNode) -> CalcResult<Value> {
    eval(ctx, node)
}

fn eval(ctx: &mut Ctx, node: &AstNode) -> CalcResult<Value> {
    match node {
        AstNode::Number(lit) => realize_number(ctx, lit),
        AstNode::Str(s) => Ok(Value::str(s.clone())),
        AstNode::Ident(name) => ctx.get_variable(name),
        AstNode::Unary { op, expr } => {
            let v = eval(ctx, expr)?;
            match op {
                UnOp::Plus => Ok(v),
                UnOp::Neg => dispatch::neg(ctx, v),
                UnOp::BitNot => int_ops::bit_not(v),
            }
        }
        AstNode::Binary { op, lhs, rhs } => {
            let a = eval(ctx, lhs)?;
            let b = eval(ctx, rhs)?;
            eval_binary(ctx, *op, a, b)
        }
        AstNode::Call { callee, args } => {
            let f = eval(ctx, callee)?;
            let mut argv = Vec::with_capacity(args.len());
            for a in args {
                argv.push(eval(ctx, a)?);
            }
            call_function(ctx, f, argv)
        }
        AstNode::Index { base, indices } => {
            let b = eval(ctx, base)?;
            let sels = eval_indices(ctx, indices)?;
            read_index(ctx, &b, &sels)
        }
        AstNode::Bracket(items) => {
            let mut vals = Vec::with_capacity(items.len());
            for item in items {
                vals.push(eval(ctx, item)?);
            }
            if ctx.js_mode {
                Ok(Value::Array(std::rc::Rc::new(vals)))
            } else {
                tensor::from_items(ctx, vals)
            }
        }
        AstNode::Assign { target, value } => {
            let v = eval(ctx, value)?;
            assign(ctx, target, v.clone())?;
            Ok(v)
        }
    }
}

fn eval_binary(ctx: &Ctx, op: BinOp, a: Value, b: Value) -> CalcResult<Value> {
    let op2 = match op {
        BinOp::Or => Op2::Or,
        BinOp::Xor => Op2::Xor,
        BinOp::And => Op2::And,
        BinOp::Eq => Op2::CmpEq,
        BinOp::Ne => {
            let r = dispatch::op2(ctx, Op2::CmpEq, a, b)?;
            let Value::Bool(r) = r else {
                return Err(CalcError::ty("comparison expected a boolean"));
            };
            return Ok(Value::Bool(!r));
        }
        BinOp::Lt => Op2::CmpLt,
        BinOp::Le => Op2::CmpLe,
        BinOp::Gt => return dispatch::op2(ctx, Op2::CmpLt, b, a),
        BinOp::Ge => return dispatch::op2(ctx, Op2::CmpLe, b, a),
        BinOp::Shl => Op2::Shl,
        BinOp::Shr => Op2::Shr,
        BinOp::Add => Op2::Add,
        BinOp::Sub => Op2::Sub,
        BinOp::Mul => Op2::Mul,
        BinOp::Div => Op2::Div,
        BinOp::Mod => Op2::Mod,
        BinOp::DotMul => Op2::DotMul,
        BinOp::FracDiv => Op2::FracDiv,
        BinOp::Pow => Op2::Pow,
    };
    dispatch::op2(ctx, op2, a, b)
}

/* ------------------------- number literals ------------------------ */

fn realize_number(ctx: &Ctx, lit: &NumberLit) -> CalcResult<Value> {
    let base = if lit.binary_float || (lit.is_float && lit.radix != 10) {
        if lit.radix == 10 {
            Value::Float(Flt::parse(
                &lit.text,
                ctx.num.float_prec,
                &mut ctx.num.cc(),
            )?)
        } else {
            Value::Float(parse_radix_float(ctx, &lit.text, lit.radix)?)
        }
    } else if lit.is_float {
        Value::Dec(Dec::parse(&lit.text, ctx.num.dec_prec)?)
    } else {
        let n = BigInt::parse_bytes(lit.text.as_bytes(), lit.radix)
            .ok_or_else(|| CalcError::syntax(format!("invalid number '{}'", lit.text)))?;
        Value::Int(n)
    };
    if lit.imaginary {
        complex_ops::make(ctx, Value::int(0), base)
    } else {
        Ok(base)
    }
}

/// Hex/binary/octal float literal: digits around `.`, power-of-two
/// exponent after `p`.
fn parse_radix_float(ctx: &Ctx, text: &str, radix: u32) -> CalcResult<Flt> {
    let bits_per_digit = match radix {
        16 => 4,
        8 => 3,
        2 => 1,
        _ => return Err(CalcError::syntax("invalid float radix")),
    };
    let (mantissa, exp2) = match text.split_once('p') {
        Some((m, e)) => {
            let e: i64 = e
                .parse()
                .map_err(|_| CalcError::syntax("invalid float exponent"))?;
            (m, e)
        }
        None => (text, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let digits = format!("{int_part}{frac_part}");
    let m = BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| CalcError::syntax(format!("invalid number '{text}'")))?;
    let exp2 = exp2 - (frac_part.len() as i64) * bits_per_digit;
    let p = ctx.num.float_prec;
    if exp2 >= 0 {
        let shifted = m << exp2 as usize;
        Ok(Flt::from_bigint(&shifted, p, &mut ctx.num.cc()))
    } else {
        let den = BigInt::from(1) << (-exp2) as usize;
        let num = Flt::from_bigint(&m, p, &mut ctx.num.cc());
        let den = Flt::from_bigint(&den, p, &mut ctx.num.cc());
        Ok(num.div(&den, p))
    }
}

/* ----------------------------- calls ------------------------------ */

/// Invoke a callable value. Polynomials, rational functions and series
/// are callable too: `(1+X+X^2)(2)` evaluates at the argument.
pub fn call_function(ctx: &Ctx, f: Value, mut args: Vec<Value>) -> CalcResult<Value> {
    match &f {
        Value::Func(func) => {
            let ok = if func.var_args {
                args.len() >= func.arity
            } else {
                args.len() == func.arity
            };
            if !ok {
                return Err(CalcError::ty(format!(
                    "{}: {} argument(s) expected",
                    func.name, func.arity
                )));
            }
            match func.call {
                Callable::F0(f) => f(ctx),
                Callable::F1(f) => f(ctx, args.remove(0)),
                Callable::F2(f) => {
                    let b = args.remove(1);
                    f(ctx, args.remove(0), b)
                }
                Callable::F3(f) => {
                    let c = args.remove(2);
                    let b = args.remove(1);
                    f(ctx, args.remove(0), b, c)
                }
                Callable::Var(f) => f(ctx, args),
            }
        }
        Value::Poly(p) => {
            let [x] = args.as_slice() else {
                return Err(CalcError::ty("1 argument expected"));
            };
            crate::poly::apply(ctx, p, x)
        }
        Value::RFrac(r) => {
            let [x] = args.as_slice() else {
                return Err(CalcError::ty("1 argument expected"));
            };
            crate::rfrac::apply(ctx, r, x)
        }
        Value::Series(s) => {
            let [x] = args.as_slice() else {
                return Err(CalcError::ty("1 argument expected"));
            };
            crate::series::apply(ctx, s, x)
        }
        other => Err(CalcError::ty(format!("{} is not callable", other.kind()))),
    }
}

/* ---------------------------- indexing ----------------------------- */

fn eval_indices(ctx: &mut Ctx, indices: &[IndexExpr]) -> CalcResult<Vec<AxisSel>> {
    let mut out = Vec::with_capacity(indices.len());
    for ix in indices {
        match ix {
            IndexExpr::Single(e) => {
                let v = eval(ctx, e)?;
                out.push(AxisSel::Single(v.to_i64()?));
            }
            IndexExpr::Slice { start, stop } => {
                let lo = match start {
                    Some(e) => Some(eval(ctx, e)?.to_i64()?),
                    None => None,
                };
                let hi = match stop {
                    Some(e) => Some(eval(ctx, e)?.to_i64()?),
                    None => None,
                };
                out.push(AxisSel::Range(RangeVal { start: lo, stop: hi }));
            }
        }
    }
    Ok(out)
}

fn read_index(ctx: &Ctx, base: &Value, sels: &[AxisSel]) -> CalcResult<Value> {
    match base {
        Value::Tensor(t) => tensor::get_index(ctx, t, sels),
        Value::Array(items) => match sels {
            [AxisSel::Single(i)] => seq::array_index(items, *i),
            [AxisSel::Range(r)] => seq::array_slice(items, r.start, r.stop),
            _ => Err(CalcError::ty("arrays have a single dimension")),
        },
        Value::Str(s) => match sels {
            [AxisSel::Single(i)] => seq::string_index(s, *i),
            [AxisSel::Range(r)] => seq::string_slice(s, r.start, r.stop),
            _ => Err(CalcError::ty("strings have a single dimension")),
        },
        Value::Poly(p) => match sels {
            [AxisSel::Single(i)] => {
                let n = p.coeffs.len() as i64;
                let j = if *i < 0 { *i + n } else { *i };
                if j < 0 || j >= n {
                    return Err(CalcError::range("index out of bounds"));
                }
                Ok(p.coeffs[j as usize].clone())
            }
            _ => Err(CalcError::ty("polynomials have a single dimension")),
        },
        Value::Series(s) => match sels {
            [AxisSel::Single(k)] => crate::series::coeff_at(ctx, s, *k),
            _ => Err(CalcError::ty("series have a single dimension")),
        },
        other => Err(CalcError::ty(format!("{} is not indexable", other.kind()))),
    }
}

/* --------------------------- assignment ---------------------------- */

fn assign(ctx: &mut Ctx, target: &AstNode, value: Value) -> CalcResult<()> {
    match target {
        AstNode::Ident(name) => {
            ctx.set_variable(name, value, false, true);
            Ok(())
        }
        AstNode::Index { base, indices } => {
            let AstNode::Ident(name) = base.as_ref() else {
                return Err(CalcError::ty("invalid assignment target"));
            };
            let sels = eval_indices(ctx, indices)?;
            let current = ctx.get_variable(name)?;
            let updated = match current {
                Value::Tensor(t) => tensor::set_index(ctx, &t, &sels, value)?,
                Value::Array(mut items) => {
                    match sels.as_slice() {
                        [AxisSel::Single(i)] => seq::array_set(&mut items, *i, value)?,
                        [AxisSel::Range(r)] => {
                            seq::array_set_slice(&mut items, r.start, r.stop, value)?
                        }
                        _ => return Err(CalcError::ty("arrays have a single dimension")),
                    }
                    Value::Array(items)
                }
                other => {
                    return Err(CalcError::ty(format!(
                        "cannot assign into {}",
                        other.kind()
                    )));
                }
            };
            ctx.set_variable(name, updated, false, true);
            Ok(())
        }
        _ => Err(CalcError::ty("invalid assignment target")),
    }
}

/* ------------------------------ tests ------------------------------ */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn run(ctx: &mut Ctx, src: &str) -> String {
        let values = eval_line(ctx, src).unwrap();
        let (v, _) = values.last().unwrap();
        format_value(ctx, v)
    }

    fn run_err(ctx: &mut Ctx, src: &str) -> CalcError {
        eval_line(ctx, src).unwrap_err()
    }

    #[test]
    fn arithmetic_and_promotion() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "1+2*3"), "7");
        assert_eq!(run(&mut c, "1/4"), "0.25");
        assert_eq!(run(&mut c, "1//3 + 1"), "4//3");
        assert_eq!(run(&mut c, "(3//5)^10"), "59049//9765625");
        assert_eq!(run(&mut c, "2^-2"), "0.25");
        assert_eq!(run(&mut c, "0.1+0.2"), "0.3");
        assert_eq!(run(&mut c, "0.1l+0.2l"), "0.30000000000000004l");
        assert_eq!(run(&mut c, "1 + true"), "2");
    }

    #[test]
    fn division_by_zero_is_decimal_infinity() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "1/0"), "Inf");
        assert_eq!(run(&mut c, "0/0"), "NaN");
    }

    #[test]
    fn comparisons() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "1 < 2"), "true");
        assert_eq!(run(&mut c, "NaN == NaN"), "false");
        assert_eq!(run(&mut c, "-Inf < Inf"), "true");
        assert_eq!(run(&mut c, "1 != 2"), "true");
    }

    #[test]
    fn unbound_identifier_is_a_reference_error() {
        let mut c = Ctx::new();
        let e = run_err(&mut c, "qzx");
        assert_eq!(e.kind, abax_common::CalcErrorKind::Reference);
    }

    #[test]
    fn string_concat_and_mismatch() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "\"a\u{20ac}cd\"+\"efg\""), "\"a\u{20ac}cdefg\"");
        let e = run_err(&mut c, "\"abc\" + 1");
        assert_eq!(e.kind, abax_common::CalcErrorKind::Type);
        let e = run_err(&mut c, "\"abc\"[10]");
        assert_eq!(e.kind, abax_common::CalcErrorKind::Range);
    }

    #[test]
    fn assignment_and_indexing() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "a=[[1,2,3],[4,5,6]];a[1,2]"), "6");
        assert_eq!(run(&mut c, "a=[[1,2,3],[4,5,6]];a[1]"), "[4, 5, 6]");
        assert_eq!(run(&mut c, "a=[[1,2,3],[4,5,6]];a[:,1]"), "[2, 5]");
        assert_eq!(run(&mut c, "a=[1,2,3];a[1]=4;a"), "[1, 4, 3]");
        assert_eq!(run(&mut c, "a=[1,2,3];a[1:3]=[4,5];a"), "[1, 4, 5]");
        assert_eq!(
            run(&mut c, "a=[[1,2,3],[4,5,6]];a[0:2,1:3]=[[1,2],[3,4]];a"),
            "[[1, 1, 2], [4, 3, 4]]"
        );
    }

    #[test]
    fn shifted_number_literals() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "123_456.7_89e-0_1"), "12345.6789");
        assert_eq!(run(&mut c, "0xaa | 0x55"), "255");
        assert_eq!(run(&mut c, "1 << 32"), "4294967296");
        assert_eq!(run(&mut c, "0x1.8p1l"), "3.0l");
    }

    #[test]
    fn polynomial_call_and_index() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "(1+X+X^2)(2)"), "7");
        assert_eq!(run(&mut c, "(1+2*X+3*X^2)[1]"), "2");
        assert_eq!(run(&mut c, "(1+2*X+3*X^2)[-1]"), "3");
        assert_eq!(run(&mut c, "deg(X^2+1)"), "2");
    }

    #[test]
    fn js_mode_arrays_and_xor() {
        let mut c = Ctx::new();
        c.js_mode = true;
        assert_eq!(run(&mut c, "a=[1, 2, 3, 4];a[1:3]"), "[2, 3]");
        assert_eq!(run(&mut c, "2^3"), "1");
        assert_eq!(run(&mut c, "len([1,2,3])"), "3");
    }

    #[test]
    fn imaginary_literals() {
        let mut c = Ctx::new();
        assert_eq!(run(&mut c, "(1+2*I)^10"), "237-3116i");
        assert_eq!(run(&mut c, "3i*3i"), "-9+0i");
    }
}
