//! User-facing value formatting.
//!
//! `num//den` fractions, shortest round-trip decimals, `l`-suffixed
//! binary floats, descending polynomial terms with suppressed unit
//! coefficients, ascending series terms with an `O(X^k)` tail, nested
//! bracket tensors, and JS-mode variants for tensors and arrays.

use crate::context::Ctx;
use crate::seq::escape_string;
use crate::value::{Poly, Series, Tensor, Value};
use abax_common::Kind;
use num_bigint::BigInt;
use num_traits::Signed;

pub fn format_value(ctx: &Ctx, v: &Value) -> String {
    format_inner(ctx, v, false)
}

/// Top-level REPL formatting: matrix rows go on separate lines.
pub fn format_value_top(ctx: &Ctx, v: &Value) -> String {
    format_inner(ctx, v, ctx.tensor_output_lf)
}

fn format_int(ctx: &Ctx, n: &BigInt) -> String {
    if ctx.hex_output {
        if n.is_negative() {
            format!("-0x{}", n.magnitude().to_str_radix(16))
        } else {
            format!("0x{}", n.magnitude().to_str_radix(16))
        }
    } else {
        n.to_string()
    }
}

fn format_inner(ctx: &Ctx, v: &Value, lf: bool) -> String {
    match v {
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Null => "null".to_string(),
        Value::Int(n) => format_int(ctx, n),
        Value::Frac(f) => format!("{}//{}", format_int(ctx, f.numer()), format_int(ctx, f.denom())),
        Value::Dec(d) => d.to_display_string(),
        Value::Float(f) => {
            if ctx.hex_output {
                format!("{}l", f.to_hex_string(&mut ctx.num.cc()))
            } else {
                format!("{}l", f.to_display_string(ctx.num.float_prec, &mut ctx.num.cc()))
            }
        }
        Value::Complex(c) => {
            let im = format_inner(ctx, &c.im, false);
            if c.re.is_zero_value() {
                return format!("{im}i");
            }
            let re = format_inner(ctx, &c.re, false);
            if im.starts_with('-') {
                format!("{re}{im}i")
            } else {
                format!("{re}+{im}i")
            }
        }
        Value::Poly(p) => format_poly(ctx, p),
        Value::RFrac(r) => format!(
            "({})//({})",
            format_poly(ctx, &r.num),
            format_poly(ctx, &r.den)
        ),
        Value::Series(s) => format_series(ctx, s),
        Value::Tensor(t) => format_tensor(ctx, t, lf),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(|x| format_inner(ctx, x, false)).collect();
            if ctx.js_mode {
                format!("[{}]", parts.join(", "))
            } else {
                format!("Array({})", parts.join(", "))
            }
        }
        Value::Str(s) => escape_string(s),
        Value::Func(f) => format!("Function({})", f.name),
        Value::Range(r) => {
            let fmt = |b: Option<i64>| b.map(|x| x.to_string()).unwrap_or_default();
            format!("{}:{}", fmt(r.start), fmt(r.stop))
        }
    }
}

/// One `c * X^k` term. Integer coefficients 1 and -1 reduce to the bare
/// sign; complex coefficients are parenthesized.
fn format_monomial(ctx: &Ctx, out: &mut String, c: &Value, k: i64) {
    if k == 0 {
        out.push_str(&format_inner(ctx, c, false));
        return;
    }
    let is_int = c.kind() == Kind::Integer;
    if is_int && c.eq_int(1) {
        // bare X
    } else if is_int && c.eq_int(-1) {
        out.push('-');
    } else {
        let need_paren = c.kind() == Kind::Complex;
        if need_paren {
            out.push('(');
        }
        out.push_str(&format_inner(ctx, c, false));
        if need_paren {
            out.push(')');
        }
        out.push('*');
    }
    out.push('X');
    if k < 0 || k >= 2 {
        out.push_str(&format!("^{k}"));
    }
}

fn push_term(ctx: &Ctx, out: &mut String, c: &Value, k: i64, first: &mut bool) {
    let start = out.len();
    format_monomial(ctx, out, c, k);
    if !*first && !out[start..].starts_with('-') {
        out.insert(start, '+');
    }
    *first = false;
}

fn format_poly(ctx: &Ctx, p: &Poly) -> String {
    let mut out = String::new();
    let mut first = true;
    for i in (0..p.coeffs.len()).rev() {
        let c = &p.coeffs[i];
        if !c.is_zero_value() && (i >= 1 || !first) {
            push_term(ctx, &mut out, c, i as i64, &mut first);
        }
    }
    if first {
        format!("Polynomial({})", format_inner(ctx, &p.coeffs[0], false))
    } else {
        out
    }
}

fn format_series(ctx: &Ctx, s: &Series) -> String {
    let mut out = String::new();
    let mut first = true;
    for (i, c) in s.coeffs.iter().enumerate() {
        if !c.is_zero_value() {
            push_term(ctx, &mut out, c, s.emin + i as i64, &mut first);
        }
    }
    if !first {
        out.push('+');
    }
    let k = s.emin + s.coeffs.len() as i64;
    if k == 0 {
        out.push_str("O(1)");
    } else if k == 1 {
        out.push_str("O(X)");
    } else {
        out.push_str(&format!("O(X^{k})"));
    }
    out
}

fn format_tensor(ctx: &Ctx, t: &Tensor, lf: bool) -> String {
    if t.rank() == 0 {
        return format!("Tensor({})", format_inner(ctx, &t.cells[0], false));
    }
    let body = format_tensor_axis(ctx, t, t.rank() - 1, 0, lf && t.rank() >= 2);
    if ctx.js_mode {
        format!("Tensor({body})")
    } else {
        body
    }
}

/// Render one axis (outermost first); `offset` indexes into the cell
/// array, `lf` breaks the outermost rows onto their own lines.
fn format_tensor_axis(ctx: &Ctx, t: &Tensor, axis: usize, offset: usize, lf: bool) -> String {
    let n = t.dims[axis];
    let inner: usize = t.dims[..axis].iter().product();
    let mut parts = Vec::with_capacity(n);
    for i in 0..n {
        let off = offset + i * inner;
        if axis == 0 {
            parts.push(format_inner(ctx, &t.cells[off], false));
        } else {
            parts.push(format_tensor_axis(ctx, t, axis - 1, off, false));
        }
    }
    let sep = if lf { ",\n " } else { ", " };
    format!("[{}]", parts.join(sep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;
    use crate::poly::poly_x;
    use abax_num::Dec;

    #[test]
    fn polynomial_unit_coefficients() {
        let c = Ctx::new();
        // -(1 - X)^2 = -X^2 + 2X - 1
        let one_minus_x = dispatch::sub(&c, Value::int(1), poly_x()).unwrap();
        let sq = dispatch::mul(&c, one_minus_x.clone(), one_minus_x).unwrap();
        let p = dispatch::neg(&c, sq).unwrap();
        assert_eq!(format_value(&c, &p), "-X^2+2*X-1");
    }

    #[test]
    fn constant_polynomials_are_tagged() {
        let c = Ctx::new();
        let p = dispatch::sub(&c, poly_x(), poly_x()).unwrap();
        assert_eq!(format_value(&c, &p), "Polynomial(0)");
    }

    #[test]
    fn complex_forms() {
        let c = Ctx::new();
        let z = crate::scalar::complex_ops::make(&c, Value::int(2), Value::int(-3)).unwrap();
        assert_eq!(format_value(&c, &z), "2-3i");
        let z = crate::scalar::complex_ops::make(
            &c,
            Value::int(0),
            Value::Dec(Dec::from_i64(1)),
        )
        .unwrap();
        assert_eq!(format_value(&c, &z), "1.0i");
        let z = crate::scalar::complex_ops::make(&c, Value::int(2), Value::int(0)).unwrap();
        assert_eq!(format_value(&c, &z), "2+0i");
    }

    #[test]
    fn hex_mode_integers() {
        let mut c = Ctx::new();
        c.hex_output = true;
        assert_eq!(format_value(&c, &Value::int(255)), "0xff");
        assert_eq!(format_value(&c, &Value::int(-255)), "-0xff");
    }

    #[test]
    fn multiline_matrices_at_top_level() {
        let c = Ctx::new();
        let m = {
            let r0 = crate::tensor::from_items(&c, vec![Value::int(1), Value::int(2)]).unwrap();
            let r1 = crate::tensor::from_items(&c, vec![Value::int(3), Value::int(4)]).unwrap();
            crate::tensor::from_items(&c, vec![r0, r1]).unwrap()
        };
        assert_eq!(format_value(&c, &m), "[[1, 2], [3, 4]]");
        assert_eq!(format_value_top(&c, &m), "[[1, 2],\n [3, 4]]");
    }
}
