//! Matrix algorithms on rank-2 tensors: Gauss-Jordan inverse,
//! determinant, rank/kernel over exact coefficient fields, trace, and
//! the Faddeev-LeVerrier characteristic polynomial.
//!
//! Pivoting picks the first nonzero entry in the column, not the
//! numerically better max-magnitude one.

use crate::context::Ctx;
use crate::convert::{convert, one_of, zero_of};
use crate::dispatch;
use crate::poly;
use crate::tensor::tensor_value;
use crate::value::{Tensor, Value};
use abax_common::{CalcError, CalcResult, Kind, Type};
use smallvec::smallvec;
use std::rc::Rc;

/// Side length of a square rank-2 tensor.
pub fn check_square(t: &Tensor) -> CalcResult<usize> {
    if t.rank() != 2 || t.dims[0] != t.dims[1] {
        return Err(CalcError::ty("square matrix expected"));
    }
    Ok(t.dims[0])
}

/// Element type gaining reciprocals: integers widen to Decimal (or
/// Fraction when `frac` is set), recursively under Complex.
fn field_elem(elem: &Rc<Type>, frac: bool) -> Rc<Type> {
    let target = if frac { Kind::Fraction } else { Kind::Decimal };
    match elem.kind() {
        Kind::Integer => Type::simple(target),
        Kind::Complex if elem.elem().map(|e| e.kind()) == Some(Kind::Integer) => {
            Type::complex(Type::simple(target))
        }
        _ => elem.clone(),
    }
}

pub fn identity(ctx: &Ctx, n: usize, elem: &Rc<Type>) -> CalcResult<Value> {
    let mut cells = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            cells.push(if r == c {
                one_of(ctx, elem)?
            } else {
                zero_of(ctx, elem)?
            });
        }
    }
    tensor_value(ctx, smallvec![n, n], cells)
}

pub fn diag(ctx: &Ctx, v: &Tensor) -> CalcResult<Value> {
    if v.rank() != 1 {
        return Err(CalcError::ty("vector expected"));
    }
    let n = v.dims[0];
    let mut cells = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            cells.push(if r == c {
                v.cells[r].clone()
            } else {
                zero_of(ctx, &v.elem)?
            });
        }
    }
    tensor_value(ctx, smallvec![n, n], cells)
}

/// The n-by-n Hilbert matrix with fraction entries.
pub fn hilbert(ctx: &Ctx, n: usize) -> CalcResult<Value> {
    let mut cells = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let d = Value::int((1 + i + j) as i64);
            cells.push(dispatch::op2(
                ctx,
                crate::dispatch::Op2::FracDiv,
                Value::int(1),
                d,
            )?);
        }
    }
    tensor_value(ctx, smallvec![n, n], cells)
}

pub fn trace(ctx: &Ctx, t: &Tensor) -> CalcResult<Value> {
    let n = check_square(t)?;
    let mut acc = t.cells[0].clone();
    for i in 1..n {
        acc = dispatch::add(ctx, acc, t.cells[i * n + i].clone())?;
    }
    Ok(acc)
}

/// Gauss-Jordan inverse; first-nonzero pivot, range error if singular.
pub fn inverse(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let Value::Tensor(t) = v else {
        return Err(CalcError::ty("tensor expected"));
    };
    let n = check_square(&t)?;
    let mut src: Vec<Value> = t.cells.clone();
    let felem = field_elem(&t.elem, false);
    let Value::Tensor(idn) = identity(ctx, n, &felem)? else {
        unreachable!()
    };
    let mut dst: Vec<Value> = idn.cells.clone();
    for i in 0..n {
        let mut pivot = None;
        for j in i..n {
            if !src[j * n + i].is_zero_value() {
                pivot = Some(j);
                break;
            }
        }
        let Some(j) = pivot else {
            return Err(CalcError::range("matrix is not invertible"));
        };
        if j != i {
            for k in 0..n {
                src.swap(j * n + k, i * n + k);
                dst.swap(j * n + k, i * n + k);
            }
        }
        let c = dispatch::invert(ctx, src[i * n + i].clone())?;
        for k in 0..n {
            src[i * n + k] = dispatch::mul(ctx, src[i * n + k].clone(), c.clone())?;
            dst[i * n + k] = dispatch::mul(ctx, dst[i * n + k].clone(), c.clone())?;
        }
        for j in 0..n {
            if j == i {
                continue;
            }
            let c = src[j * n + i].clone();
            if c.is_zero_value() {
                continue;
            }
            for k in i..n {
                let t = dispatch::mul(ctx, src[i * n + k].clone(), c.clone())?;
                src[j * n + k] = dispatch::sub(ctx, src[j * n + k].clone(), t)?;
            }
            for k in 0..n {
                let t = dispatch::mul(ctx, dst[i * n + k].clone(), c.clone())?;
                dst[j * n + k] = dispatch::sub(ctx, dst[j * n + k].clone(), t)?;
            }
        }
    }
    tensor_value(ctx, smallvec![n, n], dst)
}

/// Gaussian elimination determinant; the swap count carries the sign.
pub fn det(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    let Value::Tensor(t) = v else {
        return Err(CalcError::ty("tensor expected"));
    };
    let n = check_square(&t)?;
    let mut src: Vec<Value> = t.cells.clone();
    let mut sign = 1i64;
    for i in 0..n {
        let mut pivot = None;
        for j in i..n {
            if !src[j * n + i].is_zero_value() {
                pivot = Some(j);
                break;
            }
        }
        let Some(j) = pivot else {
            return Ok(Value::int(0));
        };
        if j != i {
            for k in 0..n {
                src.swap(j * n + k, i * n + k);
            }
            sign = -sign;
        }
        let c = dispatch::invert(ctx, src[i * n + i].clone())?;
        for j in i + 1..n {
            let f = dispatch::mul(ctx, c.clone(), src[j * n + i].clone())?;
            for k in 0..n {
                let t = dispatch::mul(ctx, src[i * n + k].clone(), f.clone())?;
                src[j * n + k] = dispatch::sub(ctx, src[j * n + k].clone(), t)?;
            }
        }
    }
    let mut acc = Value::int(sign);
    for i in 0..n {
        acc = dispatch::mul(ctx, acc, src[i * n + i].clone())?;
    }
    Ok(acc)
}

fn rational_matrix(ctx: &Ctx, t: &Rc<Tensor>) -> CalcResult<Rc<Tensor>> {
    let ok = match t.elem.kind() {
        Kind::Fraction => true,
        Kind::Complex => matches!(
            t.elem.elem().map(|e| e.kind()),
            Some(Kind::Fraction) | Some(Kind::Integer)
        ),
        Kind::Integer => true,
        _ => false,
    };
    if !ok {
        return Err(CalcError::ty("rational matrix expected"));
    }
    let felem = field_elem(&t.elem, true);
    if felem == t.elem {
        return Ok(t.clone());
    }
    let converted = convert(
        ctx,
        Value::Tensor(t.clone()),
        &Type::tensor(felem),
    )?;
    let Value::Tensor(t) = converted else {
        unreachable!()
    };
    Ok(t)
}

fn eliminate(ctx: &Ctx, v: &Rc<Tensor>, want_kernel: bool) -> CalcResult<Value> {
    if v.rank() != 2 {
        return Err(CalcError::ty("matrix expected"));
    }
    let v = rational_matrix(ctx, v)?;
    let (w, h) = (v.dims[0], v.dims[1]);
    let mut src: Vec<Value> = v.cells.clone();
    let mut pivot_cols = vec![false; w];
    let mut rank = 0usize;
    for i in 0..w {
        let mut pivot = None;
        for j in rank..h {
            if !src[j * w + i].is_zero_value() {
                pivot = Some(j);
                break;
            }
        }
        let Some(j) = pivot else { continue };
        pivot_cols[i] = true;
        if j != rank {
            for k in 0..w {
                src.swap(j * w + k, rank * w + k);
            }
        }
        let c = dispatch::invert(ctx, src[rank * w + i].clone())?;
        for k in 0..w {
            src[rank * w + k] = dispatch::mul(ctx, src[rank * w + k].clone(), c.clone())?;
        }
        let from = if want_kernel { 0 } else { rank + 1 };
        for j in from..h {
            if j == rank {
                continue;
            }
            let c = src[j * w + i].clone();
            if c.is_zero_value() {
                continue;
            }
            for k in i..w {
                let t = dispatch::mul(ctx, src[rank * w + k].clone(), c.clone())?;
                src[j * w + k] = dispatch::sub(ctx, src[j * w + k].clone(), t)?;
            }
        }
        rank += 1;
    }
    if !want_kernel {
        return Ok(Value::int(rank as i64));
    }
    // basis vectors for the free columns
    let ker_dim = w - rank;
    let felem = field_elem(&v.elem, true);
    if ker_dim == 0 {
        return tensor_value(ctx, smallvec![0, w], Vec::new());
    }
    let mut cells = vec![Value::Null; w * ker_dim];
    let mut k = 0;
    for i in 0..w {
        if pivot_cols[i] {
            continue;
        }
        let mut pivot_row = 0;
        let mut free_seen = 0;
        for j in 0..w {
            let c = if pivot_cols[j] {
                let c = dispatch::neg(ctx, src[pivot_row * w + i].clone())?;
                pivot_row += 1;
                c
            } else {
                let one = (free_seen == k) as i64;
                free_seen += 1;
                convert(ctx, Value::int(one), &felem)?
            };
            cells[j * ker_dim + k] = c;
        }
        k += 1;
    }
    tensor_value(ctx, smallvec![ker_dim, w], cells)
}

pub fn rank(ctx: &Ctx, v: &Rc<Tensor>) -> CalcResult<Value> {
    eliminate(ctx, v, false)
}

pub fn kernel(ctx: &Ctx, v: &Rc<Tensor>) -> CalcResult<Value> {
    eliminate(ctx, v, true)
}

/// Faddeev-LeVerrier recurrence; integer matrices use exact division
/// so the characteristic polynomial stays integral.
pub fn charpoly(ctx: &Ctx, v: &Rc<Tensor>) -> CalcResult<Value> {
    let n = check_square(v)?;
    let elem = v.elem.clone();
    let is_int = elem.kind() == Kind::Integer
        || (elem.kind() == Kind::Complex
            && elem.elem().map(|e| e.kind()) == Some(Kind::Integer));
    let mut coeffs = vec![Value::Null; n + 1];
    coeffs[n] = one_of(ctx, &elem)?;
    let mut c = identity(ctx, n, &elem)?;
    for i in 0..n {
        c = dispatch::mul(ctx, c, Value::Tensor(v.clone()))?;
        let Value::Tensor(ct) = &c else { unreachable!() };
        let tr = trace(ctx, ct)?;
        let coef = dispatch::neg(ctx, tr)?;
        let coef = if is_int {
            dispatch::div_exact(ctx, coef, Value::int(i as i64 + 1))?
        } else {
            dispatch::div(ctx, coef, Value::int(i as i64 + 1))?
        };
        coeffs[n - i - 1] = coef.clone();
        // C += coef * I on the diagonal
        let Value::Tensor(ct) = &c else { unreachable!() };
        let mut cells = ct.cells.clone();
        for j in 0..n {
            cells[j * n + j] = dispatch::add(ctx, cells[j * n + j].clone(), coef.clone())?;
        }
        c = tensor_value(ctx, ct.dims.clone(), cells)?;
    }
    let elem = coeffs[0].type_of();
    let coeffs = coeffs
        .into_iter()
        .map(|x| convert(ctx, x, &elem))
        .collect::<CalcResult<Vec<_>>>()?;
    Ok(poly::poly_value(elem, coeffs))
}

pub fn eigenvals(ctx: &Ctx, v: &Rc<Tensor>) -> CalcResult<Value> {
    let p = charpoly(ctx, v)?;
    poly::roots(ctx, p, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;
    use crate::tensor::from_items;

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    fn mat(ctx: &Ctx, rows: &[&[i64]]) -> Rc<Tensor> {
        let rs: Vec<Value> = rows
            .iter()
            .map(|r| from_items(ctx, r.iter().map(|x| Value::int(*x)).collect()).unwrap())
            .collect();
        let Value::Tensor(t) = from_items(ctx, rs).unwrap() else {
            unreachable!()
        };
        t
    }

    #[test]
    fn inverse_of_integer_matrix_is_decimal() {
        let c = Ctx::new();
        let m = mat(&c, &[&[1, 2], &[3, 4]]);
        let inv = inverse(&c, Value::Tensor(m)).unwrap();
        assert_eq!(show(&c, &inv), "[[-2.0, 1.0], [1.5, -0.5]]");
    }

    #[test]
    fn singular_matrix_is_a_range_error() {
        let c = Ctx::new();
        let m = mat(&c, &[&[1, 2], &[2, 4]]);
        let e = inverse(&c, Value::Tensor(m)).unwrap_err();
        assert_eq!(e.kind, abax_common::CalcErrorKind::Range);
    }

    #[test]
    fn hilbert_det_is_exact() {
        let c = Ctx::new();
        let h = hilbert(&c, 4).unwrap();
        let d = det(&c, h).unwrap();
        assert_eq!(show(&c, &d), "1//6048000");
    }

    #[test]
    fn rank_and_kernel() {
        let c = Ctx::new();
        let m = mat(&c, &[&[1, 2, 1], &[-2, -3, 1], &[3, 5, 0]]);
        let r = rank(&c, &m).unwrap();
        assert!(r.eq_int(2));
        let k = kernel(&c, &m).unwrap();
        assert_eq!(show(&c, &k), "[[5//1], [-3//1], [1//1]]");
    }

    #[test]
    fn charpoly_integer_and_hilbert() {
        let c = Ctx::new();
        let m = mat(&c, &[&[1, 2], &[3, 4]]);
        let p = charpoly(&c, &m).unwrap();
        assert_eq!(show(&c, &p), "X^2-5*X-2");
        let Value::Tensor(h) = hilbert(&c, 4).unwrap() else {
            unreachable!()
        };
        let p = charpoly(&c, &h).unwrap();
        assert_eq!(
            show(&c, &p),
            "1//1*X^4-176//105*X^3+3341//12600*X^2-41//23625*X+1//6048000"
        );
    }

    #[test]
    fn matrix_times_inverse_is_identity() {
        let c = Ctx::new();
        // fractions make the law exact
        let Value::Tensor(h) = hilbert(&c, 3).unwrap() else {
            unreachable!()
        };
        let inv = inverse(&c, Value::Tensor(h.clone())).unwrap();
        let prod = dispatch::mul(&c, Value::Tensor(h), inv).unwrap();
        assert_eq!(show(&c, &prod), "[[1//1, 0//1, 0//1], [0//1, 1//1, 0//1], [0//1, 0//1, 1//1]]");
    }
}
