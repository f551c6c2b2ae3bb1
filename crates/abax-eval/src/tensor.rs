//! Dense tensors: broadcast elementwise arithmetic, matrix multiply,
//! constructors and indexed access.
//!
//! `dims[0]` is the innermost axis. Indexing and printing run outermost
//! first, so a matrix is `dims = [width, height]` and `a[r, c]` reads
//! cell `r * width + c`.

use crate::context::Ctx;
use crate::convert::{convert, promote_types};
use crate::dispatch::{self, Op1, Op2};
use crate::value::{RangeVal, Tensor, Value, MAX_DIMS};
use abax_common::{CalcError, CalcResult, Kind, Type};
use smallvec::{smallvec, SmallVec};
use std::rc::Rc;

pub type Dims = SmallVec<[usize; MAX_DIMS]>;

/// Common element type of a cell list (at least Integer).
fn common_elem(cells: &[Value]) -> CalcResult<Rc<Type>> {
    let mut t = Type::simple(Kind::Integer);
    for c in cells {
        t = promote_types(&t, &c.type_of())?;
    }
    if !t.kind().is_numeric() || t.kind() == Kind::Bool {
        return Err(CalcError::ty("numeric tensor elements expected"));
    }
    Ok(t)
}

/// Build a tensor, promoting all cells to their common element type.
pub fn tensor_value(ctx: &Ctx, dims: Dims, cells: Vec<Value>) -> CalcResult<Value> {
    if dims.len() > MAX_DIMS {
        return Err(CalcError::range("too many tensor dimensions"));
    }
    debug_assert_eq!(dims.iter().product::<usize>(), cells.len());
    let elem = common_elem(&cells)?;
    let cells = cells
        .into_iter()
        .map(|c| convert(ctx, c, &elem))
        .collect::<CalcResult<Vec<_>>>()?;
    Ok(Value::Tensor(Rc::new(Tensor { elem, dims, cells })))
}

pub fn scalar_tensor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    tensor_value(ctx, smallvec![], vec![v])
}

/// Build from a bracket literal: nested tensors of identical shape
/// stack into one more dimension; scalars make a vector.
pub fn from_items(ctx: &Ctx, items: Vec<Value>) -> CalcResult<Value> {
    if items.is_empty() {
        return Err(CalcError::range("empty tensor literal"));
    }
    let n = items.len();
    if let Value::Tensor(first) = &items[0] {
        let inner = first.dims.clone();
        let mut cells = Vec::with_capacity(n * first.cells.len());
        for item in &items {
            let Value::Tensor(t) = item else {
                return Err(CalcError::ty("ragged tensor literal"));
            };
            if t.dims != inner {
                return Err(CalcError::ty("ragged tensor literal"));
            }
            cells.extend(t.cells.iter().cloned());
        }
        let mut dims = inner;
        dims.push(n);
        tensor_value(ctx, dims, cells)
    } else {
        for item in &items {
            if matches!(item, Value::Tensor(_)) {
                return Err(CalcError::ty("ragged tensor literal"));
            }
        }
        tensor_value(ctx, smallvec![n], items)
    }
}

/// `Tensor(v)`: wrap a scalar (idempotent on tensors), or convert a
/// (possibly nested) array.
pub fn tensor_ctor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match v {
        Value::Tensor(_) => Ok(v),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|x| match x {
                    Value::Array(_) => tensor_ctor(ctx, x.clone()),
                    other => Ok(other.clone()),
                })
                .collect::<CalcResult<Vec<_>>>()?;
            from_items(ctx, items)
        }
        other if other.kind().is_numeric() => scalar_tensor(ctx, other),
        other => Err(CalcError::ty(format!(
            "cannot build a tensor from {}",
            other.kind()
        ))),
    }
}

/// Shape as seen by the user: outermost axis first.
pub fn shape(t: &Tensor) -> Value {
    let dims: Vec<Value> = t
        .dims
        .iter()
        .rev()
        .map(|d| Value::int(*d as i64))
        .collect();
    Value::Array(Rc::new(dims))
}

pub fn zeros(ctx: &Ctx, dims_outer: &[i64]) -> CalcResult<Value> {
    if dims_outer.len() > MAX_DIMS {
        return Err(CalcError::range("too many tensor dimensions"));
    }
    let mut dims: Dims = smallvec![];
    for d in dims_outer.iter().rev() {
        if *d < 1 {
            return Err(CalcError::range("dimension must be >= 1"));
        }
        dims.push(*d as usize);
    }
    let size = dims.iter().product::<usize>().max(1);
    let cells = vec![Value::int(0); size];
    tensor_value(ctx, dims, cells)
}

/* ------------------------- broadcasting -------------------------- */

/// Broadcast-compatible result shape; axes align from the innermost
/// side, missing or length-1 axes stretch.
pub fn broadcast_dims(a: &Dims, b: &Dims) -> CalcResult<Dims> {
    let rank = a.len().max(b.len());
    let mut out: Dims = smallvec![];
    for i in 0..rank {
        let da = a.get(i).copied().unwrap_or(1);
        let db = b.get(i).copied().unwrap_or(1);
        if da != db && da != 1 && db != 1 {
            return Err(CalcError::ty("tensor shapes are not broadcastable"));
        }
        out.push(da.max(db));
    }
    Ok(out)
}

fn strides(dims: &Dims) -> SmallVec<[usize; MAX_DIMS]> {
    let mut out: SmallVec<[usize; MAX_DIMS]> = smallvec![];
    let mut s = 1;
    for d in dims {
        out.push(s);
        s *= d;
    }
    out
}

/// Flat offset of `idx` (innermost-first) into a tensor of shape
/// `dims`, stretching length-1 axes.
fn offset_broadcast(dims: &Dims, st: &[usize], idx: &[usize]) -> usize {
    let mut off = 0;
    for (axis, &i) in idx.iter().enumerate() {
        let d = dims.get(axis).copied().unwrap_or(1);
        if d != 1 {
            off += st[axis] * i;
        }
    }
    off
}

fn for_each_index(dims: &Dims, mut f: impl FnMut(&[usize]) -> CalcResult<()>) -> CalcResult<()> {
    let rank = dims.len();
    let mut idx: SmallVec<[usize; MAX_DIMS]> = smallvec![0; rank];
    let total: usize = dims.iter().product();
    for _ in 0..total.max(1) {
        f(&idx)?;
        for axis in 0..rank {
            idx[axis] += 1;
            if idx[axis] < dims[axis] {
                break;
            }
            idx[axis] = 0;
        }
    }
    Ok(())
}

fn to_tensor_operand(ctx: &Ctx, v: Value) -> CalcResult<Rc<Tensor>> {
    match scalar_or_tensor(ctx, v)? {
        Value::Tensor(t) => Ok(t),
        _ => unreachable!(),
    }
}

fn scalar_or_tensor(ctx: &Ctx, v: Value) -> CalcResult<Value> {
    match v {
        Value::Tensor(_) => Ok(v),
        other if other.kind().is_numeric() => scalar_tensor(ctx, other),
        other => Err(CalcError::ty(format!(
            "cannot combine a tensor with {}",
            other.kind()
        ))),
    }
}

fn elementwise2(ctx: &Ctx, op: Op2, a: &Tensor, b: &Tensor) -> CalcResult<Value> {
    let dims = broadcast_dims(&a.dims, &b.dims)?;
    let (sa, sb) = (strides(&a.dims), strides(&b.dims));
    let mut cells = Vec::with_capacity(dims.iter().product::<usize>().max(1));
    for_each_index(&dims, |idx| {
        let ca = a.cells[offset_broadcast(&a.dims, &sa, idx)].clone();
        let cb = b.cells[offset_broadcast(&b.dims, &sb, idx)].clone();
        cells.push(dispatch::op2(ctx, op, ca, cb)?);
        Ok(())
    })?;
    tensor_value(ctx, dims, cells)
}

/* ------------------------ matrix multiply ------------------------ */

/// Matrix product over the last two axes, with batch broadcasting and
/// rank-1 operands lifted to a row (left) or column (right).
fn matmul(ctx: &Ctx, a: &Tensor, b: &Tensor) -> CalcResult<Value> {
    if a.rank() == 0 || b.rank() == 0 {
        return elementwise2(ctx, Op2::Mul, a, b);
    }
    let lift_a = a.rank() == 1;
    let lift_b = b.rank() == 1;
    // row vector: dims [k, 1]; column vector: dims [1, k]
    let ad: Dims = if lift_a {
        smallvec![a.dims[0], 1]
    } else {
        a.dims.clone()
    };
    let bd: Dims = if lift_b {
        smallvec![1, b.dims[0]]
    } else {
        b.dims.clone()
    };
    let k = ad[0];
    if bd[1] != k {
        return Err(CalcError::ty("matrix dimensions do not match"));
    }
    let (h, w) = (ad[1], bd[0]);
    let batch_a: Dims = ad[2..].iter().copied().collect();
    let batch_b: Dims = bd[2..].iter().copied().collect();
    let batch = broadcast_dims(&batch_a, &batch_b)?;
    let (plane_a, plane_b) = (k * h, k * w);
    let (sa, sb) = (strides(&batch_a), strides(&batch_b));
    let mut dims: Dims = smallvec![w, h];
    dims.extend(batch.iter().copied());
    let mut cells = Vec::with_capacity(dims.iter().product::<usize>().max(1));
    for_each_index(&batch, |idx| {
        let oa = offset_broadcast(&batch_a, &sa, idx) * plane_a;
        let ob = offset_broadcast(&batch_b, &sb, idx) * plane_b;
        for r in 0..h {
            for c in 0..w {
                let mut acc = Value::int(0);
                for j in 0..k {
                    let x = a.cells[oa + r * k + j].clone();
                    let y = b.cells[ob + j * w + c].clone();
                    acc = dispatch::add(ctx, acc, dispatch::mul(ctx, x, y)?)?;
                }
                cells.push(acc);
            }
        }
        Ok(())
    })?;
    if lift_a && lift_b {
        // dot product of two vectors collapses to a scalar
        return Ok(cells.into_iter().next().expect("one cell"));
    }
    if lift_a {
        // drop the unit height axis
        let dims: Dims = std::iter::once(w).chain(batch.iter().copied()).collect();
        return tensor_value(ctx, dims, cells);
    }
    if lift_b {
        let dims: Dims = std::iter::once(h).chain(batch.iter().copied()).collect();
        return tensor_value(ctx, dims, cells);
    }
    tensor_value(ctx, dims, cells)
}

pub fn op2(ctx: &Ctx, op: Op2, a: Value, b: Value) -> CalcResult<Value> {
    let a = to_tensor_operand(ctx, a)?;
    let b = to_tensor_operand(ctx, b)?;
    match op {
        Op2::Mul => matmul(ctx, &a, &b),
        Op2::CmpEq => {
            if a.dims != b.dims {
                return Ok(Value::Bool(false));
            }
            let eq = a
                .cells
                .iter()
                .zip(b.cells.iter())
                .all(|(x, y)| dispatch::eq_bool(ctx, x.clone(), y.clone()));
            Ok(Value::Bool(eq))
        }
        Op2::CmpLt | Op2::CmpLe => Err(CalcError::ty("tensors are not ordered")),
        _ => elementwise2(ctx, op, &a, &b),
    }
}

pub fn op1(ctx: &Ctx, op: Op1, v: Value) -> CalcResult<Value> {
    let Value::Tensor(t) = v else { unreachable!() };
    let mut cells = Vec::with_capacity(t.cells.len());
    for c in &t.cells {
        cells.push(dispatch::op1(ctx, op, c.clone())?);
    }
    tensor_value(ctx, t.dims.clone(), cells)
}

/* ----------------------- vector operations ----------------------- */

pub fn transpose(ctx: &Ctx, v: &Tensor) -> CalcResult<Value> {
    match v.rank() {
        1 => {
            // a vector becomes a column matrix
            let n = v.dims[0];
            tensor_value(ctx, smallvec![1, n], v.cells.clone())
        }
        2 => {
            let (w, h) = (v.dims[0], v.dims[1]);
            let mut cells = Vec::with_capacity(v.cells.len());
            for c in 0..w {
                for r in 0..h {
                    cells.push(v.cells[r * w + c].clone());
                }
            }
            tensor_value(ctx, smallvec![h, w], cells)
        }
        _ => Err(CalcError::ty("matrix or vector expected")),
    }
}

pub fn dot_product(ctx: &Ctx, a: &Tensor, b: &Tensor) -> CalcResult<Value> {
    if a.rank() != 1 || b.rank() != 1 || a.dims[0] != b.dims[0] {
        return Err(CalcError::ty("single dimension tensors expected"));
    }
    let mut acc = Value::int(0);
    for (x, y) in a.cells.iter().zip(b.cells.iter()) {
        acc = dispatch::add(ctx, acc, dispatch::mul(ctx, x.clone(), y.clone())?)?;
    }
    Ok(acc)
}

pub fn cross_product(ctx: &Ctx, a: &Tensor, b: &Tensor) -> CalcResult<Value> {
    if a.rank() != 1 || b.rank() != 1 || a.dims[0] != 3 || b.dims[0] != 3 {
        return Err(CalcError::ty("3 dimension tensors expected"));
    }
    let det2 = |i: usize, j: usize| -> CalcResult<Value> {
        dispatch::sub(
            ctx,
            dispatch::mul(ctx, a.cells[i].clone(), b.cells[j].clone())?,
            dispatch::mul(ctx, a.cells[j].clone(), b.cells[i].clone())?,
        )
    };
    let cells = vec![det2(1, 2)?, det2(2, 0)?, det2(0, 1)?];
    tensor_value(ctx, smallvec![3], cells)
}

/* -------------------------- indexing ----------------------------- */

/// One resolved index position: a plain index or a half-open range.
#[derive(Debug, Clone, Copy)]
pub enum AxisSel {
    Single(i64),
    Range(RangeVal),
}

/// Resolve Python-style bounds against an axis length.
pub fn resolve_range(start: Option<i64>, stop: Option<i64>, len: usize) -> (usize, usize) {
    let len = len as i64;
    let fix = |i: i64| -> i64 {
        let i = if i < 0 { i + len } else { i };
        i.clamp(0, len)
    };
    let lo = fix(start.unwrap_or(0));
    let hi = fix(stop.unwrap_or(len)).max(lo);
    (lo as usize, hi as usize)
}

fn resolve_single(i: i64, len: usize) -> CalcResult<usize> {
    let n = len as i64;
    let j = if i < 0 { i + n } else { i };
    if j < 0 || j >= n {
        return Err(CalcError::range("index out of bounds"));
    }
    Ok(j as usize)
}

struct Gather {
    /// Per input axis, outermost first: (offset, kept length or None).
    plan: Vec<(usize, Option<usize>)>,
    out_dims_outer: Vec<usize>,
}

fn plan_gather(t: &Tensor, sels: &[AxisSel]) -> CalcResult<Gather> {
    let rank = t.rank();
    if sels.len() > rank {
        return Err(CalcError::range("too many indices"));
    }
    let mut plan = Vec::with_capacity(rank);
    let mut out_dims_outer = Vec::new();
    for axis_outer in 0..rank {
        let len = t.dims[rank - 1 - axis_outer];
        match sels.get(axis_outer) {
            Some(AxisSel::Single(i)) => {
                plan.push((resolve_single(*i, len)?, None));
            }
            Some(AxisSel::Range(r)) => {
                let (lo, hi) = resolve_range(r.start, r.stop, len);
                plan.push((lo, Some(hi - lo)));
                out_dims_outer.push(hi - lo);
            }
            None => {
                plan.push((0, Some(len)));
                out_dims_outer.push(len);
            }
        }
    }
    Ok(Gather {
        plan,
        out_dims_outer,
    })
}

fn input_offset(t: &Tensor, plan: &[(usize, Option<usize>)], out_idx: &[usize]) -> usize {
    let rank = t.rank();
    let mut off = 0;
    let mut k = 0;
    for (axis_outer, (base, kept)) in plan.iter().enumerate() {
        let stride: usize = t.dims[..rank - 1 - axis_outer].iter().product();
        let i = match kept {
            Some(_) => {
                let i = out_idx[k];
                k += 1;
                base + i
            }
            None => *base,
        };
        off += i * stride;
    }
    off
}

/// Read `t[sels]`; a fully-indexed access returns the cell.
pub fn get_index(ctx: &Ctx, t: &Tensor, sels: &[AxisSel]) -> CalcResult<Value> {
    let g = plan_gather(t, sels)?;
    if g.out_dims_outer.is_empty() {
        return Ok(t.cells[input_offset(t, &g.plan, &[])].clone());
    }
    let mut cells = Vec::new();
    let dims: Dims = g.out_dims_outer.iter().rev().copied().collect();
    let out_outer: Dims = g.out_dims_outer.iter().copied().collect();
    iterate_outer(&out_outer, |idx| {
        cells.push(t.cells[input_offset(t, &g.plan, idx)].clone());
        Ok(())
    })?;
    tensor_value(ctx, dims, cells)
}

/// Row-major (outermost varies slowest) iteration.
fn iterate_outer(
    dims_outer: &Dims,
    mut f: impl FnMut(&[usize]) -> CalcResult<()>,
) -> CalcResult<()> {
    let rank = dims_outer.len();
    let mut idx: SmallVec<[usize; MAX_DIMS]> = smallvec![0; rank];
    let total: usize = dims_outer.iter().product();
    for _ in 0..total.max(1) {
        f(&idx)?;
        for axis in (0..rank).rev() {
            idx[axis] += 1;
            if idx[axis] < dims_outer[axis] {
                break;
            }
            idx[axis] = 0;
        }
    }
    Ok(())
}

/// Store into `t[sels]`. Slice targets take a tensor of the selected
/// shape; fully-indexed targets take a scalar.
pub fn set_index(ctx: &Ctx, t: &Rc<Tensor>, sels: &[AxisSel], value: Value) -> CalcResult<Value> {
    let g = plan_gather(t, sels)?;
    let mut new = (**t).clone();
    if g.out_dims_outer.is_empty() {
        let off = input_offset(&new, &g.plan, &[]);
        new.cells[off] = value;
    } else {
        let Value::Tensor(src) = &value else {
            return Err(CalcError::ty("tensor value expected for slice assignment"));
        };
        let want: Dims = g.out_dims_outer.iter().rev().copied().collect();
        if src.dims != want {
            return Err(CalcError::ty("slice assignment shape mismatch"));
        }
        let out_outer: Dims = g.out_dims_outer.iter().copied().collect();
        let mut k = 0;
        iterate_outer(&out_outer, |idx| {
            let off = input_offset(&new, &g.plan, idx);
            new.cells[off] = src.cells[k].clone();
            k += 1;
            Ok(())
        })?;
    }
    // re-promote, the stored value may widen the element type
    tensor_value(ctx, new.dims, new.cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    fn show(c: &Ctx, v: &Value) -> String {
        format_value(c, v)
    }

    fn vec2(ctx: &Ctx, a: i64, b: i64) -> Value {
        from_items(ctx, vec![Value::int(a), Value::int(b)]).unwrap()
    }

    fn mat22(ctx: &Ctx, rows: [[i64; 2]; 2]) -> Value {
        let r0 = from_items(ctx, rows[0].iter().map(|x| Value::int(*x)).collect()).unwrap();
        let r1 = from_items(ctx, rows[1].iter().map(|x| Value::int(*x)).collect()).unwrap();
        from_items(ctx, vec![r0, r1]).unwrap()
    }

    #[test]
    fn literal_cells_promote() {
        let c = Ctx::new();
        let t = from_items(
            &c,
            vec![
                Value::int(1),
                Value::Dec(abax_num::Dec::from_i64(2)),
            ],
        )
        .unwrap();
        assert_eq!(show(&c, &t), "[1.0, 2.0]");
    }

    #[test]
    fn broadcast_row_and_column() {
        let c = Ctx::new();
        // [1,2] + [[2],[3]] = [[3,4],[4,5]]
        let row = vec2(&c, 1, 2);
        let col = {
            let r0 = from_items(&c, vec![Value::int(2)]).unwrap();
            let r1 = from_items(&c, vec![Value::int(3)]).unwrap();
            from_items(&c, vec![r0, r1]).unwrap()
        };
        let s = dispatch::add(&c, row, col).unwrap();
        assert_eq!(show(&c, &s), "[[3, 4], [4, 5]]");
    }

    #[test]
    fn matmul_and_power() {
        let c = Ctx::new();
        let m = mat22(&c, [[1, 2], [3, 4]]);
        let v = {
            let r0 = from_items(&c, vec![Value::int(3)]).unwrap();
            let r1 = from_items(&c, vec![Value::int(4)]).unwrap();
            from_items(&c, vec![r0, r1]).unwrap()
        };
        let p = dispatch::mul(&c, m.clone(), v).unwrap();
        assert_eq!(show(&c, &p), "[[11], [25]]");
        let cube = dispatch::op2(&c, Op2::Pow, m, Value::int(3)).unwrap();
        assert_eq!(show(&c, &cube), "[[37, 54], [81, 118]]");
    }

    #[test]
    fn scalar_broadcast_matches_cellwise() {
        let c = Ctx::new();
        let t = vec2(&c, 7, 5);
        let m = dispatch::modulo(&c, t, Value::int(2)).unwrap();
        assert_eq!(show(&c, &m), "[1, 1]");
    }

    #[test]
    fn transpose_vector_makes_column() {
        let c = Ctx::new();
        let v = from_items(&c, vec![Value::int(1), Value::int(2), Value::int(3)]).unwrap();
        let Value::Tensor(t) = &v else { unreachable!() };
        let tr = transpose(&c, t).unwrap();
        assert_eq!(show(&c, &tr), "[[1], [2], [3]]");
    }

    #[test]
    fn cross_product_of_unit_axes() {
        let c = Ctx::new();
        let a = from_items(&c, vec![Value::int(1), Value::int(2), Value::int(3)]).unwrap();
        let b = from_items(&c, vec![Value::int(3), Value::int(-4), Value::int(-7)]).unwrap();
        let (Value::Tensor(ta), Value::Tensor(tb)) = (&a, &b) else {
            unreachable!()
        };
        let dp = dot_product(&c, ta, tb).unwrap();
        assert!(dp.eq_int(-26));
        let cp = cross_product(&c, ta, tb).unwrap();
        assert_eq!(show(&c, &cp), "[-2, 16, -10]");
    }

    #[test]
    fn slicing_and_multi_axis_indexing() {
        let c = Ctx::new();
        // a = [[1,2,3],[4,5,6]]
        let a = {
            let r0 = from_items(&c, vec![Value::int(1), Value::int(2), Value::int(3)]).unwrap();
            let r1 = from_items(&c, vec![Value::int(4), Value::int(5), Value::int(6)]).unwrap();
            from_items(&c, vec![r0, r1]).unwrap()
        };
        let Value::Tensor(t) = &a else { unreachable!() };
        let v = get_index(&c, t, &[AxisSel::Single(1), AxisSel::Single(2)]).unwrap();
        assert!(v.eq_int(6));
        let row = get_index(&c, t, &[AxisSel::Single(1)]).unwrap();
        assert_eq!(show(&c, &row), "[4, 5, 6]");
        let col = get_index(&c, t, &[AxisSel::Range(RangeVal { start: None, stop: None }), AxisSel::Single(1)]).unwrap();
        assert_eq!(show(&c, &col), "[2, 5]");
        let blk = get_index(
            &c,
            t,
            &[AxisSel::Range(RangeVal { start: Some(0), stop: Some(2) }), AxisSel::Range(RangeVal { start: Some(1), stop: Some(3) })],
        )
        .unwrap();
        assert_eq!(show(&c, &blk), "[[2, 3], [5, 6]]");
    }

    #[test]
    fn slice_assignment_with_cow() {
        let c = Ctx::new();
        let a = {
            let r0 = from_items(&c, vec![Value::int(1), Value::int(2), Value::int(3)]).unwrap();
            let r1 = from_items(&c, vec![Value::int(4), Value::int(5), Value::int(6)]).unwrap();
            from_items(&c, vec![r0, r1]).unwrap()
        };
        let Value::Tensor(t) = &a else { unreachable!() };
        let repl = {
            let r0 = from_items(&c, vec![Value::int(1), Value::int(2)]).unwrap();
            let r1 = from_items(&c, vec![Value::int(3), Value::int(4)]).unwrap();
            from_items(&c, vec![r0, r1]).unwrap()
        };
        let updated = set_index(
            &c,
            t,
            &[AxisSel::Range(RangeVal { start: Some(0), stop: Some(2) }), AxisSel::Range(RangeVal { start: Some(1), stop: Some(3) })],
            repl,
        )
        .unwrap();
        assert_eq!(show(&c, &updated), "[[1, 1, 2], [4, 3, 4]]");
        // the original tensor is untouched
        assert_eq!(show(&c, &a), "[[1, 2, 3], [4, 5, 6]]");
    }
}
