//! Strings, heterogeneous arrays and ranges.
//!
//! String indexing counts code points, not bytes; both strings and
//! arrays take Python-style negative indices and half-open slices.

use crate::tensor::resolve_range;
use crate::value::Value;
use abax_common::{CalcError, CalcResult};
use std::rc::Rc;

pub fn string_concat(a: Value, b: Value) -> CalcResult<Value> {
    let (Value::Str(a), Value::Str(b)) = (&a, &b) else {
        return Err(CalcError::ty("string expected"));
    };
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    Ok(Value::str(s))
}

pub fn string_len(s: &str) -> i64 {
    s.chars().count() as i64
}

/// Character from a code point.
pub fn chr(code: i64) -> CalcResult<Value> {
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| CalcError::range("invalid character code"))?;
    Ok(Value::str(c.to_string()))
}

/// Code point of the first character.
pub fn ord(s: &str) -> CalcResult<Value> {
    match s.chars().next() {
        Some(c) => Ok(Value::int(c as i64)),
        None => Err(CalcError::range("empty string")),
    }
}

fn fix_index(i: i64, len: usize) -> CalcResult<usize> {
    let n = len as i64;
    let j = if i < 0 { i + n } else { i };
    if j < 0 || j >= n {
        return Err(CalcError::range("index out of bounds"));
    }
    Ok(j as usize)
}

pub fn string_index(s: &str, i: i64) -> CalcResult<Value> {
    let len = s.chars().count();
    let i = fix_index(i, len)?;
    let c = s.chars().nth(i).expect("index checked");
    Ok(Value::str(c.to_string()))
}

pub fn string_slice(s: &str, start: Option<i64>, stop: Option<i64>) -> CalcResult<Value> {
    let len = s.chars().count();
    let (lo, hi) = resolve_range(start, stop, len);
    let out: String = s.chars().skip(lo).take(hi - lo).collect();
    Ok(Value::str(out))
}

pub fn array_index(items: &[Value], i: i64) -> CalcResult<Value> {
    let i = fix_index(i, items.len())?;
    Ok(items[i].clone())
}

pub fn array_slice(items: &[Value], start: Option<i64>, stop: Option<i64>) -> CalcResult<Value> {
    let (lo, hi) = resolve_range(start, stop, items.len());
    Ok(Value::Array(Rc::new(items[lo..hi].to_vec())))
}

/// Indexed store; clones the backing storage only when shared.
pub fn array_set(arr: &mut Rc<Vec<Value>>, i: i64, value: Value) -> CalcResult<()> {
    let i = fix_index(i, arr.len())?;
    Rc::make_mut(arr)[i] = value;
    Ok(())
}

pub fn array_set_slice(
    arr: &mut Rc<Vec<Value>>,
    start: Option<i64>,
    stop: Option<i64>,
    value: Value,
) -> CalcResult<()> {
    let (lo, hi) = resolve_range(start, stop, arr.len());
    let Value::Array(src) = &value else {
        return Err(CalcError::ty("array value expected for slice assignment"));
    };
    if src.len() != hi - lo {
        return Err(CalcError::range("slice assignment length mismatch"));
    }
    let cells = Rc::make_mut(arr);
    cells[lo..hi].clone_from_slice(src);
    Ok(())
}

/// JSON-style escaping; printable characters (ASCII and beyond) stay
/// raw, controls become `\u` escapes.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_point_indexing() {
        assert_eq!(string_len("ab\u{20ac}d"), 4);
        let v = string_index("a\u{20ac}cd", 1).unwrap();
        assert!(matches!(&v, Value::Str(s) if &**s == "\u{20ac}"));
        let v = string_slice("a\u{20ac}cd", Some(1), Some(3)).unwrap();
        assert!(matches!(&v, Value::Str(s) if &**s == "\u{20ac}c"));
        let v = string_slice("a\u{20ac}cd", None, Some(-1)).unwrap();
        assert!(matches!(&v, Value::Str(s) if &**s == "a\u{20ac}c"));
    }

    #[test]
    fn out_of_bounds_is_a_range_error() {
        assert!(string_index("abc", 10).is_err());
        assert!(string_index("abc", -4).is_err());
        assert!(array_index(&[Value::int(1)], 1).is_err());
    }

    #[test]
    fn chr_ord_round_trip() {
        let v = chr(0x20ac).unwrap();
        assert!(matches!(&v, Value::Str(s) if &**s == "\u{20ac}"));
        assert!(ord("\u{20ac}").unwrap().eq_int(8364));
    }

    #[test]
    fn cow_preserves_sharing() {
        let original = Rc::new(vec![Value::int(1), Value::int(2)]);
        let mut shared = original.clone();
        array_set(&mut shared, 0, Value::int(9)).unwrap();
        assert!(original[0].eq_int(1));
        assert!(shared[0].eq_int(9));
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_string("\u{1}"), "\"\\u0001\"");
        assert_eq!(escape_string("\u{20ac}"), "\"\u{20ac}\"");
    }
}
