//! Structural equality between a hosted value and its draft.
//!
//! # Rules
//!
//! - Equal primitives are equal. Numbers compare by numeric value, so `1` and
//!   `1.0` match.
//! - A primitive never equals a composite (object or array).
//! - Two composites are equal iff they have the same number of keys and every
//!   key of the left operand compares equal to the same key on the right.
//!   Arrays expose their indices as keys; two arrays under the same key must
//!   also have the same length and match position by position.
//! - Key *sets* are not compared, only key *counts*. A key present on the left
//!   and absent on the right is unequal, which is what catches mismatched names.
//!
//! Total and side-effect free over any pair of JSON values.

use std::borrow::Cow;

use serde_json::{Map, Value};

pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    if primitive_eq(a, b) {
        return true;
    }
    match (Composite::of(a), Composite::of(b)) {
        (Some(ca), Some(cb)) => composite_eq(ca, cb),
        _ => false,
    }
}

/// [`structurally_equal`] for two JSON objects, without wrapping them in `Value`.
pub(crate) fn objects_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    composite_eq(Composite::Object(a), Composite::Object(b))
}

fn primitive_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(fx), Some(fy)) if fx == fy)
        }
        _ => false,
    }
}

#[derive(Clone, Copy)]
enum Composite<'a> {
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
}

impl<'a> Composite<'a> {
    fn of(v: &'a Value) -> Option<Self> {
        match v {
            Value::Object(m) => Some(Composite::Object(m)),
            Value::Array(items) => Some(Composite::Array(items)),
            _ => None,
        }
    }

    fn len(self) -> usize {
        match self {
            Composite::Object(m) => m.len(),
            Composite::Array(items) => items.len(),
        }
    }

    fn keys(self) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
        match self {
            Composite::Object(m) => Box::new(m.keys().map(|k| Cow::Borrowed(k.as_str()))),
            Composite::Array(items) => Box::new((0..items.len()).map(|i| Cow::Owned(i.to_string()))),
        }
    }

    fn member(self, key: &str) -> Option<&'a Value> {
        match self {
            Composite::Object(m) => m.get(key),
            Composite::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        }
    }
}

fn composite_eq(a: Composite<'_>, b: Composite<'_>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.keys().all(|key| match (a.member(&key), b.member(&key)) {
        (Some(Value::Array(xs)), Some(Value::Array(ys))) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Some(x), Some(y)) => structurally_equal(x, y),
        // Absent on the right: a present value never equals "missing".
        _ => false,
    })
}
