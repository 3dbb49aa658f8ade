//! Validation context and value helpers shared by the keyword validators
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Root JSON pointer used for top-level values
pub const ROOT_PATH: &str = "/";

/// Location of the value currently being validated
///
/// Contexts are never mutated: descending into a property or an array index
/// derives a new context with a longer JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationContext {
    path: String,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    /// Create a context positioned at the root (`/`)
    pub fn new() -> Self {
        Self {
            path: ROOT_PATH.to_string(),
        }
    }

    /// Create a context positioned at an arbitrary pointer
    pub fn at(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.is_empty() {
            Self::new()
        } else {
            Self { path }
        }
    }

    /// Current JSON pointer
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this context points at the root value
    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Create a child context for an object property
    pub fn with_property(&self, name: &str) -> Self {
        self.child(&escape_segment(name))
    }

    /// Create a child context for array index
    pub fn with_index(&self, index: usize) -> Self {
        self.child(&index.to_string())
    }

    fn child(&self, segment: &str) -> Self {
        let path = if self.is_root() {
            format!("/{}", segment)
        } else {
            format!("{}/{}", self.path, segment)
        };
        Self { path }
    }
}

/// Escape a property name as a JSON pointer segment
pub fn escape_segment(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

/// Undo [`escape_segment`]
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Helper functions for comparing JSON values the way JSON Schema does
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Whether a number has no fractional part (`1.0` counts as an integer)
    pub fn is_integer(number: &Number) -> bool {
        if number.is_i64() || number.is_u64() {
            return true;
        }
        number
            .as_f64()
            .map(|f| f.is_finite() && f.fract() == 0.0)
            .unwrap_or(false)
    }

    /// Numeric ordering, exact for integers and by `f64` otherwise
    pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            return Some(x.cmp(&y));
        }
        if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
            return Some(x.cmp(&y));
        }
        // Mixed signs outside i64: a negative i64 is below any u64.
        if let (Some(x), Some(_)) = (a.as_i64(), b.as_u64()) {
            if x < 0 {
                return Some(Ordering::Less);
            }
        }
        if let (Some(_), Some(y)) = (a.as_u64(), b.as_i64()) {
            if y < 0 {
                return Some(Ordering::Greater);
            }
        }
        a.as_f64()?.partial_cmp(&b.as_f64()?)
    }

    /// Numeric equality where `1` equals `1.0`
    pub fn numbers_equal(a: &Number, b: &Number) -> bool {
        Self::compare_numbers(a, b) == Some(Ordering::Equal)
    }

    /// Structural JSON equality with numeric comparison by value
    pub fn json_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => Self::numbers_equal(x, y),
            (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| Self::json_equal(x, y))
            }
            (Value::Object(xs), Value::Object(ys)) => Self::objects_equal(xs, ys),
            _ => a == b,
        }
    }

    fn objects_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
        a.len() == b.len()
            && a.iter()
                .all(|(key, x)| b.get(key).is_some_and(|y| Self::json_equal(x, y)))
    }

    /// First pair of structurally equal items, if any
    pub fn find_duplicate(items: &[Value]) -> Option<(usize, usize)> {
        for (i, a) in items.iter().enumerate() {
            for (offset, b) in items[i + 1..].iter().enumerate() {
                if Self::json_equal(a, b) {
                    return Some((i, i + 1 + offset));
                }
            }
        }
        None
    }

    /// Whether `value` is a multiple of `divisor`, tolerating float error
    pub fn is_multiple_of(value: &Number, divisor: &Number) -> bool {
        if let (Some(v), Some(d)) = (value.as_i64(), divisor.as_i64()) {
            if d != 0 {
                // Only i64::MIN % -1 overflows, and that is a multiple.
                return v.checked_rem(d).map_or(true, |r| r == 0);
            }
        }
        let (Some(v), Some(d)) = (value.as_f64(), divisor.as_f64()) else {
            return false;
        };
        if d == 0.0 {
            return false;
        }
        let remainder = (v % d).abs();
        let tolerance = MULTIPLE_OF_EPSILON * d.abs().max(1.0);
        remainder < tolerance || (d.abs() - remainder) < tolerance
    }

    /// Length of a string in Unicode scalar values
    pub fn string_length(text: &str) -> usize {
        text.chars().count()
    }
}

const MULTIPLE_OF_EPSILON: f64 = 1e-9;
