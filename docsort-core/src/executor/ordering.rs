//! Cross-type value ordering for the in-memory executor.
//!
//! Mirrors the aggregation engine's comparison order:
//! missing = null < numbers < strings < objects < arrays < booleans < dates.
//! Dates use the extended-JSON form `{"$date": <RFC 3339 string | millis>}`.
//! Arrays compare element-wise rather than by their extreme element.

use chrono::DateTime;
use ordered_float::OrderedFloat;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Compares two possibly-missing values. Missing and `null` are equal and
/// sort first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    let (rank_a, rank_b) = (type_rank(a), type_rank(b));
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (a, b) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => compare_arrays(a, b),
        (Value::Object(a), Value::Object(b)) => match (date_millis(a), date_millis(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => compare_objects(a, b),
        },
        _ => Ordering::Equal,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Object(map) if date_millis(map).is_some() => 9,
        Value::Object(_) => 4,
        Value::Array(_) => 5,
        Value::Bool(_) => 8,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let a = OrderedFloat(a.as_f64().unwrap_or(f64::NAN));
            let b = OrderedFloat(b.as_f64().unwrap_or(f64::NAN));
            a.cmp(&b)
        }
    }
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(a, b)| compare_values(Some(a), Some(b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    a.iter()
        .zip(b)
        .map(|((key_a, value_a), (key_b, value_b))| {
            compare_present(value_a, value_b).then_with(|| key_a.cmp(key_b))
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Milliseconds since the epoch for an extended-JSON date object.
pub fn date_millis(map: &Map<String, Value>) -> Option<i64> {
    if map.len() != 1 {
        return None;
    }
    match map.get("$date")? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|date| date.timestamp_millis()),
        Value::Number(millis) => millis.as_i64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmp(a: Value, b: Value) -> Ordering {
        compare_values(Some(&a), Some(&b))
    }

    #[test]
    fn missing_equals_null_and_sorts_first() {
        assert_eq!(compare_values(None, Some(&Value::Null)), Ordering::Equal);
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("")), None), Ordering::Greater);
    }

    #[test]
    fn type_classes_order() {
        assert_eq!(cmp(json!(1000), json!("a")), Ordering::Less);
        assert_eq!(cmp(json!("z"), json!({ "a": 1 })), Ordering::Less);
        assert_eq!(cmp(json!([1]), json!(false)), Ordering::Less);
        assert_eq!(
            cmp(json!(true), json!({ "$date": "2020-01-01T00:00:00Z" })),
            Ordering::Less
        );
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(cmp(json!(2), json!(2.5)), Ordering::Less);
        assert_eq!(cmp(json!(3.0), json!(3)), Ordering::Equal);
        assert_eq!(cmp(json!(-1), json!(-2)), Ordering::Greater);
    }

    #[test]
    fn dates_compare_by_instant() {
        let earlier = json!({ "$date": "2024-01-01T10:00:00+02:00" });
        let later = json!({ "$date": "2024-01-01T09:00:00Z" });
        assert_eq!(cmp(earlier, later), Ordering::Less);
        assert_eq!(
            cmp(json!({ "$date": 0 }), json!({ "$date": "1970-01-01T00:00:00Z" })),
            Ordering::Equal
        );
    }

    #[test]
    fn strings_are_binary_compared() {
        assert_eq!(cmp(json!("Banana"), json!("apple")), Ordering::Less);
    }
}
