//! Lenient extraction helpers for arbitrary upstream payloads
//!
//! Catalog rows and pricing echoes arrive with no shape guarantees: a price
//! may be a JSON number, a numeric string, missing, or garbage. Every helper
//! here degrades to `None` instead of raising, so callers can walk an ordered
//! candidate list and take the first usable value.

use serde_json::Value;

/// Coerce a JSON value into a finite amount.
///
/// Accepts numbers and numeric strings (trimmed). Anything else, including
/// NaN and infinities, is treated as absent.
pub fn amount_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Parse a user- or upstream-supplied string into a finite amount.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a JSON value into a non-empty trimmed string.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// First strictly positive amount in an ordered candidate list.
pub fn first_positive<I>(candidates: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|v| v.is_finite() && *v > 0.0)
}

/// First non-negative amount in an ordered candidate list.
///
/// Used where an explicit zero is meaningful (e.g. a backend that reports
/// `tax: 0` has answered the question, not skipped it).
pub fn first_non_negative<I>(candidates: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|v| v.is_finite() && *v >= 0.0)
}

/// First non-empty string in an ordered candidate list.
pub fn first_non_empty<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.as_ref().trim().to_string())
        .find(|s| !s.is_empty())
}

/// Walk an object's fields in candidate order and take the first usable amount.
pub fn pick_amount(payload: &Value, candidates: &[&str]) -> Option<f64> {
    let object = payload.as_object()?;
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(amount_of)
}

/// Walk an object's fields in candidate order and take the first usable string.
pub fn pick_text(payload: &Value, candidates: &[&str]) -> Option<String> {
    let object = payload.as_object()?;
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(text_of)
}
