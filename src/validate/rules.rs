//! Reusable field rules shared by the document validators

use crate::core::{FieldMap, FieldValue};
use crate::validate::Finding;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap());

/// `my-skill`, `skill-v2`, `a`; not `MySkill`, `my_skill`, `-x`, `x-`, `1-x`, `a--b`
pub fn is_kebab_case(name: &str) -> bool {
    KEBAB_CASE.is_match(name)
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Text of a non-blank field, for messages and comparisons.
///
/// Lists render as `[a, b]` so they never accidentally match a scalar rule.
pub fn field_text(fields: &FieldMap, key: &str) -> Option<String> {
    match fields.get(key)? {
        v if v.is_blank() => None,
        FieldValue::Str(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One error per required field that is absent or blank
pub fn require(fields: &FieldMap, required: &[&str]) -> Vec<Finding> {
    required
        .iter()
        .filter(|key| !fields.has_value(key))
        .map(|key| Finding::error(format!("missing required field '{}'", key)))
        .collect()
}

/// Error when a present field is not one of `allowed`
pub fn one_of(fields: &FieldMap, key: &str, allowed: &[&str]) -> Option<Finding> {
    let value = field_text(fields, key)?;
    if allowed.contains(&value.as_str()) {
        return None;
    }
    let mut expected = allowed.to_vec();
    expected.sort_unstable();
    Some(Finding::error(format!(
        "invalid {} '{}' (expected one of: {})",
        key,
        value,
        expected.join(", ")
    )))
}

/// Error when a present field is not a `YYYY-MM-DD` date. `label` names it in the message.
pub fn iso_date(fields: &FieldMap, key: &str, label: &str) -> Option<Finding> {
    let value = field_text(fields, key)?;
    if parse_iso_date(&value).is_some() {
        return None;
    }
    Some(Finding::error(format!(
        "invalid {} '{}' (expected YYYY-MM-DD)",
        label, value
    )))
}
