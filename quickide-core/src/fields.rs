//! # Form field sets
//!
//! A [`FieldSet`] is the flat, immutable collection of values a form collects
//! before a document is generated. Values arrive either typed (from a JSON
//! form file) or as raw text (from the command line); the typed accessors
//! coerce on read so both sources behave the same.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat named values collected by one form.
///
/// # Example
///
/// ```rust
/// use quickide_core::fields::FieldSet;
///
/// let fields = FieldSet::new()
///     .with("identifier", "demo:ruby")
///     .with("max_stack_size", 64)
///     .with("hand_equipped", true);
///
/// assert_eq!(fields.text("identifier").as_deref(), Some("demo:ruby"));
/// assert_eq!(fields.optional_int("max_stack_size").unwrap(), Some(64));
/// assert!(fields.flag("hand_equipped"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    values: BTreeMap<String, FieldValue>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this set with one more value.
    pub fn with<K: Into<String>, V: Into<FieldValue>>(mut self, name: K, value: V) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Return a copy of this set with `value` only if `name` is still unset.
    pub fn with_default<K: Into<String>, V: Into<FieldValue>>(mut self, name: K, value: V) -> Self {
        self.values.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    /// Merge another set over this one; values in `other` win.
    pub fn merged(mut self, other: FieldSet) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Parse a `name=value` assignment as typed on the command line.
    ///
    /// The value is kept as text; accessors coerce it on read.
    pub fn parse_assignment(assignment: &str) -> Result<(String, FieldValue)> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            Error::validation(
                assignment,
                "expected an assignment of the form name=value",
            )
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation(assignment, "field name is empty"));
        }
        Ok((name.to_string(), FieldValue::Text(value.to_string())))
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Trimmed text of a field; `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        let rendered = self.values.get(name)?.to_string();
        let trimmed = rendered.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Names from `required` that are absent or blank, in the given order.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.text(name).is_none())
            .collect()
    }

    /// Fail with a validation error naming every missing required field.
    pub fn require(&self, required: &[&str]) -> Result<()> {
        let missing = self.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(
                missing.join(", "),
                "required field is missing",
            ))
        }
    }

    /// Text of a required field.
    pub fn require_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| Error::validation(name, "required field is missing"))
    }

    /// Boolean toggle; absent, blank or unrecognised values read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(FieldValue::Bool(value)) => *value,
            Some(FieldValue::Integer(value)) => *value != 0,
            Some(FieldValue::Float(value)) => *value != 0.0,
            Some(FieldValue::Text(value)) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
            None => false,
        }
    }

    /// Optional integer; blank reads as `None`, malformed input is an error.
    pub fn optional_int(&self, name: &str) -> Result<Option<i64>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(FieldValue::Integer(value)) => Ok(Some(*value)),
            Some(FieldValue::Float(value)) if value.fract() == 0.0 => Ok(Some(*value as i64)),
            Some(_) => match self.text(name) {
                None => Ok(None),
                Some(text) => text.parse::<i64>().map(Some).map_err(|_| {
                    Error::validation(name, format!("'{}' is not a whole number", text))
                }),
            },
        }
    }

    /// Optional float; blank reads as `None`, malformed input is an error.
    pub fn optional_float(&self, name: &str) -> Result<Option<f64>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(FieldValue::Integer(value)) => Ok(Some(*value as f64)),
            Some(FieldValue::Float(value)) => Ok(Some(*value)),
            Some(_) => match self.text(name) {
                None => Ok(None),
                Some(text) => match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Some(value)),
                    _ => Err(Error::validation(
                        name,
                        format!("'{}' is not a number", text),
                    )),
                },
            },
        }
    }

    /// Integer with a documented default used for blank or malformed input.
    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.optional_int(name).ok().flatten().unwrap_or(default)
    }

    /// Float with a documented default used for blank or malformed input.
    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.optional_float(name).ok().flatten().unwrap_or(default)
    }

    /// Enumerated choice; blank reads as `default`, anything outside `allowed` is an error.
    pub fn choice(&self, name: &str, allowed: &[&str], default: &str) -> Result<String> {
        match self.text(name) {
            None => Ok(default.to_string()),
            Some(value) if allowed.contains(&value.as_str()) => Ok(value),
            Some(value) => Err(Error::validation(
                name,
                format!("'{}' is not one of: {}", value, allowed.join(", ")),
            )),
        }
    }
}

impl FromIterator<(String, FieldValue)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_and_blank_is_none() {
        let fields = FieldSet::new().with("name", "  Ruby  ").with("blank", "   ");
        assert_eq!(fields.text("name").as_deref(), Some("Ruby"));
        assert_eq!(fields.text("blank"), None);
        assert_eq!(fields.text("absent"), None);
    }

    #[test]
    fn test_missing_names_every_field() {
        let fields = FieldSet::new().with("identifier", "demo:ruby");
        let err = fields.require(&["identifier", "display_name"]).unwrap_err();
        assert_eq!(err.field(), Some("display_name"));

        let err = FieldSet::new()
            .require(&["identifier", "display_name"])
            .unwrap_err();
        assert_eq!(err.field(), Some("identifier, display_name"));
    }

    #[test]
    fn test_numeric_coercion_from_text() {
        let fields = FieldSet::new()
            .with("count", "12")
            .with("speed", "0.3")
            .with("bad", "twelve")
            .with("empty", "");
        assert_eq!(fields.optional_int("count").unwrap(), Some(12));
        assert_eq!(fields.optional_float("speed").unwrap(), Some(0.3));
        assert_eq!(fields.optional_int("empty").unwrap(), None);
        assert!(fields.optional_int("bad").unwrap_err().is_validation());
    }

    #[test]
    fn test_defaults_apply_to_blank_and_malformed() {
        let fields = FieldSet::new().with("hardness", "hard").with("resistance", "");
        assert_eq!(fields.float_or("hardness", 1.5), 1.5);
        assert_eq!(fields.float_or("resistance", 10.0), 10.0);
        assert_eq!(fields.int_or("health", 20), 20);
    }

    #[test]
    fn test_flags() {
        let fields = FieldSet::new()
            .with("a", true)
            .with("b", "yes")
            .with("c", "false")
            .with("d", 0);
        assert!(fields.flag("a"));
        assert!(fields.flag("b"));
        assert!(!fields.flag("c"));
        assert!(!fields.flag("d"));
        assert!(!fields.flag("absent"));
    }

    #[test]
    fn test_choice() {
        let fields = FieldSet::new().with("render_method", "blend").with("category", "weird");
        let allowed = ["opaque", "alpha_test", "blend"];
        assert_eq!(fields.choice("render_method", &allowed, "opaque").unwrap(), "blend");
        assert_eq!(fields.choice("absent", &allowed, "opaque").unwrap(), "opaque");
        assert!(fields.choice("category", &["items"], "items").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let (name, value) = FieldSet::parse_assignment("display_name=Ruby = Red").unwrap();
        assert_eq!(name, "display_name");
        assert_eq!(value, FieldValue::Text("Ruby = Red".to_string()));
        assert!(FieldSet::parse_assignment("novalue").is_err());
        assert!(FieldSet::parse_assignment("=x").is_err());
    }

    #[test]
    fn test_deserialize_typed_form() {
        let fields: FieldSet = serde_json::from_str(
            r#"{"identifier": "demo:ruby", "max_stack_size": 16, "hand_equipped": true, "speed": 0.5}"#,
        )
        .unwrap();
        assert_eq!(fields.get("max_stack_size"), Some(&FieldValue::Integer(16)));
        assert_eq!(fields.get("speed"), Some(&FieldValue::Float(0.5)));
        assert!(fields.flag("hand_equipped"));
    }

    #[test]
    fn test_with_default_keeps_existing() {
        let fields = FieldSet::new()
            .with("namespace", "demo")
            .with_default("namespace", "wiki")
            .with_default("output", "demo:ruby");
        assert_eq!(fields.text("namespace").as_deref(), Some("demo"));
        assert_eq!(fields.text("output").as_deref(), Some("demo:ruby"));
    }
}
