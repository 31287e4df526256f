//! Reading coordinates out of host documents.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::cluster::Point;
use crate::config::ClusteringConfig;

// Signed decimal, no exponent.
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("valid decimal pattern"));

/// A stored field value, numeric or string-encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Numeric value, parsing text that looks like a signed decimal.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Number(n) => Some(n),
            FieldValue::Text(s) => {
                let s = s.trim();
                if DECIMAL.is_match(s) {
                    s.parse().ok()
                } else {
                    None
                }
            }
        }
    }

    /// Value rendered as text.
    pub fn to_text(&self) -> String {
        match *self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.to_owned(),
        }
    }
}

/// Named field access on a candidate document.
pub trait FieldSource {
    /// Value of field `name`, or `None` when unset.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Field `name` rendered as text, or `None` when unset.
    ///
    /// Sources holding exact numbers should override this so that integers
    /// beyond `f64` precision keep every digit.
    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).map(|v| match v {
            FieldValue::Text(s) => Cow::Borrowed(s),
            number => Cow::Owned(number.to_text()),
        })
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).field_text(name)
    }
}

impl FieldSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::Text(s)),
            _ => None,
        }
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s)),
            _ => None,
        }
    }
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).map(|s| FieldValue::Text(s))
    }
}

/// Build a [`Point`] from a document, or `None` if it has no usable location.
///
/// A document is skipped when latitude or longitude is missing, does not look
/// like a signed decimal, or is not finite. A missing identifier yields an
/// empty key.
pub fn extract_point<D: FieldSource + ?Sized>(doc: &D, config: &ClusteringConfig) -> Option<Point> {
    let latitude = doc.field(config.field_lat())?.as_f64()?;
    let longitude = doc.field(config.field_lon())?.as_f64()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    let key = doc
        .field_text(config.field_id())
        .map(Cow::into_owned)
        .unwrap_or_default();
    Some(Point::new(longitude, latitude, key))
}
