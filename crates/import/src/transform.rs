//! Attribute value transformers.
//!
//! Cells arrive as text; the stored value type depends on the attribute
//! definition. The pool maps each [`AttributeType`] to a transformer.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value as JsonValue};
use thiserror::Error;

use catalog_products::{Attribute, AttributeType};

use crate::coerce::{coerce_f64, coerce_i64, is_truthy, split_list};
use crate::error::ImportError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransformError(pub String);

pub trait ValueTransformer: Send + Sync {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError>;
}

/// Stores the cell text unchanged.
pub struct TextTransformer;

impl ValueTransformer for TextTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        Ok(JsonValue::String(raw.to_string()))
    }
}

pub struct IntegerTransformer;

impl ValueTransformer for IntegerTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        Ok(JsonValue::from(coerce_i64(raw)))
    }
}

/// Decimal value, optionally scaled (percentages are stored as fractions).
pub struct FloatTransformer {
    divisor: f64,
}

impl FloatTransformer {
    pub fn plain() -> Self {
        Self { divisor: 1.0 }
    }

    pub fn percent() -> Self {
        Self { divisor: 100.0 }
    }
}

impl ValueTransformer for FloatTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        let value = coerce_f64(&raw.trim().replace(',', ".")) / self.divisor;
        Number::from_f64(value)
            .map(JsonValue::Number)
            .ok_or_else(|| TransformError(format!("{raw:?} is not a finite number")))
    }
}

pub struct CheckboxTransformer;

impl ValueTransformer for CheckboxTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        Ok(JsonValue::Bool(is_truthy(raw)))
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Normalises to ISO `YYYY-MM-DD`.
pub struct DateTransformer;

impl ValueTransformer for DateTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        let raw = raw.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| TransformError(format!("{raw:?} is not a date")))
    }
}

/// Normalises to `YYYY-MM-DD HH:MM:SS`; a bare date reads as midnight.
pub struct DateTimeTransformer;

impl DateTimeTransformer {
    fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl ValueTransformer for DateTimeTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        let raw = raw.trim();
        Self::parse(raw)
            .map(|dt| JsonValue::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .ok_or_else(|| TransformError(format!("{raw:?} is not a date-time")))
    }
}

/// Splits the cell into the list of selected option codes.
pub struct SelectTransformer {
    delimiter: char,
}

impl SelectTransformer {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl ValueTransformer for SelectTransformer {
    fn transform(&self, raw: &str) -> Result<JsonValue, TransformError> {
        Ok(JsonValue::Array(
            split_list(raw, self.delimiter)
                .into_iter()
                .map(|s| JsonValue::String(s.to_string()))
                .collect(),
        ))
    }
}

/// Transformers keyed by attribute type. Types without an entry store text.
pub struct TransformerPool {
    transformers: HashMap<AttributeType, Box<dyn ValueTransformer>>,
}

impl TransformerPool {
    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    pub fn with_defaults(list_delimiter: char) -> Self {
        let mut pool = Self::empty();
        pool.register(AttributeType::Integer, IntegerTransformer);
        pool.register(AttributeType::Float, FloatTransformer::plain());
        pool.register(AttributeType::Percent, FloatTransformer::percent());
        pool.register(AttributeType::Checkbox, CheckboxTransformer);
        pool.register(AttributeType::Date, DateTransformer);
        pool.register(AttributeType::Datetime, DateTimeTransformer);
        pool.register(AttributeType::Select, SelectTransformer::new(list_delimiter));
        pool
    }

    pub fn register(&mut self, kind: AttributeType, transformer: impl ValueTransformer + 'static) {
        self.transformers.insert(kind, Box::new(transformer));
    }

    pub fn handle(&self, attribute: &Attribute, raw: &str) -> Result<JsonValue, ImportError> {
        let transformed = match self.transformers.get(&attribute.attribute_type) {
            Some(transformer) => transformer.transform(raw),
            None => TextTransformer.transform(raw),
        };
        transformed.map_err(|e| ImportError::Transform {
            attribute: attribute.code.to_string(),
            attribute_type: attribute.attribute_type.to_string(),
            message: e.0,
        })
    }
}

impl Default for TransformerPool {
    fn default() -> Self {
        Self::with_defaults('|')
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use catalog_core::AttributeCode;

    use super::*;

    fn attribute(kind: AttributeType) -> Attribute {
        Attribute::new(AttributeCode::new("attr").unwrap(), kind, true)
    }

    #[test]
    fn numeric_types() {
        let pool = TransformerPool::default();
        assert_eq!(pool.handle(&attribute(AttributeType::Integer), "12abc").unwrap(), json!(12));
        assert_eq!(pool.handle(&attribute(AttributeType::Float), "2,5").unwrap(), json!(2.5));
        assert_eq!(pool.handle(&attribute(AttributeType::Percent), "25").unwrap(), json!(0.25));
    }

    #[test]
    fn checkbox_and_text() {
        let pool = TransformerPool::default();
        assert_eq!(pool.handle(&attribute(AttributeType::Checkbox), "yes").unwrap(), json!(true));
        assert_eq!(pool.handle(&attribute(AttributeType::Checkbox), "0").unwrap(), json!(false));
        assert_eq!(pool.handle(&attribute(AttributeType::Text), " as is ").unwrap(), json!(" as is "));
    }

    #[test]
    fn dates_are_normalised() {
        let pool = TransformerPool::default();
        assert_eq!(pool.handle(&attribute(AttributeType::Date), "31/12/2024").unwrap(), json!("2024-12-31"));
        assert_eq!(
            pool.handle(&attribute(AttributeType::Datetime), "2024-12-31T08:30:00").unwrap(),
            json!("2024-12-31 08:30:00")
        );
        assert_eq!(
            pool.handle(&attribute(AttributeType::Datetime), "2024-12-31").unwrap(),
            json!("2024-12-31 00:00:00")
        );
    }

    #[test]
    fn bad_date_is_a_transform_error() {
        let pool = TransformerPool::default();
        let err = pool.handle(&attribute(AttributeType::Date), "someday").unwrap_err();
        assert!(matches!(err, ImportError::Transform { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn select_splits_options() {
        let pool = TransformerPool::with_defaults(';');
        assert_eq!(
            pool.handle(&attribute(AttributeType::Select), "red; blue;").unwrap(),
            json!(["red", "blue"])
        );
    }

    #[test]
    fn empty_pool_stores_text() {
        let pool = TransformerPool::empty();
        assert_eq!(pool.handle(&attribute(AttributeType::Integer), "12").unwrap(), json!("12"));
    }
}
