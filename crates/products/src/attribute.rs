use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use catalog_core::{AttributeCode, AttributeValueId, Entity, LocaleCode};

/// Storage type of an attribute definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Text,
    Textarea,
    Checkbox,
    Integer,
    Float,
    Percent,
    Date,
    Datetime,
    Select,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Textarea => "textarea",
            AttributeType::Checkbox => "checkbox",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Percent => "percent",
            AttributeType::Date => "date",
            AttributeType::Datetime => "datetime",
            AttributeType::Select => "select",
        }
    }
}

impl core::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute definition. Read-only for the import engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub code: AttributeCode,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default = "default_translatable")]
    pub translatable: bool,
}

fn default_translatable() -> bool {
    true
}

impl Attribute {
    pub fn new(code: AttributeCode, attribute_type: AttributeType, translatable: bool) -> Self {
        Self {
            code,
            name: String::new(),
            attribute_type,
            translatable,
        }
    }
}

/// Value of one attribute on one product.
///
/// `locale` is `None` when the value is shared by every locale (attributes that
/// are not translatable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    id: AttributeValueId,
    attribute: Attribute,
    locale: Option<LocaleCode>,
    value: JsonValue,
}

impl AttributeValue {
    pub fn new(attribute: Attribute, locale: Option<LocaleCode>, value: JsonValue) -> Self {
        Self {
            id: AttributeValueId::new(),
            attribute,
            locale,
            value,
        }
    }

    pub fn id_typed(&self) -> AttributeValueId {
        self.id
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn code(&self) -> &AttributeCode {
        &self.attribute.code
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute.attribute_type
    }

    pub fn locale(&self) -> Option<&LocaleCode> {
        self.locale.as_ref()
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    pub fn set_value(&mut self, value: JsonValue) {
        self.value = value;
    }

    pub fn set_locale(&mut self, locale: Option<LocaleCode>) {
        self.locale = locale;
    }

    /// Replace the stored definition. The code must not change.
    pub fn refresh_attribute(&mut self, attribute: Attribute) -> bool {
        if attribute.code != self.attribute.code || attribute == self.attribute {
            return false;
        }
        self.attribute = attribute;
        true
    }
}

impl Entity for AttributeValue {
    type Id = AttributeValueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
