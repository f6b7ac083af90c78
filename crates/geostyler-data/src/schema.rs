//! Schema descriptions of imported geo-data.
//!
//! A [`DataSchema`] tells a styling client which attributes a dataset offers
//! and, for numeric attributes, which value range they span. It is modelled
//! on JSON Schema and is comparable to the response of an OGC WFS
//! `DescribeFeatureType` request:
//!
//! ```json
//! {
//!   "title": "Person",
//!   "type": "object",
//!   "properties": {
//!     "firstName": { "type": "string" },
//!     "age": { "type": "integer", "minimum": 0 }
//!   }
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use geostyler_data::{DataSchema, SchemaProperty, SchemaPropertyType};
//!
//! let schema = DataSchema::new("object")
//!     .with_title("Person")
//!     .with_property("firstName", SchemaProperty::new(SchemaPropertyType::String))
//!     .with_property(
//!         "age",
//!         SchemaProperty::new(SchemaPropertyType::Integer).with_minimum(0.0),
//!     );
//!
//! assert_eq!(schema.numeric_properties().count(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema (draft 4) type name of a described attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    Any,
}

impl SchemaPropertyType {
    /// Returns `true` for the types that `minimum`/`maximum` apply to.
    ///
    /// ```
    /// use geostyler_data::SchemaPropertyType;
    ///
    /// assert!(SchemaPropertyType::Number.is_numeric());
    /// assert!(SchemaPropertyType::Integer.is_numeric());
    /// assert!(!SchemaPropertyType::String.is_numeric());
    /// ```
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }

    /// Returns the JSON Schema spelling of this type name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for SchemaPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute of a described entity.
///
/// `minimum` and `maximum` only carry meaning when the type is numeric; they
/// are kept verbatim otherwise but [`SchemaProperty::bounds`] ignores them.
/// Other JSON Schema keywords such as `description` or `format` are kept as
/// extra values and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// The data type of the attribute.
    #[serde(rename = "type")]
    pub property_type: SchemaPropertyType,

    /// Lower bound of the attribute's values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Upper bound of the attribute's values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl SchemaProperty {
    #[must_use]
    pub fn new(property_type: SchemaPropertyType) -> Self {
        Self {
            property_type,
            minimum: None,
            maximum: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.property_type.is_numeric()
    }

    /// Attaches another JSON Schema keyword, e.g. `description`.
    ///
    /// `type`, `minimum` and `maximum` are typed fields; setting them this
    /// way is logged as a warning and ignored.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_extra(&mut self.extra, PROPERTY_KEYS, "SchemaProperty", key.into(), value.into());
        self
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the declared `(minimum, maximum)` pair for numeric attributes.
    ///
    /// Non-numeric attributes have no meaningful bounds and yield `None`.
    #[must_use]
    pub fn bounds(&self) -> Option<(Option<f64>, Option<f64>)> {
        self.is_numeric().then_some((self.minimum, self.maximum))
    }
}

/// Schema of imported geo-data: available attributes and their data ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    /// Optional title of the described entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Type of the described entity, usually `"object"`.
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Attributes of the described entity, keyed by name.
    #[serde(deserialize_with = "unique_keys::deserialize")]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Other top-level keywords, e.g. `$schema` or `required`.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl DataSchema {
    #[must_use]
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            title: None,
            schema_type: schema_type.into(),
            properties: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds or replaces the attribute `name`.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property: SchemaProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Attaches another top-level keyword. `title`, `type` and `properties`
    /// are typed fields and are ignored with a warning.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_extra(&mut self.extra, SCHEMA_KEYS, "DataSchema", key.into(), value.into());
        self
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over the attributes whose type is numeric, in name order.
    pub fn numeric_properties(&self) -> impl Iterator<Item = (&str, &SchemaProperty)> {
        self.properties
            .iter()
            .filter(|(_, property)| property.is_numeric())
            .map(|(name, property)| (name.as_str(), property))
    }
}

const PROPERTY_KEYS: &[&str] = &["type", "minimum", "maximum"];
const SCHEMA_KEYS: &[&str] = &["title", "type", "properties"];

fn insert_extra(
    extra: &mut BTreeMap<String, Value>,
    typed_keys: &[&str],
    entity: &str,
    key: String,
    value: Value,
) {
    if typed_keys.contains(&key.as_str()) {
        warn!("Ignoring extra value '{key}': it is a typed field of {entity}");
    } else {
        extra.insert(key, value);
    }
}

/// Deserializes a string-keyed map, rejecting payloads that repeat a key.
///
/// `serde_json` keeps the last value of a repeated key, which would silently
/// drop an attribute or band description.
pub(crate) mod unique_keys {
    use std::collections::BTreeMap;
    use std::collections::btree_map::Entry;
    use std::fmt;
    use std::marker::PhantomData;

    use serde::Deserialize;
    use serde::de::{Deserializer, Error, MapAccess, Visitor};

    pub(crate) fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        deserializer.deserialize_map(UniqueKeyVisitor(PhantomData))
    }

    struct UniqueKeyVisitor<V>(PhantomData<V>);

    impl<'de, V> Visitor<'de> for UniqueKeyVisitor<V>
    where
        V: Deserialize<'de>,
    {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = BTreeMap::new();
            while let Some(key) = access.next_key::<String>()? {
                match map.entry(key) {
                    Entry::Occupied(entry) => {
                        return Err(A::Error::custom(format!("duplicate key '{}'", entry.key())));
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(access.next_value()?);
                    },
                }
            }
            Ok(map)
        }
    }
}
