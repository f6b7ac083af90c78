//! The data payload a parser hands to styling clients.
//!
//! [`Data`] is either [`VectorData`] (a schema plus example features) or
//! [`RasterData`] (a schema plus per-band metadata). On the wire the variant
//! is named by an explicit `"kind"` member. Payloads without it are still
//! accepted and discriminated by shape: the payload must be valid as exactly
//! one of the two variants. A payload that is valid as both is rejected as
//! ambiguous.
//!
//! # Examples
//!
//! ```
//! use geostyler_data::{Data, DataKind};
//!
//! let data = Data::from_str(r#"{
//!     "schema": {
//!         "type": "object",
//!         "properties": { "age": { "type": "integer", "minimum": 0 } }
//!     },
//!     "exampleFeatures": { "type": "FeatureCollection", "features": [] }
//! }"#)?;
//!
//! assert_eq!(data.kind(), DataKind::Vector);
//! # Ok::<(), geostyler_data::DataError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use geojson::FeatureCollection;
use log::debug;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::band::BandSchema;
use crate::error::{IoError, Result, ShapeError};
use crate::schema::{DataSchema, unique_keys};

const KIND_KEY: &str = "kind";
const FEATURES_KEY: &str = "exampleFeatures";
const BANDS_KEY: &str = "rasterBandInfo";

/// Common capability of every data payload: it describes exactly one schema.
pub trait BaseData {
    /// Schema of the imported geo-data describing its attributes.
    fn schema(&self) -> &DataSchema;
}

/// Imported vector data: a schema plus some example features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorData {
    pub schema: DataSchema,
    /// Example features of the imported data. Geometry types are not
    /// constrained.
    pub example_features: FeatureCollection,
}

impl VectorData {
    #[must_use]
    pub fn new(schema: DataSchema, example_features: FeatureCollection) -> Self {
        Self {
            schema,
            example_features,
        }
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.example_features.features.len()
    }
}

impl BaseData for VectorData {
    fn schema(&self) -> &DataSchema {
        &self.schema
    }
}

/// Imported raster data: a schema plus metadata for each band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterData {
    pub schema: DataSchema,
    /// Band metadata keyed by band name.
    #[serde(deserialize_with = "unique_keys::deserialize")]
    pub raster_band_info: BTreeMap<String, BandSchema>,
}

impl RasterData {
    #[must_use]
    pub fn new(schema: DataSchema) -> Self {
        Self {
            schema,
            raster_band_info: BTreeMap::new(),
        }
    }

    /// Adds or replaces the band `name`.
    #[must_use]
    pub fn with_band(mut self, name: impl Into<String>, band: BandSchema) -> Self {
        self.raster_band_info.insert(name.into(), band);
        self
    }

    #[must_use]
    pub fn band(&self, name: &str) -> Option<&BandSchema> {
        self.raster_band_info.get(name)
    }

    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.raster_band_info.keys().map(String::as_str)
    }
}

impl BaseData for RasterData {
    fn schema(&self) -> &DataSchema {
        &self.schema
    }
}

/// Discriminant of [`Data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Vector,
    Raster,
}

impl DataKind {
    /// Returns the wire spelling used in the `"kind"` member.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Vector => "vector",
            DataKind::Raster => "raster",
        }
    }

    fn parse(kind: &str) -> std::result::Result<Self, ShapeError> {
        match kind {
            "vector" => Ok(DataKind::Vector),
            "raster" => Ok(DataKind::Raster),
            other => Err(ShapeError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Imported geo-data, either vector or raster.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Vector(VectorData),
    Raster(RasterData),
}

impl Data {
    #[must_use]
    pub fn kind(&self) -> DataKind {
        match self {
            Data::Vector(_) => DataKind::Vector,
            Data::Raster(_) => DataKind::Raster,
        }
    }

    #[must_use]
    pub fn as_vector(&self) -> Option<&VectorData> {
        match self {
            Data::Vector(vector) => Some(vector),
            Data::Raster(_) => None,
        }
    }

    #[must_use]
    pub fn as_raster(&self) -> Option<&RasterData> {
        match self {
            Data::Raster(raster) => Some(raster),
            Data::Vector(_) => None,
        }
    }

    /// Reads a data payload from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] when the value is not an object, cannot be
    /// assigned to exactly one variant, or does not conform to that variant.
    pub fn from_value(value: Value) -> Result<Self> {
        let data = read_shape(
            &value,
            || VectorData::deserialize(&value),
            || RasterData::deserialize(&value),
        )?;
        debug!("Read {} data payload", data.kind());
        Ok(data)
    }

    /// Reads a data payload from JSON bytes.
    ///
    /// Unlike [`Data::from_value`] this also rejects attribute or band names
    /// that are repeated in the raw text.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] when the bytes are not JSON or the payload
    /// does not conform to exactly one variant.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let outline: Value = serde_json::from_slice(bytes).map_err(|source| {
            ShapeError::Invalid {
                entity: "Data",
                source,
            }
        })?;
        let data = read_shape(
            &outline,
            || serde_json::from_slice(bytes),
            || serde_json::from_slice(bytes),
        )?;
        debug!("Read {} data payload ({} bytes)", data.kind(), bytes.len());
        Ok(data)
    }

    /// Reads a data payload from a JSON string.
    ///
    /// # Errors
    ///
    /// See [`Data::from_slice`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }

    /// Reads a data payload from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns an error when reading fails or the payload does not conform.
    pub fn from_reader(mut reader: impl std::io::Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| IoError::Stream { source })?;
        Self::from_slice(&bytes)
    }

    /// Converts the payload into a JSON value carrying the `"kind"` tag.
    ///
    /// # Errors
    ///
    /// Fails only if a foreign member of the example features cannot be
    /// represented as JSON.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|source| invalid(self.kind(), source).into())
    }

    /// Serializes the payload as pretty-printed JSON carrying the `"kind"` tag.
    ///
    /// # Errors
    ///
    /// See [`Data::to_value`].
    pub fn to_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| invalid(self.kind(), source).into())
    }
}

impl BaseData for Data {
    fn schema(&self) -> &DataSchema {
        match self {
            Data::Vector(vector) => &vector.schema,
            Data::Raster(raster) => &raster.schema,
        }
    }
}

impl From<VectorData> for Data {
    fn from(data: VectorData) -> Self {
        Data::Vector(data)
    }
}

impl From<RasterData> for Data {
    fn from(data: RasterData) -> Self {
        Data::Raster(data)
    }
}

/// Outline-level candidates for a payload, before any variant is validated.
enum Candidate {
    Only(DataKind),
    Both,
}

/// Resolves a payload to exactly one variant.
///
/// An explicit `kind` decides on its own and content of the other variant is
/// ignored. Otherwise every variant whose content key is present is read, and
/// the payload is accepted only if exactly one of them validates.
fn read_shape<V, R>(
    outline: &Value,
    read_vector: V,
    read_raster: R,
) -> std::result::Result<Data, ShapeError>
where
    V: FnOnce() -> serde_json::Result<VectorData>,
    R: FnOnce() -> serde_json::Result<RasterData>,
{
    let Value::Object(object) = outline else {
        return Err(ShapeError::not_an_object("Data", outline));
    };

    let candidate = match object.get(KIND_KEY) {
        Some(Value::String(kind)) => Candidate::Only(DataKind::parse(kind)?),
        Some(other) => {
            return Err(ShapeError::UnknownKind {
                kind: other.to_string(),
            });
        },
        None => match (
            object.contains_key(FEATURES_KEY),
            object.contains_key(BANDS_KEY),
        ) {
            (true, false) => Candidate::Only(DataKind::Vector),
            (false, true) => Candidate::Only(DataKind::Raster),
            (true, true) => Candidate::Both,
            (false, false) => {
                let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
                keys.sort_unstable();
                return Err(ShapeError::Unrecognized {
                    keys: keys.join(", "),
                });
            },
        },
    };

    match candidate {
        Candidate::Only(DataKind::Vector) => read_vector()
            .map(Data::Vector)
            .map_err(|source| invalid(DataKind::Vector, source)),
        Candidate::Only(DataKind::Raster) => read_raster()
            .map(Data::Raster)
            .map_err(|source| invalid(DataKind::Raster, source)),
        Candidate::Both => match (read_vector(), read_raster()) {
            (Ok(vector), Err(_)) => Ok(Data::Vector(vector)),
            (Err(_), Ok(raster)) => Ok(Data::Raster(raster)),
            (Ok(_), Ok(_)) => Err(ShapeError::Ambiguous),
            (Err(vector), Err(raster)) => Err(ShapeError::NoMatchingShape { vector, raster }),
        },
    }
}

fn invalid(kind: DataKind, source: serde_json::Error) -> ShapeError {
    let entity = match kind {
        DataKind::Vector => "VectorData",
        DataKind::Raster => "RasterData",
    };
    ShapeError::Invalid { entity, source }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TaggedData<'a> {
    Vector(&'a VectorData),
    Raster(&'a RasterData),
}

impl Serialize for Data {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tagged = match self {
            Data::Vector(vector) => TaggedData::Vector(vector),
            Data::Raster(raster) => TaggedData::Raster(raster),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let outline = Value::deserialize(deserializer)?;
        read_shape(
            &outline,
            || VectorData::deserialize(&outline),
            || RasterData::deserialize(&outline),
        )
        .map_err(D::Error::custom)
    }
}
