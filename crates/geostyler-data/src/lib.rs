//! `geostyler-data` declares the data model GeoStyler parsers produce and
//! styling clients consume.
//!
//! This crate includes:
//! - **Schemas**: [`DataSchema`], [`SchemaProperty`] and [`BandSchema`] describe
//!   the attributes of vector data and the bands of raster data.
//! - **Data payloads**: [`Data`] is either [`VectorData`] (schema plus example
//!   features) or [`RasterData`] (schema plus band metadata).
//! - **Parser contract**: [`DataParser`] is implemented by every component that
//!   turns a source into [`Data`]; [`ParserRegistry`] dispatches by title.
//!
//! All shapes serialize to and from the GeoStyler JSON interchange format, so
//! deserializing a value is how its conformance is checked.

pub mod band;
pub mod data;
pub mod error;
pub mod io;
pub mod parser;
pub mod registry;
pub mod schema;

pub use band::BandSchema;
pub use data::{BaseData, Data, DataKind, RasterData, VectorData};
pub use error::{
    ConfigError, DataError, IoError, IoErrorExt, ParserError, RegistryError, Result, ShapeError,
};
pub use parser::{DataParser, ParserConfig};
pub use registry::ParserRegistry;
pub use schema::{DataSchema, SchemaProperty, SchemaPropertyType};
