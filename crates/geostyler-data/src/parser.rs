//! The contract every GeoStyler data parser fulfils.
//!
//! A parser turns some source (a GeoJSON document, a WFS response, a raster
//! file, ...) into the [`Data`] model. This crate only defines the contract;
//! concrete parsers live in their own crates.

use async_trait::async_trait;

use crate::data::Data;
use crate::error::{ConfigError, Result};

/// Trait implemented by all GeoStyler data parsers.
///
/// `Input` is whatever the parser consumes. Retry, timeout and cancellation
/// behaviour, as well as how the projections are applied, are left to the
/// implementation.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use geostyler_data::{Data, DataParser, DataSchema, RasterData, Result};
///
/// struct EmptyRaster;
///
/// #[async_trait]
/// impl DataParser for EmptyRaster {
///     type Input = ();
///
///     fn title(&self) -> &str {
///         "Empty raster"
///     }
///
///     async fn read_data(&self, _input: ()) -> Result<Data> {
///         Ok(RasterData::new(DataSchema::new("object")).into())
///     }
/// }
/// ```
#[async_trait]
pub trait DataParser: Send + Sync {
    /// Input accepted by [`DataParser::read_data`].
    type Input: Send + 'static;

    /// The name of the parser.
    fn title(&self) -> &str;

    /// Projection of the input data, e.g. `"EPSG:4326"`.
    fn source_projection(&self) -> Option<&str> {
        None
    }

    /// Projection of the output data, e.g. `"EPSG:3857"`.
    fn target_projection(&self) -> Option<&str> {
        None
    }

    /// Parses `input` and transforms it into the GeoStyler data model.
    ///
    /// # Errors
    ///
    /// Implementations report unreadable input as
    /// [`ParserError`](crate::ParserError) and may use any other
    /// [`DataError`](crate::DataError) variant.
    async fn read_data(&self, input: Self::Input) -> Result<Data>;
}

/// Title and projection settings a parser can embed.
///
/// Projection strings are coordinate reference system identifiers and are
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// The name of the parser.
    pub title: String,
    /// Projection of the input data.
    pub source_projection: Option<String>,
    /// Projection of the output data.
    pub target_projection: Option<String>,
}

impl ParserConfig {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_projection: None,
            target_projection: None,
        }
    }

    #[must_use]
    pub fn with_source_projection(mut self, projection: impl Into<String>) -> Self {
        self.source_projection = Some(projection.into());
        self
    }

    #[must_use]
    pub fn with_target_projection(mut self, projection: impl Into<String>) -> Self {
        self.target_projection = Some(projection.into());
        self
    }

    /// Checks that the title and any projection are non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] for a blank title and
    /// [`ConfigError::InvalidOption`] for a blank projection.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                option: "title".to_string(),
            }
            .into());
        }
        for (option, projection) in [
            ("sourceProjection", &self.source_projection),
            ("targetProjection", &self.target_projection),
        ] {
            if projection.as_deref().is_some_and(|p| p.trim().is_empty()) {
                return Err(ConfigError::InvalidOption {
                    option: option.to_string(),
                    message: "projection must not be blank".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    #[test]
    fn config_builder_sets_projections() {
        let config = ParserConfig::new("GeoJSON Parser")
            .with_source_projection("EPSG:4326")
            .with_target_projection("EPSG:3857");

        assert_eq!(config.title, "GeoJSON Parser");
        assert_eq!(config.source_projection.as_deref(), Some("EPSG:4326"));
        assert_eq!(config.target_projection.as_deref(), Some("EPSG:3857"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_title_is_missing() {
        let err = ParserConfig::new("   ").validate().unwrap_err();
        assert!(matches!(
            err,
            DataError::Config(ConfigError::MissingRequired { ref option }) if option == "title"
        ));
    }

    #[test]
    fn blank_projection_is_invalid() {
        let err = ParserConfig::new("WFS")
            .with_target_projection("")
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid targetProjection option: projection must not be blank"
        );
    }
}
