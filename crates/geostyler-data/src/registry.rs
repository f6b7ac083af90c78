//! Registry of data parsers keyed by title.
//!
//! Callers that support several sources register one parser per source and
//! dispatch by title. Titles are matched case-insensitively.
//!
//! # Examples
//!
//! ```
//! use async_trait::async_trait;
//! use geostyler_data::{Data, DataParser, DataSchema, ParserRegistry, RasterData, Result};
//!
//! struct BandCount;
//!
//! #[async_trait]
//! impl DataParser for BandCount {
//!     type Input = usize;
//!
//!     fn title(&self) -> &str {
//!         "Band count"
//!     }
//!
//!     async fn read_data(&self, bands: usize) -> Result<Data> {
//!         let mut raster = RasterData::new(DataSchema::new("object"));
//!         for band in 1..=bands {
//!             raster = raster.with_band(format!("b{band}"), Default::default());
//!         }
//!         Ok(raster.into())
//!     }
//! }
//!
//! # let runtime = tokio::runtime::Runtime::new().unwrap();
//! # runtime.block_on(async {
//! let mut registry = ParserRegistry::new();
//! registry.register(BandCount)?;
//!
//! let data = registry.read_data("band count", 3).await?;
//! assert_eq!(data.as_raster().unwrap().raster_band_info.len(), 3);
//! # Ok::<(), geostyler_data::DataError>(())
//! # })?;
//! # Ok::<(), geostyler_data::DataError>(())
//! ```

use log::{info, warn};

use crate::data::Data;
use crate::error::{RegistryError, Result};
use crate::parser::DataParser;

/// A set of parsers sharing one input type.
pub struct ParserRegistry<T> {
    parsers: Vec<Box<dyn DataParser<Input = T>>>,
}

impl<T: Send + 'static> ParserRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Adds a parser.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if a parser with the same title
    /// is already registered.
    pub fn register<P>(&mut self, parser: P) -> Result<()>
    where
        P: DataParser<Input = T> + 'static,
    {
        if self.get(parser.title()).is_some() {
            warn!("Refusing to register parser '{}' twice", parser.title());
            return Err(RegistryError::Duplicate {
                title: parser.title().to_string(),
            }
            .into());
        }
        info!("Registered parser '{}'", parser.title());
        self.parsers.push(Box::new(parser));
        Ok(())
    }

    /// Finds a parser by title, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&dyn DataParser<Input = T>> {
        self.parsers
            .iter()
            .find(|p| p.title().eq_ignore_ascii_case(title))
            .map(|p| &**p)
    }

    /// Titles of all registered parsers, sorted.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<_> = self.parsers.iter().map(|p| p.title()).collect();
        titles.sort_unstable();
        titles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Reads `input` with the parser registered under `title`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no parser matches, otherwise
    /// whatever the parser returns.
    pub async fn read_data(&self, title: &str, input: T) -> Result<Data> {
        let parser = self.get(title).ok_or_else(|| RegistryError::NotFound {
            title: title.to_string(),
            available: self.titles().join(", "),
        })?;

        info!(
            "Reading data with parser '{}' (source: {}, target: {})",
            parser.title(),
            parser.source_projection().unwrap_or("unset"),
            parser.target_projection().unwrap_or("unset")
        );
        let data = parser.read_data(input).await?;
        info!("Parser '{}' produced {} data", parser.title(), data.kind());
        Ok(data)
    }
}

impl<T: Send + 'static> Default for ParserRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataKind, RasterData};
    use crate::error::{DataError, ParserError};
    use crate::schema::DataSchema;
    use async_trait::async_trait;

    struct Fixed {
        title: &'static str,
    }

    #[async_trait]
    impl DataParser for Fixed {
        type Input = bool;

        fn title(&self) -> &str {
            self.title
        }

        async fn read_data(&self, ok: bool) -> Result<Data> {
            if ok {
                Ok(RasterData::new(DataSchema::new("object")).into())
            } else {
                Err(ParserError::InvalidInput {
                    parser: self.title.to_string(),
                    message: "rejected".to_string(),
                }
                .into())
            }
        }
    }

    fn registry() -> ParserRegistry<bool> {
        let mut registry = ParserRegistry::new();
        registry.register(Fixed { title: "WFS" }).expect("register");
        registry
            .register(Fixed { title: "GeoJSON" })
            .expect("register");
        registry
    }

    #[test]
    fn titles_are_sorted() {
        let registry = registry();
        assert_eq!(registry.titles(), vec!["GeoJSON", "WFS"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let mut registry = registry();
        let err = registry.register(Fixed { title: "geojson" }).unwrap_err();
        assert!(matches!(
            err,
            DataError::Registry(RegistryError::Duplicate { .. })
        ));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = registry();
        assert_eq!(registry.get("wfs").map(|p| p.title()), Some("WFS"));
        assert!(registry.get("Shapefile").is_none());
    }

    #[tokio::test]
    async fn read_data_dispatches_by_title() {
        let registry = registry();
        let data = registry.read_data("GeoJSON", true).await.expect("data");
        assert_eq!(data.kind(), DataKind::Raster);
    }

    #[tokio::test]
    async fn read_data_propagates_parser_errors() {
        let registry = registry();
        let err = registry.read_data("WFS", false).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parser 'WFS' could not read its input: rejected"
        );
    }

    #[tokio::test]
    async fn read_data_unknown_title() {
        let registry = registry();
        let err = registry.read_data("Shapefile", true).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parser 'Shapefile' not found. Available parsers: GeoJSON, WFS"
        );
    }
}
