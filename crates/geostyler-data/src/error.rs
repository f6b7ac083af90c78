//! Error types for the GeoStyler data model.
//!
//! Errors are structured with `thiserror`. [`DataError`] is the root type and
//! delegates to one domain-specific enum per concern, so callers can match on
//! the concern they care about and still bubble everything up with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GeoStyler data operations.
///
/// Display formatting is delegated to the wrapped variant.
#[derive(Debug, Error)]
pub enum DataError {
    /// A payload does not conform to one of the data shapes.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Reading or writing a payload failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// A [`DataParser`](crate::DataParser) rejected its input.
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// Parser lookup or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Parser configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Anything else an implementer needs to report.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Shape conformance errors.
///
/// Raised when a payload cannot be read as one of the declared data shapes.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The payload is not a JSON object.
    #[error("Expected a {entity} object, found {found}")]
    NotAnObject {
        /// The shape that was expected
        entity: &'static str,
        /// The JSON kind that was found instead, with its article
        found: &'static str,
    },

    /// The payload is valid vector data and valid raster data, and no `kind`
    /// picks one.
    #[error(
        "Ambiguous data payload: it is valid as both vector and raster data and no 'kind' is given"
    )]
    Ambiguous,

    /// The payload carries both content keys but is valid as neither variant.
    #[error("Data payload is neither valid vector data ({vector}) nor valid raster data ({raster})")]
    NoMatchingShape {
        /// Why the payload is not vector data
        vector: serde_json::Error,
        /// Why the payload is not raster data
        raster: serde_json::Error,
    },

    /// The payload carries neither vector nor raster content.
    #[error(
        "Unrecognized data payload: expected 'exampleFeatures' or 'rasterBandInfo', found keys [{keys}]"
    )]
    Unrecognized {
        /// Comma-separated list of the keys that were present
        keys: String,
    },

    /// The explicit `kind` discriminant names no known variant.
    #[error("Unknown data kind '{kind}', expected 'vector' or 'raster'")]
    UnknownKind {
        /// The discriminant that was found
        kind: String,
    },

    /// The payload has the right outline but a field is missing or mistyped.
    #[error("Invalid {entity} payload: {source}")]
    Invalid {
        /// The shape being read (e.g. "VectorData")
        entity: &'static str,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read a payload file
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a payload file
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// File was not found
    #[error("File not found: '{path}'")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },

    /// Failed to read from a stream that has no path
    #[error("Failed to read data stream: {source}")]
    Stream {
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by [`DataParser`](crate::DataParser) implementations.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The input could not be turned into a data payload
    #[error("Parser '{parser}' could not read its input: {message}")]
    InvalidInput {
        /// Title of the parser
        parser: String,
        /// Description of the problem
        message: String,
    },

    /// The parser cannot handle the requested projection
    #[error("Parser '{parser}' does not support projection '{projection}'")]
    UnsupportedProjection {
        /// Title of the parser
        parser: String,
        /// The projection identifier (e.g. "EPSG:3857")
        projection: String,
    },
}

/// Parser registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No parser with the given title is registered
    #[error("Parser '{title}' not found. Available parsers: {available}")]
    NotFound {
        /// The requested title
        title: String,
        /// Comma-separated list of registered titles
        available: String,
    },

    /// A parser with the same title is already registered
    #[error("Parser '{title}' is already registered")]
    Duplicate {
        /// The conflicting title
        title: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },
}

/// Type alias for Results using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Shape(e) => format!("Invalid data payload: {e}"),
            Self::Io(e) => e.user_message(),
            Self::Parser(e) => e.to_string(),
            Self::Registry(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Shape(e) => e.recovery_suggestion(),
            Self::Io(e) => e.recovery_suggestion(),
            Self::Registry(e) => e.recovery_suggestion(),
            _ => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors might be fixed by retrying with different
    /// parameters, e.g. another parser or a corrected configuration.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Registry(RegistryError::NotFound { .. })
                | Self::Parser(ParserError::UnsupportedProjection { .. })
        )
    }
}

impl ShapeError {
    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Ambiguous => Some(
                "Add \"kind\": \"vector\" or \"kind\": \"raster\" to the payload.".to_string(),
            ),
            Self::Unrecognized { .. } => Some(
                "Vector payloads need 'exampleFeatures', raster payloads need 'rasterBandInfo'."
                    .to_string(),
            ),
            Self::UnknownKind { .. } => Some("Use 'vector' or 'raster' as kind.".to_string()),
            Self::NotAnObject { .. } | Self::Invalid { .. } | Self::NoMatchingShape { .. } => {
                None
            },
        }
    }

    pub(crate) fn not_an_object(entity: &'static str, value: &serde_json::Value) -> Self {
        use serde_json::Value;

        let found = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        Self::NotAnObject { entity, found }
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { path, .. } => format!("Failed to read file: {}", path.display()),
            Self::Write { path, .. } => format!("Failed to write file: {}", path.display()),
            Self::FileNotFound { path } => format!("File not found: {}", path.display()),
            Self::Stream { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            Self::Read { .. } | Self::Write { .. } | Self::Stream { .. } => None,
        }
    }
}

impl RegistryError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { title, available } if available.is_empty() => {
                format!("Parser '{title}' not found. No parsers are registered.")
            },
            Self::NotFound { title, available } => {
                format!(
                    "Parser '{title}' not found.\n\nAvailable parsers:\n{}",
                    available
                        .split(", ")
                        .map(|p| format!("  - {p}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
            Self::Duplicate { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => Some("Register the parser before reading data.".to_string()),
            Self::Duplicate { .. } => Some("Give each parser a unique title.".to_string()),
        }
    }
}

/// Extension trait for adding file context to I/O errors.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] when the file does not exist and
    /// [`IoError::Read`] for every other failure.
    fn with_read_context(self, path: impl Into<PathBuf>) -> Result<T>;

    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoErrorExt<T> for std::io::Result<T> {
    fn with_read_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let path = path.into();
            if e.kind() == std::io::ErrorKind::NotFound {
                DataError::Io(IoError::FileNotFound { path })
            } else {
                DataError::Io(IoError::Read { path, source: e })
            }
        })
    }

    fn with_write_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            DataError::Io(IoError::Write {
                path: path.into(),
                source: e,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_not_found_lists_parsers() {
        let err = DataError::from(RegistryError::NotFound {
            title: "WFS".to_string(),
            available: "GeoJSON, Shapefile".to_string(),
        });

        assert_eq!(
            err.to_string(),
            "Parser 'WFS' not found. Available parsers: GeoJSON, Shapefile"
        );
        let message = err.user_message();
        assert!(message.contains("  - GeoJSON"));
        assert!(message.contains("  - Shapefile"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn registry_not_found_with_empty_registry() {
        let err = DataError::from(RegistryError::NotFound {
            title: "WFS".to_string(),
            available: String::new(),
        });

        assert_eq!(
            err.user_message(),
            "Parser 'WFS' not found. No parsers are registered."
        );
    }

    #[test]
    fn ambiguous_shape_suggests_kind() {
        let err = DataError::from(ShapeError::Ambiguous);
        let suggestion = err.recovery_suggestion().expect("suggestion");
        assert!(suggestion.contains("\"kind\""));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn not_an_object_names_the_json_kind() {
        let err = ShapeError::not_an_object("Data", &serde_json::json!("vector"));
        assert_eq!(err.to_string(), "Expected a Data object, found a string");

        let err = ShapeError::not_an_object("DataSchema", &serde_json::Value::Null);
        assert_eq!(err.to_string(), "Expected a DataSchema object, found null");
    }

    #[test]
    fn read_context_maps_not_found() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let err = result.with_read_context("data.json").unwrap_err();
        assert!(matches!(
            err,
            DataError::Io(IoError::FileNotFound { ref path }) if path.ends_with("data.json")
        ));
    }

    #[test]
    fn write_context_keeps_source() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_write_context("out.json").unwrap_err();
        assert_eq!(err.to_string(), "Failed to write 'out.json': denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_error_is_recoverable() {
        let err = DataError::from(ConfigError::MissingRequired {
            option: "title".to_string(),
        });
        assert!(err.is_recoverable());
        assert_eq!(
            err.user_message(),
            "Configuration error: Missing required option: title"
        );
    }
}
