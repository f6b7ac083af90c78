//! Reading and writing data payloads as JSON files.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::data::Data;
use crate::error::{IoErrorExt, Result, ShapeError};
use crate::schema::DataSchema;

/// Reads a [`Data`] payload from a JSON file.
///
/// # Errors
///
/// Returns an [`IoError`](crate::IoError) if the file cannot be read and a
/// [`ShapeError`] if its content is not a valid payload.
pub fn read_data_file(path: impl AsRef<Path>) -> Result<Data> {
    let path = path.as_ref();
    debug!("Reading data payload from {}", path.display());
    let bytes = fs::read(path).with_read_context(path)?;
    let data = Data::from_slice(&bytes)?;
    info!("Read {} data from {}", data.kind(), path.display());
    Ok(data)
}

/// Writes a [`Data`] payload as pretty-printed JSON, replacing the file.
///
/// # Errors
///
/// Returns an [`IoError`](crate::IoError) if the file cannot be written.
pub fn write_data_file(path: impl AsRef<Path>, data: &Data) -> Result<()> {
    let path = path.as_ref();
    let json = data.to_string_pretty()?;
    fs::write(path, json).with_write_context(path)?;
    info!("Wrote {} data to {}", data.kind(), path.display());
    Ok(())
}

/// Reads a standalone [`DataSchema`] from a JSON file.
///
/// # Errors
///
/// Returns an [`IoError`](crate::IoError) if the file cannot be read and a
/// [`ShapeError`] if its content is not a valid schema.
pub fn read_schema_file(path: impl AsRef<Path>) -> Result<DataSchema> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_read_context(path)?;
    let schema = serde_json::from_slice(&bytes).map_err(|source| ShapeError::Invalid {
        entity: "DataSchema",
        source,
    })?;
    Ok(schema)
}
