//! Metadata of a single raster band.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TYPED_KEYS: [&str; 2] = ["minValue", "maxValue"];

/// Information on one band of imported raster data.
///
/// Besides the value range a band may carry arbitrary sub-properties such as
/// projections or statistics. Those are available through
/// [`BandSchema::extra`] and are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandSchema {
    /// Smallest value occurring in the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    /// Largest value occurring in the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Any other named value describing the band. Never holds a typed key.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl BandSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    #[must_use]
    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Attaches an additional named value.
    ///
    /// `minValue` and `maxValue` are typed fields and cannot be set this way;
    /// use [`BandSchema::with_min_value`] and [`BandSchema::with_max_value`].
    /// Such a call is logged as a warning and leaves the band unchanged.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if TYPED_KEYS.contains(&key.as_str()) {
            warn!("Ignoring extra band value '{key}': it is a typed field of BandSchema");
        } else {
            self.extra.insert(key, value.into());
        }
        self
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Iterates over the additional named values in key order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra.iter().map(|(key, value)| (key.as_str(), value))
    }
}
