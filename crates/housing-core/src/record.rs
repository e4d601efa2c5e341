//! Housing record type and feature vectorization.
//!
//! The model has no field names, only positions, so the column order used
//! at training time must be reproduced exactly at serving time. That order
//! lives in [`FEATURE_COLUMNS`] and nowhere else: training selects CSV
//! columns from it, the artifact records it, and vectorization projects
//! record fields in it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Number of model features.
pub const NUM_FEATURES: usize = 8;

/// Canonical feature column order, shared by training and serving.
pub const FEATURE_COLUMNS: [&str; NUM_FEATURES] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
];

/// Fixed-order numeric encoding of one record.
pub type FeatureVector = [f64; NUM_FEATURES];

/// One housing observation; all eight fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub total_bedrooms: f64,
    pub population: f64,
    pub households: f64,
    pub median_income: f64,
}

impl HousingRecord {
    /// Builds a record from an untyped JSON value, validating presence and
    /// numeric coercibility of every required field.
    ///
    /// JSON numbers are accepted directly and numeric strings are parsed;
    /// any other value fails with [`Error::TypeConversion`]. No bounds
    /// checking is performed beyond that.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                return Err(Error::TypeConversion {
                    field: "record",
                    value: truncate_for_message(value),
                })
            }
        };

        let mut features = [0.0; NUM_FEATURES];
        for (slot, field) in features.iter_mut().zip(FEATURE_COLUMNS) {
            let raw = object.get(field).ok_or(Error::MissingField(field))?;
            *slot = coerce_number(field, raw)?;
        }

        Ok(Self::from_features(&features))
    }

    /// Inverse of [`Self::to_features`].
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            longitude: features[0],
            latitude: features[1],
            housing_median_age: features[2],
            total_rooms: features[3],
            total_bedrooms: features[4],
            population: features[5],
            households: features[6],
            median_income: features[7],
        }
    }

    /// Projects the record into a feature vector in [`FEATURE_COLUMNS`]
    /// order.
    pub fn to_features(&self) -> FeatureVector {
        [
            self.longitude,
            self.latitude,
            self.housing_median_age,
            self.total_rooms,
            self.total_bedrooms,
            self.population,
            self.households,
            self.median_income,
        ]
    }
}

/// Vectorizes a batch of records; row order matches input order.
pub fn vectorize_batch(records: &[HousingRecord]) -> Vec<FeatureVector> {
    records.iter().map(HousingRecord::to_features).collect()
}

fn coerce_number(field: &'static str, raw: &Value) -> Result<f64> {
    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| Error::TypeConversion {
            field,
            value: raw.to_string(),
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| Error::TypeConversion {
            field,
            value: raw.to_string(),
        }),
        _ => Err(Error::TypeConversion {
            field,
            value: truncate_for_message(raw),
        }),
    }
}

fn truncate_for_message(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 64 {
        text.truncate(64);
        text.push_str("...");
    }
    text
}
