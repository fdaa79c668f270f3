//! Category encoders mapping category strings to stable integer codes

use beachsafe_core::metrics::UNKNOWN_CATEGORIES_TOTAL;
use beachsafe_core::{Column, Error, FeatureVector, Result, FALLBACK_CATEGORY};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Code used when neither the value nor the fallback category is known
pub const DEFAULT_CODE: u32 = 0;

/// Bidirectional mapping between the categories of one column and their codes.
///
/// The code of a category is its position in the vocabulary. Training sorts
/// the vocabulary; later additions are appended so existing codes never move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Fit an encoder on observed values: sorted, de-duplicated vocabulary
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Build an encoder from a vocabulary in code order
    pub fn from_classes(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Vocabulary in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of known categories
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Whether `value` is part of the vocabulary
    pub fn contains(&self, value: &str) -> bool {
        self.classes.iter().any(|c| c == value)
    }

    /// Trained code for `value`
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|idx| idx as u32)
    }

    /// Category for `code`
    pub fn category_of(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Append the fallback category if absent.
    ///
    /// Returns `true` when the vocabulary was widened. The new category gets
    /// the next free code; existing categories keep theirs.
    pub fn ensure_fallback(&mut self) -> bool {
        if self.contains(FALLBACK_CATEGORY) {
            return false;
        }
        self.classes.push(FALLBACK_CATEGORY.to_string());
        true
    }
}

/// One encoder per model column.
///
/// Serialized as a map from column name (`"Beach"`, `"Crowd_Level"`, ...) to
/// encoder, which is the on-disk encoder artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderRegistry {
    encoders: BTreeMap<Column, CategoryEncoder>,
}

impl EncoderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the encoder for a column, replacing any previous one
    pub fn insert(&mut self, column: Column, encoder: CategoryEncoder) {
        self.encoders.insert(column, encoder);
    }

    /// Encoder for a column
    pub fn get(&self, column: Column) -> Option<&CategoryEncoder> {
        self.encoders.get(&column)
    }

    /// Vocabulary of a column in code order
    pub fn vocabulary(&self, column: Column) -> Option<&[String]> {
        self.get(column).map(CategoryEncoder::classes)
    }

    /// Columns with a registered encoder
    pub fn columns(&self) -> Vec<Column> {
        self.encoders.keys().copied().collect()
    }

    /// Encode a value with graceful fallback. Never fails.
    ///
    /// Unknown values map to the code of the fallback category; if the column
    /// has no encoder or no fallback category, [`DEFAULT_CODE`] is used.
    pub fn encode(&self, column: Column, value: &str) -> u32 {
        let Some(encoder) = self.encoders.get(&column) else {
            debug!(%column, "no encoder registered, using default code");
            return DEFAULT_CODE;
        };

        if let Some(code) = encoder.code_of(value) {
            return code;
        }

        metrics::counter!(UNKNOWN_CATEGORIES_TOTAL, "column" => column.name())
            .increment(1);

        match encoder.code_of(FALLBACK_CATEGORY) {
            Some(code) => {
                debug!(%column, value, "unknown category, using fallback");
                code
            }
            None => {
                debug!(%column, value, "unknown category and no fallback, using default code");
                DEFAULT_CODE
            }
        }
    }

    /// Encode the five raw inputs into a feature vector in training order
    pub fn encode_features(
        &self,
        beach: &str,
        weather: &str,
        crowd: &str,
        tide: &str,
        hazard: &str,
    ) -> FeatureVector {
        FeatureVector::from_codes([
            self.encode(Column::Beach, beach),
            self.encode(Column::Weather, weather),
            self.encode(Column::CrowdLevel, crowd),
            self.encode(Column::Tide, tide),
            self.encode(Column::Hazard, hazard),
        ])
    }

    /// Decode a code back to its category string
    pub fn decode(&self, column: Column, code: u32) -> Result<&str> {
        self.encoders
            .get(&column)
            .and_then(|encoder| encoder.category_of(code))
            .ok_or_else(|| Error::decode(column, code))
    }

    /// Guarantee that every vocabulary contains the fallback category.
    ///
    /// Appends `"None"` with the next free code to each encoder lacking it and
    /// returns the columns that were widened. Idempotent.
    pub fn widen_with_fallback(&mut self) -> Vec<Column> {
        let mut widened = Vec::new();
        for (column, encoder) in self.encoders.iter_mut() {
            if encoder.ensure_fallback() {
                info!(
                    %column,
                    code = encoder.len() - 1,
                    "Added fallback category to vocabulary"
                );
                widened.push(*column);
            }
        }
        widened
    }

    /// Check that every column has a non-empty, duplicate-free vocabulary
    pub fn validate(&self) -> Result<()> {
        for column in Column::ALL {
            let encoder = self
                .encoders
                .get(&column)
                .ok_or_else(|| Error::artifact(format!("missing encoder for column {column}")))?;

            if encoder.is_empty() {
                return Err(Error::artifact(format!(
                    "encoder for column {column} has an empty vocabulary"
                )));
            }

            let mut seen = HashSet::new();
            if let Some(dup) = encoder.classes().iter().find(|c| !seen.insert(c.as_str())) {
                return Err(Error::artifact(format!(
                    "encoder for column {column} lists category '{dup}' twice"
                )));
            }
        }
        Ok(())
    }
}
