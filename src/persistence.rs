//! JSON snapshots of datasets
//!
//! Unlike the text format, a snapshot keeps each vector's logical length, so
//! implicit zero tails survive a save/load cycle. Non-finite floats are
//! written as the strings "NaN", "inf" and "-inf", since JSON numbers cannot
//! hold them.

use crate::core::{DataError, DataVector, LabeledExample, Result, WeightLabel};
use crate::data::LabeledDataset;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serializable representation of a dataset
#[derive(Serialize, Deserialize)]
pub struct DatasetSnapshot {
    /// Examples in insertion order
    pub examples: Vec<SerializableExample>,
    /// Snapshot metadata
    pub metadata: SnapshotMetadata,
}

/// Serializable example representation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SerializableExample {
    /// Stored feature values
    #[serde(with = "json_float::vec")]
    pub values: Vec<f64>,
    /// Logical length, at least `values.len()`
    pub logical_len: usize,
    #[serde(with = "json_float")]
    pub weight: f64,
    #[serde(with = "json_float")]
    pub label: f64,
}

/// Serde adapter keeping NaN and infinities intact in JSON
mod json_float {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    struct JsonFloat(#[serde(with = "crate::persistence::json_float")] f64);

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float: {other}"))),
            },
        }
    }

    pub mod vec {
        use super::JsonFloat;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|&v| JsonFloat(v)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<f64>, D::Error> {
            let values = Vec::<JsonFloat>::deserialize(deserializer)?;
            Ok(values.into_iter().map(|v| v.0).collect())
        }
    }
}

/// Metadata recorded alongside a snapshot
#[derive(Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Library version used to create the snapshot
    pub library_version: String,
    pub num_examples: usize,
    pub num_features: usize,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl From<&LabeledExample> for SerializableExample {
    fn from(example: &LabeledExample) -> Self {
        let data = example.data_ref();
        Self {
            values: data.to_array(),
            logical_len: data.logical_len(),
            weight: example.weight(),
            label: example.label(),
        }
    }
}

impl From<&SerializableExample> for LabeledExample {
    fn from(e: &SerializableExample) -> Self {
        LabeledExample::with_metadata(
            DataVector::with_logical_len(e.values.clone(), e.logical_len),
            WeightLabel::new(e.weight, e.label),
        )
    }
}

impl DatasetSnapshot {
    /// Capture the current contents of a dataset
    pub fn from_dataset(dataset: &LabeledDataset) -> Self {
        Self {
            examples: dataset.iter().map(SerializableExample::from).collect(),
            metadata: SnapshotMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                num_examples: dataset.num_examples(),
                num_features: dataset.num_features(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Rebuild a dataset, keeping weights and logical lengths
    pub fn to_dataset(&self) -> LabeledDataset {
        let mut dataset = LabeledDataset::with_num_features(self.metadata.num_features);
        dataset.extend(self.examples.iter().map(LabeledExample::from));
        dataset
    }

    /// Save snapshot to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| DataError::open(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| DataError::SerializationError(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Load snapshot from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::open(path, e))?;
        let reader = BufReader::new(file);
        let snapshot = serde_json::from_reader(reader)
            .map_err(|e| DataError::SerializationError(e.to_string()))?;
        Ok(snapshot)
    }
}

impl LabeledDataset {
    /// Save the dataset as a JSON snapshot
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        DatasetSnapshot::from_dataset(self).save_to_file(path)
    }

    /// Load a dataset from a JSON snapshot
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(DatasetSnapshot::load_from_file(path)?.to_dataset())
    }
}
