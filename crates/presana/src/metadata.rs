use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Cost-scoring strategy the backend uses to rank routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Linear,
    #[value(name = "rf")]
    #[serde(rename = "rf")]
    RandomForest,
}

impl ModelKind {
    /// Identifier used on the wire and as the metadata key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::RandomForest => "rf",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear Regression",
            Self::RandomForest => "Random Forest",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "linear" => Some(Self::Linear),
            "rf" => Some(Self::RandomForest),
            _ => None,
        }
    }

    pub fn all() -> &'static [ModelKind] {
        &[ModelKind::Linear, ModelKind::RandomForest]
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Learned linear-regression coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub w_distance: f64,
    pub w_traffic: f64,
    pub w_quality_inv: f64,
    pub intercept: f64,
}

/// Normalized random-forest feature importances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportances {
    pub distance: f64,
    pub traffic: f64,
    pub quality_inv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestImportances {
    pub feature_importances: FeatureImportances,
}

/// Per-model metadata as fetched with the network. Unknown model keys are ignored
/// and a malformed entry reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub linear: Option<LinearWeights>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub rf: Option<ForestImportances>,
}

/// Decode `T`, or `None` when the value is null or has the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry<T> {
        Valid(T),
        Malformed(serde::de::IgnoredAny),
    }

    match Option::<Entry<T>>::deserialize(deserializer)? {
        Some(Entry::Valid(value)) => Ok(Some(value)),
        Some(Entry::Malformed(_)) => {
            tracing::warn!("ignoring malformed model metadata entry");
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Borrowed view of one model's metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelMetadata<'a> {
    Linear(&'a LinearWeights),
    RandomForest(&'a ForestImportances),
}

impl MetadataSnapshot {
    /// Look up metadata by model identifier. Unrecognised identifiers have no metadata.
    pub fn get(&self, model_id: &str) -> Option<ModelMetadata<'_>> {
        match ModelKind::from_id(model_id)? {
            ModelKind::Linear => self.linear.as_ref().map(ModelMetadata::Linear),
            ModelKind::RandomForest => self.rf.as_ref().map(ModelMetadata::RandomForest),
        }
    }
}

/// Human-readable summary of the selected model's metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataSummary {
    Available { title: &'static str, body: String },
    NoData,
}

impl MetadataSummary {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

impl fmt::Display for MetadataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { title, body } => write!(f, "{title}: {body}"),
            Self::NoData => f.write_str("No metadata available for this model."),
        }
    }
}

/// Derive the summary for `model_id` from an already-fetched snapshot.
///
/// Never fails: missing or unrecognised models yield [`MetadataSummary::NoData`].
pub fn summary(model_id: &str, metadata: &MetadataSnapshot) -> MetadataSummary {
    match metadata.get(model_id) {
        Some(ModelMetadata::Linear(w)) => MetadataSummary::Available {
            title: "Learned Cost Weights (Linear Regression)",
            body: format!(
                "Distance: {:.3} | Traffic: {:.3} | Inverse Quality: {:.3} | Intercept: {:.3}",
                w.w_distance, w.w_traffic, w.w_quality_inv, w.intercept
            ),
        },
        Some(ModelMetadata::RandomForest(rf)) => {
            let fi = &rf.feature_importances;
            MetadataSummary::Available {
                title: "Feature Importances (Random Forest)",
                body: format!(
                    "Distance: {:.3} | Traffic: {:.3} | Inverse Quality: {:.3}",
                    fi.distance, fi.traffic, fi.quality_inv
                ),
            }
        }
        None => MetadataSummary::NoData,
    }
}
