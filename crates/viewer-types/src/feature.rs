use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a feature, unique within one catalog.
///
/// The analysis service normally sends string ids (`"feat_1"`), but numeric
/// ids are accepted on the wire and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for FeatureId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => FeatureId(s),
            RawId::Unsigned(n) => FeatureId(n.to_string()),
            RawId::Signed(n) => FeatureId(n.to_string()),
        })
    }
}

/// A named region of the model identified by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    /// User-visible name, e.g. "Hole 1".
    pub name: String,
    /// Category label, e.g. "hole" or "fillet".
    #[serde(rename = "type")]
    pub kind: String,
    /// Source face indices reported by the analysis service.
    /// Not used for highlighting: the mesh asset carries no face index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub face_ids: Vec<u32>,
}

impl Feature {
    pub fn new(id: impl Into<FeatureId>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            face_ids: Vec::new(),
        }
    }

    /// Sidebar label: `"{name} ({type})"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}
