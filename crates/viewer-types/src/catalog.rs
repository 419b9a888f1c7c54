use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureId};

/// Ordered, immutable snapshot of the features reported for one model.
///
/// Order is display order only. A catalog is never edited in place; a new
/// upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct FeatureCatalog {
    features: Vec<Feature>,
    index: HashMap<FeatureId, usize>,
}

impl FeatureCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(features: Vec<Feature>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(features.len());
        for (pos, feature) in features.iter().enumerate() {
            if index.insert(feature.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: feature.id.clone(),
                });
            }
        }
        Ok(Self { features, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: &FeatureId) -> Option<&Feature> {
        self.index.get(id).map(|&pos| &self.features[pos])
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn as_slice(&self) -> &[Feature] {
        &self.features
    }
}

impl TryFrom<Vec<Feature>> for FeatureCatalog {
    type Error = CatalogError;

    fn try_from(features: Vec<Feature>) -> Result<Self, Self::Error> {
        Self::new(features)
    }
}

impl From<FeatureCatalog> for Vec<Feature> {
    fn from(catalog: FeatureCatalog) -> Self {
        catalog.features
    }
}

impl<'a> IntoIterator for &'a FeatureCatalog {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Errors building a feature catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate feature id: {id}")]
    DuplicateId { id: FeatureId },
}
