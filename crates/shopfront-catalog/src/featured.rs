//! Featured product ids

use crate::product::ProductId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Where a featured set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedSource {
    /// Hardcoded default ids
    Default,
    /// Flags on remote records
    Remote,
}

/// Insertion-ordered set of featured product ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeaturedSet {
    ids: IndexSet<ProductId>,
}

impl FeaturedSet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ids, dropping repeats
    #[must_use]
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ProductId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `id` is featured
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate ids in insertion order
    #[inline]
    pub fn iter(&self) -> indexmap::set::Iter<'_, ProductId> {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for FeaturedSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FeaturedSet {
    type Item = &'a ProductId;
    type IntoIter = indexmap::set::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
