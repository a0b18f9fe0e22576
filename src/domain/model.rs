use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Sum tolerance used when checking that a distribution is normalized.
pub const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Role or context owning one distribution; doubles as its settings key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Partial mapping from category to ratio. Absent categories read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<Category, f64>);

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &Category) -> f64 {
        self.0.get(category).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.0.contains_key(category)
    }

    pub fn set(&mut self, category: Category, ratio: f64) {
        self.0.insert(category, ratio);
    }

    pub fn with(mut self, category: impl Into<Category>, ratio: f64) -> Self {
        self.set(category.into(), ratio);
        self
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() <= SUM_TOLERANCE
    }

    /// Sum over `categories` only; keys outside the list are ignored.
    pub fn total_over(&self, categories: &[Category]) -> f64 {
        categories.iter().map(|c| self.get(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64)> {
        self.0.iter().map(|(c, r)| (c, *r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Category, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Static, display-only metadata about one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub key: Category,
    pub name: String,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl CategoryInfo {
    pub fn has(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Ordered category set. Order decides saturation tie-breaks in the rebalancer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    entries: Vec<CategoryInfo>,
    keys: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new(entries: Vec<CategoryInfo>) -> Self {
        let keys = entries.iter().map(|e| e.key.clone()).collect();
        Self { entries, keys }
    }

    pub fn keys(&self) -> &[Category] {
        &self.keys
    }

    pub fn entries(&self) -> &[CategoryInfo] {
        &self.entries
    }

    pub fn get(&self, key: &Category) -> Option<&CategoryInfo> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn contains(&self, key: &Category) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub key: Target,
    pub label: String,
}

/// Named template applied to every target at once. May sum to less than 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub distribution: Distribution,
}
