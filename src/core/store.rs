use crate::domain::model::{Distribution, Target};
use crate::domain::ports::SettingsStore;
use crate::utils::error::{RatioError, Result};
use std::collections::HashMap;

/// Current distribution of every target, in target declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionStore {
    targets: Vec<Target>,
    distributions: HashMap<Target, Distribution>,
}

impl DistributionStore {
    /// Load each target from `settings`, falling back to a copy of `default`.
    pub fn initialize<S: SettingsStore + ?Sized>(
        targets: &[Target],
        settings: &S,
        default: &Distribution,
    ) -> Self {
        let mut distributions = HashMap::with_capacity(targets.len());
        for target in targets {
            let distribution = match settings.get(target.as_str()) {
                Some(stored) => {
                    tracing::debug!("Loaded stored distribution for {}", target);
                    stored
                }
                None => {
                    tracing::debug!("No stored distribution for {}, using default", target);
                    default.clone()
                }
            };
            distributions.insert(target.clone(), distribution);
        }

        Self {
            targets: targets.to_vec(),
            distributions,
        }
    }

    pub fn get(&self, target: &Target) -> Option<&Distribution> {
        self.distributions.get(target)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Targets with their distributions, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Target, &Distribution)> {
        self.targets
            .iter()
            .filter_map(|t| self.distributions.get(t).map(|d| (t, d)))
    }

    /// Swap in a whole new distribution for one target.
    pub fn replace(&mut self, target: &Target, distribution: Distribution) -> Result<()> {
        match self.distributions.get_mut(target) {
            Some(slot) => {
                *slot = distribution;
                Ok(())
            }
            None => Err(RatioError::UnknownTarget {
                target: target.to_string(),
            }),
        }
    }

    /// A fresh mapping giving every target its own copy of `preset`.
    pub fn with_preset(&self, preset: &Distribution) -> HashMap<Target, Distribution> {
        self.targets
            .iter()
            .map(|t| (t.clone(), preset.clone()))
            .collect()
    }

    pub fn apply_preset(&mut self, preset: &Distribution) {
        self.distributions = self.with_preset(preset);
    }
}

/// Persist one target's distribution through the settings accessor.
pub fn commit<S: SettingsStore + ?Sized>(
    settings: &mut S,
    target: &Target,
    distribution: &Distribution,
) -> Result<()> {
    settings.set(target.as_str(), distribution.clone())?;
    tracing::debug!("Committed distribution for {}", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemorySettings;

    fn targets() -> Vec<Target> {
        vec![Target::from("slave"), Target::from("slaver")]
    }

    fn fifty_fifty() -> Distribution {
        Distribution::new().with("male", 0.5).with("female", 0.5)
    }

    #[test]
    fn test_initialize_prefers_stored_values() {
        let mut settings = MemorySettings::new();
        settings
            .set("slave", Distribution::new().with("female", 1.0))
            .unwrap();

        let store = DistributionStore::initialize(&targets(), &settings, &fifty_fifty());

        assert_eq!(store.get(&"slave".into()).unwrap().get(&"female".into()), 1.0);
        assert_eq!(store.get(&"slaver".into()), Some(&fifty_fifty()));
    }

    #[test]
    fn test_preset_copies_are_independent() {
        let settings = MemorySettings::new();
        let mut store = DistributionStore::initialize(&targets(), &settings, &fifty_fifty());

        store.apply_preset(&Distribution::new().with("male", 1.0));
        store
            .replace(&"slave".into(), Distribution::new().with("female", 1.0))
            .unwrap();

        assert_eq!(store.get(&"slaver".into()).unwrap().get(&"male".into()), 1.0);
        assert_eq!(store.get(&"slave".into()).unwrap().get(&"male".into()), 0.0);
    }

    #[test]
    fn test_replace_rejects_unknown_target() {
        let settings = MemorySettings::new();
        let mut store = DistributionStore::initialize(&targets(), &settings, &fifty_fifty());

        let err = store.replace(&"npc".into(), fifty_fifty()).unwrap_err();
        assert!(matches!(err, RatioError::UnknownTarget { .. }));
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let settings = MemorySettings::new();
        let store = DistributionStore::initialize(&targets(), &settings, &fifty_fifty());

        let order: Vec<&str> = store.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["slave", "slaver"]);
    }

    #[test]
    fn test_commit_writes_through() {
        let mut settings = MemorySettings::new();
        commit(&mut settings, &"slave".into(), &fifty_fifty()).unwrap();
        assert_eq!(settings.get("slave"), Some(fifty_fifty()));
    }
}
