use crate::core::rebalance::rebalance;
use crate::core::store::{commit, DistributionStore};
use crate::domain::model::{
    Category, CategoryRegistry, Distribution, Preset, Target, TargetSpec, SUM_TOLERANCE,
};
use crate::domain::ports::{DistributionObserver, EditorConfigProvider, SettingsStore};
use crate::utils::error::{RatioError, Result};
use crate::utils::format::SliderInput;

/// Editing session over every configured target.
pub struct PreferenceEditor<S: SettingsStore> {
    categories: CategoryRegistry,
    targets: Vec<TargetSpec>,
    presets: Vec<Preset>,
    slider: SliderInput,
    settings: S,
    store: DistributionStore,
    observers: Vec<Box<dyn DistributionObserver>>,
}

impl<S: SettingsStore> PreferenceEditor<S> {
    pub fn new<C: EditorConfigProvider>(config: &C, settings: S) -> Self {
        let targets = config.targets().to_vec();
        let keys: Vec<Target> = targets.iter().map(|t| t.key.clone()).collect();
        let store = DistributionStore::initialize(&keys, &settings, &config.default_distribution());

        tracing::info!(
            "Editor ready: {} targets, {} categories, {} presets",
            targets.len(),
            config.categories().len(),
            config.presets().len()
        );

        Self {
            categories: config.categories(),
            targets,
            presets: config.presets().to_vec(),
            slider: SliderInput::new(config.slider_step()),
            settings,
            store,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O: DistributionObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn distribution(&self, target: &Target) -> Result<&Distribution> {
        self.store.get(target).ok_or_else(|| RatioError::UnknownTarget {
            target: target.to_string(),
        })
    }

    pub fn distributions(&self) -> impl Iterator<Item = (&Target, &Distribution)> {
        self.store.iter()
    }

    /// Whether any target currently gives `category` a non-zero share.
    pub fn is_category_in_use(&self, category: &Category) -> bool {
        self.store.iter().any(|(_, d)| d.get(category) > 0.0)
    }

    /// Set one category's ratio for a target, rebalance the rest and commit.
    pub fn set_ratio(&mut self, target: &Target, category: &Category, value: f64) -> Result<&Distribution> {
        if !self.categories.contains(category) {
            return Err(RatioError::UnknownCategory {
                category: category.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(RatioError::ValueOutOfRange {
                category: category.to_string(),
                value,
            });
        }

        let old = self.distribution(target)?;
        let next = rebalance(self.categories.keys(), old, category, value);
        let total = next.total_over(self.categories.keys());
        if (total - 1.0).abs() > SUM_TOLERANCE {
            tracing::warn!("Rebalanced distribution for {} sums to {}", target, total);
        }
        tracing::debug!("{} -> {}: {:?}", target, category, next);

        // persist first so a failed write leaves the session untouched
        commit(&mut self.settings, target, &next)?;
        self.store.replace(target, next)?;
        self.notify(target);

        self.distribution(target)
    }

    /// Like [`Self::set_ratio`], taking a raw slider percent.
    pub fn set_percent(&mut self, target: &Target, category: &Category, percent: f64) -> Result<&Distribution> {
        let value = self.slider.to_ratio(percent);
        self.set_ratio(target, category, value)
    }

    /// Give every target a copy of the named preset and commit them all.
    pub fn apply_preset(&mut self, name: &str) -> Result<()> {
        let preset = self
            .presets
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.distribution.clone())
            .ok_or_else(|| RatioError::UnknownPreset {
                preset: name.to_string(),
            })?;

        let previous: Vec<(Target, Distribution)> = self
            .store
            .iter()
            .map(|(t, d)| (t.clone(), d.clone()))
            .collect();
        for (index, (target, _)) in previous.iter().enumerate() {
            if let Err(e) = commit(&mut self.settings, target, &preset) {
                self.restore_settings(&previous[..index]);
                return Err(e);
            }
        }

        self.store.apply_preset(&preset);
        let targets: Vec<Target> = self.store.targets().to_vec();
        for target in &targets {
            self.notify(target);
        }

        tracing::info!("Applied preset '{}' to {} targets", name, targets.len());
        Ok(())
    }

    /// Write back the values of targets committed before a failed preset.
    fn restore_settings(&mut self, committed: &[(Target, Distribution)]) {
        for (target, distribution) in committed {
            if let Err(e) = commit(&mut self.settings, target, distribution) {
                tracing::warn!("⚠️ Could not restore stored settings for {}: {}", target, e);
            }
        }
    }

    fn notify(&mut self, target: &Target) {
        if let Some(distribution) = self.store.get(target) {
            for observer in &mut self.observers {
                observer.on_change(target, distribution);
            }
        }
    }
}
