use crate::domain::model::{CategoryRegistry, Distribution, Preset, Target, TargetSpec};
use crate::utils::error::Result;

/// Persisted setting accessor, one key per target.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Distribution>;
    fn set(&mut self, key: &str, value: Distribution) -> Result<()>;
}

pub trait EditorConfigProvider {
    fn categories(&self) -> CategoryRegistry;
    fn targets(&self) -> &[TargetSpec];
    fn presets(&self) -> &[Preset];
    fn default_distribution(&self) -> Distribution;
    fn slider_step(&self) -> u32;
}

/// Notified after a target's distribution has been replaced.
pub trait DistributionObserver {
    fn on_change(&mut self, target: &Target, distribution: &Distribution);
}

impl<F> DistributionObserver for F
where
    F: FnMut(&Target, &Distribution),
{
    fn on_change(&mut self, target: &Target, distribution: &Distribution) {
        self(target, distribution)
    }
}
