pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonFileSettings, MemorySettings};
pub use config::EditorConfig;
pub use crate::core::{editor::PreferenceEditor, rebalance::rebalance, store::DistributionStore};
pub use domain::model::{Category, CategoryInfo, CategoryRegistry, Distribution, Preset, Target, TargetSpec};
pub use utils::error::{RatioError, Result};
