pub mod editor;
pub mod rebalance;
pub mod store;

pub use crate::domain::model::{Category, Distribution, Target};
pub use crate::domain::ports::{DistributionObserver, EditorConfigProvider, SettingsStore};
pub use crate::utils::error::Result;
