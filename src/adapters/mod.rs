// Adapters layer: concrete implementations of the settings accessor.

pub mod storage;

pub use storage::{JsonFileSettings, MemorySettings};
