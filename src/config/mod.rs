pub mod builtin;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, ExportFormat, LogFormat};
pub use toml_config::EditorConfig;
