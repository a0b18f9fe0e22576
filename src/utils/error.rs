use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatioError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown target: {target}")]
    UnknownTarget { target: String },

    #[error("Unknown category: {category}")]
    UnknownCategory { category: String },

    #[error("Unknown preset: {preset}")]
    UnknownPreset { preset: String },

    #[error("Ratio {value} for '{category}' is outside [0, 1]")]
    ValueOutOfRange { category: String, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RatioError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::CsvError(_) => ErrorCategory::Export,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::UnknownTarget { .. }
            | Self::UnknownCategory { .. }
            | Self::UnknownPreset { .. }
            | Self::ValueOutOfRange { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Export => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the settings file and its directory are readable and writable",
            Self::SerializationError(_) => {
                "The settings file is not valid JSON; fix it by hand or delete it to start from defaults"
            }
            Self::CsvError(_) => "Retry the export to a different output path",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Check the TOML syntax of the configuration file"
            }
            Self::InvalidConfigValueError { .. } => "Correct the highlighted configuration value",
            Self::UnknownTarget { .. } => "Run `ratio-mix show` to list the configured targets",
            Self::UnknownCategory { .. } => "Run `ratio-mix show` to list the configured categories",
            Self::UnknownPreset { .. } => "Run `ratio-mix presets` to list the available presets",
            Self::ValueOutOfRange { .. } => "Use a percentage between 0 and 100",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access the settings file: {}", e),
            Self::SerializationError(e) => format!("Stored settings are malformed: {}", e),
            Self::UnknownTarget { target } => format!("No role named '{}' is configured", target),
            Self::UnknownCategory { category } => {
                format!("No category named '{}' is configured", category)
            }
            Self::UnknownPreset { preset } => format!("No preset named '{}' exists", preset),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RatioError>;
