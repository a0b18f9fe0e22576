use crate::domain::model::{
    CategoryInfo, CategoryRegistry, Distribution, Preset, TargetSpec, SUM_TOLERANCE,
};
use crate::domain::ports::EditorConfigProvider;
use crate::utils::error::{RatioError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub editor: EditorSection,
    pub storage: Option<StorageConfig>,
    pub categories: Vec<CategoryInfo>,
    pub targets: Vec<TargetSpec>,
    pub default_distribution: Distribution,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSection {
    pub name: String,
    pub description: Option<String>,
    pub slider_step: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub settings_path: Option<String>,
}

impl EditorConfig {
    pub const DEFAULT_SLIDER_STEP: u32 = 5;

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RatioError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RatioError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RatioError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("editor.name", &self.editor.name)?;
        validation::validate_range("editor.slider_step", self.slider_step(), 1, 100)?;

        // 類別至少兩個，且鍵值不可重複
        validation::validate_min_count("categories", self.categories.len(), 2)?;
        validation::validate_unique(
            "categories",
            self.categories.iter().map(|c| c.key.as_str()),
        )?;
        for category in &self.categories {
            validation::validate_non_empty_string("categories.key", category.key.as_str())?;
        }

        validation::validate_min_count("targets", self.targets.len(), 1)?;
        validation::validate_unique("targets", self.targets.iter().map(|t| t.key.as_str()))?;

        // 預設分佈必須總和為 1
        self.validate_distribution("default_distribution", &self.default_distribution)?;
        if !self.default_distribution.is_normalized() {
            return Err(RatioError::InvalidConfigValueError {
                field: "default_distribution".to_string(),
                value: self.default_distribution.total().to_string(),
                reason: "Ratios must sum to 1".to_string(),
            });
        }

        // 預設組合允許總和小於 1
        validation::validate_unique("presets", self.presets.iter().map(|p| p.name.as_str()))?;
        for preset in &self.presets {
            let field = format!("presets.{}", preset.name);
            self.validate_distribution(&field, &preset.distribution)?;
            if preset.distribution.total() > 1.0 + SUM_TOLERANCE {
                return Err(RatioError::InvalidConfigValueError {
                    field,
                    value: preset.distribution.total().to_string(),
                    reason: "Ratios must not sum to more than 1".to_string(),
                });
            }
        }

        if let Some(path) = self.settings_path() {
            validation::validate_path("storage.settings_path", path)?;
        }

        Ok(())
    }

    fn validate_distribution(&self, field: &str, distribution: &Distribution) -> Result<()> {
        let registry = self.registry();
        for (category, ratio) in distribution.iter() {
            if !registry.contains(category) {
                return Err(RatioError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: category.to_string(),
                    reason: "Not a configured category".to_string(),
                });
            }
            validation::validate_range(&format!("{}.{}", field, category), ratio, 0.0, 1.0)?;
        }
        Ok(())
    }

    pub fn registry(&self) -> CategoryRegistry {
        CategoryRegistry::new(self.categories.clone())
    }

    /// 取得設定檔路徑
    pub fn settings_path(&self) -> Option<&str> {
        self.storage.as_ref().and_then(|s| s.settings_path.as_deref())
    }

    /// 取得滑桿步進值 (百分比)
    pub fn slider_step(&self) -> u32 {
        self.editor.slider_step.unwrap_or(Self::DEFAULT_SLIDER_STEP)
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }
}

impl EditorConfigProvider for EditorConfig {
    fn categories(&self) -> CategoryRegistry {
        self.registry()
    }

    fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    fn presets(&self) -> &[Preset] {
        &self.presets
    }

    fn default_distribution(&self) -> Distribution {
        self.default_distribution.clone()
    }

    fn slider_step(&self) -> u32 {
        self.slider_step()
    }
}

impl Validate for EditorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[editor]
name = "test-editor"
slider_step = 10

[[categories]]
key = "male"
name = "Male"
capabilities = ["dick"]

[[categories]]
key = "female"
name = "Female"
capabilities = ["vagina", "breast"]

[[targets]]
key = "$settings.gender_preference.slave"
label = "Slave"

[default_distribution]
male = 0.5
female = 0.5

[[presets]]
name = "all male"
distribution = { male = 1.0 }
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = EditorConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.editor.name, "test-editor");
        assert_eq!(config.slider_step(), 10);
        assert_eq!(config.categories.len(), 2);
        assert!(config.categories[1].has("breast"));
        assert_eq!(config.targets[0].label, "Slave");
        assert_eq!(
            config.preset("all male").unwrap().distribution.get(&"male".into()),
            1.0
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RATIO_MIX_TEST_SETTINGS", "/tmp/ratio-settings.json");

        let content = format!(
            "{}\n[storage]\nsettings_path = \"${{RATIO_MIX_TEST_SETTINGS}}\"\n",
            BASIC
        );
        let config = EditorConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.settings_path(), Some("/tmp/ratio-settings.json"));

        std::env::remove_var("RATIO_MIX_TEST_SETTINGS");
    }

    #[test]
    fn test_default_distribution_must_sum_to_one() {
        let content = BASIC.replace("female = 0.5\n\n[[presets]]", "female = 0.2\n\n[[presets]]");
        let config = EditorConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_with_unknown_category_is_rejected() {
        let content = BASIC.replace("distribution = { male = 1.0 }", "distribution = { robot = 1.0 }");
        let config = EditorConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_may_sum_below_one() {
        let content = BASIC.replace("distribution = { male = 1.0 }", "distribution = { male = 0.4 }");
        let config = EditorConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let content = BASIC.replace("key = \"female\"", "key = \"male\"");
        let config = EditorConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = EditorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.editor.name, "test-editor");
    }
}
