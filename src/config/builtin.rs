use crate::config::toml_config::{EditorConfig, EditorSection};
use crate::domain::model::{CategoryInfo, Distribution, Preset, TargetSpec};
use std::collections::BTreeSet;

fn category(key: &str, name: &str, capabilities: &[&str]) -> CategoryInfo {
    CategoryInfo {
        key: key.into(),
        name: name.to_string(),
        capabilities: capabilities.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
    }
}

fn target(key: &str, label: &str) -> TargetSpec {
    TargetSpec {
        key: key.into(),
        label: label.to_string(),
    }
}

fn preset(name: &str, distribution: Distribution) -> Preset {
    Preset {
        name: name.to_string(),
        distribution,
    }
}

impl EditorConfig {
    /// Sex/gender preference editor used when no configuration file is given.
    pub fn builtin() -> Self {
        Self {
            editor: EditorSection {
                name: "sex-gender-preferences".to_string(),
                description: Some(
                    "How often units of each sex/gender are encountered, per role".to_string(),
                ),
                slider_step: Some(Self::DEFAULT_SLIDER_STEP),
            },
            storage: None,
            categories: vec![
                category("male", "Male", &["dick"]),
                category("female", "Female", &["vagina", "breast"]),
                category("futa", "Futa", &["dick", "vagina", "breast"]),
            ],
            targets: vec![
                target("$settings.gender_preference.slave", "Slave"),
                target("$settings.gender_preference.slaver", "Slaver"),
                target("$settings.other_gender_preference", "Other (NPCs, etc.)"),
            ],
            default_distribution: Distribution::new().with("male", 0.5).with("female", 0.5),
            presets: vec![
                preset("all male", Distribution::new().with("male", 1.0)),
                preset("all female", Distribution::new().with("female", 1.0)),
                preset(
                    "fifty-fifty male/female",
                    Distribution::new().with("male", 0.5).with("female", 0.5),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_builtin_config_is_valid() {
        let config = EditorConfig::builtin();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.presets.len(), 3);
    }
}
