use anyhow::Result;
use ratio_mix::core::SettingsStore;
use ratio_mix::{
    Category, Distribution, EditorConfig, JsonFileSettings, MemorySettings, PreferenceEditor,
    RatioError, Target,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

const SLAVE: &str = "$settings.gender_preference.slave";
const SLAVER: &str = "$settings.gender_preference.slaver";
const OTHER: &str = "$settings.other_gender_preference";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_targets_start_from_default_distribution() {
    let editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());

    for target in [SLAVE, SLAVER, OTHER] {
        let distr = editor.distribution(&Target::from(target)).unwrap();
        assert_eq!(distr.get(&"male".into()), 0.5);
        assert_eq!(distr.get(&"female".into()), 0.5);
        assert_eq!(distr.get(&"futa".into()), 0.0);
    }
    assert!(editor.is_category_in_use(&"male".into()));
    assert!(!editor.is_category_in_use(&"futa".into()));
}

#[test]
fn test_set_ratio_rebalances_and_commits() -> Result<()> {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());
    let slave = Target::from(SLAVE);

    let distr = editor.set_ratio(&slave, &"futa".into(), 0.2)?.clone();

    // male still fits in the 0.8 remainder, female absorbs the change
    assert!(close(distr.get(&"futa".into()), 0.2));
    assert!(close(distr.get(&"male".into()), 0.5));
    assert!(close(distr.get(&"female".into()), 0.3));
    assert!(distr.is_normalized());

    let stored = editor.settings().get(SLAVE).expect("edit should be committed");
    assert_eq!(stored, distr);
    assert!(editor.settings().get(SLAVER).is_none());

    // other targets are untouched
    let slaver = editor.distribution(&Target::from(SLAVER))?;
    assert_eq!(slaver.get(&"futa".into()), 0.0);
    assert!(editor.is_category_in_use(&"futa".into()));
    Ok(())
}

#[test]
fn test_set_percent_snaps_to_slider_step() -> Result<()> {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());
    let slaver = Target::from(SLAVER);

    let distr = editor.set_percent(&slaver, &"female".into(), 72.0)?;
    assert_eq!(distr.get(&"female".into()), 0.7);
    assert!(close(distr.get(&"male".into()), 0.3));

    let distr = editor.set_percent(&slaver, &"female".into(), 140.0)?;
    assert_eq!(distr.get(&"female".into()), 1.0);
    assert!(close(distr.get(&"male".into()), 0.0));
    Ok(())
}

#[test]
fn test_invalid_edits_are_rejected() {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());
    let slave = Target::from(SLAVE);

    let err = editor
        .set_ratio(&Target::from("nobody"), &"male".into(), 0.5)
        .unwrap_err();
    assert!(matches!(err, RatioError::UnknownTarget { .. }));

    let err = editor.set_ratio(&slave, &"robot".into(), 0.5).unwrap_err();
    assert!(matches!(err, RatioError::UnknownCategory { .. }));

    let err = editor.set_ratio(&slave, &"male".into(), 1.5).unwrap_err();
    assert!(matches!(err, RatioError::ValueOutOfRange { .. }));

    let err = editor.set_ratio(&slave, &"male".into(), f64::NAN).unwrap_err();
    assert!(matches!(err, RatioError::ValueOutOfRange { .. }));

    let err = editor.apply_preset("all robots").unwrap_err();
    assert!(matches!(err, RatioError::UnknownPreset { .. }));

    assert!(editor.settings().is_empty());
}

#[test]
fn test_preset_applies_independent_copies() -> Result<()> {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());

    editor.apply_preset("all male")?;
    for target in [SLAVE, SLAVER, OTHER] {
        let expected = Distribution::new().with("male", 1.0);
        assert_eq!(editor.distribution(&Target::from(target))?, &expected);
        assert_eq!(editor.settings().get(target), Some(expected));
    }

    editor.set_ratio(&Target::from(SLAVE), &"female".into(), 0.5)?;
    let slaver = editor.distribution(&Target::from(SLAVER))?;
    assert_eq!(slaver.get(&"male".into()), 1.0);
    assert_eq!(slaver.get(&"female".into()), 0.0);
    Ok(())
}

#[test]
fn test_observers_see_every_replacement() -> Result<()> {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), MemorySettings::new());
    let seen: Rc<RefCell<Vec<(Target, Distribution)>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    editor.subscribe(move |target: &Target, distribution: &Distribution| {
        sink.borrow_mut().push((target.clone(), distribution.clone()));
    });

    editor.set_ratio(&Target::from(OTHER), &Category::from("male"), 0.25)?;
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].0, Target::from(OTHER));
    assert_eq!(seen.borrow()[0].1.get(&"male".into()), 0.25);

    editor.apply_preset("all female")?;
    assert_eq!(seen.borrow().len(), 4);
    Ok(())
}

#[test]
fn test_stored_settings_survive_a_new_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.json");
    let config = EditorConfig::builtin();

    {
        let mut editor = PreferenceEditor::new(&config, JsonFileSettings::open(&path)?);
        editor.set_ratio(&Target::from(SLAVER), &"female".into(), 0.8)?;
    }

    let editor = PreferenceEditor::new(&config, JsonFileSettings::open(&path)?);
    let slaver = editor.distribution(&Target::from(SLAVER))?;
    assert_eq!(slaver.get(&"female".into()), 0.8);
    assert!(close(slaver.get(&"male".into()), 0.2));

    // never edited, so still the default
    let slave = editor.distribution(&Target::from(SLAVE))?;
    assert_eq!(slave.get(&"male".into()), 0.5);
    Ok(())
}

#[test]
fn test_custom_default_distribution_from_toml() -> Result<()> {
    let config = EditorConfig::from_toml_str(
        r#"
[editor]
name = "faction-mix"

[[categories]]
key = "red"
name = "Red"

[[categories]]
key = "green"
name = "Green"

[[categories]]
key = "blue"
name = "Blue"

[[targets]]
key = "allies"
label = "Allies"

[default_distribution]
red = 0.2
green = 0.3
blue = 0.5
"#,
    )?;

    let mut editor = PreferenceEditor::new(&config, MemorySettings::new());
    let allies = Target::from("allies");
    assert_eq!(editor.distribution(&allies)?.get(&"blue".into()), 0.5);

    // blue grows: red (0.2) still fits in the 0.4 remainder, green absorbs the rest
    let distr = editor.set_ratio(&allies, &"blue".into(), 0.6)?;
    assert!(close(distr.get(&"red".into()), 0.2));
    assert!(close(distr.get(&"green".into()), 0.2));
    Ok(())
}

#[test]
fn test_shipped_config_matches_builtin_editor() -> Result<()> {
    use ratio_mix::utils::validation::Validate;

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/editor-config.toml");
    let config = EditorConfig::from_file(path)?;
    config.validate()?;

    let builtin = EditorConfig::builtin();
    assert_eq!(config.categories, builtin.categories);
    assert_eq!(config.targets, builtin.targets);
    assert_eq!(config.presets, builtin.presets);
    assert_eq!(config.default_distribution, builtin.default_distribution);
    Ok(())
}

/// Settings backend that refuses writes for one key.
struct RejectingSettings {
    inner: MemorySettings,
    rejected_key: String,
}

impl RejectingSettings {
    fn rejecting(key: &str) -> Self {
        Self {
            inner: MemorySettings::new(),
            rejected_key: key.to_string(),
        }
    }
}

impl SettingsStore for RejectingSettings {
    fn get(&self, key: &str) -> Option<Distribution> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Distribution) -> ratio_mix::Result<()> {
        if key == self.rejected_key {
            return Err(RatioError::IoError(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }
}

fn count_notifications<S: SettingsStore>(editor: &mut PreferenceEditor<S>) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    editor.subscribe(move |_: &Target, _: &Distribution| {
        *sink.borrow_mut() += 1;
    });
    count
}

#[test]
fn test_failed_commit_leaves_edit_unapplied() {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), RejectingSettings::rejecting(SLAVE));
    let notified = count_notifications(&mut editor);
    let slave = Target::from(SLAVE);

    let err = editor.set_ratio(&slave, &"futa".into(), 0.2).unwrap_err();
    assert!(matches!(err, RatioError::IoError(_)));

    let distr = editor.distribution(&slave).unwrap();
    assert_eq!(distr.get(&"futa".into()), 0.0);
    assert_eq!(distr.get(&"female".into()), 0.5);
    assert_eq!(*notified.borrow(), 0);
    assert!(editor.settings().get(SLAVE).is_none());
}

#[test]
fn test_failed_preset_rolls_back_every_target() {
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), RejectingSettings::rejecting(OTHER));
    let notified = count_notifications(&mut editor);
    let default = Distribution::new().with("male", 0.5).with("female", 0.5);

    assert!(editor.apply_preset("all male").is_err());

    for target in [SLAVE, SLAVER, OTHER] {
        assert_eq!(editor.distribution(&Target::from(target)).unwrap(), &default);
    }
    // targets written before the failure are restored to what the session shows
    assert_eq!(editor.settings().get(SLAVE), Some(default.clone()));
    assert_eq!(editor.settings().get(SLAVER), Some(default));
    assert_eq!(*notified.borrow(), 0);
}

#[test]
fn test_legacy_keys_do_not_count_toward_the_total() -> Result<()> {
    let mut settings = MemorySettings::new();
    settings.set(
        SLAVE,
        Distribution::new().with("male", 0.5).with("female", 0.5).with("retired", 0.3),
    )?;
    let mut editor = PreferenceEditor::new(&EditorConfig::builtin(), settings);
    let keys = editor.categories().keys().to_vec();

    let distr = editor.set_ratio(&Target::from(SLAVE), &"futa".into(), 0.2)?;

    assert!(close(distr.total_over(&keys), 1.0));
    assert_eq!(distr.get(&"retired".into()), 0.3);
    Ok(())
}
