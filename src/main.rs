use clap::Parser;
use ratio_mix::app::report;
use ratio_mix::config::{Command, LogFormat};
use ratio_mix::utils::error::ErrorSeverity;
use ratio_mix::utils::{logger, validation::Validate};
use ratio_mix::{CliConfig, EditorConfig, JsonFileSettings, PreferenceEditor};

const DEFAULT_SETTINGS_PATH: &str = "ratio-mix-settings.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting ratio-mix CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate().and_then(|_| run(&cli)) {
        tracing::error!(
            "❌ ratio-mix failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> ratio_mix::Result<EditorConfig> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            EditorConfig::from_file(path)?
        }
        None => {
            tracing::debug!("No configuration file given, using built-in editor");
            EditorConfig::builtin()
        }
    };
    config.validate()?;
    tracing::info!("✅ Configuration '{}' loaded and validated", config.editor.name);
    Ok(config)
}

fn run(cli: &CliConfig) -> ratio_mix::Result<()> {
    let config = load_config(cli)?;

    let settings_path = cli
        .settings
        .as_deref()
        .or(config.settings_path())
        .unwrap_or(DEFAULT_SETTINGS_PATH)
        .to_string();
    let settings = JsonFileSettings::open(&settings_path)?;

    let mut editor = PreferenceEditor::new(&config, settings);
    editor.subscribe(|target: &ratio_mix::Target, distribution: &ratio_mix::Distribution| {
        tracing::debug!("🔄 {} now {:?}", target, distribution);
    });

    match &cli.command {
        Command::Show => {
            if let Some(description) = &config.editor.description {
                println!("{}", description);
            }
            print!("{}", report::render_table(&editor));
        }
        Command::Set {
            target,
            category,
            percent,
        } => {
            let target = ratio_mix::Target::new(target.as_str());
            let category = ratio_mix::Category::new(category.as_str());
            editor.set_percent(&target, &category, *percent)?;
            tracing::info!(
                "✅ Updated {} in {}",
                category,
                report::target_label(&editor, &target)
            );
            print!("{}", report::render_table(&editor));
        }
        Command::Preset { name } => {
            editor.apply_preset(name)?;
            print!("{}", report::render_table(&editor));
        }
        Command::Presets => print!("{}", report::render_presets(&editor)),
        Command::Export { format, output } => match output {
            Some(path) => {
                let file = std::fs::File::create(path)?;
                report::write_delimited(&editor, format.delimiter(), file)?;
                tracing::info!("📁 Export saved to: {}", path);
            }
            None => report::write_delimited(&editor, format.delimiter(), std::io::stdout().lock())?,
        },
    }

    tracing::debug!("Settings stored in {}", editor.settings().path().display());
    Ok(())
}
