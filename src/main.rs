use clap::Parser;
use mock_sync::adapters::source::source_for;
use mock_sync::config::toml_config::TomlConfig;
use mock_sync::core::ConfigProvider;
use mock_sync::utils::error::ErrorSeverity;
use mock_sync::utils::logger::{self, LogFormat};
use mock_sync::utils::validation::Validate;
use mock_sync::{CliConfig, ImportEngine, ImportError, JsonDocumentFormat, LocalStorage, ReconciliationReport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // TOML 設定只補上命令列沒給的值
    let mut json_logs = config.log_json;
    if let Some(path) = config.config.clone() {
        match TomlConfig::from_file(&path) {
            Ok(toml) => {
                json_logs = json_logs || toml.json_logs();
                config.apply_toml(&toml);
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    }

    logger::init_logger(config.verbose, LogFormat::from_flag(json_logs));

    tracing::info!("Starting mock-sync import");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(report) => {
            tracing::info!("✅ Import finished: {}", report.summary());
            print_report(&report, config.json_report)?;
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<ReconciliationReport, ImportError> {
    let storage = LocalStorage::new(".");
    let engine = ImportEngine::new(storage.clone(), JsonDocumentFormat::new());

    let mut store = engine.load_store(config.store_path()).await?;
    let source = source_for(
        config.source_location(),
        storage,
        config.request_timeout(),
        config.header_map()?,
    )?;

    let report = engine.import_from(&mut store, source.as_ref()).await?;

    if config.dry_run() {
        tracing::info!("🔍 DRY RUN MODE - store '{}' was not modified", config.store_path());
    } else {
        engine.save_store(&store, config.store_path()).await?;
        tracing::info!("💾 Store saved to: {}", config.store_path());
    }

    Ok(report)
}

fn print_report(report: &ReconciliationReport, as_json: bool) -> Result<(), serde_json::Error> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for message in report.additions() {
        println!("➕ {}", message);
    }
    for message in report.merges() {
        println!("🔀 {}", message);
    }
    for message in report.conflicts() {
        println!("⚠️  {}", message);
    }
    println!("✅ {}", report.summary());
    Ok(())
}
