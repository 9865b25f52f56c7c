use anyhow::Context;
use clap::Parser;
use mock_sync::config::toml_config::TomlConfig;
use mock_sync::utils::logger::{self, LogFormat};
use mock_sync::utils::validation;
use mock_sync::{ImportEngine, JsonDocumentFormat, LocalStorage};

#[derive(Parser)]
#[command(name = "export_snapshot")]
#[command(about = "Export the configuration store as a snapshot document")]
struct Args {
    /// Store file to export
    #[arg(short, long, default_value = "./mock-store.json")]
    store: String,

    /// Output file; a .zip extension packs the snapshot into an archive
    #[arg(short, long)]
    output: Option<String>,

    /// Take the output location from the [export] section of a TOML configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, LogFormat::Compact);

    let output = match (&args.output, &args.config) {
        (Some(output), _) => output.clone(),
        (None, Some(path)) => export_path_from_toml(path)?,
        (None, None) => format!(
            "./mock-snapshot-{}.json",
            chrono::Utc::now().format("%Y%m%d%H%M%S")
        ),
    };

    validation::validate_file_path("output", &output, &["json", "zip"])?;

    let format = if args.compact {
        JsonDocumentFormat::compact()
    } else {
        JsonDocumentFormat::new()
    };
    let engine = ImportEngine::new(LocalStorage::new("."), format);

    let store = engine
        .load_store(&args.store)
        .await
        .with_context(|| format!("loading store '{}'", args.store))?;
    let written = engine
        .export_snapshot(&store, &output)
        .await
        .with_context(|| format!("writing snapshot '{}'", output))?;

    println!("✅ Exported {} service(s)", store.len());
    println!("📁 Snapshot saved to: {}", written);
    Ok(())
}

fn export_path_from_toml(path: &str) -> anyhow::Result<String> {
    let config = TomlConfig::from_file(path).with_context(|| format!("loading config '{}'", path))?;
    let export = config
        .export
        .context("the configuration has no [export] section")?;

    let filename = export.filename.unwrap_or_else(|| {
        let extension = if export.archive.unwrap_or(false) { "zip" } else { "json" };
        format!("mock-snapshot.{}", extension)
    });

    Ok(std::path::Path::new(&export.output_path)
        .join(filename)
        .to_string_lossy()
        .into_owned())
}
