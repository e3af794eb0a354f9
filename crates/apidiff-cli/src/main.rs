//! apidiff CLI entrypoint
//! Parses command-line arguments and dispatches to the core comparison engine.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use apidiff_core::{ComparisonLevel, Config, LogSummary, ParseFormat};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Compare endpoints across two or more captured traffic logs
    Compare {
        /// Traffic logs to compare (JSON array, wrapped entries or one entry per line)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory the report is written to (default: from config, else ./output)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// How much of each exchange to diff
        #[arg(long, value_enum)]
        comparison_level: Option<ComparisonLevel>,
        /// Config file (YAML, or TOML with a .toml extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum number of logs accepted in one run
        #[arg(long)]
        max_sources: Option<usize>,
    },
    /// Parse a traffic log and save it as `<name>_parsed.json`
    Parse {
        /// Traffic log to parse
        file: PathBuf,
        /// Directory the parsed log is written to
        #[arg(long, default_value = "./output")]
        output_dir: PathBuf,
        /// Output shape
        #[arg(long, value_enum, default_value_t = ParseFormat::Detailed)]
        format: ParseFormat,
    },
    /// Print request, status, host and timing statistics of a traffic log
    Summarize {
        /// Traffic log to summarize
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging on stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command).await {
        tracing::error!("{:#}", err);
        let response = match err.downcast_ref::<apidiff_core::Error>() {
            Some(core) => json!(core.to_response()),
            None => json!({ "error": format!("{:#}", err) }),
        };
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Compare {
            files,
            output_dir,
            comparison_level,
            config,
            max_sources,
        } => {
            // Load config, then let flags override it
            let mut config = match config {
                Some(path) => Config::from_file(&path)
                    .await
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => Config::discover().await?,
            };
            if let Some(level) = comparison_level {
                config.comparison_level = level;
            }
            if let Some(max) = max_sources {
                config.max_sources = max;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.to_string_lossy().to_string();
            }

            tracing::info!(
                "Comparing {} sources at {} level",
                files.len(),
                config.comparison_level
            );
            let report = apidiff_core::compare_files(&files, &config).await?;
            tracing::info!(
                "{} of {} shared endpoints differ",
                report.endpoints_with_changes,
                report.total_endpoints
            );

            let saved = report.save_to_dir(&config.output_dir).await?;
            tracing::info!("Report saved to {}", saved.display());

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Parse {
            file,
            output_dir,
            format,
        } => {
            tracing::info!("Parsing {} as {}", file.display(), format);
            let output_file = apidiff_core::ingest::parse_and_save(&file, &output_dir, format).await?;
            let result = json!({
                "status": "success",
                "message": format!("Successfully parsed and saved to {}", output_file.display()),
                "output_file": output_file,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Summarize { file } => {
            let source = apidiff_core::load_source(&file).await?;
            let summary = LogSummary::from_entries(&source.entries);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
