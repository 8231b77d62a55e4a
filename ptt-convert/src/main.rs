//! ptt-convert - scheduling database to timetable interchange converter
//!
//! `convert` reads the scheduling database and writes the interchange
//! documents plus a snapshot. `describe` looks an entity up in a snapshot
//! by generated id, which is how scheduler output is translated back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ptt_common::config::{load_toml, resolve_config_file, CONFIG_ENV_VAR};
use ptt_common::{snapshot, EntityKind, GeneratedId};
use ptt_convert::settings::ConvertConfig;
use ptt_convert::source::SqliteSource;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for ptt-convert
#[derive(Parser, Debug)]
#[command(name = "ptt-convert")]
#[command(about = "Converts the scheduling database into timetable interchange documents")]
#[command(version)]
struct Args {
    /// Config file (overrides PTT_CONFIG and the per-user file)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build, filter and export every entity
    Convert {
        /// SQLite scheduling database
        #[arg(short, long, env = "PTT_DATABASE")]
        database: Option<PathBuf>,

        /// Output directory for documents and snapshot
        #[arg(short, long, env = "PTT_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the descriptive label of an entity in a snapshot
    Describe {
        #[arg(short, long)]
        snapshot: PathBuf,

        /// classroom, professor, student or subject
        #[arg(short, long)]
        kind: EntityKind,

        #[arg(short, long)]
        id: GeneratedId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_file(args.config.as_deref(), CONFIG_ENV_VAR);
    // Loaded before the subscriber because it sets the log level; the
    // origin is reported once logging is up
    let loaded = load_toml::<ConvertConfig>(config_path.as_deref())
        .context("Failed to load configuration")?;
    let mut config = loaded.config.clone();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting ptt-convert v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    loaded.log_origin();

    match args.command {
        Command::Convert { database, output } => {
            if let Some(database) = database {
                config.source.database_path = database;
            }
            if let Some(output) = output {
                config.export.directory = output;
            }

            info!("Database path: {}", config.source.database_path.display());
            let pool = SqliteSource::connect_readonly(&config.source.database_path)
                .await
                .context("Failed to open scheduling database")?;
            let records = SqliteSource::load(&pool, &config.source)
                .await
                .context("Failed to read scheduling records")?;
            pool.close().await;

            let output = config.export.directory.clone();
            ptt_convert::convert(&records, &config, &output)
                .with_context(|| format!("Conversion into {} failed", output.display()))?;
        }

        Command::Describe { snapshot, kind, id } => {
            let store = snapshot::load(&snapshot)
                .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
            let label = store.describe(kind, id)?;
            println!("{}", label);
        }
    }

    Ok(())
}
