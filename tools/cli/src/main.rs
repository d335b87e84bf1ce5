//! jobstore CLI - Command line interface for storage provider operations.
//!
//! Every command resolves a provider from a JSON configuration record of the
//! form `{"backend_type", "name", "login", "active"}` and runs one operation
//! against it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use jobstore_common::{Category, JobId, StorageAddress, StorageLocation, StoragePath};
use jobstore_storage::{
    create_default_registry, short_backend_name, Document, ProviderConfig, StorageProvider,
};

#[derive(Parser)]
#[command(name = "jobstore")]
#[command(about = "jobstore - Job payload, result and status storage")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configured provider and report its state.
    Check {
        /// Provider configuration record (JSON).
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Upload a JSON document.
    Upload {
        /// Provider configuration record (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Category: queued, results or status.
        #[arg(long)]
        category: Category,

        /// Slash-separated storage path.
        #[arg(short, long)]
        path: StoragePath,

        /// Job identifier (generated when omitted).
        #[arg(short, long)]
        job_id: Option<JobId>,

        /// File holding the JSON object to upload, or "-" for stdin.
        #[arg(long)]
        content: PathBuf,
    },

    /// Print a stored document.
    Get {
        /// Provider configuration record (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Category: queued, results or status.
        #[arg(long)]
        category: Category,

        /// Slash-separated storage path.
        #[arg(short, long)]
        path: StoragePath,

        /// Job identifier.
        #[arg(short, long)]
        job_id: JobId,
    },

    /// Move a document to another path.
    Move {
        /// Provider configuration record (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Category of the source.
        #[arg(long)]
        category: Category,

        /// Category of the destination (default: same as source).
        #[arg(long)]
        to_category: Option<Category>,

        /// Source storage path.
        #[arg(short, long)]
        from: StoragePath,

        /// Destination storage path.
        #[arg(short, long)]
        to: StoragePath,

        /// Job identifier.
        #[arg(short, long)]
        job_id: JobId,
    },

    /// Delete a document. Missing documents are not an error.
    Delete {
        /// Provider configuration record (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Category: queued, results or status.
        #[arg(long)]
        category: Category,

        /// Slash-separated storage path.
        #[arg(short, long)]
        path: StoragePath,

        /// Job identifier.
        #[arg(short, long)]
        job_id: JobId,
    },

    /// Resolve the short backend name of a composite routing name.
    ShortName {
        /// Composite name, e.g. "alqor_tests_simulator".
        composite: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Check { config } => cmd_check(&config).await,

        Commands::Upload {
            config,
            category,
            path,
            job_id,
            content,
        } => cmd_upload(&config, category, path, job_id, &content).await,

        Commands::Get {
            config,
            category,
            path,
            job_id,
        } => cmd_get(&config, StorageAddress::new(category, path, job_id)).await,

        Commands::Move {
            config,
            category,
            to_category,
            from,
            to,
            job_id,
        } => {
            let from = StorageLocation::new(category, from);
            let to = StorageLocation::new(to_category.unwrap_or(category), to);
            cmd_move(&config, &from, &to, &job_id).await
        }

        Commands::Delete {
            config,
            category,
            path,
            job_id,
        } => cmd_delete(&config, StorageAddress::new(category, path, job_id)).await,

        Commands::ShortName { composite } => cmd_short_name(&composite),
    }
}

/// Load a configuration record and build its provider.
async fn open_provider(config_path: &Path) -> Result<Arc<dyn StorageProvider>> {
    let config = ProviderConfig::from_file(config_path).with_context(|| {
        format!(
            "Failed to load provider configuration from {}",
            config_path.display()
        )
    })?;
    info!(
        "Resolving {} provider '{}'",
        config.backend_type, config.name
    );

    create_default_registry()
        .resolve(&config)
        .await
        .with_context(|| format!("Failed to set up storage provider '{}'", config.name))
}

/// Read the document to upload from a file or stdin.
fn read_content(source: &Path) -> Result<Document> {
    let raw = if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read content from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?
    };

    serde_json::from_str(&raw).context("Content must be a JSON object")
}

async fn cmd_check(config: &Path) -> Result<()> {
    let provider = open_provider(config).await?;

    println!("Provider is reachable.");
    println!("  Name: {}", provider.name());
    println!("  Backend: {}", provider.backend());
    println!("  Active: {}", provider.is_active());

    Ok(())
}

async fn cmd_upload(
    config: &Path,
    category: Category,
    path: StoragePath,
    job_id: Option<JobId>,
    content: &Path,
) -> Result<()> {
    let document = read_content(content)?;
    let provider = open_provider(config).await?;
    let address = StorageAddress::new(category, path, job_id.unwrap_or_else(JobId::generate));

    provider
        .upload(&document, &address)
        .await
        .with_context(|| format!("Failed to upload {}", address))?;

    info!("Uploaded {}", address);
    println!("{}", address.job_id);

    Ok(())
}

async fn cmd_get(config: &Path, address: StorageAddress) -> Result<()> {
    let provider = open_provider(config).await?;

    let document = provider
        .get(&address)
        .await
        .with_context(|| format!("Failed to get {}", address))?;

    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

async fn cmd_move(
    config: &Path,
    from: &StorageLocation,
    to: &StorageLocation,
    job_id: &JobId,
) -> Result<()> {
    let provider = open_provider(config).await?;

    provider
        .move_document(from, to, job_id)
        .await
        .with_context(|| format!("Failed to move {} from {} to {}", job_id, from, to))?;

    println!("Moved {} from {} to {}", job_id, from, to);

    Ok(())
}

async fn cmd_delete(config: &Path, address: StorageAddress) -> Result<()> {
    let provider = open_provider(config).await?;

    provider
        .delete(&address)
        .await
        .with_context(|| format!("Failed to delete {}", address))?;

    println!("Deleted {}", address);

    Ok(())
}

fn cmd_short_name(composite: &str) -> Result<()> {
    let short = short_backend_name(composite);
    if short.is_empty() {
        anyhow::bail!("'{}' is not a recognized backend name", composite);
    }

    println!("{}", short);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "jobstore",
            "upload",
            "--config",
            "provider.json",
            "--category",
            "queued",
            "--path",
            "test/subcollection",
            "--content",
            "-",
        ])
        .unwrap();

        match cli.command {
            Commands::Upload {
                category,
                path,
                job_id,
                ..
            } => {
                assert_eq!(category, Category::Queued);
                assert_eq!(path.to_string(), "test/subcollection");
                assert!(job_id.is_none());
            }
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let result = Cli::try_parse_from([
            "jobstore",
            "get",
            "--config",
            "provider.json",
            "--category",
            "finished",
            "--path",
            "a",
            "--job-id",
            "abc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_name_command() {
        assert!(cmd_short_name("alqor_tests_simulator").is_ok());
        assert!(cmd_short_name("a_b").is_err());
    }
}
