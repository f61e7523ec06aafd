//! `s7c7-upload`: share a file anonymously through public repositories.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use s7c7::Publisher;

use crate::config::ClientConfig;

/// s7c7 upload client
#[derive(Debug, Parser)]
#[command(name = "s7c7-upload", version, about)]
struct Cli {
    /// File to share
    path_to_file: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,

    /// Filename recorded in the metadata (default: last path component)
    #[arg(short = 'n', long)]
    filename: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::load(&cli.config)?;
    if let Some(field) = config.missing_field() {
        tracing::warn!(path = %cli.config.display(), field, "config file is uninitialized");
        config.write_template(&cli.config)?;
        eprintln!(
            "Wrote a template to {}. Please complete the config and run again.",
            cli.config.display()
        );
        return Ok(());
    }

    let content = std::fs::read(&cli.path_to_file)
        .with_context(|| format!("cannot read {}", cli.path_to_file.display()))?;
    let filename = cli
        .filename
        .unwrap_or_else(|| default_filename(&cli.path_to_file));

    let (meta_store, data_store) = config.stores()?;
    let publisher = Publisher::new(meta_store, data_store, config.publish_config()?)?;
    let receipt = publisher
        .publish(&filename, &content)
        .await
        .context("publish failed")?;

    println!(
        "Successfully created {}. The file will be available in a few minutes.",
        receipt.metadata_url
    );
    println!("Visit this address to download: {}", receipt.link);
    println!("Do not leak the link to strangers!");
    Ok(())
}

fn default_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename(Path::new("/tmp/dir/report.pdf")), "report.pdf");
        assert_eq!(default_filename(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from(["s7c7-upload", "a/b.txt", "-c", "my.json", "-n", "renamed"]);
        assert_eq!(cli.path_to_file, PathBuf::from("a/b.txt"));
        assert_eq!(cli.config, PathBuf::from("my.json"));
        assert_eq!(cli.filename.as_deref(), Some("renamed"));

        let cli = Cli::parse_from(["s7c7-upload", "x"]);
        assert_eq!(cli.config, PathBuf::from("./config.json"));
        assert!(cli.filename.is_none());
    }
}
