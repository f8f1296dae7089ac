//! Command-line wrapper around the Elpis API client.
//!
//! Usage: `elpis [-v] --server <url> <operation> [args...]`. The server URL
//! can also come from the config file (see the `config-path` subcommand).
//! Parsed results are printed to stdout; raw envelopes are visible at debug
//! log level (`-v` or `ELPIS_LOG=debug`).

mod cli;
mod config;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use elpis_client::{Elpis, ElpisConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::ConfigManager;

/// Application name
pub const APP_NAME: &str = "elpis";

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger; logs go to stderr so stdout stays parseable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("ELPIS_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_manager = ConfigManager::new()?;

    if let Command::ConfigPath = cli.command {
        println!("{}", config_manager.config_path().display());
        return Ok(());
    }

    let config = config_manager.load()?;
    let server = cli
        .server
        .or(config.server)
        .context("no server URL: pass --server or set `server` in the config file")?;

    let mut client_config = ElpisConfig::new(server);
    if let Some(secs) = cli.timeout.or(config.timeout_secs) {
        client_config = client_config.with_timeout(Duration::from_secs(secs));
    }
    let client = Elpis::with_config(client_config)?;
    debug!(server = client.base_url(), "contacting Elpis server");

    match cli.command {
        Command::DatasetList => print_names(&client.dataset_list().await?),
        Command::DatasetNew { name } => client.dataset_new(&name).await?,
        Command::DatasetLoad { name } => client.dataset_load(&name).await?,
        Command::DatasetSettings { tier } => client.dataset_settings(&tier).await?,
        Command::DatasetFiles { files } => {
            for file in &files {
                ensure_exists(file)?;
            }
            let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
            print_names(&client.dataset_files(&paths).await?);
        }
        Command::DatasetPrepare => {
            let frequencies = client.dataset_prepare().await?;
            print_pairs(frequencies.into_iter().map(|(w, n)| (w, n.to_string())));
        }
        Command::PronDictList => print_names(&client.pron_dict_list().await?),
        Command::PronDictNew { name, dataset_name } => {
            client.pron_dict_new(&name, &dataset_name).await?;
        }
        Command::PronDictLoad { name } => client.pron_dict_load(&name).await?,
        Command::PronDictL2s { file } => {
            ensure_exists(&file)?;
            client.pron_dict_l2s(&file).await?;
        }
        Command::PronDictGenerateLexicon => {
            print_pairs(client.pron_dict_generate_lexicon().await?.into_iter());
        }
        Command::PronDictSaveLexicon { file } => {
            ensure_exists(&file)?;
            let lexicon = read_lexicon(&file)?;
            client.pron_dict_save_lexicon(&lexicon).await?;
        }
        Command::ModelList => print_names(&client.model_list().await?),
        Command::ModelNew {
            name,
            pron_dict_name,
        } => client.model_new(&name, &pron_dict_name).await?,
        Command::ModelLoad { name } => client.model_load(&name).await?,
        Command::ModelSettings { ngram } => client.model_settings(ngram).await?,
        Command::ModelTrain => println!("{}", client.model_train().await?),
        Command::ModelStatus => println!("{}", client.model_status().await?),
        Command::ModelResults => print_pairs(client.model_results().await?.into_iter()),
        Command::TranscriptionNew { file } => {
            ensure_exists(&file)?;
            client.transcription_new(&file).await?;
        }
        Command::TranscriptionTranscribe => {
            println!("{}", client.transcription_transcribe().await?);
        }
        Command::TranscriptionStatus => println!("{}", client.transcription_status().await?),
        Command::TranscriptionText => println!("{}", client.transcription_text().await?),
        Command::TranscriptionElan => println!("{}", client.transcription_elan().await?),
        Command::ConfigReset => {
            client.config_reset().await?;
            println!("reset: ok");
        }
        Command::ConfigPath => unreachable!("handled before client construction"),
    }

    Ok(())
}

fn print_names(names: &[String]) {
    for name in names {
        println!("{name}");
    }
}

fn print_pairs(pairs: impl Iterator<Item = (String, String)>) {
    let mut pairs: Vec<_> = pairs.collect();
    pairs.sort();
    for (key, value) in pairs {
        println!("{key}\t{value}");
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("file doesn't exist: {}", path.display());
    }
    Ok(())
}

/// Parse a lexicon file: one word per line followed by its pronunciation,
/// separated by whitespace. Lines starting with `#` are comments.
fn read_lexicon(path: &Path) -> Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut lexicon = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once(char::is_whitespace) {
            Some((word, pronunciation)) => {
                lexicon.insert(word.to_string(), pronunciation.trim().to_string());
            }
            None => bail!("malformed lexicon line: {line}"),
        }
    }
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_parsing_skips_comments_and_blanks() {
        let dir = std::env::temp_dir().join("elpis-lexicon-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lexicon.txt");
        std::fs::write(&path, "# comment\nng \u{14b}\n\ny j\n").unwrap();

        let lexicon = read_lexicon(&path).unwrap();
        assert_eq!(lexicon.get("ng").map(String::as_str), Some("\u{14b}"));
        assert_eq!(lexicon.get("y").map(String::as_str), Some("j"));
        assert_eq!(lexicon.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn lexicon_rejects_words_without_pronunciation() {
        let dir = std::env::temp_dir().join("elpis-lexicon-bad-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lexicon.txt");
        std::fs::write(&path, "lonely\n").unwrap();

        assert!(read_lexicon(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
