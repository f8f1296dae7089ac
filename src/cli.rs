//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line access to the Elpis speech transcription API.
#[derive(Debug, Parser)]
#[command(name = "elpis", version, about)]
pub struct Cli {
    /// Print detailed request/response logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Server URL, e.g. http://0.0.0.0:5000 (falls back to the config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List current dataset names
    DatasetList,
    /// Create a new dataset
    DatasetNew { name: String },
    /// Start using an existing dataset
    DatasetLoad { name: String },
    /// Set the ELAN tier that contains the transcript
    DatasetSettings { tier: String },
    /// Upload wav audio and/or ELAN .eaf transcripts into the dataset
    DatasetFiles {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Process the transcripts into a word frequency list
    DatasetPrepare,
    /// List the current pronunciation dictionaries
    PronDictList,
    /// Create a new pronunciation dictionary over a dataset
    PronDictNew { name: String, dataset_name: String },
    /// Start using an existing pronunciation dictionary
    PronDictLoad { name: String },
    /// Upload a letter-to-sound mapping file
    PronDictL2s { file: PathBuf },
    /// Generate the pronunciation dictionary
    PronDictGenerateLexicon,
    /// Save an edited pronunciation dictionary (word and pronunciation per line)
    PronDictSaveLexicon { file: PathBuf },
    /// List the current models
    ModelList,
    /// Create a new model for training
    ModelNew { name: String, pron_dict_name: String },
    /// Start using an existing model
    ModelLoad { name: String },
    /// Set the n-gram order of the language model
    ModelSettings { ngram: u32 },
    /// Start training models on the dataset
    ModelTrain,
    /// Get the status of model training
    ModelStatus,
    /// Get metrics for the final model performance
    ModelResults,
    /// Upload a wav audio file to transcribe
    TranscriptionNew { file: PathBuf },
    /// Begin transcribing the last uploaded recording
    TranscriptionTranscribe,
    /// Get the status of the transcription in progress
    TranscriptionStatus,
    /// Get the plain-text version of the last transcript
    TranscriptionText,
    /// Get the ELAN (.eaf) version of the last transcript
    TranscriptionElan,
    /// Reset the server, deleting all uploads, datasets and models
    ConfigReset,
    /// Print the path of the config file
    ConfigPath,
}
