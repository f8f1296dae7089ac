//! The Elpis API client.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::{ElpisError, Response, Result};

/// Configuration for an [`Elpis`] client.
#[derive(Debug, Clone)]
pub struct ElpisConfig {
    /// Server URL, e.g. `http://0.0.0.0:5000/` or `http://0.0.0.0:5000/api/`.
    pub url: String,

    /// Request timeout. `None` uses the transport default.
    pub timeout: Option<Duration>,

    /// Whether the client keeps a cookie store across calls.
    pub cookie_store: bool,
}

impl ElpisConfig {
    /// Create a config for the given server URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            cookie_store: false,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable the per-client cookie store.
    pub fn with_cookie_store(mut self, enabled: bool) -> Self {
        self.cookie_store = enabled;
        self
    }
}

/// Client for the Elpis speech transcription server.
///
/// Operations fall into the four stages of the transcription pipeline, plus
/// cleanup:
///
/// 1. `dataset_*` — upload existing transcripts with their recordings, to
///    provide training data;
/// 2. `pron_dict_*` — specify a pronunciation dictionary;
/// 3. `model_*` — train language and acoustic models;
/// 4. `transcription_*` — automatic transcription of new recordings;
/// 5. `config_*` — server cleanup.
///
/// Every method issues one HTTP request and returns its parsed result
/// directly; nothing is stored on the client between calls.
#[derive(Debug, Clone)]
pub struct Elpis {
    client: reqwest::Client,
    base_url: Url,
}

impl Elpis {
    /// Create a client for the given server URL with default transport
    /// settings.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(ElpisConfig::new(url))
    }

    /// Create a client from a full configuration.
    pub fn with_config(config: ElpisConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.url)?;

        let mut builder = reqwest::Client::builder().cookie_store(config.cookie_store);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// The normalized base URL, always ending in `api/`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    // dataset operations

    /// Create a new dataset.
    pub async fn dataset_new(&self, _name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("dataset/new"))
    }

    /// List current dataset names.
    pub async fn dataset_list(&self) -> Result<Vec<String>> {
        self.get("dataset/list").await?.string_list("list")
    }

    /// Start using an existing dataset.
    pub async fn dataset_load(&self, _name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("dataset/load"))
    }

    /// Define dataset settings: the name of the ELAN tier that contains the
    /// transcript.
    pub async fn dataset_settings(&self, _tier: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("dataset/settings"))
    }

    /// Upload transcript/audio files (wav audio and/or ELAN .eaf
    /// transcripts) into the dataset. Returns all dataset files uploaded so
    /// far.
    pub async fn dataset_files(&self, _files: &[&Path]) -> Result<Vec<String>> {
        Err(ElpisError::NotImplemented("dataset/files"))
    }

    /// Process the transcripts into a word frequency list.
    ///
    /// The server returns the wordlist as a JSON-encoded string under
    /// `data.wordlist`, mapping word types to their frequency in the
    /// uploaded transcripts.
    pub async fn dataset_prepare(&self) -> Result<HashMap<String, u64>> {
        let wordlist = self.post("dataset/prepare").await?.string_field("wordlist")?;
        serde_json::from_str(&wordlist).map_err(|e| {
            ElpisError::UnexpectedPayload(format!("data.wordlist is not a frequency map: {e}"))
        })
    }

    // pronunciation dictionary operations

    /// Create a new pronunciation dictionary over the named dataset.
    pub async fn pron_dict_new(&self, _name: &str, _dataset_name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("pron-dict/new"))
    }

    /// Start using an existing pronunciation dictionary.
    pub async fn pron_dict_load(&self, _name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("pron-dict/load"))
    }

    /// List the current pronunciation dictionaries.
    pub async fn pron_dict_list(&self) -> Result<Vec<String>> {
        self.get("pron-dict/list").await?.string_list("list")
    }

    /// Upload the letter-to-sound mapping used to build the pronunciation
    /// dictionary: one line per character, the character and its
    /// pronunciation symbol separated by a space, `#` for comments.
    pub async fn pron_dict_l2s(&self, _file: &Path) -> Result<()> {
        Err(ElpisError::NotImplemented("pron-dict/l2s"))
    }

    /// Generate the pronunciation dictionary from the wordlist and the
    /// letter-to-sound mapping. Returns word types mapped to pronunciations.
    pub async fn pron_dict_generate_lexicon(&self) -> Result<HashMap<String, String>> {
        Err(ElpisError::NotImplemented("pron-dict/generate-lexicon"))
    }

    /// Save an edited version of the generated pronunciation dictionary.
    pub async fn pron_dict_save_lexicon(&self, _lexicon: &HashMap<String, String>) -> Result<()> {
        Err(ElpisError::NotImplemented("pron-dict/save-lexicon"))
    }

    // model operations

    /// List the current models.
    pub async fn model_list(&self) -> Result<Vec<String>> {
        self.get("model/list").await?.string_list("list")
    }

    /// Create a new model for training, using the named pronunciation
    /// dictionary.
    pub async fn model_new(&self, _name: &str, _pron_dict_name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("model/new"))
    }

    /// Start using an existing model.
    pub async fn model_load(&self, _name: &str) -> Result<()> {
        Err(ElpisError::NotImplemented("model/load"))
    }

    /// Set the n-gram order of the language model.
    pub async fn model_settings(&self, _ngram: u32) -> Result<()> {
        Err(ElpisError::NotImplemented("model/settings"))
    }

    /// Start training models on the dataset. Returns the training status.
    pub async fn model_train(&self) -> Result<String> {
        Err(ElpisError::NotImplemented("model/train"))
    }

    /// Get the status of model training.
    pub async fn model_status(&self) -> Result<String> {
        self.get("model/status").await?.string_field("status")
    }

    /// Get the training results: metrics for the final model performance.
    pub async fn model_results(&self) -> Result<HashMap<String, String>> {
        Err(ElpisError::NotImplemented("model/results"))
    }

    // transcription operations

    /// Upload a wav audio file to transcribe.
    pub async fn transcription_new(&self, _file: &Path) -> Result<()> {
        Err(ElpisError::NotImplemented("transcription/new"))
    }

    /// Begin transcribing the last uploaded recording. Returns the
    /// transcription status.
    pub async fn transcription_transcribe(&self) -> Result<String> {
        self.get("transcription/transcribe")
            .await?
            .string_field("status")
    }

    /// Get the status of the transcription in progress.
    pub async fn transcription_status(&self) -> Result<String> {
        self.get("transcription/status").await?.string_field("status")
    }

    /// Get the plain-text version of the last transcript.
    pub async fn transcription_text(&self) -> Result<String> {
        Err(ElpisError::NotImplemented("transcription/text"))
    }

    /// Get the ELAN (.eaf) version of the last transcript, with an aligned
    /// annotation per word token.
    pub async fn transcription_elan(&self) -> Result<String> {
        Err(ElpisError::NotImplemented("transcription/elan"))
    }

    // config operations

    /// Reset the server: delete all uploads, datasets, pronunciation
    /// dictionaries and models.
    pub async fn config_reset(&self) -> Result<()> {
        self.post("config/reset").await?;
        Ok(())
    }

    // transport

    async fn get(&self, resource: &str) -> Result<Response> {
        let url = self.endpoint(resource)?;
        debug!(%url, "GET");
        let http = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        Self::read(http).await
    }

    async fn post(&self, resource: &str) -> Result<Response> {
        let url = self.endpoint(resource)?;
        debug!(%url, "POST");
        let http = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        Self::read(http).await
    }

    async fn read(http: reqwest::Response) -> Result<Response> {
        let http_status = http.status().as_u16();
        let body = http.text().await?;
        debug!(http_status, raw = %body, "response");
        Response::from_parts(Some(http_status), body, true).check()
    }

    fn endpoint(&self, resource: &str) -> Result<Url> {
        self.base_url
            .join(resource)
            .map_err(|e| ElpisError::InvalidUrl(format!("{resource}: {e}")))
    }
}

/// Normalize a server URL so it ends in `api/`:
/// `http://host:5000` becomes `http://host:5000/api/`, while URLs already
/// ending in `api/` pass through unchanged.
fn normalize_base_url(url: &str) -> Result<Url> {
    let mut url = url.to_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    if !url.ends_with("api/") {
        url.push_str("api/");
    }
    Url::parse(&url).map_err(|e| ElpisError::InvalidUrl(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_slash_and_api_segment() {
        let client = Elpis::new("http://h:5000").unwrap();
        assert_eq!(client.base_url(), "http://h:5000/api/");
    }

    #[test]
    fn base_url_with_trailing_slash() {
        let client = Elpis::new("http://h:5000/").unwrap();
        assert_eq!(client.base_url(), "http://h:5000/api/");
    }

    #[test]
    fn base_url_already_normalized() {
        let client = Elpis::new("http://h:5000/api/").unwrap();
        assert_eq!(client.base_url(), "http://h:5000/api/");
    }

    #[test]
    fn malformed_url_fails_at_construction() {
        assert!(matches!(Elpis::new("xxx"), Err(ElpisError::InvalidUrl(_))));
    }

    #[test]
    fn config_builder() {
        let config = ElpisConfig::new("http://h:5000")
            .with_timeout(Duration::from_secs(30))
            .with_cookie_store(true);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.cookie_store);
        assert!(Elpis::with_config(config).is_ok());
    }

    #[tokio::test]
    async fn stubs_signal_not_implemented() {
        let client = Elpis::new("http://h:5000").unwrap();
        assert!(matches!(
            client.dataset_new("ds").await,
            Err(ElpisError::NotImplemented("dataset/new"))
        ));
        assert!(matches!(
            client.model_train().await,
            Err(ElpisError::NotImplemented("model/train"))
        ));
        assert!(matches!(
            client.transcription_elan().await,
            Err(ElpisError::NotImplemented("transcription/elan"))
        ));
    }
}
