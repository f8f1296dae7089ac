//! The JSON response envelope returned by every Elpis API call.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{ElpisError, Result};

/// Wire shape of the envelope. `data` is polymorphic on the server side:
/// an object on success, a plain string when the server wants to send a
/// message instead.
#[derive(Deserialize)]
struct Envelope {
    status: i64,
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnvelopeData {
    Object(Map<String, Value>),
    Text(String),
}

/// A parsed Elpis response.
///
/// Built once per call and returned to the caller; nothing is cached on the
/// client. When the body parses as the expected envelope, exactly one of
/// [`data`](Self::data) and [`message`](Self::message) is populated,
/// depending on the runtime JSON type of the `data` field. Bodies that are
/// not valid JSON are tolerated: the raw text is wrapped into `message` and
/// the application status stays unset.
#[derive(Debug, Clone)]
pub struct Response {
    http_status: Option<u16>,
    status: Option<i64>,
    data: Option<Map<String, Value>>,
    message: Option<String>,
    raw: String,
    expect_json: bool,
}

impl Response {
    /// Parse a response body.
    ///
    /// `http_status` is `None` when the body was obtained outside an HTTP
    /// exchange (e.g. loaded from text in tests). `expect_json` controls
    /// whether the body is parsed as an envelope at all; endpoints that
    /// return file content set it to false, leaving only `raw` and
    /// `http_status` populated.
    pub fn from_parts(http_status: Option<u16>, body: String, expect_json: bool) -> Self {
        let mut response = Response {
            http_status,
            status: None,
            data: None,
            message: None,
            raw: body,
            expect_json,
        };

        if !expect_json || response.raw.is_empty() {
            return response;
        }

        match serde_json::from_str::<Envelope>(&response.raw) {
            Ok(envelope) => {
                response.status = Some(envelope.status);
                match envelope.data {
                    Some(EnvelopeData::Object(object)) => response.data = Some(object),
                    Some(EnvelopeData::Text(text)) => response.message = Some(text),
                    None => {}
                }
            }
            Err(e) => {
                // Non-JSON bodies are surfaced as a message, not an error.
                debug!(error = %e, "response body is not a JSON envelope");
                response.message = Some(format!("Response not JSON: {}", response.raw));
            }
        }

        response
    }

    /// Parse raw text with no transport status attached.
    pub fn from_text(body: impl Into<String>) -> Self {
        Self::from_parts(None, body.into(), true)
    }

    /// The HTTP status code, if one was captured.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// The envelope's `status` field, if the body parsed as an envelope.
    pub fn status(&self) -> Option<i64> {
        self.status
    }

    /// The `data` object, when the server returned one.
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    /// The server message: a string-typed `data` field, or the diagnostic
    /// synthesized for a non-JSON body.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The unparsed response text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this response should be treated as a failure.
    ///
    /// A response is an error when an envelope was expected and its `status`
    /// is not 200, or when the transport status was captured and is not 200.
    /// The conditions are independent: a call can fail at the transport
    /// layer before any envelope exists, or report an application failure
    /// inside a 200 transport response.
    pub fn is_error(&self) -> bool {
        (self.expect_json && self.status != Some(200))
            || self.http_status.is_some_and(|s| s != 200)
    }

    /// Convert an error response into [`ElpisError::Api`], passing success
    /// responses through.
    pub fn check(self) -> Result<Self> {
        if self.is_error() {
            Err(ElpisError::Api(Box::new(self)))
        } else {
            Ok(self)
        }
    }

    /// The most informative detail available for a failure response:
    /// server message (with the application status for context), then the
    /// application status alone, then the transport status alone.
    pub fn error_detail(&self) -> Option<String> {
        if self.status != Some(200) {
            if let Some(message) = &self.message {
                return Some(match self.status {
                    Some(status) => format!("{message} (status {status})"),
                    None => message.clone(),
                });
            }
            if let Some(status) = self.status {
                return Some(format!("status {status}"));
            }
        }
        self.http_status
            .filter(|s| *s != 200)
            .map(|s| format!("HTTP status {s}"))
    }

    /// A string array under the given key of `data`, order and duplicates
    /// preserved.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let items = self
            .data_field(key)?
            .as_array()
            .ok_or_else(|| ElpisError::UnexpectedPayload(format!("data.{key} is not an array")))?;
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    ElpisError::UnexpectedPayload(format!("data.{key} contains a non-string item"))
                })
            })
            .collect()
    }

    /// A string value under the given key of `data`.
    pub fn string_field(&self, key: &str) -> Result<String> {
        self.data_field(key)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ElpisError::UnexpectedPayload(format!("data.{key} is not a string")))
    }

    fn data_field(&self, key: &str) -> Result<&Value> {
        self.data
            .as_ref()
            .ok_or_else(|| ElpisError::UnexpectedPayload("no data object in response".into()))?
            .get(key)
            .ok_or_else(|| ElpisError::UnexpectedPayload(format!("data has no {key} field")))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.raw.is_empty() {
            return f.write_str(&self.raw);
        }
        if let Some(message) = &self.message {
            return f.write_str(message);
        }
        if let Some(http_status) = self.http_status {
            return write!(f, "HTTP {http_status}");
        }
        Ok(())
    }
}
