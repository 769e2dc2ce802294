use serde::Deserialize;

use super::{LookupError, LookupService, SuggestionEntry};

/// Blocking client for the remote suggestion endpoint
/// (`GET {base_url}/search.json?key=..&q=..`). Runs on the lookup worker
/// thread, so blocking I/O is fine here.
pub struct HttpLookup {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

impl HttpLookup {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: api_key.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn service_error(body: &str) -> LookupError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error.message);
        LookupError::Service { message }
    }
}

impl LookupService for HttpLookup {
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionEntry>, LookupError> {
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .map_err(|err| LookupError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| LookupError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(Self::service_error(&body));
        }

        let payload: Vec<SuggestionPayload> =
            serde_json::from_str(&body).map_err(|err| LookupError::Service {
                message: Some(format!("malformed suggestion payload: {err}")),
            })?;

        Ok(payload
            .into_iter()
            .map(|entry| SuggestionEntry {
                name: entry.name,
                region: entry.region,
                country: entry.country,
            })
            .collect())
    }
}
