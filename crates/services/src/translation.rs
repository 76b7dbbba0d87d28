use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::upstream::{RetryPolicy, UpstreamError};

const UPSTREAM: &str = "translator";

/// Google Cloud Translation (v2 REST).
#[derive(Debug, Clone)]
pub struct TranslationService {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    retry: RetryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Translation {
    pub translated_text: String,
    /// Source language as given by the caller, otherwise as detected.
    pub source_language: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
    detected_source_language: Option<String>,
}

impl TranslationService {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        endpoint: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint,
            retry,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Translation, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::NotConfigured(UPSTREAM))?;

        let request = TranslateRequest {
            q: text,
            target: target_language,
            source: source_language,
            format: "text",
        };
        debug!(chars = text.len(), target = target_language, "Translating text");

        let response = self
            .retry
            .send(UPSTREAM, || {
                self.client
                    .post(&self.endpoint)
                    .query(&[("key", api_key)])
                    .json(&request)
            })
            .await?;

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::decode(UPSTREAM, e))?;

        let first = body
            .data
            .translations
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoResult(UPSTREAM))?;

        Ok(Translation {
            translated_text: first.translated_text,
            source_language: source_language
                .map(str::to_string)
                .or(first.detected_source_language),
        })
    }
}
