use base64::Engine;
use clinivox_config::SpeechSettings;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::diarization::Word;
use crate::upstream::{RetryPolicy, UpstreamError};

const UPSTREAM: &str = "speech recognizer";

/// Google Cloud Speech-to-Text (v1 `speech:recognize`) with speaker
/// diarization enabled.
#[derive(Debug, Clone)]
pub struct SpeechService {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    defaults: SpeechSettings,
    retry: RetryPolicy,
}

/// Per-request recognition parameters; unset fields fall back to the
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct RecognitionOptions {
    pub language: Option<String>,
    pub encoding: Option<String>,
    pub sample_rate: Option<u32>,
    pub min_speakers: Option<u32>,
    pub max_speakers: Option<u32>,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: String,
    sample_rate_hertz: u32,
    language_code: String,
    enable_word_time_offsets: bool,
    enable_automatic_punctuation: bool,
    diarization_config: DiarizationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiarizationConfig {
    enable_speaker_diarization: bool,
    min_speaker_count: u32,
    max_speaker_count: u32,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    #[serde(default)]
    word: String,
    start_time: Option<String>,
    end_time: Option<String>,
    #[serde(default, deserialize_with = "speaker_tag")]
    speaker_tag: Option<i64>,
}

/// Accepts the tag as a JSON number or a numeric string.
fn speaker_tag<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tag {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Tag>::deserialize(deserializer)? {
        Some(Tag::Number(n)) => Some(n),
        Some(Tag::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl From<WordInfo> for Word {
    fn from(info: WordInfo) -> Self {
        Word {
            text: info.word,
            speaker_tag: info.speaker_tag,
            start_time: info.start_time,
            end_time: info.end_time,
        }
    }
}

impl SpeechService {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        endpoint: String,
        defaults: SpeechSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint,
            defaults,
            retry,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, audio: &[u8], options: &RecognitionOptions) -> RecognizeRequest {
        let min_speakers = options.min_speakers.unwrap_or(self.defaults.min_speakers);
        let max_speakers = options
            .max_speakers
            .unwrap_or(self.defaults.max_speakers)
            .max(min_speakers);

        RecognizeRequest {
            config: RecognitionConfig {
                encoding: options
                    .encoding
                    .clone()
                    .unwrap_or_else(|| self.defaults.encoding.clone()),
                sample_rate_hertz: options.sample_rate.unwrap_or(self.defaults.sample_rate),
                language_code: options
                    .language
                    .clone()
                    .unwrap_or_else(|| self.defaults.language.clone()),
                enable_word_time_offsets: true,
                enable_automatic_punctuation: true,
                diarization_config: DiarizationConfig {
                    enable_speaker_diarization: true,
                    min_speaker_count: min_speakers,
                    max_speaker_count: max_speakers,
                },
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        }
    }

    /// Recognizes `audio` and returns the diarized word list.
    ///
    /// With diarization on, the recognizer repeats every word with its
    /// speaker tag in the final result, so only that result is read. A
    /// response with no results at all is `NoResult`; a final result without
    /// words is an empty list.
    pub async fn recognize(
        &self,
        audio: &[u8],
        options: &RecognitionOptions,
    ) -> Result<Vec<Word>, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::NotConfigured(UPSTREAM))?;

        let request = self.build_request(audio, options);
        debug!(
            bytes = audio.len(),
            language = %request.config.language_code,
            encoding = %request.config.encoding,
            "Sending audio to speech recognizer"
        );

        let response = self
            .retry
            .send(UPSTREAM, || {
                self.client
                    .post(&self.endpoint)
                    .query(&[("key", api_key)])
                    .json(&request)
            })
            .await?;

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::decode(UPSTREAM, e))?;

        words_from_response(body)
    }
}

fn words_from_response(body: RecognizeResponse) -> Result<Vec<Word>, UpstreamError> {
    let last = body
        .results
        .into_iter()
        .last()
        .ok_or(UpstreamError::NoResult(UPSTREAM))?;

    Ok(last
        .alternatives
        .into_iter()
        .next()
        .map(|alt| alt.words.into_iter().map(Word::from).collect())
        .unwrap_or_default())
}
