use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub google: GoogleSettings,
    pub claude: ClaudeSettings,
    pub speech: SpeechSettings,
    pub prescreening: PrescreeningSettings,
    pub retry: RetrySettings,
    pub http: HttpSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Google Cloud Speech-to-Text and Translation share one API key.
#[derive(Debug, Deserialize, Clone)]
pub struct GoogleSettings {
    pub api_key: Option<String>,
    pub speech_url: String,
    pub translate_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClaudeSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Recognition defaults used when the upload does not override them.
#[derive(Debug, Deserialize, Clone)]
pub struct SpeechSettings {
    pub language: String,
    pub encoding: String,
    pub sample_rate: u32,
    pub min_speakers: u32,
    pub max_speakers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrescreeningSettings {
    pub max_turns: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("CLINIVOX"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "clinivox")?
            .set_default("google.api_key", None::<String>)?
            .set_default(
                "google.speech_url",
                "https://speech.googleapis.com/v1/speech:recognize",
            )?
            .set_default(
                "google.translate_url",
                "https://translation.googleapis.com/language/translate/v2",
            )?
            .set_default("claude.api_key", None::<String>)?
            .set_default("claude.base_url", "https://api.anthropic.com")?
            .set_default("claude.model", "claude-sonnet-4-5-20250929")?
            .set_default("claude.max_tokens", 2048)?
            .set_default("speech.language", "en-US")?
            .set_default("speech.encoding", "WEBM_OPUS")?
            .set_default("speech.sample_rate", 48000)?
            .set_default("speech.min_speakers", 2)?
            .set_default("speech.max_speakers", 2)?
            .set_default("prescreening.max_turns", 8)?
            .set_default("retry.max_retries", 3)?
            .set_default("retry.base_delay_ms", 500)?
            .set_default("retry.max_delay_ms", 8000)?
            .set_default("http.timeout_secs", 60)?
            .build()?;

        config.try_deserialize()
    }
}
