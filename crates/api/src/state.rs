use std::sync::Arc;
use std::time::Duration;

use clinivox_config::Settings;
use clinivox_services::{
    AnalysisService, AuthService, LlmService, PrescreeningService, PrescriptionService,
    SpeechService, TranslationService,
    dao::{doctor::DoctorDao, user::UserDao},
    upstream::{RetryPolicy, http_client},
};
use mongodb::Database;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub doctors: Arc<DoctorDao>,
    pub speech: SpeechService,
    pub translation: TranslationService,
    pub prescriptions: PrescriptionService,
    pub prescreening: PrescreeningService,
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> anyhow::Result<Self> {
        let client = http_client(Duration::from_secs(settings.http.timeout_secs))?;
        let retry = RetryPolicy::from_settings(&settings.retry);

        let speech = SpeechService::new(
            client.clone(),
            settings.google.api_key.clone(),
            settings.google.speech_url.clone(),
            settings.speech.clone(),
            retry.clone(),
        );
        let translation = TranslationService::new(
            client.clone(),
            settings.google.api_key.clone(),
            settings.google.translate_url.clone(),
            retry.clone(),
        );
        let llm = LlmService::new(client, &settings.claude, retry);

        Ok(Self {
            auth: Arc::new(AuthService::new()),
            users: Arc::new(UserDao::new(&db)),
            doctors: Arc::new(DoctorDao::new(&db)),
            speech,
            translation,
            prescriptions: PrescriptionService::new(llm.clone()),
            prescreening: PrescreeningService::new(llm.clone(), settings.prescreening.max_turns),
            analysis: AnalysisService::new(llm),
            settings,
        })
    }
}
