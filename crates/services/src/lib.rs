pub mod auth;
pub mod clinical;
pub mod dao;
pub mod diarization;
pub mod llm;
pub mod speech;
pub mod translation;
pub mod upstream;

pub use auth::AuthService;
pub use clinical::{AnalysisService, PrescreeningService, PrescriptionService};
pub use dao::*;
pub use llm::LlmService;
pub use speech::SpeechService;
pub use translation::TranslationService;
