use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClinicalError, language_clause, parse_model_json};
use crate::diarization::Utterance;
use crate::llm::{ChatMessage, LlmService};

const SYSTEM_PROMPT: &str = concat!(
    "You are a clinical assistant reviewing a doctor-patient consultation transcript. ",
    "Speaker labels come from automatic diarization and may be imperfect. ",
    "Return ONLY a JSON object, no markdown fences, with these fields:\n",
    "- \"summary\": a short clinical summary of the consultation\n",
    "- \"symptoms\": array of symptoms the patient reported\n",
    "- \"possible_conditions\": array of conditions worth considering\n",
    "- \"recommendations\": array of suggested next steps for the doctor\n",
    "- \"urgency\": one of \"low\", \"medium\", \"high\""
);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptAnalysis {
    pub summary: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub possible_conditions: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub urgency: Urgency,
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    llm: LlmService,
}

impl AnalysisService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    pub async fn analyze(
        &self,
        transcript: &str,
        language: Option<&str>,
    ) -> Result<TranscriptAnalysis, ClinicalError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(ClinicalError::InvalidInput(
                "Transcript must not be empty".to_string(),
            ));
        }

        let system = format!("{SYSTEM_PROMPT}{}", language_clause(language));
        let reply = self
            .llm
            .complete(
                &system,
                &[ChatMessage::user(format!("Transcript:\n{transcript}"))],
            )
            .await?;

        let analysis: TranscriptAnalysis = parse_model_json(&reply)?;
        info!(urgency = ?analysis.urgency, "Transcript analyzed");
        Ok(analysis)
    }
}

/// One `Speaker N: text` line per utterance.
pub fn render_utterances(utterances: &[Utterance]) -> String {
    utterances
        .iter()
        .filter(|u| !u.transcript.trim().is_empty())
        .map(|u| format!("{}: {}", u.speaker.trim(), u.transcript.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
