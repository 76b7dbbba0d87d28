use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClinicalError, language_clause, parse_model_json};
use crate::llm::{ChatMessage, LlmService};

const SYSTEM_PROMPT: &str = concat!(
    "You are a friendly triage nurse running a short pre-screening interview before a doctor's appointment. ",
    "Ask one clear question at a time about the main complaint, its duration and severity, ",
    "current medication, allergies and relevant history. Do not diagnose or prescribe. ",
    "If the patient describes an emergency (chest pain, difficulty breathing, heavy bleeding, ",
    "loss of consciousness) tell them to seek emergency care immediately and finish the interview.\n",
    "Return ONLY a JSON object, no markdown fences: ",
    "{ \"reply\": next message to the patient, \"complete\": true when the interview is finished, ",
    "\"summary\": concise clinical summary for the doctor when complete, otherwise null }"
);

const FINAL_TURN_INSTRUCTION: &str = concat!(
    "\nThe interview has reached its question limit. Do not ask anything else: ",
    "thank the patient, set \"complete\" to true and provide the summary."
);

/// Opening line sent on the patient's behalf when the dialogue starts.
const OPENING_MESSAGE: &str = "Hello, I would like to start my pre-screening.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Patient,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueTurn {
    pub role: Speaker,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescreeningReply {
    pub reply: String,
    pub complete: bool,
    pub summary: Option<String>,
    /// Patient messages received so far.
    pub turn: usize,
}

#[derive(Debug, Deserialize)]
struct ModelReply {
    reply: String,
    #[serde(default)]
    complete: bool,
    #[serde(default)]
    summary: Option<String>,
}

/// Stateless pre-screening dialogue: the caller sends the full history on
/// every request.
#[derive(Debug, Clone)]
pub struct PrescreeningService {
    llm: LlmService,
    max_turns: usize,
}

impl PrescreeningService {
    pub fn new(llm: LlmService, max_turns: usize) -> Self {
        Self { llm, max_turns }
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    pub async fn next_turn(
        &self,
        history: &[DialogueTurn],
        language: Option<&str>,
    ) -> Result<PrescreeningReply, ClinicalError> {
        if history.iter().any(|t| t.content.trim().is_empty()) {
            return Err(ClinicalError::InvalidInput(
                "Dialogue messages must not be empty".to_string(),
            ));
        }

        let turn = patient_turns(history);
        let final_turn = turn >= self.max_turns;

        let mut system = format!("{SYSTEM_PROMPT}{}", language_clause(language));
        if final_turn {
            system.push_str(FINAL_TURN_INSTRUCTION);
        }

        let messages = to_chat(history);
        debug!(turn, final_turn, "Requesting next pre-screening turn");
        let reply = self.llm.complete(&system, &messages).await?;
        let parsed: ModelReply = parse_model_json(&reply)?;

        let complete = parsed.complete || final_turn;
        Ok(PrescreeningReply {
            reply: parsed.reply,
            complete,
            summary: parsed.summary.filter(|_| complete),
            turn,
        })
    }
}

fn patient_turns(history: &[DialogueTurn]) -> usize {
    history.iter().filter(|t| t.role == Speaker::Patient).count()
}

/// Maps the dialogue onto chat roles. The model must see a user turn first,
/// so an opening line is inserted when the history is empty or starts with
/// the assistant.
fn to_chat(history: &[DialogueTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if history.first().is_none_or(|t| t.role == Speaker::Assistant) {
        messages.push(ChatMessage::user(OPENING_MESSAGE));
    }
    messages.extend(history.iter().map(|t| match t.role {
        Speaker::Patient => ChatMessage::user(t.content.trim()),
        Speaker::Assistant => ChatMessage::assistant(t.content.trim()),
    }));
    messages
}
