//! Prompted LLM workflows: prescription drafting, pre-screening dialogue and
//! consultation analysis. Each asks the model for a strict JSON object and
//! decodes it into a typed result.

pub mod analysis;
pub mod prescreening;
pub mod prescription;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::upstream::UpstreamError;

pub use analysis::AnalysisService;
pub use prescreening::PrescreeningService;
pub use prescription::PrescriptionService;

#[derive(Debug, Error)]
pub enum ClinicalError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Model returned malformed output: {0}")]
    MalformedOutput(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Decodes the JSON object in a model reply, tolerating markdown fences and
/// prose around it.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, ClinicalError> {
    let body = strip_fences(text);
    let candidate = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    };

    serde_json::from_str(candidate).map_err(|e| ClinicalError::MalformedOutput(e.to_string()))
}

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Appends an instruction to answer in `language` when one is given.
fn language_clause(language: Option<&str>) -> String {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(lang) => format!(
            "\nWrite every human-readable string value in the language with code \"{lang}\"; keep JSON keys in English."
        ),
        None => String::new(),
    }
}
