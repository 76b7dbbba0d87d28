use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClinicalError, language_clause, parse_model_json};
use crate::llm::{ChatMessage, LlmService};

const SYSTEM_PROMPT: &str = concat!(
    "You are a clinical documentation assistant helping a licensed doctor draft a prescription. ",
    "Base the draft strictly on the consultation details provided. ",
    "Never prescribe a drug the patient is allergic to. ",
    "Return ONLY a JSON object, no markdown fences, with these fields:\n",
    "- \"diagnosis\": short working diagnosis\n",
    "- \"medications\": array of { \"name\", \"dosage\", \"frequency\", \"duration\", \"instructions\" }\n",
    "- \"advice\": array of short lifestyle or care instructions\n",
    "- \"follow_up\": when the patient should return, or null"
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationNotes {
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    /// Rendered consultation transcript.
    pub transcript: Option<String>,
}

impl ConsultationNotes {
    fn is_empty(&self) -> bool {
        [&self.symptoms, &self.diagnosis, &self.notes, &self.transcript]
            .iter()
            .all(|f| f.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    pub diagnosis: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub follow_up: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone)]
pub struct PrescriptionService {
    llm: LlmService,
}

impl PrescriptionService {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    pub async fn generate(
        &self,
        patient: &PatientInfo,
        notes: &ConsultationNotes,
        language: Option<&str>,
    ) -> Result<Prescription, ClinicalError> {
        if notes.is_empty() {
            return Err(ClinicalError::InvalidInput(
                "Provide symptoms, diagnosis, notes or a transcript".to_string(),
            ));
        }

        let system = format!("{SYSTEM_PROMPT}{}", language_clause(language));
        let reply = self
            .llm
            .complete(&system, &[ChatMessage::user(consultation_prompt(patient, notes))])
            .await?;

        let prescription: Prescription = parse_model_json(&reply)?;
        info!(
            medications = prescription.medications.len(),
            "Prescription drafted"
        );
        Ok(prescription)
    }
}

fn consultation_prompt(patient: &PatientInfo, notes: &ConsultationNotes) -> String {
    let mut prompt = String::from("Patient:\n");
    if let Some(name) = &patient.name {
        prompt.push_str(&format!("- Name: {name}\n"));
    }
    if let Some(age) = patient.age {
        prompt.push_str(&format!("- Age: {age}\n"));
    }
    if let Some(gender) = &patient.gender {
        prompt.push_str(&format!("- Gender: {gender}\n"));
    }
    if patient.allergies.is_empty() {
        prompt.push_str("- Known allergies: none reported\n");
    } else {
        prompt.push_str(&format!(
            "- Known allergies: {}\n",
            patient.allergies.join(", ")
        ));
    }

    let sections = [
        ("Symptoms", &notes.symptoms),
        ("Doctor's diagnosis", &notes.diagnosis),
        ("Doctor's notes", &notes.notes),
        ("Consultation transcript", &notes.transcript),
    ];
    for (title, value) in sections {
        if let Some(text) = value.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            prompt.push_str(&format!("\n{title}:\n{text}\n"));
        }
    }
    prompt
}
