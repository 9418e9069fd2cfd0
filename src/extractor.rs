//! Turns a patient's free-text description into symptom records by
//! delegating the extraction to a [`SymptomModel`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clients::SymptomModel;
use crate::error::SymptomScribeError;
use crate::symptom::Symptom;

/// Outcome of one submit action
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Extraction {
    /// Blank input; the model was not called
    Empty,
    NoSymptoms,
    Symptoms { symptoms: Vec<Symptom> },
    /// A returned record lacked a required field
    InvalidStructure { field: String },
    /// The model call failed
    Failed { message: String },
}

impl Extraction {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Extraction::InvalidStructure { .. } | Extraction::Failed { .. }
        )
    }
}

/// Run one extraction round trip.
pub async fn process_symptoms(model: &dyn SymptomModel, input: &str) -> Extraction {
    if input.trim().is_empty() {
        debug!("Rejecting blank input before calling the model");
        return Extraction::Empty;
    }

    debug!("Extracting symptoms from {} chars of input", input.len());

    let calls = match model.extract(input).await {
        Ok(calls) => calls,
        Err(e) => {
            warn!("Symptom extraction failed: {}", e);
            return Extraction::Failed {
                message: e.to_string(),
            };
        }
    };

    let mut symptoms = Vec::with_capacity(calls.len());
    for call in &calls {
        if call.name != Symptom::TOOL_NAME {
            debug!("Ignoring unexpected tool call '{}'", call.name);
            continue;
        }
        match Symptom::from_args(&call.args) {
            Ok(symptom) => symptoms.push(symptom),
            Err(e) => {
                warn!("Model returned an invalid symptom record: {}", e);
                return Extraction::InvalidStructure {
                    field: field_of(&e),
                };
            }
        }
    }

    info!("Extracted {} symptom record(s)", symptoms.len());

    if symptoms.is_empty() {
        Extraction::NoSymptoms
    } else {
        Extraction::Symptoms { symptoms }
    }
}

fn field_of(err: &SymptomScribeError) -> String {
    err.field().unwrap_or("unknown").to_string()
}
