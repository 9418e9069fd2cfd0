//! Symptom record extracted from a patient's description, and the tool
//! schema the model is asked to fill in.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, SymptomScribeError};

/// Patient symptom described during a doctor's call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symptom {
    pub names: Vec<String>,
    pub description: String,
    pub duration: String,
    pub severity: String,
    pub notes: String,
}

/// Field names in the order they are displayed
pub const FIELDS: [&str; 5] = ["names", "description", "duration", "severity", "notes"];

impl Symptom {
    pub const TOOL_NAME: &'static str = "Symptom";
    pub const TOOL_DESCRIPTION: &'static str = "Patient symptom described during a doctor's call.";

    /// Function-calling tool entry for a chat completion request
    pub fn tool_definition() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": Self::TOOL_NAME,
                "description": Self::TOOL_DESCRIPTION,
                "parameters": {
                    "type": "object",
                    "properties": {
                        "names": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "List of symptoms described by the patient"
                        },
                        "description": {
                            "type": "string",
                            "description": "Detailed description of the symptoms and any associated information"
                        },
                        "duration": {
                            "type": "string",
                            "description": "Duration for which the symptom has been present (e.g., '2 days', '1 week')"
                        },
                        "severity": {
                            "type": "string",
                            "description": "Severity of the symptom (e.g., 'mild', 'moderate', 'severe')"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Any additional notes or relevant information provided by the patient or observed by the doctor"
                        }
                    },
                    "required": FIELDS
                }
            }
        })
    }

    /// Unpack one set of tool-call arguments.
    ///
    /// Only presence of each field is checked. Values are shown as the model
    /// wrote them: strings verbatim, `null` as empty, anything else as JSON.
    pub fn from_args(args: &Value) -> Result<Self> {
        let names = match lookup(args, "names")? {
            Value::Array(items) => items.iter().map(display_value).collect(),
            Value::Null => Vec::new(),
            other => vec![display_value(other)],
        };

        Ok(Self {
            names,
            description: text_field(args, "description")?,
            duration: text_field(args, "duration")?,
            severity: text_field(args, "severity")?,
            notes: text_field(args, "notes")?,
        })
    }

    /// Symptom names joined for display
    pub fn display_names(&self) -> String {
        self.names.join(", ")
    }
}

fn lookup<'a>(args: &'a Value, field: &str) -> Result<&'a Value> {
    args.get(field)
        .ok_or_else(|| SymptomScribeError::MissingField {
            field: field.to_string(),
        })
}

fn text_field(args: &Value, field: &str) -> Result<String> {
    lookup(args, field).map(display_value)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
