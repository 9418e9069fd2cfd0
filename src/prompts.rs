//! Fixed instruction sent with every extraction request

use serde::Serialize;

pub const SYSTEM_INSTRUCTION: &str = "\
You are an assistant that helps a busy doctor who needs to quickly review and document symptoms described by patients during calls.
Your task is to carefully listen to the patient's description and extract all relevant symptoms.
For each symptom mentioned, provide the name of the symptom, a brief description, the duration for which the symptom has been present, its severity, and any additional notes or observations.
The final output should be a comprehensive and well-structured list of symptoms with all necessary details.
If the conversation is not inherent with the patient problem just return an empty list.";

/// A single chat message in provider wire format
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// System instruction followed by the patient's text, verbatim
pub fn build_messages(input: &str) -> [ChatMessage<'_>; 2] {
    [
        ChatMessage {
            role: "system",
            content: SYSTEM_INSTRUCTION,
        },
        ChatMessage {
            role: "user",
            content: input,
        },
    ]
}
