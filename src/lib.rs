pub mod clients;
pub mod config;
pub mod error;
pub mod extractor;
pub mod http;
pub mod prompts;
pub mod render;
pub mod symptom;

pub use extractor::{Extraction, process_symptoms};
pub use symptom::Symptom;
