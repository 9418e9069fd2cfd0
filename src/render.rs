//! Page and text rendering for extraction outcomes

use std::fmt::Write;

use crate::extractor::Extraction;
use crate::symptom::Symptom;

pub const TITLE: &str = "Patient Symptom Extractor";
pub const INPUT_LABEL: &str = "Enter the patient's description of symptoms:";
pub const SUBMIT_LABEL: &str = "Process Symptoms";
pub const RESULTS_HEADING: &str = "Extracted Symptoms";
pub const EMPTY_INPUT_WARNING: &str = "Please enter a description of symptoms before processing.";
pub const NO_SYMPTOMS_MESSAGE: &str = "No symptoms found.";
pub const PROCESSING_ERROR: &str = "An error occurred while processing the input.";
pub const FAILED_MESSAGE: &str = "Failed to process the input.";

const STYLE: &str = "\
body{font-family:sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem;color:#262730}
textarea{width:100%;min-height:9rem;font:inherit;padding:.5rem;box-sizing:border-box}
button{margin-top:.75rem;padding:.5rem 1rem;font:inherit;cursor:pointer}
.alert{padding:.75rem 1rem;border-radius:.4rem;margin:1rem 0}
.warning{background:#fffce7;color:#926c05}
.error{background:#ffecec;color:#7d353b}
.symptom p{margin:.35rem 0}";

/// Message shown when a record is missing a field
pub fn missing_key_message(field: &str) -> String {
    format!("Invalid JSON structure: missing key '{field}'")
}

/// Full HTML document: the input form, then the outcome if there is one.
pub fn render_page(input: &str, outcome: Option<&Extraction>) -> String {
    let mut html = String::with_capacity(2048);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{TITLE}</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"input\">{}</label>\n\
         <textarea id=\"input\" name=\"input\">\n{}</textarea>\n\
         <button type=\"submit\">{SUBMIT_LABEL}</button>\n\
         </form>\n",
        escape_html(INPUT_LABEL),
        escape_html(input),
    );

    if let Some(outcome) = outcome {
        render_outcome(&mut html, outcome);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_outcome(html: &mut String, outcome: &Extraction) {
    match outcome {
        Extraction::Empty => alert(html, "warning", EMPTY_INPUT_WARNING),
        Extraction::NoSymptoms => alert(html, "error", NO_SYMPTOMS_MESSAGE),
        Extraction::InvalidStructure { field } => {
            alert(html, "error", &missing_key_message(field))
        }
        Extraction::Failed { .. } => {
            alert(html, "error", PROCESSING_ERROR);
            alert(html, "error", FAILED_MESSAGE);
        }
        Extraction::Symptoms { symptoms } => {
            let _ = writeln!(html, "<h2>{RESULTS_HEADING}</h2>");
            for symptom in symptoms {
                render_symptom(html, symptom);
            }
        }
    }
}

fn render_symptom(html: &mut String, symptom: &Symptom) {
    html.push_str("<section class=\"symptom\">\n");
    for (label, value) in labeled_fields(symptom) {
        let _ = writeln!(
            html,
            "<p><strong>{label}:</strong> {}</p>",
            escape_html(&value)
        );
    }
    html.push_str("</section>\n<hr>\n");
}

fn alert(html: &mut String, kind: &str, message: &str) {
    let _ = writeln!(
        html,
        "<div class=\"alert {kind}\" role=\"alert\">{}</div>",
        escape_html(message)
    );
}

fn labeled_fields(symptom: &Symptom) -> [(&'static str, String); 5] {
    [
        ("Symptom Names", symptom.display_names()),
        ("Description", symptom.description.clone()),
        ("Duration", symptom.duration.clone()),
        ("Severity", symptom.severity.clone()),
        ("Notes", symptom.notes.clone()),
    ]
}

/// Plain-text rendering for terminal output
pub fn render_text(outcome: &Extraction) -> String {
    match outcome {
        Extraction::Empty => format!("{EMPTY_INPUT_WARNING}\n"),
        Extraction::NoSymptoms => format!("{NO_SYMPTOMS_MESSAGE}\n"),
        Extraction::InvalidStructure { field } => format!("{}\n", missing_key_message(field)),
        Extraction::Failed { message } => {
            format!("{PROCESSING_ERROR} {message}\n{FAILED_MESSAGE}\n")
        }
        Extraction::Symptoms { symptoms } => {
            let mut out = format!("{RESULTS_HEADING}\n\n");
            for symptom in symptoms {
                for (label, value) in labeled_fields(symptom) {
                    let _ = writeln!(out, "{label}: {value}");
                }
                out.push_str("---\n");
            }
            out
        }
    }
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
