// Structured extraction - free-form generated text → validated records
//
// Generated text is asked for bare JSON, but often arrives wrapped in a code
// fence or surrounded by a sentence of prose. The extractor strips the fence,
// falls back to the outermost `{ … }` slice, and validates the payload against
// a fixed schema. Anything that does not conform is a typed `ExtractionError`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::error::ExtractionError;
use super::types::{EvaluationResult, Persona};

/// Schema a block of text is extracted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `{"name": [...], "background": [...]}` zipped into personas
    PersonaList,
    /// `{"is_information_sufficient": bool, "reason": "..."}`
    Sufficiency,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonaList => f.write_str("persona list"),
            Self::Sufficiency => f.write_str("sufficiency"),
        }
    }
}

/// An extracted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    PersonaList(Vec<Persona>),
    Sufficiency(EvaluationResult),
}

/// Extract `text` against `schema`.
pub fn extract(text: &str, schema: RecordKind) -> Result<Record, ExtractionError> {
    match schema {
        RecordKind::PersonaList => extract_personas(text).map(Record::PersonaList),
        RecordKind::Sufficiency => extract_sufficiency(text).map(Record::Sufficiency),
    }
}

/// Extract a persona list from parallel `name` / `background` arrays.
pub fn extract_personas(text: &str) -> Result<Vec<Persona>, ExtractionError> {
    let schema = RecordKind::PersonaList;
    let raw: RawPersonaList = parse_payload(text, schema)?;

    if raw.name.len() != raw.background.len() {
        return Err(ExtractionError::LengthMismatch {
            schema,
            names: raw.name.len(),
            backgrounds: raw.background.len(),
            raw: text.to_string(),
        });
    }

    if raw.name.is_empty() {
        return Err(ExtractionError::Malformed {
            schema,
            detail: "payload contains no personas".to_string(),
            raw: text.to_string(),
        });
    }

    Ok(raw
        .name
        .into_iter()
        .zip(raw.background)
        .map(|(name, background)| Persona::new(name.trim(), background.trim()))
        .collect())
}

/// Extract a sufficiency verdict.
pub fn extract_sufficiency(text: &str) -> Result<EvaluationResult, ExtractionError> {
    let raw: RawSufficiency = parse_payload(text, RecordKind::Sufficiency)?;
    Ok(EvaluationResult {
        reason: raw.reason.trim().to_string(),
        sufficient: raw.is_information_sufficient,
    })
}

#[derive(Debug, Deserialize)]
struct RawPersonaList {
    #[serde(alias = "names")]
    name: Vec<String>,
    #[serde(alias = "backgrounds")]
    background: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSufficiency {
    #[serde(alias = "sufficient")]
    is_information_sufficient: bool,
    reason: String,
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_+.\-]*[ \t]*\r?\n?(.*?)\s*```\s*$")
        .expect("code fence pattern is valid")
});

/// Strip a leading/trailing code fence (```json, ```yaml, bare ```).
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text.trim(),
    }
}

/// Slice from the first `{` to the last `}`, if both exist in that order
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_payload<T: DeserializeOwned>(text: &str, schema: RecordKind) -> Result<T, ExtractionError> {
    let body = strip_code_fence(text);

    let result = match decode_object(body) {
        Ok(value) => Ok(value),
        Err(first) => match outer_object(body) {
            Some(slice) if slice != body => decode_object(slice),
            _ => Err(first),
        },
    };

    result.map_err(|detail| {
        tracing::debug!(%schema, %detail, "Extraction failed");
        ExtractionError::Malformed {
            schema,
            detail,
            raw: text.to_string(),
        }
    })
}

/// Decode `text` as a JSON object into `T`; the error is a human-readable detail
fn decode_object<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("payload is not a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
