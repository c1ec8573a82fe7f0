//! Locates the first well-formed JSON object inside free-form model output.
//!
//! Models wrap answers in prose or code fences no matter what the system
//! prompt says, so every caller goes through `extract_json_object` and
//! decides what to do with a `Fallback`.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of looking for a JSON object in model output.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonExtraction<T> {
    /// A brace-delimited object was found and matched `T`.
    Parsed(T),
    /// Nothing usable was found. Carries the reason for logging.
    Fallback(String),
}

/// Scans `text` for the first `{` that starts a complete JSON object and
/// deserializes that object into `T`.
///
/// Trailing text after the object is ignored. A well-formed object that does
/// not fit `T` yields `Fallback` rather than trying later objects.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> JsonExtraction<T> {
    for (start, _) in text.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        let object = match stream.next() {
            Some(Ok(value @ Value::Object(_))) => value,
            _ => continue,
        };

        return match serde_json::from_value::<T>(object) {
            Ok(parsed) => JsonExtraction::Parsed(parsed),
            Err(e) => JsonExtraction::Fallback(format!("JSON object did not match schema: {e}")),
        };
    }

    JsonExtraction::Fallback("no JSON object found in model output".to_string())
}
