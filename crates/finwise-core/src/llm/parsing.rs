//! JSON parsing helpers for generated-content responses
//!
//! Models often wrap the requested JSON payload in extra prose or markdown
//! fences; these helpers extract the array before strict typed parsing.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Extract the JSON array embedded in a model response
///
/// Finds the outermost `[`..`]` span, which also handles ```json fences.
pub fn extract_json_array(response: &str) -> Result<&str> {
    let response = response.trim();

    let start = response.find('[');
    let end = response.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON array found in response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a model response as a strictly-typed JSON array
pub fn parse_array<T: DeserializeOwned>(response: &str) -> Result<Vec<T>> {
    let json_str = extract_json_array(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON array from model: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

// Truncate long responses for error messages
fn truncate(s: &str) -> String {
    if s.len() > 200 {
        let mut end = 200;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_parse_bare_array() {
        let response = r#"[{"name": "a"}, {"name": "b"}]"#;
        let items: Vec<Item> = parse_array(response).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "a");
    }

    #[test]
    fn test_parse_array_with_surrounding_text() {
        let response = "Here you go:\n```json\n[{\"name\": \"a\"}]\n```\nEnjoy!";
        let items: Vec<Item> = parse_array(response).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_no_array_is_error() {
        let result: Result<Vec<Item>> = parse_array("I could not produce the list.");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_array_is_error() {
        let result: Result<Vec<Item>> = parse_array(r#"[{"name": }]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        // valid JSON, wrong element shape
        let result: Result<Vec<Item>> = parse_array(r#"[{"title": "a"}]"#);
        assert!(result.is_err());
    }
}
