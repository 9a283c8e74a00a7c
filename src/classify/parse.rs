use crate::locator::PatternDescriptor;
use serde::Deserialize;

/// Envelope the model is prompted to emit
#[derive(Debug, Deserialize)]
struct ClassifierPayload {
    #[serde(default)]
    dark_patterns: Vec<PatternDescriptor>,
}

/// Parse the model's free-text answer into pattern descriptors.
///
/// The model is asked for JSON but routinely wraps it in markdown code
/// fences or leading prose. Parsing is attempted on the fence-stripped text
/// first, then on the outermost brace-delimited slice. Anything still
/// unparsable yields an empty list: partial usefulness over total failure.
pub fn parse_patterns(raw: &str) -> Vec<PatternDescriptor> {
    let cleaned = strip_code_fences(raw);

    if let Ok(payload) = serde_json::from_str::<ClassifierPayload>(&cleaned) {
        return payload.dark_patterns;
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(payload) = serde_json::from_str::<ClassifierPayload>(&cleaned[start..=end]) {
                log::debug!("Recovered classifier JSON from surrounding prose");
                return payload.dark_patterns;
            }
        }
    }

    log::warn!("Classifier output was not parsable JSON; treating as zero patterns");
    Vec::new()
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{
        "dark_patterns": [
            {"text": "Only 2 left!", "type": "Urgency", "description": "False scarcity"}
        ]
    }"#;

    #[test]
    fn test_plain_json() {
        let patterns = parse_patterns(PLAIN);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_type, "Urgency");
        // Selector is absent in model output and defaults to the sentinel
        assert!(patterns[0].selector_hint().is_none());
    }

    #[test]
    fn test_fenced_json() {
        let fenced = format!("```json\n{}\n```", PLAIN);
        let patterns = parse_patterns(&fenced);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].text, "Only 2 left!");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let wrapped = format!("Here are the detected patterns:\n{}\nLet me know if you need more.", PLAIN);
        let patterns = parse_patterns(&wrapped);
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn test_malformed_output_degrades_to_empty() {
        assert!(parse_patterns("I could not find any patterns, sorry!").is_empty());
        assert!(parse_patterns("{\"dark_patterns\": [{\"broken\"").is_empty());
        assert!(parse_patterns("").is_empty());
    }

    #[test]
    fn test_missing_array_means_no_patterns() {
        assert!(parse_patterns("{}").is_empty());
        assert!(parse_patterns(r#"{"something_else": 1}"#).is_empty());
    }
}
