//! Decision parsing for free-form completion text.
//!
//! Leaf agents backed by a text-completion service receive raw text. These
//! helpers extract a decision label and an optional confidence from it.
//!
//! | Format | Example |
//! |--------|---------|
//! | JSON | `{"decision": "approve", "confidence": 0.8}` |
//! | Keyword line | `DECISION: CONDITIONAL` |
//! | Confidence | `confidence: 0.75`, `confidence 80%` |

use crate::agent::outcome::DecisionLabel;
use serde_json::Value;

/// Parse a decision from completion text.
///
/// Conservative: when both approval and rejection language appear, the
/// result is a rejection. Unrecognizable text yields
/// [`DecisionLabel::Unknown`].
pub fn parse_decision_text(response: &str) -> DecisionLabel {
    if let Some(json) = embedded_record(response)
        && let Some(label) = json.get("decision").and_then(Value::as_str)
    {
        return DecisionLabel::parse(label);
    }

    let upper = response.to_uppercase();

    let rejected = upper.contains("REJECT")
        || upper.contains("DENY")
        || upper.contains("NOT APPROVE")
        || upper.contains("CANNOT APPROVE");
    if rejected {
        return DecisionLabel::Rejected;
    }

    if upper.contains("CONDITIONAL") || upper.contains("WITH CONDITIONS") {
        return DecisionLabel::Conditional;
    }

    if upper.contains("APPROVE") {
        return DecisionLabel::Approved;
    }

    DecisionLabel::Unknown
}

/// Parse a confidence value in [0, 1] from completion text.
///
/// Accepts a JSON `confidence` field, a decimal after the word
/// "confidence", or a percentage after it.
pub fn parse_confidence(response: &str) -> Option<f64> {
    if let Some(json) = embedded_record(response)
        && let Some(confidence) = json.get("confidence").and_then(Value::as_f64)
    {
        return Some(normalize(confidence));
    }

    let lower = response.to_lowercase();
    let start = lower.find("confidence")? + "confidence".len();
    let number: String = lower[start..]
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = number.trim_end_matches('.').parse().ok()?;
    Some(normalize(value))
}

/// Values above 1 are treated as percentages
fn normalize(value: f64) -> f64 {
    if value > 1.0 {
        (value / 100.0).clamp(0.0, 1.0)
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// First `{` through last `}` of the text, when that span is valid JSON
pub fn embedded_record(response: &str) -> Option<Value> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    serde_json::from_str(&response[start..start + end + 1]).ok()
}
