//! Request and response types shared by the API, the analyzer and the CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A label with its model confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub label: String,
    pub score: f32,
}

impl Score {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Full analysis of one claim.
///
/// `scores` is the primary-category ranking as returned by the model.
/// `detailed_analysis` always carries one key per primary category; each
/// bucket keeps the order of the detailed classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub prediction: String,
    pub confidence: f32,
    pub scores: Vec<Score>,
    pub detailed_analysis: BTreeMap<String, Vec<Score>>,
}

impl ClassificationResult {
    /// Total number of indicator scores across all buckets.
    pub fn indicator_count(&self) -> usize {
        self.detailed_analysis.values().map(Vec::len).sum()
    }
}

/// Body of `POST /api/classify-text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClaim {
    pub text: String,
}

/// Body of `GET /`.
///
/// `status` reports the process, `model_ready` the classifier. A running
/// service can still have no model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub service: String,
    pub status: String,
    pub model: String,
    pub model_ready: bool,
}

/// Trim `text` and return it only if something is left.
///
/// Extracted or submitted text that is empty or whitespace-only is unusable
/// for classification.
pub fn usable_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_json_shape() {
        let mut detailed = BTreeMap::new();
        detailed.insert(
            "Greenwashing".to_string(),
            vec![Score::new("Vague sustainability statement", 0.7)],
        );
        detailed.insert("Genuine Sustainability".to_string(), vec![]);
        detailed.insert("Marketing Hype".to_string(), vec![]);

        let result = ClassificationResult {
            prediction: "Greenwashing".into(),
            confidence: 0.5,
            scores: vec![
                Score::new("Greenwashing", 0.5),
                Score::new("Marketing Hype", 0.3),
                Score::new("Genuine Sustainability", 0.2),
            ],
            detailed_analysis: detailed,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prediction"], "Greenwashing");
        assert_eq!(json["scores"].as_array().unwrap().len(), 3);
        assert_eq!(json["scores"][0]["label"], "Greenwashing");
        assert_eq!(
            json["detailed_analysis"]["Greenwashing"][0]["label"],
            "Vague sustainability statement"
        );
        assert!(json.get("primary_scores").is_none());
        assert_eq!(result.indicator_count(), 1);
    }

    #[test]
    fn text_claim_from_json() {
        let claim: TextClaim = serde_json::from_str(r#"{"text": "100% eco"}"#).unwrap();
        assert_eq!(claim.text, "100% eco");
    }

    #[test]
    fn usable_text_trims() {
        assert_eq!(usable_text("  recycled packaging \n"), Some("recycled packaging"));
        assert_eq!(usable_text(""), None);
        assert_eq!(usable_text(" \t\n "), None);
    }
}
