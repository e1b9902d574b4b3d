//! Claim analysis: primary category plus grouped detailed indicators.

use std::collections::BTreeMap;

use greenlens_core::{ClassificationResult, LabelTaxonomy, Score};
use tracing::{debug, warn};

use crate::{AiError, ClassifierHandle};

/// Runs the two zero-shot passes for a claim and regroups the results.
///
/// 1. Primary: the category names, single-label (scores sum to 1).
/// 2. Detailed: every indicator, multi-label (each scored independently).
///
/// Detailed scores are bucketed under their owning category in the order the
/// model returned them. Nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct Analyzer {
    classifier: ClassifierHandle,
    taxonomy: LabelTaxonomy,
}

impl Analyzer {
    pub fn new(classifier: ClassifierHandle) -> Self {
        Self::with_taxonomy(classifier, LabelTaxonomy::standard())
    }

    pub fn with_taxonomy(classifier: ClassifierHandle, taxonomy: LabelTaxonomy) -> Self {
        Self {
            classifier,
            taxonomy,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_ready()
    }

    /// Classify `text` into a primary category and grouped indicators.
    pub fn analyze(&self, text: &str) -> Result<ClassificationResult, AiError> {
        if !self.classifier.is_ready() {
            return Err(AiError::ModelUnavailable);
        }

        let primary_labels = self.taxonomy.primary_labels();
        let primary = self.classifier.classify(text, &primary_labels, false)?;

        let detailed_labels = self.taxonomy.detailed_labels();
        let detailed = self.classifier.classify(text, &detailed_labels, true)?;

        let top = primary
            .first()
            .ok_or_else(|| AiError::InvalidOutput("empty primary classification".into()))?;
        if !self.taxonomy.is_primary(&top.label) {
            return Err(AiError::InvalidOutput(format!(
                "model predicted unknown category {:?}",
                top.label
            )));
        }
        let prediction = top.label.clone();
        let confidence = top.score;

        let detailed_analysis = self.group_indicators(detailed);

        debug!(
            prediction = %prediction,
            confidence,
            chars = text.len(),
            "analyzed claim"
        );
        Ok(ClassificationResult {
            prediction,
            confidence,
            scores: primary,
            detailed_analysis,
        })
    }

    /// Bucket indicator scores under their owning category.
    ///
    /// Every category gets a bucket, even an empty one. Labels outside the
    /// taxonomy are dropped.
    pub fn group_indicators(&self, detailed: Vec<Score>) -> BTreeMap<String, Vec<Score>> {
        let mut grouped: BTreeMap<String, Vec<Score>> = self
            .taxonomy
            .primary_labels()
            .into_iter()
            .map(|category| (category.to_string(), Vec::new()))
            .collect();

        for score in detailed {
            match self.taxonomy.category_of(&score.label) {
                Some(category) => grouped.entry(category.to_string()).or_default().push(score),
                None => warn!(label = %score.label, "model returned an unknown indicator"),
            }
        }
        grouped
    }
}
