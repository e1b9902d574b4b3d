//! NLI head layout and zero-shot scoring.
//!
//! A zero-shot classifier scores each candidate label by asking an NLI model
//! whether the input text entails the hypothesis "This example is {label}.".
//! This module holds the model-independent half: reading which logit means
//! entailment from `config.json`, and turning per-label logits into ranked
//! [`Score`]s.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use greenlens_core::Score;
use serde::Deserialize;

use crate::AiError;

/// Hypothesis template; `{}` is replaced by the candidate label.
pub const HYPOTHESIS_TEMPLATE: &str = "This example is {}.";

/// Build the hypothesis sentence for one candidate label.
pub fn hypothesis(label: &str) -> String {
    HYPOTHESIS_TEMPLATE.replace("{}", label)
}

/// Positions of the entailment and contradiction logits in the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NliLabels {
    pub entailment: usize,
    pub contradiction: usize,
    pub num_labels: usize,
}

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

impl NliLabels {
    /// Read `id2label` from a HuggingFace `config.json`.
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_config_json(&raw)
    }

    /// Parse `id2label` from the text of a `config.json`.
    ///
    /// Label names are matched case-insensitively by prefix (`entail`,
    /// `contradict`). Without a contradiction label the last class is used
    /// when entailment is class 0, otherwise class 0.
    pub fn from_config_json(raw: &str) -> anyhow::Result<Self> {
        let config: ModelConfig = serde_json::from_str(raw).context("parsing model config")?;
        anyhow::ensure!(!config.id2label.is_empty(), "config has an empty id2label");

        let mut labels: Vec<(usize, String)> = config
            .id2label
            .into_iter()
            .map(|(id, name)| {
                id.parse::<usize>()
                    .map(|id| (id, name.to_lowercase()))
                    .with_context(|| format!("non-numeric label id {id:?}"))
            })
            .collect::<anyhow::Result<_>>()?;
        labels.sort_by_key(|(id, _)| *id);

        let num_labels = labels.len();
        let find = |prefix: &str| {
            labels
                .iter()
                .find(|(_, name)| name.starts_with(prefix))
                .map(|(id, _)| *id)
        };

        let entailment = find("entail").ok_or_else(|| {
            let available: Vec<&str> = labels.iter().map(|(_, n)| n.as_str()).collect();
            anyhow::anyhow!("no entailment label in id2label: {available:?}")
        })?;
        let contradiction = find("contradict").unwrap_or(if entailment == 0 {
            num_labels - 1
        } else {
            0
        });

        anyhow::ensure!(
            entailment < num_labels && contradiction < num_labels,
            "label ids are not contiguous: {num_labels} labels, entailment={entailment}, contradiction={contradiction}"
        );

        Ok(Self {
            entailment,
            contradiction,
            num_labels,
        })
    }
}

/// Turn per-label NLI logits into scores ranked by descending confidence.
///
/// `logits[i]` is the model output for `(text, hypothesis(labels[i]))`.
/// Single-label mode softmaxes the entailment logits across labels, so the
/// scores sum to 1. Multi-label mode (also used for a single candidate)
/// softmaxes contradiction against entailment per label independently.
/// Ties keep candidate order.
pub fn rank_scores(
    labels: &[&str],
    logits: &[Vec<f32>],
    nli: NliLabels,
    multi_label: bool,
) -> Result<Vec<Score>, AiError> {
    if logits.len() != labels.len() {
        return Err(AiError::InvalidOutput(format!(
            "{} logit rows for {} labels",
            logits.len(),
            labels.len()
        )));
    }
    if let Some(row) = logits.iter().find(|row| row.len() != nli.num_labels) {
        return Err(AiError::InvalidOutput(format!(
            "logit row has {} classes, expected {}",
            row.len(),
            nli.num_labels
        )));
    }

    let probabilities: Vec<f32> = if multi_label || labels.len() == 1 {
        logits
            .iter()
            .map(|row| {
                let mut pair = [row[nli.contradiction], row[nli.entailment]];
                softmax_inplace(&mut pair);
                pair[1]
            })
            .collect()
    } else {
        let mut entail: Vec<f32> = logits.iter().map(|row| row[nli.entailment]).collect();
        softmax_inplace(&mut entail);
        entail
    };

    let mut scores: Vec<Score> = labels
        .iter()
        .zip(probabilities)
        .map(|(label, p)| Score::new(*label, p))
        .collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scores)
}

/// Numerically stable softmax.
fn softmax_inplace(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}
