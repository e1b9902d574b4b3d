//! ONNX Runtime zero-shot classifier built on an NLI sequence-classification model.
//!
//! Defaults to distilbert-base-uncased-mnli. The model directory must contain
//! `model.onnx`, `tokenizer.json` and `config.json` (for the `id2label` map).

use std::path::Path;
use std::sync::Mutex;

use greenlens_core::{MODEL_ID, Score};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::nli::{self, NliLabels};
use crate::{AiError, ZeroShot};

/// Premise tokens beyond this are truncated; the hypothesis is kept whole.
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Zero-shot classifier over an NLI model in ONNX format.
///
/// One `(text, hypothesis)` pair per candidate label is run as a single
/// padded batch. The session needs exclusive access per run, so concurrent
/// callers are serialized on an internal lock.
pub struct NliModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: NliLabels,
    token_type_ids: bool,
}

impl NliModel {
    /// Load a model from a directory containing `model.onnx`, `tokenizer.json`
    /// and `config.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );
        anyhow::ensure!(config_path.exists(), "config.json not found in {model_dir:?}");

        let labels = NliLabels::from_config_file(&config_path)?;

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // DistilBERT exports take no segment ids; BERT-style exports do.
        let token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                strategy: tokenizers::TruncationStrategy::OnlyFirst,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        // Pad every pair in a batch to the longest one.
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        info!(
            model = %model_path.display(),
            entailment = labels.entailment,
            contradiction = labels.contradiction,
            token_type_ids,
            "loaded NLI model"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            token_type_ids,
        })
    }

    /// Entailment/contradiction layout read from `config.json`.
    pub fn labels(&self) -> NliLabels {
        self.labels
    }

    /// Run the NLI model over `(text, hypothesis)` pairs, one logit row per pair.
    fn logits(&self, text: &str, candidate_labels: &[&str]) -> Result<Vec<Vec<f32>>, AiError> {
        let pairs: Vec<(String, String)> = candidate_labels
            .iter()
            .map(|label| (text.to_string(), nli::hypothesis(label)))
            .collect();
        let batch_size = pairs.len();

        let encodings = self
            .tokenizer
            .encode_batch(pairs, true)
            .map_err(|e| AiError::Tokenize(e.to_string()))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Flat [batch_size, seq_len] inputs.
        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        let mut token_type_ids = vec![0i64; batch_size * seq_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + j] = id as i64;
            }
            for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + j] = mask as i64;
            }
            for (j, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + j] = tid as i64;
            }
        }

        let shape = [batch_size as i64, seq_len as i64];
        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;

        let mut session = self.session.lock().map_err(|_| AiError::Poisoned)?;
        let outputs = if self.token_type_ids {
            let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        // Logits: [batch_size, num_labels].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        let classes = self.labels.num_labels;
        if dims.len() != 2 || dims[0] as usize != batch_size || dims[1] as usize != classes {
            return Err(AiError::InvalidOutput(format!(
                "logits shape {dims:?}, expected [{batch_size}, {classes}]"
            )));
        }

        Ok(output_data
            .chunks(classes)
            .map(|row| row.to_vec())
            .collect())
    }
}

impl ZeroShot for NliModel {
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<Score>, AiError> {
        if candidate_labels.is_empty() {
            return Err(AiError::NoCandidateLabels);
        }
        let logits = self.logits(text, candidate_labels)?;
        let scores = nli::rank_scores(candidate_labels, &logits, self.labels, multi_label)?;
        debug!(
            candidates = candidate_labels.len(),
            multi_label,
            top = scores.first().map(|s| s.label.as_str()).unwrap_or_default(),
            "zero-shot classification"
        );
        Ok(scores)
    }

    fn model_id(&self) -> &str {
        MODEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenlens_core::LabelTaxonomy;
    use std::path::PathBuf;

    fn model_dir() -> PathBuf {
        std::env::var_os("GREENLENS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("..")
                    .join("..")
                    .join("models")
                    .join("distilbert-base-uncased-mnli")
            })
    }

    fn require_model() -> PathBuf {
        let dir = model_dir();
        if !dir.join("model.onnx").exists() {
            panic!(
                "Model not found in {}. Fetch it with:\n  \
                 greenlens download-model --dest {}",
                dir.display(),
                dir.display()
            );
        }
        dir
    }

    #[test]
    fn load_rejects_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = NliModel::load(dir.path()).err().unwrap();
        assert!(err.to_string().contains("model.onnx not found"));
    }

    #[test]
    #[ignore = "needs the ONNX model in models/"]
    fn load_model() {
        let model = NliModel::load(&require_model()).unwrap();
        assert_eq!(model.labels().num_labels, 3);
        assert_eq!(model.model_id(), MODEL_ID);
    }

    #[test]
    #[ignore = "needs the ONNX model in models/"]
    fn single_label_primary_scores_sum_to_one() {
        let model = NliModel::load(&require_model()).unwrap();
        let taxonomy = LabelTaxonomy::standard();
        let scores = model
            .classify(
                "We are committed to carbon neutrality by 2050 through verified offset programs.",
                &taxonomy.primary_labels(),
                false,
            )
            .unwrap();
        assert_eq!(scores.len(), 3);
        let total: f32 = scores.iter().map(|s| s.score).sum();
        assert!((total - 1.0).abs() < 1e-3, "sum was {total}");
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    #[ignore = "needs the ONNX model in models/"]
    fn multi_label_scores_in_range() {
        let model = NliModel::load(&require_model()).unwrap();
        let labels = LabelTaxonomy::standard().detailed_labels();
        let scores = model
            .classify("100% natural, planet-friendly goodness!", &labels, true)
            .unwrap();
        assert_eq!(scores.len(), labels.len());
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.score)));
    }
}
