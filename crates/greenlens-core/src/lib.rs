//! Core types for greenlens: the claim taxonomy and the analysis wire format.

pub mod analysis;
pub mod taxonomy;

pub use analysis::{ClassificationResult, HealthStatus, Score, TextClaim, usable_text};
pub use taxonomy::{LabelTaxonomy, PRIMARY_LABELS};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Greenwash Detector API";

/// Identifier of the zero-shot NLI model the classifier is built on.
pub const MODEL_ID: &str = "typeform/distilbert-base-uncased-mnli";
