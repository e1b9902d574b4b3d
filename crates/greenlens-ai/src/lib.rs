//! Zero-shot classification: ONNX Runtime NLI model, classifier handle, and claim analysis.

mod error;
pub use error::AiError;

mod classifier;
pub use classifier::{ClassifierHandle, ZeroShot};

mod analyzer;
pub use analyzer::Analyzer;

pub mod nli;

#[cfg(feature = "onnx")]
mod zero_shot;
#[cfg(feature = "onnx")]
pub use zero_shot::NliModel;

#[cfg(feature = "download")]
pub mod download;
