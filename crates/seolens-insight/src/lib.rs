//! LLM interpretation stage: intent, clustering, difficulty, recommendations
//! and content gaps.
//!
//! The model is reached through the [`LanguageModel`] trait so tests and the
//! orchestrator can substitute a scripted implementation. [`GeminiClient`] is
//! the production backend.

pub mod error;
pub mod gemini;
pub mod model;
pub mod parse;
pub mod prompts;
pub mod tasks;

pub use error::InsightError;
pub use gemini::GeminiClient;
pub use model::{LanguageModel, Part};
pub use parse::{parse_object, strip_fences};
pub use tasks::{default_cluster_count, DifficultyAssessment, Interpreter};
