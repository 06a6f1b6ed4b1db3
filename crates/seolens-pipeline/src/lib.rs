//! Orchestration of the SEOLens pipelines.
//!
//! [`Orchestrator`] sequences the provider fallback chains and the
//! interpretation stage into named end-to-end operations. It is the only
//! component that decides which optional stages run; everything it calls is
//! unconditional once invoked.
//!
//! Content generation sits beside the research pipelines: one multimodal
//! model call followed by a local similarity check.

pub mod competitors;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod similarity;
pub mod types;

pub use competitors::group_by_domain;
pub use error::PipelineError;
pub use orchestrator::Orchestrator;
pub use services::AppServices;
pub use similarity::check_similarity;
pub use types::{
    AnalyzeOptions, ClusterReport, CompetitorDomain, CompetitorReport, GeneratedContent,
    KeywordAnalysis, PlagiarismSummary, SerpOptions, SimilarityReport, SuggestOptions,
    SuggestionsReport,
};
