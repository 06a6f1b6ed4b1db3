//! Third-party keyword and SERP providers, and the fallback chains over them.
//!
//! Each adapter owns a `reqwest::Client` built once at startup and makes one
//! outbound call per operation. Adapters report failures as
//! [`ProviderError`]; chains log and swallow tier failures and fall through
//! to the next strategy.

pub mod cache;
pub mod error;
mod http;
mod retry;
pub mod serp;
pub mod suggestion;
pub mod volume;

pub use cache::TtlCache;
pub use error::ProviderError;
pub use http::HttpSettings;
pub use serp::{extract_domain, SerpChain, SerpClient, SerpRequest};
pub use suggestion::{
    generate_variations, DataForSeoClient, PublicAutocompleteClient, SerpApiAutocompleteClient,
    SuggestionChain, SuggestionOutcome,
};
pub use volume::{estimate, keyword_hash, GoogleAdsClient, VolumeChain};
