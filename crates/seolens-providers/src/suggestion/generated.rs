use seolens_core::{KeywordSuggestion, SuggestionSource};

/// Modifiers combined with the seed when every remote tier comes up short.
pub const MODIFIERS: [&str; 12] = [
    "best", "top", "how to", "what is", "guide", "tutorial", "free", "online", "near me",
    "cheap", "review", "vs",
];

/// Local last-resort tier. Emits `"{modifier} {seed}"` then `"{seed} {modifier}"`
/// for each modifier, in order. Never fails.
#[must_use]
pub fn generate_variations(seed: &str) -> Vec<KeywordSuggestion> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Vec::new();
    }
    MODIFIERS
        .iter()
        .flat_map(|modifier| [format!("{modifier} {seed}"), format!("{seed} {modifier}")])
        .map(|keyword| KeywordSuggestion::new(keyword, SuggestionSource::Generated))
        .collect()
}
