//! Deterministic placeholder metrics for keywords no provider could price.
//!
//! Volume, competition and CPC are derived from word count and a stable hash
//! of the keyword text. They are not a model of real search demand.

use sha2::{Digest, Sha256};

use seolens_core::{CompetitionLevel, KeywordSuggestion, SuggestionSource};

/// First eight bytes of the SHA-256 digest of `keyword`, big-endian.
#[must_use]
pub fn keyword_hash(keyword: &str) -> u64 {
    let digest = Sha256::digest(keyword.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Returns a metrics-only record for `keyword`.
///
/// | words | volume               | competition | score                  |
/// |-------|----------------------|-------------|------------------------|
/// | ≤ 2   | 5000 + h mod 45000   | high        | 0.70 + (h mod 30)/100  |
/// | 3     | 1000 + h mod 9000    | medium      | 0.40 + (h mod 30)/100  |
/// | ≥ 4   | 100 + h mod 900      | low         | 0.10 + (h mod 30)/100  |
#[must_use]
pub fn estimate(keyword: &str) -> KeywordSuggestion {
    let h = keyword_hash(keyword);
    let words = keyword.split_whitespace().count();

    let (volume, competition, base_score) = match words {
        0..=2 => (5_000 + h % 45_000, CompetitionLevel::High, 0.70),
        3 => (1_000 + h % 9_000, CompetitionLevel::Medium, 0.40),
        _ => (100 + h % 900, CompetitionLevel::Low, 0.10),
    };

    #[allow(clippy::cast_precision_loss)]
    let jitter = (h % 30) as f64 / 100.0;
    #[allow(clippy::cast_precision_loss)]
    let cpc = (5.0 - 0.8 * words as f64).max(0.1);

    let mut record = KeywordSuggestion::new(keyword, SuggestionSource::Generated);
    record.search_volume = Some(volume);
    record.competition = competition;
    record.competition_score = Some((base_score + jitter).min(1.0));
    record.cpc = Some(cpc);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable() {
        assert_eq!(keyword_hash("seo tools"), keyword_hash("seo tools"));
        assert_ne!(keyword_hash("seo tools"), keyword_hash("seo tool"));
    }

    #[test]
    fn long_tail_is_low_volume_low_competition() {
        let est = estimate("best seo tools guide");
        let volume = est.search_volume.unwrap();
        assert!((100..=999).contains(&volume), "volume {volume} out of band");
        assert_eq!(est.competition, CompetitionLevel::Low);
        let score = est.competition_score.unwrap();
        assert!((0.10..0.40).contains(&score));
        assert!((est.cpc.unwrap() - 1.8).abs() < 1e-9);
        assert_eq!(estimate("best seo tools guide"), est);
    }

    #[test]
    fn three_words_is_medium() {
        let est = estimate("seo tools free");
        assert!((1_000..10_000).contains(&est.search_volume.unwrap()));
        assert_eq!(est.competition, CompetitionLevel::Medium);
    }

    #[test]
    fn head_terms_are_high() {
        let est = estimate("seo");
        assert!((5_000..50_000).contains(&est.search_volume.unwrap()));
        assert_eq!(est.competition, CompetitionLevel::High);
        assert!((est.cpc.unwrap() - 4.2).abs() < 1e-9);
    }

    #[test]
    fn cpc_floors_at_ten_cents() {
        let est = estimate("how to pick the best seo tools for a small business");
        assert!((est.cpc.unwrap() - 0.1).abs() < 1e-9);
    }
}
