//! Competitor mining over organic SERP results.

use std::collections::HashMap;

use seolens_core::{OrganicResult, SerpFeature, SerpFeatureType};

use crate::types::CompetitorDomain;

/// Groups organic results by domain.
///
/// Domains are ordered by number of rankings (descending), then by average
/// position (ascending). Results with no extractable domain are skipped.
#[must_use]
pub fn group_by_domain(results: &[OrganicResult]) -> Vec<CompetitorDomain> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (Vec<u32>, Vec<String>)> = HashMap::new();

    for result in results {
        if result.domain.is_empty() {
            tracing::debug!(url = %result.url, "skipping organic result without a domain");
            continue;
        }
        let entry = stats.entry(result.domain.clone()).or_insert_with(|| {
            order.push(result.domain.clone());
            (Vec::new(), Vec::new())
        });
        entry.0.push(result.position);
        entry.1.push(result.url.clone());
    }

    let mut competitors: Vec<CompetitorDomain> = order
        .into_iter()
        .filter_map(|domain| {
            let (positions, urls) = stats.remove(&domain)?;
            let total: f64 = positions.iter().map(|p| f64::from(*p)).sum();
            #[allow(clippy::cast_precision_loss)]
            let avg_position = total / positions.len() as f64;
            Some(CompetitorDomain {
                domain,
                num_rankings: positions.len(),
                ranking_positions: positions,
                avg_position,
                urls,
            })
        })
        .collect();

    competitors.sort_by(|a, b| {
        b.num_rankings
            .cmp(&a.num_rankings)
            .then_with(|| a.avg_position.total_cmp(&b.avg_position))
    });
    competitors
}

/// Distinct feature types in first-seen order.
#[must_use]
pub fn common_features(features: &[SerpFeature]) -> Vec<SerpFeatureType> {
    let mut seen = Vec::new();
    for feature in features {
        if !seen.contains(&feature.feature_type) {
            seen.push(feature.feature_type);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organic(position: u32, domain: &str) -> OrganicResult {
        OrganicResult {
            position,
            title: format!("Result {position}"),
            url: format!("https://{domain}/{position}"),
            displayed_url: domain.to_owned(),
            domain: domain.to_owned(),
            snippet: String::new(),
            date: None,
            rich_snippet: None,
            sitelinks: None,
        }
    }

    #[test]
    fn repeat_rankers_come_first() {
        let results = vec![
            organic(1, "ahrefs.com"),
            organic(2, "moz.com"),
            organic(3, "semrush.com"),
            organic(4, "moz.com"),
        ];
        let grouped = group_by_domain(&results);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].domain, "moz.com");
        assert_eq!(grouped[0].ranking_positions, vec![2, 4]);
        assert_eq!(grouped[0].num_rankings, 2);
        assert!((grouped[0].avg_position - 3.0).abs() < f64::EPSILON);
        assert_eq!(grouped[1].domain, "ahrefs.com");
        assert_eq!(grouped[2].domain, "semrush.com");
    }

    #[test]
    fn results_without_domain_are_skipped() {
        let grouped = group_by_domain(&[organic(1, ""), organic(2, "moz.com")]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].urls, vec!["https://moz.com/2".to_owned()]);
    }

    #[test]
    fn common_features_are_deduplicated() {
        let features = vec![
            SerpFeature::bare(SerpFeatureType::PeopleAlsoAsk),
            SerpFeature::bare(SerpFeatureType::FeaturedSnippet),
            SerpFeature::bare(SerpFeatureType::PeopleAlsoAsk),
        ];
        assert_eq!(
            common_features(&features),
            vec![SerpFeatureType::PeopleAlsoAsk, SerpFeatureType::FeaturedSnippet]
        );
    }
}
