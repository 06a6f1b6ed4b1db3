//! Prompt templates for each interpretation task.
//!
//! Placeholders are `{name}` tokens substituted by [`render`]. Literal JSON
//! braces in the templates are left untouched because only known names are
//! replaced.

pub const INTENT_CLASSIFICATION: &str = r#"You are an SEO specialist labelling search intent.

Assign each keyword below to exactly one intent:
- INFORMATIONAL: the searcher wants to learn something
- COMMERCIAL: the searcher is comparing products or services before buying
- TRANSACTIONAL: the searcher is ready to buy or act
- NAVIGATIONAL: the searcher wants a specific site or page

Keywords:
{keywords}

Reply with a single JSON object and nothing else:
{
    "classifications": [
        {"keyword": "example keyword", "intent": "INFORMATIONAL", "confidence": 0.9, "reasoning": "short reason"}
    ]
}

Pay attention to modifiers such as "how to", "best", "buy", "near me" and "vs".
"#;

pub const KEYWORD_CLUSTERING: &str = r#"You are an SEO specialist grouping keywords by topic.

Group the keywords below into {num_clusters} clusters, considering shared meaning,
shared search intent, and whether one page could reasonably target the whole group.

Keywords:
{keywords}

For every cluster give it a descriptive name, pick the most representative keyword
as primary, list its member keywords exactly as written above, and suggest a
content approach.

Reply with a single JSON object and nothing else:
{
    "clusters": [
        {
            "cluster_id": 1,
            "cluster_name": "Descriptive theme",
            "primary_keyword": "main keyword",
            "keywords": ["keyword one", "keyword two"],
            "intent": "INFORMATIONAL|COMMERCIAL|TRANSACTIONAL|NAVIGATIONAL",
            "recommendation": "Short content suggestion"
        }
    ],
    "unclustered": ["keyword that fits nowhere"]
}
"#;

pub const DIFFICULTY_ANALYSIS: &str = r#"You are an SEO specialist estimating how hard a keyword is to rank for.

Estimate the difficulty of reaching the top 10 results for:

Keyword: {keyword}
Monthly search volume: {search_volume}
Advertiser competition: {competition_score} (0 to 1)
SERP features present: {serp_features}

Weigh search volume, advertiser competition, SERP features that push organic
results down, keyword length, and commercial intent.

Reply with a single JSON object and nothing else:
{
    "keyword": "{keyword}",
    "difficulty_level": "VERY_EASY|EASY|MEDIUM|HARD|VERY_HARD",
    "difficulty_score": 0,
    "reasoning": "Short explanation",
    "ranking_factors": ["factor: explanation"],
    "estimated_time_to_rank": "e.g. 3-6 months for a new domain"
}
difficulty_score is an integer from 0 to 100.
"#;

pub const RECOMMENDATIONS: &str = r#"You are an SEO strategist turning research into a plan.

Keyword data:
{keyword_data}

Keyword clusters:
{clusters}

SERP insights:
{serp_insights}

Cover which keywords to target first, what content to build per cluster, quick
wins, long-term targets, and which SERP features are worth pursuing.

Reply with a single JSON object and nothing else:
{
    "priority_keywords": [
        {"keyword": "example", "reason": "why first", "difficulty": "EASY|MEDIUM|HARD"}
    ],
    "content_strategy": [
        {"cluster": "cluster name", "content_type": "guide|landing page|comparison", "recommended_approach": "details"}
    ],
    "quick_wins": ["keyword"],
    "long_term_targets": ["keyword"],
    "serp_opportunities": [
        {"feature": "featured_snippet", "keywords": ["keyword"], "approach": "how to win it"}
    ],
    "overall_strategy": "Two or three sentence summary"
}
"#;

pub const CONTENT_GAPS: &str = r#"You are an SEO analyst looking for content gaps.

Top-ranking pages for the keyword "{keyword}":

Titles:
{competitor_titles}

Snippets:
{competitor_snippets}

Identify the themes competitors share, topics they cover poorly or not at all,
angles that would stand out, and the content format most likely to win.

Reply with a single JSON object and nothing else:
{
    "common_themes": ["theme"],
    "content_gaps": [
        {"gap": "missing topic", "opportunity": "why it matters"}
    ],
    "unique_angles": ["angle"],
    "recommended_format": "guide|listicle|comparison|video|tool",
    "content_outline": ["Section 1: title"]
}
"#;

pub const PRODUCT_CONTENT: &str = r#"You are an SEO copywriter writing product copy from the attached images.

Study the product shown and write search-optimised content for it.

Instructions:
{prompt}

Reply with a single JSON object and nothing else:
{
    "product_description": "two or three short paragraphs",
    "seo_title": "under 60 characters",
    "meta_description": "under 160 characters",
    "bullet_features": ["feature"]
}
"#;

/// Substitutes each `{name}` in `template` with its value.
///
/// One left-to-right pass over the template: substituted values are never
/// scanned again, so placeholder-like text inside a value stays literal.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
