//! TF-IDF cosine similarity of a text against reference texts.
//!
//! Term weights are raw counts times a smoothed inverse document frequency,
//! `ln((1 + n) / (1 + df)) + 1`, over the corpus `[text] + references`.
//! Document vectors are L2-normalised before comparison.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::types::{PlagiarismSummary, SimilarityReport};

/// Above this percentage a text is reported as a plagiarism risk.
const RISK_THRESHOLD_PERCENT: f64 = 30.0;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just",
    "last", "latter", "least", "less", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere",
    "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since",
    "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "this", "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn tokenize(text: &str, token_re: &Regex, stop_words: &HashSet<&str>) -> Vec<String> {
    token_re
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_owned())
        .filter(|token| !stop_words.contains(token.as_str()))
        .collect()
}

fn l2_normalise(vector: &mut HashMap<String, f64>) {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores how much of `text` is covered by the closest reference.
#[must_use]
pub fn check_similarity(text: &str, references: &[String]) -> SimilarityReport {
    if references.is_empty() {
        return SimilarityReport {
            plagiarism_percent: 0.0,
            originality_percent: 100.0,
            verdict: "No references available – assumed original".to_owned(),
        };
    }

    let token_re = Regex::new(r"\b\w\w+\b").expect("valid token regex");
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let documents: Vec<Vec<String>> = std::iter::once(text)
        .chain(references.iter().map(String::as_str))
        .map(|doc| tokenize(doc, &token_re, &stop_words))
        .collect();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in &documents {
        let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_default() += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = documents.len() as f64;
    let vectors: Vec<HashMap<String, f64>> = documents
        .iter()
        .map(|doc| {
            let mut vector: HashMap<String, f64> = HashMap::new();
            for term in doc {
                *vector.entry(term.clone()).or_default() += 1.0;
            }
            for (term, weight) in &mut vector {
                #[allow(clippy::cast_precision_loss)]
                let df = document_frequency.get(term.as_str()).copied().unwrap_or(0) as f64;
                *weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            }
            l2_normalise(&mut vector);
            vector
        })
        .collect();

    let (source, others) = vectors.split_at(1);
    let max_score = others
        .iter()
        .map(|reference| cosine(&source[0], reference))
        .fold(0.0_f64, f64::max);

    let plagiarism_percent = round2(max_score * 100.0);
    let verdict = if plagiarism_percent > RISK_THRESHOLD_PERCENT {
        "High plagiarism risk"
    } else {
        "Low plagiarism risk"
    };

    SimilarityReport {
        plagiarism_percent,
        originality_percent: round2(100.0 - plagiarism_percent),
        verdict: verdict.to_owned(),
    }
}

impl PlagiarismSummary {
    /// Summarises a similarity check; below the risk threshold counts as unique.
    #[must_use]
    pub fn from_report(report: &SimilarityReport, sources_found: usize) -> Self {
        Self {
            is_unique: report.plagiarism_percent < RISK_THRESHOLD_PERCENT,
            plagiarism_score: report.plagiarism_percent,
            originality_score: report.originality_percent,
            sources_found,
        }
    }
}
