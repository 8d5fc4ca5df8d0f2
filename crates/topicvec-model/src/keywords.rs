//! Ranked keywords per topic.
//!
//! Terms are scored with a class-based TF-IDF: the term frequency inside the
//! topic times `ln(1 + topics / topics_containing_term)`, so words shared by
//! every topic sink to the bottom.

use std::collections::{BTreeMap, HashMap, HashSet};

use topicvec_core::corpus::tokenize;
use topicvec_core::types::TopicId;

/// Common English function words that never make useful topic names.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "you", "are", "not", "have", "but", "was", "they", "his", "her",
    "she", "from", "what", "all", "can", "there", "would", "will", "one", "about", "their", "which", "has", "been",
    "more", "who", "were", "any", "out", "some", "don", "just", "like", "also", "than", "then", "them", "your",
    "how", "when", "only", "other", "its", "into", "our", "because", "does", "could", "should", "these", "those",
    "know", "think", "get", "very", "such", "even", "most", "well", "many", "much", "why", "where", "had", "did",
    "here", "may", "being", "over", "same", "own", "too", "both", "each", "few", "him", "now", "off", "once",
    "said", "see", "use", "way", "make", "really", "people", "time", "good", "new", "first", "thing", "things",
];

pub struct KeywordRanker {
    min_token_len: usize,
    top_n: usize,
    stopwords: HashSet<&'static str>,
}

impl KeywordRanker {
    pub fn new(min_token_len: usize, top_n: usize) -> Self {
        Self { min_token_len, top_n, stopwords: STOPWORDS.iter().copied().collect() }
    }

    /// `docs` pairs each text with its topic id.
    pub fn rank<'a, I>(&self, docs: I) -> BTreeMap<TopicId, Vec<String>>
    where
        I: IntoIterator<Item = (TopicId, &'a str)>,
    {
        let mut tf: BTreeMap<TopicId, HashMap<String, usize>> = BTreeMap::new();
        for (topic, text) in docs {
            let counts = tf.entry(topic).or_default();
            for token in tokenize(text, self.min_token_len) {
                if self.stopwords.contains(token.as_str()) || token.chars().all(|c| c.is_ascii_digit()) { continue; }
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        let mut df: HashMap<&str, usize> = HashMap::new();
        for counts in tf.values() {
            for term in counts.keys() { *df.entry(term.as_str()).or_insert(0) += 1; }
        }
        let topics = tf.len() as f64;
        tf.iter()
            .map(|(&topic, counts)| {
                let mut scored: Vec<(&str, f64)> = counts
                    .iter()
                    .map(|(term, &n)| {
                        let idf = (1.0 + topics / df[term.as_str()] as f64).ln();
                        (term.as_str(), n as f64 * idf)
                    })
                    .collect();
                scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                (topic, scored.into_iter().take(self.top_n).map(|(t, _)| t.to_string()).collect())
            })
            .collect()
    }
}
