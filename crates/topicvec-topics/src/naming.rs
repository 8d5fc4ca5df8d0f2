use std::collections::BTreeMap;

use topicvec_core::types::TopicId;

/// First `n` keywords joined by `_`; `topic_<id>` when there are none.
pub fn keyword_name(topic: TopicId, words: Option<&Vec<String>>, n: usize) -> String {
    match words {
        Some(words) if !words.is_empty() => words.iter().take(n).map(String::as_str).collect::<Vec<_>>().join("_"),
        _ => format!("topic_{}", topic),
    }
}

/// Most frequent label. Ties go to the lexicographically smallest label so
/// the result does not depend on member order.
pub fn majority_name<'a, I>(labels: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels { *counts.entry(label).or_insert(0) += 1; }
    let best = counts.values().copied().max()?;
    counts.into_iter().find(|&(_, n)| n == best).map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_name_joins_first_words() {
        let words = vec!["space".to_string(), "nasa".to_string(), "orbit".to_string(), "launch".to_string()];
        assert_eq!(keyword_name(3, Some(&words), 3), "space_nasa_orbit");
        assert_eq!(keyword_name(3, None, 3), "topic_3");
    }

    #[test]
    fn majority_breaks_ties_lexicographically() {
        assert_eq!(majority_name(["b", "a", "b", "a", "c"]).as_deref(), Some("a"));
        assert_eq!(majority_name(["x", "y", "y"]).as_deref(), Some("y"));
        assert_eq!(majority_name(Vec::<&str>::new()), None);
    }
}
