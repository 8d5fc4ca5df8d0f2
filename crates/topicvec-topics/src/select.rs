//! Which topics and which member documents feed the aggregator.

use std::collections::BTreeMap;

use tracing::debug;

use topicvec_core::types::{Point2, TopicId};
use topicvec_core::vector::{dot, l2_norm, mean_rows, normalize, NORM_EPSILON};
use topicvec_core::Result;

/// Largest topics first (ties by id), dropping those below
/// `min_cluster_size`, keeping at most `limit`.
pub fn rank_topics(members: BTreeMap<TopicId, Vec<usize>>, min_cluster_size: usize, limit: usize) -> Vec<(TopicId, Vec<usize>)> {
    let mut ranked: Vec<(TopicId, Vec<usize>)> = members
        .into_iter()
        .filter(|(topic, docs)| {
            let keep = docs.len() >= min_cluster_size;
            if !keep { debug!(topic, size = docs.len(), min_cluster_size, "dropping small topic"); }
            keep
        })
        .collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Drop members whose layout x lies left of `min_x`.
pub fn filter_min_x(members: &[usize], coords: &[Point2], min_x: f64) -> Vec<usize> {
    members.iter().copied().filter(|&i| coords.get(i).is_some_and(|p| p.x >= min_x)).collect()
}

/// The `k` members closest (by cosine) to the topic centroid in the
/// unreduced embedding space, most representative first.
pub fn representative_members(topic: TopicId, members: &[usize], doc_vectors: &[Vec<f64>], k: usize) -> Result<Vec<usize>> {
    if members.len() <= k {
        return Ok(members.to_vec());
    }
    let centroid = normalize(&mean_rows(doc_vectors, members)?, &format!("topic {} centroid", topic))?;
    let mut scored = members
        .iter()
        .map(|&i| {
            let row = &doc_vectors[i];
            let norm = l2_norm(row);
            let cos = if norm > NORM_EPSILON { dot(row, &centroid)? / norm } else { f64::MIN };
            Ok((i, cos))
        })
        .collect::<Result<Vec<(usize, f64)>>>()?;
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(scored.into_iter().take(k).map(|(i, _)| i).collect())
}
