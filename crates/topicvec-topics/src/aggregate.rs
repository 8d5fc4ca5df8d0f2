//! Representative position and interest vector of one topic.
//!
//! The position is the coordinate-wise median of the members' 2D rows; the
//! vector is the coordinate-wise mean of their embedding rows divided by its
//! Euclidean norm (mean first, normalize second).

use topicvec_core::types::{Point2, TopicId};
use topicvec_core::vector::{mean_rows, median, normalize};
use topicvec_core::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TopicAggregate {
    pub position: Point2,
    pub vector: Vec<f64>,
    pub size: usize,
}

pub fn aggregate(topic: TopicId, members: &[usize], coords: &[Point2], embeddings: &[Vec<f64>]) -> Result<TopicAggregate> {
    if members.is_empty() {
        return Err(Error::EmptyTopic(topic));
    }
    let limit = coords.len().min(embeddings.len());
    if let Some(&bad) = members.iter().find(|&&i| i >= limit) {
        return Err(Error::malformed(format!("topic {}", topic), format!("member index {} out of range ({} rows)", bad, limit)));
    }

    let mut xs: Vec<f64> = members.iter().map(|&i| coords[i].x).collect();
    let mut ys: Vec<f64> = members.iter().map(|&i| coords[i].y).collect();
    let position = match (median(&mut xs), median(&mut ys)) {
        (Some(x), Some(y)) => Point2::new(x, y),
        _ => return Err(Error::EmptyTopic(topic)),
    };

    let mean = mean_rows(embeddings, members)?;
    let vector = normalize(&mean, &format!("topic {}", topic))?;
    Ok(TopicAggregate { position, vector, size: members.len() })
}
