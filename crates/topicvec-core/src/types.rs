//! Domain types shared by the model, topic and analysis crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type TopicId = i64;

/// One persisted topic.
///
/// - `id`: unique within one generated file
/// - `name`: top keywords joined by `_`, or the majority category
/// - `x`/`y`: median position of the members in the 2D projection
/// - `vector`: L2-normalized interest vector in the reduced space
/// - `grid_pos`: optional `[col, row]` cell assigned by the grid layout
/// - `size`/`color`: member count and RGB triple in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: TopicId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub vector: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_pos: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f64; 3]>,
}

/// A row of the 2D layout projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A source document of the corpus. `category` is the ground-truth label
/// taken from the directory the file lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub path: String,
    pub category: String,
    pub text: String,
}

/// What the external topic model hands back after fitting.
///
/// `doc_vectors[i]` and `assignments[i]` describe `documents[i]`; topic ids
/// follow the model's own numbering. `topic_words` holds ranked keywords.
#[derive(Debug, Clone, Default)]
pub struct FittedModel {
    pub doc_vectors: Vec<Vec<f64>>,
    pub assignments: Vec<TopicId>,
    pub topic_words: BTreeMap<TopicId, Vec<String>>,
}

impl FittedModel {
    /// Member document indices per topic id.
    pub fn members(&self) -> BTreeMap<TopicId, Vec<usize>> {
        let mut out: BTreeMap<TopicId, Vec<usize>> = BTreeMap::new();
        for (doc, &topic) in self.assignments.iter().enumerate() {
            out.entry(topic).or_default().push(doc);
        }
        out
    }
}

/// Relationship class of a pair of compared items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relationship {
    SameTopic,
    DifferentTopic,
}

impl Relationship {
    pub const ALL: [Relationship; 2] = [Relationship::SameTopic, Relationship::DifferentTopic];

    pub fn classify(label_a: &str, label_b: &str) -> Self {
        if label_a == label_b { Self::SameTopic } else { Self::DifferentTopic }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameTopic => f.write_str("Same Topic"),
            Self::DifferentTopic => f.write_str("Different Topic"),
        }
    }
}

/// Analysis-only pair record; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityPair {
    pub name_a: String,
    pub name_b: String,
    pub similarity: f64,
    pub relationship: Relationship,
}
