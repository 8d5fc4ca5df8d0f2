//! End-to-end topic generation: corpus in, topic records out.

use tracing::{debug, info, warn};

use topicvec_core::config::{LayoutConfig, NamingStrategy, PipelineConfig};
use topicvec_core::corpus::{CorpusConfig, CorpusLoader};
use topicvec_core::traits::{Reducer, TopicModel};
use topicvec_core::types::{Document, Point2, TopicRecord};
use topicvec_core::{Error, Result};

use crate::aggregate::aggregate;
use crate::layout::arrange_by_projection;
use crate::naming::{keyword_name, majority_name};
use crate::palette::color_for_rank;
use crate::select::{filter_min_x, rank_topics, representative_members};

pub struct Pipeline<'a> {
    model: &'a dyn TopicModel,
    reducer: &'a dyn Reducer,
    config: PipelineConfig,
    layout: LayoutConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(model: &'a dyn TopicModel, reducer: &'a dyn Reducer, config: PipelineConfig) -> Self {
        Self { model, reducer, config, layout: LayoutConfig::default() }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Load the corpus at `input_path` and generate its topics.
    pub fn run(&self) -> Result<Vec<TopicRecord>> {
        let loader = CorpusLoader::with_config(CorpusConfig { filler_words: self.config.filler_words.clone() });
        let documents = loader.load_directory(&self.config.input_path)?;
        info!(documents = documents.len(), "loaded corpus");
        self.run_documents(&documents)
    }

    pub fn run_documents(&self, documents: &[Document]) -> Result<Vec<TopicRecord>> {
        self.config.validate()?;
        if documents.is_empty() {
            return Err(Error::malformed("corpus", "no documents to fit"));
        }
        let fitted = self.model.fit(documents)?;
        if fitted.doc_vectors.len() != documents.len() || fitted.assignments.len() != documents.len() {
            return Err(Error::malformed(
                "model output",
                format!("{} documents but {} vectors and {} assignments", documents.len(), fitted.doc_vectors.len(), fitted.assignments.len()),
            ));
        }

        let doc_vectors = &fitted.doc_vectors;
        let coords = to_points(self.reducer.reduce(doc_vectors, 2)?)?;
        // member rows stay unnormalized; the aggregate normalizes their mean
        let interest = self.reducer.reduce(doc_vectors, self.config.target_dim)?;
        if coords.len() != documents.len() || interest.len() != documents.len() {
            return Err(Error::malformed("reducer output", "row count differs from document count"));
        }

        let ranked = rank_topics(fitted.members(), self.config.min_cluster_size, self.config.num_topics);
        let mut topics = Vec::with_capacity(ranked.len());
        for (topic, members) in ranked {
            let members = match self.config.min_x {
                Some(min_x) => filter_min_x(&members, &coords, min_x),
                None => members,
            };
            if members.is_empty() {
                warn!(topic, "no members left after spatial cut; skipping topic");
                continue;
            }
            let size = members.len();
            let selected = match self.config.members_per_topic {
                Some(k) => representative_members(topic, &members, doc_vectors, k)?,
                None => members.clone(),
            };
            let agg = aggregate(topic, &selected, &coords, &interest)?;
            let name = match self.config.naming {
                NamingStrategy::Keywords => keyword_name(topic, fitted.topic_words.get(&topic), self.config.name_words),
                NamingStrategy::Majority => majority_name(members.iter().map(|&i| documents[i].category.as_str()))
                    .unwrap_or_else(|| format!("topic_{}", topic)),
            };
            debug!(topic, %name, size, "aggregated topic");
            let rank = topics.len();
            topics.push(TopicRecord {
                id: topic,
                name,
                x: agg.position.x,
                y: agg.position.y,
                vector: agg.vector,
                grid_pos: None,
                size: Some(size),
                color: Some(color_for_rank(rank)),
            });
        }

        self.layout.validate_for(topics.len())?;
        if let Some((cols, rows)) = self.layout.grid() {
            arrange_by_projection(&mut topics, cols, rows)?;
        }
        info!(topics = topics.len(), "generated topics");
        Ok(topics)
    }
}

fn to_points(rows: Vec<Vec<f64>>) -> Result<Vec<Point2>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [x, y] => Ok(Point2::new(*x, *y)),
            _ => Err(Error::malformed(format!("layout row {}", i), format!("expected 2 coordinates, got {}", row.len()))),
        })
        .collect()
}
