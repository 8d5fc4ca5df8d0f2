use std::collections::BTreeSet;

use tracing::info;

use topicvec_core::traits::{Embedder, TopicModel};
use topicvec_core::types::{Document, FittedModel, TopicId};
use topicvec_core::{Error, Result};

use crate::keywords::KeywordRanker;
use crate::HashingEmbedder;

/// Topic model that takes the ground-truth categories as its clusters.
///
/// Topic ids are the positions of the categories in sorted order, so the
/// numbering is stable across runs over the same corpus.
pub struct CategoryTopicModel {
    embedder: Box<dyn Embedder>,
    ranker: KeywordRanker,
}

impl CategoryTopicModel {
    pub fn new(embedding_dim: usize, min_token_len: usize) -> Self {
        Self::with_embedder(Box::new(HashingEmbedder::new(embedding_dim)), min_token_len)
    }

    pub fn with_embedder(embedder: Box<dyn Embedder>, min_token_len: usize) -> Self {
        Self { embedder, ranker: KeywordRanker::new(min_token_len, 10) }
    }
}

impl TopicModel for CategoryTopicModel {
    fn fit(&self, documents: &[Document]) -> Result<FittedModel> {
        if documents.is_empty() {
            return Err(Error::malformed("corpus", "no documents to fit"));
        }
        let categories: Vec<&str> = documents.iter().map(|d| d.category.as_str()).collect::<BTreeSet<_>>().into_iter().collect();
        let assignments: Vec<TopicId> = documents
            .iter()
            .map(|d| categories.binary_search(&d.category.as_str()).map(|i| i as TopicId))
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| Error::malformed("corpus", "category lookup failed"))?;

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let doc_vectors = self.embedder.embed_batch(&texts)?;
        if doc_vectors.len() != documents.len() {
            return Err(Error::malformed("embedder", format!("returned {} vectors for {} documents", doc_vectors.len(), documents.len())));
        }
        let topic_words = self.ranker.rank(assignments.iter().copied().zip(documents.iter().map(|d| d.text.as_str())));
        info!(documents = documents.len(), topics = categories.len(), dim = self.embedder.dim(), "fitted category topic model");
        Ok(FittedModel { doc_vectors, assignments, topic_words })
    }
}
