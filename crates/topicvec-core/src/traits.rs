use crate::error::Result;
use crate::types::{Document, FittedModel};

/// Turns raw text into fixed-size document vectors.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// The external topic model: embeds and clusters a corpus in one call.
pub trait TopicModel: Send + Sync {
    fn fit(&self, documents: &[Document]) -> Result<FittedModel>;
}

/// The external dimensionality reducer.
pub trait Reducer: Send + Sync {
    fn reduce(&self, vectors: &[Vec<f64>], target_dim: usize) -> Result<Vec<Vec<f64>>>;
}
