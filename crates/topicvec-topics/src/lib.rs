//! topicvec-topics
//!
//! Turns a fitted topic model into persisted topic records: member
//! selection, aggregation, naming, colouring, grid layout and the JSON
//! topic store.
pub mod aggregate;
pub mod layout;
pub mod naming;
pub mod palette;
pub mod pipeline;
pub mod select;
pub mod store;

pub use aggregate::{aggregate, TopicAggregate};
pub use pipeline::Pipeline;
pub use store::{read_topics, write_topics, WriteOptions};
