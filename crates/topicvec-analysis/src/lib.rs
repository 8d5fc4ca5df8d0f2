//! topicvec-analysis
//!
//! Similarity scoring between interest vectors, descriptive statistics by
//! relationship class, synthetic interest profiles and the Monte Carlo and
//! ideal-fit reports built on top of them, plus the group conversation
//! simulation that steers members away from losing interest.
pub mod group;
pub mod ideal;
pub mod profile;
pub mod similarity;
pub mod simulate;
pub mod stats;

pub use group::{Group, Member, MemberState, Steering};
pub use profile::ProfileGenerator;
pub use similarity::{labeled_pairs, pairwise_matrix, score, SimilarityMatrix};
pub use stats::{grouped_statistics, relationship_statistics, Histogram, Summary};
