use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use topicvec_core::config::{LayoutConfig, NamingStrategy, PipelineConfig};
use topicvec_core::traits::{Reducer, TopicModel};
use topicvec_core::types::{Document, FittedModel};
use topicvec_core::vector::l2_norm;
use topicvec_core::{Error, Result};
use topicvec_model::{CategoryTopicModel, RandomProjection};
use topicvec_topics::palette::color_for_rank;
use topicvec_topics::{read_topics, write_topics, Pipeline, WriteOptions};

fn write_corpus(root: &Path) -> anyhow::Result<()> {
    let groups: [(&str, &[&str]); 3] = [
        ("sci.space", &["orbit launch shuttle", "shuttle orbit telescope", "nasa launch orbit", "um telescope mirror orbit", "lunar orbit nasa"]),
        ("rec.autos", &["engine brakes clutch", "engine oil change", "brakes tires engine", "clutch gearbox engine"]),
        ("misc.forsale", &["selling bike cheap"]),
    ];
    for (category, texts) in groups {
        let dir = root.join(category);
        fs::create_dir_all(&dir)?;
        for (i, text) in texts.iter().enumerate() {
            fs::write(dir.join(format!("{}", 1000 + i)), text)?;
        }
    }
    Ok(())
}

fn config(input: &Path) -> PipelineConfig {
    PipelineConfig {
        input_path: input.to_path_buf(),
        embedding_dim: 64,
        target_dim: 8,
        num_topics: 5,
        min_cluster_size: 2,
        ..PipelineConfig::default()
    }
}

#[test]
fn generates_ranked_unit_topics() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write_corpus(tmp.path())?;
    let cfg = config(tmp.path());
    let model = CategoryTopicModel::new(cfg.embedding_dim, cfg.min_token_len);
    let reducer = RandomProjection::new(cfg.seed);

    let topics = Pipeline::new(&model, &reducer, cfg).run()?;

    // misc.forsale has a single document and falls under min_cluster_size
    let ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(topics[0].size, Some(5));
    assert_eq!(topics[1].size, Some(4));
    assert!(topics[0].name.contains("orbit"), "named by keywords: {}", topics[0].name);
    for (rank, t) in topics.iter().enumerate() {
        assert_eq!(t.vector.len(), 8);
        assert!((l2_norm(&t.vector) - 1.0).abs() < 1e-9);
        assert!(t.x.is_finite() && t.y.is_finite());
        assert_eq!(t.color, Some(color_for_rank(rank)));
        assert_eq!(t.grid_pos, None);
    }
    Ok(())
}

#[test]
fn majority_naming_grid_and_store() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let corpus = tmp.path().join("corpus");
    write_corpus(&corpus)?;
    let cfg = PipelineConfig { naming: NamingStrategy::Majority, members_per_topic: Some(3), ..config(&corpus) };
    let model = CategoryTopicModel::new(cfg.embedding_dim, cfg.min_token_len);
    let reducer = RandomProjection::new(cfg.seed);
    let layout = LayoutConfig { grid_cols: Some(2), grid_rows: Some(2) };

    let topics = Pipeline::new(&model, &reducer, cfg).with_layout(layout).run()?;
    let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["sci.space", "rec.autos"]);
    // size counts every member, not just the representatives
    assert_eq!(topics[0].size, Some(5));
    let cells: Vec<[usize; 2]> = topics.iter().filter_map(|t| t.grid_pos).collect();
    assert_eq!(cells.len(), 2);
    assert_ne!(cells[0], cells[1]);

    let out = tmp.path().join("out/topics.json");
    write_topics(&out, &topics, WriteOptions::default())?;
    assert_eq!(read_topics(&out)?, topics);
    Ok(())
}

#[test]
fn undersized_grid_is_rejected() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    write_corpus(tmp.path())?;
    let cfg = config(tmp.path());
    let model = CategoryTopicModel::new(cfg.embedding_dim, cfg.min_token_len);
    let reducer = RandomProjection::new(cfg.seed);
    let layout = LayoutConfig { grid_cols: Some(1), grid_rows: Some(1) };

    let err = Pipeline::new(&model, &reducer, cfg).with_layout(layout).run().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    Ok(())
}

#[test]
fn missing_corpus_is_reported() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(&tmp.path().join("absent"));
    let model = CategoryTopicModel::new(cfg.embedding_dim, cfg.min_token_len);
    let reducer = RandomProjection::new(cfg.seed);
    let err = Pipeline::new(&model, &reducer, cfg).run().unwrap_err();
    assert!(matches!(err, Error::InputFileMissing(_)));
}

/// Puts every document in topic 0 with a fixed vector per document.
struct FixedModel(Vec<Vec<f64>>);

impl TopicModel for FixedModel {
    fn fit(&self, documents: &[Document]) -> Result<FittedModel> {
        Ok(FittedModel { doc_vectors: self.0.clone(), assignments: vec![0; documents.len()], topic_words: BTreeMap::new() })
    }
}

/// Returns its input rows unchanged.
struct Identity;

impl Reducer for Identity {
    fn reduce(&self, vectors: &[Vec<f64>], _target_dim: usize) -> Result<Vec<Vec<f64>>> {
        Ok(vectors.to_vec())
    }
}

fn doc(id: &str) -> Document {
    Document { id: id.to_string(), path: id.to_string(), category: "sci.space".to_string(), text: "orbit".to_string() }
}

#[test]
fn topic_vector_is_normalized_mean_of_raw_member_rows() -> anyhow::Result<()> {
    let model = FixedModel(vec![vec![10.0, 0.0], vec![0.0, 1.0]]);
    let cfg = PipelineConfig { target_dim: 2, num_topics: 1, min_cluster_size: 1, ..PipelineConfig::default() };

    let topics = Pipeline::new(&model, &Identity, cfg).run_documents(&[doc("a"), doc("b")])?;

    assert_eq!(topics.len(), 1);
    // mean [5, 0.5] divided by its norm; normalizing each member first would give [0.7071, 0.7071]
    let expected = [0.9950371902099892, 0.09950371902099892];
    for (got, want) in topics[0].vector.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "vector {:?}", topics[0].vector);
    }
    assert_eq!((topics[0].x, topics[0].y), (5.0, 0.5));
    Ok(())
}
