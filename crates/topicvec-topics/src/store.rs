//! JSON persistence of topic records.
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never sees a half-written file. Two layouts are understood: a bare
//! array of records, and a versioned envelope
//! `{"version": 1, "generated_at": "...", "topics": [...]}`.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use topicvec_core::config::OutputConfig;
use topicvec_core::types::TopicRecord;
use topicvec_core::{Error, Result};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct TopicFile<T> {
    version: u32,
    generated_at: String,
    topics: T,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub versioned: bool,
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self { Self { versioned: false, indent: 4 } }
}

impl From<&OutputConfig> for WriteOptions {
    fn from(cfg: &OutputConfig) -> Self { Self { versioned: cfg.versioned, indent: cfg.indent } }
}

/// Write `topics` to `path`, replacing any previous file atomically.
pub fn write_topics(path: &Path, topics: &[TopicRecord], opts: WriteOptions) -> Result<()> {
    let mut seen = HashSet::new();
    for t in topics {
        if !seen.insert(t.id) {
            return Err(Error::malformed(t.id, "duplicate topic id"));
        }
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let indent = vec![b' '; opts.indent];
        let mut out = BufWriter::new(tmp.as_file());
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
        if opts.versioned {
            let file = TopicFile { version: FORMAT_VERSION, generated_at: chrono::Utc::now().to_rfc3339(), topics };
            file.serialize(&mut ser)?;
        } else {
            topics.serialize(&mut ser)?;
        }
        out.write_all(b"\n")?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    info!(path = %path.display(), topics = topics.len(), versioned = opts.versioned, "wrote topic file");
    Ok(())
}

/// Read and validate a topic file.
///
/// Every record needs `id`, `name`, `x`, `y` and a non-empty, finite
/// `vector`; all vectors must share one dimension and ids must be unique.
pub fn read_topics(path: &Path) -> Result<Vec<TopicRecord>> {
    if !path.is_file() {
        return Err(Error::InputFileMissing(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match map.get("version").and_then(Value::as_u64) {
                Some(v) if v == u64::from(FORMAT_VERSION) => {}
                Some(v) => return Err(Error::malformed(path.display(), format!("unsupported format version {}", v))),
                None => return Err(Error::malformed(path.display(), "envelope without a version")),
            }
            match map.remove("topics") {
                Some(Value::Array(items)) => items,
                _ => return Err(Error::malformed(path.display(), "envelope without a topics array")),
            }
        }
        _ => return Err(Error::malformed(path.display(), "expected an array of topics")),
    };

    let mut topics = Vec::with_capacity(items.len());
    let mut ids = HashSet::new();
    let mut dim: Option<usize> = None;
    for (i, item) in items.into_iter().enumerate() {
        let label = item.get("id").and_then(Value::as_i64).map_or_else(|| format!("#{}", i), |id| id.to_string());
        let record: TopicRecord = serde_json::from_value(item).map_err(|e| Error::malformed(&label, e.to_string()))?;
        if record.vector.is_empty() {
            return Err(Error::malformed(&label, "empty vector"));
        }
        if record.vector.iter().any(|v| !v.is_finite()) || !record.x.is_finite() || !record.y.is_finite() {
            return Err(Error::malformed(&label, "non-finite value"));
        }
        match dim {
            None => dim = Some(record.vector.len()),
            Some(d) if d != record.vector.len() => {
                return Err(Error::malformed(&label, format!("vector has {} components, expected {}", record.vector.len(), d)));
            }
            Some(_) => {}
        }
        if !ids.insert(record.id) {
            return Err(Error::malformed(&label, "duplicate topic id"));
        }
        topics.push(record);
    }
    debug!(path = %path.display(), topics = topics.len(), "read topic file");
    Ok(topics)
}
