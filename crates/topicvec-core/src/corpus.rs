//! Corpus loading for directory-per-category text collections.
//!
//! The layout matches the 20 Newsgroups distribution: every category is a
//! directory and every message a file inside it. The category of a document
//! is its parent directory relative to the corpus root.
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::Document;

#[derive(Debug, Clone, Default)]
pub struct CorpusConfig {
    /// Whole words removed (case-insensitively) before fitting.
    pub filler_words: Vec<String>,
}

#[derive(Default)]
pub struct CorpusLoader {
    config: CorpusConfig,
}

impl CorpusLoader {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: CorpusConfig) -> Self { Self { config } }

    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<Document>> {
        self.load_directory_limited(data_dir, usize::MAX)
    }

    pub fn load_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<Document>> {
        if !data_dir.exists() {
            return Err(Error::InputFileMissing(data_dir.to_path_buf()));
        }
        let mut files = self.list_document_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no documents found");
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited corpus to first files");
        }
        let fillers: HashSet<String> = self.config.filler_words.iter().map(|w| w.to_lowercase()).collect();
        let mut documents = Vec::with_capacity(files.len());
        for file_path in &files {
            debug!(path = %file_path.display(), "reading document");
            let raw = self.read_file_content(file_path)?;
            let text = if fillers.is_empty() { raw } else { strip_fillers(&raw, &fillers) };
            if !text.chars().any(char::is_alphanumeric) {
                debug!(path = %file_path.display(), "skipping document without words");
                continue;
            }
            documents.push(Document {
                id: self.extract_doc_id(file_path, data_dir),
                path: file_path.to_string_lossy().to_string(),
                category: self.get_category_from_path(file_path, data_dir),
                text,
            });
        }
        info!(documents = documents.len(), dir = %data_dir.display(), "loaded corpus");
        Ok(documents)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_doc_id(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        relative.with_extension("").to_string_lossy().replace('\\', "/")
    }

    fn get_category_from_path(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        match relative_path.parent().and_then(|p| p.to_str()) {
            Some(category) if !category.is_empty() => category.replace('\\', "/"),
            _ => "misc".to_string(),
        }
    }

    /// Plain-text files: `.txt` or no extension at all (the newsgroup
    /// archives name messages by number). Hidden files are skipped.
    fn list_document_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            let hidden = path.file_name().and_then(|n| n.to_str()).map(|n| n.starts_with('.')).unwrap_or(true);
            let ext = path.extension().and_then(|s| s.to_str());
            if !hidden && matches!(ext, None | Some("txt")) { files.push(path.to_path_buf()); }
        }
        files.sort();
        files
    }
}

/// Remove whole-word occurrences of `fillers` (lowercase) from `text`,
/// leaving all other characters untouched.
pub fn strip_fillers(text: &str, fillers: &HashSet<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let flush = |word: &mut String, out: &mut String| {
        if !fillers.contains(&word.to_lowercase()) { out.push_str(word); }
        word.clear();
    };
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
        } else {
            if !word.is_empty() { flush(&mut word, &mut out); }
            out.push(ch);
        }
    }
    if !word.is_empty() { flush(&mut word, &mut out); }
    out
}

/// Lowercased word tokens of at least `min_len` characters.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= min_len)
        .map(|t| t.to_lowercase())
        .collect()
}
