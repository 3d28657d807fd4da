//! The retrieval engine: corpus ingestion, snapshot load/save, and
//! top-k retrieval with relevance thresholding.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use passagedb_core::corpus;
use passagedb_core::error::Error;
use passagedb_core::traits::Embedder;
use passagedb_core::types::{Passage, RetrievalResult};

use crate::flat::{l2_normalize, FlatIndex};
use crate::snapshot;
use crate::store::DocumentStore;

pub const DEFAULT_MIN_CHUNK_LEN: usize = 100;
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.3;
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone)]
pub struct RetrieverOptions {
    /// Chunks shorter than this are discarded mid-file during ingestion.
    pub min_chunk_len: usize,
    /// Results must score strictly above this to be returned.
    pub relevance_threshold: f32,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self {
            min_chunk_len: DEFAULT_MIN_CHUNK_LEN,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

/// One long-lived engine instance: construct with [`Retriever::open`]
/// at process start, populate offline via [`Retriever::ingest_corpus`],
/// serve reads via [`Retriever::retrieve`]. Retrieval never mutates.
pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index: FlatIndex,
    store: DocumentStore,
    index_dir: PathBuf,
    options: RetrieverOptions,
}

impl Retriever {
    /// Construct the engine, loading a persisted snapshot from
    /// `index_dir` when one exists. A snapshot whose dimension differs
    /// from the embedder's is a fatal construction error; no snapshot
    /// at all is simply an empty engine.
    pub fn open(
        index_dir: impl Into<PathBuf>,
        embedder: Box<dyn Embedder>,
        options: RetrieverOptions,
    ) -> Result<Self> {
        let index_dir = index_dir.into();
        let (index, store) = match snapshot::load(&index_dir)? {
            Some(snap) => {
                if snap.index.dim() != embedder.dim() {
                    return Err(Error::DimensionMismatch {
                        expected: embedder.dim(),
                        actual: snap.index.dim(),
                    }
                    .into());
                }
                println!(
                    "Loaded snapshot: {} passages from {}",
                    snap.store.len(),
                    index_dir.display()
                );
                (snap.index, snap.store)
            }
            None => (FlatIndex::new(embedder.dim())?, DocumentStore::default()),
        };
        Ok(Self { embedder, index, store, index_dir, options })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// One-shot batch build over every `.txt` file in `corpus_dir`:
    /// strip page markers, chunk on blank lines, batch-embed per file,
    /// unit-normalize, and append vectors and passages in lockstep.
    /// Files yielding no chunks are skipped. Persists the pair at the
    /// end and returns the total chunk count.
    ///
    /// Not safe to run concurrently with itself or with `retrieve`.
    pub fn ingest_corpus(&mut self, corpus_dir: &Path) -> Result<usize> {
        let files = corpus::list_txt_files(corpus_dir)?;
        if files.is_empty() {
            println!("No .txt files found under {}.", corpus_dir.display());
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut total_chunks = 0usize;
        for file_path in &files {
            pb.set_message(file_path.display().to_string());
            let raw = corpus::read_file_content(file_path)
                .with_context(|| format!("reading {}", file_path.display()))?;
            let text = corpus::strip_page_markers(&raw);
            let chunks = corpus::chunk(&text, self.options.min_chunk_len);
            if chunks.is_empty() {
                println!("Skipping {} (no chunks)", file_path.display());
                pb.inc(1);
                continue;
            }

            let source = corpus::source_name(file_path);
            let embeddings = self.embedder.embed_batch(&chunks)?;
            if embeddings.len() != chunks.len() {
                return Err(Error::Operation(format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ))
                .into());
            }
            let mut vectors = Vec::with_capacity(embeddings.len());
            for mut v in embeddings {
                if v.len() != self.index.dim() {
                    return Err(Error::DimensionMismatch {
                        expected: self.index.dim(),
                        actual: v.len(),
                    }
                    .into());
                }
                l2_normalize(&mut v)?;
                vectors.push(v);
            }

            self.index.add(&vectors)?;
            self.store.push_all(
                chunks
                    .into_iter()
                    .map(|text| Passage { text, source: source.clone() }),
            );
            total_chunks += vectors.len();
            println!("Indexed {} chunks from {}", vectors.len(), source);
            pb.inc(1);
        }
        pb.finish_and_clear();

        println!("\nTotal chunks indexed: {total_chunks}");
        self.save()?;
        println!("Snapshot persisted to {}", self.index_dir.display());
        Ok(total_chunks)
    }

    /// Top-`top_k` passages by cosine similarity, descending, keeping
    /// only scores strictly above the relevance threshold. An empty
    /// index returns an empty vec without touching the embedder.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let mut batch = self.embedder.embed_batch(&[query.to_string()])?;
        if batch.len() != 1 {
            return Err(Error::Operation(format!(
                "embedder returned {} vectors for a single-query batch",
                batch.len()
            ))
            .into());
        }
        let mut query_vec = batch.remove(0);
        if query_vec.len() != self.index.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.index.dim(),
                actual: query_vec.len(),
            }
            .into());
        }
        l2_normalize(&mut query_vec)?;

        let hits = self.index.search(&query_vec, top_k)?;
        let mut results = Vec::new();
        for (position, score) in hits {
            if score <= self.options.relevance_threshold {
                continue;
            }
            let passage = self.store.get(position).ok_or_else(|| {
                Error::Operation(format!("no passage at index position {position}"))
            })?;
            results.push(RetrievalResult {
                text: passage.text.clone(),
                source: passage.source.clone(),
                relevance: score,
            });
        }
        Ok(results)
    }

    /// Persist the current pair; a later [`Retriever::open`] on the
    /// same directory reproduces positions, vectors, and passages
    /// exactly.
    pub fn save(&self) -> Result<()> {
        snapshot::save(&self.index_dir, &self.index, &self.store)
    }
}
