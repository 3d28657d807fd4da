use std::env;
use std::path::PathBuf;

use passagedb_core::config::{expand_path, Config};
use passagedb_embed::get_default_embedder;
use passagedb_index::engine::{DEFAULT_MIN_CHUNK_LEN, DEFAULT_RELEVANCE_THRESHOLD};
use passagedb_index::{Retriever, RetrieverOptions};

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut corpus_dir = None;
    let mut min_chunk_len = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--min-len" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        min_chunk_len = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --min-len requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --min-len requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => corpus_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let corpus_dir = corpus_dir.unwrap_or_else(|| {
        let dir: String = config.get_or("data.corpus_dir", "../dev_data/corpus".to_string());
        expand_path(dir)
    });
    let index_dir: PathBuf = expand_path(
        config.get_or("data.index_dir", "../dev_data/indexes/passages".to_string()),
    );
    let options = RetrieverOptions {
        min_chunk_len: min_chunk_len
            .unwrap_or_else(|| config.get_or("retrieval.min_chunk_len", DEFAULT_MIN_CHUNK_LEN)),
        relevance_threshold: config
            .get_or("retrieval.relevance_threshold", DEFAULT_RELEVANCE_THRESHOLD),
    };

    println!("passagedb Indexer\n=================");
    println!("Corpus directory: {}", corpus_dir.display());
    println!("Index directory:  {}", index_dir.display());

    let embedder = get_default_embedder()?;
    let mut retriever = Retriever::open(&index_dir, embedder, options)?;
    let total = retriever.ingest_corpus(&corpus_dir)?;

    println!("\n✅ Indexing completed successfully!");
    println!("📊 {} passages ready for retrieval", total);
    println!("\n💡 To search, use: cargo run --bin passagedb-search '<query>'");
    Ok(())
}
