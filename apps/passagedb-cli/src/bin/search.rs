use std::env;
use std::path::PathBuf;

use passagedb_core::config::{expand_path, Config};
use passagedb_embed::get_default_embedder;
use passagedb_index::engine::{DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_TOP_K};
use passagedb_index::{Retriever, RetrieverOptions};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--top-k N]", args[0]);
        eprintln!("Example: {} 'what does the text say about fire' --top-k 5", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];
    let config = Config::load()?;
    let mut top_k = config.get_or("retrieval.top_k", DEFAULT_TOP_K);
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--top-k" {
            if let Some(k) = args.get(i + 1).and_then(|a| a.parse::<usize>().ok()) {
                top_k = k;
                i += 1;
            } else {
                eprintln!("Error: --top-k requires a number");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    let index_dir: PathBuf = expand_path(
        config.get_or("data.index_dir", "../dev_data/indexes/passages".to_string()),
    );
    let options = RetrieverOptions {
        relevance_threshold: config
            .get_or("retrieval.relevance_threshold", DEFAULT_RELEVANCE_THRESHOLD),
        ..RetrieverOptions::default()
    };

    println!("🔍 passagedb-search\n===================");
    println!("Query: {}", query_text);
    println!("Index directory: {}", index_dir.display());

    let embedder = get_default_embedder()?;
    let retriever = Retriever::open(&index_dir, embedder, options)?;
    let results = retriever.retrieve(query_text, top_k)?;

    println!("\n🔍 Found {} results for: \"{}\"", results.len(), query_text);
    for (i, result) in results.iter().enumerate() {
        println!(
            "\n  {}. relevance={:.4}  source={}",
            i + 1,
            result.relevance,
            result.source
        );
        println!("     📝 {}", result.text);
    }
    Ok(())
}
