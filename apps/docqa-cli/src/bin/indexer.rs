use std::{env, fs};

use docqa_core::chunker::MarkdownChunker;
use docqa_core::config::{expand_path, Config};
use docqa_embed::get_default_embedder;
use docqa_vector::LanceIndexBuilder;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut doc_dir = None;
    let mut skip_vectors = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--skip-vectors" | "-s" => skip_vectors = true,
            _ if !args[i].starts_with('-') => doc_dir = Some(expand_path(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let doc_dir = doc_dir.unwrap_or_else(|| {
        let dir: String = config.get("data.doc_dir").unwrap_or_else(|_| "docs".to_string());
        expand_path(dir)
    });

    println!("Documentation Indexer\n=====================");
    println!("Document directory: {}", doc_dir.display());
    if skip_vectors {
        println!("⚠️  Skipping vector indexing (--skip-vectors flag)");
    }

    let chunker = MarkdownChunker::new();
    let chunks = chunker.process_directory(&doc_dir)?;
    let summary = chunker.summary(&chunks);
    println!(
        "📊 Chunked {} documents into {} sections",
        summary.total_documents, summary.total_chunks
    );

    let chunks_path = expand_path(
        config
            .get::<String>("data.chunks_path")
            .unwrap_or_else(|_| "data/document_chunks.json".to_string()),
    );
    if let Some(parent) = chunks_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&chunks_path, serde_json::to_string_pretty(&chunks)?)?;
    println!("💾 Wrote chunk store to {}", chunks_path.display());

    let summary_path = chunks_path.with_file_name("index_summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    if !skip_vectors && !chunks.is_empty() {
        let lancedb_path = expand_path(
            config
                .get::<String>("data.lancedb_index_dir")
                .unwrap_or_else(|_| "data/lancedb".to_string()),
        );
        let table_name: String =
            config.get("data.table_name").unwrap_or_else(|_| "chunks".to_string());
        if lancedb_path.exists() {
            fs::remove_dir_all(&lancedb_path)?;
        }
        fs::create_dir_all(&lancedb_path)?;

        let embedder = get_default_embedder()?;
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts)?;

        let rt = tokio::runtime::Runtime::new()?;
        let builder = rt.block_on(LanceIndexBuilder::new(&lancedb_path, &table_name))?;
        rt.block_on(builder.build(&chunks, &embeddings))?;
        println!("📊 Indexed {} vectors into LanceDB", embeddings.len());
    }

    println!("\n✅ Indexing completed successfully!");
    println!("💡 To query, use: cargo run --bin docqa ask '<question>'");
    Ok(())
}
