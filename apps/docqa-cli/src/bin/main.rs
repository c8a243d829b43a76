use std::env;
use std::io::{BufRead, Write};

use docqa_core::config::{expand_path, Config};
use docqa_core::error::Error;
use docqa_core::types::{SearchRequest, SummaryMode};
use docqa_engine::{EngineConfig, SearchEngine};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ask|chat|stats> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn engine_config(config: &Config) -> EngineConfig {
    let mut engine_config = EngineConfig::default();
    if let Ok(path) = config.get::<String>("data.chunks_path") {
        engine_config.chunks_path = expand_path(path);
    }
    if let Ok(dir) = config.get::<String>("data.lancedb_index_dir") {
        engine_config.index_dir = expand_path(dir);
    }
    if let Ok(table) = config.get::<String>("data.table_name") {
        engine_config.table_name = table;
    }
    if let Ok(top_k) = config.get::<usize>("search.top_k") {
        engine_config.top_k = top_k;
    }
    if let Ok(window) = config.get::<usize>("search.context_window") {
        engine_config.window_size = window;
    }
    engine_config
}

fn print_response(response: &docqa_core::types::SearchResponse) {
    println!("{}", response.message);
    if !response.sources.is_empty() {
        println!("\nSources:");
        for source in &response.sources {
            println!("  {} (relevance {:.2}): {}", source.title, source.relevance, source.link);
        }
    }
    println!(
        "\nConfidence: {:?} ({:.2}): {}",
        response.confidence.level, response.confidence.score, response.confidence.explanation
    );
}

fn run_query(engine: &mut SearchEngine, request: &SearchRequest) {
    match engine.search(request) {
        Ok(response) => print_response(&response),
        Err(e @ Error::EmptyQuery) => eprintln!("Error: {}", e),
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            eprintln!("Internal error, please try again.");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    let engine_config = engine_config(&config);

    match cmd.as_str() {
        "ask" => {
            if args.is_empty() {
                eprintln!("Usage: docqa ask <question> [--summary brief|detailed] [--top-k N]");
                std::process::exit(1);
            }
            let mut query = None;
            let mut summary_mode = None;
            let mut top_k = None;
            let mut i = 0;
            while i < args.len() {
                match args[i].as_str() {
                    "--summary" => {
                        if let Some(mode) = args.get(i + 1) {
                            summary_mode = match mode.as_str() {
                                "brief" => Some(SummaryMode::Brief),
                                "detailed" => Some(SummaryMode::Detailed),
                                other => {
                                    eprintln!("Error: unknown summary mode '{}'", other);
                                    std::process::exit(1);
                                }
                            };
                            i += 1;
                        }
                    }
                    "--top-k" => {
                        if let Some(n) = args.get(i + 1).and_then(|s| s.parse::<usize>().ok()) {
                            top_k = Some(n);
                            i += 1;
                        } else {
                            eprintln!("Error: --top-k requires a number");
                            std::process::exit(1);
                        }
                    }
                    _ if !args[i].starts_with('-') => query = Some(args[i].clone()),
                    _ => {}
                }
                i += 1;
            }
            let Some(query) = query else {
                eprintln!("Error: a question is required");
                std::process::exit(1);
            };

            let mut engine = SearchEngine::initialize(&engine_config)?;
            let request = SearchRequest { top_k, summary_mode, ..SearchRequest::new(query) };
            run_query(&mut engine, &request);
        }
        "chat" => {
            let mut engine = SearchEngine::initialize(&engine_config)?;
            println!("💬 docqa chat (mode: {:?}), type 'exit' to quit, 'clear' to reset context", engine.mode());
            let stdin = std::io::stdin();
            loop {
                print!("> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                match line {
                    "exit" | "quit" => break,
                    "clear" => {
                        engine.clear_context();
                        println!("(context cleared)");
                    }
                    "" => {}
                    query => {
                        run_query(&mut engine, &SearchRequest::new(query.to_string()));
                        println!();
                    }
                }
            }
        }
        "stats" => {
            let engine = SearchEngine::initialize(&engine_config)?;
            println!("{}", serde_json::to_string_pretty(&engine.stats())?);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: docqa <ask|chat|stats> [args...]");
            std::process::exit(1);
        }
    }
    Ok(())
}
