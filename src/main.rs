use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use tokio::net::TcpListener;

use pdf_rag::api;
use pdf_rag::commands;
use pdf_rag::config::Config;
use pdf_rag::database::{VectorDb, VectorIndex};
use pdf_rag::llm::{OllamaChat, OllamaEmbedder, RagChain};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Convert PDFs in the data directory into chunk container files
    #[arg(long)]
    ingest: bool,

    /// Embed chunk container files into the vector index
    #[arg(long)]
    embed: bool,

    /// Serve the question-answering API and front end
    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, default_value = "chunks")]
    chunks_dir: PathBuf,

    /// Override the Qdrant collection name
    #[arg(long)]
    collection: Option<String>,

    /// Override the embedding model name
    #[arg(long)]
    embed_model: Option<String>,

    #[arg(long, default_value = "50")]
    batch_size: usize,

    #[arg(long, default_value = "4")]
    top_k: u64,

    #[arg(long, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(collection) = &args.collection {
        config.collection = collection.clone();
    }
    if let Some(model) = &args.embed_model {
        config.embed_model = model.clone();
    }

    if !(args.ingest || args.embed || args.api) {
        println!(
            "{}",
            "Nothing to do. Pass --ingest, --embed and/or --api.".yellow()
        );
        return Ok(());
    }

    if args.ingest {
        commands::ingest::run(&args.data_dir, &args.chunks_dir)?;
    }

    if args.embed {
        commands::embed::run(&config, &args.chunks_dir, args.batch_size).await?;
    }

    if args.api {
        run_api_server(&args, &config).await?;
    }

    Ok(())
}

async fn run_api_server(
    args: &Args,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;

    let embedder = Arc::new(OllamaEmbedder::new(
        config.ollama_url.clone(),
        config.embed_model.clone(),
    ));
    let index: Arc<dyn VectorIndex> =
        Arc::new(VectorDb::connect(&config.qdrant_url, &config.collection).await?);
    let chat = Arc::new(OllamaChat::new(
        config.ollama_url.clone(),
        config.chat_model.clone(),
        config.temperature,
    ));

    let chain = Arc::new(
        RagChain::new(embedder, index, chat)
            .with_top_k(args.top_k)
            .with_fallback(config.dont_know.clone()),
    );

    let app = api::create_api(chain);

    println!("Starting API server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to bind to {}: {}", addr, e))?;

    println!("Ready to accept connections!");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {}", e))?;

    Ok(())
}
