pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod usecases;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::a002_query_metadata::MetadataExtractor;
use crate::domain::a003_tool_registry::ToolRegistry;
use crate::routes::AppState;
use crate::shared::config::Config;
use crate::shared::embedding::EmbeddingClient;
use crate::shared::llm::OpenAiProvider;
use crate::shared::vector_store::AstraVectorStore;
use crate::usecases::u101_chat_pipeline::{ChatSession, Pipeline};
use crate::usecases::u102_ingest_documents::{IngestExecutor, TextSplitter};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u101_chat_pipeline::ChatPipeline;
use contracts::usecases::u102_ingest_documents::IngestDocuments;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = shared::config::load_config()?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("ingest") => run_ingest(&config, args.next()).await,
        Some(other) => anyhow::bail!("unknown command '{}', expected 'ingest' or nothing", other),
        None => serve(config).await,
    }
}

fn init_tracing() -> anyhow::Result<()> {
    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // HTTP-клиенты слишком болтливы на info
                "info,hyper=warn,reqwest=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Простой middleware для логирования запросов
async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed();
    // голубой для 200, коричневый для остальных
    let color_code = if status == 200 { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {} {:>6} {}",
        color_code,
        chrono::Local::now().format("%H:%M:%S"),
        duration.as_millis(),
        status,
        method,
        uri.path()
    );

    response
}

fn build_cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = OpenAiProvider::from_config(&config.llm)?;
    tracing::info!("LLM provider ready, model: {}", llm.model());

    let registry = Arc::new(ToolRegistry::new(config.tools.clone()));
    if registry.is_empty() {
        tracing::warn!("Tool registry is empty, every query will fail to plan");
    } else {
        tracing::info!("Loaded {} tools into registry", registry.len());
    }

    let pipeline = Pipeline::new(MetadataExtractor::new(Arc::new(llm)), registry)?;
    let state = Arc::new(AppState::new(ChatSession::new(Arc::new(pipeline))));
    tracing::info!("{} ({}) ready", ChatPipeline::display_name(), ChatPipeline::full_name());

    let mut app = routes::configure_routes(state);
    if let Some(static_dir) = config.server.static_dir_path() {
        if static_dir.is_dir() {
            tracing::info!("Serving frontend from {}", static_dir.display());
            app = app.fallback_service(ServeDir::new(static_dir));
        } else {
            tracing::warn!("Static dir {} not found, frontend is not served", static_dir.display());
        }
    }
    let app = app
        .layer(middleware::from_fn(request_logger))
        .layer(build_cors(&config));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_ingest(config: &Config, dir: Option<String>) -> anyhow::Result<()> {
    let dir = PathBuf::from(dir.unwrap_or_else(|| config.ingest.dir.clone()));
    tracing::info!(
        "{} ({}): reading {}",
        IngestDocuments::display_name(),
        IngestDocuments::full_name(),
        dir.display()
    );

    let embeddings = EmbeddingClient::from_config(&config.embedding)?;
    let store = AstraVectorStore::from_config(&config.vector_store, embeddings)?;
    let splitter = TextSplitter::new(config.ingest.chunk_size, config.ingest.chunk_overlap);

    let executor = IngestExecutor::new(Arc::new(store), splitter, config.ingest.source.clone());
    let summary = executor.run(&dir).await?;

    tracing::info!(
        "Processed {} of {} files, {} skipped, {} chunks added",
        summary.documents_processed,
        summary.files_found,
        summary.documents_skipped,
        summary.chunks_added
    );
    Ok(())
}
