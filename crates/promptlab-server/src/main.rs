use anyhow::Result;
use clap::Parser;
use promptlab_core::engine::runner::Runner;
use promptlab_core::grading::RandomGrader;
use promptlab_core::model::RunSettings;
use promptlab_core::providers::llm::fake::FakeClient;
use promptlab_core::providers::llm::openai::OpenAiCompatClient;
use promptlab_core::providers::llm::LlmClient;
use promptlab_core::storage::store::Store;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod routes;

use config::ServerConfig;
use routes::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database path (overrides PROMPTLAB_DB)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = ServerConfig::from_env();
    if let Some(db) = args.db {
        cfg.db_path = db.display().to_string();
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }

    init_logging(&cfg.log_level);

    let store = Store::open(std::path::Path::new(&cfg.db_path))?;
    store.init_schema()?;

    let client: Arc<dyn LlmClient> = match cfg.api_key.clone() {
        Some(key) => Arc::new(OpenAiCompatClient::groq(key, cfg.temperature, cfg.max_tokens)),
        None => {
            tracing::warn!(
                event = "no_api_key",
                "GROQ_API_KEY not set, answering with the simulated provider"
            );
            Arc::new(FakeClient::new())
        }
    };

    let runner = Runner {
        store,
        client,
        grader: Arc::new(RandomGrader),
        models: cfg.models.clone(),
        settings: RunSettings {
            timeout_seconds: cfg.timeout_seconds,
        },
    };

    let app = routes::router(AppState {
        runner: Arc::new(runner),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(
        event = "server_start",
        addr = %addr,
        db = %cfg.db_path,
        models = ?cfg.models,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
