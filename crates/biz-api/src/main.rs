//! BizAnalyzer API Server

use biz_api::{create_router, AppConfig, AppState, MemoryStore, PgStore, Store};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bizanalyzer-api")]
#[command(author, version, about = "Business idea feasibility analysis API")]
struct Args {
    /// Address to listen on
    #[arg(short, long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Ignore DATABASE_URL and keep everything in memory
    #[arg(long, env = "IN_MEMORY")]
    in_memory: bool,

    /// Don't run database migrations on startup
    #[arg(long, env = "SKIP_MIGRATIONS")]
    skip_migrations: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let default_filter = if args.verbose {
        "biz_api=trace,biz_core=debug,tower_http=debug"
    } else {
        "biz_api=debug,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting BizAnalyzer API Server");

    let config = AppConfig::default();
    if config.debug {
        warn!("debug mode: internal error details are returned to clients");
    }

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) if !args.in_memory => {
            let store = PgStore::connect(url, config.db_max_connections).await?;
            if !args.skip_migrations {
                store.migrate().await?;
            }
            Arc::new(store)
        }
        _ => {
            warn!("No database configured, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(config, store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
