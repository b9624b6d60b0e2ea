//! BizAnalyzer API
//!
//! HTTP surface over `biz-core`: accounts and bearer tokens, idea CRUD,
//! the collect → analyze → report pipeline, and the market search
//! endpoints. Persistence sits behind [`db::Store`] so the same router runs
//! on Postgres or in memory.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use biz_core::analysis::SimulatedAnalyst;
use biz_core::collection::SimulatedCollector;
use biz_core::search::TemplateSearch;
use biz_core::{AnalysisProvider, CollectionProvider, SearchProvider};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::TokenIssuer;
pub use config::AppConfig;
pub use db::{MemoryStore, PgStore, Store};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub collector: Arc<dyn CollectionProvider>,
    pub analyst: Arc<dyn AnalysisProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub tokens: TokenIssuer,
    pub config: AppConfig,
}

impl AppState {
    /// State backed by `store` with the simulated providers.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let tokens = TokenIssuer::new(
            &config.jwt_secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        );
        Self {
            store,
            collector: Arc::new(SimulatedCollector::new()),
            analyst: Arc::new(SimulatedAnalyst::new()),
            search: Arc::new(TemplateSearch),
            tokens,
            config,
        }
    }

    pub fn with_collector(mut self, collector: Arc<dyn CollectionProvider>) -> Self {
        self.collector = collector;
        self
    }

    pub fn with_analyst(mut self, analyst: Arc<dyn AnalysisProvider>) -> Self {
        self.analyst = analyst;
        self
    }

    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = search;
        self
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Authentication
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route(
            "/auth/me",
            get(routes::auth::me).delete(routes::auth::delete_me),
        )
        // Ideas
        .route(
            "/ideas",
            post(routes::ideas::create_idea).get(routes::ideas::list_ideas),
        )
        .route(
            "/ideas/{id}",
            get(routes::ideas::get_idea)
                .patch(routes::ideas::update_idea)
                .delete(routes::ideas::delete_idea),
        )
        .route("/ideas/{id}/collect", post(routes::ideas::start_collection))
        .route(
            "/ideas/{id}/collect/status",
            get(routes::ideas::collection_status),
        )
        .route("/ideas/{id}/analyze", post(routes::ideas::start_analysis))
        .route("/ideas/{id}/analysis", get(routes::ideas::get_analysis))
        // Reports
        .route("/ideas/{id}/report", post(routes::reports::create_report))
        .route("/ideas/{id}/reports", get(routes::reports::list_reports))
        .route("/reports/{id}", get(routes::reports::get_report))
        .route(
            "/reports/{id}/download",
            get(routes::reports::download_report),
        )
        // Search
        .route("/search/{kind}", get(routes::search::search))
        .method_not_allowed_fallback(error::method_not_allowed)
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let debug = state.config.debug;
    let cors = cors_layer(&state.config.cors_origins);

    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health_check))
        .nest("/api/v1", api_routes())
        .fallback(error::route_not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    if debug {
        router.layer(middleware::from_fn(error::attach_debug_details))
    } else {
        router
    }
}
