//! API routes

pub mod auth;
pub mod ideas;
pub mod reports;
pub mod search;

use crate::models::{HealthResponse, ServiceInfo};
use axum::Json;
use chrono::Utc;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "BizAnalyzer API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
    })
}
