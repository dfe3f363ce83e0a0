//! Health check and service info handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::database::sanitize_connection_url;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Readiness response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub service: String,
    pub dependencies: HashMap<String, DependencyStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Greeting and runtime information served at `/`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub message: String,
    pub environment: String,
    pub debug_mode: bool,
    pub database_host: Option<String>,
    /// Connection URL with any password replaced by `****`
    pub database_url: String,
    pub app_version: String,
}

/// Liveness probe
///
/// Always 200 while the process can serve requests.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        service: state.config().service.name.clone(),
        version: VERSION.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// 503 when the database does not answer `SELECT 1`.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => DependencyStatus {
            healthy: true,
            message: Some("Connected".to_string()),
        },
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some("Connection failed".to_string()),
            }
        }
    };

    let ready = database.healthy;
    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies: HashMap::from([("database".to_string(), database)]),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let config = state.config();

    Json(ServiceInfo {
        message: format!("Hello from the {}!", config.service.name),
        environment: config.service.environment.clone(),
        debug_mode: config.service.debug,
        database_host: config.database.host(),
        database_url: sanitize_connection_url(&config.database.connection_url()),
        app_version: VERSION.to_string(),
    })
}
