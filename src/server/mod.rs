// src/server/mod.rs

//! HTTP surface.
//!
//! | route                              | handler                     |
//! |------------------------------------|-----------------------------|
//! | `GET /`                            | generated dashboard         |
//! | `POST /api/set_cookie`             | replace the session cookie  |
//! | `POST /api/fetch`                  | one-off fetch with cookie   |
//! | `GET /api/proxy?url=`              | streaming reverse proxy     |
//! | `GET /api/courses`                 | listing preview             |
//! | `POST /api/generate`               | full generation run         |
//! | `GET /courses/{folder}/syllabus.pdf` | local syllabus copy       |

mod handlers;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::LocalStorage;
use crate::utils::http::{PortalClient, SessionCookie};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: PortalClient,
    pub storage: LocalStorage,
    pub cookie: SessionCookie,
    /// Held for the duration of a generation run
    generation: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, cookie: SessionCookie) -> Result<Self> {
        let client = PortalClient::new(&config.http)?;
        let storage = LocalStorage::from_config(&config.paths);
        Ok(Self {
            config: Arc::new(config),
            client,
            storage,
            cookie,
            generation: Arc::new(Mutex::new(())),
        })
    }
}

/// Build the router over a prepared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/set_cookie", post(handlers::set_cookie))
        .route("/api/fetch", post(handlers::fetch))
        .route("/api/proxy", get(handlers::proxy))
        .route("/api/courses", get(handlers::courses))
        .route("/api/generate", post(handlers::generate))
        .route("/courses/{folder}/syllabus.pdf", get(handlers::syllabus))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: Config, cookie: SessionCookie) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::new(config, cookie)?;
    let listener = TcpListener::bind(&bind).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

impl AppError {
    /// Status code this error is reported with.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Fetch { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        let body = json!({ "status": "error", "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}
