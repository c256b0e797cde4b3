//! Route handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{CourseListing, sanitize_folder_name};
use crate::pipeline::{fetch_listing, run_generation};
use crate::server::AppState;
use crate::utils::http::Fetcher;

const PLACEHOLDER: &str = "<html><body><h3>Index not generated yet.</h3>\
<p>Call POST /api/generate to produce dashboard (set cookie first via /api/set_cookie).</p>\
</body></html>";

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct SetCookieRequest {
    pub cookie: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    #[serde(default)]
    pub binary: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Only absolute http(s) URLs are forwarded.
fn absolute_url(url: &str) -> Result<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_request("Missing url"));
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed),
        Ok(parsed) => Err(AppError::invalid_request(format!(
            "Unsupported scheme: {}",
            parsed.scheme()
        ))),
        Err(e) => Err(AppError::invalid_request(format!("Invalid url '{trimmed}': {e}"))),
    }
}

pub async fn root(State(state): State<AppState>) -> Result<Html<String>> {
    let page = state
        .storage
        .read_text(&state.config.paths.index_html)
        .await?;
    Ok(Html(page.unwrap_or_else(|| PLACEHOLDER.to_string())))
}

pub async fn set_cookie(
    State(state): State<AppState>,
    Json(request): Json<SetCookieRequest>,
) -> Result<Json<Value>> {
    state.cookie.try_set(request.cookie)?;
    log::info!("Session cookie updated");
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn fetch(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> Result<Response> {
    let url = absolute_url(&request.url)?;
    let cookie = state.cookie.get();

    if request.binary {
        let bytes = state.client.fetch_bytes(url, cookie.as_deref()).await?;
        Ok(([(CONTENT_TYPE, OCTET_STREAM)], bytes).into_response())
    } else {
        let text = state.client.fetch_text(url, cookie.as_deref()).await?;
        Ok(Html(text).into_response())
    }
}

/// Relay a remote resource.
///
/// Error statuses are buffered and returned as-is; anything else is streamed
/// with the origin's content type.
pub async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response> {
    let url = absolute_url(query.url.as_deref().unwrap_or_default())?;
    let response = state
        .client
        .open_stream(url, state.cookie.get().as_deref())
        .await?;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let body = response.bytes().await?;
        return Ok((status, body).into_response());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));
    let origin = url.to_string();
    let stream = response
        .bytes_stream()
        .inspect_err(move |e| log::warn!("Proxy stream from {} broke: {}", origin, e));

    Ok((status, [(CONTENT_TYPE, content_type)], Body::from_stream(stream)).into_response())
}

pub async fn courses(State(state): State<AppState>) -> Result<Json<CourseListing>> {
    let listing = fetch_listing(&state.config, &state.client, &state.cookie).await?;
    Ok(Json(listing))
}

pub async fn generate(State(state): State<AppState>) -> Result<Json<Value>> {
    let _running = state.generation.lock().await;
    let report = run_generation(&state.config, &state.client, &state.storage, &state.cookie).await?;
    Ok(Json(json!({ "status": "ok", "courses_count": report.courses_count })))
}

pub async fn syllabus(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> Result<Response> {
    if folder.is_empty() || sanitize_folder_name(&folder) != folder {
        return Err(AppError::invalid_request(format!("Invalid course folder '{folder}'")));
    }

    let path = state.storage.course(&folder).canonical_syllabus();
    match state.storage.read_bytes(&path).await? {
        Some(bytes) => Ok(([(CONTENT_TYPE, "application/pdf")], bytes).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_absolute_http_urls() {
        assert_eq!(absolute_url(" https://x.example/a ").unwrap(), "https://x.example/a");
        assert!(matches!(absolute_url(""), Err(AppError::InvalidRequest(_))));
        assert!(matches!(absolute_url("/relative"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(absolute_url("file:///etc/passwd"), Err(AppError::InvalidRequest(_))));
    }
}
