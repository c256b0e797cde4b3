// src/utils/http.rs

//! HTTP client utilities.
//!
//! One GET per call, browser-like headers, an optional `Cookie` header and a
//! timeout chosen by payload kind. Non-success statuses become
//! [`AppError::Fetch`].

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Response};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_ANY: &str = "*/*";

/// Shared, replaceable session cookie.
///
/// Fetches take a snapshot when they start; replacing the value affects only
/// requests issued afterwards.
#[derive(Debug, Clone, Default)]
pub struct SessionCookie(Arc<RwLock<Option<String>>>);

impl SessionCookie {
    pub fn new(initial: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    /// Current cookie value.
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the cookie for all later fetches.
    pub fn set(&self, cookie: impl Into<String>) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = Some(cookie.into());
    }

    /// Replace the cookie after checking it can be sent as a header.
    pub fn try_set(&self, cookie: impl Into<String>) -> Result<()> {
        let cookie = cookie.into();
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::invalid_request(format!("cookie is not a valid header value: {e}")))?;
        self.set(cookie);
        Ok(())
    }
}

/// The one I/O primitive the course pipeline depends on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch an HTML page as text.
    async fn fetch_text(&self, url: &str, cookie: Option<&str>) -> Result<String>;

    /// Fetch a binary payload.
    async fn fetch_bytes(&self, url: &str, cookie: Option<&str>) -> Result<Vec<u8>>;
}

/// Portal HTTP client with per-kind timeouts.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    text_timeout: Duration,
    binary_timeout: Duration,
    proxy_timeout: Duration,
}

impl PortalClient {
    /// Build a client from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            text_timeout: Duration::from_secs(config.text_timeout_secs),
            binary_timeout: Duration::from_secs(config.binary_timeout_secs),
            proxy_timeout: Duration::from_secs(config.proxy_timeout_secs),
        })
    }

    fn request(&self, url: &str, accept: &'static str, cookie: Option<&str>) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        if let Some(cookie) = cookie {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(e) => log::warn!("Sending {} without cookie: invalid header value ({})", url, e),
            }
        }
        self.client.get(url).headers(headers)
    }

    /// Open a passthrough response without buffering its body.
    ///
    /// The status is not checked; the caller relays it to its own client.
    pub async fn open_stream(&self, url: &str, cookie: Option<&str>) -> Result<Response> {
        let response = self
            .request(url, ACCEPT_ANY, cookie)
            .timeout(self.proxy_timeout)
            .send()
            .await?;
        log::debug!("proxy {} -> {}", url, response.status());
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for PortalClient {
    async fn fetch_text(&self, url: &str, cookie: Option<&str>) -> Result<String> {
        let response = self
            .request(url, ACCEPT_HTML, cookie)
            .timeout(self.text_timeout)
            .send()
            .await?;
        Ok(check_status(url, response)?.text().await?)
    }

    async fn fetch_bytes(&self, url: &str, cookie: Option<&str>) -> Result<Vec<u8>> {
        let response = self
            .request(url, ACCEPT_ANY, cookie)
            .timeout(self.binary_timeout)
            .send()
            .await?;
        Ok(check_status(url, response)?.bytes().await?.to_vec())
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .redirect(Policy::limited(config.max_redirects))
        .build()?;
    Ok(client)
}

/// Reject anything outside 2xx/3xx.
fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() || status.is_redirection() {
        Ok(response)
    } else {
        Err(AppError::fetch(url, status.as_u16()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use reqwest::header::{CONTENT_TYPE, LOCATION};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a small fixed site on an ephemeral local port; returns its base URL.
    ///
    /// - `/page`: 200 text
    /// - `/missing`: 404 with body `gone`
    /// - `/moved`: 302 to `/page`
    /// - `/echo-cookie`: the request's `Cookie` header, or `none`
    /// - `/file.pdf`: 200 `application/pdf`
    pub(crate) async fn spawn_origin() -> String {
        let app = Router::new()
            .route("/page", get(|| async { "hello" }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route(
                "/moved",
                get(|| async { (StatusCode::FOUND, [(LOCATION, "/page")]) }),
            )
            .route(
                "/echo-cookie",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(COOKIE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string()
                }),
            )
            .route(
                "/file.pdf",
                get(|| async { ([(CONTENT_TYPE, "application/pdf")], b"%PDF-1.4".to_vec()) }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> PortalClient {
        PortalClient::new(&HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn error_status_becomes_fetch_error() {
        let origin = spawn_origin().await;
        let url = format!("{origin}/missing");

        let err = client().fetch_text(&url, None).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, AppError::Fetch { url: ref u, .. } if *u == url));
        assert_eq!(client().fetch_bytes(&url, None).await.unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn redirects_are_followed() {
        let origin = spawn_origin().await;
        let text = client().fetch_text(&format!("{origin}/moved"), None).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn cookie_header_reaches_origin() {
        let origin = spawn_origin().await;
        let url = format!("{origin}/echo-cookie");

        assert_eq!(client().fetch_text(&url, Some("sid=7")).await.unwrap(), "sid=7");
        assert_eq!(client().fetch_text(&url, None).await.unwrap(), "none");
        // Not a valid header value: sent without a cookie instead of failing.
        assert_eq!(client().fetch_text(&url, Some("a\nb")).await.unwrap(), "none");
    }

    #[tokio::test]
    async fn binary_payload_is_returned_verbatim() {
        let origin = spawn_origin().await;
        let bytes = client()
            .fetch_bytes(&format!("{origin}/file.pdf"), None)
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn open_stream_does_not_check_status() {
        let origin = spawn_origin().await;
        let response = client()
            .open_stream(&format!("{origin}/missing"), None)
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[test]
    fn session_cookie_snapshot_is_detached() {
        let cookie = SessionCookie::new(Some("sid=1".into()));
        let snapshot = cookie.get();
        cookie.set("sid=2");
        assert_eq!(snapshot.as_deref(), Some("sid=1"));
        assert_eq!(cookie.get().as_deref(), Some("sid=2"));
    }

    #[test]
    fn session_cookie_clones_share_state() {
        let cookie = SessionCookie::default();
        let handle = cookie.clone();
        assert!(cookie.get().is_none());
        handle.set("sid=x");
        assert_eq!(cookie.get().as_deref(), Some("sid=x"));
    }

    #[test]
    fn try_set_rejects_header_breaking_cookie() {
        let cookie = SessionCookie::new(Some("sid=1".into()));
        let err = cookie.try_set("sid=2\r\nX-Evil: 1").unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(cookie.get().as_deref(), Some("sid=1"));

        cookie.try_set("sid=3; lang=en").unwrap();
        assert_eq!(cookie.get().as_deref(), Some("sid=3; lang=en"));
    }

    #[test]
    fn client_builds_from_defaults() {
        assert!(PortalClient::new(&HttpConfig::default()).is_ok());
    }
}
