//! The request pipeline every gateway call passes through.
//!
//! One `reqwest::Client` wrapped with two fixed stages:
//!
//! - **Outgoing**: authentication headers are recomputed from the session
//!   repository on every request. A usable token becomes
//!   `Authorization: Bearer <token>` plus an `X-User-Id` header resolved via
//!   the claims codec (falling back to the identity persisted at login). No
//!   usable token means neither header is attached; because headers are never
//!   kept as client defaults, nothing can leak from a previous authenticated
//!   request.
//! - **Incoming**: failures are classified before being re-raised. A 401 on a
//!   public route, or with no token attached, is expected and stays quiet; a
//!   401 on a protected route with a token present is a session expiry and is
//!   warned about. A 403 is always recorded at error level together with the
//!   redacted request headers. Errors are annotated, never swallowed.
//!
//! All traffic is mirrored into the bounded [`RequestLog`] with credentials
//! redacted and payloads truncated.

use std::sync::Arc;

use reqwest::{Method, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::log::RequestLog;
use crate::session::{Session, SessionStore};
use crate::token;

/// Length at which error-response bodies are cut off in messages.
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client for the MediCart gateway.
///
/// Cheap to clone; all clones share the underlying connection pool, session
/// repository, and request log.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<GatewayClientInner>,
}

struct GatewayClientInner {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    log: RequestLog,
}

/// Body attached to an outgoing request.
enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(multipart::Form),
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &GatewayConfig, session: Arc<dyn SessionStore>, log: RequestLog) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(GatewayClientInner {
                http,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                session,
                log,
            }),
        }
    }

    /// The session repository this client reads on every request.
    #[must_use]
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    /// The request log all traffic is mirrored into.
    #[must_use]
    pub fn request_log(&self) -> &RequestLog {
        &self.inner.log
    }

    // =========================================================================
    // Verb helpers
    // =========================================================================

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let bytes = self.execute(Method::GET, path, RequestBody::Empty).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET a binary resource (file downloads).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, GatewayError> {
        self.execute(Method::GET, path, RequestBody::Empty).await
    }

    /// POST without a body (mutation endpoints driven by query parameters).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let bytes = self.execute(Method::POST, path, RequestBody::Empty).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, a non-success status, or
    /// an unserializable body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let value = serde_json::to_value(body)?;
        let bytes = self
            .execute(Method::POST, path, RequestBody::Json(value))
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a multipart form (file uploads).
    ///
    /// No explicit `Content-Type` is attached; the transport layer sets the
    /// multipart boundary itself.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, GatewayError> {
        let bytes = self
            .execute(Method::POST, path, RequestBody::Multipart(form))
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// PUT without a body (mutation endpoints driven by query parameters).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let bytes = self.execute(Method::PUT, path, RequestBody::Empty).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, a non-success status, or
    /// an unserializable body.
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let value = serde_json::to_value(body)?;
        let bytes = self
            .execute(Method::PUT, path, RequestBody::Json(value))
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// DELETE a resource. Tolerates empty (204) response bodies.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or a non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.execute(Method::DELETE, path, RequestBody::Empty)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Pipeline core
    // =========================================================================

    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Vec<u8>, GatewayError> {
        let session = self.inner.session.load();
        let headers = outgoing_headers(&session);
        let had_token = session.usable_token().is_some();

        let url = self.url_for(path);
        let mut request = self.inner.http.request(method.clone(), &url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let payload_summary = match &body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(value.to_string()),
            RequestBody::Multipart(_) => Some("<multipart>".to_owned()),
        };
        self.inner.log.api_request(
            method.as_str(),
            path,
            &headers,
            payload_summary.as_deref(),
        );

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                self.inner
                    .log
                    .api_error(method.as_str(), path, None, &err.to_string());
                return Err(err.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            self.inner
                .log
                .api_response(method.as_str(), path, status.as_u16(), bytes.len());
            return Ok(bytes.to_vec());
        }

        Err(self
            .classify_failure(&method, path, response, had_token, &headers)
            .await)
    }

    /// Classify a non-success response, record it, and produce the error that
    /// is re-raised to the caller.
    async fn classify_failure(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
        had_token: bool,
        headers: &[(String, String)],
    ) -> GatewayError {
        let log = &self.inner.log;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if warn_on_unauthorized(had_token, path) {
                log.warn(
                    "Session expired - 401 Unauthorized",
                    Some(serde_json::json!({ "url": path })),
                );
            }
            log.api_error(method.as_str(), path, Some(401), "Unauthorized");
            GatewayError::Unauthorized {
                route: path.to_owned(),
            }
        } else if status == StatusCode::FORBIDDEN {
            log.error(
                "Access Forbidden - 403",
                Some(serde_json::json!({
                    "url": path,
                    "headers": crate::log::sanitize_headers(headers),
                    "status": 403,
                })),
            );
            log.api_error(method.as_str(), path, Some(403), "Forbidden");
            GatewayError::Forbidden {
                route: path.to_owned(),
            }
        } else {
            let message = match response.text().await {
                Ok(text) => truncate(&text, ERROR_BODY_LIMIT),
                Err(_) => String::new(),
            };
            log.api_error(method.as_str(), path, Some(status.as_u16()), &message);
            GatewayError::Status {
                status: status.as_u16(),
                route: path.to_owned(),
                message,
            }
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }
}

/// Compute the authentication headers for one outgoing request.
///
/// With no usable token this is empty; a stale header can never survive from
/// a previous request because nothing is cached on the client.
fn outgoing_headers(session: &Session) -> Vec<(String, String)> {
    let Some(raw) = session.usable_token() else {
        return Vec::new();
    };

    let authorization = if raw.starts_with("Bearer ") {
        raw.to_owned()
    } else {
        format!("Bearer {raw}")
    };

    let mut headers = vec![("Authorization".to_owned(), authorization)];

    // Identity from the token claims, else the id persisted at login
    let user_id = token::extract_user_id(raw).or_else(|| session.user_id.map(|id| id.as_i64()));
    if let Some(user_id) = user_id {
        headers.push(("X-User-Id".to_owned(), user_id.to_string()));
    }

    headers
}

/// Routes on which an anonymous 401 is expected: catalog browsing, public
/// batch listing, and every auth endpoint.
fn is_public_route(path: &str) -> bool {
    path.contains("/medicines") || path.contains("/batches") || path.contains("/auth")
}

/// A 401 is only worth warning about when it means a real session expired on
/// a protected route; anonymous 401s and public-route 401s are expected.
fn warn_on_unauthorized(had_token: bool, path: &str) -> bool {
    had_token && !is_public_route(path)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", s.get(..idx).unwrap_or(s)),
        None => s.to_owned(),
    }
}
