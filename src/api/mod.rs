// API module entry
// Single-endpoint dispatch: the method alone selects the behavior

mod handlers;
mod response;
mod types;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::error::ApiError;
use crate::logger;
use crate::logger::AccessLogEntry;

/// Request entry point.
///
/// Dispatches on the HTTP method only; the service exposes a single
/// endpoint and does not consult the path. Every branch funnels errors
/// through `ApiError` so each failure mode keeps its own status code.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = if method == Method::OPTIONS {
        // Preflight answers immediately, no store access
        response::preflight()
    } else if let Err(e) = state.pool() {
        // Every non-OPTIONS method requires the store URL, even ones the
        // dispatch below would reject
        response::error_response(&e)
    } else {
        match method {
            Method::GET => match handlers::handle_overview(&state).await {
                Ok(resp) => resp,
                Err(e) => response::error_response(&e),
            },
            Method::POST => match read_body(req, state.config.http.max_body_size).await {
                Ok(body) => match handlers::handle_create(&state, &body).await {
                    Ok(resp) => resp,
                    Err(e) => response::error_response(&e),
                },
                Err(e) => response::error_response(&e),
            },
            ref m => {
                logger::log_warning(&format!("Method not allowed: {m}"));
                response::error_response(&ApiError::MethodNotAllowed)
            }
        }
    };

    if state.config.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: remote_addr.to_string(),
            time: Local::now(),
            method: method.to_string(),
            path,
            status: resp.status().as_u16(),
            body_bytes: resp.body().size_hint().exact().unwrap_or(0),
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

/// Collect the request body, bounded by the configured size cap
async fn read_body<B>(req: Request<B>, max_body_size: u64) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    if let Some(length) = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        if length > max_body_size {
            return Err(ApiError::ValidationFailed(format!(
                "Request body exceeds limit of {max_body_size} bytes"
            )));
        }
    }

    match req.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => Err(ApiError::ValidationFailed(format!(
            "Failed to read request body: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::StatusCode;

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().expect("valid address")
    }

    fn state_without_store() -> Arc<AppState> {
        let config = Config::load_from("does-not-exist").expect("defaults should load");
        Arc::new(AppState::without_store(config))
    }

    /// Store URL configured but never dialed: the pool is lazy, so
    /// validation-path tests run without a database
    fn state_with_lazy_store() -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist").expect("defaults should load");
        config.database.url = Some("postgres://fields@localhost/fields".to_string());
        Arc::new(AppState::new(config).expect("lazy pool from valid URL"))
    }

    fn request(method: Method, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri("/")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("valid request")
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("infallible body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("JSON body")
    }

    #[tokio::test]
    async fn test_options_without_store_is_200_and_empty() {
        let resp = handle_request(request(Method::OPTIONS, ""), state_without_store(), addr())
            .await
            .expect("infallible");

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("infallible body")
            .to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_methods_yield_405() {
        for method in [Method::DELETE, Method::PUT, Method::PATCH] {
            let resp = handle_request(request(method, ""), state_with_lazy_store(), addr())
                .await
                .expect("infallible");
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            let body = body_json(resp).await;
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[tokio::test]
    async fn test_non_options_without_store_yield_config_500() {
        // The store check precedes dispatch: even a method the dispatch
        // would reject answers the configuration error
        for method in [Method::GET, Method::POST, Method::DELETE] {
            let resp = handle_request(
                request(method, r#"{"name": "n", "area": 1.0, "crop": "c"}"#),
                state_without_store(),
                addr(),
            )
            .await
            .expect("infallible");
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(resp).await;
            assert_eq!(body["error"], "Database connection not configured");
        }
    }

    #[tokio::test]
    async fn test_post_missing_members_is_400_without_store_access() {
        let resp = handle_request(
            request(Method::POST, r#"{"name": "North Field"}"#),
            state_with_lazy_store(),
            addr(),
        )
        .await
        .expect("infallible");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields: name, area, crop");
    }

    #[tokio::test]
    async fn test_post_empty_strings_are_falsy() {
        let resp = handle_request(
            request(Method::POST, r#"{"name": "", "area": 2.0, "crop": ""}"#),
            state_with_lazy_store(),
            addr(),
        )
        .await
        .expect("infallible");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_malformed_json_is_400() {
        let resp = handle_request(
            request(Method::POST, "not json"),
            state_with_lazy_store(),
            addr(),
        )
        .await
        .expect("infallible");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .expect("string error")
            .starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_post_oversized_body_is_rejected() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(CONTENT_LENGTH, "10485760")
            .body(Full::new(Bytes::from("{}")))
            .expect("valid request");

        let resp = handle_request(req, state_with_lazy_store(), addr())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
