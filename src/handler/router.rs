//! Request entry point
//!
//! Builds the per-request context, hands it to the responder and writes the
//! access log line.

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Uri, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Raw (percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: &'a Method, uri: &'a Uri) -> Self {
        Self {
            method,
            path: uri.path(),
            query: uri.query(),
            is_head: *method == Method::HEAD,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::new(req.method(), req.uri());

    let response = state.responder.respond(&ctx).await;

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
    use hyper::StatusCode;

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("/nonexistent/devserve-test-config").unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg, root.to_path_buf()))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[test]
    fn test_context_from_uri() {
        let uri: Uri = "/maps/world.js?seed=7".parse().unwrap();
        let ctx = RequestContext::new(&Method::HEAD, &uri);
        assert_eq!(ctx.path, "/maps/world.js");
        assert_eq!(ctx.query, Some("seed=7"));
        assert!(ctx.is_head);
    }

    #[tokio::test]
    async fn test_handle_request() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "1").unwrap();

        let req = Request::get("/app.js").body(()).unwrap();
        let resp = handle_request(req, state(dir.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/javascript");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_access_entry() {
        let req = Request::get("/a.css?x=1")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let resp = crate::http::build_404_response("File not found", false);

        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/a.css");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, "404 File not found".len());
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
        assert_eq!(entry.http_version, "1.1");
    }
}
