//! Static asset responder
//!
//! Wraps the generic file service with two policies:
//! - paths ending in `.js` / `.min.js` are always `application/javascript`
//! - every response carries `Access-Control-Allow-Origin: *`

use crate::handler::router::RequestContext;
use crate::handler::static_files::StaticFiles;
use crate::http::mime::{JAVASCRIPT, JAVASCRIPT_SUFFIXES};
use crate::http::{ContentTypeResolver, HeaderSet, MimeRegistry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::PathBuf;

/// Plain, case-sensitive suffix test (`notjs.js` matches, `app.js.bak` does not)
pub fn is_javascript(path: &str) -> bool {
    JAVASCRIPT_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// Content-Type resolver that answers JavaScript paths itself and delegates the rest
#[derive(Debug, Clone)]
pub struct JavaScriptOverride<R> {
    inner: R,
}

impl<R> JavaScriptOverride<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: ContentTypeResolver> ContentTypeResolver for JavaScriptOverride<R> {
    fn content_type(&self, path: &str) -> String {
        if is_javascript(path) {
            return JAVASCRIPT.to_string();
        }
        self.inner.content_type(path)
    }
}

/// The request handler installed on the listener
pub struct AssetResponder {
    files: StaticFiles<JavaScriptOverride<MimeRegistry>>,
    headers: HeaderSet,
}

impl AssetResponder {
    pub fn new(
        root: PathBuf,
        registry: MimeRegistry,
        index_files: Vec<String>,
        server_name: String,
    ) -> Self {
        Self {
            files: StaticFiles::new(
                root,
                index_files,
                JavaScriptOverride::new(registry),
                &server_name,
            ),
            headers: HeaderSet::cors_any_origin(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        self.files.root()
    }

    /// Content-Type that a file at `path` would be served with
    pub fn content_type(&self, path: &str) -> String {
        self.files.resolver().content_type(path)
    }

    /// Serve a request; headers are finalised on every outcome
    pub async fn respond(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        let mut response = self.files.serve(ctx).await;
        self.finalize_headers(&mut response);
        response
    }

    /// Insert the responder's headers right before the response leaves
    pub fn finalize_headers<B>(&self, response: &mut Response<B>) {
        self.headers.apply(response);
    }
}
