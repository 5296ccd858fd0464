//! Static file serving module
//!
//! The generic file service: maps request paths onto the document root, picks
//! index files, generates directory listings and maps I/O errors to statuses.
//! Content-Type resolution is delegated to the injected resolver.

use crate::handler::listing;
use crate::handler::path;
use crate::handler::router::RequestContext;
use crate::http::{self, ContentTypeResolver, HeaderSet};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Response};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const FALLBACK_SERVER_NAME: &str = concat!("devserve/", env!("CARGO_PKG_VERSION"));

/// Generic static file service over a document root
pub struct StaticFiles<R> {
    root: PathBuf,
    index_files: Vec<String>,
    resolver: R,
    default_headers: HeaderSet,
}

impl<R: ContentTypeResolver> StaticFiles<R> {
    pub fn new(root: PathBuf, index_files: Vec<String>, resolver: R, server_name: &str) -> Self {
        let server = HeaderValue::from_str(server_name).unwrap_or_else(|_| {
            logger::log_warning(&format!(
                "Invalid server name '{server_name}', using {FALLBACK_SERVER_NAME}"
            ));
            HeaderValue::from_static(FALLBACK_SERVER_NAME)
        });

        Self {
            root,
            index_files,
            resolver,
            default_headers: HeaderSet::new().with(SERVER, server),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Serve one request, completing the default headers
    pub async fn serve(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        let mut response = self.dispatch(ctx).await;
        self.default_headers.apply(&mut response);
        response
    }

    async fn dispatch(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        if !matches!(*ctx.method, Method::GET | Method::HEAD) {
            return http::build_501_response(ctx.method.as_str());
        }

        let fs_path = path::translate_path(&self.root, ctx.path);

        if fs::metadata(&fs_path).await.is_ok_and(|m| m.is_dir()) {
            return self.serve_directory(ctx, &fs_path).await;
        }

        // A file addressed like a directory (`/app.js/`)
        if path::has_trailing_slash(ctx.path) {
            return http::build_404_response("File not found", ctx.is_head);
        }

        self.serve_file(ctx, &fs_path).await
    }

    async fn serve_directory(&self, ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
        if !path::has_trailing_slash(ctx.path) {
            let location = match ctx.query {
                Some(q) => format!("{}/?{q}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            return http::build_redirect_response(&location);
        }

        if let Some(index) = self.find_index(dir).await {
            return self.serve_file(ctx, &index).await;
        }

        match listing::read_entries(dir).await {
            Ok(entries) => {
                let html = listing::render(&path::decode_path(ctx.path), &entries);
                http::build_html_response(html, ctx.is_head)
            }
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to list directory '{}': {e}",
                    dir.display()
                ));
                http::build_404_response("No permission to list directory", ctx.is_head)
            }
        }
    }

    async fn find_index(&self, dir: &Path) -> Option<PathBuf> {
        for name in &self.index_files {
            let candidate = dir.join(name);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                return Some(candidate);
            }
        }
        None
    }

    async fn serve_file(&self, ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
        let content = match fs::read(file_path).await {
            Ok(c) => c,
            // File not found is common (404), no need to log
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return http::build_404_response("File not found", ctx.is_head);
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                logger::log_warning(&format!(
                    "Permission denied reading '{}'",
                    file_path.display()
                ));
                return http::build_403_response(ctx.is_head);
            }
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read file '{}': {e}",
                    file_path.display()
                ));
                return http::build_500_response(ctx.is_head);
            }
        };

        let content_type = self
            .resolver
            .content_type(&file_path.to_string_lossy());

        http::build_file_response(Bytes::from(content), &content_type, ctx.is_head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MimeRegistry;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_TYPE, LOCATION};
    use hyper::{StatusCode, Uri};

    fn service(root: &Path) -> StaticFiles<MimeRegistry> {
        StaticFiles::new(
            root.to_path_buf(),
            vec!["index.html".to_string(), "index.htm".to_string()],
            MimeRegistry::new(),
            "devserve-test",
        )
    }

    async fn get(files: &StaticFiles<MimeRegistry>, uri: &str) -> Response<Full<Bytes>> {
        let uri: Uri = uri.parse().unwrap();
        let ctx = RequestContext::new(&Method::GET, &uri);
        files.serve(&ctx).await
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_with_server_header() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let files = service(dir.path());
        let resp = get(&files, "/style.css").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(resp.headers()[SERVER], "devserve-test");
        assert_eq!(body_text(resp).await, "body{}");
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();

        let files = service(dir.path());
        let resp = get(&files, "/maps?seed=42").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/maps/?seed=42");
    }

    #[tokio::test]
    async fn test_index_file_preferred() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.htm"), "htm").unwrap();
        std::fs::write(dir.path().join("index.html"), "html").unwrap();

        let files = service(dir.path());
        let resp = get(&files, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_text(resp).await, "html");
    }

    #[tokio::test]
    async fn test_listing_without_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("WorldGen")).unwrap();
        std::fs::write(dir.path().join("WorldGen/plates.js"), "").unwrap();

        let files = service(dir.path());
        let resp = get(&files, "/WorldGen/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let html = body_text(resp).await;
        assert!(html.contains("Directory listing for /WorldGen/"));
        assert!(html.contains("<a href=\"plates.js\">plates.js</a>"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "").unwrap();

        let files = service(dir.path());
        let resp = get(&files, "/app.js/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let files = service(dir.path());
        let resp = get(&files, "/nope.png").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[SERVER], "devserve-test");
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("www");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();

        let files = service(&root);
        let resp = get(&files, "/../secret.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = get(&files, "/%2e%2e/secret.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = tempfile::tempdir().unwrap();
        let files = service(dir.path());
        let uri: Uri = "/".parse().unwrap();
        let ctx = RequestContext::new(&Method::POST, &uri);
        let resp = files.serve(&ctx).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_other_read_error_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let files = service(dir.path());
        let uri: Uri = "/".parse().unwrap();
        let ctx = RequestContext::new(&Method::GET, &uri);

        // Reading a directory as a file fails with neither NotFound nor PermissionDenied
        let resp = files.serve_file(&ctx, dir.path()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_file_name_served() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = std::ffi::OsStr::from_bytes(b"caf\xff.txt");
        if std::fs::write(dir.path().join(name), "bytes").is_err() {
            // Filesystem rejects non-UTF-8 names
            return;
        }

        let files = service(dir.path());
        let resp = get(&files, "/caf%FF.txt").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "bytes");
    }

    #[test]
    fn test_invalid_server_name_falls_back() {
        let files = StaticFiles::new(
            PathBuf::from("."),
            Vec::new(),
            MimeRegistry::new(),
            "bad\nname",
        );
        assert_eq!(files.root(), Path::new("."));
        let mut resp = Response::new(());
        files.default_headers.apply(&mut resp);
        assert_eq!(resp.headers()[SERVER], FALLBACK_SERVER_NAME);
    }
}
