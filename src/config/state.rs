// Application state module
// Read-only state shared by every connection task

use super::types::Config;
use crate::handler::AssetResponder;
use crate::http::mime::MimeRegistry;

/// Application state
///
/// Built once before the listener starts accepting; never mutated afterwards,
/// so connection tasks share it through a plain `Arc` without locking.
pub struct AppState {
    pub config: Config,
    pub responder: AssetResponder,
}

impl AppState {
    /// Build the MIME registry and responder for the given document root
    pub fn new(config: Config, root: std::path::PathBuf) -> Self {
        let registry = MimeRegistry::with_entries(&config.mime.types);
        let responder = AssetResponder::new(
            root,
            registry,
            config.routes.index_files.clone(),
            config.http.server_name.clone(),
        );

        Self { config, responder }
    }
}
