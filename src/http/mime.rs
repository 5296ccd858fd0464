//! MIME type detection module
//!
//! Holds the extension → Content-Type registry used for every file response.
//! The registry is built once at startup and only read afterwards.

use std::collections::HashMap;

/// Content-Type served for JavaScript assets
pub const JAVASCRIPT: &str = "application/javascript";

/// Fallback for anything the tables do not know
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Suffixes always registered to [`JAVASCRIPT`]
pub const JAVASCRIPT_SUFFIXES: [&str; 2] = [".js", ".min.js"];

/// Resolves the Content-Type of a filesystem path
pub trait ContentTypeResolver: Send + Sync {
    fn content_type(&self, path: &str) -> String;
}

/// Immutable extension → Content-Type registry
///
/// Lookup order for a path:
/// 1. registered suffixes, longest first (`a.min.js` tries `.min.js` before `.js`),
///    exact case then lowercase
/// 2. the `mime_guess` table for the final extension
/// 3. [`OCTET_STREAM`]
#[derive(Debug, Clone)]
pub struct MimeRegistry {
    entries: HashMap<String, String>,
}

impl MimeRegistry {
    /// Registry with only the JavaScript entries
    pub fn new() -> Self {
        Self::with_entries(&HashMap::new())
    }

    /// Registry with extra entries from configuration
    ///
    /// Keys may omit the leading dot. The JavaScript entries are applied last
    /// and cannot be replaced.
    pub fn with_entries(extra: &HashMap<String, String>) -> Self {
        let mut entries: HashMap<String, String> = extra
            .iter()
            .filter(|(ext, _)| !ext.trim_start_matches('.').is_empty())
            .map(|(ext, mime)| (normalize_suffix(ext), mime.clone()))
            .collect();

        for suffix in JAVASCRIPT_SUFFIXES {
            entries.insert(suffix.to_string(), JAVASCRIPT.to_string());
        }

        Self { entries }
    }

    /// Registered type for an exact suffix such as `.min.js`
    pub fn get(&self, suffix: &str) -> Option<&str> {
        self.entries.get(suffix).map(String::as_str)
    }

    /// Resolve the Content-Type for a path
    pub fn lookup(&self, path: &str) -> String {
        if let Some(mime) = self.lookup_registered(path) {
            return mime.to_string();
        }

        mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(OCTET_STREAM)
            .to_string()
    }

    fn lookup_registered(&self, path: &str) -> Option<&str> {
        let name = file_name(path);

        // A leading dot marks a hidden file, not an extension
        name.char_indices()
            .filter(|&(i, c)| c == '.' && i > 0)
            .find_map(|(i, _)| {
                let suffix = &name[i..];
                self.get(suffix)
                    .or_else(|| self.get(&suffix.to_ascii_lowercase()))
            })
    }
}

impl Default for MimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTypeResolver for MimeRegistry {
    fn content_type(&self, path: &str) -> String {
        self.lookup(path)
    }
}

fn normalize_suffix(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.'))
}

fn file_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}
