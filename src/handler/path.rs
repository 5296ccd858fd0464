//! Request path translation
//!
//! Maps a percent-encoded URI path onto the document root. `..` segments are
//! resolved lexically and can never climb above the root. Segments that the
//! platform would read as anything but a plain file name (drive prefixes,
//! roots, separators) are dropped.

use percent_encoding::{percent_decode, percent_decode_str};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Decode a URI path for display (lossy UTF-8)
pub fn decode_path(raw_path: &str) -> String {
    percent_decode_str(raw_path).decode_utf8_lossy().into_owned()
}

/// Normalised path segments of a raw URI path
///
/// Decoding is byte-exact, so on Unix names that are not valid UTF-8 stay
/// reachable (`%FF` maps to the byte `0xFF`).
pub fn segments(raw_path: &str) -> Vec<OsString> {
    let decoded: Vec<u8> = percent_decode(raw_path.as_bytes()).collect();
    let mut parts: Vec<OsString> = Vec::new();

    for segment in decoded.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                parts.pop();
            }
            s if s.iter().any(|&b| b == b'\\' || b == 0) => {}
            s => {
                let name = os_name(s);
                if is_plain_name(&name) {
                    parts.push(name);
                }
            }
        }
    }

    parts
}

#[cfg(unix)]
fn os_name(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
fn os_name(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Whether `name` joins onto a directory as exactly one child entry
fn is_plain_name(name: &OsStr) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Translate a raw URI path to a filesystem path under `root`
pub fn translate_path(root: &Path, raw_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments(raw_path) {
        path.push(segment);
    }
    path
}

/// Whether the request path addresses a directory (`/docs/`)
pub fn has_trailing_slash(raw_path: &str) -> bool {
    raw_path.ends_with('/')
}
