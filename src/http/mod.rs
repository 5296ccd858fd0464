//! HTTP protocol layer module
//!
//! MIME detection, response builders and header finalisation, independent of
//! how requests are mapped onto the filesystem.

pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use headers::HeaderSet;
pub use mime::{ContentTypeResolver, MimeRegistry};
pub use response::{
    build_403_response, build_404_response, build_500_response, build_501_response,
    build_file_response, build_html_response, build_redirect_response,
};
