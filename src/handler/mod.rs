//! Request handler module
//!
//! Path translation, the generic static file service, and the responder that
//! layers the JavaScript and CORS policies on top of it.

pub mod listing;
pub mod path;
pub mod responder;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use responder::AssetResponder;
pub use router::{handle_request, RequestContext};
