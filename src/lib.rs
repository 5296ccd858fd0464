//! devserve: serve the working directory over HTTP for local development.
//!
//! JavaScript assets are always served as `application/javascript` and every
//! response carries `Access-Control-Allow-Origin: *`.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
