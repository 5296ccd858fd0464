// Server module entry point
// Listener creation, startup, accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod startup;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::run;
pub use startup::{bind, start, BoundServer};
