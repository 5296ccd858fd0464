//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Startup announcement
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::io::Write;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write the startup announcement for `url` to `out`
pub fn announce(out: &mut impl Write, url: &str) -> std::io::Result<()> {
    writeln!(out, "Server running at {url}")?;
    out.flush()
}

/// Log the effective startup settings
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info(&format!("[Config] Bound to {addr}"));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[Config] Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[Config] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_error(&format!("[Config] Error log: {path}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
