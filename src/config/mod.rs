// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, MimeConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};

/// Fixed listening port
pub const PORT: u16 = 8000;

/// Default config file name (without extension), looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "devserve";

/// Environment variable prefix, e.g. `DEVSERVE__LOGGING__ACCESS_LOG=false`
const ENV_PREFIX: &str = "DEVSERVE";

impl Config {
    /// Load configuration from `devserve.{toml,yaml,json,...}` if present
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from specified file path
    /// The file is optional; missing keys fall back to built-in defaults
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("http.server_name", concat!("devserve/", env!("CARGO_PKG_VERSION")))?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

/// Listening address: all interfaces, fixed port
pub const fn socket_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, PORT))
}

/// URL printed in the startup announcement
pub fn public_url() -> String {
    format!("http://localhost:{PORT}/")
}
