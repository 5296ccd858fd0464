// Startup module
// Binds the listener, announces the URL, then hands off to the accept loop

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::listener::create_listener;
use super::server_loop;
use crate::config::{self, AppState, Config};
use crate::logger;

/// A bound listener plus the state its connections are served with
pub struct BoundServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl BoundServer {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the process is killed
    pub async fn serve(self) -> std::io::Result<()> {
        server_loop::run(self.listener, self.state).await
    }
}

/// Bind the fixed address, announce on stdout and serve `root`
pub async fn start(cfg: Config, root: PathBuf) -> std::io::Result<()> {
    let server = bind(config::socket_addr(), cfg, root, &mut std::io::stdout())?;
    server.serve().await
}

/// Bind `addr`, then write the announcement to `out`
///
/// A failed bind returns before anything is written.
pub fn bind(
    addr: SocketAddr,
    cfg: Config,
    root: PathBuf,
    out: &mut impl Write,
) -> std::io::Result<BoundServer> {
    let listener = create_listener(addr)?;
    let state = Arc::new(AppState::new(cfg, root));

    logger::announce(out, &config::public_url())?;
    logger::log_server_start(&addr, &state.config);

    Ok(BoundServer { listener, state })
}
