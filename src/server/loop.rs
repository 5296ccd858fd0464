// Server loop module
// Accepts connections until the process is killed

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::spawn_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop; returns only if the listener's address cannot be read
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                spawn_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection on {local_addr}: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use std::net::{Ipv4Addr, SocketAddr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use std::path::Path;
    use std::time::Duration;
    use tokio::net::TcpStream;

    fn spawn_server(root: &Path) -> SocketAddr {
        let mut cfg = Config::load_from("/nonexistent/devserve-test-config").unwrap();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(cfg, root.to_path_buf()));

        let listener = create_listener(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(run(listener, state));
        addr
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.min.js"), "x").unwrap();
        let addr = spawn_server(dir.path());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /app.min.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        let head = raw.to_ascii_lowercase();
        assert!(head.starts_with("http/1.1 200 ok"), "{raw}");
        assert!(head.contains("content-type: application/javascript"));
        assert!(head.contains("access-control-allow-origin: *"));
        assert!(head.contains("date: "));
        assert!(raw.ends_with("\r\n\r\nx"));
    }

    #[tokio::test]
    async fn test_slow_reader_receives_whole_file() {
        const SIZE: usize = 8 * 1024 * 1024;

        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = (0..SIZE).map(|i| u8::try_from(i % 251).unwrap()).collect();
        std::fs::write(dir.path().join("terrain.bin"), &payload).unwrap();
        let addr = spawn_server(dir.path());

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /terrain.bin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        // Let the socket buffers fill and the server stall on write
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();

        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        let head = String::from_utf8_lossy(&raw[..split]).to_ascii_lowercase();
        assert!(head.starts_with("http/1.1 200 ok"), "{head}");
        assert!(head.contains(&format!("content-length: {SIZE}")));
        assert_eq!(raw.len() - split, SIZE);
        assert!(raw[split..] == payload[..]);
    }
}
