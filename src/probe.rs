//! Single-port probing.
//!
//! One probe is one TCP connect attempt with a deadline, plus an optional
//! short read for a service greeting. A probe never fails: refused,
//! unreachable, and timed-out connects all settle into a closed result,
//! indistinguishable from a port nothing listens on.

use crate::banner;
use async_trait::async_trait;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::trace;

/// Outcome of probing one port.
///
/// Ownership moves to the orchestrator once produced; the struct is never
/// mutated afterward except for the service annotation on open ports.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// The probed port.
    pub port: u16,
    /// Whether a TCP connection was established before the deadline.
    pub open: bool,
    /// Greeting captured from the service, when it sent one unprompted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Conventional service name for the port, filled in by the
    /// orchestrator on open results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ProbeResult {
    /// A closed (or errored, or timed-out) port.
    pub fn closed(port: u16) -> Self {
        Self {
            port,
            open: false,
            banner: None,
            service: None,
        }
    }

    /// An open port, with or without a captured banner.
    pub fn open(port: u16, banner: Option<String>) -> Self {
        Self {
            port,
            open: true,
            banner,
            service: None,
        }
    }
}

/// The probing seam between the orchestrator and the network.
///
/// Production code uses [`TcpProber`]; tests substitute scripted
/// implementations.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one port. Always returns a result, never an error.
    async fn probe(&self, addr: IpAddr, port: u16) -> ProbeResult;
}

/// Probes by completing a full TCP handshake through the OS socket API.
pub struct TcpProber {
    timeout: Duration,
    grab_banners: bool,
}

impl TcpProber {
    /// Create a prober with a per-port deadline.
    pub fn new(timeout: Duration, grab_banners: bool) -> Self {
        Self {
            timeout,
            grab_banners,
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: IpAddr, port: u16) -> ProbeResult {
        // One deadline governs connect and banner read together.
        let deadline = Instant::now() + self.timeout;
        let sockaddr = SocketAddr::new(addr, port);

        let mut stream = match timeout_at(deadline, TcpStream::connect(sockaddr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                trace!(port, reason = %e, "connect failed");
                return ProbeResult::closed(port);
            }
            Err(_) => {
                trace!(port, "connect timed out");
                return ProbeResult::closed(port);
            }
        };

        if !self.grab_banners {
            return ProbeResult::open(port, None);
        }

        // Single bounded read; no data before the deadline just means the
        // service greets silently.
        let mut buf = [0u8; banner::MAX_BANNER_BYTES];
        let grabbed = match timeout_at(deadline, stream.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => banner::decode(&buf[..n]),
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => None,
        };

        // Stream drops here, closing the socket on every path.
        ProbeResult::open(port, grabbed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    async fn free_port() -> u16 {
        // Bind to an ephemeral port, then release it so the probe finds
        // nothing listening.
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_refused_connect_is_closed_not_error() {
        let port = free_port().await;
        let prober = TcpProber::new(Duration::from_millis(500), true);

        let result = prober.probe(LOCALHOST, port).await;
        assert!(!result.open);
        assert!(result.banner.is_none());
        assert!(result.service.is_none());
    }

    #[tokio::test]
    async fn test_open_port_with_banner() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"SSH-2.0-Test\r\n").await.unwrap();
        });

        let prober = TcpProber::new(Duration::from_secs(2), true);
        let result = prober.probe(LOCALHOST, port).await;

        assert!(result.open);
        assert_eq!(result.banner.as_deref(), Some("SSH-2.0-Test\n"));
    }

    #[tokio::test]
    async fn test_open_port_silent_service_has_no_banner() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Accept but never write; the read must time out cleanly.
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let prober = TcpProber::new(Duration::from_millis(300), true);
        let result = prober.probe(LOCALHOST, port).await;

        assert!(result.open);
        assert!(result.banner.is_none());
    }

    #[tokio::test]
    async fn test_banner_read_skipped_when_disabled() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.write_all(b"220 greetings\r\n").await;
        });

        let prober = TcpProber::new(Duration::from_secs(1), false);
        let result = prober.probe(LOCALHOST, port).await;

        assert!(result.open);
        assert!(result.banner.is_none());
    }

    #[tokio::test]
    async fn test_peer_closing_immediately_yields_open_no_banner() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let prober = TcpProber::new(Duration::from_secs(1), true);
        let result = prober.probe(LOCALHOST, port).await;

        assert!(result.open);
        assert!(result.banner.is_none());
    }
}
