//! Online check consulted before a failed send is classified by status code.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

pub const EMAILJS_HOST: &str = "api.emailjs.com:443";
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Treats the process as online when a TCP connection to `addr` succeeds.
pub struct HostProbe {
    addr: String,
    timeout: Duration,
}

impl HostProbe {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new(EMAILJS_HOST)
    }
}

#[async_trait]
impl Connectivity for HostProbe {
    async fn is_online(&self) -> bool {
        let online = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        );
        debug!("connectivity probe to {}: online={}", self.addr, online);
        online
    }
}

/// Fixed answer, for wiring without network access.
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_online_when_listener_accepts() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let probe = HostProbe::new(addr.to_string());
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_probe_offline_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(!HostProbe::new(addr.to_string()).is_online().await);
    }

    #[tokio::test]
    async fn test_static_connectivity() {
        assert!(StaticConnectivity(true).is_online().await);
        assert!(!StaticConnectivity(false).is_online().await);
    }
}
