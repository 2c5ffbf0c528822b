//! Plain HTTP pinned through a forward-proxy reference
//!
//! The edge stands in as the proxy at `http://{host}:{port}@{edge}:{port}`:
//! the connection goes to the edge, the request line carries the absolute
//! URL, and the `host:port` user part becomes a Basic proxy credential.

use super::{dial, PinnedConnection, PinnedTransport, RequestFraming};
use crate::{error::Result, models::Target, types::Edge};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::time::Duration;

pub struct HttpProxyTransport {
    edge: Edge,
    port: u16,
    proxy_user: String,
    dial_timeout: Duration,
}

impl HttpProxyTransport {
    pub fn new(target: &Target, edge: Edge, dial_timeout: Duration) -> Self {
        Self {
            edge,
            port: target.port,
            proxy_user: format!("{}:{}", target.domain, target.port),
            dial_timeout,
        }
    }

    /// The proxy reference this transport stands for
    pub fn proxy_url(&self) -> String {
        format!("http://{}@{}:{}", self.proxy_user, self.edge, self.port)
    }

    /// `Proxy-Authorization` value for the embedded user part
    pub fn proxy_authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(self.proxy_user.as_bytes()))
    }
}

#[async_trait]
impl PinnedTransport for HttpProxyTransport {
    fn edge(&self) -> Edge {
        self.edge
    }

    async fn connect(&self) -> Result<PinnedConnection> {
        let (stream, dns, tcp_connect) = dial(self.edge, self.port, self.dial_timeout).await?;
        Ok(PinnedConnection {
            stream: Box::new(stream),
            dns,
            tcp_connect,
            tls_handshake: None,
        })
    }

    fn framing(&self, target: &Target) -> RequestFraming {
        RequestFraming {
            uri: format!("http://{}{}", target.authority(), target.path),
            extra_headers: vec![("Proxy-Authorization".to_string(), self.proxy_authorization())],
        }
    }
}
