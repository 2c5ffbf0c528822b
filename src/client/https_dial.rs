//! HTTPS pinned by dialing the edge directly
//!
//! The TCP connection goes to `edge:port` and the TLS session presents the
//! logical domain as SNI, so the edge serves the same certificate it would
//! for a normal client.

use super::{dial, PinnedConnection, PinnedTransport, RequestFraming};
use crate::{
    error::{AppError, Result},
    models::Target,
    types::Edge,
};
use async_trait::async_trait;
use rustls::pki_types::ServerName;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

pub struct HttpsDialTransport {
    edge: Edge,
    port: u16,
    server_name: String,
    connector: TlsConnector,
    dial_timeout: Duration,
    handshake_timeout: Duration,
}

impl HttpsDialTransport {
    pub fn new(
        target: &Target,
        edge: Edge,
        tls: Arc<rustls::ClientConfig>,
        dial_timeout: Duration,
        handshake_timeout: Duration,
    ) -> Self {
        Self {
            edge,
            port: target.port,
            server_name: target.domain.clone(),
            connector: TlsConnector::from(tls),
            dial_timeout,
            handshake_timeout,
        }
    }

    /// Name sent as SNI and checked against the certificate
    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

#[async_trait]
impl PinnedTransport for HttpsDialTransport {
    fn edge(&self) -> Edge {
        self.edge
    }

    async fn connect(&self) -> Result<PinnedConnection> {
        let sni = ServerName::try_from(self.server_name.clone())
            .map_err(|e| AppError::protocol(format!("invalid server name '{}': {}", self.server_name, e)))?;

        let (tcp, dns, tcp_connect) = dial(self.edge, self.port, self.dial_timeout).await?;

        let started = Instant::now();
        let tls = timeout(self.handshake_timeout, self.connector.connect(sni, tcp))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "TLS handshake with {} exceeded {}s",
                    self.edge,
                    self.handshake_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::transport(format!("TLS handshake with {}: {}", self.edge, e)))?;
        let tls_handshake = started.elapsed();

        Ok(PinnedConnection {
            stream: Box::new(tls),
            dns,
            tcp_connect,
            tls_handshake: Some(tls_handshake),
        })
    }

    fn framing(&self, target: &Target) -> RequestFraming {
        RequestFraming {
            uri: target.path.clone(),
            extra_headers: Vec::new(),
        }
    }
}
