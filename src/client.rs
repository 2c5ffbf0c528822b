//! Pinned transports
//!
//! A pinned transport opens a connection to one chosen edge while the request
//! keeps presenting the logical host. Plain HTTP treats the edge as a forward
//! proxy; HTTPS dials the edge directly and runs TLS with the logical host as
//! the server name. Both report how long name lookup, TCP connect and (for
//! HTTPS) the TLS handshake took.

pub mod http_proxy;
pub mod https_dial;
pub mod tls;

pub use http_proxy::HttpProxyTransport;
pub use https_dial::HttpsDialTransport;

use crate::{
    error::{AppError, Result},
    models::Target,
    types::{Edge, Protocol},
};
use async_trait::async_trait;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
    time::timeout,
};

/// Byte stream a probe speaks HTTP/1.1 over
pub trait PinnedIo: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> PinnedIo for T {}

/// An open connection to an edge plus the time spent getting there
pub struct PinnedConnection {
    pub stream: Box<dyn PinnedIo>,
    pub dns: Duration,
    pub tcp_connect: Duration,
    pub tls_handshake: Option<Duration>,
}

/// Request line and transport-specific headers for a pinned request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFraming {
    /// Request target: origin form for a direct dial, absolute form through a proxy
    pub uri: String,
    pub extra_headers: Vec<(String, String)>,
}

/// A connection path forced to one edge
#[async_trait]
pub trait PinnedTransport: Send + Sync {
    /// Edge every connection goes to
    fn edge(&self) -> Edge;

    /// Open a connection, recording the connection phases
    ///
    /// Errors are returned as-is; a transport never logs or panics.
    async fn connect(&self) -> Result<PinnedConnection>;

    /// How a request for `target` must be framed on this transport
    fn framing(&self, target: &Target) -> RequestFraming;
}

/// Builds a fresh transport per edge for one run
///
/// The TLS client configuration is built once and shared read-only.
#[derive(Clone)]
pub struct TransportBuilder {
    protocol: Protocol,
    tls: Option<Arc<rustls::ClientConfig>>,
    dial_timeout: Duration,
    handshake_timeout: Duration,
}

impl TransportBuilder {
    pub fn new(protocol: Protocol, insecure: bool) -> Result<Self> {
        let tls = match protocol {
            Protocol::Https => Some(tls::client_config(insecure)?),
            Protocol::Http => None,
        };

        Ok(Self {
            protocol,
            tls,
            dial_timeout: crate::defaults::DIAL_TIMEOUT,
            handshake_timeout: crate::defaults::TLS_HANDSHAKE_TIMEOUT,
        })
    }

    /// Override the dial and handshake timeouts
    pub fn with_timeouts(mut self, dial: Duration, handshake: Duration) -> Self {
        self.dial_timeout = dial;
        self.handshake_timeout = handshake;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Transport pinned to `edge` for `target`
    pub fn build(&self, target: &Target, edge: Edge) -> Result<Box<dyn PinnedTransport>> {
        match (self.protocol, &self.tls) {
            (Protocol::Http, _) => Ok(Box::new(HttpProxyTransport::new(
                target,
                edge,
                self.dial_timeout,
            ))),
            (Protocol::Https, Some(tls)) => Ok(Box::new(HttpsDialTransport::new(
                target,
                edge,
                Arc::clone(tls),
                self.dial_timeout,
                self.handshake_timeout,
            ))),
            (Protocol::Https, None) => Err(AppError::internal("HTTPS transport built without TLS configuration")),
        }
    }
}

/// Resolve and connect to `edge:port`, timing both steps
///
/// The edge is an IP literal, so the lookup step is near zero; it is timed
/// anyway so every probe reports the same set of phases.
pub(crate) async fn dial(edge: Edge, port: u16, dial_timeout: Duration) -> Result<(TcpStream, Duration, Duration)> {
    let started = Instant::now();
    let addr = tokio::net::lookup_host((edge.to_string(), port))
        .await
        .map_err(|e| AppError::transport(format!("resolve {}:{}: {}", edge, port, e)))?
        .next()
        .ok_or_else(|| AppError::transport(format!("no socket address for {}:{}", edge, port)))?;
    let dns = started.elapsed();

    let connect_started = Instant::now();
    let stream = timeout(dial_timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| AppError::timeout(format!("dial {} exceeded {}s", addr, dial_timeout.as_secs())))?
        .map_err(|e| AppError::transport(format!("dial {}: {}", addr, e)))?;
    let tcp_connect = connect_started.elapsed();

    stream.set_nodelay(true)?;

    Ok((stream, dns, tcp_connect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn localhost() -> Edge {
        Edge::new(Ipv4Addr::LOCALHOST)
    }

    #[tokio::test]
    async fn test_dial_local_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (_stream, dns, tcp) = dial(localhost(), port, Duration::from_secs(1)).await.unwrap();
        assert!(dns < Duration::from_secs(1));
        assert!(tcp < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_dial_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = dial(localhost(), port, Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err.category(), "TRANSPORT");
    }

    #[test]
    fn test_builder_picks_variant_by_protocol() {
        let target = Target::parse("http://www.example.com/", None, None).unwrap();
        let builder = TransportBuilder::new(Protocol::Http, false).unwrap();
        let transport = builder.build(&target, localhost()).unwrap();
        assert!(transport.framing(&target).uri.starts_with("http://"));

        let target = Target::parse("https://www.example.com/a", None, None).unwrap();
        let builder = TransportBuilder::new(Protocol::Https, false).unwrap();
        let transport = builder.build(&target, localhost()).unwrap();
        assert_eq!(transport.framing(&target).uri, "/a");
        assert_eq!(transport.edge(), localhost());
    }
}
