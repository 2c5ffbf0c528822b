//! Pinned probe execution
//!
//! One probe is one GET of the target through a transport pinned to a single
//! edge. The result carries status, selected headers, a body fingerprint
//! and per-phase latency.

pub mod hash;

pub use hash::{content_hash, ContentHasher};

use crate::{
    client::TransportBuilder,
    error::{ErrorContext, Result},
    models::{LatencyPhases, ProbeResult, ReqOptions, SelectedHeaders, Target},
    types::Edge,
};
use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::{
    body::Bytes,
    header::{AUTHORIZATION, HOST, RANGE, REFERER, USER_AGENT},
    Method, Request,
};
use hyper_util::rt::TokioIo;
use std::time::Instant;

/// Anything that can probe an edge
///
/// The dashboard and burst drivers only see this trait, so they can be run
/// against scripted probers.
#[async_trait]
pub trait EdgeProber: Send + Sync {
    /// Probe one edge; failures come back inside the result
    async fn probe(&self, edge: Edge) -> ProbeResult;
}

/// Runs real probes against a fixed target
pub struct ProbeExecutor {
    target: Target,
    options: ReqOptions,
    transports: TransportBuilder,
}

impl ProbeExecutor {
    pub fn new(target: Target, options: ReqOptions, insecure: bool) -> Result<Self> {
        let transports = TransportBuilder::new(target.protocol, insecure)?;
        Ok(Self::with_transports(target, options, transports))
    }

    pub fn with_transports(target: Target, options: ReqOptions, transports: TransportBuilder) -> Self {
        Self {
            target,
            options,
            transports,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn options(&self) -> &ReqOptions {
        &self.options
    }

    /// Headers this probe adds on top of the transport's own, in send order
    ///
    /// Host is listed only when it is overridden.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(host) = &self.options.host {
            headers.push(("Host".to_string(), host.clone()));
        }
        if let Some(referer) = &self.options.referer {
            headers.push(("Referer".to_string(), referer.clone()));
        }
        if let Some(authorization) = &self.options.authorization {
            headers.push(("Authorization".to_string(), authorization.clone()));
        }
        if let Some(range) = self.options.range() {
            headers.push(("Range".to_string(), range.to_string()));
        }
        headers
    }

    async fn try_probe(&self, edge: Edge) -> Result<ProbeResult> {
        let transport = self.transports.build(&self.target, edge)?;
        let connection = transport.connect().await?;
        let framing = transport.framing(&self.target);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(connection.stream))
            .await
            .with_context(|| format!("HTTP/1.1 handshake with {}", edge))?;
        tokio::spawn(async move {
            // The connection ends with the probe; its outcome is seen through send_request
            let _ = conn.await;
        });

        let host = self
            .options
            .host
            .clone()
            .unwrap_or_else(|| self.target.authority());
        let request_headers = self.request_headers();

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(framing.uri.as_str())
            .header(HOST, host)
            .header(USER_AGENT, format!("{}/{}", crate::PKG_NAME, crate::VERSION));
        if let Some(referer) = &self.options.referer {
            builder = builder.header(REFERER, referer.as_str());
        }
        if let Some(authorization) = &self.options.authorization {
            builder = builder.header(AUTHORIZATION, authorization.as_str());
        }
        if let Some(range) = self.options.range() {
            builder = builder.header(RANGE, range);
        }
        for (name, value) in &framing.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder.body(Empty::<Bytes>::new())?;

        let sent = Instant::now();
        let response = sender
            .send_request(request)
            .await
            .with_context(|| format!("request to {}", edge))?;
        let server_processing = sent.elapsed();

        let (parts, mut body) = response.into_parts();

        let transfer = Instant::now();
        let mut hasher = ContentHasher::new();
        while let Some(frame) = body.frame().await {
            let frame = frame.context("reading response body")?;
            if let Some(chunk) = frame.data_ref() {
                hasher.update(chunk);
            }
        }
        let content_transfer = transfer.elapsed();

        let response_headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    canonical_header_name(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(ProbeResult {
            edge: Some(transport.edge()),
            status: parts.status.as_u16(),
            reason: parts.status.canonical_reason().unwrap_or_default().to_string(),
            headers: SelectedHeaders::from_headers(&parts.headers),
            response_headers,
            request_headers,
            content_hash: hasher.finish(),
            phases: LatencyPhases {
                dns: connection.dns,
                tcp_connect: connection.tcp_connect,
                tls_handshake: connection.tls_handshake,
                server_processing,
                content_transfer,
            },
            error: None,
        })
    }
}

#[async_trait]
impl EdgeProber for ProbeExecutor {
    async fn probe(&self, edge: Edge) -> ProbeResult {
        match self.try_probe(edge).await {
            Ok(result) => result,
            Err(e) => ProbeResult::failed(e),
        }
    }
}

/// `content-type` -> `Content-Type`
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
