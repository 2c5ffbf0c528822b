//! Edge set resolution
//!
//! Turns a domain into the ordered list of IPv4 edges answering for it,
//! using the operating system's resolver configuration.

use crate::{
    error::{AppError, ErrorContext, Result},
    types::Edge,
};
use std::net::Ipv4Addr;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    system_conf,
    TokioAsyncResolver,
};

/// Resolves a domain to its IPv4 edges
pub struct EdgeResolver {
    resolver: TokioAsyncResolver,
}

impl EdgeResolver {
    /// Build a resolver from the system configuration
    ///
    /// Falls back to the library defaults when the system configuration
    /// cannot be read.
    pub fn from_system() -> Self {
        let (config, opts) = system_conf::read_system_conf()
            .unwrap_or_else(|_| (ResolverConfig::default(), ResolverOpts::default()));
        Self::with_config(config, opts)
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Ordered, deduplicated IPv4 edges for `domain`
    ///
    /// An IPv4 literal resolves to itself. No retries happen here; an empty
    /// answer is an error because nothing can be probed without an edge.
    pub async fn resolve(&self, domain: &str) -> Result<Vec<Edge>> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(AppError::resolution("empty domain name"));
        }

        if let Ok(addr) = domain.parse::<Ipv4Addr>() {
            return Ok(vec![Edge::new(addr)]);
        }

        let lookup = self
            .resolver
            .ipv4_lookup(domain)
            .await
            .with_context(|| domain.to_string())?;

        let edges = dedup_edges(lookup.iter().map(|a| a.0));
        if edges.is_empty() {
            return Err(AppError::resolution(format!("{} has no IPv4 addresses", domain)));
        }

        Ok(edges)
    }
}

/// Keep the first occurrence of every address, preserving order
pub fn dedup_edges<I>(addrs: I) -> Vec<Edge>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    let mut edges: Vec<Edge> = Vec::new();
    for addr in addrs {
        let edge = Edge::new(addr);
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }
    edges
}
