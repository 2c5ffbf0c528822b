//! Probe target and per-request options

use crate::error::{AppError, Result};
use crate::types::Protocol;
use serde::{Deserialize, Serialize};

/// What to request and which domain's edges to request it from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Logical host taken from the URL, used for Host and SNI
    pub domain: String,

    /// Domain whose A records supply the edges
    pub resolve_target: String,

    /// Path and query, always starting with '/'
    pub path: String,

    pub protocol: Protocol,

    pub port: u16,
}

impl Target {
    /// Parse a `protocol://host/path` argument
    ///
    /// `resolve_target` falls back to the URL's host and `port` to the URL's
    /// explicit port, then to the protocol default.
    pub fn parse(raw: &str, resolve_target: Option<&str>, port: Option<u16>) -> Result<Self> {
        let raw = raw.trim();
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| AppError::protocol(format!("'{}' is not of the form protocol://host/path", raw)))?;

        let protocol: Protocol = scheme.parse()?;
        if rest.is_empty() {
            return Err(AppError::protocol(format!("'{}' has no host", raw)));
        }

        let parsed = url::Url::parse(raw)?;
        let domain = match parsed.host() {
            Some(url::Host::Domain(d)) => d.to_string(),
            Some(url::Host::Ipv4(ip)) => ip.to_string(),
            Some(url::Host::Ipv6(_)) => {
                return Err(AppError::protocol("IPv6 hosts cannot be pinned to IPv4 edges"))
            }
            None => return Err(AppError::protocol(format!("'{}' has no host", raw))),
        };

        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        let resolve_target = resolve_target
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or_else(|| domain.clone());

        let port = port
            .or_else(|| parsed.port())
            .unwrap_or_else(|| protocol.default_port());

        Ok(Self {
            domain,
            resolve_target,
            path,
            protocol,
            port,
        })
    }

    /// `host` on the protocol's default port, `host:port` otherwise
    pub fn authority(&self) -> String {
        if self.port == self.protocol.default_port() {
            self.domain.clone()
        } else {
            format!("{}:{}", self.domain, self.port)
        }
    }

    /// Full logical URL of the request
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.authority(), self.path)
    }
}

/// Header overrides and mode flags applied to every probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReqOptions {
    /// Host header override
    pub host: Option<String>,
    pub referer: Option<String>,
    pub authorization: Option<String>,

    /// Burst mode drops the byte range to request the full object
    pub attack_mode: bool,

    /// Request only the first two bytes of the object
    pub byte_range: bool,
}

impl ReqOptions {
    /// Build options, treating blank overrides as absent
    pub fn new(
        host: Option<String>,
        referer: Option<String>,
        authorization: Option<String>,
        attack_mode: bool,
    ) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        Self {
            host: non_empty(host),
            referer: non_empty(referer),
            authorization: non_empty(authorization),
            attack_mode,
            byte_range: true,
        }
    }

    /// Range header value to send, if any
    pub fn range(&self) -> Option<&'static str> {
        if self.byte_range && !self.attack_mode {
            Some(crate::defaults::BYTE_RANGE)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_target() {
        let target = Target::parse("https://cdn.example.com/assets/app.js?v=3", None, None).unwrap();
        assert_eq!(target.domain, "cdn.example.com");
        assert_eq!(target.resolve_target, "cdn.example.com");
        assert_eq!(target.path, "/assets/app.js?v=3");
        assert_eq!(target.protocol, Protocol::Https);
        assert_eq!(target.port, 443);
        assert_eq!(target.url(), "https://cdn.example.com/assets/app.js?v=3");
    }

    #[test]
    fn test_parse_with_overrides() {
        let target = Target::parse("http://www.example.com", Some("origin.example.net"), Some(8080)).unwrap();
        assert_eq!(target.resolve_target, "origin.example.net");
        assert_eq!(target.port, 8080);
        assert_eq!(target.path, "/");
        assert_eq!(target.authority(), "www.example.com:8080");
    }

    #[test]
    fn test_blank_resolve_target_falls_back_to_host() {
        let target = Target::parse("http://a.example.com/x", Some("  "), None).unwrap();
        assert_eq!(target.resolve_target, "a.example.com");
    }

    #[test]
    fn test_url_port_used_when_no_flag() {
        let target = Target::parse("http://a.example.com:8081/x", None, None).unwrap();
        assert_eq!(target.port, 8081);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(Target::parse("ftp://example.com", None, None).unwrap_err().category(), "PROTOCOL");
        assert_eq!(Target::parse("example.com/path", None, None).unwrap_err().category(), "PROTOCOL");
        assert!(Target::parse("https://", None, None).is_err());
    }

    #[test]
    fn test_req_options_blank_headers_dropped() {
        let opts = ReqOptions::new(Some(" ".into()), Some("https://ref.example".into()), None, false);
        assert_eq!(opts.host, None);
        assert_eq!(opts.referer.as_deref(), Some("https://ref.example"));
        assert_eq!(opts.range(), Some("bytes=0-1"));
    }

    #[test]
    fn test_attack_mode_drops_range() {
        let opts = ReqOptions::new(None, None, None, true);
        assert_eq!(opts.range(), None);
    }
}
