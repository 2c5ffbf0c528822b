//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Probe every IPv4 edge behind a domain with requests pinned to that edge
#[derive(Parser, Debug, Clone)]
#[command(name = "edgestat")]
#[command(version, long_version = crate::LONG_VERSION, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Request a URL from each A record of the target domain
    Request(RequestArgs),

    /// List the IPv4 edges a domain resolves to
    Edges(EdgesArgs),

    /// Describe the EDGESTAT_* environment variables
    Env(EnvArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// URL to request, as http://host/path or https://host/path
    pub url: String,

    /// Domain whose A records are probed (defaults to the URL's host)
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Port to dial on every edge (defaults to 80 for http, 443 for https)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Concurrent tasks in attack mode
    #[arg(short = 'n', long = "thread")]
    pub threads: Option<u32>,

    /// Host header to send instead of the URL's host
    #[arg(short = 'H', long = "host")]
    pub host: Option<String>,

    /// Referer header to send
    #[arg(short, long)]
    pub referer: Option<String>,

    /// Authorization header to send
    #[arg(short = 'A', long)]
    pub authorization: Option<String>,

    /// Request the full object repeatedly from every edge
    #[arg(short, long)]
    pub attack: bool,

    /// Show the live dashboard
    #[arg(short, long)]
    pub dashboard: bool,

    /// Skip certificate verification on HTTPS edges
    #[arg(long)]
    pub insecure: bool,

    /// Sweeps per attack task (0 runs until interrupted)
    #[arg(short, long)]
    pub count: Option<u64>,

    /// Dashboard pause after each probe, in milliseconds
    #[arg(long, value_name = "MS")]
    pub refresh_ms: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct EdgesArgs {
    /// Domain to resolve
    pub domain: String,
}

#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// Write an example .env file to this path
    #[arg(long, value_name = "PATH")]
    pub write_example: Option<PathBuf>,
}

impl Cli {
    /// Check flag combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        match &self.command {
            Command::Request(args) => {
                if args.url.trim().is_empty() {
                    return Err("URL must not be empty".to_string());
                }
                if args.threads == Some(0) {
                    return Err("--thread must be at least 1".to_string());
                }
            }
            Command::Edges(args) => {
                if args.domain.trim().is_empty() {
                    return Err("Domain must not be empty".to_string());
                }
            }
            Command::Env(_) => {}
        }

        Ok(())
    }

    /// Whether output should be colored
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    pub fn request_args(&self) -> Option<&RequestArgs> {
        match &self.command {
            Command::Request(args) => Some(args),
            Command::Edges(_) | Command::Env(_) => None,
        }
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing_all_flags() {
        let cli = Cli::parse_from([
            "edgestat",
            "request",
            "https://www.example.com/logo.png",
            "-t", "edge.example.net",
            "-p", "8443",
            "-n", "8",
            "-H", "alt.example.com",
            "-r", "https://ref.example.com/",
            "-A", "Bearer token",
            "-a",
            "--insecure",
            "-c", "25",
            "--no-color",
        ]);

        let args = cli.request_args().unwrap();
        assert_eq!(args.url, "https://www.example.com/logo.png");
        assert_eq!(args.target.as_deref(), Some("edge.example.net"));
        assert_eq!(args.port, Some(8443));
        assert_eq!(args.threads, Some(8));
        assert_eq!(args.host.as_deref(), Some("alt.example.com"));
        assert_eq!(args.referer.as_deref(), Some("https://ref.example.com/"));
        assert_eq!(args.authorization.as_deref(), Some("Bearer token"));
        assert!(args.attack);
        assert!(!args.dashboard);
        assert!(args.insecure);
        assert_eq!(args.count, Some(25));
        assert!(cli.no_color);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_request_defaults() {
        let cli = Cli::parse_from(["edgestat", "request", "http://www.example.com/"]);
        let args = cli.request_args().unwrap();
        assert_eq!(args.port, None);
        assert_eq!(args.threads, None);
        assert!(!args.attack && !args.dashboard && !args.insecure);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_edges_subcommand() {
        let cli = Cli::parse_from(["edgestat", "edges", "www.example.com", "--verbose"]);
        assert!(cli.verbose);
        assert!(cli.request_args().is_none());
        match cli.command {
            Command::Edges(args) => assert_eq!(args.domain, "www.example.com"),
            _ => panic!("expected edges"),
        }
    }

    #[test]
    fn test_env_subcommand() {
        let cli = Cli::parse_from(["edgestat", "env", "--write-example", "/tmp/edgestat.env"]);
        match cli.command {
            Command::Env(args) => assert_eq!(args.write_example, Some(PathBuf::from("/tmp/edgestat.env"))),
            _ => panic!("expected env"),
        }
    }

    #[test]
    fn test_port_zero_rejected_by_parser() {
        assert!(Cli::try_parse_from(["edgestat", "request", "http://a.example.com/", "-p", "0"]).is_err());
    }

    #[test]
    fn test_validation() {
        let cli = Cli::parse_from(["edgestat", "--color", "--no-color", "edges", "a.example.com"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["edgestat", "request", "http://a.example.com/", "-n", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_color_flags() {
        let cli = Cli::parse_from(["edgestat", "--color", "edges", "a.example.com"]);
        assert!(cli.use_colors());
    }
}
