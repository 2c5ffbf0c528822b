//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, Command, RequestArgs},
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Builds the run configuration: defaults, then `.env`, then the
/// environment, then command-line flags.
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config)?;

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        match &self.cli.command {
            Command::Request(args) => Self::apply_request_args(args, config),
            Command::Edges(args) => config.resolve_target = Some(args.domain.clone()),
            Command::Env(_) => {}
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color || !self.cli.use_colors() {
            config.enable_color = false;
        }

        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!("{}", display_config_summary(config));
        }

        Ok(())
    }

    fn apply_request_args(args: &RequestArgs, config: &mut Config) {
        config.url = Some(args.url.clone());

        if let Some(target) = &args.target {
            config.resolve_target = Some(target.clone());
        }
        if args.port.is_some() {
            config.port = args.port;
        }
        if let Some(threads) = args.threads {
            config.threads = threads;
        }
        if let Some(count) = args.count {
            config.sweeps = count;
        }
        if let Some(refresh) = args.refresh_ms {
            config.refresh_interval_ms = refresh;
        }

        config.host_header = args.host.clone().or(config.host_header.take());
        config.referer = args.referer.clone().or(config.referer.take());
        config.authorization = args.authorization.clone().or(config.authorization.take());

        // Flags only ever switch a mode on
        config.attack_mode |= args.attack;
        config.dashboard |= args.dashboard;
        config.insecure |= args.insecure;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mode = if config.dashboard {
        "dashboard"
    } else if config.attack_mode {
        "attack"
    } else {
        "single"
    };

    let mut summary = vec![
        format!("URL: {}", config.url.as_deref().unwrap_or("-")),
        format!("Resolve Target: {}", config.resolve_target.as_deref().unwrap_or("(URL host)")),
        format!(
            "Port: {}",
            config.port.map_or_else(|| "(protocol default)".to_string(), |p| p.to_string())
        ),
        format!("Mode: {}", mode),
        format!("Threads: {}", config.threads),
    ];

    if config.attack_mode {
        let sweeps = match config.sweeps {
            0 => "unlimited".to_string(),
            n => n.to_string(),
        };
        summary.push(format!("Sweeps: {}", sweeps));
    }

    summary.push(format!("Refresh: {}ms", config.refresh_interval_ms));
    summary.push(format!("Insecure TLS: {}", config.insecure));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
