//! Main application orchestration and execution

use crate::{
    cli::{Cli, Command},
    config::{display_config_summary, load_config, validate_config, EnvManager},
    dashboard::{terminal::TerminalSurface, DashboardLoop, DashboardState},
    dns::EdgeResolver,
    error::Result,
    executor::BurstExecutor,
    logging::{LoggerFactory, ProbeLogger},
    models::{Config, Target},
    output::ConsoleRenderer,
    probe::{EdgeProber, ProbeExecutor},
    types::Edge,
};
use std::{path::Path, sync::Arc};

/// How a `request` run drives the prober
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Single,
    Dashboard,
    Attack,
}

impl RunMode {
    /// The dashboard wins when both it and attack mode are requested
    pub fn for_config(config: &Config) -> Self {
        if config.dashboard {
            Self::Dashboard
        } else if config.attack_mode {
            Self::Attack
        } else {
            Self::Single
        }
    }
}

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    pub async fn run(self) -> Result<()> {
        // Reports broken variables instead of failing on them
        if let Command::Env(args) = &self.cli.command {
            return show_env(args.write_example.as_deref());
        }

        let config = load_config(self.cli.clone())?;

        if config.debug {
            println!("{} v{}", crate::PKG_NAME, crate::VERSION);
            println!("\nConfiguration Summary:");
            println!("{}\n", display_config_summary(&config));
        }

        let factory = LoggerFactory::new(config.clone());
        let probe_logger = factory.create_probe_logger().await;
        let resolver = EdgeResolver::from_system();

        match &self.cli.command {
            Command::Env(_) => Ok(()),
            Command::Edges(args) => {
                let edges = resolver.resolve(&args.domain).await?;
                probe_logger.log_resolution(&args.domain, &edges).await;
                for edge in &edges {
                    println!("{}", edge);
                }
                Ok(())
            }
            Command::Request(_) => {
                let warnings = validate_config(&config)?;
                if !warnings.is_empty() && !config.dashboard {
                    for warning in &warnings {
                        eprintln!("{}", warning.format(config.enable_color));
                    }
                }

                let target = config.to_target()?;
                probe_logger.logger().add_context_field("target", &target.domain).await;
                let edges = resolver.resolve(&target.resolve_target).await?;
                probe_logger.log_resolution(&target.resolve_target, &edges).await;

                let prober = ProbeExecutor::new(target.clone(), config.req_options(), config.insecure)?;
                match RunMode::for_config(&config) {
                    RunMode::Single => run_single(&prober, &target, &edges, &config, &probe_logger).await,
                    RunMode::Dashboard => run_dashboard(prober, &target, edges, &config).await,
                    RunMode::Attack => run_attack(prober, edges, &config, &probe_logger).await,
                }
            }
        }
    }
}

fn show_env(write_example: Option<&Path>) -> Result<()> {
    print!("{}", EnvManager::display_env_help());
    for problem in EnvManager::validate_current_env() {
        eprintln!("{}", problem);
    }
    if let Some(path) = write_example {
        EnvManager::save_example_env_file(path)?;
        println!("\nWrote example configuration to {}", path.display());
    }
    Ok(())
}

/// Probe every edge once and print the trace; the first failure ends the run
async fn run_single(
    prober: &ProbeExecutor,
    target: &Target,
    edges: &[Edge],
    config: &Config,
    logger: &ProbeLogger,
) -> Result<()> {
    let renderer = ConsoleRenderer::new(config.enable_color);

    for &edge in edges {
        let result = match prober.probe(edge).await.into_result() {
            Ok(result) => result,
            Err(error) => {
                logger.log_probe_failure(edge, &error).await;
                return Err(error);
            }
        };
        logger.log_probe(edge, &result).await;
        print!("{}", renderer.trace(target, edge, &result));
    }

    Ok(())
}

async fn run_dashboard(prober: ProbeExecutor, target: &Target, edges: Vec<Edge>, config: &Config) -> Result<()> {
    // The surface restores the terminal when dropped, so it must be gone
    // before any error reaches stderr.
    let outcome = {
        let surface = TerminalSurface::init(&target.resolve_target, edges.clone())?;
        let mut dashboard = DashboardLoop::new(prober, surface, edges).with_refresh(config.refresh_interval());
        dashboard.run().await
    };

    if outcome? == DashboardState::Terminated {
        println!("Dashboard closed");
    }
    Ok(())
}

async fn run_attack(prober: ProbeExecutor, edges: Vec<Edge>, config: &Config, logger: &ProbeLogger) -> Result<()> {
    let max_sweeps = (config.sweeps > 0).then_some(config.sweeps);
    let summary = BurstExecutor::new(Arc::new(prober), edges)
        .with_threads(config.threads)
        .with_max_sweeps(max_sweeps)
        .with_color(config.enable_color)
        .run()
        .await?;

    println!();
    logger
        .log_burst_summary(summary.requests, summary.failures, summary.elapsed)
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_selection() {
        let mut config = Config::default();
        assert_eq!(RunMode::for_config(&config), RunMode::Single);

        config.attack_mode = true;
        assert_eq!(RunMode::for_config(&config), RunMode::Attack);

        config.dashboard = true;
        assert_eq!(RunMode::for_config(&config), RunMode::Dashboard);
    }
}
