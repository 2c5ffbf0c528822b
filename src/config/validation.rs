//! Soft configuration checks
//!
//! Hard errors live in [`Config::validate`]; the checks here only produce
//! warnings that are printed before a run starts.

use crate::{error::Result, models::Config, types::Protocol};
use colored::*;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Hard validation followed by every soft check
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_tls(config));
        warnings.extend(Self::validate_modes(config));
        warnings.extend(Self::validate_target(config)?);
        warnings.extend(Self::validate_concurrency(config, num_cpus::get()));
        Ok(warnings)
    }

    fn validate_tls(config: &Config) -> Vec<ValidationWarning> {
        if config.insecure {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "Certificate verification is disabled; edges serving invalid certificates will not be detected".to_string(),
            )]
        } else {
            Vec::new()
        }
    }

    fn validate_modes(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.dashboard && config.attack_mode {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Both --dashboard and --attack given; the dashboard takes precedence".to_string(),
            ));
        }

        if config.sweeps > 0 && !config.attack_mode {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("--count {} only applies to attack mode", config.sweeps),
            ));
        }

        warnings
    }

    fn validate_target(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        if config.url.is_none() {
            return Ok(warnings);
        }

        let target = config.to_target()?;
        if target.port != target.protocol.default_port() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Dialing edges on non-standard port {} for {}",
                    target.port, target.protocol
                ),
            ));
        }

        if target.protocol == Protocol::Http && config.insecure {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "--insecure has no effect on plain HTTP".to_string(),
            ));
        }

        if target.resolve_target != target.domain {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Requesting {} from the edges of {}",
                    target.domain, target.resolve_target
                ),
            ));
        }

        Ok(warnings)
    }

    fn validate_concurrency(config: &Config, cpus: usize) -> Vec<ValidationWarning> {
        let limit = (cpus as u32).saturating_mul(4);
        if config.attack_mode && config.threads > limit {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} attack tasks on {} CPUs; local scheduling may skew latency",
                    config.threads, cpus
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }

    fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Run every check and return the warnings
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
