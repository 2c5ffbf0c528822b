//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        let path = Path::new(".env");
        if path.exists() {
            Self::load_env_from(path)?;
            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Load variables from a specific file; variables already set win
    pub fn load_env_from(path: &Path) -> Result<()> {
        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Example `.env` content listing every supported variable
    pub fn create_example_env_content() -> String {
        let mut content = String::from(
            "# edgestat configuration\n\
             #\n\
             # Values here are defaults; command-line flags override them.\n\n",
        );
        for (var, description, example) in Self::get_supported_env_vars() {
            content.push_str(&format!("# {}\n# {}={}\n\n", description, var, example));
        }
        content
    }

    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;
        Ok(())
    }

    /// Check a variable's format before it is merged
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "EDGESTAT_TARGET" => {
                if value.trim().contains(char::is_whitespace) {
                    return Err(AppError::config(format!("Invalid EDGESTAT_TARGET value '{}'", value)));
                }
            }
            "EDGESTAT_PORT" => {
                let port: u16 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid EDGESTAT_PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("EDGESTAT_PORT must be between 1 and 65535"));
                }
            }
            "EDGESTAT_THREADS" => {
                let threads: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid EDGESTAT_THREADS value '{}': {}", value, e)))?;
                if threads == 0 || threads > crate::defaults::MAX_THREADS {
                    return Err(AppError::config(format!(
                        "EDGESTAT_THREADS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_THREADS,
                        threads
                    )));
                }
            }
            "EDGESTAT_REFRESH_MS" => {
                let refresh: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid EDGESTAT_REFRESH_MS value '{}': {}", value, e)))?;
                if refresh == 0 {
                    return Err(AppError::config("EDGESTAT_REFRESH_MS must be greater than 0"));
                }
            }
            "EDGESTAT_INSECURE" | "EDGESTAT_ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("EDGESTAT_TARGET", "Domain whose A records are probed", "origin.example.com"),
            ("EDGESTAT_PORT", "Port dialed on every edge (1-65535)", "8080"),
            ("EDGESTAT_THREADS", "Concurrent tasks in attack mode (1-1024)", "4"),
            ("EDGESTAT_INSECURE", "Skip certificate verification on HTTPS edges", "false"),
            ("EDGESTAT_ENABLE_COLOR", "Enable colored output", "true"),
            ("EDGESTAT_REFRESH_MS", "Dashboard pause after each probe in milliseconds", "500"),
        ]
    }

    pub fn display_env_help() -> String {
        let mut help = String::from("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Problems with the variables currently set, one message each
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var, _, _)| {
                let value = std::env::var(var).ok()?;
                Self::validate_env_var(var, &value).err().map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
