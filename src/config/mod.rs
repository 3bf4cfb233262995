//! Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for the task runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of concurrent workers
    pub worker_count: usize,

    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: 10,
            bind_addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Create a new configuration with a custom worker count
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Default::default()
        }
    }

    /// Load configuration from file, environment variables, or defaults
    pub fn load() -> crate::Result<Self> {
        if let Ok(config_path) = env::var("TASK_RUNNER_CONFIG") {
            info!("Loading config from TASK_RUNNER_CONFIG: {}", config_path);
            return Self::from_file(&config_path);
        }

        let default_paths = ["config.yaml", "config.toml"];
        for path in default_paths {
            if Path::new(path).exists() {
                info!("Loading config from: {}", path);
                return Self::from_file(path);
            }
        }

        if let Ok(config) = Self::from_env() {
            info!("Loaded config from environment variables");
            return Ok(config);
        }

        warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| {
                crate::TaskRunnerError::Config(format!("Failed to load config file: {}", e))
            })?;

        let config: Config = settings.try_deserialize().map_err(|e| {
            crate::TaskRunnerError::Config(format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();
        let mut found_any = false;

        if let Ok(val) = env::var("TASK_RUNNER_WORKER_COUNT") {
            config.worker_count = val.parse().map_err(|e| {
                crate::TaskRunnerError::Config(format!("Invalid WORKER_COUNT: {}", e))
            })?;
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_BIND_ADDR") {
            config.bind_addr = val;
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_SHUTDOWN_TIMEOUT_SECS") {
            config.shutdown_timeout_secs = val.parse().map_err(|e| {
                crate::TaskRunnerError::Config(format!("Invalid SHUTDOWN_TIMEOUT_SECS: {}", e))
            })?;
            found_any = true;
        }

        if !found_any {
            return Err(crate::TaskRunnerError::Config(
                "No environment variables found".to_string(),
            ));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.worker_count == 0 {
            return Err(crate::TaskRunnerError::Config(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(crate::TaskRunnerError::Config(format!(
                "Invalid bind address: {}",
                self.bind_addr
            )));
        }

        if self.shutdown_timeout_secs == 0 {
            return Err(crate::TaskRunnerError::Config(
                "Shutdown timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
