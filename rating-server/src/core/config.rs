use std::path::PathBuf;

use crate::rollup::MULTI_YEAR_HORIZONS;

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/rating-server | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | ROLLUP_LOG_INTERVAL_SECS | 900 | Interval of the periodic rollup monitor |
/// | MULTI_YEAR_HORIZON | 4 | Default yearly-report horizon (4, 6 or 20 years) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/rating HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Interval (seconds) between periodic rollup monitor passes
    pub rollup_log_interval_secs: u64,
    /// Default horizon (years) for the multi-year rollup report
    pub multi_year_horizon: u32,
}

impl Config {
    /// Load the configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults above.
    pub fn from_env() -> Self {
        let horizon: u32 = std::env::var("MULTI_YEAR_HORIZON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4);
        let multi_year_horizon = if MULTI_YEAR_HORIZONS.contains(&horizon) {
            horizon
        } else {
            tracing::warn!(
                horizon,
                "MULTI_YEAR_HORIZON must be one of {:?}, falling back to 4",
                MULTI_YEAR_HORIZONS
            );
            4
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/rating-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            rollup_log_interval_secs: std::env::var("ROLLUP_LOG_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(900),
            multi_year_horizon,
        }
    }

    /// Override work dir and port on top of the environment.
    ///
    /// Mainly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rolling log files
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if it does not exist yet.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
