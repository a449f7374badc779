use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "https://rubiks-cube-solver.onrender.com/solve",
    "https://www.speedcubing.ch/api/solve",
];
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENDPOINTS_VAR: &str = "CUBE_SOLVER_ENDPOINTS";
pub const TIMEOUT_VAR: &str = "CUBE_SOLVER_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CUBE_SOLVER_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
    #[error("no solver endpoints configured")]
    NoEndpoints,
}

/// Endpoints in priority order and the per-request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub endpoints: Vec<String>,
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SolverConfig {
    /// Reads `CUBE_SOLVER_ENDPOINTS` (comma separated) and
    /// `CUBE_SOLVER_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(env::var(ENDPOINTS_VAR).ok(), env::var(TIMEOUT_VAR).ok())
    }

    pub fn from_values(endpoints: Option<String>, timeout_secs: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(list) = endpoints {
            config.endpoints = parse_endpoints(&list);
            if config.endpoints.is_empty() {
                return Err(ConfigError::NoEndpoints);
            }
        }

        if let Some(raw) = timeout_secs {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        if !endpoints.is_empty() {
            self.endpoints = endpoints;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_endpoints(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs > 0.0 => {
            Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))
        }
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
