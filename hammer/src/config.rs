use std::time::Duration;

use reqwest::{Client, Url};
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

/// Everything a run needs, fixed for its whole lifetime.
///
/// Built once at startup and handed to the dispatch loop by reference.
/// Call [`BenchConfig::validate`] before running; the loop assumes a
/// validated configuration.
#[derive(Debug, Clone, TypedBuilder)]
pub struct BenchConfig {
    pub url: Url,

    #[builder(default = 1)]
    pub requests: u64,

    #[builder(default = 1)]
    pub concurrency: u64,

    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,

    #[builder(default = DEFAULT_TIME_LIMIT)]
    pub time_limit: Duration,

    /// The target as the user typed it, reported instead of the normalized `url`.
    #[builder(default, setter(strip_option, into))]
    pub target: Option<String>,
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests < self.concurrency {
            return Err(ConfigError::RequestsBelowConcurrency {
                requests: self.requests,
                concurrency: self.concurrency,
            });
        }
        if self.concurrency == 0 && self.requests > 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.time_limit.is_zero() {
            return Err(ConfigError::InvalidTimeLimit(0.0));
        }
        Ok(())
    }

    pub fn document_path(&self) -> String {
        self.target.clone().unwrap_or_else(|| self.url.to_string())
    }

    /// Client shared by every fetch worker of the run.
    pub fn build_client(&self) -> Result<Client, ConfigError> {
        Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(ConfigError::Client)
    }
}

/// Parses the benchmark target. Only absolute http(s) urls are accepted.
pub fn parse_target(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
}

/// Converts a user supplied number of seconds into a time limit.
pub fn parse_time_limit(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidTimeLimit(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeLimit(secs))
}
