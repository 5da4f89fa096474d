use thiserror::Error;

/// Rejected invocation. Raised before any request is dispatched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid target url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported url scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: i64 },

    #[error("requests ({requests}) must not be lower than concurrency ({concurrency})")]
    RequestsBelowConcurrency { requests: u64, concurrency: u64 },

    #[error("concurrency must be at least 1 when requests are issued")]
    ZeroConcurrency,

    #[error("per-request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("time limit must be a positive number of seconds, got {0}")]
    InvalidTimeLimit(f64),

    #[error("unable to build http client: {0}")]
    Client(#[source] reqwest::Error),
}
