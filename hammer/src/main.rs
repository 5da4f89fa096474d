use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use hammer::{parse_target, parse_time_limit, BenchConfig, BenchReport, ConfigError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser)]
#[command(name = "hammer", version)]
#[command(about = "Issue a fixed number of GET requests against a url and report the results")]
struct Args {
    /// Number of requests to perform
    #[arg(short = 'n', default_value_t = 1, allow_negative_numbers = true)]
    requests: i64,

    /// Number of requests to keep in flight at a time
    #[arg(short = 'c', default_value_t = 1, allow_negative_numbers = true)]
    concurrency: i64,

    /// Seconds to wait at most for each response
    #[arg(short = 't', value_name = "SECONDS", default_value_t = 3)]
    timeout: u64,

    /// Maximum number of seconds to spend benchmarking
    #[arg(short = 'l', value_name = "SECONDS", default_value_t = 10.)]
    time_limit: f64,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log every request to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Target url
    url: String,
}

impl Args {
    fn config(&self) -> Result<BenchConfig, ConfigError> {
        let requests = non_negative("requests", self.requests)?;
        let concurrency = non_negative("concurrency", self.concurrency)?;
        let config = BenchConfig::builder()
            .url(parse_target(&self.url)?)
            .target(self.url.clone())
            .requests(requests)
            .concurrency(concurrency)
            .request_timeout(Duration::from_secs(self.timeout))
            .time_limit(parse_time_limit(self.time_limit)?)
            .build();
        config.validate()?;
        Ok(config)
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::Negative { name, value })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,hammer=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.config() {
        Ok(config) => config,
        Err(err) => Args::command().error(ErrorKind::ValueValidation, err).exit(),
    };
    let client = config.build_client()?;

    let summary = hammer::dispatch::run(&config, &client).await;
    let report = BenchReport::from(&summary);

    match args.format {
        Format::Json => println!("{}", report.to_json()?),
        Format::Text => println!("{report}"),
    }
    Ok(())
}
