use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use url::Host;

use crate::summary::{RunSummary, Termination};

/// Rates derived from the final counters of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub rps: f64,
    pub time_per_request: Duration,
    pub transfer_rate: f64,
}

impl Throughput {
    /// Zero elapsed time or zero responses yield zero rates.
    pub fn compute(completed: u64, responded: u64, transferred: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let per_sec = |count: u64| if secs > 0.0 { count as f64 / secs } else { 0.0 };
        let time_per_request = match u32::try_from(responded) {
            Ok(0) => Duration::ZERO,
            Ok(n) => elapsed / n,
            Err(_) => Duration::from_secs_f64(secs / responded as f64),
        };
        Self {
            rps: per_sec(completed),
            time_per_request,
            transfer_rate: per_sec(transferred),
        }
    }
}

/// Final, serializable outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchReport {
    pub hostname: String,
    pub port: Option<u16>,
    pub document_path: String,
    pub document_length: usize,
    pub concurrency_level: u64,
    #[serde(rename = "timeTakenSecs")]
    pub time_taken_secs: f64,
    pub completed_requests: u64,
    pub failed_requests: u64,
    pub total_transferred: u64,
    pub rps: f64,
    #[serde(rename = "timePerRequestMs")]
    pub time_per_request_ms: f64,
    pub transfer_rate: f64,
    pub requested: u64,
    pub responded: u64,
    /// `None` for a summary that has not been finished yet.
    pub termination: Option<Termination>,
}

impl From<&RunSummary> for BenchReport {
    fn from(summary: &RunSummary) -> Self {
        let elapsed = summary.elapsed();
        let throughput = Throughput::compute(
            summary.completed,
            summary.responded,
            summary.total_transferred,
            elapsed,
        );
        let document_path = summary.document_path.clone();

        Self {
            hostname: hostname(&summary.target),
            port: summary.target.port_or_known_default(),
            document_length: document_path.len(),
            document_path,
            concurrency_level: summary.concurrency,
            time_taken_secs: elapsed.as_secs_f64(),
            completed_requests: summary.completed,
            failed_requests: summary.failed,
            total_transferred: summary.total_transferred,
            rps: throughput.rps,
            time_per_request_ms: throughput.time_per_request.as_secs_f64() * 1000.0,
            transfer_rate: throughput.transfer_rate,
            requested: summary.requested,
            responded: summary.responded,
            termination: summary.termination,
        }
    }
}

/// Host without the brackets of an IPv6 literal; empty when there is none.
fn hostname(url: &Url) -> String {
    match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    }
}

impl BenchReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let port = self
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let termination = match self.termination {
            Some(Termination::Completed) => "completed",
            Some(Termination::TimeLimit) => "time limit reached",
            None => "still running",
        };
        writeln!(f, "Server Hostname:        {}", self.hostname)?;
        writeln!(f, "Server Port:            {port}")?;
        writeln!(f, "Document Path:          {}", self.document_path)?;
        writeln!(f, "Document Length:        {}", self.document_length)?;
        writeln!(f)?;
        writeln!(f, "Concurrency Level:      {}", self.concurrency_level)?;
        writeln!(f, "Time taken for tests:   {:.3} seconds", self.time_taken_secs)?;
        writeln!(f, "Requested:              {}", self.requested)?;
        writeln!(f, "Responded:              {}", self.responded)?;
        writeln!(f, "Complete requests:      {}", self.completed_requests)?;
        writeln!(f, "Failed requests:        {}", self.failed_requests)?;
        writeln!(f, "Total transferred:      {} bytes", self.total_transferred)?;
        writeln!(f, "Requests per second:    {:.2} [#/sec]", self.rps)?;
        writeln!(f, "Time per request:       {:.3} [ms]", self.time_per_request_ms)?;
        writeln!(f, "Transfer rate:          {:.2} [bytes/sec]", self.transfer_rate)?;
        write!(f, "Run ended:              {termination}")
    }
}
