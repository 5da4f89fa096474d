use std::time::{Duration, Instant};

use reqwest::Url;
use serde::Serialize;

use crate::config::BenchConfig;
use crate::fetch::ResultRecord;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every requested attempt came back.
    Completed,
    /// The time limit elapsed first; outstanding attempts were abandoned.
    TimeLimit,
}

/// Running statistics of a benchmark.
///
/// Owned by the dispatch loop, which is the only place it is mutated.
/// `completed + failed == responded <= requested <= requests_target` holds
/// after every call.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub target: Url,
    pub document_path: String,
    pub concurrency: u64,
    pub requests_target: u64,
    pub requested: u64,
    pub responded: u64,
    pub completed: u64,
    pub failed: u64,
    pub total_transferred: u64,
    pub started: Instant,
    pub ended: Option<Instant>,
    pub termination: Option<Termination>,
}

impl RunSummary {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            target: config.url.clone(),
            document_path: config.document_path(),
            concurrency: config.concurrency,
            requests_target: config.requests,
            requested: 0,
            responded: 0,
            completed: 0,
            failed: 0,
            total_transferred: 0,
            started: Instant::now(),
            ended: None,
            termination: None,
        }
    }

    /// Whether another attempt may be launched.
    pub fn wants_more(&self) -> bool {
        self.requested < self.requests_target
    }

    pub fn record_launch(&mut self) {
        debug_assert!(self.wants_more());
        self.requested += 1;
    }

    pub fn consume(&mut self, record: &ResultRecord) {
        self.responded += 1;
        if record.is_success() {
            self.completed += 1;
        } else {
            self.failed += 1;
        }
        self.total_transferred += record.bytes;
    }

    /// Every launched attempt has responded and nothing is left to launch.
    pub fn is_done(&self) -> bool {
        self.responded == self.requested && self.requested == self.requests_target
    }

    pub fn in_flight(&self) -> u64 {
        self.requested - self.responded
    }

    /// Time since the start, frozen once the run has finished.
    pub fn elapsed(&self) -> Duration {
        match self.ended {
            Some(ended) => ended.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }

    /// Stamps the end of the run. Later calls keep the first stamp.
    pub fn finish(&mut self, termination: Termination) {
        if self.ended.is_none() {
            self.ended = Some(Instant::now());
            self.termination = Some(termination);
        }
    }
}
