use reqwest::Client;
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use crate::config::BenchConfig;
use crate::fetch::{spawn_fetch, ResultRecord};
use crate::summary::{RunSummary, Termination};

fn launch(
    summary: &mut RunSummary,
    config: &BenchConfig,
    client: &Client,
    results: &mpsc::UnboundedSender<ResultRecord>,
) {
    summary.record_launch();
    tracing::debug!(requested = summary.requested, "launching fetch");
    spawn_fetch(client.clone(), config.url.clone(), results.clone());
}

/// Launches the initial `config.concurrency` attempts.
fn fill_window(
    summary: &mut RunSummary,
    config: &BenchConfig,
    client: &Client,
    results: &mpsc::UnboundedSender<ResultRecord>,
) {
    while summary.requested < config.concurrency && summary.wants_more() {
        launch(summary, config, client, results);
    }
}

/// Drives `config.requests` fetch attempts through a window of at most
/// `config.concurrency` in-flight requests.
///
/// Each completed attempt frees one slot which is refilled immediately while
/// the request target has not been reached. The run stops once every
/// attempt has responded or the time limit has passed, whichever comes
/// first. Attempts still in flight at the time limit are abandoned.
///
/// `config` must have passed [`BenchConfig::validate`].
pub async fn run(config: &BenchConfig, client: &Client) -> RunSummary {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut summary = RunSummary::new(config);

    tracing::info!(
        url = %config.url,
        requests = config.requests,
        concurrency = config.concurrency,
        "starting benchmark"
    );

    fill_window(&mut summary, config, client, &tx);

    let deadline = summary
        .started
        .checked_add(config.time_limit)
        .map(Instant::from_std);

    let termination = loop {
        if summary.is_done() {
            break Termination::Completed;
        }

        let next = match deadline {
            Some(deadline) => match timeout_at(deadline, rx.recv()).await {
                Ok(next) => next,
                Err(_) => break Termination::TimeLimit,
            },
            None => rx.recv().await,
        };
        // `tx` lives as long as this loop, the channel cannot close under us
        let Some(record) = next else {
            break Termination::Completed;
        };

        if summary.wants_more() {
            launch(&mut summary, config, client, &tx);
        }
        summary.consume(&record);
        tracing::debug!(
            status = record.status,
            bytes = record.bytes,
            duration = ?record.duration,
            responded = summary.responded,
            "fetch finished"
        );

        if summary.elapsed() > config.time_limit {
            break Termination::TimeLimit;
        }
    };

    summary.finish(termination);
    match termination {
        Termination::TimeLimit => tracing::warn!(
            responded = summary.responded,
            in_flight = summary.in_flight(),
            "time limit reached, abandoning outstanding requests"
        ),
        Termination::Completed => tracing::info!(
            responded = summary.responded,
            elapsed = ?summary.elapsed(),
            "benchmark finished"
        ),
    }
    summary
}
