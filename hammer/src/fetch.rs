use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use tokio::sync::mpsc::UnboundedSender;

/// The only status counted as a successful response.
pub const SUCCESS_STATUS: u16 = 200;

/// Reserved status reported when the transport failed or timed out.
pub const TIMEOUT_STATUS: u16 = 408;

/// Outcome of a single fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRecord {
    pub status: u16,
    pub bytes: u64,
    pub duration: Duration,
}

impl ResultRecord {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Performs one GET against `url` and drains the body.
///
/// Never fails: transport errors and timeouts come back as a record carrying
/// [`TIMEOUT_STATUS`] and zero bytes. The duration covers the whole body
/// transfer, not just the response head.
pub async fn fetch(client: &Client, url: Url) -> ResultRecord {
    let start = Instant::now();

    let mut response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!("request failed: {err}");
            return ResultRecord {
                status: TIMEOUT_STATUS,
                bytes: 0,
                duration: start.elapsed(),
            };
        }
    };

    let status = response.status().as_u16();
    let mut bytes = 0u64;
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => bytes += chunk.len() as u64,
            Ok(None) => break,
            // keep what made it through, the status is already known
            Err(err) => {
                tracing::debug!("body read aborted after {bytes} bytes: {err}");
                break;
            }
        }
    }

    ResultRecord {
        status,
        bytes,
        duration: start.elapsed(),
    }
}

/// Runs [`fetch`] as a detached task that reports into `results`.
///
/// The receiving side may already be gone when the attempt finishes (time
/// limit reached); the record is then dropped.
pub fn spawn_fetch(client: Client, url: Url, results: UnboundedSender<ResultRecord>) {
    tokio::spawn(async move {
        let record = fetch(&client, url).await;
        let _ = results.send(record);
    });
}
