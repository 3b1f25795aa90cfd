// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

//! HTTP ingest uplink — POSTs measurements to the ingestion endpoint.

use tokio::sync::mpsc;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use mlink_core::Measurement;

/// Run the ingest uplink task.
///
/// Receives measurements from the serial bridge and POSTs each one as JSON
/// to the configured endpoint. Pass/fail only: rejected and failed posts
/// are counted and logged, never retried. Exits when the channel closes.
pub async fn run_ingest_uplink(url: String, mut rx: mpsc::Receiver<Measurement>) {
    let client = reqwest::Client::new();
    info!("Ingest uplink active ({})", url);

    let mut stats_received: u64 = 0;
    let mut stats_sent: u64 = 0;
    let mut stats_rejected: u64 = 0;
    let mut stats_send_err: u64 = 0;
    let mut stats_tick = time::interval(Duration::from_secs(60));

    loop {
        tokio::select! {
            _ = stats_tick.tick() => {
                info!(
                    "Ingest stats: received={}, sent={}, rejected={}, send_errors={}",
                    stats_received, stats_sent, stats_rejected, stats_send_err
                );
            }
            recv = rx.recv() => {
                let measurement = match recv {
                    Some(m) => m,
                    None => break,
                };
                stats_received += 1;

                match client.post(&url).json(&measurement).send().await {
                    Ok(resp) if resp.status().is_success() => {
                        stats_sent += 1;
                        debug!("Measurement for device {} accepted", measurement.device_id);
                    }
                    Ok(resp) => {
                        stats_rejected += 1;
                        warn!(
                            "Ingest endpoint rejected measurement for device {}: HTTP {}",
                            measurement.device_id,
                            resp.status()
                        );
                    }
                    Err(e) => {
                        stats_send_err += 1;
                        warn!("Ingest POST failed: {}", e);
                    }
                }
            }
        }
    }

    info!(
        "Ingest uplink stopped (received={}, sent={}, rejected={}, send_errors={})",
        stats_received, stats_sent, stats_rejected, stats_send_err
    );
}
