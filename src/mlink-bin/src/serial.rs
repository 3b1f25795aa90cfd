// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Serial read loop: one buffer read per frame, decode, map, hand off.

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use mlink_core::{decode_frame, to_measurement, DynResult, Measurement, HEADER_SIZE};

/// Resolved serial transport settings (config merged with CLI overrides).
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub path: String,
    pub baud: u32,
    pub read_buffer_bytes: usize,
}

/// Enumerate the serial ports visible on this machine.
pub fn list_ports() -> DynResult<Vec<String>> {
    let ports = tokio_serial::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Refuse to start on a port the OS does not enumerate.
pub fn ensure_port_available(path: &str) -> DynResult<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        return Err("no serial ports found".into());
    }
    if !ports.iter().any(|p| p == path) {
        return Err(format!(
            "requested port '{}' is not available (found: {})",
            path,
            ports.join(", ")
        )
        .into());
    }
    Ok(())
}

/// Task that owns the serial port and feeds the uplink channel.
///
/// Each read is treated as one complete frame. Frames that fail to decode
/// or map are logged and dropped; the loop always moves on to the next
/// read. Transport errors end the task: losing the port is not something
/// the bridge can recover from.
pub async fn run_serial_bridge(
    settings: SerialSettings,
    tx: mpsc::Sender<Measurement>,
) -> DynResult<()> {
    info!(
        "Opening serial port {} @ {} baud",
        settings.path, settings.baud
    );
    let mut port = tokio_serial::new(&settings.path, settings.baud).open_native_async()?;

    let mut buf = vec![0u8; settings.read_buffer_bytes.max(HEADER_SIZE)];
    loop {
        let n = port.read(&mut buf).await?;
        if n == 0 {
            continue;
        }

        let frame = match decode_frame(&buf[..n]) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping unreadable frame ({} bytes): {}", n, e);
                continue;
            }
        };
        debug!(
            "Frame from device {} (seq {}, type {}, {} payload bytes)",
            frame.source_id,
            frame.sequence_id,
            frame.message_type,
            frame.payload.len()
        );

        let measurement = match to_measurement(&frame) {
            Ok(measurement) => measurement,
            Err(e) => {
                warn!("Dropping frame from device {}: {}", frame.source_id, e);
                continue;
            }
        };

        if tx.send(measurement).await.is_err() {
            // Uplink is gone; nothing left to feed.
            break;
        }
    }

    Ok(())
}
