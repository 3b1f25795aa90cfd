// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, Level};

use mlink_core::{DynResult, Measurement};

mod config;
mod serial;
mod uplink;

use crate::config::Config;
use crate::serial::SerialSettings;

const PKG_DESCRIPTION: &str = "Serial sensor to HTTP ingest bridge";

#[derive(Debug, Parser)]
#[command(version, about = PKG_DESCRIPTION)]
struct Cli {
    /// Serial port to read frames from (overrides the config file)
    #[arg(value_name = "PORT")]
    port: Option<String>,
    /// Baud rate (overrides the config file)
    #[arg(short = 'b', long = "baud")]
    baud: Option<u32>,
    /// Path to the config file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
    /// Full ingest URL (overrides the config file)
    #[arg(short = 'u', long = "url")]
    url: Option<String>,
    /// List available serial ports and exit
    #[arg(long = "list-ports")]
    list_ports: bool,
    /// Print an example config file and exit
    #[arg(long = "example-config")]
    example_config: bool,
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.example_config {
        print!("{}", Config::example_toml());
        return Ok(());
    }

    let (config, config_path) = match &cli.config {
        Some(path) => (Config::load_from_file(path)?, Some(path.clone())),
        None => Config::load_from_default_paths()?,
    };

    init_tracing(config.general.log_level.as_deref());
    if let Some(path) = &config_path {
        info!("Loaded config from {}", path.display());
    }

    if cli.list_ports {
        for port in serial::list_ports()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let path = cli
        .port
        .clone()
        .or_else(|| config.serial.port.clone())
        .ok_or("no serial port given (pass one on the command line or set [serial] port)")?;
    let settings = SerialSettings {
        path,
        baud: cli.baud.unwrap_or(config.serial.baud),
        read_buffer_bytes: config.serial.read_buffer_bytes,
    };
    let url = cli.url.clone().unwrap_or_else(|| config.ingest.endpoint_url());

    serial::ensure_port_available(&settings.path)?;
    info!(
        "Starting mlinkd (port: {} @ {} baud, ingest: {})",
        settings.path, settings.baud, url
    );

    // Channel between the serial bridge and the ingest uplink.
    let (tx, rx) = mpsc::channel::<Measurement>(32);
    let uplink_handle = tokio::spawn(uplink::run_ingest_uplink(url, rx));
    let mut bridge_handle = tokio::spawn(serial::run_serial_bridge(settings, tx));

    tokio::select! {
        res = &mut bridge_handle => {
            match res {
                Ok(Ok(())) => info!("Serial bridge stopped"),
                Ok(Err(e)) => error!("Serial bridge failed: {}", e),
                Err(e) => error!("Serial bridge task panicked: {}", e),
            }
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
            bridge_handle.abort();
        }
    }

    // The bridge side of the channel is gone; let the uplink drain what is
    // queued and log its final stats.
    let _ = uplink_handle.await;

    Ok(())
}

/// Initialize logging with optional level from config.
/// Falls back to INFO if level is None or invalid.
fn init_tracing(log_level: Option<&str>) {
    let level = log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();
}
