// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Standalone Eltako device discovery tool.
//!
//! Listens on the FAM14 serial bus, records every device and sensor it
//! hears, and writes the generated configuration file when the operator
//! presses Ctrl+C. Trigger your sensors (press the switches, open the
//! windows) while the tool runs so their telegrams can be recorded.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use eltakor_lib::bus::{open_serial, DEFAULT_BAUD};
use eltakor_lib::{write_config, Address, DiscoveryAccumulator};

/// Listens on the Eltako bus and generates a device configuration file.
#[derive(Parser, Debug)]
#[command(name = "eltako-discovery")]
#[command(about = "Discovers Eltako bus devices and writes a configuration file")]
#[command(version)]
struct Args {
    /// Serial port of the FAM14 bus gateway.
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    serial_path: String,

    /// Path of the generated configuration file.
    #[arg(short, long, default_value = "discovered_eltako.yml")]
    output: PathBuf,

    /// Base address from which actuator sender addresses are derived.
    #[arg(long, default_value = "00-00-B0-00")]
    sender_base: Address,

    /// Serial baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    baud: u32,

    /// Enable debug logging (RUST_LOG overrides this).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> eltakor_lib::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!(
        serial_path = %args.serial_path,
        sender_base = %args.sender_base,
        "Starting Eltako device discovery"
    );

    let mut reader = open_serial(&args.serial_path, args.baud)?;
    let mut acc = DiscoveryAccumulator::new(args.sender_base);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, finishing discovery");
                break;
            }
            message = reader.next_message() => match message {
                Ok(Some(message)) => acc.add_sensor(&message),
                Ok(None) => {
                    warn!("Bus stream ended");
                    break;
                }
                Err(err) => {
                    error!(%err, "Bus read failed");
                    break;
                }
            }
        }
    }

    write_config(&acc, &args.output)?;
    info!(
        records = acc.record_count(),
        path = %args.output.display(),
        "Discovery finished"
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
