mod adb;
mod core;
mod stress;
mod ui;
use crate::adb::device::pick_first;
use crate::adb::{AdbClient, Device, DeviceManager};
use crate::core::Config;
use crate::core::HarnessError;
use crate::stress::runner::{request_stop, LoopSettings};
use crate::stress::{CommandExecutor, CsvSink, CycleRunner, CycleSettings, StressRunner};
use crate::ui::ConsoleUi;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reboot-stress")]
#[command(about = "Reboot an attached Android device repeatedly and report boot reliability")]
struct Args {
    /// Number of reboot cycles to run
    #[arg(short, long)]
    cycles: Option<u32>,

    /// CSV file the results are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the adb executable
    #[arg(long)]
    adb: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ConsoleUi::write_banner();

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => fatal(&format!("{}", e)),
    };

    let client = match AdbClient::new(config.adb_path.as_deref()) {
        Ok(c) => c,
        Err(_) => fatal("adb was not found. Install Android Platform-Tools and make sure adb is on PATH."),
    };
    if client.ensure_present().await.is_err() {
        fatal("adb is present but `adb version` failed");
    }
    ConsoleUi::info(&format!("Using adb at {}", client.path().display()));
    if let Err(e) = client.start_server().await {
        fatal(&format!("Failed to start the adb server: {}", e));
    }

    let device = match select_device(&client).await {
        Ok(d) => d,
        Err(HarnessError::NoDevices) => {
            fatal("No connected device found. Connect a device and enable USB debugging.")
        }
        Err(e) => fatal(&format!("adb call failed: {}", e)),
    };
    ConsoleUi::info(&format!("Using device: {} ({})", device.display_name(), device.serial));

    let executor = CommandExecutor::new(client, device.serial.clone());
    let cycles = CycleRunner::new(executor, CycleSettings::from_config(&config));
    let sink = CsvSink::new(config.output.clone());
    let mut runner = StressRunner::new(cycles, sink, LoopSettings::from(&config));

    let stop = runner.stop_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if request_stop(&stop) {
                ConsoleUi::warn("Interrupt received, stopping after the current cycle");
            } else {
                ConsoleUi::warn(
                    "Still waiting for the current cycle to finish; results are saved when it ends",
                );
            }
        }
    });

    let outcome = runner.run().await;
    if !outcome.interrupted && !outcome.faulted {
        ConsoleUi::success(&format!(
            "Completed {} cycles, results saved {} times",
            outcome.completed, outcome.checkpoints
        ));
    }
    Ok(())
}

fn load_config(args: &Args) -> crate::core::Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(cycles) = args.cycles {
        config.cycles = cycles;
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(adb) = &args.adb {
        config.adb_path = Some(adb.clone());
    }
    config.validate()?;
    Ok(config)
}

/// First authorized device in adb's order.
async fn select_device(client: &AdbClient) -> crate::core::Result<Device> {
    let device_mgr = DeviceManager::new(client.clone());
    let mut devices = device_mgr.list_devices().await?;
    for device in devices.iter_mut() {
        device_mgr.describe(device).await;
    }
    if devices.len() > 1 {
        ConsoleUi::render_device_table(&devices);
        ConsoleUi::warn(&format!(
            "Multiple devices detected, using the first one: {}",
            devices[0].serial
        ));
    }
    pick_first(devices)
}

fn fatal(msg: &str) -> ! {
    ConsoleUi::error(msg);
    std::process::exit(1);
}
