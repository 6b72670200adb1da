/*
 *  main.rs
 *
 *  vestaglove - controller log display
 *	(c) 2026 vestaglove contributors
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::info;
use tokio::signal::unix::{signal, SignalKind};

use vestaglove::config;
use vestaglove::display::{drivers, FrameCanvas};
use vestaglove::logsink::LineLog;
use vestaglove::peer::HttpTransport;
use vestaglove::runloop::RunLoop;
use vestaglove::wifi::HostStation;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Waits for SIGINT, SIGTERM or SIGHUP and logs which one arrived.
async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let loaded = config::load().context("loading configuration")?;

    if loaded.dump_only {
        // effective config after overrides
        println!("{}", serde_yaml::to_string(&loaded.config)?);
        return Ok(());
    }
    let settings = loaded.settings;

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log_level.as_str()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);
    info!(
        "display {}x{} rotated {} via {:?}",
        settings.display.width, settings.display.height, settings.display.rotate_deg, settings.display.driver
    );

    let driver = drivers::create_from_config(&settings.display);
    let canvas = FrameCanvas::new(driver, settings.display.rotate_deg).context("initialising display")?;
    let sink = LineLog::with_retention(canvas, settings.text_layout(), settings.log_retention);

    let station = HostStation::new(settings.interface.clone());
    let transport = HttpTransport::new().context("building HTTP client")?;
    let mut run_loop = RunLoop::new(station, transport, sink, settings.run_settings());

    tokio::select! {
        res = signal_handler() => res?,
        _ = run_loop.run_forever() => {}
    }

    info!("Shutdown complete");
    Ok(())
}
