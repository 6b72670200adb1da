/*
 *  runloop.rs
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
//! Top-level supervisor: connect, discover, fetch mode, run it, idle, repeat.

use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

use log::{debug, info, warn};

use crate::constants::{GREETING, RUN_LOOP_PERIOD, WIFI_RETRY_PERIOD, WIFI_SETTLE};
use crate::discovery::{discover, DiscoveryResult, ScanTarget};
use crate::display::Canvas;
use crate::logsink::LineLog;
use crate::metrics::MemoryStats;
use crate::mode::{dispatch, fetch_mode, DispatchOutcome, Mode, ModeEndpoints};
use crate::peer::PeerTransport;
use crate::wifi::{bring_up, Station, WifiCredentials};

/// Where the loop is within one iteration.
///
/// A fresh loop starts at `Connecting`; a disconnected station is simply
/// the first thing `Connecting` deals with, so there is no separate
/// disconnected phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    /// Associated, scanning from the local address
    Discovering(Ipv4Addr),
    ModeFetch(Ipv4Addr),
    ModeRun(Ipv4Addr, Mode),
    Idle,
}

/// Timings and targets for the loop
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub credentials: WifiCredentials,
    pub wifi_settle: Duration,
    pub wifi_retry: Duration,
    pub scan: ScanTarget,
    pub endpoints: ModeEndpoints,
    pub idle_period: Duration,
}

impl RunSettings {
    pub fn new(credentials: WifiCredentials, scan: ScanTarget, endpoints: ModeEndpoints) -> Self {
        Self {
            credentials,
            wifi_settle: WIFI_SETTLE,
            wifi_retry: WIFI_RETRY_PERIOD,
            scan,
            endpoints,
            idle_period: RUN_LOOP_PERIOD,
        }
    }
}

pub type MemoryProbe = fn() -> io::Result<MemoryStats>;

pub struct RunLoop<S, T, C: Canvas> {
    station: S,
    transport: T,
    sink: LineLog<C>,
    settings: RunSettings,
    phase: Phase,
    // iteration state, dropped on idle
    peer: Option<DiscoveryResult>,
    mode: Option<Mode>,
    memory: MemoryProbe,
}

impl<S, T, C> RunLoop<S, T, C>
where
    S: Station,
    T: PeerTransport,
    C: Canvas,
{
    pub fn new(station: S, transport: T, sink: LineLog<C>, settings: RunSettings) -> Self {
        Self {
            station,
            transport,
            sink,
            settings,
            phase: Phase::Connecting,
            peer: None,
            mode: None,
            memory: MemoryStats::sample,
        }
    }

    /// Replace the free-memory source used on idle.
    pub fn with_memory_probe(mut self, probe: MemoryProbe) -> Self {
        self.memory = probe;
        self
    }

    /// Greet, then cycle forever.
    pub async fn run_forever(&mut self) {
        self.sink.append(GREETING);
        self.sink.append_break();
        loop {
            self.run_iteration().await;
        }
    }

    /// Advance through every phase until the loop is back at `Connecting`.
    pub async fn run_iteration(&mut self) {
        loop {
            self.phase = self.step().await;
            if self.phase == Phase::Connecting {
                break;
            }
        }
    }

    /// Run the current phase and return the one that follows it.
    pub async fn step(&mut self) -> Phase {
        match self.phase.clone() {
            Phase::Connecting => {
                let ip = self.connect().await;
                self.sink.append_break();
                Phase::Discovering(ip)
            }
            Phase::Discovering(own) => {
                match discover(&self.transport, own, &self.settings.scan, &mut self.sink).await {
                    Ok(found) => {
                        let peer = found.peer;
                        self.peer = Some(found);
                        self.sink.append_break();
                        Phase::ModeFetch(peer)
                    }
                    Err(e) => {
                        warn!("discovery gave up: {}", e);
                        self.sink.append(format!("No {} found", self.settings.scan.service_id));
                        Phase::Idle
                    }
                }
            }
            Phase::ModeFetch(peer) => {
                let fetched = fetch_mode(&self.transport, peer, &self.settings.endpoints, &mut self.sink).await;
                self.sink.append_break();
                match fetched {
                    Ok(mode) => {
                        self.mode = Some(mode.clone());
                        Phase::ModeRun(peer, mode)
                    }
                    Err(e) => {
                        warn!("Error fetching mode: {}", e);
                        self.sink.append("Couldn't fetch mode");
                        Phase::Idle
                    }
                }
            }
            Phase::ModeRun(peer, mode) => {
                match dispatch(&self.transport, peer, &mode, &self.settings.endpoints, &mut self.sink).await {
                    Ok(DispatchOutcome::Noop(m)) => debug!("mode {} had nothing to run", m),
                    Err(e) => warn!("Error running mode program: {}", e),
                }
                Phase::Idle
            }
            Phase::Idle => {
                self.peer = None;
                self.mode = None;
                tokio::time::sleep(self.settings.idle_period).await;

                self.sink.append_break();
                match (self.memory)() {
                    Ok(stats) => self.sink.append(stats.to_string()),
                    Err(e) => warn!("memory statistics unavailable: {}", e),
                }
                self.sink.append_break();
                Phase::Connecting
            }
        }
    }

    /// Try `bring_up` every retry period until it yields an address.
    async fn connect(&mut self) -> Ipv4Addr {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match bring_up(&mut self.station, &self.settings.credentials, self.settings.wifi_settle, &mut self.sink).await {
                Ok(ip) => {
                    info!("associated as {} after {} attempt(s)", ip, attempts);
                    return ip;
                }
                Err(e) => debug!("attempt {}: {}", attempts, e),
            }
            tokio::time::sleep(self.settings.wifi_retry).await;
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn peer(&self) -> Option<&DiscoveryResult> {
        self.peer.as_ref()
    }

    pub fn mode(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    pub fn sink(&self) -> &LineLog<C> {
        &self.sink
    }

    pub fn station(&self) -> &S {
        &self.station
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
