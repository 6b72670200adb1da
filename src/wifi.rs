/*
 *  wifi.rs
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

use std::ffi::CString;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::process::Command;

use crate::display::Canvas;
use crate::error::RunError;
use crate::logsink::LineLog;

/// Station-mode radio as seen by the bring-up logic.
#[allow(async_fn_in_trait)]
pub trait Station {
    fn set_hostname(&mut self, name: &str) -> io::Result<()>;

    /// Power the radio up in station mode
    async fn activate(&mut self);

    fn is_connected(&self) -> bool;

    /// Start one association attempt. Completion is observed via `is_connected`.
    async fn connect(&mut self, ssid: &str, password: &str);

    /// Bound IPv4 address, when associated
    fn ifconfig(&self) -> Option<Ipv4Addr>;
}

/// Credentials and identity used by `bring_up`
#[derive(Debug, Clone)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    pub hostname: String,
}

/// Associate with the access point, at most one connect attempt per call.
///
/// Already associated: report the address without touching the radio.
/// Otherwise issue a single connect, wait `settle`, and check once more.
pub async fn bring_up<S, C>(
    station: &mut S,
    creds: &WifiCredentials,
    settle: Duration,
    log: &mut LineLog<C>,
) -> Result<Ipv4Addr, RunError>
where
    S: Station,
    C: Canvas,
{
    if let Err(e) = station.set_hostname(&creds.hostname) {
        warn!("could not set hostname {}: {}", creds.hostname, e);
    }
    station.activate().await;

    if station.is_connected() {
        return report_address(station, log);
    }

    log.append("Attempting to connect to wifi...");
    station.connect(&creds.ssid, &creds.password).await;
    tokio::time::sleep(settle).await;

    if station.is_connected() {
        return report_address(station, log);
    }

    log.append("Couldn't connect :(");
    Err(RunError::NotConnected)
}

/// Associated: report the bound address. No address yet counts as not
/// connected, and no further connect is issued.
fn report_address<S: Station, C: Canvas>(station: &S, log: &mut LineLog<C>) -> Result<Ipv4Addr, RunError> {
    match station.ifconfig() {
        Some(ip) => {
            log.append("Successfully connected!");
            log.append(format!("IP: {}", ip));
            Ok(ip)
        }
        None => {
            warn!("associated but no IPv4 address bound");
            log.append("Connected, no IP yet");
            Err(RunError::NotConnected)
        }
    }
}

/// Station backed by the host network stack.
///
/// The hostname is set through `sethostname(2)`, the radio and association
/// go through NetworkManager's `nmcli`, and the address is read from the
/// interface list. `interface` pins the lookup to one interface name.
#[derive(Debug, Clone, Default)]
pub struct HostStation {
    interface: Option<String>,
}

impl HostStation {
    pub fn new(interface: Option<String>) -> Self {
        Self { interface }
    }

    async fn nmcli(args: &[&str]) {
        match Command::new("nmcli").args(args).status().await {
            Ok(status) if status.success() => debug!("nmcli {} ok", args.first().unwrap_or(&"")),
            Ok(status) => warn!("nmcli {} exited with {}", args.first().unwrap_or(&""), status),
            Err(e) => warn!("nmcli unavailable: {}", e),
        }
    }
}

impl Station for HostStation {
    fn set_hostname(&mut self, name: &str) -> io::Result<()> {
        let c_name = CString::new(name).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        // SAFETY: pointer and length describe a valid, NUL free buffer that
        // outlives the call.
        let rc = unsafe { libc::sethostname(c_name.as_ptr(), name.len()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    async fn activate(&mut self) {
        Self::nmcli(&["radio", "wifi", "on"]).await;
    }

    fn is_connected(&self) -> bool {
        self.ifconfig().is_some()
    }

    async fn connect(&mut self, ssid: &str, password: &str) {
        match self.interface.as_deref() {
            Some(ifname) => {
                Self::nmcli(&["device", "wifi", "connect", ssid, "password", password, "ifname", ifname]).await
            }
            None => Self::nmcli(&["device", "wifi", "connect", ssid, "password", password]).await,
        }
    }

    fn ifconfig(&self) -> Option<Ipv4Addr> {
        let found = match self.interface.as_deref() {
            Some(ifname) => local_ip_address::list_afinet_netifas()
                .ok()?
                .into_iter()
                .find_map(|(name, ip)| match ip {
                    IpAddr::V4(v4) if name == ifname => Some(v4),
                    _ => None,
                }),
            None => match local_ip_address::local_ip() {
                Ok(IpAddr::V4(v4)) => Some(v4),
                _ => None,
            },
        };
        found.filter(|ip| !ip.is_loopback() && !ip.is_unspecified())
    }
}

/// Internal state for the mock station (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockStationState {
    pub hostname: Option<String>,
    pub active: bool,
    pub associated: bool,
    /// Whether a connect call succeeds in associating
    pub connect_succeeds: bool,
    pub connect_calls: usize,
    pub connected_checks: usize,
    pub address: Option<Ipv4Addr>,
}

/// Scripted station for tests and dry runs. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockStation {
    state: Arc<Mutex<MockStationState>>,
}

impl MockStation {
    /// Station that is not associated; connects succeed when `connect_succeeds`.
    pub fn new(address: Ipv4Addr, associated: bool, connect_succeeds: bool) -> Self {
        let state = MockStationState {
            associated,
            connect_succeeds,
            address: Some(address),
            ..Default::default()
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    pub fn state(&self) -> Arc<Mutex<MockStationState>> {
        Arc::clone(&self.state)
    }

    fn with<R>(&self, f: impl FnOnce(&mut MockStationState) -> R) -> Option<R> {
        self.state.lock().ok().map(|mut s| f(&mut s))
    }
}

impl Station for MockStation {
    fn set_hostname(&mut self, name: &str) -> io::Result<()> {
        self.with(|s| s.hostname = Some(name.to_string()));
        Ok(())
    }

    async fn activate(&mut self) {
        self.with(|s| s.active = true);
    }

    fn is_connected(&self) -> bool {
        self.with(|s| {
            s.connected_checks += 1;
            s.associated
        })
        .unwrap_or(false)
    }

    async fn connect(&mut self, _ssid: &str, _password: &str) {
        self.with(|s| {
            s.connect_calls += 1;
            if s.connect_succeeds {
                s.associated = true;
            }
        });
    }

    fn ifconfig(&self) -> Option<Ipv4Addr> {
        self.with(|s| if s.associated { s.address } else { None }).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::recording::RecordingCanvas;
    use crate::display::TextLayout;

    fn creds() -> WifiCredentials {
        WifiCredentials {
            ssid: "vesta".into(),
            password: "vestavesta".into(),
            hostname: "vestaglove".into(),
        }
    }

    fn sink() -> LineLog<RecordingCanvas> {
        LineLog::new(RecordingCanvas::new(240, 240, 5), TextLayout::default())
    }

    fn bodies(log: &LineLog<RecordingCanvas>) -> Vec<String> {
        log.lines().map(|l| l.body.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_associated_skips_connect() {
        let mut station = MockStation::new(Ipv4Addr::new(10, 0, 0, 77), true, false);
        let mut log = sink();

        let ip = bring_up(&mut station, &creds(), Duration::from_secs(1), &mut log).await.unwrap();

        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 77));
        let state = station.state();
        let state = state.lock().unwrap();
        assert_eq!(state.connect_calls, 0);
        assert_eq!(state.hostname.as_deref(), Some("vestaglove"));
        assert!(state.active);
        assert_eq!(bodies(&log), vec!["IP: 10.0.0.77", "Successfully connected!"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_then_recheck() {
        let mut station = MockStation::new(Ipv4Addr::new(10, 0, 0, 77), false, true);
        let mut log = sink();
        let started = tokio::time::Instant::now();

        let ip = bring_up(&mut station, &creds(), Duration::from_secs(1), &mut log).await.unwrap();

        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 77));
        assert!(started.elapsed() >= Duration::from_secs(1));
        let state = station.state();
        let state = state.lock().unwrap();
        assert_eq!(state.connect_calls, 1);
        assert_eq!(state.connected_checks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_attempt_reports_not_connected() {
        let mut station = MockStation::new(Ipv4Addr::new(10, 0, 0, 77), false, false);
        let mut log = sink();

        let err = bring_up(&mut station, &creds(), Duration::from_secs(1), &mut log).await.unwrap_err();

        assert!(matches!(err, RunError::NotConnected));
        let state = station.state();
        let state = state.lock().unwrap();
        assert_eq!(state.connect_calls, 1);
        assert_eq!(state.connected_checks, 2);
        assert_eq!(bodies(&log), vec!["Couldn't connect :(", "Attempting to connect to wifi..."]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_associated_without_address_does_not_reconnect() {
        let mut station = MockStation::new(Ipv4Addr::new(10, 0, 0, 77), true, true);
        station.state().lock().unwrap().address = None;
        let mut log = sink();

        let err = bring_up(&mut station, &creds(), Duration::from_secs(1), &mut log).await.unwrap_err();

        assert!(matches!(err, RunError::NotConnected));
        assert_eq!(station.state().lock().unwrap().connect_calls, 0);
        assert_eq!(bodies(&log), vec!["Connected, no IP yet"]);
    }
}
