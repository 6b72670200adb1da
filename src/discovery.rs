/*
 *  discovery.rs
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

use std::net::Ipv4Addr;
use std::time::Duration;

use log::debug;

use crate::constants::SCAN_ROTATION;
use crate::display::Canvas;
use crate::error::RunError;
use crate::logsink::LineLog;
use crate::peer::{peer_url, DiscoverReply, PeerTransport};

/// Outcome of a successful scan. Lives for one run-loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub peer: Ipv4Addr,
    pub service_id: String,
}

/// Where and what to probe
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub service_id: String,
    pub port: u16,
    pub path: String,
    pub timeout: Duration,
}

/// Last octets in probe order for a host whose own last octet is `own`.
///
/// The sequence is `((i + 150) mod 256) + 1` for `i` in `0..256`, so it
/// runs 151..=255, then 1..=150. The host itself is skipped, and so is 256,
/// which the formula yields once but is not an address.
pub fn scan_order(own: u8) -> impl Iterator<Item = u8> {
    (0u16..256)
        .map(|i| ((i + SCAN_ROTATION) % 256) + 1)
        .filter_map(|i| u8::try_from(i).ok())
        .filter(move |&i| i != own)
}

/// Probe the /24 of `own` for a controller advertising `target.service_id`.
///
/// Candidates are tried one at a time in `scan_order`. The first reply whose
/// `service` matches wins. Mismatches are logged on screen; transport and
/// parse failures only go to the process log and the scan moves on.
pub async fn discover<T, C>(
    transport: &T,
    own: Ipv4Addr,
    target: &ScanTarget,
    log: &mut LineLog<C>,
) -> Result<DiscoveryResult, RunError>
where
    T: PeerTransport,
    C: Canvas,
{
    log.append(format!("Finding controller IP for {}", target.service_id));
    let [o1, o2, o3, o4] = own.octets();

    for i in scan_order(o4) {
        let candidate = Ipv4Addr::new(o1, o2, o3, i);
        log.append(format!("Attempting {}", candidate));

        let url = peer_url(candidate, target.port, &target.path);
        match transport.get::<DiscoverReply>(&url, target.timeout).await {
            Ok(reply) if reply.service == target.service_id => {
                log.append(format!("Found {} at {}!", target.service_id, candidate));
                return Ok(DiscoveryResult {
                    peer: candidate,
                    service_id: reply.service,
                });
            }
            Ok(reply) => log.append(format!("Incorrect controller ID: {}", reply.service)),
            Err(e) => debug!("probe {} failed: {}", candidate, e),
        }
    }

    Err(RunError::PeerNotFound { service: target.service_id.clone() })
}
