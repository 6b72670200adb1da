/*
 *  peer/mod.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Client side of the controller HTTP API
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::TransportError;

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// `GET /discover`
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverReply {
    pub service: String,
}

/// `GET /mode`
#[derive(Debug, Clone, Deserialize)]
pub struct ModeReply {
    pub mode: String,
}

/// `GET /run/demo/lines`
#[derive(Debug, Clone, Deserialize)]
pub struct DemoLinesReply {
    pub lines: Vec<String>,
}

/// Build `http://{host}:{port}{path}`.
pub fn peer_url(host: Ipv4Addr, port: u16, path: &str) -> String {
    format!("http://{}:{}{}", host, port, path)
}

/// One JSON-over-HTTP GET with its own deadline.
///
/// Calls are made one at a time from the run loop, so implementations do
/// not need to be `Send` or `Sync`.
#[allow(async_fn_in_trait)]
pub trait PeerTransport {
    async fn get<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, TransportError>;
}
