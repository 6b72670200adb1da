/*
 *  error.rs
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

use thiserror::Error;

/// Failure of a single HTTP call to the controller.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Reasons a run-loop iteration stops early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("wifi not connected")]
    NotConnected,
    #[error("no peer answering as {service}")]
    PeerNotFound { service: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}
