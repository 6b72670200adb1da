/*
 *  mode.rs
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

use std::convert::Infallible;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use log::{debug, warn};

use crate::constants::{DEMO_BACKGROUND, MODE_DEMO, TEXT_COLOR};
use crate::display::{render_frame, Canvas, RenderFrame};
use crate::error::TransportError;
use crate::logsink::LineLog;
use crate::peer::{peer_url, DemoLinesReply, ModeReply, PeerTransport};

/// Mode tag reported by the controller. Only `demo` has a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode(pub String);

impl Mode {
    pub fn is_demo(&self) -> bool {
        self.0 == MODE_DEMO
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Endpoints and timings of the controller API
#[derive(Debug, Clone)]
pub struct ModeEndpoints {
    pub port: u16,
    pub mode_path: String,
    pub mode_timeout: Duration,
    pub demo_path: String,
    pub demo_timeout: Duration,
    pub demo_period: Duration,
    pub demo_start_delay: Duration,
}

/// How a dispatch finished when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No handler for this mode; nothing was run
    Noop(Mode),
}

/// `GET /mode` on the peer. Errors are left to the caller.
pub async fn fetch_mode<T, C>(
    transport: &T,
    peer: Ipv4Addr,
    endpoints: &ModeEndpoints,
    log: &mut LineLog<C>,
) -> Result<Mode, TransportError>
where
    T: PeerTransport,
    C: Canvas,
{
    let url = peer_url(peer, endpoints.port, &endpoints.mode_path);
    let reply: ModeReply = transport.get(&url, endpoints.mode_timeout).await?;
    let mode = Mode(reply.mode);
    log.append(format!("Current mode: {}", mode));
    Ok(mode)
}

/// Run the handler for `mode`.
///
/// `demo` never comes back on its own: the only way out is a transport
/// error, returned as `Err`. Any other mode is a logged no-op.
pub async fn dispatch<T, C>(
    transport: &T,
    peer: Ipv4Addr,
    mode: &Mode,
    endpoints: &ModeEndpoints,
    log: &mut LineLog<C>,
) -> Result<DispatchOutcome, TransportError>
where
    T: PeerTransport,
    C: Canvas,
{
    if mode.is_demo() {
        log.append("Running demo mode...");
        tokio::time::sleep(endpoints.demo_start_delay).await;
        let never = run_demo(transport, peer, endpoints, log).await?;
        match never {}
    }

    log.append(format!("No handler for mode {}", mode));
    Ok(DispatchOutcome::Noop(mode.clone()))
}

/// Poll the demo feed and paint it full screen, forever.
///
/// Frames use the blue demo background with no prefix and do not pass
/// through the log buffer.
pub async fn run_demo<T, C>(
    transport: &T,
    peer: Ipv4Addr,
    endpoints: &ModeEndpoints,
    log: &mut LineLog<C>,
) -> Result<Infallible, TransportError>
where
    T: PeerTransport,
    C: Canvas,
{
    let url = peer_url(peer, endpoints.port, &endpoints.demo_path);
    let layout = log.layout().clone();
    loop {
        let reply: DemoLinesReply = transport.get(&url, endpoints.demo_timeout).await?;
        debug!("demo frame with {} lines", reply.lines.len());

        let frame = RenderFrame {
            background: DEMO_BACKGROUND,
            foreground: TEXT_COLOR,
            lines: reply.lines,
        };
        if let Err(e) = render_frame(log.canvas_mut(), &frame, &layout, None) {
            warn!("demo render failed: {}", e);
        }
        tokio::time::sleep(endpoints.demo_period).await;
    }
}
