/*
 *  constants.rs
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

//! Compile-time defaults. Every value here can be overridden from the
//! YAML config or the command line, see `config.rs`.

use std::time::Duration;

use crate::display::Rgb;

// network
pub const WIFI_SSID: &str = "vesta";
pub const WIFI_PASSWORD: &str = "vestavesta";
pub const DEVICE_HOSTNAME: &str = "vestaglove";
/// Wait between the single connect attempt and the re-check.
pub const WIFI_SETTLE: Duration = Duration::from_secs(1);
/// Wait between bring-up attempts in the run loop.
pub const WIFI_RETRY_PERIOD: Duration = Duration::from_secs(2);

// peer
pub const CONTROLLER_ID: &str = "vesta";
pub const PEER_PORT: u16 = 10000;
pub const DISCOVER_PATH: &str = "/discover";
pub const MODE_PATH: &str = "/mode";
pub const DEMO_LINES_PATH: &str = "/run/demo/lines";
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(500);
pub const MODE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEMO_FETCH_TIMEOUT: Duration = Duration::from_secs(4);
/// Offset of the circular scan, higher octets are probed first.
pub const SCAN_ROTATION: u16 = 150;

// modes
pub const MODE_DEMO: &str = "demo";
pub const DEMO_POLL_PERIOD: Duration = Duration::from_millis(500);
pub const DEMO_START_DELAY: Duration = Duration::from_secs(1);

// run loop
pub const RUN_LOOP_PERIOD: Duration = Duration::from_secs(5);
pub const GREETING: &str = "Hey, Tink!";

// log + layout
pub const LOG_LINE_RETENTION: usize = 20;
pub const LOG_FONT_SCALE: u32 = 1;
pub const LOG_PREFIX: &str = ">";
pub const TEXT_FONT: &str = "bitmap8";
pub const TEXT_BORDER: u32 = 4;
pub const BASE_FONT_SIZE: u32 = 8;

// colours
pub const LOG_BACKGROUND: Rgb = Rgb::new(255, 89, 158);
pub const DEMO_BACKGROUND: Rgb = Rgb::new(0, 0, 255);
pub const TEXT_COLOR: Rgb = Rgb::new(255, 255, 255);

// display
pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 240;
pub const SCREEN_ROTATE: u16 = 180;
pub const FB_DEVICE: &str = "/dev/fb1";
