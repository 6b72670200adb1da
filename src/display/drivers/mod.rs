/*
 *  display/drivers/mod.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Panel driver implementations
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

pub mod fbdev;

// Mock driver, also backs headless runs
pub mod mock;

use log::info;

use crate::config::{DisplaySettings, DriverKind};
use crate::display::BoxedDriver;

/// Build the panel driver selected in the configuration
pub fn create_from_config(settings: &DisplaySettings) -> BoxedDriver {
    match settings.driver {
        DriverKind::Fbdev => {
            info!("Using framebuffer {} ({}x{})", settings.fb_device, settings.width, settings.height);
            Box::new(fbdev::FbdevDriver::new(&settings.fb_device, settings.width, settings.height))
        }
        DriverKind::Headless => {
            info!("Running headless ({}x{})", settings.width, settings.height);
            Box::new(mock::MockDriver::new_with_size(settings.width, settings.height))
        }
    }
}
