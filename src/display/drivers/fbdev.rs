/*
 *  display/drivers/fbdev.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Linux framebuffer driver (fbtft style SPI panels, 16bpp)
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

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use log::info;
use memmap2::MmapMut;

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};

/// Panel exposed by the kernel as `/dev/fbN`, 16 bits per pixel RGB565.
///
/// The device is memory mapped once in `init()`; frames are copied straight
/// into the mapping.
pub struct FbdevDriver {
    path: PathBuf,
    capabilities: DisplayCapabilities,
    map: Option<MmapMut>,
}

impl FbdevDriver {
    pub fn new(path: impl AsRef<Path>, width: u32, height: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capabilities: DisplayCapabilities {
                width,
                height,
                bytes_per_pixel: 2,
            },
            map: None,
        }
    }

    fn map(&mut self) -> Result<&mut MmapMut, DisplayError> {
        self.map
            .as_mut()
            .ok_or_else(|| DisplayError::Other(format!("{} not initialised", self.path.display())))
    }
}

impl DisplayDriver for FbdevDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| DisplayError::InitializationFailed(format!("{}: {}", self.path.display(), e)))?;

        // SAFETY: the framebuffer device stays open for the life of the map
        // and nothing else in this process touches it.
        let map = unsafe { MmapMut::map_mut(&file) }?;
        let expected = self.capabilities.frame_len();
        if map.len() < expected {
            return Err(DisplayError::BufferSizeMismatch {
                expected,
                actual: map.len(),
            });
        }
        info!("framebuffer {} mapped ({} bytes)", self.path.display(), map.len());
        self.map = Some(map);
        Ok(())
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        let expected = self.capabilities.frame_len();
        if buffer.len() != expected {
            return Err(DisplayError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        self.map()?[..expected].copy_from_slice(buffer);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.map()?.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let expected = self.capabilities.frame_len();
        self.map()?[..expected].fill(0);
        self.flush()
    }
}
