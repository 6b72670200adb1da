/*
 *  display/drivers/mock.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Mock panel driver for headless runs and tests
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

use std::sync::{Arc, Mutex};

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};

/// Mock display driver
///
/// Keeps the last frame in memory instead of talking to hardware. Used when
/// the device runs headless and by tests. Clones share the same state, so a
/// test can keep one clone for inspection while the canvas owns another.
#[derive(Debug, Clone)]
pub struct MockDriver {
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Frames received via write_buffer
    pub frames_written: usize,

    /// Copy of the most recent frame
    pub last_frame: Option<Vec<u8>>,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
}

impl MockDriver {
    /// Create a mock RGB565 panel of the given size
    pub fn new_with_size(width: u32, height: u32) -> Self {
        Self::new_with_depth(width, height, 2)
    }

    /// Mock panel reporting `bytes_per_pixel` bytes per pixel
    pub fn new_with_depth(width: u32, height: u32, bytes_per_pixel: usize) -> Self {
        Self {
            capabilities: DisplayCapabilities {
                width,
                height,
                bytes_per_pixel,
            },
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockDriverState>, DisplayError> {
        self.state
            .lock()
            .map_err(|_| DisplayError::Other("mock driver state poisoned".to_string()))
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.lock()?.init_count += 1;
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
        let mut state = self.lock()?;
        state.frames_written += 1;
        state.last_frame = Some(buffer.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock()?;
        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }
        state.flush_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let len = self.capabilities.frame_len();
        {
            let mut state = self.lock()?;
            state.clear_count += 1;
        } // Release lock before writing the blank frame
        self.write_buffer(&vec![0; len])?;
        self.flush()
    }
}
