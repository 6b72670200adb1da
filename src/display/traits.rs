/*
 *  display/traits.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Core trait definitions for panel drivers and the drawing surface
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

use embedded_graphics::pixelcolor::Rgb565;
use crate::display::error::DisplayError;

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Panel width in pixels, before rotation
    pub width: u32,

    /// Panel height in pixels, before rotation
    pub height: u32,

    /// Bytes per pixel of the frames accepted by `write_buffer`
    pub bytes_per_pixel: usize,
}

impl DisplayCapabilities {
    /// Size in bytes of one full frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel
    }
}

/// Minimal hardware abstraction - all panel drivers implement this trait
///
/// Frames handed to `write_buffer` are RGB565, little endian, row major, in
/// panel orientation. Rotation is already applied by the canvas.
pub trait DisplayDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Prepare the panel for rendering
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Copy a full frame to the panel
    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;

    /// Push any buffered frame data out to the hardware
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Blank the panel
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// A colour selected with `Canvas::create_pen`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen(pub Rgb565);

/// Drawing surface the log sink and the demo renderer paint on.
///
/// Modelled on the small immediate-mode graphics APIs of LCD breakout
/// boards: pick a pen, clear or draw text with it, then `update()` to
/// present the frame.
pub trait Canvas {
    /// Build a pen from 8-bit components.
    fn create_pen(&mut self, r: u8, g: u8, b: u8) -> Pen;

    /// Select the pen used by `clear` and `draw_text`.
    fn set_pen(&mut self, pen: Pen);

    /// Fill the whole frame with the current pen.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Present the frame.
    fn update(&mut self) -> Result<(), DisplayError>;

    fn set_font(&mut self, name: &str) -> Result<(), DisplayError>;

    /// Rendered width of `text` in pixels.
    fn measure_text(&self, text: &str, scale: u32, fixed_width: bool) -> u32;

    /// Draw `text` with its top-left corner at (x, y).
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32, fixed_width: bool) -> Result<(), DisplayError>;

    /// Logical (width, height), after rotation.
    fn bounds(&self) -> (u32, u32);
}
