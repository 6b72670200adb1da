/*
 *  display/recording.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Canvas that records draw calls instead of rasterising them
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

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};

use crate::display::error::DisplayError;
use crate::display::traits::{Canvas, Pen};

/// One recorded canvas operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasOp {
    Clear(Pen),
    Text { text: String, x: i32, y: i32, pen: Pen },
    Update,
}

/// In-memory `Canvas` with a fixed-advance font.
///
/// Every glyph measures `glyph_width * scale` pixels. Tests use it to check
/// what was drawn where without touching pixels.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    glyph_width: u32,
    pen: Pen,
    pub font: String,
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32, glyph_width: u32) -> Self {
        Self {
            width,
            height,
            glyph_width,
            pen: Pen(Rgb565::new(0, 0, 0)),
            font: String::new(),
            ops: Vec::new(),
        }
    }

    /// Text of every draw since the last clear
    pub fn last_frame_text(&self) -> Vec<String> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, CanvasOp::Clear(_)))
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Pen of the most recent clear
    pub fn last_background(&self) -> Option<Pen> {
        self.ops.iter().rev().find_map(|op| match op {
            CanvasOp::Clear(pen) => Some(*pen),
            _ => None,
        })
    }

    pub fn update_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, CanvasOp::Update)).count()
    }

    pub fn pen_for(r: u8, g: u8, b: u8) -> Pen {
        Pen(Rgb565::from(Rgb888::new(r, g, b)))
    }
}

impl Canvas for RecordingCanvas {
    fn create_pen(&mut self, r: u8, g: u8, b: u8) -> Pen {
        Self::pen_for(r, g, b)
    }

    fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ops.push(CanvasOp::Clear(self.pen));
        Ok(())
    }

    fn update(&mut self) -> Result<(), DisplayError> {
        self.ops.push(CanvasOp::Update);
        Ok(())
    }

    fn set_font(&mut self, name: &str) -> Result<(), DisplayError> {
        self.font = name.to_string();
        Ok(())
    }

    fn measure_text(&self, text: &str, scale: u32, _fixed_width: bool) -> u32 {
        text.chars().count() as u32 * self.glyph_width * scale
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _scale: u32, _fixed_width: bool) -> Result<(), DisplayError> {
        self.ops.push(CanvasOp::Text { text: text.to_string(), x, y, pen: self.pen });
        Ok(())
    }

    fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
