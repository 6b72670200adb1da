/*
 *  display/canvas.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  RGB565 canvas over a panel driver
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

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_4X6, FONT_5X8, FONT_7X14},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::{BinaryColor, IntoStorage, Rgb565, Rgb888},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};
use log::debug;

use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuf;
use crate::display::traits::{Canvas, Pen};
use crate::display::BoxedDriver;

/// Look up one of the built-in bitmap fonts by name.
pub fn font_by_name(name: &str) -> Option<&'static MonoFont<'static>> {
    match name {
        "bitmap6" => Some(&FONT_4X6),
        "bitmap8" => Some(&FONT_5X8),
        "bitmap14" => Some(&FONT_7X14),
        _ => None,
    }
}

/// Canvas that renders into an RGB565 framebuffer and hands rotated frames
/// to a panel driver on `update()`.
pub struct FrameCanvas {
    driver: BoxedDriver,
    frame: FrameBuf<Rgb565>,
    rotation: u16,
    pen: Pen,
    font: &'static MonoFont<'static>,
    scratch: Vec<u8>,
}

impl FrameCanvas {
    pub fn new(mut driver: BoxedDriver, rotation: u16) -> Result<Self, DisplayError> {
        let (pw, ph) = driver.dimensions();
        let (w, h) = match rotation {
            0 | 180 => (pw, ph),
            90 | 270 => (ph, pw),
            other => return Err(DisplayError::InvalidRotation(other)),
        };
        let bpp = driver.capabilities().bytes_per_pixel;
        if bpp != 2 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "panel wants {} bytes per pixel, canvas renders RGB565",
                bpp
            )));
        }
        driver.init()?;
        let len = driver.capabilities().frame_len();
        debug!("canvas {}x{} rotated {} on {}x{} panel", w, h, rotation, pw, ph);

        Ok(Self {
            driver,
            frame: FrameBuf::new(w, h, Rgb565::BLACK),
            rotation,
            pen: Pen(Rgb565::WHITE),
            font: &FONT_5X8,
            scratch: vec![0; len],
        })
    }

    /// Logical pixel at (x, y), mainly for tests.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        self.frame.get(x, y)
    }

    /// Map a logical coordinate onto the panel.
    fn to_panel(&self, x: usize, y: usize) -> (usize, usize) {
        let (pw, ph) = (self.frame_panel_width(), self.frame_panel_height());
        match self.rotation {
            90 => (pw - 1 - y, x),
            180 => (pw - 1 - x, ph - 1 - y),
            270 => (y, ph - 1 - x),
            _ => (x, y),
        }
    }

    fn frame_panel_width(&self) -> usize {
        self.driver.capabilities().width as usize
    }

    fn frame_panel_height(&self) -> usize {
        self.driver.capabilities().height as usize
    }
}

impl Canvas for FrameCanvas {
    fn create_pen(&mut self, r: u8, g: u8, b: u8) -> Pen {
        Pen(Rgb565::from(Rgb888::new(r, g, b)))
    }

    fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.clear_color(self.pen.0);
        Ok(())
    }

    fn update(&mut self) -> Result<(), DisplayError> {
        let pw = self.frame_panel_width();
        for y in 0..self.frame.height() {
            for x in 0..self.frame.width() {
                let Some(color) = self.frame.get(x, y) else { continue };
                let (px, py) = self.to_panel(x, y);
                let i = (py * pw + px) * 2;
                let raw: u16 = color.into_storage();
                self.scratch[i..i + 2].copy_from_slice(&raw.to_le_bytes());
            }
        }
        self.driver.write_buffer(&self.scratch)?;
        self.driver.flush()
    }

    fn set_font(&mut self, name: &str) -> Result<(), DisplayError> {
        self.font = font_by_name(name).ok_or_else(|| DisplayError::UnknownFont(name.to_string()))?;
        Ok(())
    }

    // the bundled fonts are all monospace so fixed_width changes nothing
    fn measure_text(&self, text: &str, scale: u32, _fixed_width: bool) -> u32 {
        let advance = self.font.character_size.width + self.font.character_spacing;
        text.chars().count() as u32 * advance * scale.max(1)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32, fixed_width: bool) -> Result<(), DisplayError> {
        let scale = scale.max(1);
        let width = self.measure_text(text, 1, fixed_width);
        if width == 0 {
            return Ok(());
        }

        // render unscaled into a mask, then blow each set pixel up
        let height = self.font.character_size.height;
        let mut mask = FrameBuf::new(width, height, BinaryColor::Off);
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        Text::with_baseline(text, Point::zero(), style, Baseline::Top)
            .draw(&mut mask)
            .map_err(|_| DisplayError::Other("text rasterisation failed".to_string()))?;

        let block = Size::new(scale, scale);
        for my in 0..mask.height() {
            for mx in 0..mask.width() {
                if mask.get(mx, my) != Some(BinaryColor::On) {
                    continue;
                }
                let origin = Point::new(x + (mx as u32 * scale) as i32, y + (my as u32 * scale) as i32);
                self.frame
                    .fill_solid(&Rectangle::new(origin, block), self.pen.0)
                    .map_err(|_| DisplayError::Other("fill failed".to_string()))?;
            }
        }
        Ok(())
    }

    fn bounds(&self) -> (u32, u32) {
        (self.frame.width() as u32, self.frame.height() as u32)
    }
}
