/*
 *  display/framebuffer.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Runtime sized framebuffer usable as an embedded-graphics DrawTarget
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A framebuffer whose size is only known at runtime.
#[derive(Debug, Clone)]
pub struct FrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor> FrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn as_slice(&self) -> &[C] {
        &self.buf
    }

    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Colour at (x, y), None when out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<C> {
        if x < self.w && y < self.h {
            Some(self.buf[y * self.w + x])
        } else {
            None
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for FrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor> DrawTarget for FrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip to the buffer, then fill row slices
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        let x0 = area.top_left.x as usize;
        let y0 = area.top_left.y as usize;
        let w = area.size.width as usize;
        for row in y0..y0 + area.size.height as usize {
            let base = row * self.w + x0;
            self.buf[base..base + w].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;

    #[test]
    fn test_out_of_bounds_pixels_are_dropped() {
        let mut fb = FrameBuf::new(4, 3, BinaryColor::Off);
        let pixels = [
            Pixel(Point::new(1, 1), BinaryColor::On),
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(4, 0), BinaryColor::On),
        ];
        fb.draw_iter(pixels).unwrap();

        assert_eq!(fb.get(1, 1), Some(BinaryColor::On));
        assert_eq!(fb.as_slice().iter().filter(|&&c| c == BinaryColor::On).count(), 1);
        assert_eq!(fb.get(4, 0), None);
    }

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut fb = FrameBuf::new(4, 4, BinaryColor::Off);
        let area = Rectangle::new(Point::new(2, 2), Size::new(10, 10));
        fb.fill_solid(&area, BinaryColor::On).unwrap();

        // only the 2x2 bottom-right corner is inside
        assert_eq!(fb.as_slice().iter().filter(|&&c| c == BinaryColor::On).count(), 4);
        assert_eq!(fb.get(3, 3), Some(BinaryColor::On));
        assert_eq!(fb.get(1, 3), Some(BinaryColor::Off));
    }
}
