/*
 *  display/text_layout.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Greedy wrapping of text lines to the screen width, and frame rendering
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

use crate::constants::{BASE_FONT_SIZE, LOG_FONT_SCALE, TEXT_BORDER, TEXT_FONT};
use crate::display::error::DisplayError;
use crate::display::traits::Canvas;
use crate::display::Rgb;

/// Wrap one logical line into sub-lines no wider than `budget`.
///
/// Characters are added one at a time; when the next one would push the
/// measured width past the budget the sub-line is flushed. A space is never
/// kept at the start of a sub-line. A lone character wider than the budget
/// is emitted on its own so the loop always makes progress.
///
/// An empty input produces no sub-lines.
pub fn wrap_line<M>(line: &str, budget: u32, measure: M) -> Vec<String>
where
    M: Fn(&str) -> u32,
{
    let chars: Vec<char> = line.chars().collect();
    let mut out = Vec::new();
    let mut c = 0;

    while c < chars.len() {
        let mut sub = String::new();
        while c < chars.len() {
            let ch = chars[c];
            let mut prospective = sub.clone();
            prospective.push(ch);
            if !sub.is_empty() && measure(&prospective) > budget {
                break;
            }
            if !(sub.is_empty() && ch == ' ') {
                sub.push(ch);
            }
            c += 1;
        }
        out.push(sub);
    }
    out
}

/// Wrap every input line independently, preserving order.
pub fn wrap_lines<M, S>(lines: &[S], budget: u32, measure: M) -> Vec<String>
where
    M: Fn(&str) -> u32,
    S: AsRef<str>,
{
    lines
        .iter()
        .flat_map(|line| wrap_line(line.as_ref(), budget, &measure))
        .collect()
}

/// Geometry used to lay text out on the canvas.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub font: String,
    pub scale: u32,
    pub border: u32,
    pub fixed_width: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font: TEXT_FONT.to_string(),
            scale: LOG_FONT_SCALE,
            border: TEXT_BORDER,
            fixed_width: true,
        }
    }
}

impl TextLayout {
    /// Vertical advance between sub-lines
    pub fn line_advance(&self) -> i32 {
        (self.scale * BASE_FONT_SIZE + self.border) as i32
    }

    /// Usable width for a screen `width` pixels wide
    pub fn budget(&self, width: u32) -> u32 {
        width.saturating_sub(2 * self.border)
    }

    /// Lay `lines` out for `canvas`, optionally prefixing each one.
    pub fn layout<C: Canvas + ?Sized, S: AsRef<str>>(&self, canvas: &C, lines: &[S], prefix: Option<&str>) -> Vec<String> {
        let (w, _) = canvas.bounds();
        let prefixed: Vec<String> = lines
            .iter()
            .map(|l| match prefix {
                Some(p) => format!("{} {}", p, l.as_ref()),
                None => l.as_ref().to_string(),
            })
            .collect();
        wrap_lines(&prefixed, self.budget(w), |s| canvas.measure_text(s, self.scale, self.fixed_width))
    }
}

/// One full-screen frame: a background and the text lines drawn over it.
/// Built and thrown away per display update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub background: Rgb,
    pub foreground: Rgb,
    pub lines: Vec<String>,
}

/// Clear to the frame background, draw the wrapped lines top-down from the
/// border and present the result.
pub fn render_frame<C: Canvas + ?Sized>(
    canvas: &mut C,
    frame: &RenderFrame,
    layout: &TextLayout,
    prefix: Option<&str>,
) -> Result<(), DisplayError> {
    let bg = canvas.create_pen(frame.background.r, frame.background.g, frame.background.b);
    canvas.set_pen(bg);
    canvas.clear()?;

    let fg = canvas.create_pen(frame.foreground.r, frame.foreground.g, frame.foreground.b);
    canvas.set_pen(fg);
    canvas.set_font(&layout.font)?;

    let x = layout.border as i32;
    let mut y = layout.border as i32;
    for sub in layout.layout(canvas, &frame.lines, prefix) {
        canvas.draw_text(&sub, x, y, layout.scale, layout.fixed_width)?;
        y += layout.line_advance();
    }
    canvas.update()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::recording::{CanvasOp, RecordingCanvas};

    fn fixed(glyph: u32) -> impl Fn(&str) -> u32 {
        move |s: &str| s.chars().count() as u32 * glyph
    }

    #[test]
    fn test_short_line_is_untouched() {
        assert_eq!(wrap_line("hello", 100, fixed(4)), vec!["hello"]);
    }

    #[test]
    fn test_greedy_break_and_leading_space_dropped() {
        // 5 glyphs fit
        let out = wrap_line("hello world", 20, fixed(4));
        assert_eq!(out, vec!["hello", "world"]);
    }

    #[test]
    fn test_empty_line_yields_nothing() {
        assert!(wrap_line("", 20, fixed(4)).is_empty());
    }

    #[test]
    fn test_oversize_glyph_emitted_alone() {
        let out = wrap_line("abc", 3, fixed(4));
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wrapped_widths_within_budget() {
        let text = "the quick brown fox jumps over the lazy dog while the log scrolls";
        let measure = fixed(6);
        for budget in [6u32, 13, 30, 47, 100, 232] {
            let out = wrap_line(text, budget, &measure);
            for sub in &out {
                assert!(measure(sub.as_str()) <= budget, "{sub:?} wider than {budget}");
                assert!(!sub.starts_with(' '));
            }
            // joining restores the text minus the dropped break spaces
            let joined: String = out.concat();
            assert_eq!(joined.replace(' ', ""), text.replace(' ', ""));
            assert!(joined.len() >= text.len() - out.len() + 1);
        }
    }

    #[test]
    fn test_lines_wrap_independently() {
        let out = wrap_lines(&["ab", "cd"], 100, fixed(4));
        assert_eq!(out, vec!["ab", "cd"]);
    }

    #[test]
    fn test_render_frame_positions() {
        let mut canvas = RecordingCanvas::new(40, 100, 4);
        let frame = RenderFrame {
            background: Rgb::new(0, 0, 255),
            foreground: Rgb::new(255, 255, 255),
            lines: vec!["abcdefgh".into(), "xy".into()],
        };
        let layout = TextLayout::default();
        render_frame(&mut canvas, &frame, &layout, None).unwrap();

        // budget is 40 - 8 = 32, eight glyphs of width 4
        let white = RecordingCanvas::pen_for(255, 255, 255);
        assert_eq!(canvas.ops[0], CanvasOp::Clear(RecordingCanvas::pen_for(0, 0, 255)));
        assert_eq!(canvas.ops[1], CanvasOp::Text { text: "abcdefgh".into(), x: 4, y: 4, pen: white });
        assert_eq!(canvas.ops[2], CanvasOp::Text { text: "xy".into(), x: 4, y: 16, pen: white });
        assert_eq!(canvas.ops[3], CanvasOp::Update);
        assert_eq!(canvas.font, "bitmap8");
    }

    #[test]
    fn test_prefix_is_joined_with_space() {
        let canvas = RecordingCanvas::new(240, 240, 5);
        let layout = TextLayout::default();
        let out = layout.layout(&canvas, &["hi", ""], Some(">"));
        assert_eq!(out, vec!["> hi", "> "]);
    }
}
