/*
 *  logsink.rs
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

use std::collections::VecDeque;

use log::{info, warn};

use crate::constants::{LOG_BACKGROUND, LOG_LINE_RETENTION, LOG_PREFIX, TEXT_COLOR};
use crate::display::{render_frame, Canvas, RenderFrame, TextLayout};

/// One on-screen log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub body: String,
}

/// Bounded, most-recent-first log that repaints the screen on every
/// rendered append.
///
/// The sink owns the canvas; other render paths (demo mode) borrow it
/// through `canvas_mut()`.
pub struct LineLog<C: Canvas> {
    lines: VecDeque<LogLine>,
    retention: usize,
    canvas: C,
    layout: TextLayout,
}

impl<C: Canvas> LineLog<C> {
    pub fn new(canvas: C, layout: TextLayout) -> Self {
        Self::with_retention(canvas, layout, LOG_LINE_RETENTION)
    }

    pub fn with_retention(canvas: C, layout: TextLayout, retention: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(retention + 1),
            retention: retention.max(1),
            canvas,
            layout,
        }
    }

    /// Record `line` and repaint the whole log.
    pub fn append(&mut self, line: impl Into<String>) {
        self.insert(line.into());
        self.render();
    }

    /// Record `line` without repainting. It shows up on the next render.
    pub fn append_silent(&mut self, line: impl Into<String>) {
        self.insert(line.into());
    }

    /// Silent empty spacer line.
    pub fn append_break(&mut self) {
        self.append_silent(String::new());
    }

    fn insert(&mut self, body: String) {
        info!("Device log: {}", body);
        self.lines.push_front(LogLine { body });
        self.lines.truncate(self.retention);
    }

    /// Repaint every retained line. Render failures only get logged.
    pub fn render(&mut self) {
        let frame = RenderFrame {
            background: LOG_BACKGROUND,
            foreground: TEXT_COLOR,
            lines: self.lines.iter().map(|l| l.body.clone()).collect(),
        };
        if let Err(e) = render_frame(&mut self.canvas, &frame, &self.layout, Some(LOG_PREFIX)) {
            warn!("log render failed: {}", e);
        }
    }

    /// Retained lines, most recent first
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockDriver;
    use crate::display::recording::{CanvasOp, RecordingCanvas};
    use crate::display::FrameCanvas;

    fn sink(retention: usize) -> LineLog<RecordingCanvas> {
        LineLog::with_retention(RecordingCanvas::new(240, 240, 5), TextLayout::default(), retention)
    }

    #[test]
    fn test_retention_keeps_most_recent_first() {
        let mut log = sink(20);
        for i in 0..35 {
            log.append_silent(format!("line {i}"));
        }
        assert_eq!(log.len(), 20);
        let bodies: Vec<&str> = log.lines().map(|l| l.body.as_str()).collect();
        assert_eq!(bodies.first(), Some(&"line 34"));
        assert_eq!(bodies.last(), Some(&"line 15"));
    }

    #[test]
    fn test_append_renders_with_prefix_and_highlight() {
        let mut log = sink(20);
        log.append("first");
        log.append("second");

        let canvas = log.canvas();
        assert_eq!(canvas.update_count(), 2);
        assert_eq!(canvas.last_background(), Some(RecordingCanvas::pen_for(255, 89, 158)));
        assert_eq!(canvas.last_frame_text(), vec!["> second", "> first"]);
    }

    #[test]
    fn test_silent_append_does_not_render() {
        let mut log = sink(20);
        log.append_silent("quiet");
        log.append_break();
        assert!(log.canvas().ops.is_empty());

        log.append("loud");
        assert_eq!(log.canvas().last_frame_text(), vec!["> loud", "> ", "> quiet"]);
    }

    #[test]
    fn test_text_is_white() {
        let mut log = sink(20);
        log.append("hello");
        let white = RecordingCanvas::pen_for(255, 255, 255);
        assert!(log
            .canvas()
            .ops
            .iter()
            .any(|op| matches!(op, CanvasOp::Text { pen, .. } if *pen == white)));
    }

    #[test]
    fn test_failed_flush_leaves_lines_intact() {
        let driver = MockDriver::new_with_size(240, 240);
        let state = driver.state();
        state.lock().unwrap().simulate_flush_failure = true;
        let canvas = FrameCanvas::new(Box::new(driver), 180).unwrap();
        let mut log = LineLog::with_retention(canvas, TextLayout::default(), 3);

        for i in 0..5 {
            log.append(format!("line {i}"));
        }

        let bodies: Vec<&str> = log.lines().map(|l| l.body.as_str()).collect();
        assert_eq!(bodies, vec!["line 4", "line 3", "line 2"]);
        let state = state.lock().unwrap();
        assert_eq!(state.frames_written, 5);
        assert_eq!(state.flush_count, 0);
    }
}
