//! Recording draw surface for host tests
//!
//! Stores every primitive it is asked to draw so tests can assert on what a
//! renderer produced without a frame buffer.

use heapless::{String, Vec};

use crate::surface::{Bitmap, Color, DisplayError, DrawSurface, Rect};

/// Maximum recorded operations
pub const MAX_OPS: usize = 1024;

/// Maximum recorded text length per operation
pub const MAX_TEXT: usize = 40;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Color },
    Outline { rect: Rect, color: Color },
    RoundFill { rect: Rect, color: Color },
    Text { x: u16, y: u16, text: String<MAX_TEXT>, fg: Color, bg: Color },
    Bitmap { x: u16, y: u16, width: u16, height: u16, fg: Color },
    Backlight(u8),
}

/// Draw surface that records operations instead of drawing
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<DrawOp, MAX_OPS>,
    backlight: Option<u8>,
    failing: bool,
    dropped: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Create an empty recorder
    pub const fn new() -> Self {
        Self {
            ops: Vec::new(),
            backlight: None,
            failing: false,
            dropped: 0,
        }
    }

    /// Make every subsequent call fail with `DisplayError::Communication`
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Recorded operations, oldest first
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Forget recorded operations
    pub fn clear(&mut self) {
        self.ops.clear();
        self.dropped = 0;
    }

    /// Operations that did not fit in the log
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Last backlight level set
    pub fn backlight(&self) -> Option<u8> {
        self.backlight
    }

    /// Count operations matching a predicate
    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Texts drawn at row `y`, oldest first
    pub fn texts_at(&self, y: u16) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(move |op| match op {
            DrawOp::Text { y: ty, text, .. } if *ty == y => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last color a rectangle was filled with (plain or rounded)
    pub fn last_fill(&self, rect: Rect) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Fill { rect: r, color } | DrawOp::RoundFill { rect: r, color }
                if *r == rect =>
            {
                Some(*color)
            }
            _ => None,
        })
    }

    /// Last color a rectangle outline was drawn with
    pub fn last_outline(&self, rect: Rect) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Outline { rect: r, color } if *r == rect => Some(*color),
            _ => None,
        })
    }

    fn record(&mut self, op: DrawOp) -> Result<(), DisplayError> {
        if self.failing {
            return Err(DisplayError::Communication);
        }
        if self.ops.push(op).is_err() {
            self.dropped += 1;
        }
        Ok(())
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Fill { rect, color })
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.record(DrawOp::Outline { rect, color })
    }

    fn fill_round_rect(
        &mut self,
        rect: Rect,
        _radius: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        self.record(DrawOp::RoundFill { rect, color })
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError> {
        let mut recorded = String::new();
        for ch in text.chars() {
            if recorded.push(ch).is_err() {
                break;
            }
        }
        self.record(DrawOp::Text {
            x,
            y,
            text: recorded,
            fg,
            bg,
        })
    }

    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<'_>,
        fg: Color,
        _bg: Color,
    ) -> Result<(), DisplayError> {
        self.record(DrawOp::Bitmap {
            x,
            y,
            width: bitmap.width(),
            height: bitmap.height(),
            fg,
        })
    }

    fn set_backlight(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.record(DrawOp::Backlight(percent))?;
        self.backlight = Some(percent);
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (crate::SCREEN_WIDTH, crate::SCREEN_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        let rect = Rect::new(1, 2, 3, 4);
        surface.fill_rect(rect, Color::Red).unwrap();
        surface.fill_round_rect(rect, 2, Color::Green).unwrap();
        surface.draw_text(10, 60, "IP", Color::White, Color::Black).unwrap();

        assert_eq!(surface.ops().len(), 3);
        assert_eq!(surface.last_fill(rect), Some(Color::Green));
        assert_eq!(surface.texts_at(60).next(), Some("IP"));
        assert_eq!(surface.texts_at(75).count(), 0);
    }

    #[test]
    fn test_failing_surface() {
        let mut surface = RecordingSurface::new();
        surface.set_failing(true);
        assert_eq!(
            surface.set_backlight(50),
            Err(DisplayError::Communication)
        );
        assert_eq!(surface.backlight(), None);
        assert!(surface.ops().is_empty());
    }
}
