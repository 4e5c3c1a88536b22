//! Stroke bookkeeping for the freehand drawing window.
//!
//! Pixels belong to the canvas; this model only tracks which segments exist
//! so that undo and clear can be expressed without the toolkit.

use crate::model::color::Color;

/// Pen width used for every segment.
pub const STROKE_WIDTH: u32 = 5;
/// Ink color used for every segment.
pub const STROKE_COLOR: Color = Color::BLACK;

/// Canvas coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One straight segment between two pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Drawing state of one sketch window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingSketch {
    background: Color,
    segments: Vec<Segment>,
    last_point: Option<Point>,
}

impl DrawingSketch {
    /// Opens a sketch using the owning note's current color as background.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            segments: Vec::new(),
            last_point: None,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Pointer pressed.
    pub fn begin_stroke(&mut self, point: Point) {
        self.last_point = Some(point);
    }

    /// Pointer moved while pressed. Returns the new segment, if any.
    pub fn extend_stroke(&mut self, point: Point) -> Option<Segment> {
        let from = self.last_point?;
        self.last_point = Some(point);
        let segment = Segment { from, to: point };
        self.segments.push(segment);
        Some(segment)
    }

    /// Pointer released.
    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Removes the most recent segment.
    pub fn undo_last_segment(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.last_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingSketch, Point};
    use crate::model::color::Color;

    #[test]
    fn moves_without_press_draw_nothing() {
        let mut sketch = DrawingSketch::new(Color::rgb(1, 2, 3));
        assert!(sketch.extend_stroke(Point::new(5, 5)).is_none());
        assert!(sketch.segments().is_empty());
    }

    #[test]
    fn stroke_records_consecutive_segments_and_undo_pops_last() {
        let mut sketch = DrawingSketch::new(Color::BLACK);
        sketch.begin_stroke(Point::new(0, 0));
        sketch.extend_stroke(Point::new(1, 1));
        sketch.extend_stroke(Point::new(2, 3));
        sketch.end_stroke();
        assert!(sketch.extend_stroke(Point::new(9, 9)).is_none());

        assert_eq!(sketch.segments().len(), 2);
        assert_eq!(sketch.segments()[1].from, Point::new(1, 1));

        let undone = sketch.undo_last_segment().unwrap();
        assert_eq!(undone.to, Point::new(2, 3));
        assert_eq!(sketch.segments().len(), 1);

        sketch.clear();
        assert!(sketch.segments().is_empty());
        assert!(sketch.undo_last_segment().is_none());
    }
}
