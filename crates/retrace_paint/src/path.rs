//! Path building
//!
//! PathBuilder provides a fluent API for constructing a [`SharedPath`], the
//! mutable path object passed to `fill`, `stroke` and `clip`.

pub use retrace_core::{Path, PathCommand, Point, SharedPath};

/// Builder for constructing paths with fluent API
///
/// PathBuilder maintains cursor state for relative operations.
pub struct PathBuilder {
    path: Path,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            path: Path::new(),
            current: Point::ZERO,
        }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.path.push(PathCommand::MoveTo(Point::new(x, y)));
        self.current = Point::new(x, y);
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.path.push(PathCommand::LineTo(Point::new(x, y)));
        self.current = Point::new(x, y);
        self
    }

    /// Line relative to the cursor
    pub fn line_by(self, dx: f32, dy: f32) -> Self {
        let Point { x, y } = self.current;
        self.line_to(x + dx, y + dy)
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.path.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self.current = Point::new(x, y);
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        self.path.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end: Point::new(x, y),
        });
        self.current = Point::new(x, y);
        self
    }

    pub fn close(mut self) -> Self {
        self.path.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }

    /// Finish as a shareable path
    pub fn build_shared(self) -> SharedPath {
        SharedPath::new(self.path)
    }

    /// Get the current cursor position
    pub fn current_position(&self) -> Point {
        self.current
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
