//! Vector paths
//!
//! [`Path`] is a plain value. [`SharedPath`] is the mutable, shareable form a
//! caller can keep editing after handing it to a surface, the way a canvas
//! `Path2D` object behaves.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Serialize, Serializer};

use crate::geometry::{Affine2D, Point, Rect};

/// Path command for building vector paths
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Circular arc around a center
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        counter_clockwise: bool,
    },
    /// Close the current subpath
    Close,
}

impl PathCommand {
    /// Map every point of the command through `transform`
    pub fn transformed(&self, transform: &Affine2D) -> PathCommand {
        let map = |p: &Point| transform.transform_point(*p);
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
            PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                control: map(control),
                end: map(end),
            },
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: map(control1),
                control2: map(control2),
                end: map(end),
            },
            // Radius is kept as-is; non-uniform scales are not modeled for arcs.
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                counter_clockwise,
            } => PathCommand::Arc {
                center: map(center),
                radius: *radius,
                start_angle: *start_angle,
                end_angle: *end_angle,
                counter_clockwise: *counter_clockwise,
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Append a single command
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Create a rectangle path
    pub fn rect(rect: Rect) -> Self {
        let [a, b, c, d] = rect.corners();
        Self::new()
            .move_to(a.x, a.y)
            .line_to(b.x, b.y)
            .line_to(c.x, c.y)
            .line_to(d.x, d.y)
            .close()
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Copy of this path with every point mapped through `transform`
    pub fn transformed(&self, transform: &Affine2D) -> Path {
        if transform.is_identity() {
            return self.clone();
        }
        Path::from_commands(
            self.commands
                .iter()
                .map(|cmd| cmd.transformed(transform))
                .collect(),
        )
    }
}

/// A path that stays mutable after being shared
///
/// Clones share the same underlying path. Use [`SharedPath::detached`] to get
/// an independent deep copy.
#[derive(Clone, Default)]
pub struct SharedPath {
    inner: Arc<RwLock<Path>>,
}

impl SharedPath {
    pub fn new(path: Path) -> Self {
        Self {
            inner: Arc::new(RwLock::new(path)),
        }
    }

    /// Deep copy with its own storage
    pub fn detached(&self) -> Self {
        Self::new(self.snapshot())
    }

    /// Current contents as a plain path
    pub fn snapshot(&self) -> Path {
        self.inner.read().clone()
    }

    pub fn push(&self, command: PathCommand) {
        self.inner.write().push(command);
    }

    pub fn move_to(&self, x: f32, y: f32) {
        self.push(PathCommand::MoveTo(Point::new(x, y)));
    }

    pub fn line_to(&self, x: f32, y: f32) {
        self.push(PathCommand::LineTo(Point::new(x, y)));
    }

    pub fn close(&self) {
        self.push(PathCommand::Close);
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// True if both handles point at the same storage
    pub fn ptr_eq(&self, other: &SharedPath) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Path> for SharedPath {
    fn from(path: Path) -> Self {
        Self::new(path)
    }
}

impl PartialEq for SharedPath {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.read() == *other.inner.read()
    }
}

impl fmt::Debug for SharedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedPath").field(&*self.inner.read()).finish()
    }
}

impl Serialize for SharedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.read().serialize(serializer)
    }
}
