//! Retrace Core
//!
//! Shared vocabulary for the retrace workspace:
//!
//! - **Values**: the tagged [`Value`] type passed to and returned from surfaces
//! - **Paths**: vector [`Path`]s and the shareable, mutable [`SharedPath`]
//! - **Geometry**: [`Point`], [`Rect`] and the [`Affine2D`] transform matrix
//! - **Surface contract**: the [`Surface`] trait and its capability layers
//!
//! # Example
//!
//! ```rust
//! use retrace_core::{Path, SharedPath, Value};
//!
//! let path = SharedPath::new(Path::new().move_to(0.0, 0.0));
//! let arg = Value::from(path.clone());
//!
//! // Later edits to `path` are visible through `arg`, but not through a detached copy
//! let frozen = arg.detach();
//! path.line_to(10.0, 10.0);
//! assert_eq!(frozen.as_path().map(|p| p.len()), Some(1));
//! ```

pub mod error;
pub mod geometry;
pub mod path;
pub mod surface;
pub mod value;

pub use error::SurfaceError;
pub use geometry::{Affine2D, Point, Rect};
pub use path::{Path, PathCommand, SharedPath};
pub use surface::{CapabilityLayer, Dispatch, Surface};
pub use value::{GradientId, LiveGradient, Value};
