//! Retrace Paint
//!
//! A reference drawing surface for the retrace recorder, modeled on an HTML
//! canvas 2D context.
//!
//! # Features
//!
//! - Save/restore state stack with clip regions
//! - Path building (lines, curves, arcs) in device space
//! - Fills and strokes with colors or gradients
//! - Transforms (translate, scale, rotate, arbitrary matrices)
//! - [`PaintOp`] output in place of pixels
//!
//! # Example
//!
//! ```rust
//! use retrace_paint::{Canvas2D, CanvasExt};
//!
//! let mut ctx = Canvas2D::new(800, 600);
//! ctx.set_fill_style("blue").unwrap();
//! ctx.translate(50.0, 50.0).unwrap();
//! ctx.fill_rect(0.0, 0.0, 80.0, 40.0).unwrap();
//!
//! assert_eq!(ctx.ops().len(), 1);
//! ```

pub mod context;
pub mod ext;
pub mod gradient;
pub mod ops;
pub mod path;
pub mod state;

pub use context::{Canvas2D, CANVAS_LAYERS};
pub use ext::CanvasExt;
pub use gradient::{CanvasGradient, GradientKey, GradientKind, GradientStop};
pub use ops::{Paint, PaintOp};
pub use path::PathBuilder;
pub use state::DrawState;

/// Operations of [`Canvas2D`] that change what is painted
pub const VISUAL_OPERATIONS: &[&str] = &[
    "clearRect",
    "fill",
    "fillRect",
    "fillText",
    "stroke",
    "strokeRect",
    "strokeText",
];
