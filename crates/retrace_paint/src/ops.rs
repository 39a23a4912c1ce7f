//! Paint output of a [`Canvas2D`](crate::Canvas2D)
//!
//! The reference canvas has no pixel buffer. Each visually-mutating call
//! emits a [`PaintOp`] describing what would have been painted, with every
//! coordinate already in device space.

use retrace_core::{Affine2D, Path, Point, Rect};
use serde::Serialize;

use crate::gradient::CanvasGradient;

/// What a fill or stroke was painted with
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Paint {
    Color(String),
    Gradient(CanvasGradient),
}

impl Paint {
    pub fn as_gradient(&self) -> Option<&CanvasGradient> {
        match self {
            Paint::Gradient(g) => Some(g),
            Paint::Color(_) => None,
        }
    }
}

/// A painted operation
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    FillRect {
        rect: Rect,
        transform: Affine2D,
        paint: Paint,
        alpha: f32,
    },
    StrokeRect {
        rect: Rect,
        transform: Affine2D,
        paint: Paint,
        line_width: f32,
        alpha: f32,
    },
    ClearRect {
        rect: Rect,
        transform: Affine2D,
    },
    FillPath {
        path: Path,
        paint: Paint,
        alpha: f32,
        clip_depth: usize,
    },
    StrokePath {
        path: Path,
        paint: Paint,
        line_width: f32,
        line_dash: Vec<f32>,
        alpha: f32,
        clip_depth: usize,
    },
    FillText {
        text: String,
        origin: Point,
        font: String,
        paint: Paint,
        alpha: f32,
    },
    StrokeText {
        text: String,
        origin: Point,
        font: String,
        paint: Paint,
        line_width: f32,
        alpha: f32,
    },
}

impl PaintOp {
    /// Name of the canvas operation that produced this op
    pub fn operation(&self) -> &'static str {
        match self {
            PaintOp::FillRect { .. } => "fillRect",
            PaintOp::StrokeRect { .. } => "strokeRect",
            PaintOp::ClearRect { .. } => "clearRect",
            PaintOp::FillPath { .. } => "fill",
            PaintOp::StrokePath { .. } => "stroke",
            PaintOp::FillText { .. } => "fillText",
            PaintOp::StrokeText { .. } => "strokeText",
        }
    }

    /// Paint used, if the op paints anything
    pub fn paint(&self) -> Option<&Paint> {
        match self {
            PaintOp::FillRect { paint, .. }
            | PaintOp::StrokeRect { paint, .. }
            | PaintOp::FillPath { paint, .. }
            | PaintOp::StrokePath { paint, .. }
            | PaintOp::FillText { paint, .. }
            | PaintOp::StrokeText { paint, .. } => Some(paint),
            PaintOp::ClearRect { .. } => None,
        }
    }
}
