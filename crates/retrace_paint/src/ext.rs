//! Typed canvas calls over any [`Dispatch`] target
//!
//! The same helpers drive a bare [`Canvas2D`](crate::Canvas2D) and a
//! recording wrapper around one.

use retrace_core::{Dispatch, SharedPath, Value};

/// Canvas-style convenience methods
pub trait CanvasExt: Dispatch {
    fn save(&mut self) -> Result<(), Self::Error> {
        self.call("save", &[]).map(drop)
    }

    fn restore(&mut self) -> Result<(), Self::Error> {
        self.call("restore", &[]).map(drop)
    }

    fn clip(&mut self) -> Result<(), Self::Error> {
        self.call("clip", &[]).map(drop)
    }

    fn clip_path(&mut self, path: &SharedPath) -> Result<(), Self::Error> {
        self.call("clip", &[Value::Path(path.clone())]).map(drop)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<(), Self::Error> {
        self.call("fillRect", &[x.into(), y.into(), w.into(), h.into()])
            .map(drop)
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<(), Self::Error> {
        self.call("strokeRect", &[x.into(), y.into(), w.into(), h.into()])
            .map(drop)
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<(), Self::Error> {
        self.call("clearRect", &[x.into(), y.into(), w.into(), h.into()])
            .map(drop)
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), Self::Error> {
        self.call("fillText", &[text.into(), x.into(), y.into()])
            .map(drop)
    }

    fn begin_path(&mut self) -> Result<(), Self::Error> {
        self.call("beginPath", &[]).map(drop)
    }

    fn move_to(&mut self, x: f32, y: f32) -> Result<(), Self::Error> {
        self.call("moveTo", &[x.into(), y.into()]).map(drop)
    }

    fn line_to(&mut self, x: f32, y: f32) -> Result<(), Self::Error> {
        self.call("lineTo", &[x.into(), y.into()]).map(drop)
    }

    fn fill(&mut self) -> Result<(), Self::Error> {
        self.call("fill", &[]).map(drop)
    }

    fn fill_path(&mut self, path: &SharedPath) -> Result<(), Self::Error> {
        self.call("fill", &[Value::Path(path.clone())]).map(drop)
    }

    fn stroke(&mut self) -> Result<(), Self::Error> {
        self.call("stroke", &[]).map(drop)
    }

    fn translate(&mut self, x: f32, y: f32) -> Result<(), Self::Error> {
        self.call("translate", &[x.into(), y.into()]).map(drop)
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), Self::Error> {
        self.call("scale", &[sx.into(), sy.into()]).map(drop)
    }

    /// Rotate by `angle` radians
    fn rotate(&mut self, angle: f32) -> Result<(), Self::Error> {
        self.call("rotate", &[angle.into()]).map(drop)
    }

    fn reset_transform(&mut self) -> Result<(), Self::Error> {
        self.call("resetTransform", &[]).map(drop)
    }

    /// Returns the gradient value to assign to a style property
    fn create_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    ) -> Result<Value, Self::Error> {
        self.call(
            "createLinearGradient",
            &[x0.into(), y0.into(), x1.into(), y1.into()],
        )
    }

    fn set_fill_style(&mut self, style: impl Into<Value>) -> Result<(), Self::Error> {
        self.set("fillStyle", style.into())
    }

    fn set_stroke_style(&mut self, style: impl Into<Value>) -> Result<(), Self::Error> {
        self.set("strokeStyle", style.into())
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), Self::Error> {
        self.set("lineWidth", Value::Number(width))
    }

    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), Self::Error> {
        self.set("globalAlpha", Value::Number(alpha))
    }
}

impl<T: Dispatch + ?Sized> CanvasExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Canvas2D;

    #[test]
    fn test_ext_on_bare_canvas() {
        let mut canvas = Canvas2D::default();
        canvas.save().unwrap();
        canvas.set_fill_style("green").unwrap();
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0).unwrap();
        canvas.restore().unwrap();

        assert_eq!(canvas.ops().len(), 1);
        assert_eq!(canvas.invoked(), ["save", "fillRect", "restore"]);
    }
}
