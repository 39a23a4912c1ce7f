//! Drawing state saved and restored by `save`/`restore`

use retrace_core::{Affine2D, Path, SurfaceError, Value};

/// Style properties of the canvas layer
pub const STYLE_PROPERTIES: &[&str] = &[
    "fillStyle",
    "strokeStyle",
    "font",
    "textAlign",
    "textBaseline",
];

/// Line, compositing and shadow properties of the state layer
pub const STATE_PROPERTIES: &[&str] = &[
    "lineWidth",
    "lineCap",
    "lineJoin",
    "miterLimit",
    "lineDashOffset",
    "globalAlpha",
    "globalCompositeOperation",
    "imageSmoothingEnabled",
    "shadowBlur",
    "shadowColor",
    "shadowOffsetX",
    "shadowOffsetY",
];

/// Everything `save` captures
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub fill_style: Value,
    pub stroke_style: Value,
    pub font: String,
    pub text_align: String,
    pub text_baseline: String,
    pub line_width: f64,
    pub line_cap: String,
    pub line_join: String,
    pub miter_limit: f64,
    pub line_dash_offset: f64,
    pub line_dash: Vec<f32>,
    pub global_alpha: f64,
    pub global_composite_operation: String,
    pub image_smoothing_enabled: bool,
    pub shadow_blur: f64,
    pub shadow_color: String,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub transform: Affine2D,
    /// Clip regions in device space, innermost last
    pub clips: Vec<Path>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: Value::from("#000000"),
            stroke_style: Value::from("#000000"),
            font: "10px sans-serif".to_string(),
            text_align: "start".to_string(),
            text_baseline: "alphabetic".to_string(),
            line_width: 1.0,
            line_cap: "butt".to_string(),
            line_join: "miter".to_string(),
            miter_limit: 10.0,
            line_dash_offset: 0.0,
            line_dash: Vec::new(),
            global_alpha: 1.0,
            global_composite_operation: "source-over".to_string(),
            image_smoothing_enabled: true,
            shadow_blur: 0.0,
            shadow_color: "rgba(0, 0, 0, 0)".to_string(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            transform: Affine2D::IDENTITY,
            clips: Vec::new(),
        }
    }
}

impl DrawState {
    /// Read a property by its canvas name
    pub fn get(&self, name: &str) -> Result<Value, SurfaceError> {
        let value = match name {
            "fillStyle" => self.fill_style.clone(),
            "strokeStyle" => self.stroke_style.clone(),
            "font" => Value::from(self.font.as_str()),
            "textAlign" => Value::from(self.text_align.as_str()),
            "textBaseline" => Value::from(self.text_baseline.as_str()),
            "lineWidth" => Value::Number(self.line_width),
            "lineCap" => Value::from(self.line_cap.as_str()),
            "lineJoin" => Value::from(self.line_join.as_str()),
            "miterLimit" => Value::Number(self.miter_limit),
            "lineDashOffset" => Value::Number(self.line_dash_offset),
            "globalAlpha" => Value::Number(self.global_alpha),
            "globalCompositeOperation" => Value::from(self.global_composite_operation.as_str()),
            "imageSmoothingEnabled" => Value::Bool(self.image_smoothing_enabled),
            "shadowBlur" => Value::Number(self.shadow_blur),
            "shadowColor" => Value::from(self.shadow_color.as_str()),
            "shadowOffsetX" => Value::Number(self.shadow_offset_x),
            "shadowOffsetY" => Value::Number(self.shadow_offset_y),
            _ => return Err(SurfaceError::UnknownMember(name.to_string())),
        };
        Ok(value)
    }

    /// Assign a property by its canvas name
    ///
    /// Out-of-range values and values of the wrong kind are ignored the way a
    /// canvas ignores them. Gradient styles are validated by the canvas
    /// before they get here.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        match name {
            "fillStyle" => {
                if let Some(style) = style(value) {
                    self.fill_style = style;
                }
            }
            "strokeStyle" => {
                if let Some(style) = style(value) {
                    self.stroke_style = style;
                }
            }
            "font" => {
                if let Some(font) = text(value) {
                    self.font = font;
                }
            }
            "textAlign" => {
                if let Some(align) = text(value).filter(|a| {
                    matches!(a.as_str(), "start" | "end" | "left" | "right" | "center")
                }) {
                    self.text_align = align;
                }
            }
            "textBaseline" => {
                if let Some(baseline) = text(value) {
                    self.text_baseline = baseline;
                }
            }
            "lineWidth" => {
                if let Some(width) = positive(&value) {
                    self.line_width = width;
                }
            }
            "lineCap" => {
                if let Some(cap) =
                    text(value).filter(|c| matches!(c.as_str(), "butt" | "round" | "square"))
                {
                    self.line_cap = cap;
                }
            }
            "lineJoin" => {
                if let Some(join) =
                    text(value).filter(|j| matches!(j.as_str(), "miter" | "round" | "bevel"))
                {
                    self.line_join = join;
                }
            }
            "miterLimit" => {
                if let Some(limit) = positive(&value) {
                    self.miter_limit = limit;
                }
            }
            "lineDashOffset" => {
                if let Some(offset) = finite(&value) {
                    self.line_dash_offset = offset;
                }
            }
            "globalAlpha" => {
                if let Some(alpha) = value.as_f64().filter(|a| (0.0..=1.0).contains(a)) {
                    self.global_alpha = alpha;
                }
            }
            "globalCompositeOperation" => {
                if let Some(op) = text(value) {
                    self.global_composite_operation = op;
                }
            }
            "imageSmoothingEnabled" => {
                if let Some(enabled) = value.as_bool() {
                    self.image_smoothing_enabled = enabled;
                }
            }
            "shadowBlur" => {
                if let Some(blur) = finite(&value).filter(|b| *b >= 0.0) {
                    self.shadow_blur = blur;
                }
            }
            "shadowColor" => {
                if let Some(color) = text(value) {
                    self.shadow_color = color;
                }
            }
            "shadowOffsetX" => {
                if let Some(offset) = finite(&value) {
                    self.shadow_offset_x = offset;
                }
            }
            "shadowOffsetY" => {
                if let Some(offset) = finite(&value) {
                    self.shadow_offset_y = offset;
                }
            }
            _ => return Err(SurfaceError::UnknownMember(name.to_string())),
        }
        Ok(())
    }
}

fn style(value: Value) -> Option<Value> {
    match value {
        Value::Text(_) | Value::Gradient(_) => Some(value),
        _ => None,
    }
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s),
        _ => None,
    }
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn positive(value: &Value) -> Option<f64> {
    finite(value).filter(|n| *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_property_is_readable() {
        let state = DrawState::default();
        for name in STYLE_PROPERTIES.iter().chain(STATE_PROPERTIES) {
            assert!(state.get(name).is_ok(), "{name} not readable");
        }
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let mut state = DrawState::default();
        state.set("lineWidth", Value::Number(-3.0)).unwrap();
        state.set("globalAlpha", Value::Number(2.0)).unwrap();
        state.set("lineCap", Value::from("pointy")).unwrap();
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.global_alpha, 1.0);
        assert_eq!(state.line_cap, "butt");
    }

    #[test]
    fn test_wrong_kind_is_ignored() {
        let mut state = DrawState::default();
        state.set("lineWidth", Value::from("wide")).unwrap();
        state.set("fillStyle", Value::Number(1.0)).unwrap();
        state.set("imageSmoothingEnabled", Value::from("no")).unwrap();
        assert_eq!(state, DrawState::default());

        let err = state.set("lineHeight", Value::Number(1.0)).unwrap_err();
        assert_eq!(err, SurfaceError::UnknownMember("lineHeight".to_string()));
    }
}
