//! Canvas2D - an in-memory, canvas-like drawing surface
//!
//! Canvas2D keeps the full drawing state of a 2D canvas context (styles,
//! transform, clip stack, current path, gradients) and records what each
//! visually-mutating call would paint as a [`PaintOp`].

use retrace_core::{
    Affine2D, CapabilityLayer, Dispatch, LiveGradient, Path, PathCommand, Point, Rect, Surface,
    SurfaceError, Value,
};
use slotmap::SlotMap;

use crate::gradient::{CanvasGradient, GradientKey, GradientKind};
use crate::ops::{Paint, PaintOp};
use crate::state::{DrawState, STATE_PROPERTIES, STYLE_PROPERTIES};

/// Capability hierarchy of [`Canvas2D`], most-derived first
pub const CANVAS_LAYERS: &[CapabilityLayer] = &[
    CapabilityLayer {
        name: "Canvas2D",
        operations: &[
            "fillRect",
            "strokeRect",
            "clearRect",
            "fillText",
            "strokeText",
            "beginPath",
            "closePath",
            "moveTo",
            "lineTo",
            "rect",
            "arc",
            "quadraticCurveTo",
            "bezierCurveTo",
            "fill",
            "stroke",
            "clip",
            "createLinearGradient",
            "createRadialGradient",
        ],
        properties: STYLE_PROPERTIES,
        root: false,
    },
    CapabilityLayer {
        name: "CanvasState",
        operations: &[
            "save",
            "restore",
            "translate",
            "scale",
            "rotate",
            "transform",
            "setTransform",
            "resetTransform",
            "getTransform",
            "setLineDash",
            "getLineDash",
        ],
        properties: STATE_PROPERTIES,
        root: false,
    },
    CapabilityLayer::OBJECT_ROOT,
];

/// The paint context used as a reference drawing surface
#[derive(Debug)]
pub struct Canvas2D {
    width: u32,
    height: u32,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Path,
    gradients: SlotMap<GradientKey, CanvasGradient>,
    ops: Vec<PaintOp>,
    invoked: Vec<String>,
}

impl Canvas2D {
    /// Create a canvas with the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: DrawState::default(),
            stack: Vec::new(),
            path: Path::new(),
            gradients: SlotMap::with_key(),
            ops: Vec::new(),
            invoked: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current drawing state
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Number of states saved and not yet restored
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current path in device space
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    /// Everything painted so far
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Take ownership of painted ops
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    /// Names of every operation invoked, in call order
    pub fn invoked(&self) -> &[String] {
        &self.invoked
    }

    /// Number of times `name` was invoked
    pub fn invocation_count(&self, name: &str) -> usize {
        self.invoked.iter().filter(|n| *n == name).count()
    }

    pub fn gradient(&self, live: LiveGradient) -> Option<&CanvasGradient> {
        self.gradients.get(GradientKey::from_live(live))
    }

    pub fn gradient_count(&self) -> usize {
        self.gradients.len()
    }

    fn paint(&self, style: &Value) -> Paint {
        match style {
            Value::Gradient(live) => match self.gradient(*live) {
                Some(g) => Paint::Gradient(g.clone()),
                None => Paint::Color("#000000".to_string()),
            },
            Value::Text(color) => Paint::Color(color.clone()),
            _ => Paint::Color("#000000".to_string()),
        }
    }

    fn fill_paint(&self) -> Paint {
        self.paint(&self.state.fill_style)
    }

    fn stroke_paint(&self) -> Paint {
        self.paint(&self.state.stroke_style)
    }

    fn alpha(&self) -> f32 {
        self.state.global_alpha as f32
    }

    fn to_device(&self, point: Point) -> Point {
        self.state.transform.transform_point(point)
    }

    fn push_path(&mut self, command: PathCommand) {
        let command = command.transformed(&self.state.transform);
        self.path.push(command);
    }

    fn apply_transform(&mut self, t: Affine2D) {
        self.state.transform = self.state.transform.then(&t);
    }

    /// Path argument in device space, or the current path
    fn target_path(&self, op: &str, args: &[Value]) -> Result<Path, SurfaceError> {
        match args.first() {
            None | Some(Value::Text(_)) => Ok(self.path.clone()),
            Some(Value::Path(p)) => Ok(p.snapshot().transformed(&self.state.transform)),
            Some(_) => Err(SurfaceError::type_mismatch(op, "path")),
        }
    }

    fn check_gradient(&self, value: &Value) -> Result<(), SurfaceError> {
        if let Value::Gradient(live) = value {
            if self.gradient(*live).is_none() {
                return Err(SurfaceError::UnknownGradient(*live));
            }
        }
        Ok(())
    }

    fn create_gradient(&mut self, kind: GradientKind) -> Value {
        let key = self.gradients.insert(CanvasGradient::new(kind));
        Value::Gradient(key.to_live())
    }
}

impl Default for Canvas2D {
    fn default() -> Self {
        Self::new(300, 150)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn expect_args(op: &str, args: &[Value], count: usize) -> Result<(), SurfaceError> {
    if args.len() < count {
        return Err(SurfaceError::invalid_argument(
            op,
            format!("expected {count} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

fn num(op: &str, args: &[Value], i: usize) -> Result<f32, SurfaceError> {
    args.get(i)
        .and_then(Value::as_f32)
        .ok_or_else(|| SurfaceError::invalid_argument(op, format!("argument {i} must be a number")))
}

fn nums<const N: usize>(op: &str, args: &[Value]) -> Result<[f32; N], SurfaceError> {
    expect_args(op, args, N)?;
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = num(op, args, i)?;
    }
    Ok(out)
}

fn rect_arg(op: &str, args: &[Value]) -> Result<Rect, SurfaceError> {
    let [x, y, w, h] = nums::<4>(op, args)?;
    Ok(Rect::new(x, y, w, h))
}

fn text_arg(op: &str, args: &[Value]) -> Result<(String, Point), SurfaceError> {
    expect_args(op, args, 3)?;
    let text = match &args[0] {
        Value::Text(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(SurfaceError::type_mismatch(op, "text")),
    };
    Ok((text, Point::new(num(op, args, 1)?, num(op, args, 2)?)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Surface Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Surface for Canvas2D {
    fn capability_layers(&self) -> &'static [CapabilityLayer] {
        CANVAS_LAYERS
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, SurfaceError> {
        self.invoked.push(name.to_string());

        match name {
            // State
            "save" => self.stack.push(self.state.clone()),
            "restore" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "clip" => {
                let region = self.target_path(name, args)?;
                self.state.clips.push(region);
            }

            // Transforms
            "translate" => {
                let [x, y] = nums(name, args)?;
                self.apply_transform(Affine2D::translation(x, y));
            }
            "scale" => {
                let [sx, sy] = nums(name, args)?;
                self.apply_transform(Affine2D::scale(sx, sy));
            }
            "rotate" => {
                let [angle] = nums(name, args)?;
                self.apply_transform(Affine2D::rotation(angle));
            }
            "transform" => {
                let [a, b, c, d, e, f] = nums(name, args)?;
                self.apply_transform(Affine2D::new(a, b, c, d, e, f));
            }
            "setTransform" => {
                let t = match args {
                    [] => Affine2D::IDENTITY,
                    [Value::Transform(t)] => *t,
                    _ => {
                        let [a, b, c, d, e, f] = nums(name, args)?;
                        Affine2D::new(a, b, c, d, e, f)
                    }
                };
                self.state.transform = t;
            }
            "resetTransform" => self.state.transform = Affine2D::IDENTITY,
            "getTransform" => return Ok(Value::Transform(self.state.transform)),

            // Line dash
            "setLineDash" => {
                let segments = args
                    .first()
                    .and_then(Value::as_list)
                    .ok_or_else(|| SurfaceError::type_mismatch(name, "list"))?;
                let mut dash = Vec::with_capacity(segments.len() * 2);
                for segment in segments {
                    match segment.as_f32() {
                        Some(n) if n.is_finite() && n >= 0.0 => dash.push(n),
                        // a canvas ignores the whole call on any bad segment
                        _ => return Ok(Value::Null),
                    }
                }
                if dash.len() % 2 == 1 {
                    dash.extend_from_within(..);
                }
                self.state.line_dash = dash;
            }
            "getLineDash" => {
                return Ok(Value::List(
                    self.state.line_dash.iter().map(|n| Value::from(*n)).collect(),
                ))
            }

            // Paths
            "beginPath" => self.path = Path::new(),
            "closePath" => self.path.push(PathCommand::Close),
            "moveTo" => {
                let [x, y] = nums(name, args)?;
                self.push_path(PathCommand::MoveTo(Point::new(x, y)));
            }
            "lineTo" => {
                let [x, y] = nums(name, args)?;
                self.push_path(PathCommand::LineTo(Point::new(x, y)));
            }
            "rect" => {
                let rect = rect_arg(name, args)?;
                let [a, b, c, d] = rect.corners();
                self.push_path(PathCommand::MoveTo(a));
                self.push_path(PathCommand::LineTo(b));
                self.push_path(PathCommand::LineTo(c));
                self.push_path(PathCommand::LineTo(d));
                self.path.push(PathCommand::Close);
            }
            "arc" => {
                let [x, y, radius, start_angle, end_angle] = nums(name, args)?;
                if radius < 0.0 {
                    return Err(SurfaceError::invalid_argument(name, "negative radius"));
                }
                let counter_clockwise = args.get(5).and_then(Value::as_bool).unwrap_or(false);
                self.push_path(PathCommand::Arc {
                    center: Point::new(x, y),
                    radius,
                    start_angle,
                    end_angle,
                    counter_clockwise,
                });
            }
            "quadraticCurveTo" => {
                let [cx, cy, x, y] = nums(name, args)?;
                self.push_path(PathCommand::QuadTo {
                    control: Point::new(cx, cy),
                    end: Point::new(x, y),
                });
            }
            "bezierCurveTo" => {
                let [c1x, c1y, c2x, c2y, x, y] = nums(name, args)?;
                self.push_path(PathCommand::CubicTo {
                    control1: Point::new(c1x, c1y),
                    control2: Point::new(c2x, c2y),
                    end: Point::new(x, y),
                });
            }

            // Painting
            "fill" => {
                let path = self.target_path(name, args)?;
                self.ops.push(PaintOp::FillPath {
                    path,
                    paint: self.fill_paint(),
                    alpha: self.alpha(),
                    clip_depth: self.state.clips.len(),
                });
            }
            "stroke" => {
                let path = self.target_path(name, args)?;
                self.ops.push(PaintOp::StrokePath {
                    path,
                    paint: self.stroke_paint(),
                    line_width: self.state.line_width as f32,
                    line_dash: self.state.line_dash.clone(),
                    alpha: self.alpha(),
                    clip_depth: self.state.clips.len(),
                });
            }
            "fillRect" => {
                let rect = rect_arg(name, args)?;
                self.ops.push(PaintOp::FillRect {
                    rect,
                    transform: self.state.transform,
                    paint: self.fill_paint(),
                    alpha: self.alpha(),
                });
            }
            "strokeRect" => {
                let rect = rect_arg(name, args)?;
                self.ops.push(PaintOp::StrokeRect {
                    rect,
                    transform: self.state.transform,
                    paint: self.stroke_paint(),
                    line_width: self.state.line_width as f32,
                    alpha: self.alpha(),
                });
            }
            "clearRect" => {
                let rect = rect_arg(name, args)?;
                self.ops.push(PaintOp::ClearRect {
                    rect,
                    transform: self.state.transform,
                });
            }
            "fillText" => {
                let (text, origin) = text_arg(name, args)?;
                self.ops.push(PaintOp::FillText {
                    text,
                    origin: self.to_device(origin),
                    font: self.state.font.clone(),
                    paint: self.fill_paint(),
                    alpha: self.alpha(),
                });
            }
            "strokeText" => {
                let (text, origin) = text_arg(name, args)?;
                self.ops.push(PaintOp::StrokeText {
                    text,
                    origin: self.to_device(origin),
                    font: self.state.font.clone(),
                    paint: self.stroke_paint(),
                    line_width: self.state.line_width as f32,
                    alpha: self.alpha(),
                });
            }

            // Gradient factories
            "createLinearGradient" => {
                let [x0, y0, x1, y1] = nums(name, args)?;
                return Ok(self.create_gradient(GradientKind::Linear {
                    start: Point::new(x0, y0),
                    end: Point::new(x1, y1),
                }));
            }
            "createRadialGradient" => {
                let [x0, y0, r0, x1, y1, r1] = nums(name, args)?;
                if r0 < 0.0 || r1 < 0.0 {
                    return Err(SurfaceError::invalid_argument(name, "negative radius"));
                }
                return Ok(self.create_gradient(GradientKind::Radial {
                    start: Point::new(x0, y0),
                    start_radius: r0,
                    end: Point::new(x1, y1),
                    end_radius: r1,
                }));
            }

            _ => {
                self.invoked.pop();
                return Err(SurfaceError::UnknownMember(name.to_string()));
            }
        }

        Ok(Value::Null)
    }

    fn property(&self, name: &str) -> Result<Value, SurfaceError> {
        self.state.get(name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        self.check_gradient(&value)?;
        self.state.set(name, value)
    }

    fn transform(&self) -> Affine2D {
        self.state.transform
    }

    fn set_transform(&mut self, transform: Affine2D) -> Result<(), SurfaceError> {
        self.state.transform = transform;
        Ok(())
    }

    fn add_color_stop(
        &mut self,
        gradient: LiveGradient,
        offset: f64,
        color: &Value,
    ) -> Result<(), SurfaceError> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(SurfaceError::invalid_argument(
                "addColorStop",
                format!("offset {offset} outside 0..=1"),
            ));
        }
        let color = color
            .as_str()
            .ok_or_else(|| SurfaceError::type_mismatch("addColorStop", "text"))?;
        let target = self
            .gradients
            .get_mut(GradientKey::from_live(gradient))
            .ok_or(SurfaceError::UnknownGradient(gradient))?;
        target.add_stop(offset as f32, color);
        tracing::trace!(
            target: "retrace_paint::gradient",
            ?gradient,
            offset,
            color,
            "color stop added"
        );
        Ok(())
    }
}

impl Dispatch for Canvas2D {
    type Error = SurfaceError;

    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, SurfaceError> {
        self.invoke(name, args)
    }

    fn get(&self, name: &str) -> Result<Value, SurfaceError> {
        self.property(name)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        self.set_property(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_core::SharedPath;

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas2D::new(800, 600);
        assert_eq!((canvas.width(), canvas.height()), (800, 600));
        assert_eq!(canvas.save_depth(), 0);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = Canvas2D::default();
        canvas.set_property("fillStyle", Value::from("red")).unwrap();
        canvas
            .invoke("fillRect", &[10.into(), 20.into(), 100.into(), 50.into()])
            .unwrap();

        assert_eq!(canvas.ops().len(), 1);
        assert_eq!(
            canvas.ops()[0].paint(),
            Some(&Paint::Color("red".to_string()))
        );
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut canvas = Canvas2D::default();
        canvas.invoke("save", &[]).unwrap();
        canvas.set_property("lineWidth", Value::Number(4.0)).unwrap();
        canvas.invoke("translate", &[5.into(), 5.into()]).unwrap();
        assert_eq!(canvas.save_depth(), 1);

        canvas.invoke("restore", &[]).unwrap();
        assert_eq!(canvas.save_depth(), 0);
        assert_eq!(canvas.state().line_width, 1.0);
        assert!(canvas.transform().is_identity());

        // Unbalanced restore is a no-op
        canvas.invoke("restore", &[]).unwrap();
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn test_path_points_use_current_transform() {
        let mut canvas = Canvas2D::default();
        canvas.invoke("translate", &[10.into(), 0.into()]).unwrap();
        canvas.invoke("moveTo", &[1.into(), 1.into()]).unwrap();
        assert_eq!(
            canvas.current_path().commands()[0],
            PathCommand::MoveTo(Point::new(11.0, 1.0))
        );
    }

    #[test]
    fn test_fill_with_path_argument() {
        let mut canvas = Canvas2D::default();
        let path = SharedPath::new(Path::rect(Rect::new(0.0, 0.0, 4.0, 4.0)));
        canvas.invoke("fill", &[Value::Path(path)]).unwrap();
        match &canvas.ops()[0] {
            PaintOp::FillPath { path, .. } => assert_eq!(path.len(), 5),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_gradient_fill() {
        let mut canvas = Canvas2D::default();
        let gradient = canvas
            .invoke(
                "createLinearGradient",
                &[0.into(), 0.into(), 10.into(), 0.into()],
            )
            .unwrap();
        let live = gradient.as_gradient().unwrap();
        canvas.add_color_stop(live, 0.0, &Value::from("red")).unwrap();
        canvas.add_color_stop(live, 1.0, &Value::from("blue")).unwrap();
        canvas.set_property("fillStyle", gradient).unwrap();
        canvas
            .invoke("fillRect", &[0.into(), 0.into(), 10.into(), 10.into()])
            .unwrap();

        let painted = canvas.ops()[0].paint().and_then(Paint::as_gradient).unwrap();
        assert_eq!(painted.stops.len(), 2);
    }

    #[test]
    fn test_color_stop_offset_is_validated() {
        let mut canvas = Canvas2D::default();
        let live = canvas
            .invoke(
                "createRadialGradient",
                &[0, 0, 0, 0, 0, 1].map(Value::from),
            )
            .unwrap()
            .as_gradient()
            .unwrap();
        assert!(canvas.add_color_stop(live, 1.5, &Value::from("red")).is_err());
    }

    #[test]
    fn test_foreign_gradient_is_rejected() {
        let mut canvas = Canvas2D::default();
        let err = canvas
            .set_property("fillStyle", Value::Gradient(LiveGradient(u64::MAX)))
            .unwrap_err();
        assert!(matches!(err, SurfaceError::UnknownGradient(_)));
    }

    #[test]
    fn test_line_dash_odd_length_is_doubled() {
        let mut canvas = Canvas2D::default();
        canvas
            .invoke("setLineDash", &[Value::from(vec![5.0, 10.0, 15.0])])
            .unwrap();
        let dash = canvas.invoke("getLineDash", &[]).unwrap();
        assert_eq!(dash.as_list().map(<[Value]>::len), Some(6));
    }

    #[test]
    fn test_unknown_operation() {
        let mut canvas = Canvas2D::default();
        let err = canvas.invoke("explode", &[]).unwrap_err();
        assert_eq!(err, SurfaceError::UnknownMember("explode".to_string()));
        assert!(canvas.invoked().is_empty());
    }

    #[test]
    fn test_declared_operations_are_dispatched() {
        // Every declared operation must be known to invoke(); bad arguments are fine.
        for layer in CANVAS_LAYERS.iter().filter(|l| !l.root) {
            for op in layer.operations {
                let mut canvas = Canvas2D::default();
                let result = canvas.invoke(op, &[]);
                assert!(
                    !matches!(result, Err(SurfaceError::UnknownMember(_))),
                    "{op} is declared but not dispatched"
                );
            }
        }
    }
}
