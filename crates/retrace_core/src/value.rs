//! Dynamic values exchanged with a surface
//!
//! Arguments, return values and property values all travel as [`Value`].
//! Gradients come in two flavours: [`Value::Gradient`] carries the surface's
//! own live key, [`Value::GradientRef`] carries a recorder-assigned
//! [`GradientId`] that can be re-bound to a different live gradient later.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Affine2D;
use crate::path::{Path, SharedPath};

/// Opaque key of a gradient object owned by a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiveGradient(pub u64);

/// Recorder-assigned gradient identifier, allocated once per factory call
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GradientId(pub u64);

impl fmt::Display for GradientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gradient#{}", self.0)
    }
}

/// A dynamically typed value
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Transform(Affine2D),
    Path(SharedPath),
    Gradient(LiveGradient),
    GradientRef(GradientId),
}

impl Value {
    /// Booleans, numbers and strings
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::Text(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Transform(_) => "transform",
            Value::Path(_) => "path",
            Value::Gradient(_) => "gradient",
            Value::GradientRef(_) => "gradient_ref",
        }
    }

    /// Copy that shares no mutable storage with `self`
    ///
    /// Paths are deep-copied; lists are detached element-wise.
    pub fn detach(&self) -> Value {
        match self {
            Value::Path(path) => Value::Path(path.detached()),
            Value::List(items) => Value::List(items.iter().map(Value::detach).collect()),
            other => other.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|n| n as f32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<Affine2D> {
        match self {
            Value::Transform(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&SharedPath> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<LiveGradient> {
        match self {
            Value::Gradient(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_gradient_ref(&self) -> Option<GradientId> {
        match self {
            Value::GradientRef(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Affine2D> for Value {
    fn from(t: Affine2D) -> Self {
        Value::Transform(t)
    }
}

impl From<SharedPath> for Value {
    fn from(p: SharedPath) -> Self {
        Value::Path(p)
    }
}

impl From<Path> for Value {
    fn from(p: Path) -> Self {
        Value::Path(SharedPath::new(p))
    }
}

impl From<GradientId> for Value {
    fn from(id: GradientId) -> Self {
        Value::GradientRef(id)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_kinds() {
        assert!(Value::from(1.5).is_primitive());
        assert!(Value::from("red").is_primitive());
        assert!(Value::from(true).is_primitive());
        assert!(!Value::Null.is_primitive());
        assert!(!Value::Transform(Affine2D::IDENTITY).is_primitive());
        assert!(!Value::GradientRef(GradientId(1)).is_primitive());
    }

    #[test]
    fn test_detach_copies_paths_inside_lists() {
        let path = SharedPath::new(Path::new().move_to(0.0, 0.0));
        let value = Value::List(vec![Value::Path(path.clone())]);
        let detached = value.detach();
        path.line_to(1.0, 1.0);

        let copy = detached.as_list().and_then(|items| items[0].as_path()).cloned();
        assert_eq!(copy.map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_string(&Value::Number(2.0)).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":2.0}"#);
    }
}
