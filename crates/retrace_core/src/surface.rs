//! The drawing surface contract
//!
//! A [`Surface`] is a stateful, imperative drawing context. It declares what
//! it can do through a chain of [`CapabilityLayer`]s, most-derived first,
//! ending in a root layer that stands for the generic object base and is
//! never mirrored. Everything else is dispatched by name.

use crate::error::SurfaceError;
use crate::geometry::Affine2D;
use crate::value::{LiveGradient, Value};

/// One level of a surface's capability hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapabilityLayer {
    /// Name of the type this layer belongs to
    pub name: &'static str,
    /// Operations declared at this level
    pub operations: &'static [&'static str],
    /// Properties declared at this level
    pub properties: &'static [&'static str],
    /// Marks the generic root; enumeration stops here
    pub root: bool,
}

impl CapabilityLayer {
    /// The conventional generic root layer
    pub const OBJECT_ROOT: CapabilityLayer = CapabilityLayer {
        name: "Object",
        operations: &["hasOwnProperty", "toString", "valueOf"],
        properties: &[],
        root: true,
    };
}

/// A stateful drawing context that can be wrapped and recorded
pub trait Surface {
    /// Capability layers, most-derived first
    fn capability_layers(&self) -> &'static [CapabilityLayer];

    /// Invoke a named operation
    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, SurfaceError>;

    /// Read the current value of a property
    fn property(&self, name: &str) -> Result<Value, SurfaceError>;

    /// Assign a property
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), SurfaceError>;

    /// Current transform matrix
    fn transform(&self) -> Affine2D;

    /// Replace the current transform matrix
    fn set_transform(&mut self, transform: Affine2D) -> Result<(), SurfaceError>;

    /// Add a color stop to a gradient this surface created
    fn add_color_stop(
        &mut self,
        gradient: LiveGradient,
        offset: f64,
        color: &Value,
    ) -> Result<(), SurfaceError>;
}

/// Name-based access shared by raw surfaces and wrappers around them
///
/// Lets code drive either a bare surface or a recording facade through the
/// same calls.
pub trait Dispatch {
    type Error;

    /// Invoke a named operation
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Self::Error>;

    /// Read a property
    fn get(&self, name: &str) -> Result<Value, Self::Error>;

    /// Assign a property
    fn set(&mut self, name: &str, value: Value) -> Result<(), Self::Error>;
}
