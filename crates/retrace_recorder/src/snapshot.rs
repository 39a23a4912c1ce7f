//! Checkpoint capture and restore.

use indexmap::IndexMap;
use retrace_core::{Surface, SurfaceError};

use crate::log::StateSnapshot;
use crate::mirror::CapabilityRegistry;

impl StateSnapshot {
    /// Read every primitive-typed property and the transform.
    ///
    /// A property that was readable at discovery but fails now is left out
    /// of the snapshot.
    pub fn capture<S: Surface + ?Sized>(
        surface: &S,
        registry: &CapabilityRegistry,
        index: u64,
    ) -> Self {
        let mut properties = IndexMap::new();
        for name in registry.primitive_properties() {
            match surface.property(name) {
                Ok(value) => {
                    properties.insert(name, value);
                }
                Err(err) => tracing::warn!(
                    target: "retrace_recorder::record",
                    property = name,
                    error = %err,
                    "property skipped in snapshot"
                ),
            }
        }

        Self {
            index,
            properties,
            transform: surface.transform(),
        }
    }

    /// Write every captured value back, then the transform.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        for (name, value) in &self.properties {
            surface.set_property(name, value.clone())?;
        }
        surface.set_transform(self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_core::{Affine2D, Value};
    use retrace_paint::Canvas2D;

    #[test]
    fn test_capture_and_apply() {
        let mut canvas = Canvas2D::default();
        let registry = CapabilityRegistry::discover(&canvas);

        canvas.set_property("lineWidth", Value::Number(3.0)).unwrap();
        canvas.set_transform(Affine2D::translation(4.0, 4.0)).unwrap();
        let snapshot = StateSnapshot::capture(&canvas, &registry, 7);
        assert_eq!(snapshot.index, 7);
        assert_eq!(snapshot.properties.get("lineWidth"), Some(&Value::Number(3.0)));

        canvas.set_property("lineWidth", Value::Number(9.0)).unwrap();
        canvas.set_transform(Affine2D::IDENTITY).unwrap();
        snapshot.apply(&mut canvas).unwrap();

        assert_eq!(canvas.property("lineWidth"), Ok(Value::Number(3.0)));
        assert_eq!(canvas.transform(), Affine2D::translation(4.0, 4.0));
    }
}
