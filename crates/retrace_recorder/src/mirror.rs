//! Capability discovery.
//!
//! Walks a surface's capability layers once, at construction, and keeps the
//! canonical (`'static`) names of everything the facade mirrors.

use indexmap::IndexSet;
use retrace_core::Surface;

/// Operations and properties mirrored from a surface.
#[derive(Clone, Debug, Default)]
pub struct CapabilityRegistry {
    operations: IndexSet<&'static str>,
    properties: IndexSet<&'static str>,
    /// Properties holding a bool, number or string at discovery time.
    primitive_properties: IndexSet<&'static str>,
}

impl CapabilityRegistry {
    /// Enumerate every layer up to (not including) the generic root.
    ///
    /// A member redeclared by an ancestor layer is registered once.
    pub fn discover<S: Surface + ?Sized>(surface: &S) -> Self {
        let mut registry = Self::default();

        for layer in surface.capability_layers() {
            if layer.root {
                break;
            }
            registry.operations.extend(layer.operations.iter().copied());

            for &name in layer.properties {
                if !registry.properties.insert(name) {
                    continue;
                }
                let primitive = surface
                    .property(name)
                    .map(|value| value.is_primitive())
                    .unwrap_or(false);
                if primitive {
                    registry.primitive_properties.insert(name);
                }
            }
        }

        tracing::debug!(
            target: "retrace_recorder::mirror",
            operations = registry.operations.len(),
            properties = registry.properties.len(),
            primitive = registry.primitive_properties.len(),
            "capabilities mirrored"
        );

        registry
    }

    /// Canonical name of a mirrored operation.
    pub fn operation(&self, name: &str) -> Option<&'static str> {
        self.operations.get(name).copied()
    }

    /// Canonical name of a mirrored property.
    pub fn property(&self, name: &str) -> Option<&'static str> {
        self.properties.get(name).copied()
    }

    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.iter().copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().copied()
    }

    pub fn primitive_properties(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.primitive_properties.iter().copied()
    }

    pub fn is_primitive(&self, name: &str) -> bool {
        self.primitive_properties.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_core::{Affine2D, CapabilityLayer, LiveGradient, SurfaceError, Value};

    /// Minimal surface with a three-level hierarchy and an overridden member.
    struct Layered;

    const LAYERS: &[CapabilityLayer] = &[
        CapabilityLayer {
            name: "Leaf",
            operations: &["draw", "reset"],
            properties: &["color", "pattern"],
            root: false,
        },
        CapabilityLayer {
            name: "Base",
            operations: &["reset", "save", "restore"],
            properties: &["width", "color"],
            root: false,
        },
        CapabilityLayer::OBJECT_ROOT,
        CapabilityLayer {
            name: "Unreachable",
            operations: &["hidden"],
            properties: &[],
            root: false,
        },
    ];

    impl Surface for Layered {
        fn capability_layers(&self) -> &'static [CapabilityLayer] {
            LAYERS
        }

        fn invoke(&mut self, _name: &str, _args: &[Value]) -> Result<Value, SurfaceError> {
            Ok(Value::Null)
        }

        fn property(&self, name: &str) -> Result<Value, SurfaceError> {
            match name {
                "color" => Ok(Value::from("red")),
                "width" => Ok(Value::Number(1.0)),
                "pattern" => Ok(Value::Null),
                _ => Err(SurfaceError::UnknownMember(name.to_string())),
            }
        }

        fn set_property(&mut self, _name: &str, _value: Value) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn transform(&self) -> Affine2D {
            Affine2D::IDENTITY
        }

        fn set_transform(&mut self, _transform: Affine2D) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn add_color_stop(
            &mut self,
            gradient: LiveGradient,
            _offset: f64,
            _color: &Value,
        ) -> Result<(), SurfaceError> {
            Err(SurfaceError::UnknownGradient(gradient))
        }
    }

    #[test]
    fn test_walks_ancestors_until_root() {
        let registry = CapabilityRegistry::discover(&Layered);
        let ops: Vec<_> = registry.operations().collect();
        assert_eq!(ops, vec!["draw", "reset", "save", "restore"]);
        assert!(registry.operation("hidden").is_none());
        assert!(registry.operation("toString").is_none());
    }

    #[test]
    fn test_primitive_registry() {
        let registry = CapabilityRegistry::discover(&Layered);
        let primitive: Vec<_> = registry.primitive_properties().collect();
        assert_eq!(primitive, vec!["color", "width"]);
        assert!(registry.property("pattern").is_some());
        assert!(!registry.is_primitive("pattern"));
    }
}
