//! Recorder configuration presets.

use serde::{Deserialize, Serialize};

/// Configuration for a [`CachedContext`](crate::CachedContext).
///
/// Names here are matched against the wrapped surface's operation names.
/// Names the surface does not have are simply never matched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Operations that change what is painted.
    pub visual_operations: Vec<String>,
    /// The canonical scope-opening operation.
    pub save_operation: String,
    /// The canonical scope-closing operation.
    pub restore_operation: String,
    /// Operations that can only be undone by closing a scope, so an
    /// implicit save is issued before each of them.
    pub scoped_operations: Vec<String>,
    /// Take a checkpoint when the facade is created.
    pub snapshot_on_create: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::canvas2d()
    }
}

impl CacheConfig {
    /// Canvas 2D context naming.
    pub fn canvas2d() -> Self {
        Self {
            visual_operations: [
                "clearRect",
                "drawImage",
                "fill",
                "fillRect",
                "fillText",
                "putImageData",
                "stroke",
                "strokeRect",
                "strokeText",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            save_operation: "save".to_string(),
            restore_operation: "restore".to_string(),
            scoped_operations: vec!["clip".to_string()],
            snapshot_on_create: true,
        }
    }

    /// Plain save/restore tracking, no visual operations.
    pub fn minimal() -> Self {
        Self {
            visual_operations: Vec::new(),
            scoped_operations: Vec::new(),
            ..Self::canvas2d()
        }
    }

    /// Set the visually-mutating operations.
    pub fn with_visual_operations<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.visual_operations = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add an operation that needs an implicit save.
    pub fn with_scoped_operation(mut self, name: impl Into<String>) -> Self {
        self.scoped_operations.push(name.into());
        self
    }

    /// Set the canonical save/restore pair.
    pub fn with_scope_operations(
        mut self,
        save: impl Into<String>,
        restore: impl Into<String>,
    ) -> Self {
        self.save_operation = save.into();
        self.restore_operation = restore.into();
        self
    }

    /// Enable or disable the initial checkpoint.
    pub fn with_snapshot_on_create(mut self, snapshot: bool) -> Self {
        self.snapshot_on_create = snapshot;
        self
    }

    pub fn is_visual(&self, name: &str) -> bool {
        self.visual_operations.iter().any(|n| n == name)
    }

    pub fn is_save(&self, name: &str) -> bool {
        self.save_operation == name
    }

    pub fn is_restore(&self, name: &str) -> bool {
        self.restore_operation == name
    }

    /// Explicit saves and scoped operations both open a scope.
    pub fn opens_scope(&self, name: &str) -> bool {
        self.is_save(name) || self.scoped_operations.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_preset() {
        let config = CacheConfig::default();
        assert!(config.is_visual("fillRect"));
        assert!(!config.is_visual("moveTo"));
        assert!(config.opens_scope("save"));
        assert!(config.opens_scope("clip"));
        assert!(!config.opens_scope("restore"));
        assert!(config.snapshot_on_create);
    }

    #[test]
    fn test_canvas_preset_covers_painting_ops() {
        let config = CacheConfig::canvas2d();
        for name in retrace_paint::VISUAL_OPERATIONS {
            assert!(config.is_visual(name), "{name} not visual");
        }
    }

    #[test]
    fn test_minimal_preset() {
        let config = CacheConfig::minimal();
        assert!(!config.is_visual("fillRect"));
        assert!(!config.opens_scope("clip"));
        assert!(config.opens_scope("save"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"scoped_operations": ["clip", "pushLayer"]}"#).unwrap();
        assert!(config.opens_scope("pushLayer"));
        assert!(config.is_visual("stroke"));
        assert_eq!(config.restore_operation, "restore");
    }
}
