//! CachedContext - a recording facade over a drawing surface
//!
//! CachedContext mirrors the operations and properties of the surface it
//! wraps. Every call and every assignment made through it is forwarded to the
//! surface and appended to a [`CommandLog`], which can later be replayed in
//! whole or in part against the same surface.

use retrace_core::{Affine2D, Dispatch, GradientId, Surface, Value};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::export::LogExport;
use crate::gradient::{resolve_value, GradientHandle, GradientRegistry};
use crate::log::{ColorStop, CommandLog, FunctionCall, LogEntry, PropertyChange, StateSnapshot};
use crate::mirror::CapabilityRegistry;
use crate::replay::{ReplayReport, Replayer};
use crate::scope::{SaveStack, SaveStackEntry};

/// Recording facade owning one surface.
///
/// The facade must be the only thing mutating the surface once wrapped;
/// anything done to the surface behind its back is invisible to the log.
pub struct CachedContext<S: Surface> {
    surface: S,
    config: CacheConfig,
    registry: CapabilityRegistry,
    log: CommandLog,
    save_stack: SaveStack,
    gradients: GradientRegistry,
}

impl<S: Surface> CachedContext<S> {
    /// Wrap `surface` with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, CacheConfig::default())
    }

    /// Wrap `surface`, discovering its capabilities.
    pub fn with_config(surface: S, config: CacheConfig) -> Self {
        let registry = CapabilityRegistry::discover(&surface);
        let mut ctx = Self {
            surface,
            config,
            registry,
            log: CommandLog::new(),
            save_stack: SaveStack::new(),
            gradients: GradientRegistry::new(),
        };
        if ctx.config.snapshot_on_create {
            ctx.save_state();
        }
        ctx
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Mirrored surface
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invoke a mirrored operation and record it.
    ///
    /// Gradients returned by the surface come back as
    /// [`Value::GradientRef`]; pass that value to [`add_color_stop`] or
    /// assign it to a property.
    ///
    /// [`add_color_stop`]: CachedContext::add_color_stop
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let name = self
            .registry
            .operation(name)
            .ok_or_else(|| CacheError::UnknownOperation(name.to_string()))?;
        let forwarded = args
            .iter()
            .map(|arg| self.to_live(arg))
            .collect::<Result<Vec<_>>>()?;

        let index = self.log.reserve_index();

        if self.config.opens_scope(name) {
            self.save_stack.push(SaveStackEntry {
                operation: name,
                index,
            });
            if !self.config.is_save(name) {
                self.surface.invoke(&self.config.save_operation, &[])?;
            }
        }

        if self.config.is_restore(name) {
            let implicit = self.save_stack.close_scope(&self.config.save_operation);
            for _ in 0..implicit {
                self.surface.invoke(&self.config.restore_operation, &[])?;
            }
        }

        let result = self.surface.invoke(name, &forwarded)?;

        let arguments = args.iter().map(|arg| self.gradients.to_recorded(arg)).collect();
        let result = match result {
            Value::Gradient(live) => Value::GradientRef(self.gradients.allocate(live).id),
            other => other,
        };

        self.log.record(LogEntry::FunctionCall(FunctionCall {
            name,
            index,
            arguments,
            gradient_epoch: self.gradients.epoch(),
        }));

        Ok(result)
    }

    /// Read a mirrored property straight from the surface.
    pub fn get(&self, name: &str) -> Result<Value> {
        let name = self
            .registry
            .property(name)
            .ok_or_else(|| CacheError::UnknownProperty(name.to_string()))?;
        Ok(self.surface.property(name)?)
    }

    /// Record a property assignment, then forward it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let name = self
            .registry
            .property(name)
            .ok_or_else(|| CacheError::UnknownProperty(name.to_string()))?;
        let value = value.into();
        let forwarded = self.to_live(&value)?;

        let index = self.log.reserve_index();
        self.log.record(LogEntry::PropertyChange(PropertyChange {
            name,
            index,
            value: self.gradients.to_recorded(&value),
        }));

        self.surface.set_property(name, forwarded)?;
        Ok(())
    }

    /// Add a color stop to a gradient this facade returned, and record it.
    pub fn add_color_stop(
        &mut self,
        gradient: GradientId,
        offset: f64,
        color: impl Into<Value>,
    ) -> Result<()> {
        let live = self
            .gradients
            .live(gradient)
            .ok_or(CacheError::UnknownGradient(gradient))?;
        let color = color.into();

        self.surface.add_color_stop(live, offset, &color)?;

        let index = self.log.reserve_index();
        self.log.record(LogEntry::ColorStop(ColorStop {
            index,
            gradient,
            offset,
            color,
        }));
        Ok(())
    }

    /// Current transform of the surface.
    pub fn transform(&self) -> Affine2D {
        self.surface.transform()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Checkpoints and replay
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record a checkpoint of every primitive property and the transform.
    ///
    /// Returns the checkpoint's index, usable as a [`rerun`] bound.
    ///
    /// [`rerun`]: CachedContext::rerun
    pub fn save_state(&mut self) -> u64 {
        let index = self.log.reserve_index();
        let snapshot = StateSnapshot::capture(&self.surface, &self.registry, index);
        self.log.record(LogEntry::StateSnapshot(snapshot));
        index
    }

    /// Re-execute the log entries from `from` to `to` (inclusive).
    ///
    /// Missing bounds default to the first and last entries. With
    /// `suppress_visual`, visually-mutating calls are skipped while state
    /// changes still apply. Replay never appends to the log.
    ///
    /// Scopes still open on the surface that were opened strictly between
    /// the two bounds are closed before replay starts. Scopes already open at
    /// `from` are not re-opened, so `from` should be a point where the scope
    /// depth matches the one the range was recorded with.
    pub fn rerun(
        &mut self,
        from: Option<u64>,
        to: Option<u64>,
        suppress_visual: bool,
    ) -> Result<ReplayReport> {
        let start = match from {
            Some(index) => self
                .log
                .position(index)
                .ok_or(CacheError::UnknownIndex(index))?,
            None => 0,
        };
        let end = match to {
            Some(index) => self
                .log
                .position(index)
                .ok_or(CacheError::UnknownIndex(index))?,
            None => match self.log.len().checked_sub(1) {
                Some(last) => last,
                None => return Ok(ReplayReport::default()),
            },
        };
        if start > end {
            return Ok(ReplayReport::default());
        }

        let entries = &self.log.entries()[start..=end];
        let from_index = entries[0].index();
        let to_index = entries[entries.len() - 1].index();

        let mut replayer = Replayer::new(
            &mut self.surface,
            &self.config,
            &self.gradients,
            suppress_visual,
        );
        if !suppress_visual {
            replayer.close_scopes(self.save_stack.open_between(from_index, to_index))?;
        }
        let report = replayer.run(entries)?;

        tracing::debug!(
            target: "retrace_recorder::replay",
            from = from_index,
            to = to_index,
            suppress_visual,
            replayed = report.replayed,
            skipped_visual = report.skipped_visual,
            skipped_color_stops = report.skipped_color_stops,
            scopes_closed = report.scopes_closed,
            "rerun complete"
        );

        Ok(report)
    }

    /// Replay the whole log.
    pub fn rerun_all(&mut self) -> Result<ReplayReport> {
        self.rerun(None, None, false)
    }

    /// Indices of every visually-mutating call, ascending.
    pub fn draw_indexes(&self) -> Vec<u64> {
        self.log.draw_indexes(|name| self.config.is_visual(name))
    }

    /// Indices of every checkpoint, ascending.
    pub fn save_state_indexes(&self) -> Vec<u64> {
        self.log.checkpoint_indexes()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════════

    /// The recorded log, in index order.
    pub fn commands(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Every gradient handed out, in creation order.
    pub fn gradients(&self) -> &[GradientHandle] {
        self.gradients.handles()
    }

    pub fn gradient(&self, id: GradientId) -> Option<GradientHandle> {
        self.gradients.get(id).copied()
    }

    /// Scopes currently open, innermost last.
    pub fn save_stack(&self) -> &[SaveStackEntry] {
        self.save_stack.entries()
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Properties captured by checkpoints.
    pub fn primitive_properties(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.primitive_properties()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The wrapped surface, read-only.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Unwrap the surface, discarding the log.
    pub fn into_inner(self) -> S {
        self.surface
    }

    /// Serializable view of the log and its derived indexes.
    pub fn export(&self) -> LogExport {
        LogExport {
            config: self.config.clone(),
            entries: self.log.entries().to_vec(),
            draw_indexes: self.draw_indexes(),
            checkpoints: self.save_state_indexes(),
            gradients: self.gradients.handles().to_vec(),
            open_scopes: self.save_stack.entries().to_vec(),
        }
    }

    /// Argument or property value as the surface should see it.
    fn to_live(&self, value: &Value) -> Result<Value> {
        resolve_value(value, &|id| self.gradients.live(id))
    }
}

impl<S: Surface> Dispatch for CachedContext<S> {
    type Error = CacheError;

    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        CachedContext::call(self, name, args)
    }

    fn get(&self, name: &str) -> Result<Value> {
        CachedContext::get(self, name)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        CachedContext::set(self, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_core::{Path, SharedPath};
    use retrace_paint::{Canvas2D, CanvasExt};

    fn ctx() -> CachedContext<Canvas2D> {
        CachedContext::new(Canvas2D::default())
    }

    #[test]
    fn test_initial_checkpoint() {
        let ctx = ctx();
        assert_eq!(ctx.save_state_indexes(), vec![1]);
        assert_eq!(ctx.commands().len(), 1);

        let quiet =
            CachedContext::with_config(Canvas2D::default(), CacheConfig::default().with_snapshot_on_create(false));
        assert!(quiet.commands().is_empty());
    }

    #[test]
    fn test_unknown_operation() {
        let mut ctx = ctx();
        let err = ctx.call("teleport", &[]).unwrap_err();
        assert_eq!(err, CacheError::UnknownOperation("teleport".to_string()));
        // root-layer members are not mirrored
        assert!(ctx.call("toString", &[]).is_err());
        assert_eq!(ctx.commands().len(), 1);
    }

    #[test]
    fn test_unknown_property() {
        let mut ctx = ctx();
        assert_eq!(
            ctx.set("opacity", 0.5),
            Err(CacheError::UnknownProperty("opacity".to_string()))
        );
        assert!(ctx.get("opacity").is_err());
    }

    #[test]
    fn test_get_reads_live_surface() {
        let mut ctx = ctx();
        ctx.set("lineWidth", 4.0).unwrap();
        assert_eq!(ctx.get("lineWidth"), Ok(Value::Number(4.0)));
        assert_eq!(ctx.surface().state().line_width, 4.0);
    }

    #[test]
    fn test_property_change_recorded_once() {
        let mut ctx = ctx();
        ctx.set("fillStyle", "red").unwrap();
        let changes: Vec<_> = ctx
            .commands()
            .iter()
            .filter(|e| matches!(e, LogEntry::PropertyChange(_)))
            .collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].index(), 2);
    }

    #[test]
    fn test_clip_opens_implicit_scope() {
        let mut ctx = ctx();
        ctx.clip().unwrap();
        assert_eq!(ctx.surface().save_depth(), 1);
        assert_eq!(ctx.save_stack()[0].operation, "clip");

        ctx.save().unwrap();
        ctx.clip().unwrap();
        assert_eq!(ctx.surface().save_depth(), 3);

        // one restore closes the explicit save and the clip opened inside it
        ctx.restore().unwrap();
        assert_eq!(ctx.surface().save_depth(), 1);
        assert_eq!(ctx.save_stack().len(), 1);

        // the next restore unwinds the outer clip scope
        ctx.restore().unwrap();
        assert_eq!(ctx.surface().save_depth(), 0);
        assert!(ctx.save_stack().is_empty());
    }

    #[test]
    fn test_path_arguments_are_copied() {
        let mut ctx = ctx();
        let path = SharedPath::new(Path::new().move_to(0.0, 0.0));
        ctx.fill_path(&path).unwrap();
        path.line_to(10.0, 10.0);

        let recorded = ctx.commands()[1].as_function_call().unwrap();
        let copy = recorded.arguments[0].as_path().unwrap();
        assert_eq!(copy.len(), 1);
        assert!(!copy.ptr_eq(&path));
    }

    #[test]
    fn test_gradient_wrapping() {
        let mut ctx = ctx();
        let gradient = ctx.create_linear_gradient(0.0, 0.0, 10.0, 0.0).unwrap();
        let id = gradient.as_gradient_ref().unwrap();
        assert_eq!(id, GradientId(1));

        ctx.add_color_stop(id, 0.0, "red").unwrap();
        ctx.set("fillStyle", gradient).unwrap();

        let handle = ctx.gradient(id).unwrap();
        assert_eq!(ctx.get("fillStyle"), Ok(Value::Gradient(handle.live)));
        assert_eq!(ctx.surface().gradient(handle.live).unwrap().stops.len(), 1);

        match &ctx.commands()[3] {
            LogEntry::PropertyChange(change) => assert_eq!(change.value, Value::GradientRef(id)),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_live_gradient_value_recorded_as_reference() {
        let mut ctx = ctx();
        let id = ctx
            .create_linear_gradient(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .as_gradient_ref()
            .unwrap();
        ctx.set("fillStyle", Value::GradientRef(id)).unwrap();

        // reading the style back yields the live gradient; assigning it again is still tracked
        let live = ctx.get("fillStyle").unwrap();
        ctx.set("strokeStyle", live).unwrap();

        match ctx.commands().last() {
            Some(LogEntry::PropertyChange(change)) => {
                assert_eq!(change.value, Value::GradientRef(id))
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_unknown_gradient_is_rejected_before_recording() {
        let mut ctx = ctx();
        let before = ctx.commands().len();
        assert_eq!(
            ctx.set("fillStyle", Value::GradientRef(GradientId(5))),
            Err(CacheError::UnknownGradient(GradientId(5)))
        );
        assert_eq!(
            ctx.add_color_stop(GradientId(5), 0.0, "red"),
            Err(CacheError::UnknownGradient(GradientId(5)))
        );
        assert_eq!(ctx.commands().len(), before);
    }

    #[test]
    fn test_surface_errors_pass_through() {
        let mut ctx = ctx();
        let err = ctx.call("fillRect", &[Value::from("x")]).unwrap_err();
        assert!(matches!(err, CacheError::Surface(_)));
        // the failed call is not logged; its index is burned
        assert_eq!(ctx.commands().len(), 1);
        assert_eq!(ctx.save_state(), 3);
    }

    #[test]
    fn test_rerun_never_appends() {
        let mut ctx = ctx();
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        let before = ctx.commands().to_vec();
        ctx.rerun_all().unwrap();
        assert_eq!(ctx.commands(), &before[..]);
    }

    #[test]
    fn test_rerun_unknown_index() {
        let mut ctx = ctx();
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        let ops_before = ctx.surface().ops().len();
        assert_eq!(
            ctx.rerun(Some(1), Some(40), false),
            Err(CacheError::UnknownIndex(40))
        );
        assert_eq!(ctx.surface().ops().len(), ops_before);
    }

    #[test]
    fn test_rerun_empty_log() {
        let mut ctx = CachedContext::with_config(
            Canvas2D::default(),
            CacheConfig::default().with_snapshot_on_create(false),
        );
        assert_eq!(ctx.rerun_all(), Ok(ReplayReport::default()));
    }

    #[test]
    fn test_export_serializes() {
        let mut ctx = ctx();
        ctx.set("lineWidth", 2.0).unwrap();
        ctx.stroke_rect(0.0, 0.0, 4.0, 4.0).unwrap();
        let json = serde_json::to_value(ctx.export()).unwrap();
        assert_eq!(json["draw_indexes"], serde_json::json!([3]));
        assert_eq!(json["entries"][1]["type"], "property_change");
    }
}
