//! Replay of a log range against the raw surface.
//!
//! The replayer never goes through the facade, so replaying cannot append
//! to the log it is reading.

use retrace_core::{GradientId, LiveGradient, Surface, Value};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::gradient::{resolve_value, GradientRegistry};
use crate::log::{ColorStop, FunctionCall, LogEntry, PropertyChange};

/// What a rerun did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Entries applied to the surface.
    pub replayed: usize,
    /// Visually-mutating calls skipped.
    pub skipped_visual: usize,
    /// Color stops whose gradient was created outside the range.
    pub skipped_color_stops: usize,
    /// Restores issued before replay to close scopes opened inside the range.
    pub scopes_closed: usize,
}

/// Executes log entries against a surface.
pub struct Replayer<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    config: &'a CacheConfig,
    gradients: &'a GradientRegistry,
    suppress_visual: bool,
    /// Gradients created during this replay, by their recorded id.
    created: FxHashMap<GradientId, LiveGradient>,
    report: ReplayReport,
}

impl<'a, S: Surface + ?Sized> Replayer<'a, S> {
    pub fn new(
        surface: &'a mut S,
        config: &'a CacheConfig,
        gradients: &'a GradientRegistry,
        suppress_visual: bool,
    ) -> Self {
        Self {
            surface,
            config,
            gradients,
            suppress_visual,
            created: FxHashMap::default(),
            report: ReplayReport::default(),
        }
    }

    /// Close `count` scopes on the surface before replay starts.
    pub fn close_scopes(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.surface.invoke(&self.config.restore_operation, &[])?;
        }
        self.report.scopes_closed += count;
        Ok(())
    }

    /// Apply `entries` in order. Stops at the first surface failure.
    pub fn run(mut self, entries: &[LogEntry]) -> Result<ReplayReport> {
        for entry in entries {
            let applied = match entry {
                LogEntry::FunctionCall(call) => self.replay_call(call)?,
                LogEntry::ColorStop(stop) => self.replay_color_stop(stop)?,
                LogEntry::PropertyChange(change) => {
                    self.replay_property(change)?;
                    true
                }
                LogEntry::StateSnapshot(snapshot) => {
                    snapshot.apply(&mut *self.surface)?;
                    true
                }
            };
            if applied {
                self.report.replayed += 1;
            }
        }
        Ok(self.report)
    }

    /// Gradient for `id`: one re-created by this replay, else the original.
    fn gradient(&self, id: GradientId) -> Option<LiveGradient> {
        self.created
            .get(&id)
            .copied()
            .or_else(|| self.gradients.live(id))
    }

    fn resolve(&self, value: &Value) -> Result<Value> {
        resolve_value(value, &|id| self.gradient(id))
    }

    fn replay_call(&mut self, call: &FunctionCall) -> Result<bool> {
        if self.suppress_visual && self.config.is_visual(call.name) {
            tracing::trace!(
                target: "retrace_recorder::replay",
                index = call.index,
                name = call.name,
                "visual call skipped"
            );
            self.report.skipped_visual += 1;
            return Ok(false);
        }

        let args = call
            .arguments
            .iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>>>()?;
        let result = self.surface.invoke(call.name, &args)?;

        if let Value::Gradient(live) = result {
            self.created.insert(GradientId(call.gradient_epoch), live);
        }
        Ok(true)
    }

    fn replay_color_stop(&mut self, stop: &ColorStop) -> Result<bool> {
        let Some(&live) = self.created.get(&stop.gradient) else {
            tracing::trace!(
                target: "retrace_recorder::replay",
                index = stop.index,
                gradient = %stop.gradient,
                "color stop skipped, gradient not created in range"
            );
            self.report.skipped_color_stops += 1;
            return Ok(false);
        };
        self.surface.add_color_stop(live, stop.offset, &stop.color)?;
        Ok(true)
    }

    fn replay_property(&mut self, change: &PropertyChange) -> Result<()> {
        let value = self.resolve(&change.value)?;
        self.surface.set_property(change.name, value)?;
        Ok(())
    }
}
