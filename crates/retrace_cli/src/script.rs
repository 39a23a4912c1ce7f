//! Drawing scripts
//!
//! A script is a TOML file with an optional `[config]` table (a
//! [`CacheConfig`]) and a list of `[[step]]` tables run in order against a
//! recording [`Canvas2D`]:
//!
//! ```toml
//! [[step]]
//! call = "createLinearGradient"
//! args = [0, 0, 100, 0]
//! bind = "sky"
//!
//! [[step]]
//! color_stop = "sky"
//! offset = 0.0
//! color = "lightblue"
//!
//! [[step]]
//! set = "fillStyle"
//! value = "$sky"
//!
//! [[step]]
//! checkpoint = "before-fill"
//!
//! [[step]]
//! call = "fillRect"
//! args = [0, 0, 100, 50]
//! ```
//!
//! Strings starting with `$` name a bound gradient. Tables `{ path = [[x, y], ...] }`
//! and `{ transform = [a, b, c, d, e, f] }` build path and matrix arguments.

use anyhow::{anyhow, bail, Context, Result};
use retrace_core::{Affine2D, GradientId, SharedPath, Value};
use retrace_paint::{Canvas2D, PathBuilder};
use retrace_recorder::{CacheConfig, CachedContext};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// A parsed script file
#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: CacheConfig,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One `[[step]]` table
///
/// Exactly one of `call`, `set`, `checkpoint` or `color_stop` must be present.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub call: Option<String>,
    #[serde(default)]
    pub args: Vec<toml::Value>,
    /// Label for a gradient returned by `call`
    pub bind: Option<String>,

    pub set: Option<String>,
    pub value: Option<toml::Value>,

    pub checkpoint: Option<String>,

    pub color_stop: Option<String>,
    pub offset: Option<f64>,
    pub color: Option<String>,
}

/// A script after it has been run
pub struct Recording {
    pub context: CachedContext<Canvas2D>,
    /// Checkpoint labels to log indices
    pub checkpoints: HashMap<String, u64>,
    /// Gradient labels to recorder ids
    pub gradients: HashMap<String, GradientId>,
}

impl Script {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Run every step against a fresh canvas
    pub fn record(&self) -> Result<Recording> {
        let mut recording = Recording {
            context: CachedContext::with_config(Canvas2D::default(), self.config.clone()),
            checkpoints: HashMap::new(),
            gradients: HashMap::new(),
        };

        for (i, step) in self.steps.iter().enumerate() {
            recording
                .apply(step)
                .with_context(|| format!("step {} failed", i + 1))?;
        }

        tracing::info!(
            "Recorded {} steps into {} log entries",
            self.steps.len(),
            recording.context.commands().len()
        );
        Ok(recording)
    }
}

impl Recording {
    fn apply(&mut self, step: &Step) -> Result<()> {
        match (&step.call, &step.set, &step.checkpoint, &step.color_stop) {
            (Some(name), None, None, None) => {
                let args = step
                    .args
                    .iter()
                    .map(|arg| self.convert(arg))
                    .collect::<Result<Vec<_>>>()?;
                let result = self.context.call(name, &args)?;
                if let Some(label) = &step.bind {
                    let id = result
                        .as_gradient_ref()
                        .ok_or_else(|| anyhow!("`{name}` did not return a gradient to bind"))?;
                    self.gradients.insert(label.clone(), id);
                }
            }
            (None, Some(name), None, None) => {
                let value = step
                    .value
                    .as_ref()
                    .ok_or_else(|| anyhow!("`set = \"{name}\"` needs a value"))?;
                let value = self.convert(value)?;
                self.context.set(name, value)?;
            }
            (None, None, Some(label), None) => {
                let index = self.context.save_state();
                tracing::debug!("checkpoint `{}` at index {}", label, index);
                self.checkpoints.insert(label.clone(), index);
            }
            (None, None, None, Some(label)) => {
                let id = self.gradient(label)?;
                let offset = step
                    .offset
                    .ok_or_else(|| anyhow!("color stop on `{label}` needs an offset"))?;
                let color = step
                    .color
                    .as_deref()
                    .ok_or_else(|| anyhow!("color stop on `{label}` needs a color"))?;
                self.context.add_color_stop(id, offset, color)?;
            }
            _ => bail!("a step needs exactly one of call, set, checkpoint or color_stop"),
        }
        Ok(())
    }

    fn gradient(&self, label: &str) -> Result<GradientId> {
        self.gradients
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("no gradient bound as `{label}`"))
    }

    /// Resolve a `--from`/`--to` bound: a log index or a checkpoint label
    pub fn bound(&self, bound: &str) -> Result<u64> {
        if let Ok(index) = bound.parse() {
            return Ok(index);
        }
        self.checkpoints
            .get(bound)
            .copied()
            .ok_or_else(|| anyhow!("`{bound}` is neither an index nor a checkpoint label"))
    }

    fn convert(&self, value: &toml::Value) -> Result<Value> {
        Ok(match value {
            toml::Value::String(s) => match s.strip_prefix('$') {
                Some(label) => Value::GradientRef(self.gradient(label)?),
                None => Value::from(s.as_str()),
            },
            toml::Value::Integer(n) => Value::Number(*n as f64),
            toml::Value::Float(n) => Value::Number(*n),
            toml::Value::Boolean(b) => Value::Bool(*b),
            toml::Value::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.convert(item))
                    .collect::<Result<_>>()?,
            ),
            toml::Value::Table(table) => {
                if let Some(points) = table.get("path") {
                    let closed = table
                        .get("closed")
                        .and_then(toml::Value::as_bool)
                        .unwrap_or(false);
                    Value::Path(path(points, closed)?)
                } else if let Some(elements) = table.get("transform") {
                    Value::Transform(transform(elements)?)
                } else {
                    bail!("tables must have a `path` or `transform` key")
                }
            }
            toml::Value::Datetime(_) => bail!("dates are not drawing arguments"),
        })
    }
}

fn number(value: &toml::Value) -> Result<f32> {
    match value {
        toml::Value::Integer(n) => Ok(*n as f32),
        toml::Value::Float(n) => Ok(*n as f32),
        other => bail!("expected a number, got {other}"),
    }
}

fn path(points: &toml::Value, closed: bool) -> Result<SharedPath> {
    let points = points
        .as_array()
        .ok_or_else(|| anyhow!("`path` must be a list of [x, y] points"))?;

    let mut builder = PathBuilder::new();
    for (i, point) in points.iter().enumerate() {
        let [x, y] = match point.as_array().map(Vec::as_slice) {
            Some([x, y]) => [number(x)?, number(y)?],
            _ => bail!("path point {} is not [x, y]", i + 1),
        };
        builder = if i == 0 {
            builder.move_to(x, y)
        } else {
            builder.line_to(x, y)
        };
    }
    if closed {
        builder = builder.close();
    }
    Ok(builder.build_shared())
}

fn transform(elements: &toml::Value) -> Result<Affine2D> {
    match elements.as_array().map(Vec::as_slice) {
        Some([a, b, c, d, e, f]) => Ok(Affine2D::new(
            number(a)?,
            number(b)?,
            number(c)?,
            number(d)?,
            number(e)?,
            number(f)?,
        )),
        _ => bail!("`transform` must have six numbers"),
    }
}
