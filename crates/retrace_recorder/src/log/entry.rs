//! Command log entries.

use indexmap::IndexMap;
use retrace_core::{Affine2D, GradientId, Value};
use serde::Serialize;
use smallvec::SmallVec;

/// Recorded call arguments.
pub type Arguments = SmallVec<[Value; 4]>;

/// A recorded operation invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: &'static str,
    pub index: u64,
    /// Detached copies of the caller's arguments.
    pub arguments: Arguments,
    /// Gradient counter value right after the call; a gradient returned by
    /// this call carries exactly this id.
    pub gradient_epoch: u64,
}

/// A recorded property assignment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyChange {
    pub name: &'static str,
    pub index: u64,
    /// Gradients are recorded as [`Value::GradientRef`].
    pub value: Value,
}

/// A color stop added to a previously returned gradient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorStop {
    pub index: u64,
    pub gradient: GradientId,
    pub offset: f64,
    pub color: Value,
}

/// A checkpoint of every primitive property plus the transform.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub index: u64,
    pub properties: IndexMap<&'static str, Value>,
    pub transform: Affine2D,
}

/// One entry of the command log.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    FunctionCall(FunctionCall),
    PropertyChange(PropertyChange),
    ColorStop(ColorStop),
    StateSnapshot(StateSnapshot),
}

impl LogEntry {
    pub fn index(&self) -> u64 {
        match self {
            LogEntry::FunctionCall(e) => e.index,
            LogEntry::PropertyChange(e) => e.index,
            LogEntry::ColorStop(e) => e.index,
            LogEntry::StateSnapshot(e) => e.index,
        }
    }

    /// Operation or property name, if the entry has one.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            LogEntry::FunctionCall(e) => Some(e.name),
            LogEntry::PropertyChange(e) => Some(e.name),
            LogEntry::ColorStop(_) | LogEntry::StateSnapshot(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogEntry::FunctionCall(_) => "function_call",
            LogEntry::PropertyChange(_) => "property_change",
            LogEntry::ColorStop(_) => "color_stop",
            LogEntry::StateSnapshot(_) => "state_snapshot",
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            LogEntry::FunctionCall(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_snapshot(&self) -> Option<&StateSnapshot> {
        match self {
            LogEntry::StateSnapshot(e) => Some(e),
            _ => None,
        }
    }
}
