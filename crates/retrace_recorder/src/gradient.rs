//! Gradient handles.
//!
//! A gradient returned by a surface factory is given a [`GradientId`] and
//! handed to the caller as [`Value::GradientRef`]. The registry keeps the
//! live gradient behind each id so later property assignments and color
//! stops can reach it.

use retrace_core::{GradientId, LiveGradient, Value};
use serde::Serialize;

use crate::error::{CacheError, Result};

/// A recorder-assigned id bound to the live gradient it wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GradientHandle {
    pub id: GradientId,
    pub live: LiveGradient,
}

/// Every gradient handed out by one facade, in creation order.
#[derive(Clone, Debug, Default)]
pub struct GradientRegistry {
    handles: Vec<GradientHandle>,
    counter: u64,
}

impl GradientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a freshly created live gradient under the next id.
    pub fn allocate(&mut self, live: LiveGradient) -> GradientHandle {
        self.counter += 1;
        let handle = GradientHandle {
            id: GradientId(self.counter),
            live,
        };
        self.handles.push(handle);
        handle
    }

    /// Current counter value (the id of the most recent gradient).
    pub fn epoch(&self) -> u64 {
        self.counter
    }

    pub fn get(&self, id: GradientId) -> Option<&GradientHandle> {
        // ids are dense and start at 1
        let slot = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.handles.get(slot)
    }

    pub fn live(&self, id: GradientId) -> Option<LiveGradient> {
        self.get(id).map(|handle| handle.live)
    }

    /// Id wrapping `live`, if this registry handed it out.
    pub fn id_of(&self, live: LiveGradient) -> Option<GradientId> {
        self.handles
            .iter()
            .rev()
            .find(|handle| handle.live == live)
            .map(|handle| handle.id)
    }

    pub fn handles(&self) -> &[GradientHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Replace a live gradient the registry knows with its reference.
    pub fn to_recorded(&self, value: &Value) -> Value {
        match value {
            Value::Gradient(live) => match self.id_of(*live) {
                Some(id) => Value::GradientRef(id),
                None => value.clone(),
            },
            Value::List(items) => Value::List(items.iter().map(|v| self.to_recorded(v)).collect()),
            other => other.detach(),
        }
    }
}

/// Swap every gradient reference in `value` for the live gradient `lookup` gives.
pub fn resolve_value(
    value: &Value,
    lookup: &impl Fn(GradientId) -> Option<LiveGradient>,
) -> Result<Value> {
    match value {
        Value::GradientRef(id) => lookup(*id)
            .map(Value::Gradient)
            .ok_or(CacheError::UnknownGradient(*id)),
        Value::List(items) => items
            .iter()
            .map(|item| resolve_value(item, lookup))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = GradientRegistry::new();
        let a = registry.allocate(LiveGradient(40));
        let b = registry.allocate(LiveGradient(41));
        assert_eq!((a.id, b.id), (GradientId(1), GradientId(2)));
        assert_eq!(registry.epoch(), 2);
        assert_eq!(registry.live(GradientId(2)), Some(LiveGradient(41)));
        assert!(registry.get(GradientId(0)).is_none());
        assert!(registry.get(GradientId(3)).is_none());
    }

    #[test]
    fn test_live_gradients_are_recorded_by_id() {
        let mut registry = GradientRegistry::new();
        let handle = registry.allocate(LiveGradient(7));
        assert_eq!(
            registry.to_recorded(&Value::Gradient(LiveGradient(7))),
            Value::GradientRef(handle.id)
        );
        assert_eq!(
            registry.to_recorded(&Value::Gradient(LiveGradient(8))),
            Value::Gradient(LiveGradient(8))
        );
    }

    #[test]
    fn test_resolve_nested_refs() {
        let value = Value::List(vec![Value::GradientRef(GradientId(1)), Value::Number(1.0)]);
        let resolved = resolve_value(&value, &|id| (id.0 == 1).then_some(LiveGradient(9))).unwrap();
        assert_eq!(
            resolved,
            Value::List(vec![Value::Gradient(LiveGradient(9)), Value::Number(1.0)])
        );

        let missing = resolve_value(&Value::GradientRef(GradientId(2)), &|_| None);
        assert_eq!(missing, Err(CacheError::UnknownGradient(GradientId(2))));
    }
}
