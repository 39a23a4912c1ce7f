//! The command log.
//!
//! An append-only sequence of [`LogEntry`] values ordered by their index.
//! Indices come from a counter owned by the log; callers reserve one before
//! doing work that may itself take further indices.

mod entry;

pub use entry::*;

/// Append-only, index-ordered log of recorded mutations.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<LogEntry>,
    last_index: u64,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next index. Indices start at 1 and are never reused.
    pub fn reserve_index(&mut self) -> u64 {
        self.last_index += 1;
        self.last_index
    }

    /// Most recently reserved index (0 if none).
    pub fn last_index(&self) -> u64 {
        self.last_index
    }

    /// Append an entry whose index was reserved from this log.
    pub fn record(&mut self, entry: LogEntry) {
        let index = entry.index();
        debug_assert!(index != 0 && index <= self.last_index, "index {index} was never reserved");

        tracing::trace!(
            target: "retrace_recorder::record",
            index,
            kind = entry.kind(),
            name = entry.name().unwrap_or(""),
            "entry recorded"
        );

        // An entry reserved early may be recorded after later ones.
        match self.entries.last() {
            Some(last) if last.index() > index => {
                let at = self.entries.partition_point(|e| e.index() < index);
                debug_assert!(self.entries.get(at).map(LogEntry::index) != Some(index));
                self.entries.insert(at, entry);
            }
            _ => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry carrying `index`.
    pub fn position(&self, index: u64) -> Option<usize> {
        self.entries
            .binary_search_by_key(&index, LogEntry::index)
            .ok()
    }

    pub fn get(&self, index: u64) -> Option<&LogEntry> {
        self.position(index).map(|pos| &self.entries[pos])
    }

    /// Indices of calls to visually-mutating operations, ascending.
    pub fn draw_indexes(&self, is_visual: impl Fn(&str) -> bool) -> Vec<u64> {
        self.entries
            .iter()
            .filter_map(LogEntry::as_function_call)
            .filter(|call| is_visual(call.name))
            .map(|call| call.index)
            .collect()
    }

    /// Indices of state snapshots, ascending.
    pub fn checkpoint_indexes(&self) -> Vec<u64> {
        self.entries
            .iter()
            .filter_map(LogEntry::as_snapshot)
            .map(|snapshot| snapshot.index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use retrace_core::{Affine2D, Value};

    fn call(log: &mut CommandLog, name: &'static str) -> u64 {
        let index = log.reserve_index();
        log.record(LogEntry::FunctionCall(FunctionCall {
            name,
            index,
            arguments: Arguments::new(),
            gradient_epoch: 0,
        }));
        index
    }

    fn snapshot(log: &mut CommandLog) -> u64 {
        let index = log.reserve_index();
        log.record(LogEntry::StateSnapshot(StateSnapshot {
            index,
            properties: IndexMap::new(),
            transform: Affine2D::IDENTITY,
        }));
        index
    }

    #[test]
    fn test_indices_start_at_one() {
        let mut log = CommandLog::new();
        assert_eq!(snapshot(&mut log), 1);
        assert_eq!(call(&mut log, "fillRect"), 2);
        assert_eq!(log.last_index(), 2);
    }

    #[test]
    fn test_late_record_keeps_index_order() {
        let mut log = CommandLog::new();
        let early = log.reserve_index();
        call(&mut log, "moveTo");
        log.record(LogEntry::PropertyChange(PropertyChange {
            name: "lineWidth",
            index: early,
            value: Value::Number(2.0),
        }));

        let order: Vec<u64> = log.entries().iter().map(LogEntry::index).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(log.position(1), Some(0));
        assert_eq!(log.get(2).and_then(LogEntry::name), Some("moveTo"));
    }

    #[test]
    fn test_derived_queries() {
        let mut log = CommandLog::new();
        snapshot(&mut log);
        call(&mut log, "beginPath");
        call(&mut log, "fill");
        snapshot(&mut log);
        call(&mut log, "fillRect");

        assert_eq!(log.draw_indexes(|n| n.starts_with("fill")), vec![3, 5]);
        assert_eq!(log.checkpoint_indexes(), vec![1, 4]);
        assert!(log.position(99).is_none());
    }
}
