//! State transition history tracking.
//!
//! A bounded, in-memory log of the state changes a machine went through.
//! Useful for diagnostics and tests; it is not a persistence mechanism.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use switchyard::core::TransitionRecord;
/// use switchyard::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// let record = TransitionRecord {
///     from: Door::Open,
///     to: Door::Closed,
///     command: Some("Close".to_string()),
///     timestamp: Utc::now(),
/// };
/// assert!(record.was_triggered_by_command());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Type name of the command that caused the change; `None` for an
    /// explicit `transit_to`
    pub command: Option<String>,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl<S: State> TransitionRecord<S> {
    pub fn was_triggered_by_command(&self) -> bool {
        self.command.is_some()
    }
}

/// Ordered, bounded history of state changes.
///
/// Holds at most `capacity` records; recording beyond that evicts the oldest.
/// A capacity of zero records nothing.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{StateHistory, TransitionRecord};
/// use switchyard::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         One,
///         Two,
///         Three,
///     }
/// }
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(TransitionRecord {
///     from: Phase::One,
///     to: Phase::Two,
///     command: None,
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     from: Phase::Two,
///     to: Phase::Three,
///     command: None,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    capacity: usize,
    records: VecDeque<TransitionRecord<S>>,
}

impl<S: State> StateHistory<S> {
    /// History that keeps nothing.
    pub fn disabled() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed: the `from` of the oldest retained record, then the
    /// `to` of every record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the oldest and newest retained record.
    ///
    /// `None` when empty. Clock skew that would make it negative also
    /// yields `None`.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained records, oldest first.
    pub fn transitions(&self) -> &VecDeque<TransitionRecord<S>> {
        &self.records
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&TransitionRecord<S>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    fn record(from: TestState, to: TestState) -> TransitionRecord<TestState> {
        TransitionRecord {
            from,
            to,
            command: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::with_capacity(4);
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn disabled_history_records_nothing() {
        let mut history = StateHistory::disabled();
        history.record(record(TestState::Initial, TestState::Processing));

        assert!(!history.is_enabled());
        assert!(history.is_empty());
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::with_capacity(4);
        history.record(record(TestState::Initial, TestState::Processing));
        history.record(record(TestState::Processing, TestState::Complete));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Initial);
        assert_eq!(path[1], &TestState::Processing);
        assert_eq!(path[2], &TestState::Complete);
    }

    #[test]
    fn oldest_record_is_evicted_at_capacity() {
        let mut history = StateHistory::with_capacity(2);
        history.record(record(TestState::Initial, TestState::Processing));
        history.record(record(TestState::Processing, TestState::Complete));
        history.record(record(TestState::Complete, TestState::Initial));

        assert_eq!(history.len(), 2);
        assert_eq!(history.transitions()[0].from, TestState::Processing);
        assert_eq!(
            history.get_path(),
            vec![
                &TestState::Processing,
                &TestState::Complete,
                &TestState::Initial
            ]
        );
    }

    #[test]
    fn ring_keeps_newest_records_over_many_wraps() {
        let states = [
            TestState::Initial,
            TestState::Processing,
            TestState::Complete,
        ];
        let mut history = StateHistory::with_capacity(3);
        for step in 0..10 {
            history.record(record(states[step % 3], states[(step + 1) % 3]));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.capacity(), 3);
        // Steps 7, 8 and 9 remain.
        assert_eq!(history.transitions()[0].from, TestState::Processing);
        assert_eq!(history.latest().unwrap().to, TestState::Processing);
        assert_eq!(
            history.get_path(),
            vec![
                &TestState::Processing,
                &TestState::Complete,
                &TestState::Initial,
                &TestState::Processing
            ]
        );
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::with_capacity(4);
        history.record(record(TestState::Initial, TestState::Processing));

        std::thread::sleep(Duration::from_millis(10));

        history.record(record(TestState::Processing, TestState::Complete));

        let duration = history.duration().unwrap();
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::with_capacity(4);
        history.record(TransitionRecord {
            from: TestState::Initial,
            to: TestState::Processing,
            command: Some("Start".to_string()),
            timestamp: Utc::now(),
        });

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.capacity(), 4);
        assert_eq!(
            deserialized.transitions()[0].command.as_deref(),
            Some("Start")
        );
    }
}
