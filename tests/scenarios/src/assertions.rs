//! Journal assertions.
//!
//! Each check is a pure function over a run's journal entries and returns an
//! [`AssertionResult`] so a scenario can report every violation at once.

use endurance_core::{Entry, Event};

/// Result of a journal assertion.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed.
    pub passed: bool,
    /// Human-readable description of what was checked.
    pub description: String,
    /// Details about the failure (if any).
    pub failure_details: Option<String>,
}

impl AssertionResult {
    /// Create a passing result.
    pub fn pass(description: impl Into<String>) -> Self {
        Self {
            passed: true,
            description: description.into(),
            failure_details: None,
        }
    }

    /// Create a failing result.
    pub fn fail(description: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: false,
            description: description.into(),
            failure_details: Some(details.into()),
        }
    }
}

fn concerns(event: &Event, observer: &str) -> bool {
    match event {
        Event::ConnectAttempt { observer: o }
        | Event::ConnectAborted { observer: o, .. }
        | Event::ObserverConnected { observer: o }
        | Event::ObserverDisconnected { observer: o } => o == observer,
        _ => false,
    }
}

/// An observer's connects and disconnects strictly alternate, starting with
/// a connect.
pub fn assert_alternates(entries: &[Entry], observer: &str) -> AssertionResult {
    let description = format!("{} alternates connect/disconnect", observer);
    let mut connected = false;

    for entry in entries.iter().filter(|e| concerns(&e.event, observer)) {
        match (&entry.event, connected) {
            (Event::ObserverConnected { .. }, false) => connected = true,
            (Event::ObserverDisconnected { .. }, true) => connected = false,
            (Event::ObserverConnected { .. }, true) => {
                return AssertionResult::fail(
                    description,
                    format!("connected twice without disconnecting (tick {})", entry.tick),
                )
            }
            (Event::ObserverDisconnected { .. }, false) => {
                return AssertionResult::fail(
                    description,
                    format!("disconnected while not connected (tick {})", entry.tick),
                )
            }
            (Event::ConnectAttempt { .. }, true) => {
                return AssertionResult::fail(
                    description,
                    format!("connect attempt while connected (tick {})", entry.tick),
                )
            }
            _ => {}
        }
    }

    AssertionResult::pass(description)
}

/// No observer tried to connect while the backend was stopped.
///
/// `initially_running` is the backend status before the first entry.
pub fn assert_no_attempts_while_stopped(
    entries: &[Entry],
    initially_running: bool,
) -> AssertionResult {
    let description = "no connect attempts while the backend is stopped";
    let mut running = initially_running;

    for entry in entries {
        match &entry.event {
            Event::BackendStopped => running = false,
            Event::BackendStarted => running = true,
            Event::ConnectAttempt { observer } if !running => {
                return AssertionResult::fail(
                    description,
                    format!("{} attempted at tick {}", observer, entry.tick),
                )
            }
            _ => {}
        }
    }

    AssertionResult::pass(description)
}

/// The observer was connected no later than `tick`.
pub fn assert_connected_by(entries: &[Entry], observer: &str, tick: u64) -> AssertionResult {
    let description = format!("{} connected by tick {}", observer, tick);
    let first = entries.iter().find(|e| {
        matches!(&e.event, Event::ObserverConnected { observer: o } if o == observer)
    });

    match first {
        Some(entry) if entry.tick <= tick => AssertionResult::pass(description),
        Some(entry) => AssertionResult::fail(
            description,
            format!("first connected at tick {}", entry.tick),
        ),
        None => AssertionResult::fail(description, "never connected"),
    }
}

/// The observer never disconnected.
pub fn assert_never_disconnected(entries: &[Entry], observer: &str) -> AssertionResult {
    let description = format!("{} never disconnected", observer);
    match entries.iter().find(|e| {
        matches!(&e.event, Event::ObserverDisconnected { observer: o } if o == observer)
    }) {
        Some(entry) => AssertionResult::fail(
            description,
            format!("disconnected at tick {}", entry.tick),
        ),
        None => AssertionResult::pass(description),
    }
}

/// Backend stops and starts alternate, starting from the initial status.
pub fn assert_backend_alternates(entries: &[Entry], initially_running: bool) -> AssertionResult {
    let description = "backend stop/start alternate";
    let mut running = initially_running;

    for entry in entries {
        match (&entry.event, running) {
            (Event::BackendStopped, true) => running = false,
            (Event::BackendStarted, false) => running = true,
            (Event::BackendStopped, false) | (Event::BackendStarted, true) => {
                return AssertionResult::fail(
                    description,
                    format!("repeated transition at tick {}", entry.tick),
                )
            }
            _ => {}
        }
    }

    AssertionResult::pass(description)
}

/// Ticks never go backwards in the journal.
pub fn assert_ticks_monotonic(entries: &[Entry]) -> AssertionResult {
    let description = "journal ticks are monotonic";
    for pair in entries.windows(2) {
        if pair[1].tick < pair[0].tick {
            return AssertionResult::fail(
                description,
                format!("tick {} follows tick {}", pair[1].tick, pair[0].tick),
            );
        }
    }
    AssertionResult::pass(description)
}

/// Count entries matching `predicate`.
pub fn count(entries: &[Entry], predicate: impl Fn(&Event) -> bool) -> usize {
    entries.iter().filter(|e| predicate(&e.event)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tick: u64, event: Event) -> Entry {
        Entry { tick, event }
    }

    fn connected(tick: u64, name: &str) -> Entry {
        entry(
            tick,
            Event::ObserverConnected {
                observer: name.into(),
            },
        )
    }

    fn disconnected(tick: u64, name: &str) -> Entry {
        entry(
            tick,
            Event::ObserverDisconnected {
                observer: name.into(),
            },
        )
    }

    fn attempt(tick: u64, name: &str) -> Entry {
        entry(
            tick,
            Event::ConnectAttempt {
                observer: name.into(),
            },
        )
    }

    #[test]
    fn alternation_passes_and_ignores_other_observers() {
        let entries = vec![
            attempt(0, "a"),
            connected(0, "a"),
            attempt(1, "b"),
            connected(1, "b"),
            disconnected(2, "a"),
            attempt(3, "a"),
            connected(3, "a"),
        ];
        assert!(assert_alternates(&entries, "a").passed);
        assert!(assert_alternates(&entries, "b").passed);
    }

    #[test]
    fn double_connect_fails() {
        let entries = vec![connected(0, "a"), connected(4, "a")];
        let result = assert_alternates(&entries, "a");
        assert!(!result.passed);
        assert!(result.failure_details.unwrap().contains("tick 4"));
    }

    #[test]
    fn attempt_while_stopped_fails() {
        let entries = vec![
            entry(2, Event::BackendStopped),
            attempt(3, "a"),
            entry(5, Event::BackendStarted),
        ];
        let result = assert_no_attempts_while_stopped(&entries, true);
        assert!(!result.passed);
        assert!(result.failure_details.unwrap().contains("a attempted at tick 3"));
    }

    #[test]
    fn attempt_after_restart_passes() {
        let entries = vec![
            entry(2, Event::BackendStopped),
            entry(5, Event::BackendStarted),
            attempt(5, "a"),
        ];
        assert!(assert_no_attempts_while_stopped(&entries, true).passed);
    }

    #[test]
    fn connected_by_reports_late_connect() {
        let entries = vec![connected(9, "a")];
        assert!(assert_connected_by(&entries, "a", 9).passed);
        let late = assert_connected_by(&entries, "a", 3);
        assert!(!late.passed);
        assert_eq!(late.failure_details.as_deref(), Some("first connected at tick 9"));
        assert!(!assert_connected_by(&entries, "b", 100).passed);
    }

    #[test]
    fn backend_repeated_stop_fails() {
        let entries = vec![entry(1, Event::BackendStopped), entry(2, Event::BackendStopped)];
        assert!(!assert_backend_alternates(&entries, true).passed);
        assert!(assert_backend_alternates(&entries[..1], true).passed);
    }

    #[test]
    fn backwards_tick_fails() {
        let entries = vec![connected(3, "a"), disconnected(2, "a")];
        assert!(!assert_ticks_monotonic(&entries).passed);
    }
}
