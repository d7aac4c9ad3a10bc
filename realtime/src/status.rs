use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Stopping,
}

/// Process-wide server status as reported on the `status` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub status: RunState,
    pub started_at: DateTime<Utc>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// The single shared `ServerStatus` of the process.
///
/// Every read and write goes through one mutex, so readers never see a half-applied
/// update. `started_at` is fixed at construction and `last_activity` only moves forward.
#[derive(Debug)]
pub struct StatusState {
    inner: Mutex<ServerStatus>,
}

impl StatusState {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ServerStatus {
                status: RunState::Running,
                started_at,
                last_activity: None,
            }),
        }
    }

    /// Records activity now. Returns the resulting `last_activity`.
    pub fn touch(&self) -> DateTime<Utc> {
        self.touch_at(Utc::now())
    }

    /// Records activity at `at`, unless a later activity is already recorded.
    pub fn touch_at(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let mut status = self.lock();
        let last = match status.last_activity {
            Some(previous) if previous > at => previous,
            _ => at,
        };
        status.last_activity = Some(last);
        last
    }

    pub fn read(&self) -> ServerStatus {
        self.lock().clone()
    }

    pub fn set_status(&self, run_state: RunState) {
        self.lock().status = run_state;
    }

    // A panic while holding the lock cannot leave the record half-written: every
    // mutation is a single field assignment.
    fn lock(&self) -> std::sync::MutexGuard<'_, ServerStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StatusState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_state_is_running_without_activity() {
        let state = StatusState::new();
        let status = state.read();

        assert_eq!(status.status, RunState::Running);
        assert!(status.last_activity.is_none());
    }

    #[test]
    fn touch_never_moves_last_activity_backward() {
        let start = Utc::now();
        let state = StatusState::started_at(start);

        let later = start + Duration::seconds(10);
        assert_eq!(state.touch_at(later), later);
        assert_eq!(state.touch_at(start + Duration::seconds(5)), later);
        assert_eq!(state.read().last_activity, Some(later));
    }

    #[test]
    fn started_at_is_constant_across_touches_and_status_changes() {
        let state = StatusState::new();
        let started_at = state.read().started_at;

        for _ in 0..10 {
            state.touch();
        }
        state.set_status(RunState::Stopping);

        let status = state.read();
        assert_eq!(status.started_at, started_at);
        assert_eq!(status.status, RunState::Stopping);
    }

    #[test]
    fn concurrent_touches_are_monotonic() {
        let state = std::sync::Arc::new(StatusState::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || {
                    let mut previous = None;
                    for _ in 0..200 {
                        let current = state.read().last_activity;
                        assert!(current >= previous);
                        previous = current;
                        state.touch();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn serializes_with_lowercase_status_and_null_activity() {
        let state = StatusState::new();
        let json = serde_json::to_value(state.read()).unwrap();

        assert_eq!(json["status"], "running");
        assert!(json["last_activity"].is_null());
        assert!(json["started_at"].is_string());
    }
}
