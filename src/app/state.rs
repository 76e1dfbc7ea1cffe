//! Shared monitor state.
//!
//! [`MonitorCore`] is the one object both execution contexts hold (via
//! `Arc`): the sampler thread writes snapshots, HTTP handlers read them
//! and clear the alarm flag.
//!
//! Locking:
//! - `state` guards the latest snapshot and the alarm flag as one unit.
//! - `actuators` is only ever taken while `state` is held, so indicator
//!   writes are ordered with the flag they were computed from.
//! - `history` is taken alone, never nested.
//!
//! A poisoned lock is recovered rather than propagated: every guarded
//! value is plain data and is never left half-written.

use std::sync::{Mutex, MutexGuard, PoisonError};

use heapless::Vec as HVec;

use crate::actuation::{self, IndicatorOutputs};
use crate::history::{HISTORY_CAPACITY, HistoryStore};
use crate::sensors::SensorSnapshot;

use super::ports::ActuatorPort;

/// Latest snapshot plus the alarm flag, read and written together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorState {
    pub snapshot: SensorSnapshot,
    pub alarm_active: bool,
}

/// Result of one [`MonitorCore::publish`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Published {
    pub outputs: IndicatorOutputs,
    pub alarm_active: bool,
    pub previous: SensorSnapshot,
}

pub struct MonitorCore<A: ActuatorPort> {
    state: Mutex<MonitorState>,
    history: Mutex<HistoryStore>,
    actuators: Mutex<A>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: ActuatorPort> MonitorCore<A> {
    /// Alarm starts disarmed; [`arm_alarm`](Self::arm_alarm) when sampling begins.
    pub fn new(actuators: A) -> Self {
        Self {
            state: Mutex::new(MonitorState {
                snapshot: SensorSnapshot::default(),
                alarm_active: false,
            }),
            history: Mutex::new(HistoryStore::new()),
            actuators: Mutex::new(actuators),
        }
    }

    pub fn arm_alarm(&self) {
        lock(&self.state).alarm_active = true;
    }

    /// Replace the snapshot, drive the indicators from it, then append it
    /// to the history.
    pub fn publish(&self, snapshot: SensorSnapshot, rain_detected: bool) -> Published {
        let published = {
            let mut state = lock(&self.state);
            let previous = state.snapshot;
            state.snapshot = snapshot;

            let outputs =
                actuation::resolve(snapshot.risk_state(), rain_detected, state.alarm_active);
            let mut hw = lock(&self.actuators);
            hw.set_led(outputs.led);
            hw.set_buzzer(outputs.buzzer);

            Published {
                outputs,
                alarm_active: state.alarm_active,
                previous,
            }
        };

        lock(&self.history).push(snapshot);
        published
    }

    /// Clear the alarm flag and force the buzzer off. Idempotent.
    ///
    /// Returns whether the alarm was active before the call.
    pub fn silence_alarm(&self) -> bool {
        let mut state = lock(&self.state);
        let was_active = state.alarm_active;
        state.alarm_active = false;
        lock(&self.actuators).set_buzzer(false);
        was_active
    }

    /// Consistent copy of snapshot and flag.
    pub fn current(&self) -> MonitorState {
        *lock(&self.state)
    }

    pub fn alarm_active(&self) -> bool {
        lock(&self.state).alarm_active
    }

    /// Newest-first copy of up to `count` history entries.
    pub fn history(&self, count: Option<usize>) -> HVec<SensorSnapshot, HISTORY_CAPACITY> {
        lock(&self.history).read(count)
    }

    /// Run `f` against the history under its lock.
    pub fn with_history<R>(&self, f: impl FnOnce(&HistoryStore) -> R) -> R {
        f(&lock(&self.history))
    }

    /// Run `f` against the actuators, ordered after the state lock.
    pub fn with_actuators<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        let _state = lock(&self.state);
        f(&mut lock(&self.actuators))
    }
}
