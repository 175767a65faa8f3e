//! Time sources for note timestamps.
//!
//! # Invariants
//! - Issued timestamps have millisecond precision.
//! - `MonotonicStamp` never issues a value `<=` one it already issued or
//!   observed, so `update` after `create` always advances `updated_at`.

use crate::model::timestamp::truncate_to_millis;
use chrono::{DateTime, TimeDelta, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Wall-clock abstraction injected into the note store.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests and replays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    pub fn set(&self, value: DateTime<Utc>) {
        self.current.set(value);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.current
            .set(self.current.get() + TimeDelta::milliseconds(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Strictly increasing timestamp issuer layered over a [`Clock`].
#[derive(Debug, Default, Clone)]
pub(crate) struct MonotonicStamp {
    last: Option<DateTime<Utc>>,
}

impl MonotonicStamp {
    /// Records a timestamp that already exists (e.g. loaded from storage).
    pub(crate) fn observe(&mut self, value: DateTime<Utc>) {
        if self.last.map_or(true, |last| value > last) {
            self.last = Some(value);
        }
    }

    /// Issues the next timestamp: clock time, bumped past the last issued one.
    pub(crate) fn next(&mut self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = truncate_to_millis(clock.now());
        let issued = match self.last {
            Some(last) if now <= last => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.last = Some(issued);
        issued
    }
}
