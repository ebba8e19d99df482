//! [`TickClock`] adapter advanced explicitly, for tests and the
//! accelerated simulator.

use core::cell::Cell;

use crate::app::ports::{Tick, TickClock};

/// Clock that only moves when told to. Never goes backwards.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Tick>,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to `tick`; earlier values are ignored.
    pub fn set(&self, tick: Tick) {
        if tick > self.now.get() {
            self.now.set(tick);
        }
    }

    pub fn advance(&self, ms: u64) -> Tick {
        let next = self.now.get().saturating_add(ms);
        self.now.set(next);
        next
    }
}

impl TickClock for ManualClock {
    fn now(&self) -> Tick {
        self.now.get()
    }
}
