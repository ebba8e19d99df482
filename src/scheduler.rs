//! Deferred task scheduler.
//!
//! A fixed-capacity table of tasks, each with an optional due tick. The
//! main loop calls [`Scheduler::tick`] once per iteration; every task whose
//! due tick has passed is parked and handed to a [`SchedulerDelegate`].
//! Inside the callback the task may re-plan itself (periodic polling) or
//! unregister itself (one-shot work such as leaving service mode).
//!
//! ```text
//!   register_in(delay) ──▶ [slot: due=now+delay]
//!                                 │ tick(now >= due)
//!                                 ▼
//!                         due = None (parked)
//!                                 │ delegate.on_task_due(task, ctl)
//!                     ┌───────────┴────────────┐
//!                     ▼                        ▼
//!          ctl.plan_current_in(d)     ctl.unregister_current()
//!          (fires again later)        (slot freed, never fires)
//! ```

use log::{debug, info};

use crate::app::ports::Tick;

pub use crate::app::ports::SchedulerDelegate;

/// Default number of task slots.
pub const MAX_TASKS: usize = 8;

/// Handle to a registered task. Carries the slot generation so a stale
/// handle can never remove a task that later reused the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId {
    slot: u8,
    generation: u16,
}

impl TaskId {
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

#[derive(Debug, Clone)]
struct TaskEntry<T> {
    label: &'static str,
    task: T,
    /// `None` while parked (ran and not re-planned).
    due: Option<Tick>,
    generation: u16,
}

/// The scheduler engine. Knows nothing about what tasks do; the delegate
/// interprets the `T` payload.
pub struct Scheduler<T, const N: usize = MAX_TASKS> {
    slots: [Option<TaskEntry<T>>; N],
    generations: [u16; N],
}

impl<T: Copy, const N: usize> Scheduler<T, N> {
    pub fn new() -> Self {
        Self {
            slots: [const { None }; N],
            generations: [0; N],
        }
    }

    /// Register a task due at an absolute tick. Returns `None` if every
    /// slot is taken.
    pub fn register(&mut self, label: &'static str, task: T, due: Tick) -> Option<TaskId> {
        let slot = self.slots.iter().position(Option::is_none)?;
        let generation = self.generations[slot].wrapping_add(1);
        self.generations[slot] = generation;
        self.slots[slot] = Some(TaskEntry {
            label,
            task,
            due: Some(due),
            generation,
        });
        info!("Scheduler: registered '{}' at slot {} (due {} ms)", label, slot, due);
        Some(TaskId {
            slot: slot as u8,
            generation,
        })
    }

    /// Register a task due `delay_ms` after `now`.
    pub fn register_in(
        &mut self,
        label: &'static str,
        task: T,
        delay_ms: u32,
        now: Tick,
    ) -> Option<TaskId> {
        self.register(label, task, now.saturating_add(u64::from(delay_ms)))
    }

    /// Remove a task. Returns `false` if the handle is stale or the task is
    /// already gone, so calling it twice removes exactly one entry.
    pub fn unregister(&mut self, id: TaskId) -> bool {
        let label = match self.slots.get(id.slot()) {
            Some(Some(entry)) if entry.generation == id.generation => entry.label,
            _ => return false,
        };
        self.slots[id.slot()] = None;
        info!("Scheduler: unregistered '{}' from slot {}", label, id.slot);
        true
    }

    /// Move a registered task to a new absolute due tick.
    pub fn plan(&mut self, id: TaskId, due: Tick) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.due = Some(due);
                true
            }
            None => false,
        }
    }

    /// Whether the handle still refers to a registered task.
    pub fn is_registered(&self, id: TaskId) -> bool {
        matches!(
            self.slots.get(id.slot()),
            Some(Some(entry)) if entry.generation == id.generation
        )
    }

    /// Due tick of a task, `None` if parked or unregistered.
    pub fn due_tick(&self, id: TaskId) -> Option<Tick> {
        match self.slots.get(id.slot()) {
            Some(Some(entry)) if entry.generation == id.generation => entry.due,
            _ => None,
        }
    }

    /// Number of registered tasks (parked ones included).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every task due at or before `now`. Each due task runs once per
    /// call and stays parked unless it re-plans itself. Returns the number
    /// of tasks run.
    pub fn tick(&mut self, now: Tick, delegate: &mut dyn SchedulerDelegate<T, N>) -> usize {
        let mut ran = 0;
        for slot in 0..N {
            let (id, task, label) = match &mut self.slots[slot] {
                Some(entry) if entry.due.is_some_and(|due| due <= now) => {
                    entry.due = None;
                    let id = TaskId {
                        slot: slot as u8,
                        generation: entry.generation,
                    };
                    (id, entry.task, entry.label)
                }
                _ => continue,
            };

            debug!("Scheduler: running '{}' at {} ms", label, now);
            let mut ctl = TaskControl {
                scheduler: self,
                id,
                now,
            };
            delegate.on_task_due(task, &mut ctl);
            ran += 1;
        }
        ran
    }

    fn entry_mut(&mut self, id: TaskId) -> Option<&mut TaskEntry<T>> {
        match self.slots.get_mut(id.slot()) {
            Some(Some(entry)) if entry.generation == id.generation => Some(entry),
            _ => None,
        }
    }
}

impl<T: Copy, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle given to a running task.
pub struct TaskControl<'a, T, const N: usize = MAX_TASKS> {
    scheduler: &'a mut Scheduler<T, N>,
    id: TaskId,
    now: Tick,
}

impl<T: Copy, const N: usize> TaskControl<'_, T, N> {
    /// Id of the running task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Tick the dispatch was started at.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Remove the running task. Idempotent: the second call returns `false`
    /// and removes nothing.
    pub fn unregister_current(&mut self) -> bool {
        self.scheduler.unregister(self.id)
    }

    /// Run the current task again `delay_ms` after the dispatch tick.
    pub fn plan_current_in(&mut self, delay_ms: u32) -> bool {
        let due = self.now.saturating_add(u64::from(delay_ms));
        self.scheduler.plan(self.id, due)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
