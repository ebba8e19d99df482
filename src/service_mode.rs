//! Service-mode timer.
//!
//! Right after commissioning the sensors poll fast so an installer gets
//! quick feedback. A one-shot scheduler task, armed at boot, drops them to
//! their normal cadence and then removes itself. There is no cancel path and
//! no re-arm; a reset is the only way back into service mode.

use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{SamplingControl, SensorKind, Tick};
use crate::config::NodeConfig;
use crate::scheduler::{Scheduler, TaskControl, TaskId};

/// A sensor and the interval it returns to when service mode ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downgrade {
    pub sensor: SensorKind,
    pub normal_interval_ms: u32,
}

#[derive(Debug, Clone)]
pub struct ServiceModeTimer {
    duration_ms: u32,
    downgrades: Vec<Downgrade, 2>,
    task: Option<TaskId>,
    expired: bool,
}

impl ServiceModeTimer {
    /// Managed sensors come from the config: the thermometer always, the
    /// accelerometer when the deployment has one.
    pub fn from_config(config: &NodeConfig) -> Self {
        let thermometer = Downgrade {
            sensor: SensorKind::Thermometer,
            normal_interval_ms: config.temperature.poll.normal_interval_ms,
        };
        let accelerometer = config.accelerometer.map(|accel| Downgrade {
            sensor: SensorKind::Accelerometer,
            normal_interval_ms: accel.normal_interval_ms,
        });
        let downgrades = core::iter::once(thermometer).chain(accelerometer).collect();
        Self {
            duration_ms: config.service_mode_duration_ms,
            downgrades,
            task: None,
            expired: false,
        }
    }

    /// Register the one-shot task. Calling it again while armed, or after
    /// expiry, does nothing.
    pub fn arm<T: Copy, const N: usize>(
        &mut self,
        scheduler: &mut Scheduler<T, N>,
        task: T,
        now: Tick,
    ) -> Option<TaskId> {
        if self.task.is_some() || self.expired {
            return self.task;
        }
        self.task = scheduler.register_in("service-mode-exit", task, self.duration_ms, now);
        if self.task.is_none() {
            warn!("Service mode: no scheduler slot, staying in service cadence");
        }
        self.task
    }

    /// Run from inside the scheduler callback: apply the normal intervals,
    /// then unregister the running task.
    pub fn expire<T: Copy, const N: usize>(
        &mut self,
        sampling: &mut (impl SamplingControl + ?Sized),
        ctl: &mut TaskControl<'_, T, N>,
    ) {
        if self.expired {
            ctl.unregister_current();
            return;
        }
        for d in &self.downgrades {
            sampling.set_update_interval(d.sensor, d.normal_interval_ms);
        }
        ctl.unregister_current();
        self.task = None;
        self.expired = true;
        info!(
            "Service mode ended after {} s, {} sensor(s) at normal cadence",
            self.duration_ms / 1000,
            self.downgrades.len()
        );
    }

    pub fn is_active(&self) -> bool {
        !self.expired
    }

    pub fn task(&self) -> Option<TaskId> {
        self.task
    }

    pub fn downgrades(&self) -> &[Downgrade] {
        &self.downgrades
    }
}
