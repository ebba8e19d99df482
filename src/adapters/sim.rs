//! Simulated board.
//!
//! Stands in for the thermometer, accelerometer, battery gauge, button and
//! status LED on a host. Each polled sensor has its own task on a small
//! [`Scheduler`]; [`SamplingControl::set_update_interval`] re-plans that
//! task, so the service-mode downgrade is visible in the poll cadence.
//! The button is a scripted level waveform run through the real
//! [`ButtonDriver`], and the LED is a [`PulseLed`] on an in-memory pin.
//!
//! Sensor data comes from a seeded RNG, so a run is reproducible. A
//! configurable share of polls yields no data or a driver error.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::{SamplingControl, SensorKind, StatusLed, Tick};
use crate::drivers::{ButtonDriver, ButtonTimings, PulseLed};
use crate::error::SensorError;
use crate::events::{EventQueue, NodeEvent, SensorEvent, Vector3};
use crate::scheduler::{Scheduler, SchedulerDelegate, TaskControl, TaskId};

/// In-memory GPIO. Clones share the level.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    pub fn level(&self) -> bool {
        self.0.get()
    }

    pub fn drive(&self, high: bool) {
        self.0.set(high);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

/// Gravity vectors for the six resting faces, +Z first.
const FACES: [Vector3; 6] = [
    Vector3::new(0.0, 0.0, 1.0),
    Vector3::new(1.0, 0.0, 0.0),
    Vector3::new(0.0, 1.0, 0.0),
    Vector3::new(0.0, -1.0, 0.0),
    Vector3::new(-1.0, 0.0, 0.0),
    Vector3::new(0.0, 0.0, -1.0),
];

/// Tuning knobs for the synthetic environment.
#[derive(Debug, Clone, Copy)]
pub struct SimProfile {
    pub seed: u64,
    /// Share of polls that return no data; a quarter of that rate again
    /// returns a driver error.
    pub fault_rate: f64,
    /// Mean gap between button presses.
    pub press_gap_ms: u32,
    /// Share of presses held long enough to count as a hold.
    pub hold_share: f64,
    /// Chance per accelerometer poll that the node is turned over.
    pub flip_chance: f64,
}

impl Default for SimProfile {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            fault_rate: 0.02,
            press_gap_ms: 45_000,
            hold_share: 0.25,
            flip_chance: 0.03,
        }
    }
}

/// Synthetic sensor state, split from the scheduler so a poll callback can
/// borrow it mutably.
struct Environment {
    rng: StdRng,
    profile: SimProfile,
    temperature_c: f32,
    battery_v: f32,
    face: usize,
    intervals: [u32; 3],
}

impl Environment {
    fn sample<T>(&mut self, value: impl FnOnce(&mut Self) -> T) -> SensorEvent<T> {
        let roll: f64 = self.rng.r#gen();
        if roll < self.profile.fault_rate / 4.0 {
            SensorEvent::Error(SensorError::Timeout)
        } else if roll < self.profile.fault_rate {
            SensorEvent::Update(None)
        } else {
            SensorEvent::Update(Some(value(self)))
        }
    }

    fn poll(&mut self, sensor: SensorKind) -> NodeEvent {
        match sensor {
            SensorKind::Thermometer => NodeEvent::Thermometer(self.sample(|env| {
                env.temperature_c += env.rng.gen_range(-0.08..0.08);
                env.temperature_c = env.temperature_c.clamp(-20.0, 60.0);
                env.temperature_c
            })),
            SensorKind::Accelerometer => NodeEvent::Accelerometer(self.sample(|env| {
                if env.rng.gen_bool(env.profile.flip_chance) {
                    env.face = env.rng.gen_range(0..FACES.len());
                }
                let g = FACES[env.face];
                let mut noise = || env.rng.gen_range(-0.05..0.05_f32);
                Vector3::new(g.x + noise(), g.y + noise(), g.z + noise())
            })),
            SensorKind::Battery => NodeEvent::Battery(self.sample(|env| {
                env.battery_v = (env.battery_v - env.rng.gen_range(0.0..0.002)).max(2.0);
                env.battery_v
            })),
        }
    }
}

const fn sensor_index(sensor: SensorKind) -> usize {
    match sensor {
        SensorKind::Thermometer => 0,
        SensorKind::Accelerometer => 1,
        SensorKind::Battery => 2,
    }
}

/// Scheduler delegate: poll, queue the result, come back after the
/// current interval.
struct Poller<'a> {
    env: &'a mut Environment,
    queue: &'a EventQueue,
}

impl SchedulerDelegate<SensorKind, 4> for Poller<'_> {
    fn on_task_due(&mut self, sensor: SensorKind, ctl: &mut TaskControl<'_, SensorKind, 4>) {
        let event = self.env.poll(sensor);
        debug!("Sim: {:?} poll at {} ms", sensor, ctl.now());
        if self.queue.push(event).is_err() {
            warn!("Sim: event queue full, {:?} sample dropped", sensor);
        }
        ctl.plan_current_in(self.env.intervals[sensor_index(sensor)]);
    }
}

/// Scripted button waveform.
#[derive(Debug, Clone, Copy)]
enum ButtonScript {
    Idle { next_press: Tick },
    Down { release_at: Tick },
}

pub struct SimBoard {
    env: Environment,
    polls: Scheduler<SensorKind, 4>,
    tasks: [Option<TaskId>; 3],
    led: PulseLed<SimPin>,
    button: ButtonDriver<SimPin>,
    button_pin: SimPin,
    script: ButtonScript,
    now: Tick,
}

impl SimBoard {
    pub fn new(profile: SimProfile) -> Self {
        let mut rng = StdRng::seed_from_u64(profile.seed);
        let first_press = rng.gen_range(1_000..u64::from(profile.press_gap_ms.max(2_000)));
        let button_pin = SimPin::default();
        Self {
            env: Environment {
                temperature_c: rng.gen_range(18.0..24.0),
                battery_v: 3.05,
                face: 0,
                intervals: [0; 3],
                rng,
                profile,
            },
            polls: Scheduler::new(),
            tasks: [None; 3],
            led: PulseLed::new(SimPin::default()),
            button: ButtonDriver::new(button_pin.clone(), false, ButtonTimings::default()),
            button_pin,
            script: ButtonScript::Idle {
                next_press: first_press,
            },
            now: 0,
        }
    }

    /// Advance the board to `now`: end LED pulses, move the button
    /// waveform, and run due sensor polls. Every resulting event goes to
    /// `queue`.
    pub fn step(&mut self, now: Tick, queue: &EventQueue) {
        self.now = now;
        self.led.tick(now);
        self.run_button_script(now);

        if let Ok(gestures) = self.button.poll(now) {
            for gesture in gestures {
                if queue.push(NodeEvent::Button(gesture)).is_err() {
                    warn!("Sim: event queue full, {:?} dropped", gesture);
                }
            }
        }

        let mut poller = Poller {
            env: &mut self.env,
            queue,
        };
        self.polls.tick(now, &mut poller);
    }

    fn run_button_script(&mut self, now: Tick) {
        match self.script {
            ButtonScript::Idle { next_press } if now >= next_press => {
                let rng = &mut self.env.rng;
                let held = if rng.gen_bool(self.env.profile.hold_share) {
                    rng.gen_range(2_200..4_500)
                } else {
                    rng.gen_range(80..600)
                };
                self.button_pin.drive(true);
                self.script = ButtonScript::Down {
                    release_at: now + held,
                };
            }
            ButtonScript::Down { release_at } if now >= release_at => {
                let gap = u64::from(self.env.profile.press_gap_ms.max(2_000));
                let next = self.env.rng.gen_range(gap / 2..gap * 3 / 2);
                self.button_pin.drive(false);
                self.script = ButtonScript::Idle {
                    next_press: now + next,
                };
            }
            _ => {}
        }
    }

    /// Current poll interval of a sensor, 0 if never set.
    pub fn interval(&self, sensor: SensorKind) -> u32 {
        self.env.intervals[sensor_index(sensor)]
    }

    pub fn led_on(&self) -> bool {
        self.led.is_on()
    }

    pub fn led_pulses(&self) -> u32 {
        self.led.pulse_count()
    }

    pub fn button_pressed(&self) -> bool {
        self.button.is_pressed()
    }
}

impl SamplingControl for SimBoard {
    fn set_update_interval(&mut self, sensor: SensorKind, interval_ms: u32) {
        let i = sensor_index(sensor);
        self.env.intervals[i] = interval_ms;
        let due = self.now.saturating_add(u64::from(interval_ms));
        match self.tasks[i] {
            Some(id) if self.polls.plan(id, due) => {}
            _ => {
                let label = match sensor {
                    SensorKind::Thermometer => "sim-thermometer",
                    SensorKind::Accelerometer => "sim-accelerometer",
                    SensorKind::Battery => "sim-battery",
                };
                self.tasks[i] = self.polls.register(label, sensor, due);
            }
        }
        debug!("Sim: {:?} interval now {} ms", sensor, interval_ms);
    }
}

impl StatusLed for SimBoard {
    fn pulse(&mut self, duration_ms: u32) {
        self.led.pulse(duration_ms, self.now);
    }
}
