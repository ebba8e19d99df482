//! Button driver → gesture tracker → reports.

use sensornode::app::events::Report;
use sensornode::drivers::{ButtonDriver, ButtonTimings};
use sensornode::events::NodeEvent;
use sensornode::{NodeConfig, Tick};

use super::mock_hw::Harness;

/// Feed a level waveform through a real button driver into the node.
/// `segments` are `(pressed, until_ms)`; sampled every 10 ms.
fn press_pattern(h: &mut Harness, segments: &[(bool, Tick)]) {
    let mut button = ButtonDriver::<()>::new((), false, ButtonTimings::default());
    let mut now = 0;
    for &(pressed, until) in segments {
        while now < until {
            for gesture in button.update(pressed, now) {
                h.event(NodeEvent::Button(gesture), now);
            }
            now += 10;
        }
    }
}

#[test]
fn two_clicks_count_one_then_two() {
    let mut h = Harness::start(NodeConfig::push_button());
    press_pattern(
        &mut h,
        &[(false, 100), (true, 300), (false, 1_000), (true, 1_200), (false, 2_000)],
    );
    assert_eq!(
        h.sink.reports,
        vec![Report::ButtonCount(1), Report::ButtonCount(2)]
    );
    assert_eq!(h.board.pulses(), vec![100, 100]);
}

#[test]
fn long_press_reports_hold_count_then_duration() {
    let mut h = Harness::start(NodeConfig::push_button());
    press_pattern(&mut h, &[(false, 100), (true, 3_000), (false, 3_500)]);

    // Press debounced at 120, release debounced at 3020.
    assert_eq!(
        h.sink.reports,
        vec![Report::HoldCount(1), Report::HoldDuration(2_900)]
    );
    assert_eq!(h.board.pulses(), vec![250]);
    assert_eq!(h.node.buttons().click_count(), 0);
}

#[test]
fn kit_profile_counts_presses_and_keeps_holds_off_air() {
    let mut h = Harness::start(NodeConfig::kit_push_button());
    press_pattern(
        &mut h,
        &[(false, 100), (true, 300), (false, 1_000), (true, 3_500), (false, 4_000)],
    );
    assert_eq!(
        h.sink.reports,
        vec![Report::ButtonCount(1), Report::ButtonCount(2)]
    );
    assert_eq!(h.board.pulses(), vec![100, 100]);
    assert_eq!(h.node.buttons().hold_count(), 0);
}
