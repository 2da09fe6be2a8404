//! Kept in its own test binary: the mock time driver is global.
pub mod common;

use autokey::tick::{TickDivider, TickSource, TimerTick};
use embassy_time::{Duration, MockDriver};

#[test]
fn test_timer_tick_follows_clock() {
    let driver = MockDriver::get();
    driver.reset();

    let mut tick = TimerTick::new(Duration::from_millis(20));
    assert!(!tick.take_elapsed());

    driver.advance(Duration::from_millis(19));
    assert!(!tick.take_elapsed());
    driver.advance(Duration::from_millis(1));
    assert!(tick.take_elapsed());
    assert!(!tick.take_elapsed());

    // A late loop catches up one period per call
    driver.advance(Duration::from_millis(60));
    assert!(tick.take_elapsed());
    assert!(tick.take_elapsed());
    assert!(tick.take_elapsed());
    assert!(!tick.take_elapsed());

    // 100ms of clock is one playback tick
    let mut divider = TickDivider::new(5);
    let mut fired = 0;
    for _ in 0..100 {
        driver.advance(Duration::from_millis(1));
        if tick.take_elapsed() && divider.on_edge() {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);
}
