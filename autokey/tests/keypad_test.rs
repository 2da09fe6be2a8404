pub mod common;

use autokey::{HoldClass, MacroStep};

use crate::common::*;

#[test]
fn test_record_arm_and_play() {
    let mut harness = Harness::new(Eeprom::new());

    // Select B, record it with the default hold, arm
    assert_eq!(harness.tap(KEY_NEXT_CODE), vec![0x05, 0x00]);
    assert_eq!(harness.tap(KEY_COMMIT), vec![0x28, 0x00]);
    // Arming releases, and the release of the arm key resends the release
    assert_eq!(harness.tap(KEY_ARM), vec![0x00, 0x00]);
    assert!(harness.keypad.menu().armed());

    for tick in 0..10 {
        assert_eq!(harness.playback_tick(), 0, "tick {}", tick);
    }
    assert_eq!(harness.playback_tick(), 0x05);
    assert_eq!(harness.playback_tick(), 0x00);

    let eeprom = harness.release();
    assert_eq!(eeprom.as_bytes()[0], 1);
    assert_eq!(&eeprom.as_bytes()[2..4], &[0x05, 0x00]);
}

#[test]
fn test_armed_release_keeps_playback_code() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_ARM);
    for _ in 0..11 {
        harness.playback_tick();
    }
    assert_eq!(harness.keypad.out_key(), 0x04);

    // A menu key still answers while armed, its release leaves the code alone
    let reports = harness.tap(KEY_SHOW_COUNT);
    assert_eq!(reports, vec![0x1e, 0x1e]);
}

#[test]
fn test_disarmed_keypad_ignores_timer() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_COMMIT);
    let sent = harness.writer.reports.len();
    for _ in 0..20 {
        assert_eq!(harness.playback_tick(), 0);
    }
    assert_eq!(harness.writer.reports.len(), sent);
}

#[test]
fn test_armed_empty_macro_is_silent() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_ARM);
    let sent = harness.writer.reports.len();
    for _ in 0..20 {
        harness.playback_tick();
    }
    assert_eq!(harness.writer.reports.len(), sent);
}

#[test]
fn test_armed_playback_refreshes_every_tick() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_ARM);
    let sent = harness.writer.reports.len();
    for _ in 0..12 {
        harness.playback_tick();
    }
    assert_eq!(harness.writer.reports.len(), sent + 12);
    assert_eq!(harness.writer.reports[sent + 10], 0x04);
}

#[test]
fn test_macro_survives_power_cycle() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_NEXT_BLOCK);
    harness.tap(KEY_DURATION);
    harness.tap(KEY_DURATION);
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_PREV_BLOCK);
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_ARM);

    let harness = Harness::new(harness.release());
    assert_eq!(
        harness.keypad.store().steps(),
        &[MacroStep::new(0x0a, HoldClass::new(2)), MacroStep::new(0x45, HoldClass::new(0))]
    );
    // Playback state is not persisted
    assert!(!harness.keypad.menu().armed());
}

#[test]
fn test_unfinalized_commits_are_lost() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_COMMIT);
    assert_eq!(harness.keypad.store().len(), 2);

    let harness = Harness::new(harness.release());
    assert!(harness.keypad.store().is_empty());
}

#[test]
fn test_clear_rewinds_everything() {
    let mut harness = Harness::new(Eeprom::new());
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_ARM);
    for _ in 0..15 {
        harness.playback_tick();
    }
    assert_eq!(harness.tap(KEY_CLEAR), vec![0x00, 0x00]);
    assert!(!harness.keypad.menu().armed());
    assert!(harness.keypad.store().is_empty());
    assert_eq!(harness.keypad.playback().cursor(), 0);
    assert_eq!(harness.keypad.playback().elapsed(), 0);
    assert_eq!(harness.release().as_bytes()[0], 0);
}

#[test]
fn test_unmapped_key_releases() {
    let mut harness = Harness::new(Eeprom::new());
    assert_eq!(harness.tap(6), vec![0x00, 0x00]);
    assert_eq!(harness.tap(17), vec![0x00, 0x00]);
}

#[test]
fn test_duration_digit_sets_hold() {
    let mut harness = Harness::new(Eeprom::new());
    assert_eq!(harness.tap(KEY_DURATION), vec![0x1e, 0x00]);
    assert_eq!(harness.tap(KEY_DURATION), vec![0x1f, 0x00]);
    harness.tap(KEY_COMMIT);
    harness.tap(KEY_ARM);

    // "2" holds for 20 playback ticks
    for tick in 0..20 {
        assert_eq!(harness.playback_tick(), 0, "tick {}", tick);
    }
    assert_eq!(harness.playback_tick(), 0x04);
}
