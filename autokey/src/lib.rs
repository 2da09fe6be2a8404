//! Control logic of a programmable macro keypad.
//!
//! The keypad scans a 17-key matrix, lets the user record a sequence of (key, hold) steps
//! through an on-device menu, keeps that sequence in non-volatile storage and, when armed,
//! replays it as a timed stream of HID key reports.
//!
//! Everything hardware specific sits behind small traits: [`matrix::KeyScanner`] for the
//! matrix, [`embedded_storage::Storage`] for the EEPROM, [`tick::TickSource`] for the 20ms
//! timer and [`hid::ReportWriter`] for the USB interrupt endpoint. [`keypad::Keypad`] ties them
//! together and runs one control-loop iteration per [`keypad::Keypad::poll`] call.
#![no_std]

pub mod config;
pub mod debounce;
pub mod descriptor;
pub mod direct_pin;
pub mod hid;
pub mod keypad;
pub mod matrix;
pub mod menu;
pub mod playback;
pub mod storage;
pub mod tick;

pub use autokey_types::command::{KeyIndex, MenuCommand, NUM_KEYS};
pub use autokey_types::keycode::HidKeyCode;
pub use autokey_types::step::{HOLD_DURATIONS, HoldClass, MacroSequence, MacroStep};
pub use autokey_types::MACRO_CAPACITY;
pub use keypad::Keypad;

/// Number of loop iterations a key level has to stay unchanged before the next transition is
/// accepted.
pub const DEBOUNCE_THRESHOLD: u16 = 1000;
/// The debounce counter stops here.
pub const DEBOUNCE_SATURATION: u16 = 40000;
/// Period of the hardware tick, in milliseconds.
pub const TIMER_PERIOD_MS: u64 = 20;
/// Hardware ticks per playback tick, 5 * 20ms = 100ms.
pub const PLAYBACK_DIVIDER: u8 = 5;
