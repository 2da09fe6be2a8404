//! # Autokey Types
//!
//! Plain data types shared by the autokey core and the board crates that drive it.
//!
//! ## Modules
//!
//! - [`keycode`] - HID keyboard usages the keypad can record and report
//! - [`step`] - Macro steps, hold classes and their on-media word encoding
//! - [`command`] - Menu commands and the physical key identity they are bound to

#![no_std]

pub mod command;
pub mod keycode;
pub mod step;

/// Maximum number of steps a macro sequence can hold.
pub const MACRO_CAPACITY: usize = 64;
