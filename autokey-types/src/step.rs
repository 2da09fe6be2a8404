use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

use crate::MACRO_CAPACITY;
use crate::keycode::HidKeyCode;

/// Hold duration of each class, in playback ticks (100ms each).
pub const HOLD_DURATIONS: [u8; HoldClass::COUNT] = [10, 10, 20, 30, 40, 50, 60];

/// Ordered list of recorded steps, in playback order.
pub type MacroSequence = heapless::Vec<MacroStep, MACRO_CAPACITY>;

/// Index into [`HOLD_DURATIONS`].
///
/// A raw value past the table is read as a literal tick count. Media written by older firmware
/// stored the duration itself in the hold byte, and every duration is larger than the table.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldClass(u8);

impl HoldClass {
    /// Number of classes the menu can select.
    pub const COUNT: usize = 7;
    /// Class used when nothing was selected, the shortest hold.
    pub const DEFAULT: HoldClass = HoldClass(0);

    pub const fn new(raw: u8) -> Self {
        HoldClass(raw)
    }

    /// Class selected by the duration selector: the digit typed back as feedback is the hold
    /// in seconds, `1` is 10 ticks, `6` is 60. `0` means "not chosen" and holds 10 ticks too. Selector 7 has no entry of its own and is clamped to the last class.
    pub const fn from_selector(selector: u8) -> Self {
        if selector as usize >= Self::COUNT {
            HoldClass(Self::COUNT as u8 - 1)
        } else {
            HoldClass(selector)
        }
    }

    /// Raw byte, as stored on the medium.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Hold duration in playback ticks.
    pub const fn ticks(self) -> u8 {
        if (self.0 as usize) < Self::COUNT {
            HOLD_DURATIONS[self.0 as usize]
        } else {
            self.0
        }
    }
}

/// On-media encoding of one [`MacroStep`]: low byte is the key usage, high byte the hold class.
#[bitfield(u16, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct StepWord {
    #[bits(8)]
    pub key: u8,
    #[bits(8)]
    pub hold: u8,
}

/// One recorded (key, hold) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroStep {
    /// Raw HID usage, `0` is a no-op step.
    pub key: u8,
    pub hold: HoldClass,
}

impl MacroStep {
    pub const fn new(key: u8, hold: HoldClass) -> Self {
        Self { key, hold }
    }

    pub fn from_keycode(key: HidKeyCode, hold: HoldClass) -> Self {
        Self::new(key.usage(), hold)
    }

    /// Ticks this step occupies in the playback cycle.
    pub const fn ticks(&self) -> u8 {
        self.hold.ticks()
    }

    pub const fn to_word(self) -> StepWord {
        StepWord::new().with_key(self.key).with_hold(self.hold.raw())
    }

    pub const fn from_word(word: StepWord) -> Self {
        Self::new(word.key(), HoldClass::new(word.hold()))
    }
}
