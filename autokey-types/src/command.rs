use serde::{Deserialize, Serialize};

/// Number of physical keys on the keypad.
pub const NUM_KEYS: usize = 17;

/// Identity of a physical key: `0` is "no key", `1..=17` a key.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyIndex(u8);

impl KeyIndex {
    pub const NONE: KeyIndex = KeyIndex(0);

    /// Create a key index, `None` if `idx` is not a key on the keypad.
    pub const fn new(idx: u8) -> Option<Self> {
        if idx as usize <= NUM_KEYS { Some(KeyIndex(idx)) } else { None }
    }

    /// Key index of the `n`th key, 0-based. Saturates at the last key.
    pub const fn from_position(n: usize) -> Self {
        if n < NUM_KEYS {
            KeyIndex(n as u8 + 1)
        } else {
            KeyIndex(NUM_KEYS as u8)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Commands the on-device menu understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuCommand {
    /// Step the selected key code by one.
    NextCode,
    /// Jump the selected key code back by a block of six.
    PrevBlock,
    /// Jump the selected key code forward by a block of six.
    NextBlock,
    /// Cycle the hold duration selector.
    NextDuration,
    /// Append the selected step to the macro.
    CommitStep,
    /// Drop the whole macro and disarm.
    ClearAll,
    /// Persist the macro length and start or stop playback.
    ToggleArm,
    /// Type the number of recorded steps.
    ShowCount,
}
