//! On-device menu used to record the macro.
//!
//! The menu keys edit a "selected step" (key code plus hold duration), append it to the macro,
//! and arm or disarm playback. Each command answers with a feedback key code, which the keypad
//! types to the host so the user can see what is selected.
use core::fmt::Debug;

use embedded_storage::Storage;

use crate::config::CommandMap;
use crate::playback::PlaybackState;
use crate::storage::MacroStore;
use crate::{HidKeyCode, HoldClass, KeyIndex, MacroStep, MenuCommand};

/// Key code selected at startup.
pub const FIRST_CODE: u8 = HidKeyCode::FIRST_RECORDABLE as u8;
/// Last key code the menu can select.
pub const LAST_CODE: u8 = HidKeyCode::LAST_RECORDABLE as u8;
/// Codes moved by one block jump.
pub const BLOCK_SIZE: u8 = 6;
/// Feedback for a selector value or a count `n` is `DIGIT_BASE + n`, so 1..9 type as digits.
pub const DIGIT_BASE: u8 = HidKeyCode::Z as u8;
/// Largest step count [`MenuCommand::ShowCount`] can type.
pub const COUNT_DISPLAY_BOUND: usize = 0x48;
/// Typed by [`MenuCommand::ShowCount`] past [`COUNT_DISPLAY_BOUND`].
pub const COUNT_OVERFLOW: HidKeyCode = HidKeyCode::F;
/// Typed when a step is recorded.
pub const COMMIT_FEEDBACK: HidKeyCode = HidKeyCode::Enter;
/// Number of positions of the duration selector.
const SELECTOR_MAX: u8 = HoldClass::COUNT as u8;

/// What a key event does to the reported key code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feedback {
    /// Report this key code, `0` releases.
    Report(u8),
    /// Leave the report alone, playback owns it.
    Keep,
}

/// Transient state of the menu, lost at power off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuState {
    /// Key code the next commit records
    selected: u8,
    /// Duration selector, 0 = not chosen, then 1..=7
    selector: u8,
    /// Playback running
    armed: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub const fn new() -> Self {
        Self {
            selected: FIRST_CODE,
            selector: 0,
            armed: false,
        }
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }

    pub fn selector(&self) -> u8 {
        self.selector
    }

    /// Hold class the next commit records.
    pub fn hold(&self) -> HoldClass {
        HoldClass::from_selector(self.selector)
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Process a debounced key transition.
    pub fn handle<F: Storage>(
        &mut self,
        key: KeyIndex,
        commands: &CommandMap,
        store: &mut MacroStore<F>,
        playback: &mut PlaybackState,
    ) -> Feedback
    where
        F::Error: Debug,
    {
        if key.is_none() {
            return if self.armed { Feedback::Keep } else { Feedback::Report(0) };
        }

        match commands.command(key) {
            Some(command) => self.apply(command, store, playback),
            None => {
                log::debug!("Key {} has no menu command", key.get());
                Feedback::Report(0)
            }
        }
    }

    /// Run one menu command.
    pub fn apply<F: Storage>(
        &mut self,
        command: MenuCommand,
        store: &mut MacroStore<F>,
        playback: &mut PlaybackState,
    ) -> Feedback
    where
        F::Error: Debug,
    {
        let feedback = match command {
            MenuCommand::NextCode => {
                self.selected = next_code(self.selected);
                self.selected
            }
            MenuCommand::PrevBlock => {
                self.selected = prev_block(self.selected);
                self.selected
            }
            MenuCommand::NextBlock => {
                self.selected = next_block(self.selected);
                self.selected
            }
            MenuCommand::NextDuration => {
                if self.selector >= SELECTOR_MAX {
                    self.selector = 0;
                }
                self.selector += 1;
                DIGIT_BASE + self.selector
            }
            MenuCommand::CommitStep => self.commit(store),
            MenuCommand::ClearAll => {
                self.armed = false;
                playback.reset();
                if let Err(e) = store.clear() {
                    log::warn!("Failed to clear macro: {:?}", e);
                }
                log::info!("Macro cleared");
                0
            }
            MenuCommand::ToggleArm => {
                if let Err(e) = store.finalize() {
                    log::warn!("Failed to persist macro length: {:?}", e);
                }
                self.armed = !self.armed;
                log::info!("Playback {}, {} steps", if self.armed { "armed" } else { "disarmed" }, store.len());
                0
            }
            MenuCommand::ShowCount => count_feedback(store.len()),
        };
        log::debug!("Menu {:?} -> {:#04x}", command, feedback);
        Feedback::Report(feedback)
    }

    fn commit<F: Storage>(&mut self, store: &mut MacroStore<F>) -> u8
    where
        F::Error: Debug,
    {
        let hold = self.hold();
        self.selector = 0;
        let Some(key) = HidKeyCode::from_usage(self.selected).filter(|k| k.is_recordable()) else {
            log::warn!("Selected code {:#04x} cannot be recorded", self.selected);
            return 0;
        };
        let step = MacroStep::from_keycode(key, hold);

        if store.is_full() {
            log::warn!("Macro full, wrapping back to the first step");
            store.rewind();
            return COMMIT_FEEDBACK.usage();
        }

        match store.append(step) {
            Ok(()) => COMMIT_FEEDBACK.usage(),
            Err(e) => {
                log::warn!("Failed to record step {:?}: {:?}", step, e);
                0
            }
        }
    }
}

/// Next key code, wrapping from the last code to the first.
pub fn next_code(code: u8) -> u8 {
    if code >= LAST_CODE { FIRST_CODE } else { code + 1 }
}

/// One block back. Codes in the first two blocks jump to the last code.
pub fn prev_block(code: u8) -> u8 {
    if code < FIRST_CODE + 2 * BLOCK_SIZE { LAST_CODE } else { code - BLOCK_SIZE }
}

/// One block forward. Codes in the last block jump to the first code.
pub fn next_block(code: u8) -> u8 {
    if code > LAST_CODE - BLOCK_SIZE { FIRST_CODE } else { code + BLOCK_SIZE }
}

/// Key code typed to show a step count.
pub fn count_feedback(len: usize) -> u8 {
    if len > COUNT_DISPLAY_BOUND {
        COUNT_OVERFLOW.usage()
    } else {
        DIGIT_BASE + len as u8
    }
}
