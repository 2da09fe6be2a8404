use embedded_hal::digital::InputPin;

use crate::matrix::KeyScanner;
use crate::{KeyIndex, NUM_KEYS};

/// DirectPinMatrix only has input pins, one per key.
///
/// Pin `i` is key `i + 1`. Pins are read in order and the scan stops at the first active one.
pub struct DirectPinMatrix<In: InputPin, const SIZE: usize> {
    /// Input pins of the pcb matrix
    direct_pins: [In; SIZE],
    /// Pin active level
    low_active: bool,
}

impl<In: InputPin, const SIZE: usize> DirectPinMatrix<In, SIZE> {
    /// Create a matrix from input pins.
    pub fn new(direct_pins: [In; SIZE], low_active: bool) -> Self {
        const { assert!(SIZE <= NUM_KEYS, "the keypad has at most 17 keys") };
        DirectPinMatrix { direct_pins, low_active }
    }

    /// Give the pins back.
    pub fn release(self) -> [In; SIZE] {
        self.direct_pins
    }

    fn is_active(&mut self, idx: usize) -> bool {
        let pin = &mut self.direct_pins[idx];
        let level = if self.low_active { pin.is_low() } else { pin.is_high() };
        match level {
            Ok(active) => active,
            Err(e) => {
                log::warn!("Failed to read key pin {}: {:?}", idx + 1, e);
                false
            }
        }
    }
}

impl<In: InputPin, const SIZE: usize> KeyScanner for DirectPinMatrix<In, SIZE> {
    fn scan(&mut self) -> KeyIndex {
        (0..SIZE)
            .find(|&idx| self.is_active(idx))
            .map(KeyIndex::from_position)
            .unwrap_or(KeyIndex::NONE)
    }
}
