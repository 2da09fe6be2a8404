//! Persistent macro store.
//!
//! On-media layout:
//!
//! | offset | size | content |
//! | --- | --- | --- |
//! | 0 | 1 | number of recorded steps |
//! | 2 + 2 * i | 2 | step `i`, low byte key usage, high byte hold class |
//!
//! Up to [`MACRO_CAPACITY`] steps, the last word lives at offset 128.
pub mod memory_eeprom;

use core::fmt::Debug;

use autokey_types::step::StepWord;
use byteorder::{ByteOrder, LittleEndian};
use embedded_storage::Storage;

use crate::{MACRO_CAPACITY, MacroSequence, MacroStep};

/// Offset of the length byte.
pub const LENGTH_OFFSET: u32 = 0;
/// Offset of the first step word.
pub const STEP_BASE_OFFSET: u32 = 2;
/// Size of one step word.
pub const STEP_SIZE: u32 = 2;
/// Bytes of medium the layout needs.
pub const LAYOUT_SIZE: usize = STEP_BASE_OFFSET as usize + STEP_SIZE as usize * MACRO_CAPACITY;
/// A stored length at or above this is garbage, erased EEPROM reads 0xFF.
pub const CORRUPT_LENGTH: u8 = 0x48;

/// Errors of the persistent store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError<E> {
    /// The medium failed a read.
    Read(E),
    /// The medium failed a write.
    Write(E),
    /// Step index past the layout.
    IndexOutOfRange(usize),
    /// The sequence already holds [`MACRO_CAPACITY`] steps.
    Full,
}

/// Owns the macro sequence and its copy on the non-volatile medium.
///
/// Every mutation is written to the medium before the call returns. Appends change the
/// in-memory sequence only after the write went through. [`MacroStore::clear`] is the
/// exception: memory is emptied even when the length write fails, and the medium then keeps
/// the old macro until the next successful finalize or clear.
pub struct MacroStore<F: Storage> {
    storage: F,
    steps: MacroSequence,
}

impl<F: Storage> MacroStore<F>
where
    F::Error: Debug,
{
    /// Read the macro back from the medium.
    ///
    /// Never fails: a failed read, or a length that cannot be right, leaves the store empty.
    pub fn load(storage: F) -> Self {
        let mut store = Self {
            storage,
            steps: MacroSequence::new(),
        };

        match store.read_steps() {
            Ok(steps) => {
                log::info!("Loaded macro with {} steps", steps.len());
                store.steps = steps;
            }
            Err(e) => log::warn!("Failed to load macro, starting empty: {:?}", e),
        }
        store
    }

    fn read_steps(&mut self) -> Result<MacroSequence, StorageError<F::Error>> {
        let mut buf = [0u8; 1];
        self.storage.read(LENGTH_OFFSET, &mut buf).map_err(StorageError::Read)?;
        let len = buf[0];

        let mut steps = MacroSequence::new();
        if len >= CORRUPT_LENGTH {
            log::warn!("Stored macro length {:#x} is uninitialized, treating as empty", len);
            return Ok(steps);
        }
        if len as usize > MACRO_CAPACITY {
            log::warn!("Stored macro length {} exceeds capacity, treating as empty", len);
            return Ok(steps);
        }

        for index in 0..len as usize {
            let mut word = [0u8; STEP_SIZE as usize];
            self.storage
                .read(Self::step_offset(index), &mut word)
                .map_err(StorageError::Read)?;
            let step = MacroStep::from_word(StepWord::from_bits(LittleEndian::read_u16(&word)));
            steps.push(step).map_err(|_| StorageError::IndexOutOfRange(index))?;
        }
        Ok(steps)
    }

    /// Write one step word to its slot. The in-memory sequence is left alone.
    pub fn commit_step(&mut self, index: usize, step: MacroStep) -> Result<(), StorageError<F::Error>> {
        if index >= MACRO_CAPACITY {
            return Err(StorageError::IndexOutOfRange(index));
        }
        let mut word = [0u8; STEP_SIZE as usize];
        LittleEndian::write_u16(&mut word, step.to_word().into_bits());
        self.storage
            .write(Self::step_offset(index), &word)
            .map_err(StorageError::Write)
    }

    /// Write the length byte.
    pub fn commit_length(&mut self, len: u8) -> Result<(), StorageError<F::Error>> {
        self.storage.write(LENGTH_OFFSET, &[len]).map_err(StorageError::Write)
    }

    /// Append a step: its word goes to the medium, then the step joins the sequence.
    ///
    /// The length byte is not written, see [`MacroStore::finalize`].
    pub fn append(&mut self, step: MacroStep) -> Result<(), StorageError<F::Error>> {
        if self.steps.is_full() {
            return Err(StorageError::Full);
        }
        self.commit_step(self.steps.len(), step)?;
        self.steps.push(step).map_err(|_| StorageError::Full)
    }

    /// Persist the current length, making appended steps survive a power cycle.
    pub fn finalize(&mut self) -> Result<(), StorageError<F::Error>> {
        self.commit_length(self.steps.len() as u8)
    }

    /// Drop every step, on the medium too. Memory is empty afterwards whether or not the
    /// medium write succeeded.
    pub fn clear(&mut self) -> Result<(), StorageError<F::Error>> {
        self.steps.clear();
        self.commit_length(0)
    }

    /// Wrap the length counter back to zero without touching the medium. Step words stay where
    /// they are and get overwritten by the next appends.
    pub fn rewind(&mut self) {
        self.steps.clear();
    }

    pub fn steps(&self) -> &[MacroStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.steps.is_full()
    }

    /// Give the medium back.
    pub fn release(self) -> F {
        self.storage
    }

    fn step_offset(index: usize) -> u32 {
        STEP_BASE_OFFSET + index as u32 * STEP_SIZE
    }
}
