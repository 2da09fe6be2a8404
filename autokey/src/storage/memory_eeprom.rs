use embedded_storage::{ReadStorage, Storage};

/// Errors of [`MemoryEeprom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryEepromError {
    /// Access past the end of the medium
    OutOfBounds,
    /// Write to a medium marked read-only
    ReadOnly,
}

/// A RAM backed EEPROM, which can be used when no real medium is available.
///
/// Starts erased (all 0xFF) like a fresh part, and counts writes so callers can check how often
/// the medium gets hit.
pub struct MemoryEeprom<const SIZE: usize> {
    data: [u8; SIZE],
    read_only: bool,
    writes: usize,
}

impl<const SIZE: usize> Default for MemoryEeprom<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> MemoryEeprom<SIZE> {
    pub fn new() -> Self {
        Self::from_bytes([0xFF; SIZE])
    }

    pub fn from_bytes(data: [u8; SIZE]) -> Self {
        Self {
            data,
            read_only: false,
            writes: 0,
        }
    }

    /// Reject every write from now on.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful write calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn as_bytes(&self) -> &[u8; SIZE] {
        &self.data
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; SIZE] {
        &mut self.data
    }

    fn range(offset: u32, len: usize) -> Result<core::ops::Range<usize>, MemoryEepromError> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(MemoryEepromError::OutOfBounds)?;
        if end > SIZE {
            return Err(MemoryEepromError::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl<const SIZE: usize> ReadStorage for MemoryEeprom<SIZE> {
    type Error = MemoryEepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = Self::range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        SIZE
    }
}

impl<const SIZE: usize> Storage for MemoryEeprom<SIZE> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(MemoryEepromError::ReadOnly);
        }
        let range = Self::range(offset, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
