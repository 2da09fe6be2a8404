use crate::{KeyIndex, NUM_KEYS};

/// Number of port groups the reference board spreads its keys over.
pub const PORT_GROUPS: usize = 3;

/// Reports the key currently held on the keypad.
///
/// Only one key is reportable at a time: when several keys are down the lowest index wins, so
/// the scan order must stay fixed. Implementations read the matrix as it is right now, debounce
/// is up to the caller.
pub trait KeyScanner {
    fn scan(&mut self) -> KeyIndex;
}

/// Raw access to the input ports of the matrix.
///
/// Returns one byte per port group. Inputs are pulled up, a pressed key reads as a cleared bit.
pub trait PortReader {
    fn read_ports(&mut self) -> [u8; PORT_GROUPS];
}

impl<F: FnMut() -> [u8; PORT_GROUPS]> PortReader for F {
    fn read_ports(&mut self) -> [u8; PORT_GROUPS] {
        self()
    }
}

/// Contiguous run of key inputs inside one port.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortGroup {
    /// Bit of the first key in the port
    pub first_bit: u8,
    /// Number of keys in the port
    pub len: u8,
}

impl PortGroup {
    pub const fn new(first_bit: u8, len: u8) -> Self {
        Self { first_bit, len }
    }
}

/// Maps port bits to key indices. Keys are numbered group after group, bit after bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortLayout {
    groups: [PortGroup; PORT_GROUPS],
}

impl PortLayout {
    /// Create a layout. Returns `None` if a group runs past bit 7 or the groups hold more keys
    /// than the keypad has.
    pub fn new(groups: [PortGroup; PORT_GROUPS]) -> Option<Self> {
        let fits = groups.iter().all(|g| g.first_bit as usize + g.len as usize <= 8);
        let total: usize = groups.iter().map(|g| g.len as usize).sum();
        if fits && total <= NUM_KEYS { Some(Self { groups }) } else { None }
    }

    /// Lowest pressed key in a port snapshot.
    pub fn decode(&self, ports: [u8; PORT_GROUPS]) -> KeyIndex {
        let mut position = 0;
        for (group, bits) in self.groups.iter().zip(ports) {
            for bit in group.first_bit..group.first_bit + group.len {
                if bits & (1 << bit) == 0 {
                    return KeyIndex::from_position(position);
                }
                position += 1;
            }
        }
        KeyIndex::NONE
    }
}

impl Default for PortLayout {
    /// Reference board wiring: keys 1-6 on bits 0-5 of the first port, keys 7-12 on bits 0-5
    /// of the second, keys 13-17 on bits 3-7 of the third (bits 0-2 carry the USB lines).
    fn default() -> Self {
        Self {
            groups: [PortGroup::new(0, 6), PortGroup::new(0, 6), PortGroup::new(3, 5)],
        }
    }
}

/// Matrix read straight from GPIO port registers.
pub struct PortMatrix<R: PortReader> {
    reader: R,
    layout: PortLayout,
}

impl<R: PortReader> PortMatrix<R> {
    pub fn new(reader: R, layout: PortLayout) -> Self {
        Self { reader, layout }
    }
}

impl<R: PortReader> KeyScanner for PortMatrix<R> {
    fn scan(&mut self) -> KeyIndex {
        let ports = self.reader.read_ports();
        self.layout.decode(ports)
    }
}
