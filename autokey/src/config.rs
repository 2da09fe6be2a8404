use embassy_time::Duration;

use crate::{DEBOUNCE_SATURATION, DEBOUNCE_THRESHOLD, KeyIndex, MenuCommand, NUM_KEYS, PLAYBACK_DIVIDER, TIMER_PERIOD_MS};

/// The config struct for the keypad.
///
/// The defaults reproduce the reference board: 17 keys with the menu on keys 1-9, a 20ms
/// hardware tick and a 100ms playback tick.
#[derive(Clone, Debug, Default)]
pub struct KeypadConfig {
    pub debounce: DebounceConfig,
    pub tick: TickConfig,
    pub commands: CommandMap,
    pub usb: UsbConfig,
}

/// Config for usb
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbConfig {
    pub vid: u16,
    pub pid: u16,
    pub manufacturer: &'static str,
    pub product: &'static str,
    pub serial_number: &'static str,
    /// Interrupt endpoint polling interval, in ms
    pub poll_ms: u8,
}

impl Default for UsbConfig {
    /// The shared VID/PID pair for HID keyboards
    fn default() -> Self {
        Self {
            vid: 0x16c0,
            pid: 0x27db,
            manufacturer: "autokey",
            product: "Macro Keypad",
            serial_number: "00000001",
            poll_ms: 10,
        }
    }
}

/// Loop-count based debounce tuning.
///
/// Counted in control-loop iterations, not in time: the keypad feel depends on how fast the
/// loop spins, like the firmware it replaces.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// A transition is accepted only when the previous level lasted more iterations than this.
    pub threshold: u16,
    /// The iteration counter saturates here.
    pub saturation: u16,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold: DEBOUNCE_THRESHOLD,
            saturation: DEBOUNCE_SATURATION,
        }
    }
}

/// Tick timing.
#[derive(Clone, Copy, Debug)]
pub struct TickConfig {
    /// Period of the hardware timer.
    pub timer_period: Duration,
    /// Number of hardware ticks per playback tick.
    pub playback_divider: u8,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            timer_period: Duration::from_millis(TIMER_PERIOD_MS),
            playback_divider: PLAYBACK_DIVIDER,
        }
    }
}

/// Binds physical keys to menu commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandMap {
    bindings: [Option<MenuCommand>; NUM_KEYS],
}

impl CommandMap {
    /// A map with no key bound.
    pub const fn empty() -> Self {
        Self {
            bindings: [None; NUM_KEYS],
        }
    }

    /// Bind `key` to `command`, replacing any previous binding. Binding [`KeyIndex::NONE`] is a
    /// no-op.
    pub fn bind(mut self, key: KeyIndex, command: MenuCommand) -> Self {
        if let Some(slot) = Self::slot(key) {
            self.bindings[slot] = Some(command);
        }
        self
    }

    /// Command bound to `key`, if any.
    pub fn command(&self, key: KeyIndex) -> Option<MenuCommand> {
        Self::slot(key).and_then(|slot| self.bindings[slot])
    }

    fn slot(key: KeyIndex) -> Option<usize> {
        (key.get() as usize).checked_sub(1).filter(|slot| *slot < NUM_KEYS)
    }
}

impl Default for CommandMap {
    fn default() -> Self {
        let key = |n: usize| KeyIndex::from_position(n - 1);
        Self::empty()
            .bind(key(1), MenuCommand::PrevBlock)
            .bind(key(2), MenuCommand::NextBlock)
            .bind(key(3), MenuCommand::NextCode)
            .bind(key(4), MenuCommand::CommitStep)
            .bind(key(5), MenuCommand::NextDuration)
            .bind(key(7), MenuCommand::ShowCount)
            .bind(key(8), MenuCommand::ClearAll)
            .bind(key(9), MenuCommand::ToggleArm)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_command_map() {
        let map = CommandMap::default();
        let key = |n: u8| KeyIndex::new(n).unwrap();
        assert_eq!(map.command(key(1)), Some(MenuCommand::PrevBlock));
        assert_eq!(map.command(key(3)), Some(MenuCommand::NextCode));
        assert_eq!(map.command(key(4)), Some(MenuCommand::CommitStep));
        assert_eq!(map.command(key(6)), None);
        assert_eq!(map.command(key(9)), Some(MenuCommand::ToggleArm));
        assert_eq!(map.command(key(17)), None);
        assert_eq!(map.command(KeyIndex::NONE), None);
    }

    #[test]
    fn test_rebind() {
        let map = CommandMap::empty()
            .bind(KeyIndex::from_position(16), MenuCommand::ToggleArm)
            .bind(KeyIndex::NONE, MenuCommand::ClearAll);
        assert_eq!(map.command(KeyIndex::from_position(16)), Some(MenuCommand::ToggleArm));
        assert_eq!(map.command(KeyIndex::NONE), None);
    }

    #[test]
    fn test_default_timing() {
        let config = KeypadConfig::default();
        assert_eq!(config.tick.timer_period, Duration::from_millis(20));
        assert_eq!(config.tick.playback_divider, 5);
        assert_eq!(config.debounce.threshold, 1000);
        assert_eq!(config.debounce.saturation, 40000);
    }
}
