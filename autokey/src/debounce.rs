use crate::KeyIndex;
use crate::config::DebounceConfig;

/// Debounce state
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The level changed and the change is accepted.
    Debounced,
    /// The level changed too soon after the previous change, the change is swallowed.
    InProgress,
    /// The level did not change.
    Ignored,
}

pub trait DebouncerTrait {
    /// Feed the scanner output of one loop iteration.
    fn detect_change_with_debounce(&mut self, key: KeyIndex) -> DebounceState;
}

/// Loop-count debouncer.
///
/// Counts loop iterations since the last level change. A new change is accepted only if the
/// previous level held for more than `threshold` iterations, so contact chatter right after a
/// press or a release is dropped. A swallowed change still becomes the reference level and
/// restarts the count.
pub struct CounterDebouncer {
    config: DebounceConfig,
    /// Iterations since the last level change, saturating
    quiet: u16,
    /// Last level seen, accepted or not
    last: KeyIndex,
}

impl Default for CounterDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl CounterDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            quiet: 0,
            last: KeyIndex::NONE,
        }
    }

    /// Last level seen by the debouncer.
    pub fn level(&self) -> KeyIndex {
        self.last
    }
}

impl DebouncerTrait for CounterDebouncer {
    fn detect_change_with_debounce(&mut self, key: KeyIndex) -> DebounceState {
        self.quiet = self.quiet.saturating_add(1).min(self.config.saturation);

        if key == self.last {
            return DebounceState::Ignored;
        }

        let settled = self.quiet > self.config.threshold;
        self.last = key;
        self.quiet = 0;

        if settled {
            DebounceState::Debounced
        } else {
            log::trace!("Suppressed transition to key {}", key.get());
            DebounceState::InProgress
        }
    }
}
