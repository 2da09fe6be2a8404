use crate::{HidKeyCode, MacroStep};

/// Position of the playback scheduler inside the macro.
///
/// A step's key goes out once its hold has elapsed since the previous emission, every other
/// tick reports a release. Emissions therefore land on the running sum of the hold durations.
/// The cycle restarts at the first step after the last one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackState {
    /// Step whose key goes out next
    cursor: usize,
    /// Playback ticks since the last emission, saturating
    elapsed: u8,
}

impl PlaybackState {
    pub const fn new() -> Self {
        Self { cursor: 0, elapsed: 0 }
    }

    /// Run one playback tick over `steps`.
    ///
    /// Returns the key code to report, `0` for a release tick, or `None` when there is nothing
    /// to play.
    pub fn tick(&mut self, steps: &[MacroStep]) -> Option<u8> {
        if steps.is_empty() {
            return None;
        }
        // The macro may have shrunk under the cursor
        if self.cursor >= steps.len() {
            self.cursor = 0;
        }

        let step = steps[self.cursor];
        let out = if self.elapsed >= step.ticks() {
            self.cursor = (self.cursor + 1) % steps.len();
            self.elapsed = 0;
            log::debug!("Playback emits {:?}, next step {}", HidKeyCode::from_usage(step.key), self.cursor);
            step.key
        } else {
            0
        };
        self.elapsed = self.elapsed.saturating_add(1);
        Some(out)
    }

    /// Back to the first step, with a fresh hold count.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn elapsed(&self) -> u8 {
        self.elapsed
    }
}
