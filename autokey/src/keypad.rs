use core::fmt::Debug;

use embedded_storage::Storage;

use crate::config::{CommandMap, KeypadConfig};
use crate::debounce::{DebounceState, DebouncerTrait};
use crate::hid::{ReportWriter, Reporter};
use crate::matrix::KeyScanner;
use crate::menu::{Feedback, MenuState};
use crate::playback::PlaybackState;
use crate::storage::MacroStore;
use crate::tick::{TickDivider, TickSource};

/// The whole keypad: collaborators plus the state the control loop carries between iterations.
pub struct Keypad<S: KeyScanner, D: DebouncerTrait, F: Storage, T: TickSource> {
    scanner: S,
    debouncer: D,
    store: MacroStore<F>,
    tick: T,
    divider: TickDivider,
    commands: CommandMap,
    menu: MenuState,
    playback: PlaybackState,
    reporter: Reporter,
}

impl<S: KeyScanner, D: DebouncerTrait, F: Storage, T: TickSource> Keypad<S, D, F, T>
where
    F::Error: Debug,
{
    /// Create the keypad, loading the recorded macro from `storage`.
    pub fn new(scanner: S, debouncer: D, storage: F, tick: T, config: &KeypadConfig) -> Self {
        Self {
            scanner,
            debouncer,
            store: MacroStore::load(storage),
            tick,
            divider: TickDivider::new(config.tick.playback_divider),
            commands: config.commands.clone(),
            menu: MenuState::new(),
            playback: PlaybackState::new(),
            reporter: Reporter::new(),
        }
    }

    /// Run one control-loop iteration: scan and debounce the keys, feed the menu, step playback
    /// on a playback tick, then hand the pending report to `writer` if there is one.
    pub fn poll<W: ReportWriter>(&mut self, writer: &mut W) {
        let key = self.scanner.scan();
        if self.debouncer.detect_change_with_debounce(key) == DebounceState::Debounced {
            log::debug!("Key transition to {}", key.get());
            match self
                .menu
                .handle(key, &self.commands, &mut self.store, &mut self.playback)
            {
                Feedback::Report(code) => self.reporter.mark(code),
                // Resend the current code
                Feedback::Keep => self.reporter.mark(self.reporter.current()),
            }
        }

        if self.tick.take_elapsed() && self.divider.on_edge() {
            self.playback_tick();
        }

        self.reporter.flush(writer);
    }

    fn playback_tick(&mut self) {
        if !self.menu.armed() {
            return;
        }
        match self.playback.tick(self.store.steps()) {
            Some(code) => self.reporter.mark(code),
            None => log::trace!("Armed with an empty macro"),
        }
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn store(&self) -> &MacroStore<F> {
        &self.store
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Key code the host sees, or will see once the pending report is delivered.
    pub fn out_key(&self) -> u8 {
        self.reporter.current()
    }

    /// Tear the keypad down, returning the storage medium.
    pub fn release(self) -> F {
        self.store.release()
    }
}
