use std::cell::Cell;
use std::rc::Rc;

use autokey::config::{DebounceConfig, KeypadConfig};
use autokey::debounce::CounterDebouncer;
use autokey::descriptor::KeyReport;
use autokey::hid::{ReportError, ReportWriter};
use autokey::matrix::KeyScanner;
use autokey::storage::LAYOUT_SIZE;
use autokey::storage::memory_eeprom::MemoryEeprom;
use autokey::tick::TickSource;
use autokey::{KeyIndex, Keypad};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub type Eeprom = MemoryEeprom<LAYOUT_SIZE>;

pub const KEY_PREV_BLOCK: u8 = 1;
pub const KEY_NEXT_BLOCK: u8 = 2;
pub const KEY_NEXT_CODE: u8 = 3;
pub const KEY_COMMIT: u8 = 4;
pub const KEY_DURATION: u8 = 5;
pub const KEY_SHOW_COUNT: u8 = 7;
pub const KEY_CLEAR: u8 = 8;
pub const KEY_ARM: u8 = 9;

/// Debounce threshold of the test keypad, in loop iterations.
const THRESHOLD: u16 = 2;
/// Loop iterations a level is held so the next transition gets through the debouncer.
const SETTLE: usize = THRESHOLD as usize + 2;

/// Scanner reporting whatever key the test holds down.
pub struct HeldKey(Rc<Cell<KeyIndex>>);

impl KeyScanner for HeldKey {
    fn scan(&mut self) -> KeyIndex {
        self.0.get()
    }
}

/// Timer flag raised by the test, cleared on read.
pub struct TimerFlag(Rc<Cell<bool>>);

impl TickSource for TimerFlag {
    fn take_elapsed(&mut self) -> bool {
        self.0.replace(false)
    }
}

/// Records the key code of every delivered report.
#[derive(Default)]
pub struct RecordingWriter {
    pub reports: Vec<u8>,
}

impl ReportWriter for RecordingWriter {
    fn write_report(&mut self, report: &KeyReport) -> Result<(), ReportError> {
        assert_eq!(report.modifier, 0);
        self.reports.push(report.keycode);
        Ok(())
    }
}

pub type TestKeypad = Keypad<HeldKey, CounterDebouncer, Eeprom, TimerFlag>;

/// A keypad wired to in-memory collaborators.
pub struct Harness {
    pub keypad: TestKeypad,
    pub writer: RecordingWriter,
    key: Rc<Cell<KeyIndex>>,
    timer: Rc<Cell<bool>>,
}

impl Harness {
    pub fn new(eeprom: Eeprom) -> Self {
        let key = Rc::new(Cell::new(KeyIndex::NONE));
        let timer = Rc::new(Cell::new(false));
        let config = KeypadConfig {
            debounce: DebounceConfig {
                threshold: THRESHOLD,
                saturation: 100,
            },
            ..Default::default()
        };
        let keypad = Keypad::new(
            HeldKey(key.clone()),
            CounterDebouncer::new(config.debounce),
            eeprom,
            TimerFlag(timer.clone()),
            &config,
        );
        let mut harness = Self {
            keypad,
            writer: RecordingWriter::default(),
            key,
            timer,
        };
        harness.settle();
        harness
    }

    /// Keep the current level for long enough to pass the debouncer.
    pub fn settle(&mut self) {
        for _ in 0..SETTLE {
            self.keypad.poll(&mut self.writer);
        }
    }

    /// Press and release a key, returning the reports it produced.
    pub fn tap(&mut self, key: u8) -> Vec<u8> {
        let before = self.writer.reports.len();
        self.key.set(KeyIndex::new(key).unwrap());
        self.settle();
        self.key.set(KeyIndex::NONE);
        self.settle();
        self.writer.reports[before..].to_vec()
    }

    /// Raise the timer flag for one loop iteration.
    pub fn timer_edge(&mut self) {
        self.timer.set(true);
        self.keypad.poll(&mut self.writer);
    }

    /// Run the five timer edges of one playback tick, returning the key code reported after it.
    pub fn playback_tick(&mut self) -> u8 {
        for _ in 0..5 {
            self.timer_edge();
        }
        self.keypad.out_key()
    }

    pub fn release(self) -> Eeprom {
        self.keypad.release()
    }
}
