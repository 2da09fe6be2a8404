use usbd_hid::descriptor::generator_prelude::*;

/// KeyReport is the 2-byte boot-style report of the keypad: a modifier byte, always 0 here,
/// and a single key code. Only one key is ever reported at a time.
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = GENERIC_DESKTOP, usage = KEYBOARD) = {
        (usage_page = KEYBOARD, usage_min = 0xE0, usage_max = 0xE7) = {
            #[packed_bits = 8] #[item_settings(data,variable,absolute)] modifier=input;
        };
        (usage_page = KEYBOARD, usage_min = 0x00, usage_max = 0x65) = {
            #[item_settings(data,array,absolute)] keycode=input;
        };
    }
)]
#[derive(Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyReport {
    pub modifier: u8,
    pub keycode: u8,
}

impl KeyReport {
    pub const fn new(keycode: u8) -> Self {
        Self { modifier: 0, keycode }
    }

    /// Wire form of the report.
    pub const fn as_bytes(&self) -> [u8; 2] {
        [self.modifier, self.keycode]
    }
}
