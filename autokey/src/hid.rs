//! Delivery of key reports to the host.
use usb_device::UsbError;
use usb_device::bus::{UsbBus, UsbBusAllocator};
use usb_device::device::{StringDescriptors, UsbDevice, UsbDeviceBuilder, UsbDeviceState, UsbVidPid};
use usb_device::prelude::BuilderError;
use usb_device::LangID;
use usbd_hid::descriptor::SerializedDescriptor;
use usbd_hid::hid_class::HIDClass;

use crate::config::UsbConfig;
use crate::descriptor::KeyReport;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// The previous report has not been picked up by the host yet.
    WouldBlock,
    /// The host has not configured the device.
    Disconnected,
    /// The transport rejected the report.
    Transport,
}

/// Sink for key reports, usually the HID interrupt endpoint.
///
/// A writer must not overwrite a report that is still waiting for the host: while the endpoint
/// is busy it answers [`ReportError::WouldBlock`] and the caller tries again later.
pub trait ReportWriter {
    fn write_report(&mut self, report: &KeyReport) -> Result<(), ReportError>;
}

/// Keeps the report the host should see and hands it to the writer once the writer is ready.
///
/// Only the latest key code matters: marking a new one while a report is still pending
/// replaces the pending report, never the one already on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reporter {
    /// Key code currently reported
    current: u8,
    /// Report waiting for the writer
    pending: Option<KeyReport>,
}

impl Reporter {
    pub const fn new() -> Self {
        Self {
            current: 0,
            pending: None,
        }
    }

    /// Report `keycode` at the next flush, even if it did not change.
    pub fn mark(&mut self, keycode: u8) {
        self.current = keycode;
        self.pending = Some(KeyReport::new(keycode));
    }

    /// Key code the host sees, or will see once the pending report is delivered.
    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Try to deliver the pending report. Returns true if a report went out.
    pub fn flush<W: ReportWriter>(&mut self, writer: &mut W) -> bool {
        let Some(report) = self.pending else {
            return false;
        };
        match writer.write_report(&report) {
            Ok(()) => {
                log::trace!("Sent report {:?}", report.as_bytes());
                self.pending = None;
                true
            }
            Err(ReportError::WouldBlock) | Err(ReportError::Disconnected) => false,
            Err(e) => {
                log::warn!("Dropping report {:?}: {:?}", report.as_bytes(), e);
                self.pending = None;
                false
            }
        }
    }
}

impl<B: UsbBus> ReportWriter for HIDClass<'_, B> {
    fn write_report(&mut self, report: &KeyReport) -> Result<(), ReportError> {
        match self.push_input(report) {
            Ok(_) => Ok(()),
            Err(UsbError::WouldBlock) => Err(ReportError::WouldBlock),
            Err(e) => {
                log::warn!("Failed to push key report: {:?}", e);
                Err(ReportError::Transport)
            }
        }
    }
}

/// The keypad's USB device: a single HID keyboard interface.
pub struct KeypadUsbDevice<'a, B: UsbBus> {
    /// Usb hid device instance
    hid: HIDClass<'a, B>,
    usb_device: UsbDevice<'a, B>,
}

impl<'a, B: UsbBus> KeypadUsbDevice<'a, B> {
    pub fn new(usb_allocator: &'a UsbBusAllocator<B>, config: &UsbConfig) -> Result<Self, BuilderError> {
        let hid = HIDClass::new(usb_allocator, KeyReport::desc(), config.poll_ms);
        let usb_device = UsbDeviceBuilder::new(usb_allocator, UsbVidPid(config.vid, config.pid))
            .strings(&[StringDescriptors::new(LangID::EN)
                .manufacturer(config.manufacturer)
                .product(config.product)
                .serial_number(config.serial_number)])?
            .build();
        Ok(KeypadUsbDevice { hid, usb_device })
    }

    /// Usb polling, call it at least every 10ms
    pub fn usb_poll(&mut self) -> bool {
        self.usb_device.poll(&mut [&mut self.hid])
    }
}

impl<B: UsbBus> ReportWriter for KeypadUsbDevice<'_, B> {
    fn write_report(&mut self, report: &KeyReport) -> Result<(), ReportError> {
        if self.usb_device.state() != UsbDeviceState::Configured {
            return Err(ReportError::Disconnected);
        }
        self.hid.write_report(report)
    }
}
