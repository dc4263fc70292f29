use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;
use sweep_common::keycodes::key_range::{MODIFIER_MAX, MODIFIER_MIN};

use crate::{
    processor::{KeyEvent, ReportChannel},
    warn,
};

pub const KEYBOARD_REPORT_ID: u8 = 6;
pub const MOUSE_REPORT_ID: u8 = 2;

/// One bit for every 8 bit usage id.
const KEY_BITS_SIZE: usize = 32;
const KEYBOARD_REPORT_SIZE: usize = KEY_BITS_SIZE + 2;

/// The HID transport: sends one report, first byte the report id.
#[allow(async_fn_in_trait)]
pub trait ReportWriter {
    type Error;

    async fn write_report(&mut self, report: &[u8]) -> Result<(), Self::Error>;
}

pub struct Reporter<W: ReportWriter> {
    writer: W,
    keyboard_report: [u8; KEYBOARD_REPORT_SIZE],
}

impl<W: ReportWriter> Reporter<W> {
    pub fn new(writer: W) -> Self {
        let mut keyboard_report = [0; KEYBOARD_REPORT_SIZE];
        keyboard_report[0] = KEYBOARD_REPORT_ID;
        Self {
            writer,
            keyboard_report,
        }
    }

    pub async fn run<M: RawMutex, const N: usize>(&mut self, reports: &ReportChannel<M, N>) -> ! {
        loop {
            let event = reports.receive().await;
            self.report(event).await;
        }
    }

    async fn write_report(&mut self, report: &[u8]) {
        if self.writer.write_report(report).await.is_err() {
            warn!("Failed to send report {}", report[0]);
        }
    }

    async fn write_keyboard_report(&mut self) {
        let report = self.keyboard_report;
        self.write_report(&report).await;
    }

    fn add_modifiers(&mut self, modifiers: u8) {
        self.keyboard_report[1] |= modifiers;
    }

    fn remove_modifiers(&mut self, modifiers: u8) {
        self.keyboard_report[1] &= !modifiers;
    }

    pub async fn report(&mut self, msg: KeyEvent) {
        match msg {
            KeyEvent::Basic(key, is_down) => {
                if is_down {
                    if !self.add_key(key) {
                        self.remove_key(key);
                        self.write_keyboard_report().await;
                        self.add_key(key);
                    }
                } else {
                    self.remove_key(key)
                };

                self.write_keyboard_report().await;
            }
            KeyEvent::Modifiers(modifiers, is_down) => {
                if is_down {
                    self.add_modifiers(modifiers);
                } else {
                    self.remove_modifiers(modifiers);
                }
                self.write_keyboard_report().await;
            }
            KeyEvent::PendingModifiers(modifiers, is_down) => {
                if is_down {
                    self.add_modifiers(modifiers);
                } else {
                    self.remove_modifiers(modifiers);
                }
            }
            KeyEvent::MouseButton(buttons) => {
                self.write_report(&[MOUSE_REPORT_ID, buttons, 0, 0, 0, 0])
                    .await;
            }
            KeyEvent::MouseMove { buttons, dx, dy } => {
                self.write_report(&[MOUSE_REPORT_ID, buttons, dx as u8, dy as u8, 0, 0])
                    .await;
            }
            KeyEvent::Clear => {
                self.keyboard_report.iter_mut().skip(1).for_each(|b| *b = 0);
                self.write_report(&[MOUSE_REPORT_ID, 0, 0, 0, 0, 0]).await;
                self.write_keyboard_report().await;
            }
            KeyEvent::Delay(n) => Timer::after_millis(n.into()).await,
        }
    }

    fn add_key(&mut self, key: u8) -> bool {
        if (MODIFIER_MIN as u8..=MODIFIER_MAX as u8).contains(&key) {
            self.keyboard_report[1] |= 1 << (key - MODIFIER_MIN as u8);
            return true;
        }
        if key > 3 {
            self.set_key_bit(key)
        } else {
            true
        }
    }

    fn remove_key(&mut self, key: u8) {
        if (MODIFIER_MIN as u8..=MODIFIER_MAX as u8).contains(&key) {
            self.keyboard_report[1] &= !(1 << (key - MODIFIER_MIN as u8));
            return;
        }
        if key > 3 {
            self.clear_key_bit(key);
        }
    }

    /// Byte offset into the report and bit mask for `key`.
    fn key_bit(key: u8) -> (usize, u8) {
        (2 + (key >> 3) as usize, 1 << (key & 7))
    }

    /// Returns false if `key` was already down.
    fn set_key_bit(&mut self, key: u8) -> bool {
        let (i, mask) = Self::key_bit(key);
        let was_up = self.keyboard_report[i] & mask == 0;
        self.keyboard_report[i] |= mask;
        was_up
    }

    /// Returns false if `key` was not down.
    fn clear_key_bit(&mut self, key: u8) -> bool {
        let (i, mask) = Self::key_bit(key);
        let was_down = self.keyboard_report[i] & mask != 0;
        self.keyboard_report[i] &= !mask;
        was_down
    }
}

#[cfg(test)]
#[path = "key_reporter_test.rs"]
mod test;
