//! Hooks into the board support code.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

pub type ResetFn = &'static (dyn Fn() + Sync);

static RESET_TO_USB_BOOT: CriticalSectionMutex<RefCell<Option<ResetFn>>> =
    CriticalSectionMutex::new(RefCell::new(None));

/// Restart into the USB bootloader. Does nothing unless a handler was registered with
/// [handle_reset_to_usb_boot]; the handler is only run once.
pub fn reset_to_usb_boot() -> bool {
    let f = RESET_TO_USB_BOOT.lock(|r| r.borrow_mut().take());
    match f {
        Some(f) => {
            f();
            true
        }
        None => {
            crate::info!("no usb boot handler");
            false
        }
    }
}

/// Register the function run when the `BOOT` key is released.
///
/// ```
/// use sweep_firmware::firmware_functions::handle_reset_to_usb_boot;
/// # pub mod embassy_rp { pub mod rom_data { pub fn reset_to_usb_boot(_: u32, _: u32) {} } }
///
/// fn usb_boot() {
///     embassy_rp::rom_data::reset_to_usb_boot(0, 0);
/// }
///
/// handle_reset_to_usb_boot(Some(&usb_boot));
/// ```
pub fn handle_reset_to_usb_boot(value: Option<ResetFn>) {
    RESET_TO_USB_BOOT.lock(|r| {
        *r.borrow_mut() = value;
    });
}
