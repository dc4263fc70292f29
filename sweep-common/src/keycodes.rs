pub mod key_range {
    pub const NO: u16 = 0x0;
    pub const TRANSPARENT: u16 = 0x1;

    pub const BASIC_MIN: u16 = 0x4;
    pub const BASIC_MAX: u16 = 0xdf;
    pub const MODIFIER_MIN: u16 = 0xe0;
    pub const MODIFIER_MAX: u16 = 0xe7;

    /// A basic key sent with left shift held, `SHIFTED_MIN | basic`.
    pub const SHIFTED_MIN: u16 = 0x200;
    pub const SHIFTED_MAX: u16 = SHIFTED_MIN + 0xff;

    pub const MOUSE_MIN: u16 = 0x400;
    pub const MOUSE_BUTTON: u16 = 0;
    pub const MOUSE_BUTTON_END: u16 = 7;
    /// Movement keys in the order left, right, up, down.
    pub const MOUSE_DELTA: u16 = MOUSE_BUTTON_END + 1;
    pub const MOUSE_DELTA_END: u16 = MOUSE_DELTA + 3;
    pub const MOUSE_MAX: u16 = MOUSE_MIN + MOUSE_DELTA_END;

    pub const MAX_LAYER_N: u16 = 7;
    /// Momentary layer: active while held.
    pub const LAYER: u16 = 0x600;
    pub const LAYER_MIN: u16 = LAYER;
    pub const LAYER_MAX: u16 = LAYER_MIN + MAX_LAYER_N;

    pub const FIRMWARE_MIN: u16 = 0x7c00;
    pub const FW_RESET_TO_USB_BOOT: u16 = FIRMWARE_MIN;
    pub const FIRMWARE_MAX: u16 = FIRMWARE_MIN + 0xff;

    /// `TAP_HOLD_MIN + n` is the tap/hold key configured at index `n`.
    pub const TAP_HOLD_MIN: u16 = 0x7e00;
    pub const TAP_HOLD_MAX: u16 = TAP_HOLD_MIN + 0xff;

    pub const CUSTOM_MIN: u16 = 0x7f00;
    pub const CUSTOM_COPY: u16 = CUSTOM_MIN;
    pub const CUSTOM_JIGGLE: u16 = CUSTOM_MIN + 1;
    pub const CUSTOM_GRAVE_ESCAPE: u16 = CUSTOM_MIN + 2;
    pub const CUSTOM_MAX: u16 = CUSTOM_MIN + 0xff;

    pub const fn shifted(code: u16) -> u16 {
        SHIFTED_MIN | (code & 0xff)
    }

    pub const fn layer(n: u16) -> u16 {
        LAYER + n
    }

    pub const fn tap_hold(n: u16) -> u16 {
        TAP_HOLD_MIN + n
    }
}

/// HID modifier bits as they appear in byte 0 of a keyboard report.
pub mod modifiers {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_GUI: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_GUI: u8 = 0x80;

    pub const MASK_SHIFT: u8 = LEFT_SHIFT | RIGHT_SHIFT;
    pub const MASK_GUI: u8 = LEFT_GUI | RIGHT_GUI;
    pub const MEH: u8 = LEFT_CTRL | LEFT_SHIFT | LEFT_ALT;

    /// The modifier bit of a modifier keycode (`0xe0..=0xe7`).
    pub const fn bit(code: u16) -> u8 {
        1 << (code - super::key_range::MODIFIER_MIN)
    }
}

/// HID keyboard usages plus the firmware's own codes.
pub mod kc {
    use super::key_range;

    pub const NO: u16 = key_range::NO;
    pub const TRNS: u16 = key_range::TRANSPARENT;

    pub const A: u16 = 0x04;
    pub const B: u16 = 0x05;
    pub const C: u16 = 0x06;
    pub const D: u16 = 0x07;
    pub const E: u16 = 0x08;
    pub const F: u16 = 0x09;
    pub const G: u16 = 0x0a;
    pub const H: u16 = 0x0b;
    pub const I: u16 = 0x0c;
    pub const J: u16 = 0x0d;
    pub const K: u16 = 0x0e;
    pub const L: u16 = 0x0f;
    pub const M: u16 = 0x10;
    pub const N: u16 = 0x11;
    pub const O: u16 = 0x12;
    pub const P: u16 = 0x13;
    pub const Q: u16 = 0x14;
    pub const R: u16 = 0x15;
    pub const S: u16 = 0x16;
    pub const T: u16 = 0x17;
    pub const U: u16 = 0x18;
    pub const V: u16 = 0x19;
    pub const W: u16 = 0x1a;
    pub const X: u16 = 0x1b;
    pub const Y: u16 = 0x1c;
    pub const Z: u16 = 0x1d;
    pub const N1: u16 = 0x1e;
    pub const N2: u16 = 0x1f;
    pub const N3: u16 = 0x20;
    pub const N4: u16 = 0x21;
    pub const N5: u16 = 0x22;
    pub const N6: u16 = 0x23;
    pub const N7: u16 = 0x24;
    pub const N8: u16 = 0x25;
    pub const N9: u16 = 0x26;
    pub const N0: u16 = 0x27;
    pub const ENTER: u16 = 0x28;
    pub const ESCAPE: u16 = 0x29;
    pub const BSPC: u16 = 0x2a;
    pub const TAB: u16 = 0x2b;
    pub const SPACE: u16 = 0x2c;
    pub const MINUS: u16 = 0x2d;
    pub const EQUAL: u16 = 0x2e;
    pub const LBRC: u16 = 0x2f;
    pub const RBRC: u16 = 0x30;
    pub const BSLS: u16 = 0x31;
    pub const SCLN: u16 = 0x33;
    pub const QUOT: u16 = 0x34;
    pub const GRV: u16 = 0x35;
    pub const COMM: u16 = 0x36;
    pub const DOT: u16 = 0x37;
    pub const SLSH: u16 = 0x38;
    pub const F1: u16 = 0x3a;
    pub const F2: u16 = 0x3b;
    pub const F3: u16 = 0x3c;
    pub const F4: u16 = 0x3d;
    pub const F5: u16 = 0x3e;
    pub const F6: u16 = 0x3f;
    pub const F7: u16 = 0x40;
    pub const F8: u16 = 0x41;
    pub const F9: u16 = 0x42;
    pub const F10: u16 = 0x43;
    pub const HOME: u16 = 0x4a;
    pub const PGUP: u16 = 0x4b;
    pub const DEL: u16 = 0x4c;
    pub const END: u16 = 0x4d;
    pub const PGDN: u16 = 0x4e;
    pub const RIGHT: u16 = 0x4f;
    pub const LEFT: u16 = 0x50;
    pub const DOWN: u16 = 0x51;
    pub const UP: u16 = 0x52;

    pub const LCTL: u16 = 0xe0;
    pub const LSFT: u16 = 0xe1;
    pub const LALT: u16 = 0xe2;
    pub const LGUI: u16 = 0xe3;
    pub const RCTL: u16 = 0xe4;
    pub const RSFT: u16 = 0xe5;
    pub const RALT: u16 = 0xe6;
    pub const RGUI: u16 = 0xe7;

    pub const PIPE: u16 = key_range::shifted(BSLS);
    pub const UNDS: u16 = key_range::shifted(MINUS);
    pub const PLUS: u16 = key_range::shifted(EQUAL);

    pub const BTN1: u16 = key_range::MOUSE_MIN + key_range::MOUSE_BUTTON;
    pub const BTN2: u16 = BTN1 + 1;
    pub const MS_L: u16 = key_range::MOUSE_MIN + key_range::MOUSE_DELTA;
    pub const MS_R: u16 = MS_L + 1;
    pub const MS_U: u16 = MS_L + 2;
    pub const MS_D: u16 = MS_L + 3;

    pub const BOOT: u16 = key_range::FW_RESET_TO_USB_BOOT;
    pub const COPY: u16 = key_range::CUSTOM_COPY;
    pub const JIGGLE: u16 = key_range::CUSTOM_JIGGLE;
    pub const GESC: u16 = key_range::CUSTOM_GRAVE_ESCAPE;
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
