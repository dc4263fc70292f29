use embassy_sync::blocking_mutex::raw::RawMutex;
use sweep_common::{
    globals::{MOUSE_KEY_INTERVAL_MS, MOUSE_KEY_STEP},
    keycodes::key_range,
};

use crate::scheduler::Token;

use super::{Effects, KeyEvent};

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const UP: u8 = 4;
const DOWN: u8 = 8;

#[derive(Default)]
pub(super) struct MouseKeys {
    buttons: u8,
    directions: u8,
    pub(super) token: Option<Token>,
}

impl MouseKeys {
    pub(super) fn clear_all(&mut self) {
        self.buttons = 0;
        self.directions = 0;
        self.token = None;
    }

    pub(super) fn buttons(&self) -> u8 {
        self.buttons
    }

    /// `code` is relative to [key_range::MOUSE_MIN].
    pub(super) fn button(&mut self, code: u16, is_down: bool) -> KeyEvent {
        let bit = 1 << (code - key_range::MOUSE_BUTTON);
        if is_down {
            self.buttons |= bit;
        } else {
            self.buttons &= !bit;
        }
        KeyEvent::MouseButton(self.buttons)
    }

    /// `code` is relative to [key_range::MOUSE_MIN].
    pub(super) fn direction(&mut self, code: u16, is_down: bool) {
        let bit = 1 << (code - key_range::MOUSE_DELTA);
        if is_down {
            self.directions |= bit;
        } else {
            self.directions &= !bit;
        }
    }

    /// The move for one interval, or `None` when no direction key is down. Opposite directions
    /// cancel out.
    pub(super) fn movement(&self) -> Option<KeyEvent> {
        if self.directions == 0 {
            return None;
        }
        let axis = |neg, pos| {
            let mut d = 0;
            if self.directions & neg != 0 {
                d -= MOUSE_KEY_STEP;
            }
            if self.directions & pos != 0 {
                d += MOUSE_KEY_STEP;
            }
            d
        };
        Some(KeyEvent::MouseMove {
            buttons: self.buttons,
            dx: axis(LEFT, RIGHT),
            dy: axis(UP, DOWN),
        })
    }
}

pub(super) fn repeat<M: RawMutex, const N: usize>(
    _now: u64,
    fx: &mut Effects<'_, M, N>,
    _state: u32,
) -> u32 {
    match fx.mouse.movement() {
        Some(event) => {
            fx.reports.report(event);
            MOUSE_KEY_INTERVAL_MS as u32
        }
        None => {
            fx.mouse.token = None;
            0
        }
    }
}

#[cfg(test)]
#[path = "mouse_test.rs"]
mod test;
