//! Keeps the host awake by moving the pointer in a small circle.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::{config::JigglerConfig, scheduler::Token};

use super::{Effects, KeyEvent};

pub(super) struct Jiggler {
    config: JigglerConfig,
    frame: usize,
    pub(super) token: Option<Token>,
}

impl Jiggler {
    pub(super) fn new(config: JigglerConfig) -> Self {
        Self {
            config,
            frame: 0,
            token: None,
        }
    }

    pub(super) fn start(&mut self) {
        self.frame = 0;
    }

    pub(super) fn period(&self) -> u32 {
        self.config.period_ms as u32
    }

    /// The motion for the current frame; y runs half a cycle behind x.
    pub(super) fn next_frame(&mut self, buttons: u8) -> KeyEvent {
        let deltas = &self.config.deltas;
        let len = deltas.len();
        let dx = deltas[self.frame];
        let dy = deltas[(self.frame + len / 2) % len];
        self.frame = (self.frame + 1) % len;
        KeyEvent::MouseMove { buttons, dx, dy }
    }
}

pub(super) fn frame<M: RawMutex, const N: usize>(
    _now: u64,
    fx: &mut Effects<'_, M, N>,
    _state: u32,
) -> u32 {
    let event = fx.jiggler.next_frame(fx.mouse.buttons());
    fx.reports.report(event);
    fx.jiggler.period()
}

#[cfg(test)]
#[path = "jiggler_test.rs"]
mod test;
