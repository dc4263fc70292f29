//! Static key layouts.
//!
//! A keymap is a stack of layers, each a `ROWS` x `COLS` grid of keycodes. Lookup walks the
//! active layers from the highest down and skips transparent entries.

use sweep_common::keycodes::{
    kc::*,
    key_range::{self, tap_hold},
};

use crate::layer::LayerState;

pub struct Keymap<const ROWS: usize, const COLS: usize, const LAYERS: usize> {
    layers: [[[u16; COLS]; ROWS]; LAYERS],
}

impl<const ROWS: usize, const COLS: usize, const LAYERS: usize> Keymap<ROWS, COLS, LAYERS> {
    pub const fn new(layers: [[[u16; COLS]; ROWS]; LAYERS]) -> Self {
        Self { layers }
    }

    pub const fn layer_count(&self) -> usize {
        LAYERS
    }

    pub fn get(&self, layer: usize, row: usize, column: usize) -> u16 {
        self.layers
            .get(layer)
            .and_then(|l| l.get(row))
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(NO)
    }

    /// The keycode at `row`, `column` for the current layer state.
    pub fn find_code(&self, layers: &LayerState, row: usize, column: usize) -> u16 {
        for layer in layers.iter_active() {
            let code = self.get(layer as usize, row, column);
            if code != key_range::TRANSPARENT {
                return code;
            }
        }
        NO
    }

    /// Every keycode in the keymap; used to check the keymap against a configuration.
    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.layers.iter().flatten().flatten().copied()
    }
}

pub const SWEEP_ROWS: usize = 4;
pub const SWEEP_COLS: usize = 10;
pub const SWEEP_LAYERS: usize = 4;

pub type SweepKeymap = Keymap<SWEEP_ROWS, SWEEP_COLS, SWEEP_LAYERS>;

/// Indices into [crate::config::SWEEP_TAP_HOLD].
pub mod th {
    pub const Z_GUI: u16 = 0;
    pub const X_ALT: u16 = 1;
    pub const C_CTL: u16 = 2;
    pub const D_SFT: u16 = 3;
    pub const H_SFT: u16 = 4;
    pub const COMM_CTL: u16 = 5;
    pub const DOT_ALT: u16 = 6;
    pub const SLSH_GUI: u16 = 7;
    pub const GRV_L1: u16 = 8;
    pub const TAB_L2: u16 = 9;
    pub const SPACE_MEH: u16 = 10;
    pub const COUNT: usize = 11;
}

const CZ: u16 = tap_hold(th::Z_GUI);
const CX: u16 = tap_hold(th::X_ALT);
const CC: u16 = tap_hold(th::C_CTL);
const CD: u16 = tap_hold(th::D_SFT);
const CH: u16 = tap_hold(th::H_SFT);
const CCOM: u16 = tap_hold(th::COMM_CTL);
const CDOT: u16 = tap_hold(th::DOT_ALT);
const CSLS: u16 = tap_hold(th::SLSH_GUI);
const CLGV: u16 = tap_hold(th::GRV_L1);
const GUTA: u16 = tap_hold(th::TAB_L2);
const MEHS: u16 = tap_hold(th::SPACE_MEH);
const ____: u16 = TRNS;

/// Colemak-DH on a 34 key split. The thumb keys sit in columns 3 to 6 of the last row.
#[rustfmt::skip]
pub const SWEEP: SweepKeymap = Keymap::new([
    [
        [Q,    W,    F,    P,    B,       J,    L,    U,    Y,    SCLN],
        [A,    R,    S,    T,    G,       M,    N,    E,    I,    O],
        [CZ,   CX,   CC,   CD,   V,       K,    CH,   CCOM, CDOT, CSLS],
        [NO,   NO,   NO,   CLGV, BSPC,    MEHS, GUTA, NO,   NO,   NO],
    ],
    [
        [N1,   N2,   N3,   N4,   N5,      N6,   N7,   N8,   N9,   N0],
        [GESC, HOME, PGDN, PGUP, END,     LEFT, DOWN, UP,   RIGHT,QUOT],
        [____, ____, COPY, BTN1, BTN2,    MS_L, MS_D, MS_U, MS_R, ENTER],
        [NO,   NO,   NO,   ____, ____,    ____, ____, NO,   NO,   NO],
    ],
    [
        [F1,   F2,   F3,   F4,   F5,      F6,   F7,   F8,   F9,   F10],
        [TAB,  ____, ____, ____, ____,    MINUS,EQUAL,LBRC, RBRC, PIPE],
        [JIGGLE,____,____, ____, ____,    UNDS, PLUS, ____, ____, BOOT],
        [NO,   NO,   NO,   ____, ____,    ____, ____, NO,   NO,   NO],
    ],
    [
        [____; SWEEP_COLS],
        [____; SWEEP_COLS],
        [____; SWEEP_COLS],
        [NO,   NO,   NO,   ____, ____,    ____, ____, NO,   NO,   NO],
    ],
]);

#[cfg(test)]
#[path = "keymap_test.rs"]
mod test;
