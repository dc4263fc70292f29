//! Default timings used when a key or feature does not configure its own.

/// Milliseconds a tap/hold key must stay down (strictly longer) before it becomes a hold.
pub const HOLD_TIMEOUT_DEFAULT: u16 = 200;
/// Milliseconds after a tap during which another press of the same key counts as the next tap.
pub const TAP_TERM_DEFAULT: u16 = 100;
/// Highest tap count a tap/hold key can be configured to distinguish.
pub const MAX_TAP_COUNT: usize = 3;

pub const MACRO_MODIFIER_SETTLE_MS: u16 = 20;
pub const MACRO_TAP_MS: u16 = 0;
pub const MACRO_ACTION_MS: u16 = 50;
pub const MACRO_TRAILING_MS: u16 = 20;

pub const JIGGLER_FRAME_MS: u16 = 16;
pub const JIGGLER_FRAMES: usize = 32;
pub const JIGGLER_DELTAS: [i8; JIGGLER_FRAMES] = [
    0, -1, -2, -2, -3, -3, -4, -4, -4, -4, -3, -3, -2, -2, -1, 0, 0, 1, 2, 2, 3, 3, 4, 4, 4, 4, 3,
    3, 2, 2, 1, 0,
];

pub const MOUSE_KEY_INTERVAL_MS: u16 = 16;
pub const MOUSE_KEY_STEP: i8 = 8;

/// Number of deferred tasks that can be outstanding at once.
pub const MAX_DEFERRED_TASKS: usize = 10;

pub const LAYER_COUNT_DEFAULT: u8 = 4;
pub const MAX_LAYERS: u8 = 8;
