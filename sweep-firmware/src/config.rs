//! Keyboard configuration read once at start up.

use sweep_common::{
    globals::{
        JIGGLER_DELTAS, JIGGLER_FRAMES, JIGGLER_FRAME_MS, LAYER_COUNT_DEFAULT, MACRO_ACTION_MS,
        MACRO_MODIFIER_SETTLE_MS, MACRO_TAP_MS, MACRO_TRAILING_MS, MAX_LAYERS, MAX_TAP_COUNT,
    },
    keycodes::{kc, modifiers},
};

use crate::{
    keymap::th,
    tap_hold::{TapHoldAction, TapHoldKey, MAX_TAP_HOLD_KEYS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JigglerConfig {
    /// One motion per frame; y uses the same table half a cycle later.
    pub deltas: [i8; JIGGLER_FRAMES],
    pub period_ms: u16,
}

impl Default for JigglerConfig {
    fn default() -> Self {
        Self {
            deltas: JIGGLER_DELTAS,
            period_ms: JIGGLER_FRAME_MS,
        }
    }
}

/// Delays in milliseconds used by modifier macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroDelays {
    /// After the modifier goes down.
    pub modifier_settle: u16,
    /// Between the target key's down and up.
    pub tap: u16,
    /// After the target key is tapped.
    pub action: u16,
    /// After the modifier is released.
    pub trailing: u16,
}

impl Default for MacroDelays {
    fn default() -> Self {
        Self {
            modifier_settle: MACRO_MODIFIER_SETTLE_MS,
            tap: MACRO_TAP_MS,
            action: MACRO_ACTION_MS,
            trailing: MACRO_TRAILING_MS,
        }
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    TooManyTapHoldKeys,
    LayerCount,
    LayerOutOfRange { key: u8, layer: u8 },
    TapCount { key: u8 },
    ZeroJigglerPeriod,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyboardConfig<'c> {
    pub tap_hold: &'c [TapHoldKey],
    pub jiggler: JigglerConfig,
    pub macro_delays: MacroDelays,
    pub layer_count: u8,
}

impl Default for KeyboardConfig<'_> {
    fn default() -> Self {
        Self {
            tap_hold: &[],
            jiggler: Default::default(),
            macro_delays: Default::default(),
            layer_count: LAYER_COUNT_DEFAULT,
        }
    }
}

pub static SWEEP_TAP_HOLD: [TapHoldKey; th::COUNT] = [
    TapHoldKey::mod_tap(kc::Z, modifiers::LEFT_GUI),
    TapHoldKey::mod_tap(kc::X, modifiers::LEFT_ALT),
    TapHoldKey::mod_tap(kc::C, modifiers::LEFT_CTRL),
    TapHoldKey::mod_tap(kc::D, modifiers::LEFT_SHIFT),
    TapHoldKey::mod_tap(kc::H, modifiers::LEFT_SHIFT),
    TapHoldKey::mod_tap(kc::COMM, modifiers::LEFT_CTRL),
    TapHoldKey::mod_tap(kc::DOT, modifiers::LEFT_ALT),
    TapHoldKey::mod_tap(kc::SLSH, modifiers::LEFT_GUI),
    TapHoldKey::layer_tap(kc::GRV, 1),
    TapHoldKey::layer_tap(kc::TAB, 2),
    TapHoldKey::mod_tap(kc::SPACE, modifiers::MEH),
];

impl KeyboardConfig<'static> {
    /// Configuration matching [crate::keymap::SWEEP].
    pub fn sweep() -> Self {
        Self {
            tap_hold: &SWEEP_TAP_HOLD,
            ..Default::default()
        }
    }
}

impl KeyboardConfig<'_> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tap_hold.len() > MAX_TAP_HOLD_KEYS {
            return Err(ConfigError::TooManyTapHoldKeys);
        }
        if self.layer_count == 0 || self.layer_count > MAX_LAYERS {
            return Err(ConfigError::LayerCount);
        }
        if self.jiggler.period_ms == 0 {
            return Err(ConfigError::ZeroJigglerPeriod);
        }
        for (i, key) in self.tap_hold.iter().enumerate() {
            let i = i as u8;
            if key.max_taps == 0 || key.max_taps as usize > MAX_TAP_COUNT {
                return Err(ConfigError::TapCount { key: i });
            }
            if let TapHoldAction::LayerTap { layer, .. } = key.action {
                if layer >= self.layer_count {
                    return Err(ConfigError::LayerOutOfRange { key: i, layer });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod test;
