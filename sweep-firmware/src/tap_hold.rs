//! Tap/hold resolution.
//!
//! Each configured key runs its own state machine:
//!
//! ```text
//! Idle --press--> Touched --release (<= hold_timeout)--> AwaitingNextTap --tap_term passed--> Idle
//!                    |                                        |
//!                    |                                        +--press (<= tap_term)--> Touched (tap_count + 1)
//!                    +--hold_timeout passed--> Held --release--> Idle
//! ```
//!
//! Timeouts only pass when the elapsed time is strictly greater than the configured value so a
//! replayed sequence always resolves the same way.

use sweep_common::{
    globals::{HOLD_TIMEOUT_DEFAULT, MAX_TAP_COUNT, TAP_TERM_DEFAULT},
    keycodes::key_range,
};

use Phase::*;

/// Fixed number of tap/hold keys a keyboard can configure.
pub const MAX_TAP_HOLD_KEYS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalKey(pub u8);
impl LogicalKey {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            key_range::TAP_HOLD_MIN..=key_range::TAP_HOLD_MAX => {
                Some(Self((code - key_range::TAP_HOLD_MIN) as u8))
            }
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldAction {
    ModTap { base: u16, modifiers: u8 },
    LayerTap { base: u16, layer: u8 },
}
impl TapHoldAction {
    pub fn base(&self) -> u16 {
        match self {
            Self::ModTap { base, .. } | Self::LayerTap { base, .. } => *base,
        }
    }

    pub fn hold(&self) -> HoldAction {
        match self {
            Self::ModTap { modifiers, .. } => HoldAction::Modifiers(*modifiers),
            Self::LayerTap { layer, .. } => HoldAction::Layer(*layer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldAction {
    Modifiers(u8),
    Layer(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapHoldKey {
    pub action: TapHoldAction,
    /// Keycode tapped for each tap count; index 0 is the single tap.
    pub taps: [u16; MAX_TAP_COUNT],
    pub max_taps: u8,
    pub hold_timeout: u16,
    pub tap_term: u16,
}
impl TapHoldKey {
    pub const fn new(action: TapHoldAction) -> Self {
        let base = match action {
            TapHoldAction::ModTap { base, .. } | TapHoldAction::LayerTap { base, .. } => base,
        };
        Self {
            action,
            taps: [base; MAX_TAP_COUNT],
            max_taps: 1,
            hold_timeout: HOLD_TIMEOUT_DEFAULT,
            tap_term: TAP_TERM_DEFAULT,
        }
    }

    pub const fn mod_tap(base: u16, modifiers: u8) -> Self {
        Self::new(TapHoldAction::ModTap { base, modifiers })
    }

    pub const fn layer_tap(base: u16, layer: u8) -> Self {
        Self::new(TapHoldAction::LayerTap { base, layer })
    }

    /// Tap `code` instead of the base key when tapped `count` times in a row. Raises the maximum
    /// tap count to `count`.
    pub const fn with_tap(mut self, count: u8, code: u16) -> Self {
        let count = if count as usize > MAX_TAP_COUNT {
            MAX_TAP_COUNT as u8
        } else {
            count
        };
        if count > 1 {
            self.taps[count as usize - 1] = code;
            if count > self.max_taps {
                self.max_taps = count;
            }
        }
        self
    }

    pub const fn with_timing(mut self, hold_timeout: u16, tap_term: u16) -> Self {
        self.hold_timeout = hold_timeout;
        self.tap_term = tap_term;
        self
    }

    /// `max_taps` limited to the size of the tap table.
    pub fn tap_limit(&self) -> u8 {
        self.max_taps.clamp(1, MAX_TAP_COUNT as u8)
    }

    /// Taps past `max_taps` repeat the `max_taps` action.
    pub fn tap_code(&self, count: u8) -> u16 {
        let count = count.clamp(1, self.tap_limit()) as usize;
        self.taps[count - 1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Idle,
    Touched,
    AwaitingNextTap,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapHoldState {
    pub phase: Phase,
    pub press_time: u64,
    pub release_time: u64,
    pub tap_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Tap {
        key: LogicalKey,
        code: u16,
        count: u8,
    },
    HoldStart {
        key: LogicalKey,
        action: HoldAction,
    },
    HoldEnd {
        key: LogicalKey,
        action: HoldAction,
    },
}

pub struct TapHold<'c> {
    keys: &'c [TapHoldKey],
    states: [TapHoldState; MAX_TAP_HOLD_KEYS],
}

impl<'c> TapHold<'c> {
    pub fn new(keys: &'c [TapHoldKey]) -> Self {
        let keys = &keys[..keys.len().min(MAX_TAP_HOLD_KEYS)];
        Self {
            keys,
            states: [TapHoldState::default(); MAX_TAP_HOLD_KEYS],
        }
    }

    /// The logical key for `code` if it names a configured tap/hold key.
    pub fn lookup(&self, code: u16) -> Option<LogicalKey> {
        LogicalKey::from_code(code).filter(|k| k.index() < self.keys.len())
    }

    pub fn state(&self, key: LogicalKey) -> Option<&TapHoldState> {
        self.states[..self.keys.len()].get(key.index())
    }

    pub fn clear(&mut self) {
        for s in self.states.iter_mut() {
            *s = TapHoldState::default();
        }
    }

    /// A key is undecided while it is down and has not yet become a hold.
    pub fn is_undecided(&self) -> bool {
        self.active().any(|(_, s)| s.phase == Touched)
    }

    pub fn is_touched(&self, key: LogicalKey) -> bool {
        self.state(key).is_some_and(|s| s.phase == Touched)
    }

    /// Start a press cycle. Returns false when the press was ignored because the key was already
    /// down.
    pub fn press(&mut self, key: LogicalKey, now: u64) -> bool {
        let Some(config) = self.keys.get(key.index()) else {
            return false;
        };
        let max_taps = config.tap_limit();
        let tap_term = config.tap_term as u64;
        let state = &mut self.states[key.index()];
        match state.phase {
            Idle => {
                state.tap_count = 1;
            }
            AwaitingNextTap => {
                state.tap_count = if now.saturating_sub(state.release_time) > tap_term {
                    1
                } else {
                    state.tap_count.saturating_add(1).min(max_taps)
                };
            }
            Touched | Held => {
                crate::debug!("ignored repeat press of tap/hold key {}", key.0);
                return false;
            }
        }
        state.phase = Touched;
        state.press_time = now;
        true
    }

    /// End a press cycle. Timers must already have been advanced to `now`.
    pub fn release(&mut self, key: LogicalKey, now: u64) -> Option<Resolution> {
        let config = self.keys.get(key.index())?;
        let state = &mut self.states[key.index()];
        match state.phase {
            Touched => {
                debug_assert!(now.saturating_sub(state.press_time) <= config.hold_timeout as u64);
                state.phase = AwaitingNextTap;
                state.release_time = now;
                Some(Resolution::Tap {
                    key,
                    code: config.tap_code(state.tap_count),
                    count: state.tap_count,
                })
            }
            Held => {
                *state = TapHoldState::default();
                Some(Resolution::HoldEnd {
                    key,
                    action: config.action.hold(),
                })
            }
            Idle | AwaitingNextTap => None,
        }
    }

    /// Apply every timeout that has passed by `now`. Returns the first hold that started; call
    /// again until `None`.
    pub fn advance(&mut self, now: u64) -> Option<Resolution> {
        for (i, config) in self.keys.iter().enumerate() {
            let state = &mut self.states[i];
            match state.phase {
                Touched if now.saturating_sub(state.press_time) > config.hold_timeout as u64 => {
                    state.phase = Held;
                    return Some(Resolution::HoldStart {
                        key: LogicalKey(i as u8),
                        action: config.action.hold(),
                    });
                }
                AwaitingNextTap
                    if now.saturating_sub(state.release_time) > config.tap_term as u64 =>
                {
                    *state = TapHoldState::default();
                }
                _ => {}
            }
        }
        None
    }

    /// Turn the undecided key into a hold straight away.
    pub fn force_hold(&mut self) -> Option<Resolution> {
        let i = self.active().position(|(_, s)| s.phase == Touched)?;
        self.states[i].phase = Held;
        Some(Resolution::HoldStart {
            key: LogicalKey(i as u8),
            action: self.keys[i].action.hold(),
        })
    }

    /// Another key was pressed; close every tap sequence except `key`'s.
    pub fn interrupt(&mut self, key: Option<LogicalKey>) {
        for (i, s) in self.states[..self.keys.len()].iter_mut().enumerate() {
            if s.phase == AwaitingNextTap && !matches!(key, Some(k) if k.index() == i) {
                *s = TapHoldState::default();
            }
        }
    }

    pub fn next_deadline(&self) -> u64 {
        self.active()
            .filter_map(|(c, s)| match s.phase {
                Touched => Some(s.press_time + c.hold_timeout as u64 + 1),
                AwaitingNextTap => Some(s.release_time + c.tap_term as u64 + 1),
                Idle | Held => None,
            })
            .min()
            .unwrap_or(u64::MAX)
    }

    fn active(&self) -> impl Iterator<Item = (&TapHoldKey, &TapHoldState)> {
        self.keys.iter().zip(self.states.iter())
    }
}

#[cfg(test)]
#[path = "tap_hold_test.rs"]
mod test;
