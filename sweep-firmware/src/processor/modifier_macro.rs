//! Timed modifier + key sequences such as copy (`Ctrl-C` or `Cmd-C`).

use sweep_common::{host_os::HostOs, keycodes::kc};

use crate::config::MacroDelays;

use super::KeyEvent;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroAction {
    Down,
    Up,
    Tap,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroStep {
    pub action: MacroAction,
    pub target: u8,
    /// Pause after the step.
    pub delay_ms: u16,
}

impl MacroStep {
    pub const fn new(action: MacroAction, target: u8, delay_ms: u16) -> Self {
        Self {
            action,
            target,
            delay_ms,
        }
    }
}

/// Apple hosts get the command key; everyone else, including unknown hosts, gets control.
pub fn shortcut_modifier(host_os: Option<HostOs>) -> u8 {
    match host_os {
        Some(os) if os.is_apple() => kc::LGUI as u8,
        _ => kc::LCTL as u8,
    }
}

pub fn modifier_action(target: u8, host_os: Option<HostOs>, delays: &MacroDelays) -> [MacroStep; 3] {
    let modifier = shortcut_modifier(host_os);
    [
        MacroStep::new(MacroAction::Down, modifier, delays.modifier_settle),
        MacroStep::new(MacroAction::Tap, target, delays.action),
        MacroStep::new(MacroAction::Up, modifier, delays.trailing),
    ]
}

/// Write `steps` as key and delay events. `tap_ms` separates the down and up of a tap.
pub fn run(steps: &[MacroStep], tap_ms: u16, mut emit: impl FnMut(KeyEvent)) {
    for step in steps {
        match step.action {
            MacroAction::Down => emit(KeyEvent::Basic(step.target, true)),
            MacroAction::Up => emit(KeyEvent::Basic(step.target, false)),
            MacroAction::Tap => {
                emit(KeyEvent::Basic(step.target, true));
                if tap_ms != 0 {
                    emit(KeyEvent::Delay(tap_ms));
                }
                emit(KeyEvent::Basic(step.target, false));
            }
        }
        if step.delay_ms != 0 {
            emit(KeyEvent::Delay(step.delay_ms));
        }
    }
}

#[cfg(test)]
#[path = "modifier_macro_test.rs"]
mod test;
