use super::*;

extern crate std;
use std::{vec, vec::Vec};

fn collect(steps: &[MacroStep], tap_ms: u16) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    run(steps, tap_ms, |e| events.push(e));
    events
}

#[test]
fn copy_on_apple_uses_gui() {
    let delays = MacroDelays::default();
    for os in [HostOs::MacOs, HostOs::Ios] {
        let steps = modifier_action(kc::C as u8, Some(os), &delays);
        assert_eq!(
            collect(&steps, delays.tap),
            vec![
                KeyEvent::Basic(0xe3, true),
                KeyEvent::Delay(20),
                KeyEvent::Basic(0x06, true),
                KeyEvent::Basic(0x06, false),
                KeyEvent::Delay(50),
                KeyEvent::Basic(0xe3, false),
                KeyEvent::Delay(20),
            ]
        );
    }
}

#[test]
fn copy_elsewhere_uses_control() {
    let delays = MacroDelays::default();
    for os in [Some(HostOs::Other), None] {
        let steps = modifier_action(kc::C as u8, os, &delays);
        assert_eq!(steps[0], MacroStep::new(MacroAction::Down, 0xe0, 20));
        assert_eq!(steps[2], MacroStep::new(MacroAction::Up, 0xe0, 20));
    }
}

#[test]
fn tap_delay() {
    let delays = MacroDelays {
        tap: 5,
        trailing: 0,
        ..Default::default()
    };
    let steps = modifier_action(kc::V as u8, None, &delays);
    assert_eq!(
        collect(&steps, delays.tap),
        vec![
            KeyEvent::Basic(0xe0, true),
            KeyEvent::Delay(20),
            KeyEvent::Basic(0x19, true),
            KeyEvent::Delay(5),
            KeyEvent::Basic(0x19, false),
            KeyEvent::Delay(50),
            KeyEvent::Basic(0xe0, false),
        ]
    );
}
