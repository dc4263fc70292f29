use sweep_common::keycodes::modifiers::{LEFT_GUI, LEFT_SHIFT, MASK_SHIFT, RIGHT_SHIFT};

use super::*;

extern crate std;

#[test]
fn backspace_without_shift() {
    let mut o = KeyOverride::backspace_delete();
    assert_eq!(
        o.press(modifiers::LEFT_CTRL, 0),
        OverridePress {
            code: kc::BSPC,
            consumed: 0
        }
    );
    assert_eq!(o.release(), Some(kc::BSPC));
    assert_eq!(o.release(), None);
}

#[test]
fn one_shift_is_consumed() {
    let mut o = KeyOverride::backspace_delete();
    assert_eq!(
        o.press(LEFT_SHIFT, 0),
        OverridePress {
            code: kc::DEL,
            consumed: LEFT_SHIFT
        }
    );
    o.clear();

    assert_eq!(
        o.press(0, RIGHT_SHIFT),
        OverridePress {
            code: kc::DEL,
            consumed: RIGHT_SHIFT
        }
    );
    assert_eq!(o.registered(), kc::DEL);
}

#[test]
fn both_shifts_send_shift_delete() {
    let mut o = KeyOverride::backspace_delete();
    assert_eq!(
        o.press(LEFT_SHIFT, RIGHT_SHIFT),
        OverridePress {
            code: kc::DEL,
            consumed: 0
        }
    );
    assert_eq!(
        o.press(MASK_SHIFT, 0),
        OverridePress {
            code: kc::DEL,
            consumed: 0
        }
    );
}

#[test]
fn release_uses_registered_code() {
    let mut o = KeyOverride::backspace_delete();
    o.press(LEFT_SHIFT, 0);
    // shift let go before backspace
    assert_eq!(o.release(), Some(kc::DEL));
}

#[test]
fn grave_escape() {
    let mut o = KeyOverride::grave_escape();
    assert_eq!(o.press(0, 0).code, kc::ESCAPE);
    assert_eq!(o.release(), Some(kc::ESCAPE));

    assert_eq!(
        o.press(LEFT_GUI, 0),
        OverridePress {
            code: kc::GRV,
            consumed: 0
        }
    );
    assert_eq!(o.press(LEFT_SHIFT, 0).consumed, 0);
}
