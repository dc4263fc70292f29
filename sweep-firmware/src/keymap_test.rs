use super::*;

extern crate std;

#[test]
fn find_code_falls_through_transparent() {
    let mut layers = LayerState::new(4);
    assert_eq!(SWEEP.find_code(&layers, 0, 0), Q);
    assert_eq!(SWEEP.find_code(&layers, 2, 0), CZ);

    layers.activate(1);
    assert_eq!(SWEEP.find_code(&layers, 0, 0), N1);
    assert_eq!(SWEEP.find_code(&layers, 2, 0), CZ);
    assert_eq!(SWEEP.find_code(&layers, 3, 4), BSPC);

    layers.activate(2);
    assert_eq!(SWEEP.find_code(&layers, 0, 0), F1);
    assert_eq!(SWEEP.find_code(&layers, 2, 2), COPY);
}

#[test]
fn base_layer_is_always_the_fallback() {
    let mut layers = LayerState::new(4);
    layers.move_to(3);
    assert_eq!(layers.bits(), 0b1000);
    assert_eq!(SWEEP.find_code(&layers, 1, 4), G);
    assert_eq!(SWEEP.find_code(&layers, 3, 5), MEHS);
}

#[test]
fn out_of_range_is_no() {
    let layers = LayerState::new(4);
    assert_eq!(SWEEP.find_code(&layers, 4, 0), NO);
    assert_eq!(SWEEP.find_code(&layers, 0, 10), NO);
    assert_eq!(SWEEP.get(4, 0, 0), NO);
}

#[test]
fn tap_hold_codes_are_configured() {
    let n = SWEEP
        .codes()
        .filter(|c| (key_range::TAP_HOLD_MIN..=key_range::TAP_HOLD_MAX).contains(c))
        .count();
    assert_eq!(n, th::COUNT);
    assert_eq!(SWEEP.layer_count(), 4);
}
