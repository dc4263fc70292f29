use super::*;

extern crate std;
use std::vec::Vec;

#[test]
fn activate_and_deactivate() {
    let mut layers = LayerState::default();
    assert_eq!(layers.count(), 4);
    assert_eq!(layers.highest(), 0);

    assert!(layers.activate(2));
    assert!(!layers.activate(2));
    assert!(layers.activate(1));
    assert_eq!(layers.highest(), 2);
    assert_eq!(layers.iter_active().collect::<Vec<_>>(), [2, 1, 0]);

    assert!(layers.deactivate(2));
    assert_eq!(layers.highest(), 1);
    assert!(!layers.deactivate(0));
    assert!(!layers.activate(4));
}

#[test]
fn move_to_replaces_the_set() {
    let mut layers = LayerState::new(4);
    layers.activate(1);
    layers.activate(2);

    assert!(layers.move_to(3));
    assert_eq!(layers.bits(), 0b1000);
    assert_eq!(layers.iter_active().collect::<Vec<_>>(), [3, 0]);

    assert!(layers.move_to(0));
    assert_eq!(layers.highest(), 0);
    assert!(!layers.move_to(4));
    assert_eq!(layers.bits(), 1);

    layers.move_to(2);
    layers.clear();
    assert_eq!(layers, LayerState::new(4));
}

#[test]
fn count_is_capped() {
    let layers = LayerState::new(20);
    assert_eq!(layers.count(), 8);
}
