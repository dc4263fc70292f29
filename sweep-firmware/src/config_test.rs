use super::*;

extern crate std;

#[test]
fn sweep_config_is_valid() {
    let config = KeyboardConfig::sweep();
    config.validate().unwrap();
    assert_eq!(config.tap_hold.len(), 11);
    assert_eq!(config.layer_count, 4);
    assert_eq!(config.macro_delays.modifier_settle, 20);
    assert_eq!(config.macro_delays.action, 50);
    assert_eq!(config.jiggler.period_ms, 16);
    assert_eq!(
        config.tap_hold[th::GRV_L1 as usize].action,
        TapHoldAction::LayerTap {
            base: kc::GRV,
            layer: 1
        }
    );
}

#[test]
fn layer_out_of_range() {
    let keys = [TapHoldKey::layer_tap(kc::TAB, 4)];
    let config = KeyboardConfig {
        tap_hold: &keys,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::LayerOutOfRange { key: 0, layer: 4 })
    ));
}

#[test]
fn bad_counts() {
    let mut keys = [TapHoldKey::mod_tap(kc::A, modifiers::LEFT_SHIFT)];
    keys[0].max_taps = 0;
    let mut config = KeyboardConfig {
        tap_hold: &keys,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TapCount { key: 0 })
    ));

    config.tap_hold = &[];
    config.layer_count = 9;
    assert!(matches!(config.validate(), Err(ConfigError::LayerCount)));

    config.layer_count = 2;
    config.jiggler.period_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroJigglerPeriod)
    ));

    let many = [TapHoldKey::mod_tap(kc::A, 0); 17];
    config.tap_hold = &many;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TooManyTapHoldKeys)
    ));
}
