use sweep_common::keycodes::{kc, modifiers};

use super::*;

extern crate std;

const K: LogicalKey = LogicalKey(0);
const L: LogicalKey = LogicalKey(1);

const KEYS: [TapHoldKey; 2] = [
    TapHoldKey::mod_tap(kc::Z, modifiers::LEFT_GUI)
        .with_tap(2, kc::X)
        .with_tap(3, kc::C),
    TapHoldKey::layer_tap(kc::GRV, 1).with_timing(150, 80),
];

macro_rules! setup {
    ($t:ident, $x:block) => {{
        let mut $t = TapHold::new(&KEYS);
        $x;
    }};
}

#[test]
fn short_press_is_one_tap() {
    setup!(t, {
        assert!(t.press(K, 1_000));
        assert!(t.is_undecided());
        assert_eq!(t.next_deadline(), 1_201);

        assert_eq!(t.advance(1_200), None);
        assert_eq!(
            t.release(K, 1_200),
            Some(Resolution::Tap {
                key: K,
                code: kc::Z,
                count: 1
            })
        );
        assert!(!t.is_undecided());
        assert_eq!(t.state(K).map(|s| s.phase), Some(Phase::AwaitingNextTap));

        assert_eq!(t.advance(1_300), None);
        assert_eq!(t.state(K).map(|s| s.phase), Some(Phase::AwaitingNextTap));
        assert_eq!(t.advance(1_301), None);
        assert_eq!(t.state(K), Some(&TapHoldState::default()));
        assert_eq!(t.next_deadline(), u64::MAX);
    });
}

#[test]
fn long_press_is_one_hold() {
    setup!(t, {
        t.press(K, 0);
        assert_eq!(
            t.advance(201),
            Some(Resolution::HoldStart {
                key: K,
                action: HoldAction::Modifiers(modifiers::LEFT_GUI)
            })
        );
        assert_eq!(t.advance(500), None);
        assert!(!t.is_undecided());

        assert_eq!(
            t.release(K, 600),
            Some(Resolution::HoldEnd {
                key: K,
                action: HoldAction::Modifiers(modifiers::LEFT_GUI)
            })
        );
        assert_eq!(t.state(K).map(|s| s.phase), Some(Phase::Idle));
        assert_eq!(t.release(K, 700), None);
    });
}

#[test]
fn layer_tap_uses_its_own_timing() {
    setup!(t, {
        t.press(L, 0);
        assert_eq!(t.next_deadline(), 151);
        assert_eq!(t.advance(150), None);
        assert_eq!(
            t.advance(151),
            Some(Resolution::HoldStart {
                key: L,
                action: HoldAction::Layer(1)
            })
        );
    });
}

#[test]
fn tap_counts_and_saturation() {
    setup!(t, {
        let mut taps = std::vec::Vec::new();
        let mut now = 0;
        for _ in 0..4 {
            t.advance(now);
            assert!(t.press(K, now));
            now += 30;
            t.advance(now);
            taps.push(t.release(K, now));
            now += 100;
        }
        let codes: std::vec::Vec<_> = taps
            .into_iter()
            .map(|r| match r {
                Some(Resolution::Tap { code, count, .. }) => (code, count),
                r => panic!("expected tap, got {:?}", r),
            })
            .collect();
        assert_eq!(
            codes,
            [(kc::Z, 1), (kc::X, 2), (kc::C, 3), (kc::C, 3)]
        );
    });
}

#[test]
fn tap_window_expires() {
    setup!(t, {
        t.press(K, 0);
        t.release(K, 10);
        t.advance(111);
        t.press(K, 111);
        assert_eq!(t.state(K).map(|s| s.tap_count), Some(1));
    });
}

#[test]
fn other_key_closes_tap_window() {
    setup!(t, {
        t.press(K, 0);
        t.release(K, 10);
        t.interrupt(Some(L));
        assert_eq!(t.state(K).map(|s| s.phase), Some(Phase::Idle));

        t.press(K, 20);
        t.release(K, 30);
        t.interrupt(Some(K));
        t.press(K, 40);
        assert_eq!(t.state(K).map(|s| s.tap_count), Some(2));
    });
}

#[test]
fn repeat_press_is_ignored() {
    setup!(t, {
        assert!(t.press(K, 0));
        assert!(!t.press(K, 50));
        assert_eq!(t.state(K).map(|s| s.press_time), Some(0));

        t.advance(201);
        assert!(!t.press(K, 250));
        assert!(matches!(
            t.release(K, 260),
            Some(Resolution::HoldEnd { .. })
        ));
    });
}

#[test]
fn force_hold() {
    setup!(t, {
        assert_eq!(t.force_hold(), None);
        t.press(L, 5);
        assert_eq!(
            t.force_hold(),
            Some(Resolution::HoldStart {
                key: L,
                action: HoldAction::Layer(1)
            })
        );
        assert!(!t.is_touched(L));
        assert!(matches!(t.release(L, 10), Some(Resolution::HoldEnd { .. })));
    });
}

#[test]
fn lookup() {
    setup!(t, {
        assert_eq!(t.lookup(key_range::tap_hold(1)), Some(L));
        assert_eq!(t.lookup(key_range::tap_hold(2)), None);
        assert_eq!(t.lookup(kc::A), None);
        assert_eq!(t.state(LogicalKey(5)), None);
        assert!(!t.press(LogicalKey(5), 0));
    });
}

#[test]
fn tap_count_limited_by_table() {
    let mut key = TapHoldKey::mod_tap(kc::Z, modifiers::LEFT_GUI).with_tap(3, kc::C);
    key.max_taps = 9;
    assert_eq!(key.tap_limit(), 3);
    assert_eq!(key.tap_code(9), kc::C);

    key.max_taps = 0;
    assert_eq!(key.tap_limit(), 1);
    assert_eq!(key.tap_code(2), kc::Z);

    let keys = [TapHoldKey { max_taps: 9, ..key }];
    let mut t = TapHold::new(&keys);
    for i in 0..5u64 {
        assert!(t.press(K, i * 20));
        t.release(K, i * 20 + 10);
    }
    assert_eq!(t.state(K).map(|s| s.tap_count), Some(3));
}
