use embassy_futures::block_on;
use embassy_time::{Duration, Instant};

use super::*;

extern crate std;
use std::{vec, vec::Vec};

#[derive(Default)]
struct TestWriter {
    messages: Vec<Vec<u8>>,
    fail: bool,
}

impl ReportWriter for TestWriter {
    type Error = ();

    async fn write_report(&mut self, report: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(());
        }
        self.messages.push(report.to_vec());
        Ok(())
    }
}

macro_rules! setup {
    ($rep:ident, $x:tt) => {
        block_on(async {
            let mut $rep = Reporter::new(TestWriter::default());

            $x
        });
    };
}

#[test]
fn delay() {
    setup!(reporter, {
        reporter.report(KeyEvent::Basic(4, true)).await;
        let start = Instant::now();
        reporter.report(KeyEvent::Delay(1)).await;
        let d = Instant::now() - start;
        assert!(d >= Duration::from_millis(1));
        reporter.report(KeyEvent::Basic(0xe2, true)).await;

        let messages = &reporter.writer.messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(&messages[0][..5], &vec![6, 0, 16, 0, 0]);
        assert_eq!(&messages[1][..5], &vec![6, 4, 16, 0, 0]);
    });
}

#[test]
fn basic_report() {
    setup!(reporter, {
        reporter.report(KeyEvent::Basic(5, true)).await;
        reporter.report(KeyEvent::Basic(4, true)).await;
        reporter.report(KeyEvent::Basic(0xe2, true)).await;
        reporter.report(KeyEvent::Basic(4, false)).await;
        reporter.report(KeyEvent::Basic(0x4c, true)).await;

        let messages = &reporter.writer.messages;
        assert_eq!(messages[0].len(), 34);
        assert_eq!(&messages[0][..5], &vec![6, 0, 32, 0, 0]);
        assert_eq!(&messages[1][..5], &vec![6, 0, 48, 0, 0]);
        assert_eq!(&messages[2][..5], &vec![6, 4, 48, 0, 0]);
        assert_eq!(&messages[3][..5], &vec![6, 4, 32, 0, 0]);
        assert_eq!(messages[4][2 + 9], 16);
    });
}

#[test]
fn repeated_key_is_released_first() {
    setup!(reporter, {
        reporter.report(KeyEvent::Basic(4, true)).await;
        reporter.report(KeyEvent::Basic(4, true)).await;

        let messages = &reporter.writer.messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1][2], 0);
        assert_eq!(messages[2][2], 16);
    });
}

#[test]
fn modifiers_report() {
    setup!(reporter, {
        reporter.report(KeyEvent::Modifiers(6, true)).await;
        reporter.report(KeyEvent::Modifiers(8, true)).await;
        reporter.report(KeyEvent::Modifiers(2, false)).await;
        reporter.report(KeyEvent::PendingModifiers(2, true)).await;
        reporter.report(KeyEvent::Basic(16, true)).await;
        reporter.report(KeyEvent::PendingModifiers(4, false)).await;
        reporter.report(KeyEvent::PendingModifiers(1, true)).await;
        reporter.report(KeyEvent::Basic(16, false)).await;
        reporter.report(KeyEvent::Clear).await;

        let messages = &reporter.writer.messages;
        assert_eq!(messages.len(), 7);
        assert_eq!(&messages[0][..5], &vec![6, 6, 0, 0, 0]);
        assert_eq!(&messages[1][..5], &vec![6, 14, 0, 0, 0]);
        assert_eq!(&messages[2][..5], &vec![6, 12, 0, 0, 0]);
        assert_eq!(&messages[3][..5], &vec![6, 14, 0, 0, 1]);
        assert_eq!(&messages[4][..5], &vec![6, 11, 0, 0, 0]);
        assert_eq!(&messages[5], &vec![2, 0, 0, 0, 0, 0]);
        assert_eq!(&messages[6][..5], &vec![6, 0, 0, 0, 0]);
    });
}

#[test]
fn mouse_report() {
    setup!(reporter, {
        reporter.report(KeyEvent::MouseButton(1)).await;
        reporter
            .report(KeyEvent::MouseMove {
                buttons: 1,
                dx: -2,
                dy: 3,
            })
            .await;

        let messages = &reporter.writer.messages;
        assert_eq!(&messages[0], &vec![2, 1, 0, 0, 0, 0]);
        assert_eq!(&messages[1], &vec![2, 1, 0xfe, 3, 0, 0]);
    });
}

#[test]
fn failed_writes_are_dropped() {
    setup!(reporter, {
        reporter.writer.fail = true;
        reporter.report(KeyEvent::Basic(4, true)).await;
        reporter.writer.fail = false;
        reporter.report(KeyEvent::Basic(5, true)).await;

        let messages = &reporter.writer.messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0][2], 48);
    });
}

#[test]
fn key_bits() {
    let mut reporter = Reporter::new(TestWriter::default());
    assert!(reporter.set_key_bit(0x06));
    assert!(reporter.set_key_bit(0x07));
    assert!(!reporter.set_key_bit(0x07));
    assert!(reporter.set_key_bit(0x08));
    assert!(reporter.set_key_bit(0xff));
    assert_eq!(&reporter.keyboard_report[..5], &[6, 0, 0b1100_0000, 0x01, 0]);
    assert_eq!(reporter.keyboard_report[33], 0x80);

    assert!(reporter.clear_key_bit(0x07));
    assert!(!reporter.clear_key_bit(0x07));
    assert_eq!(&reporter.keyboard_report[2..4], &[0b0100_0000, 0x01]);
}
