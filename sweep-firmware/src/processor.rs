//! Turns key transitions into report events.
//!
//! The [Processor] owns all key state: layers, modifier counts, the tap/hold engine, overrides and
//! the scheduler driving mouse keys and the jiggler. Events are written to a [ReportChannel] for
//! [crate::key_reporter::Reporter] to turn into HID reports.

use core::mem;

use embassy_futures::select::{select4, Either4};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, signal::Signal};
use embassy_time::{Instant, Timer};
use heapless::Deque;
use jiggler::Jiggler;
use key_override::KeyOverride;
use mouse::MouseKeys;
use sweep_common::{
    globals::{MAX_LAYERS, MOUSE_KEY_INTERVAL_MS},
    host_command::PACKET_SIZE,
    host_os::HostOs,
    keycodes::{kc, key_range, modifiers},
};

use crate::{
    config::KeyboardConfig,
    firmware_functions,
    host_command::{self, HostChannel},
    keymap::Keymap,
    layer::LayerState,
    scheduler::Scheduler,
    tap_hold::{HoldAction, Resolution, TapHold},
};

pub mod key_override;
pub mod modifier_macro;

pub(crate) mod jiggler;
pub(crate) mod mouse;

/// Transitions that can wait behind an undecided tap/hold key.
pub const PENDING_SIZE: usize = 16;

const MIN_REPORT_BUFFER_SIZE: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPosition {
    pub row: u8,
    pub col: u8,
}
impl KeyPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A debounced switch change stamped with the time in milliseconds it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTransition {
    pub position: KeyPosition,
    pub pressed: bool,
    pub time: u64,
}
impl KeyTransition {
    pub const fn new(row: u8, col: u8, pressed: bool, time: u64) -> Self {
        Self {
            position: KeyPosition::new(row, col),
            pressed,
            time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Basic(u8, bool),
    /// Change modifiers without sending a report; the next report carries them.
    PendingModifiers(u8, bool),
    Modifiers(u8, bool),
    MouseButton(u8),
    MouseMove { buttons: u8, dx: i8, dy: i8 },
    Clear,
    Delay(u16),
}

/// Tells the host which operating system it is talking to, if it can tell.
pub trait HostOsDetector {
    fn host_os(&self) -> Option<HostOs>;
}

impl HostOsDetector for Option<HostOs> {
    fn host_os(&self) -> Option<HostOs> {
        *self
    }
}

pub enum ControlMessage {
    ClearAll,
    Exit,
}

pub struct ControlSignal<M: RawMutex>(Signal<M, ControlMessage>);
impl<M: RawMutex> Default for ControlSignal<M> {
    fn default() -> Self {
        Self(Signal::new())
    }
}
impl<M: RawMutex> ControlSignal<M> {
    pub fn clear_all(&self) {
        self.0.signal(ControlMessage::ClearAll);
    }

    pub fn exit(&self) {
        self.0.signal(ControlMessage::Exit);
    }

    async fn wait(&self) -> ControlMessage {
        self.0.wait().await
    }
}

pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, KeyEvent, N>);
impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub async fn receive(&self) -> KeyEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<KeyEvent> {
        self.0.try_receive().ok()
    }

    /// Queue `event`. If the reporter has fallen too far behind everything queued is replaced by a
    /// single [KeyEvent::Clear].
    pub fn report(&self, event: KeyEvent) {
        if self.0.try_send(event).is_err() {
            crate::warn!("report channel full");
            self.0.clear();
            let _ = self.0.try_send(KeyEvent::Clear);
        }
    }

    fn clear(&self) {
        self.0.clear();
    }

    fn room_to_report(&self) -> bool {
        self.0.free_capacity() >= MIN_REPORT_BUFFER_SIZE.min(N)
    }
}

/// The part of the processor deferred tasks can reach.
pub struct Effects<'c, M: RawMutex, const N: usize> {
    reports: &'c ReportChannel<M, N>,
    jiggler: Jiggler,
    mouse: MouseKeys,
}

pub struct Processor<
    'c,
    const ROW_COUNT: usize,
    const COL_COUNT: usize,
    const LAYER_COUNT: usize,
    M: RawMutex,
    const REPORT_BUFFER_SIZE: usize,
> {
    keymap: &'c Keymap<ROW_COUNT, COL_COUNT, LAYER_COUNT>,
    config: KeyboardConfig<'c>,
    host_os: &'c dyn HostOsDetector,
    layers: LayerState,
    layer_holds: [u8; MAX_LAYERS as usize],
    active_codes: [[u16; COL_COUNT]; ROW_COUNT],
    tap_hold: TapHold<'c>,
    undecided: Option<KeyPosition>,
    pending: Deque<KeyTransition, PENDING_SIZE>,
    modifier_count: [i8; 8],
    oneshot_mods: u8,
    overrides: [KeyOverride; 2],
    scheduler: Scheduler<Effects<'c, M, REPORT_BUFFER_SIZE>>,
    fx: Effects<'c, M, REPORT_BUFFER_SIZE>,
    jiggle_stopped_by: Option<KeyPosition>,
    now: u64,
}

impl<
        'c,
        const ROW_COUNT: usize,
        const COL_COUNT: usize,
        const LAYER_COUNT: usize,
        M: RawMutex,
        const REPORT_BUFFER_SIZE: usize,
    > Processor<'c, ROW_COUNT, COL_COUNT, LAYER_COUNT, M, REPORT_BUFFER_SIZE>
{
    pub fn new(
        keymap: &'c Keymap<ROW_COUNT, COL_COUNT, LAYER_COUNT>,
        config: KeyboardConfig<'c>,
        host_os: &'c dyn HostOsDetector,
        reports: &'c ReportChannel<M, REPORT_BUFFER_SIZE>,
    ) -> Self {
        if let Err(err) = config.validate() {
            crate::warn!("invalid keyboard config {:?}", err);
        }
        let layer_count = config.layer_count.min(LAYER_COUNT as u8);
        Self {
            keymap,
            config,
            host_os,
            layers: LayerState::new(layer_count),
            layer_holds: Default::default(),
            active_codes: [[kc::NO; COL_COUNT]; ROW_COUNT],
            tap_hold: TapHold::new(config.tap_hold),
            undecided: None,
            pending: Deque::new(),
            modifier_count: Default::default(),
            oneshot_mods: 0,
            overrides: [KeyOverride::backspace_delete(), KeyOverride::grave_escape()],
            scheduler: Scheduler::default(),
            fx: Effects {
                reports,
                jiggler: Jiggler::new(config.jiggler),
                mouse: MouseKeys::default(),
            },
            jiggle_stopped_by: None,
            now: 0,
        }
    }

    pub fn layers(&self) -> &LayerState {
        &self.layers
    }

    pub fn tap_hold(&self) -> &TapHold<'c> {
        &self.tap_hold
    }

    /// Modifiers currently held down by keys.
    pub fn modifiers(&self) -> u8 {
        self.modifier_count
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .fold(0, |bits, (i, _)| bits | 1 << i)
    }

    pub fn oneshot_mods(&self) -> u8 {
        self.oneshot_mods
    }

    /// Apply `mods` to the next key sent.
    pub fn arm_oneshot_mods(&mut self, mods: u8) {
        self.oneshot_mods |= mods;
    }

    pub fn is_jiggling(&self) -> bool {
        self.fx
            .jiggler
            .token
            .is_some_and(|t| self.scheduler.is_pending(t))
    }

    /// When [Self::tick] next has something to do.
    pub fn next_deadline(&self) -> u64 {
        self.scheduler
            .next_deadline()
            .min(self.tap_hold.next_deadline())
    }

    pub fn clear_all(&mut self) {
        for r in self.active_codes.iter_mut() {
            r.fill(kc::NO);
        }
        self.modifier_count = Default::default();
        self.oneshot_mods = 0;
        self.layer_holds = Default::default();
        self.layers.clear();
        self.tap_hold.clear();
        self.undecided = None;
        self.pending.clear();
        self.scheduler.clear();
        self.fx.jiggler.token = None;
        self.fx.mouse.clear_all();
        self.jiggle_stopped_by = None;
        for o in self.overrides.iter_mut() {
            o.clear();
        }
        self.fx.reports.clear();
        self.report(KeyEvent::Clear);
    }

    pub fn host_command(&mut self, request: &[u8], response: &mut [u8]) -> bool {
        host_command::receive(&mut self.layers, request, response)
    }

    /// Run timers due by `now`.
    pub fn tick(&mut self, now: u64) {
        self.set_now(now);
        self.expire(now);
        self.drain();
    }

    pub fn key_event(&mut self, event: KeyTransition) {
        self.set_now(event.time);
        if event.pressed {
            self.stop_jiggler(event.position);
        }
        self.expire(event.time);

        if self.undecided == Some(event.position) {
            self.process(event);
        } else {
            self.enqueue(event);
        }
        self.drain();
    }

    pub async fn run<const KEY_BUFFER_SIZE: usize, const HOST_BUFFER_SIZE: usize>(
        &mut self,
        keys: &Channel<M, KeyTransition, KEY_BUFFER_SIZE>,
        host: &HostChannel<M, HOST_BUFFER_SIZE>,
        control: &ControlSignal<M>,
    ) -> ControlMessage {
        loop {
            self.wait_for_report_capacity().await;

            let deadline = match self.next_deadline() {
                u64::MAX => Instant::MAX,
                t => Instant::from_millis(t),
            };
            let event = select4(
                keys.receive(),
                host.receive_request(),
                control.wait(),
                Timer::at(deadline),
            )
            .await;

            let now = Instant::now().as_millis();
            match event {
                Either4::First(transition) => self.key_event(transition),
                Either4::Second(request) => {
                    let mut response = [0; PACKET_SIZE];
                    if self.host_command(request.as_slice(), &mut response) {
                        host.respond(response);
                    }
                }
                Either4::Third(ControlMessage::ClearAll) => self.clear_all(),
                Either4::Third(ControlMessage::Exit) => return ControlMessage::Exit,
                Either4::Fourth(()) => self.tick(now),
            }
        }
    }

    fn set_now(&mut self, now: u64) {
        if now > self.now {
            self.now = now;
        }
        self.scheduler.tick(self.now, &mut self.fx);
    }

    fn report(&self, event: KeyEvent) {
        self.fx.reports.report(event);
    }

    async fn wait_for_report_capacity(&self) {
        for _ in 0..10 {
            if self.fx.reports.room_to_report() {
                break;
            }
            Timer::after_millis(MOUSE_KEY_INTERVAL_MS as u64).await;
        }
    }

    fn expire(&mut self, time: u64) {
        while let Some(resolution) = self.tap_hold.advance(time) {
            self.resolve(resolution);
        }
    }

    fn enqueue(&mut self, mut event: KeyTransition) {
        while let Err(e) = self.pending.push_back(event) {
            event = e;
            match self.tap_hold.force_hold() {
                Some(resolution) => {
                    crate::debug!("transition queue full; forcing hold");
                    self.resolve(resolution);
                    self.drain();
                }
                None => {
                    self.process(event);
                    return;
                }
            }
        }
    }

    /// Replay queued transitions until one has to wait for an undecided key.
    fn drain(&mut self) {
        while let Some(event) = self.pending.front().copied() {
            self.expire(event.time);
            if self.undecided.is_some_and(|p| p != event.position) {
                break;
            }
            self.pending.pop_front();
            self.process(event);
        }
    }

    fn process(&mut self, event: KeyTransition) {
        let KeyPosition { row, col } = event.position;
        let (row, col) = (row as usize, col as usize);
        if row >= ROW_COUNT || col >= COL_COUNT {
            crate::warn!("key out of range {}, {}", row, col);
            return;
        }

        if event.pressed {
            let code = self.keymap.find_code(&self.layers, row, col);
            self.active_codes[row][col] = code;
            let key = self.tap_hold.lookup(code);
            self.tap_hold.interrupt(key);
            match key {
                Some(key) => {
                    if self.tap_hold.press(key, event.time) {
                        self.undecided = Some(event.position);
                    } else {
                        // the key is already down elsewhere; its release must not end that cycle
                        self.active_codes[row][col] = kc::NO;
                    }
                }
                None => self.run_action(code, true, event.position),
            }
            if self.jiggle_stopped_by == Some(event.position) {
                self.jiggle_stopped_by = None;
            }
        } else {
            let code = mem::replace(&mut self.active_codes[row][col], kc::NO);
            match self.tap_hold.lookup(code) {
                Some(key) => {
                    if let Some(resolution) = self.tap_hold.release(key, event.time) {
                        self.resolve(resolution);
                    }
                }
                None => self.run_action(code, false, event.position),
            }
        }
    }

    fn resolve(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Tap { key, code, count } => {
                crate::debug!("tap {} x{}", key.0, count);
                let position = self
                    .undecided
                    .take()
                    .unwrap_or(KeyPosition::new(u8::MAX, u8::MAX));
                self.run_action(code, true, position);
                self.run_action(code, false, position);
            }
            Resolution::HoldStart { action, .. } => {
                self.undecided = None;
                self.hold(action, true);
            }
            Resolution::HoldEnd { action, .. } => self.hold(action, false),
        }
    }

    fn hold(&mut self, action: HoldAction, is_down: bool) {
        match action {
            HoldAction::Modifiers(mods) => self.write_modifiers(mods, if is_down { 1 } else { -1 }),
            HoldAction::Layer(layer) => self.layer(layer, is_down),
        }
    }

    fn run_action(&mut self, code: u16, is_down: bool, position: KeyPosition) {
        if let Some(index) = self.overrides.iter().position(|o| o.trigger == code) {
            self.key_override(index, is_down);
            return;
        }
        match code {
            key_range::NO | key_range::TRANSPARENT => {}
            key_range::BASIC_MIN..=key_range::BASIC_MAX => self.basic(code as u8, is_down),
            key_range::MODIFIER_MIN..=key_range::MODIFIER_MAX => {
                self.write_modifiers(modifiers::bit(code), if is_down { 1 } else { -1 });
            }
            key_range::SHIFTED_MIN..=key_range::SHIFTED_MAX => {
                let base = (code & 0xff) as u8;
                if is_down {
                    self.write_modifiers(modifiers::LEFT_SHIFT, 1);
                    self.basic(base, true);
                } else {
                    self.basic(base, false);
                    self.write_modifiers(modifiers::LEFT_SHIFT, -1);
                }
            }
            key_range::MOUSE_MIN..=key_range::MOUSE_MAX => self.mouse(code, is_down),
            key_range::LAYER_MIN..=key_range::LAYER_MAX => {
                self.layer((code - key_range::LAYER_MIN) as u8, is_down);
            }
            key_range::FW_RESET_TO_USB_BOOT => {
                if !is_down {
                    firmware_functions::reset_to_usb_boot();
                }
            }
            kc::COPY => {
                if is_down {
                    self.modifier_macro(kc::C as u8);
                }
            }
            kc::JIGGLE => {
                if is_down {
                    self.toggle_jiggler(position);
                }
            }
            _ => {
                crate::info!("unconfigured keycode {}", code);
            }
        }
    }

    fn basic(&mut self, code: u8, is_down: bool) {
        if is_down && self.oneshot_mods != 0 {
            let extra = self.oneshot_mods & !self.modifiers();
            self.oneshot_mods = 0;
            if extra != 0 {
                self.report(KeyEvent::PendingModifiers(extra, true));
                self.report(KeyEvent::Basic(code, true));
                self.report(KeyEvent::PendingModifiers(extra, false));
                return;
            }
        }
        self.report(KeyEvent::Basic(code, is_down));
    }

    fn key_override(&mut self, index: usize, is_down: bool) {
        if !is_down {
            if let Some(code) = self.overrides[index].release() {
                self.basic(code as u8, false);
            }
            return;
        }
        let held = self.modifiers();
        let press = self.overrides[index].press(held, self.oneshot_mods);
        let restore = held & press.consumed;
        if press.consumed != 0 {
            if restore != 0 {
                self.report(KeyEvent::Modifiers(restore, false));
            }
            self.oneshot_mods &= !press.consumed;
        }
        self.basic(press.code as u8, true);
        if restore != 0 {
            self.report(KeyEvent::PendingModifiers(restore, true));
        }
    }

    fn modifier_macro(&mut self, target: u8) {
        let delays = self.config.macro_delays;
        let steps = modifier_macro::modifier_action(target, self.host_os.host_os(), &delays);
        let reports = self.fx.reports;
        modifier_macro::run(&steps, delays.tap, |event| reports.report(event));
    }

    fn mouse(&mut self, code: u16, is_down: bool) {
        let code = code - key_range::MOUSE_MIN;
        match code {
            key_range::MOUSE_BUTTON..=key_range::MOUSE_BUTTON_END => {
                let event = self.fx.mouse.button(code, is_down);
                self.report(event);
            }
            key_range::MOUSE_DELTA..=key_range::MOUSE_DELTA_END => {
                self.fx.mouse.direction(code, is_down);
                if !is_down {
                    return;
                }
                if let Some(event) = self.fx.mouse.movement() {
                    self.report(event);
                }
                let running = self
                    .fx
                    .mouse
                    .token
                    .is_some_and(|t| self.scheduler.is_pending(t));
                if !running {
                    self.fx.mouse.token = self
                        .scheduler
                        .schedule(
                            self.now,
                            MOUSE_KEY_INTERVAL_MS as u32,
                            mouse::repeat::<M, REPORT_BUFFER_SIZE>,
                            0,
                        )
                        .ok();
                }
            }
            _ => {
                crate::info!("unconfigured mouse key {}", code);
            }
        }
    }

    fn toggle_jiggler(&mut self, position: KeyPosition) {
        if self.jiggle_stopped_by == Some(position) {
            return;
        }
        if self.is_jiggling() {
            self.stop_jiggler(position);
            return;
        }
        self.fx.jiggler.start();
        self.fx.jiggler.token = self
            .scheduler
            .schedule(self.now, 1, jiggler::frame::<M, REPORT_BUFFER_SIZE>, 0)
            .ok();
    }

    fn stop_jiggler(&mut self, position: KeyPosition) {
        let Some(token) = self.fx.jiggler.token.take() else {
            return;
        };
        if self.scheduler.cancel(token) {
            self.report(KeyEvent::MouseMove {
                buttons: self.fx.mouse.buttons(),
                dx: 0,
                dy: 0,
            });
            self.jiggle_stopped_by = Some(position);
        }
    }

    fn layer(&mut self, layer: u8, is_down: bool) {
        let Some(holds) = self.layer_holds.get_mut(layer as usize) else {
            crate::warn!("layer out of range {}", layer);
            return;
        };
        if is_down {
            *holds = holds.saturating_add(1);
            self.layers.activate(layer);
        } else if *holds > 0 {
            *holds -= 1;
            if *holds == 0 {
                self.layers.deactivate(layer);
            }
        }
    }

    /// Change the state of a modifier keeping count by accumulating `count` for each modifier.
    /// Only reports modifiers whose state crosses the 0 to 1 threshold; a single modifier is
    /// reported as its key code.
    fn write_modifiers(&mut self, modifiers: u8, count: i8) {
        let is_down = count > 0;
        let mut changed = 0u8;
        for (i, c) in self.modifier_count.iter_mut().enumerate() {
            if modifiers & (1 << i) == 0 {
                continue;
            }
            let before = *c > 0;
            *c = c.saturating_add(count).max(0);
            if before != (*c > 0) {
                changed |= 1 << i;
            }
        }
        match changed.count_ones() {
            0 => {}
            1 => self.report(KeyEvent::Basic(
                key_range::MODIFIER_MIN as u8 + changed.trailing_zeros() as u8,
                is_down,
            )),
            _ => self.report(KeyEvent::Modifiers(changed, is_down)),
        }
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod test;
