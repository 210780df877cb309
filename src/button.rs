//! Button edge detection.
//!
//! A [`ButtonTracker`] watches one physical slot: it derives a
//! [`ButtonState`] from each raw reading, keeps the previous derived state
//! for exactly one tick, and reports which edges qualify. A
//! [`ButtonChannel`] groups the trackers behind one symbolic name (a name
//! can fan out to several slots), owns the per-kind callbacks, and
//! dispatches edges in the fixed [`ButtonKind::DISPATCH_ORDER`].
//!
//! The sticky `passed_threshold` flag gates `on` and `released`: it is set
//! on any tick the derived state is pressed (which already implies the
//! value met the threshold) and cleared only when a `released` edge fires.
//! The clear does not depend on a callback being registered, so state never
//! drifts based on which callbacks exist.

use std::collections::BTreeMap;

use crate::event::{ButtonKind, ButtonState};
use crate::snapshot::ButtonReading;

/// Callback invoked with the derived state at fire time.
pub type ButtonCallback = Box<dyn FnMut(&ButtonState)>;

/// Which edges qualified for one tracker update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub on: bool,
    pub pressed: bool,
    pub released: bool,
    pub touched: bool,
    pub untouched: bool,
}

impl ButtonEdges {
    #[inline]
    fn get(&self, kind: ButtonKind) -> bool {
        match kind {
            ButtonKind::On => self.on,
            ButtonKind::Pressed => self.pressed,
            ButtonKind::Released => self.released,
            ButtonKind::Touched => self.touched,
            ButtonKind::Untouched => self.untouched,
        }
    }
}

/// Edge detector for one physical button slot.
#[derive(Debug)]
pub struct ButtonTracker {
    threshold: f32,
    previous: ButtonState,
    state: ButtonState,
    passed_threshold: bool,
}

impl ButtonTracker {
    pub fn new(key: &str, slot: u32, threshold: f32) -> Self {
        let blank = ButtonState {
            key: key.to_string(),
            slot,
            ..Default::default()
        };
        Self {
            threshold,
            previous: blank.clone(),
            state: blank,
            passed_threshold: false,
        }
    }

    /// Current derived state (this tick's).
    #[inline]
    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    /// Previous derived state (last tick's).
    #[inline]
    pub fn previous(&self) -> &ButtonState {
        &self.previous
    }

    /// Replace the threshold. NaN is ignored, other values clamp to [0, 1].
    pub fn set_threshold(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.threshold = value.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Advance one tick: derive the new state from `raw`, rotate the old
    /// one into `previous`, and report the qualifying edges.
    pub fn update(&mut self, raw: &ButtonReading) -> ButtonEdges {
        std::mem::swap(&mut self.previous, &mut self.state);

        self.state.pressed = raw.pressed && raw.value >= self.threshold;
        self.state.touched = raw.touched && raw.value >= self.threshold;
        self.state.value = raw.value;
        self.state.threshold = self.threshold;

        if self.state.pressed {
            self.passed_threshold = true;
        }

        let edges = ButtonEdges {
            on: self.state.pressed && self.passed_threshold,
            pressed: self.state.pressed && !self.previous.pressed,
            released: self.passed_threshold && !self.state.pressed && self.previous.pressed,
            touched: self.state.touched && !self.previous.touched,
            untouched: !self.state.touched && self.previous.touched,
        };

        if edges.released {
            self.passed_threshold = false;
        }

        edges
    }
}

/// Per-kind callback slots, one each, last bind wins.
#[derive(Default)]
struct ButtonCallbacks {
    on: Option<ButtonCallback>,
    pressed: Option<ButtonCallback>,
    released: Option<ButtonCallback>,
    touched: Option<ButtonCallback>,
    untouched: Option<ButtonCallback>,
}

impl ButtonCallbacks {
    fn slot(&mut self, kind: ButtonKind) -> &mut Option<ButtonCallback> {
        match kind {
            ButtonKind::On => &mut self.on,
            ButtonKind::Pressed => &mut self.pressed,
            ButtonKind::Released => &mut self.released,
            ButtonKind::Touched => &mut self.touched,
            ButtonKind::Untouched => &mut self.untouched,
        }
    }
}

/// All trackers and callbacks behind one bound button name.
pub struct ButtonChannel {
    key: String,
    threshold: f32,
    callbacks: ButtonCallbacks,
    trackers: BTreeMap<u32, ButtonTracker>,
}

impl ButtonChannel {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            threshold: 0.0,
            callbacks: ButtonCallbacks::default(),
            trackers: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Register `callback` for `kind`, replacing any previous one.
    pub fn bind(&mut self, kind: ButtonKind, callback: ButtonCallback) {
        *self.callbacks.slot(kind) = Some(callback);
    }

    /// Apply a threshold to the channel and every tracker it owns.
    ///
    /// NaN is ignored and the prior threshold retained; other values clamp
    /// to [0, 1]. Trackers created later inherit the channel threshold.
    pub fn set_threshold(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.threshold = value.clamp(0.0, 1.0);
        for tracker in self.trackers.values_mut() {
            tracker.set_threshold(self.threshold);
        }
    }

    /// Derived state for one of the channel's slots, if it has ever been
    /// updated.
    pub fn state_of(&self, slot: u32) -> Option<&ButtonState> {
        self.trackers.get(&slot).map(ButtonTracker::state)
    }

    /// Advance the tracker for `slot` with this tick's reading and dispatch
    /// the qualifying callbacks in fixed kind order.
    pub fn update_slot(&mut self, slot: u32, raw: &ButtonReading) {
        let key = &self.key;
        let threshold = self.threshold;
        let tracker = self
            .trackers
            .entry(slot)
            .or_insert_with(|| ButtonTracker::new(key, slot, threshold));
        let edges = tracker.update(raw);

        for kind in ButtonKind::DISPATCH_ORDER {
            if !edges.get(kind) {
                continue;
            }
            if let Some(callback) = self.callbacks.slot(kind) {
                callback(&tracker.state);
            }
        }
    }
}

impl std::fmt::Debug for ButtonChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonChannel")
            .field("key", &self.key)
            .field("threshold", &self.threshold)
            .field("trackers", &self.trackers)
            .finish_non_exhaustive()
    }
}
