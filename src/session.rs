//! Per-device binding surface and polling step.
//!
//! A [`DeviceSession`] owns everything one connected device needs: the
//! button and axis [`SlotMap`]s (seeded from the built-in default tables),
//! one [`ButtonChannel`] per bound button name, one [`AxisTracker`] per
//! bound axis name, and the optional haptic actuator. `step` consumes one
//! [`RawSample`] and runs every bound tracker: axes first, then buttons,
//! the only ordering guaranteed to downstream consumers.
//!
//! Callbacks hold no reference back to the session, so bindings cannot be
//! mutated from inside a dispatch; registration always takes effect on the
//! next tick at the latest.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;

use crate::axis::AxisTracker;
use crate::button::ButtonChannel;
use crate::device::HapticActuator;
use crate::event::{AxisState, AxisThresholds, ButtonKind, ButtonState, RumbleEffect};
use crate::mapping::{BindingError, MappingProfile, SlotMap, DEFAULT_AXES, DEFAULT_BUTTONS};
use crate::snapshot::{ButtonReading, RawSample};

/// Callback receiving the active (raw-pressed) readings of a tick, as
/// `(slot, reading)` pairs. Used for interactive mapping discovery.
pub type IdentifyCallback = Box<dyn FnMut(&[(u32, ButtonReading)])>;

/// One name or a list of names for a binding call.
pub trait KeySet {
    fn into_keys(self) -> Vec<String>;
}

impl KeySet for &str {
    fn into_keys(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl KeySet for String {
    fn into_keys(self) -> Vec<String> {
        vec![self]
    }
}

impl<const N: usize> KeySet for [&str; N] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|k| k.to_string()).collect()
    }
}

impl KeySet for &[&str] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|k| k.to_string()).collect()
    }
}

impl KeySet for Vec<String> {
    fn into_keys(self) -> Vec<String> {
        self
    }
}

/// Threshold control for the button channels named in one binding call.
///
/// Returned by [`DeviceSession::on`], [`DeviceSession::pressed`] and
/// [`DeviceSession::touched`]. `released`/`untouched` intentionally return
/// no handle; their threshold is set through the paired press/touch call.
pub struct ThresholdHandle<'a> {
    session: &'a mut DeviceSession,
    keys: Vec<String>,
}

impl ThresholdHandle<'_> {
    /// Apply `value` to every channel named in the originating call.
    /// NaN is ignored; other values clamp to [0, 1].
    pub fn set_threshold(&mut self, value: f32) -> &mut Self {
        for key in &self.keys {
            if let Some(channel) = self.session.buttons.get_mut(key) {
                channel.set_threshold(value);
            }
        }
        self
    }
}

/// Threshold control for the axis trackers named in one binding call.
pub struct AxisThresholdHandle<'a> {
    session: &'a mut DeviceSession,
    keys: Vec<String>,
}

impl AxisThresholdHandle<'_> {
    /// Apply thresholds to every tracker named in the originating call.
    /// Accepts a single value (both axes), an `(x, y)` pair, or a
    /// 2-element array; a NaN component discards the update.
    pub fn set_thresholds(&mut self, thresholds: impl Into<AxisThresholds>) -> &mut Self {
        let t = thresholds.into();
        for key in &self.keys {
            if let Some(tracker) = self.session.axes.get_mut(key) {
                tracker.set_thresholds(t);
            }
        }
        self
    }
}

/// Bindings, trackers, and haptics for one connected device.
pub struct DeviceSession {
    index: u32,
    button_map: SlotMap,
    axis_map: SlotMap,
    buttons: BTreeMap<String, ButtonChannel>,
    axes: BTreeMap<String, AxisTracker>,
    identify: Option<IdentifyCallback>,
    haptics: Option<Box<dyn HapticActuator>>,
}

impl DeviceSession {
    /// Create a session with fresh default mappings (17 buttons, 2 stick
    /// pairs) and an optional haptic actuator.
    pub fn new(index: u32, haptics: Option<Box<dyn HapticActuator>>) -> Self {
        Self {
            index,
            button_map: SlotMap::from_table(&DEFAULT_BUTTONS),
            axis_map: SlotMap::from_table(&DEFAULT_AXES),
            buttons: BTreeMap::new(),
            axes: BTreeMap::new(),
            identify: None,
            haptics,
        }
    }

    /// Device index this session polls.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Read-only view of the button mapping.
    #[inline]
    pub fn button_map(&self) -> &SlotMap {
        &self.button_map
    }

    /// Read-only view of the axis mapping.
    #[inline]
    pub fn axis_map(&self) -> &SlotMap {
        &self.axis_map
    }

    /// Bind `name` to one or more physical button slots.
    pub fn map_button(&mut self, name: &str, slots: &[u32]) -> Result<(), BindingError> {
        self.button_map.bind(name, slots)
    }

    /// Bind `name` to one or more axis-pair slots.
    pub fn map_axis(&mut self, name: &str, slots: &[u32]) -> Result<(), BindingError> {
        self.axis_map.bind(name, slots)
    }

    /// Drop every button mapping entry (trackers and callbacks survive and
    /// resume once their names are mapped again).
    pub fn clear_button_map(&mut self) {
        self.button_map.clear();
    }

    /// Drop every axis mapping entry.
    pub fn clear_axis_map(&mut self) {
        self.axis_map.clear();
    }

    /// Apply both tables of a profile, entry by entry, under the usual
    /// duplicate rules. Entries before a failing one remain bound.
    pub fn apply_profile(&mut self, profile: &MappingProfile) -> Result<(), BindingError> {
        for (name, spec) in &profile.buttons {
            self.button_map.bind(name, spec.slots())?;
        }
        for (name, spec) in &profile.axes {
            self.axis_map.bind(name, spec.slots())?;
        }
        Ok(())
    }

    /// Fire every tick the named buttons are held past their threshold.
    pub fn on<K, F>(&mut self, keys: K, callback: F) -> ThresholdHandle<'_>
    where
        K: KeySet,
        F: FnMut(&ButtonState) + 'static,
    {
        let keys = keys.into_keys();
        self.bind_button(ButtonKind::On, &keys, callback);
        ThresholdHandle {
            session: self,
            keys,
        }
    }

    /// Fire once when the named buttons' derived pressed flag rises.
    pub fn pressed<K, F>(&mut self, keys: K, callback: F) -> ThresholdHandle<'_>
    where
        K: KeySet,
        F: FnMut(&ButtonState) + 'static,
    {
        let keys = keys.into_keys();
        self.bind_button(ButtonKind::Pressed, &keys, callback);
        ThresholdHandle {
            session: self,
            keys,
        }
    }

    /// Fire once when the named buttons' derived pressed flag falls.
    pub fn released<K, F>(&mut self, keys: K, callback: F)
    where
        K: KeySet,
        F: FnMut(&ButtonState) + 'static,
    {
        let keys = keys.into_keys();
        self.bind_button(ButtonKind::Released, &keys, callback);
    }

    /// Fire once when the named buttons' derived touched flag rises.
    pub fn touched<K, F>(&mut self, keys: K, callback: F) -> ThresholdHandle<'_>
    where
        K: KeySet,
        F: FnMut(&ButtonState) + 'static,
    {
        let keys = keys.into_keys();
        self.bind_button(ButtonKind::Touched, &keys, callback);
        ThresholdHandle {
            session: self,
            keys,
        }
    }

    /// Fire once when the named buttons' derived touched flag falls.
    pub fn untouched<K, F>(&mut self, keys: K, callback: F)
    where
        K: KeySet,
        F: FnMut(&ButtonState) + 'static,
    {
        let keys = keys.into_keys();
        self.bind_button(ButtonKind::Untouched, &keys, callback);
    }

    /// Fire when the named stick pairs move past their thresholds.
    pub fn axis<K, F>(&mut self, keys: K, callback: F) -> AxisThresholdHandle<'_>
    where
        K: KeySet,
        F: FnMut(&AxisState) + 'static,
    {
        let keys = keys.into_keys();
        let shared = Rc::new(RefCell::new(callback));
        for key in &keys {
            let tracker = self
                .axes
                .entry(key.clone())
                .or_insert_with(|| AxisTracker::new(key));
            let callback = Rc::clone(&shared);
            tracker.bind(Box::new(move |state| (&mut *callback.borrow_mut())(state)));
        }
        AxisThresholdHandle {
            session: self,
            keys,
        }
    }

    /// Report raw-pressed readings each tick, before normal dispatch.
    /// Useful for discovering which physical slot a button lives on.
    pub fn identify<F>(&mut self, callback: F)
    where
        F: FnMut(&[(u32, ButtonReading)]) + 'static,
    {
        self.identify = Some(Box::new(callback));
    }

    /// Forward a rumble effect to the device actuator, if it has one.
    pub fn rumble(&mut self, effect: RumbleEffect) {
        if let Some(haptics) = self.haptics.as_mut() {
            debug!("device {}: rumble {:?}", self.index, effect);
            haptics.play_effect(&effect);
        }
    }

    /// Run one polling step against this tick's sample.
    ///
    /// Axis trackers update before button channels. A name whose slot is
    /// unmapped, or whose slot the sample does not cover, is skipped for
    /// the tick; nothing is an error here.
    pub fn step(&mut self, sample: &RawSample) {
        if let Some(identify) = self.identify.as_mut() {
            let active: Vec<(u32, ButtonReading)> = sample
                .buttons
                .iter()
                .enumerate()
                .filter(|(_, reading)| reading.pressed)
                .map(|(slot, reading)| (slot as u32, *reading))
                .collect();
            if !active.is_empty() {
                identify(&active);
            }
        }

        for tracker in self.axes.values_mut() {
            for &slot in self.axis_map.slots_of(tracker.key()) {
                if let Some((x, y)) = sample.axis_pair(slot) {
                    tracker.update(x, y);
                }
            }
        }

        for channel in self.buttons.values_mut() {
            for &slot in self.button_map.slots_of(channel.key()) {
                if let Some(reading) = sample.button(slot) {
                    channel.update_slot(slot, reading);
                }
            }
        }
    }

    fn bind_button<F>(&mut self, kind: ButtonKind, keys: &[String], callback: F)
    where
        F: FnMut(&ButtonState) + 'static,
    {
        let shared = Rc::new(RefCell::new(callback));
        for key in keys {
            let channel = self
                .buttons
                .entry(key.clone())
                .or_insert_with(|| ButtonChannel::new(key));
            let callback = Rc::clone(&shared);
            channel.bind(kind, Box::new(move |state| (&mut *callback.borrow_mut())(state)));
        }
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("index", &self.index)
            .field("button_map", &self.button_map)
            .field("axis_map", &self.axis_map)
            .field("buttons", &self.buttons)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_with_button(slot: usize, reading: ButtonReading) -> RawSample {
        let mut buttons = vec![ButtonReading::default(); 17];
        buttons[slot] = reading;
        RawSample {
            buttons,
            axes: vec![0.0; 4],
        }
    }

    #[test]
    fn new_session_carries_the_default_tables() {
        let session = DeviceSession::new(0, None);
        assert_eq!(session.button_map().len(), 17);
        assert_eq!(session.axis_map().len(), 2);
        assert_eq!(session.button_map().name_of(16), Some("vendor"));
    }

    #[test]
    fn step_dispatches_a_default_mapped_press() {
        let mut session = DeviceSession::new(0, None);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        session.pressed("button_1", move |state: &ButtonState| {
            sink.borrow_mut().push(state.clone());
        });

        session.step(&sample_with_button(0, ButtonReading::down()));
        session.step(&sample_with_button(0, ButtonReading::down()));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].key, "button_1");
        assert_eq!(log.borrow()[0].slot, 0);
    }

    #[test]
    fn threshold_handle_applies_to_every_key_in_the_call() {
        let mut session = DeviceSession::new(0, None);
        session
            .pressed(["left_trigger", "right_trigger"], |_: &ButtonState| {})
            .set_threshold(0.7);

        // Neither trigger registers below the shared threshold.
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        session.on("left_trigger", move |_: &ButtonState| {
            *sink.borrow_mut() += 1;
        });
        session.step(&sample_with_button(
            6,
            ButtonReading {
                pressed: true,
                touched: false,
                value: 0.5,
            },
        ));
        assert_eq!(*count.borrow(), 0);
        session.step(&sample_with_button(
            6,
            ButtonReading {
                pressed: true,
                touched: false,
                value: 0.9,
            },
        ));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn one_callback_shared_across_keys_fires_per_key() {
        let mut session = DeviceSession::new(0, None);
        let keys = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&keys);
        session.pressed(["button_1", "button_2"], move |state: &ButtonState| {
            sink.borrow_mut().push(state.key.clone());
        });

        let mut buttons = vec![ButtonReading::default(); 17];
        buttons[0] = ButtonReading::down();
        buttons[1] = ButtonReading::down();
        session.step(&RawSample {
            buttons,
            axes: vec![],
        });
        assert_eq!(*keys.borrow(), vec!["button_1", "button_2"]);
    }

    #[test]
    fn fan_out_name_updates_one_tracker_per_slot() {
        let mut session = DeviceSession::new(0, None);
        session.clear_button_map();
        session.map_button("trim", &[6, 7]).unwrap();

        let slots = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&slots);
        session.pressed("trim", move |state: &ButtonState| {
            sink.borrow_mut().push(state.slot);
        });

        session.step(&sample_with_button(6, ButtonReading::down()));
        // Slot 6 stays held; slot 7 presses fresh. Only 7 edges.
        let mut buttons = vec![ButtonReading::default(); 17];
        buttons[6] = ButtonReading::down();
        buttons[7] = ButtonReading::down();
        session.step(&RawSample {
            buttons,
            axes: vec![],
        });
        assert_eq!(*slots.borrow(), vec![6, 7]);
    }

    #[test]
    fn axes_update_before_buttons() {
        let mut session = DeviceSession::new(0, None);
        let order = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&order);
        session.axis("left_stick_axis", move |_: &AxisState| {
            a.borrow_mut().push("axis");
        });
        let b = Rc::clone(&order);
        session.pressed("button_1", move |_: &ButtonState| {
            b.borrow_mut().push("button");
        });

        let mut buttons = vec![ButtonReading::default(); 17];
        buttons[0] = ButtonReading::down();
        session.step(&RawSample {
            buttons,
            axes: vec![1.0, 0.0, 0.0, 0.0],
        });
        assert_eq!(*order.borrow(), vec!["axis", "button"]);
    }

    #[test]
    fn axis_threshold_handle_applies_single_value_to_both_components() {
        let mut session = DeviceSession::new(0, None);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        session
            .axis("left_stick_axis", move |_: &AxisState| {
                *sink.borrow_mut() += 1;
            })
            .set_thresholds(0.5);

        session.step(&RawSample {
            buttons: vec![],
            axes: vec![0.2, 0.2, 0.0, 0.0],
        });
        assert_eq!(*count.borrow(), 0);
        session.step(&RawSample {
            buttons: vec![],
            axes: vec![0.0, -0.9, 0.0, 0.0],
        });
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unmapped_names_and_short_samples_are_skipped() {
        let mut session = DeviceSession::new(0, None);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        session.pressed("ghost", move |_: &ButtonState| {
            *sink.borrow_mut() += 1;
        });
        let sink2 = Rc::clone(&count);
        session.pressed("vendor", move |_: &ButtonState| {
            *sink2.borrow_mut() += 1;
        });

        // "ghost" has no slot; "vendor" maps to slot 16 which this short
        // sample does not cover. Nothing fires, nothing errors.
        session.step(&RawSample {
            buttons: vec![ButtonReading::down(); 3],
            axes: vec![],
        });
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn apply_profile_after_clear_rebinds_both_tables() {
        let mut session = DeviceSession::new(0, None);
        session.clear_button_map();
        session.clear_axis_map();
        let profile = MappingProfile::from_toml(
            r#"
            [buttons]
            fire = 0

            [axes]
            stick = 0
        "#,
        )
        .unwrap();
        session.apply_profile(&profile).unwrap();
        assert_eq!(session.button_map().slots_of("fire"), &[0]);
        assert_eq!(session.axis_map().slots_of("stick"), &[0]);
    }

    #[test]
    fn profile_conflicting_with_defaults_errors_and_keeps_defaults() {
        let mut session = DeviceSession::new(0, None);
        let profile = MappingProfile::from_toml("[buttons]\nfire = 0\n").unwrap();
        assert!(session.apply_profile(&profile).is_err());
        assert_eq!(session.button_map().name_of(0), Some("button_1"));
    }

    struct RecordingActuator {
        played: Rc<RefCell<Vec<RumbleEffect>>>,
    }

    impl HapticActuator for RecordingActuator {
        fn play_effect(&mut self, effect: &RumbleEffect) {
            self.played.borrow_mut().push(*effect);
        }
    }

    #[test]
    fn rumble_forwards_to_the_actuator() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let actuator = RecordingActuator {
            played: Rc::clone(&played),
        };
        let mut session = DeviceSession::new(0, Some(Box::new(actuator)));
        session.rumble(RumbleEffect::default());
        assert_eq!(played.borrow().len(), 1);
        assert_eq!(played.borrow()[0].duration, 500);
        assert_eq!(played.borrow()[0].start_delay, 0);
        assert_eq!(played.borrow()[0].weak_magnitude, 1.0);
    }

    #[test]
    fn rumble_without_actuator_is_a_no_op() {
        let mut session = DeviceSession::new(0, None);
        session.rumble(RumbleEffect {
            duration: 100,
            ..Default::default()
        });
    }

    #[test]
    fn identify_reports_active_slots_only() {
        let mut session = DeviceSession::new(0, None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.identify(move |active| {
            sink.borrow_mut()
                .push(active.iter().map(|(slot, _)| *slot).collect::<Vec<_>>());
        });

        session.step(&sample_with_button(4, ButtonReading::down()));
        // Nothing pressed: identify stays silent.
        session.step(&RawSample {
            buttons: vec![ButtonReading::default(); 17],
            axes: vec![],
        });
        assert_eq!(*seen.borrow(), vec![vec![4]]);
    }
}
