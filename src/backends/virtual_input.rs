//! Virtual in-memory sample source.
//!
//! [`VirtualSource`] holds the current state of any number of pretend
//! devices and serves it as [`RawSample`]s. Cloning a source is cheap and
//! shares the underlying state, so a demo or test can keep one handle for
//! injecting input while the manager owns another for polling.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::device::SampleSource;
use crate::snapshot::{ButtonReading, RawSample};

/// In-memory [`SampleSource`] with per-device state mutators.
///
/// Mutators grow the device's sample on demand: pressing slot 5 of a fresh
/// device yields a six-button sample. Held state persists across ticks
/// until changed, exactly like a real pad's.
#[derive(Clone, Default)]
pub struct VirtualSource {
    devices: Rc<RefCell<BTreeMap<u32, RawSample>>>,
}

impl VirtualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device with `buttons` button slots and `axis_pairs`
    /// stick pairs, all at rest.
    pub fn add_device(&self, index: u32, buttons: usize, axis_pairs: usize) {
        self.devices.borrow_mut().insert(
            index,
            RawSample {
                buttons: vec![ButtonReading::default(); buttons],
                axes: vec![0.0; axis_pairs * 2],
            },
        );
    }

    /// Remove a device; subsequent samples for its index are absent.
    pub fn remove_device(&self, index: u32) {
        self.devices.borrow_mut().remove(&index);
    }

    /// Overwrite one button reading.
    pub fn set_button(&self, index: u32, slot: u32, reading: ButtonReading) {
        let mut devices = self.devices.borrow_mut();
        let sample = devices.entry(index).or_default();
        let slot = slot as usize;
        if sample.buttons.len() <= slot {
            sample.buttons.resize(slot + 1, ButtonReading::default());
        }
        sample.buttons[slot] = reading;
    }

    /// Hold a button fully down.
    pub fn press_button(&self, index: u32, slot: u32) {
        self.set_button(index, slot, ButtonReading::down());
    }

    /// Return a button to rest.
    pub fn release_button(&self, index: u32, slot: u32) {
        self.set_button(index, slot, ButtonReading::default());
    }

    /// Touch or untouch a button without pressing it.
    pub fn set_touched(&self, index: u32, slot: u32, touched: bool) {
        let current = self
            .devices
            .borrow()
            .get(&index)
            .and_then(|sample| sample.button(slot).copied())
            .unwrap_or_default();
        self.set_button(index, slot, ButtonReading { touched, ..current });
    }

    /// Set a stick pair's position.
    pub fn set_axis(&self, index: u32, pair: u32, x: f32, y: f32) {
        let mut devices = self.devices.borrow_mut();
        let sample = devices.entry(index).or_default();
        let base = pair as usize * 2;
        if sample.axes.len() < base + 2 {
            sample.axes.resize(base + 2, 0.0);
        }
        sample.axes[base] = x;
        sample.axes[base + 1] = y;
    }
}

impl SampleSource for VirtualSource {
    fn sample(&mut self, index: u32) -> Option<RawSample> {
        self.devices.borrow().get(&index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let source = VirtualSource::new();
        let mut polled = source.clone();
        source.add_device(0, 2, 1);
        source.press_button(0, 1);
        let sample = polled.sample(0).unwrap();
        assert!(sample.buttons[1].pressed);
        assert_eq!(sample.axes.len(), 2);
    }

    #[test]
    fn mutators_grow_the_sample_on_demand() {
        let source = VirtualSource::new();
        let mut polled = source.clone();
        source.press_button(7, 5);
        source.set_axis(7, 1, 0.5, -0.5);
        let sample = polled.sample(7).unwrap();
        assert_eq!(sample.button_count(), 6);
        assert_eq!(sample.axis_pair(1), Some((0.5, -0.5)));
    }

    #[test]
    fn removed_devices_have_no_sample() {
        let source = VirtualSource::new();
        let mut polled = source.clone();
        source.add_device(0, 1, 0);
        assert!(polled.sample(0).is_some());
        source.remove_device(0);
        assert!(polled.sample(0).is_none());
    }

    #[test]
    fn touch_preserves_the_rest_of_the_reading() {
        let source = VirtualSource::new();
        let mut polled = source.clone();
        source.set_button(
            0,
            0,
            ButtonReading {
                pressed: true,
                touched: false,
                value: 0.8,
            },
        );
        source.set_touched(0, 0, true);
        let reading = polled.sample(0).unwrap().buttons[0];
        assert!(reading.pressed);
        assert!(reading.touched);
        assert_eq!(reading.value, 0.8);
    }
}
