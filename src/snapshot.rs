//! Per-tick raw device samples.
//!
//! [`RawSample`] is an **owned** snapshot of one device's physical state at a
//! point in time (typically "this frame"). It is produced by a
//! [`SampleSource`](crate::device::SampleSource) and consumed by
//! [`DeviceSession::step`](crate::session::DeviceSession::step); the session
//! never holds a sample across ticks.
//!
//! # Semantics
//! - `buttons` is an ordered sequence of [`ButtonReading`]s indexed by
//!   physical slot.
//! - `axes` is a flat ordered sequence of floats consumed as interleaved
//!   `(x, y)` pairs: axis-pair slot `k` reads elements `2k` and `2k + 1`.
//! - A sample is **read-only** once built; to refresh, request a new sample
//!   from the source next tick.
//! - Short samples are legal. Accessors return `None` for slots the sample
//!   does not cover, and the caller skips those slots for the tick.
//!
//! # Examples
//! Read a button and a stick pair by slot:
//! ```
//! use joypull::RawSample;
//!
//! let sample = RawSample {
//!     buttons: vec![Default::default(); 4],
//!     axes: vec![0.0, -1.0, 0.5, 0.5],
//! };
//! assert!(sample.button(3).is_some());
//! assert_eq!(sample.axis_pair(0), Some((0.0, -1.0)));
//! assert_eq!(sample.axis_pair(2), None);
//! ```

use serde::{Deserialize, Serialize};

/// Raw reading for one physical button slot.
///
/// `value` is the analog pressure in `[0.0, 1.0]`; digital buttons report
/// `0.0` or `1.0`. `touched` is the capacitive contact flag some pads report
/// independently of `pressed` (e.g. a finger resting on a trigger).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonReading {
    pub pressed: bool,
    pub touched: bool,
    pub value: f32,
}

impl ButtonReading {
    /// A fully pressed digital reading.
    #[inline]
    pub fn down() -> Self {
        Self {
            pressed: true,
            touched: true,
            value: 1.0,
        }
    }
}

/// Owned snapshot of one device's buttons and axes for a single tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Button readings indexed by physical slot.
    pub buttons: Vec<ButtonReading>,
    /// Flat axis values, interleaved `(x, y)` per axis-pair slot.
    pub axes: Vec<f32>,
}

impl RawSample {
    /// Get the reading for a physical button slot, if the sample covers it.
    #[inline]
    pub fn button(&self, slot: u32) -> Option<&ButtonReading> {
        self.buttons.get(slot as usize)
    }

    /// Get the `(x, y)` pair for an axis-pair slot, if the sample covers
    /// both elements.
    #[inline]
    pub fn axis_pair(&self, slot: u32) -> Option<(f32, f32)> {
        let base = slot as usize * 2;
        match (self.axes.get(base), self.axes.get(base + 1)) {
            (Some(&x), Some(&y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Number of button slots covered by this sample.
    #[inline]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Number of complete axis pairs covered by this sample.
    #[inline]
    pub fn axis_pair_count(&self) -> usize {
        self.axes.len() / 2
    }
}
