//! Analog stick tracking.
//!
//! An [`AxisTracker`] watches one named stick pair. Unlike buttons, axis
//! events are level-triggered: the state is recomputed from scratch every
//! tick and the callback fires whenever either component is at or over its
//! threshold. Nothing is diffed against the previous tick.

use crate::event::{AxisState, AxisThresholds};

/// Callback invoked with the recomputed state when over threshold.
pub type AxisCallback = Box<dyn FnMut(&AxisState)>;

/// Level-triggered tracker for one stick pair.
pub struct AxisTracker {
    state: AxisState,
    callback: Option<AxisCallback>,
}

impl AxisTracker {
    pub fn new(key: &str) -> Self {
        Self {
            state: AxisState {
                key: key.to_string(),
                ..Default::default()
            },
            callback: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.state.key
    }

    /// Last computed state; default/zeroed until the first update.
    #[inline]
    pub fn state(&self) -> &AxisState {
        &self.state
    }

    #[inline]
    pub fn thresholds(&self) -> AxisThresholds {
        self.state.thresholds
    }

    /// Register `callback`, replacing any previous one.
    pub fn bind(&mut self, callback: AxisCallback) {
        self.callback = Some(callback);
    }

    /// Replace both thresholds. A NaN in either component discards the
    /// whole update; other values clamp to [0, 1].
    pub fn set_thresholds(&mut self, thresholds: impl Into<AxisThresholds>) {
        let t = thresholds.into();
        if t.x.is_nan() || t.y.is_nan() {
            return;
        }
        self.state.thresholds = AxisThresholds {
            x: t.x.clamp(0.0, 1.0),
            y: t.y.clamp(0.0, 1.0),
        };
    }

    /// Recompute the state from this tick's pair and fire the callback when
    /// either component is over its threshold.
    pub fn update(&mut self, x: f32, y: f32) {
        let t = self.state.thresholds;

        self.state.x = x;
        self.state.y = y;
        self.state.direction.x = 0;
        self.state.direction.y = 0;
        self.state.over_threshold.x = false;
        self.state.over_threshold.y = false;
        self.state.angle = 0.0;
        self.state.degrees = 0;
        self.state.radians = 0.0;

        if x.abs() >= t.x {
            self.state.over_threshold.x = true;
            self.state.direction.x = sign(x);
        }
        if y.abs() >= t.y {
            self.state.over_threshold.y = true;
            self.state.direction.y = sign(y);
        }

        if self.state.over_threshold.x || self.state.over_threshold.y {
            let angle = y.atan2(x);
            let degrees = (360 + (180.0 * angle / std::f32::consts::PI).round() as i32) % 360;
            self.state.angle = angle;
            self.state.degrees = degrees;
            // Display value quantized to whole degrees, distinct from `angle`.
            self.state.radians = degrees as f32 * std::f32::consts::PI / 180.0;

            if let Some(callback) = self.callback.as_mut() {
                callback(&self.state);
            }
        }
    }
}

#[inline]
fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

impl std::fmt::Debug for AxisTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisTracker")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
