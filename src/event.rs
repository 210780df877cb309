//! Derived states and event kinds.
//!
//! joypull turns raw per-tick readings into small derived state values:
//! [`ButtonState`] for button slots (diffed against the previous tick) and
//! [`AxisState`] for stick pairs (recomputed fresh, never diffed). Callbacks
//! receive these states by reference; they are plain values and mutating a
//! copy never reaches tracker internals.
//!
//! ## Value conventions
//! - **Button `value`:** analog pressure normalized to `[0.0, 1.0]`.
//! - **Axis `x`/`y`:** normalized to `[-1.0, 1.0]`.
//! - **Thresholds:** clamped to `[0.0, 1.0]` at the point they are set.
//! - **`angle`:** `atan2(y, x)` in radians, range `(-π, π]`.
//! - **`degrees`:** `angle` rounded and normalized to `[0, 360)`.
//! - **`radians`:** `degrees` re-expressed in radians. This is a *display*
//!   value quantized to whole degrees and is intentionally distinct from
//!   `angle`; consumers relying on the historical field pair get both.

use serde::{Deserialize, Serialize};

/// The closed set of edge/level event kinds a button channel can dispatch.
///
/// Dispatch order within one tick is fixed: `On`, `Pressed`, `Released`,
/// `Touched`, `Untouched`. The order is observable when several kinds
/// qualify in the same tick (a press that immediately clears its threshold
/// fires `On` before `Pressed`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonKind {
    /// Fires every tick the button is held past its threshold.
    On,
    /// Fires once when the derived pressed flag rises.
    Pressed,
    /// Fires once when the derived pressed flag falls, gated on the sticky
    /// threshold flag.
    Released,
    /// Fires once when the derived touched flag rises.
    Touched,
    /// Fires once when the derived touched flag falls.
    Untouched,
}

impl ButtonKind {
    /// All kinds, in dispatch order.
    pub const DISPATCH_ORDER: [ButtonKind; 5] = [
        ButtonKind::On,
        ButtonKind::Pressed,
        ButtonKind::Released,
        ButtonKind::Touched,
        ButtonKind::Untouched,
    ];
}

/// Derived state of one button slot for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonState {
    /// Symbolic name the slot is bound to.
    pub key: String,
    /// Physical slot the reading came from.
    pub slot: u32,
    /// `raw.pressed && raw.value >= threshold`.
    pub pressed: bool,
    /// `raw.touched && raw.value >= threshold`.
    pub touched: bool,
    /// Raw analog value, `[0.0, 1.0]`.
    pub value: f32,
    /// Threshold applied when this state was derived.
    pub threshold: f32,
}

/// Per-axis activation thresholds for a stick pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisThresholds {
    pub x: f32,
    pub y: f32,
}

impl From<f32> for AxisThresholds {
    /// A single value applies to both axes.
    fn from(value: f32) -> Self {
        Self { x: value, y: value }
    }
}

impl From<(f32, f32)> for AxisThresholds {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for AxisThresholds {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Per-axis sign of motion: `-1`, `0`, or `1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDirection {
    pub x: i8,
    pub y: i8,
}

/// Per-axis over-threshold flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
}

/// State of one stick pair for one tick.
///
/// Level-triggered: recomputed from scratch every update, never compared to
/// a previous value. The angle fields stay zero while neither component is
/// over its threshold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    /// Symbolic name the pair is bound to.
    pub key: String,
    pub x: f32,
    pub y: f32,
    pub thresholds: AxisThresholds,
    pub direction: AxisDirection,
    pub over_threshold: AxisFlags,
    /// `atan2(y, x)` in radians, `(-π, π]`.
    pub angle: f32,
    /// `angle` rounded to whole degrees, normalized to `[0, 360)`.
    pub degrees: i32,
    /// `degrees` converted back to radians (see module docs).
    pub radians: f32,
}

/// Parameters for one haptic effect, forwarded to the device actuator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RumbleEffect {
    /// Delay before playback, in milliseconds.
    pub start_delay: u32,
    /// Playback length, in milliseconds.
    pub duration: u32,
    /// Strength of the weak (high-frequency) motor, `[0.0, 1.0]`.
    pub weak_magnitude: f32,
    /// Strength of the strong (low-frequency) motor, `[0.0, 1.0]`.
    pub strong_magnitude: f32,
}

impl Default for RumbleEffect {
    fn default() -> Self {
        Self {
            start_delay: 0,
            duration: 500,
            weak_magnitude: 1.0,
            strong_magnitude: 1.0,
        }
    }
}
