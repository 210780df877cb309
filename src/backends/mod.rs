//! In-process sample sources.
//!
//! Implementations of [`SampleSource`](crate::device::SampleSource) that
//! need no hardware. Platform device backends (HID, XInput, evdev, ...)
//! live outside this crate; anything able to produce a
//! [`RawSample`](crate::snapshot::RawSample) per device per tick can drive
//! the engine.

pub mod virtual_input;

pub use virtual_input::VirtualSource;
