//! External collaborator seams.
//!
//! The core never enumerates hardware, schedules frames, or talks to a
//! haptic motor itself. Each of those concerns comes in through a small
//! trait implemented by the host: a [`SampleSource`] serving raw snapshots
//! by device index, an optional [`Scheduler`] that announces frame
//! subscriptions, and an optional per-device [`HapticActuator`].

use crate::event::RumbleEffect;
use crate::snapshot::RawSample;

/// Serves the current raw snapshot for a device index.
///
/// Returning `None` means the device has no sample this tick (momentarily
/// unavailable); the manager skips it and tries again next tick.
pub trait SampleSource {
    fn sample(&mut self, index: u32) -> Option<RawSample>;
}

/// Plays one rumble effect on a device's actuator.
pub trait HapticActuator {
    fn play_effect(&mut self, effect: &RumbleEffect);
}

/// Opaque proof of a live frame subscription.
///
/// Deliberately neither `Clone` nor `Copy`: the manager holds exactly one
/// and hands it back to [`Scheduler::unsubscribe`] exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Repeating "next frame" source.
///
/// While a subscription is live the scheduler's owner is expected to invoke
/// [`SessionManager::tick`](crate::manager::SessionManager::tick) once per
/// frame. The manager only manages the subscription lifecycle; it never
/// blocks waiting for a frame.
pub trait Scheduler {
    fn subscribe(&mut self) -> SubscriptionHandle;
    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}
