//! Session registry and tick driver.
//!
//! [`SessionManager`] owns every live [`DeviceSession`], keyed by device
//! index. External discovery code reports lifecycle through
//! [`connect`](SessionManager::connect)/[`disconnect`](SessionManager::disconnect);
//! a frame source drives [`tick`](SessionManager::tick) once per frame while
//! the manager holds a scheduler subscription. Everything runs on the
//! caller's thread: one tick updates all sessions synchronously, in index
//! order, axes before buttons within each session.

use std::collections::BTreeMap;

use log::{debug, info, trace};

use crate::device::{HapticActuator, SampleSource, Scheduler, SubscriptionHandle};
use crate::session::DeviceSession;

/// User lifecycle callbacks, invoked from `connect`/`disconnect`.
///
/// The connected callback is the natural place to set up bindings on the
/// fresh session.
#[derive(Default)]
pub struct ManagerCallbacks {
    pub connected: Option<Box<dyn FnMut(&mut DeviceSession)>>,
    pub disconnected: Option<Box<dyn FnMut(&mut DeviceSession)>>,
}

impl ManagerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(mut self, callback: impl FnMut(&mut DeviceSession) + 'static) -> Self {
        self.connected = Some(Box::new(callback));
        self
    }

    pub fn disconnected(mut self, callback: impl FnMut(&mut DeviceSession) + 'static) -> Self {
        self.disconnected = Some(Box::new(callback));
        self
    }
}

/// Registry of live device sessions plus the tick loop plumbing.
pub struct SessionManager<S: SampleSource> {
    source: S,
    sessions: BTreeMap<u32, DeviceSession>,
    callbacks: ManagerCallbacks,
    scheduler: Option<Box<dyn Scheduler>>,
    subscription: Option<SubscriptionHandle>,
}

impl<S: SampleSource> SessionManager<S> {
    /// A manager with no lifecycle callbacks and no scheduler (manual
    /// [`pull`](Self::pull) environments).
    pub fn new(source: S) -> Self {
        Self::with_callbacks(source, ManagerCallbacks::default())
    }

    pub fn with_callbacks(source: S, callbacks: ManagerCallbacks) -> Self {
        Self {
            source,
            sessions: BTreeMap::new(),
            callbacks,
            scheduler: None,
            subscription: None,
        }
    }

    /// Attach the frame scheduler used by [`start`](Self::start)/
    /// [`stop`](Self::stop).
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        self.scheduler = Some(scheduler);
    }

    /// Handle a device-connected notification: create a session with fresh
    /// default mappings, store it, and invoke the `connected` callback.
    ///
    /// Reconnecting an index replaces the old session.
    pub fn connect(&mut self, index: u32, haptics: Option<Box<dyn HapticActuator>>) {
        info!("device {index} connected");
        let mut session = DeviceSession::new(index, haptics);
        if let Some(callback) = self.callbacks.connected.as_mut() {
            callback(&mut session);
        }
        self.sessions.insert(index, session);
    }

    /// Handle a device-disconnected notification: invoke the
    /// `disconnected` callback with the outgoing session, then drop it.
    pub fn disconnect(&mut self, index: u32) {
        let Some(mut session) = self.sessions.remove(&index) else {
            debug!("disconnect for unknown device {index}");
            return;
        };
        info!("device {index} disconnected");
        if let Some(callback) = self.callbacks.disconnected.as_mut() {
            callback(&mut session);
        }
    }

    /// Borrow the session for a device index.
    pub fn session(&self, index: u32) -> Option<&DeviceSession> {
        self.sessions.get(&index)
    }

    /// Mutably borrow the session for a device index (e.g. to add bindings
    /// after connect).
    pub fn session_mut(&mut self, index: u32) -> Option<&mut DeviceSession> {
        self.sessions.get_mut(&index)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Run one polling step for every live session, in index order.
    ///
    /// A session the source has no sample for is skipped this tick and
    /// stays registered; only an explicit [`disconnect`](Self::disconnect)
    /// removes sessions.
    pub fn tick(&mut self) {
        for (&index, session) in self.sessions.iter_mut() {
            match self.source.sample(index) {
                Some(sample) => session.step(&sample),
                None => trace!("device {index}: no sample this tick"),
            }
        }
    }

    /// Force a manual step; alias for [`tick`](Self::tick).
    pub fn pull(&mut self) {
        self.tick();
    }

    /// Subscribe to the configured scheduler. A no-op when already running
    /// or when no scheduler is attached.
    pub fn start(&mut self) {
        if self.subscription.is_some() {
            debug!("start ignored: already subscribed");
            return;
        }
        let Some(scheduler) = self.scheduler.as_mut() else {
            debug!("start ignored: no scheduler attached");
            return;
        };
        let handle = scheduler.subscribe();
        debug!("frame subscription {} acquired", handle.id());
        self.subscription = Some(handle);
    }

    /// Release the scheduler subscription, if any. Idempotent; a later
    /// [`start`](Self::start) subscribes cleanly again.
    pub fn stop(&mut self) {
        let Some(handle) = self.subscription.take() else {
            return;
        };
        if let Some(scheduler) = self.scheduler.as_mut() {
            debug!("frame subscription {} released", handle.id());
            scheduler.unsubscribe(handle);
        }
    }

    /// Whether a frame subscription is currently live.
    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }
}

impl<S: SampleSource> Drop for SessionManager<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
