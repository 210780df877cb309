//! joypull — polled gamepad snapshots diffed into events.
//!
//! Feeds on one [`RawSample`] per device per tick and derives discrete,
//! edge-triggered button events (`pressed`, `released`, `touched`,
//! `untouched`, held `on`) and level-triggered analog axis events
//! (direction, angle) with configurable thresholds. There is no event
//! source of its own: everything comes from diffing the current sample
//! against the previous derived state.
//!
//! Device discovery, frame scheduling, and haptic playback stay outside
//! the crate, behind the traits in [`device`].
//!
//! ```
//! use joypull::{ManagerCallbacks, SessionManager, VirtualSource};
//!
//! let source = VirtualSource::new();
//! let callbacks = ManagerCallbacks::new().connected(|session| {
//!     session.pressed("button_1", |state| {
//!         println!("{} down at {:.2}", state.key, state.value);
//!     });
//! });
//! let mut manager = SessionManager::with_callbacks(source.clone(), callbacks);
//!
//! source.add_device(0, 17, 2);
//! manager.connect(0, None);
//! source.press_button(0, 0);
//! manager.pull();
//! ```

pub mod axis;
pub mod backends;
pub mod button;
pub mod device;
pub mod event;
pub mod manager;
pub mod mapping;
pub mod session;
pub mod snapshot;

pub use axis::*;
pub use backends::VirtualSource;
pub use button::*;
pub use device::*;
pub use event::*;
pub use manager::*;
pub use mapping::*;
pub use session::*;
pub use snapshot::*;
