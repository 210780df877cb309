//! Manager lifecycle walk-through: scheduler subscription, connect and
//! disconnect notifications, and rumble forwarding.

use joypull::{
    HapticActuator, ManagerCallbacks, RumbleEffect, Scheduler, SessionManager, SubscriptionHandle,
    VirtualSource,
};

/// Toy frame source: hands out subscription tokens and lets the demo act
/// as the loop that invokes `tick` while one is live.
struct FrameLoop {
    next_id: u64,
}

impl Scheduler for FrameLoop {
    fn subscribe(&mut self) -> SubscriptionHandle {
        self.next_id += 1;
        println!("scheduler: subscription {} acquired", self.next_id);
        SubscriptionHandle::new(self.next_id)
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        println!("scheduler: subscription {} released", handle.id());
    }
}

struct PrintingMotor;

impl HapticActuator for PrintingMotor {
    fn play_effect(&mut self, effect: &RumbleEffect) {
        println!(
            "rumble: {}ms weak={:.1} strong={:.1}",
            effect.duration, effect.weak_magnitude, effect.strong_magnitude
        );
    }
}

fn main() {
    env_logger::init();

    let source = VirtualSource::new();
    let callbacks = ManagerCallbacks::new()
        .connected(|session| {
            println!("connected: device {}", session.index());
            session.pressed("button_1", |state| {
                println!("device event: {} pressed", state.key);
            });
        })
        .disconnected(|session| {
            println!("disconnected: device {}", session.index());
        });

    let mut manager = SessionManager::with_callbacks(source.clone(), callbacks);
    manager.set_scheduler(Box::new(FrameLoop { next_id: 0 }));

    manager.start();
    manager.start(); // no-op, already running
    println!("running: {}", manager.is_running());

    source.add_device(0, 17, 2);
    manager.connect(0, Some(Box::new(PrintingMotor)));

    source.press_button(0, 0);
    manager.tick();
    if let Some(session) = manager.session_mut(0) {
        session.rumble(RumbleEffect::default());
    }

    manager.disconnect(0);
    manager.stop();
    println!("running: {}", manager.is_running());
}
