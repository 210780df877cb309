//! Poll a scripted virtual pad and print the derived events.
//!
//! Run with `RUST_LOG=debug cargo run --example virtual_poll` to also see
//! the crate's lifecycle logging.

use joypull::{ButtonReading, SessionManager, VirtualSource};

fn main() {
    env_logger::init();

    let source = VirtualSource::new();
    source.add_device(0, 17, 2);

    let mut manager = SessionManager::new(source.clone());
    manager.connect(0, None);

    let session = manager.session_mut(0).expect("session for device 0");
    session.pressed("button_1", |state| {
        println!("pressed  {} (slot {}, value {:.2})", state.key, state.slot, state.value);
    });
    session.released("button_1", |state| {
        println!("released {}", state.key);
    });
    session
        .on("left_trigger", |state| {
            println!("holding  {} at {:.2}", state.key, state.value);
        })
        .set_threshold(0.5);
    session
        .axis("left_stick_axis", |state| {
            println!(
                "stick    {} deg={} dir=({}, {})",
                state.key, state.degrees, state.direction.x, state.direction.y
            );
        })
        .set_thresholds(0.2);

    // Frame 1-2: tap button_1.
    source.press_button(0, 0);
    manager.pull();
    source.release_button(0, 0);
    manager.pull();

    // Frame 3-5: squeeze the trigger through its threshold.
    for value in [0.3_f32, 0.6, 0.9] {
        source.set_button(
            0,
            6,
            ButtonReading {
                pressed: true,
                touched: true,
                value,
            },
        );
        manager.pull();
    }

    // Frame 6-7: sweep the stick east, then northwest.
    source.set_axis(0, 0, 1.0, 0.0);
    manager.pull();
    source.set_axis(0, 0, -0.7, 0.7);
    manager.pull();
}
