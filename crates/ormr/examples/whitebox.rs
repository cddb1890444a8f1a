//! Whitebox playground — headless grounding and blocking demo.
//!
//! Loads a boxy test scene, drops an FPS player into it, and runs the
//! fixed pipeline for ten simulated seconds: five idle (fall + settle),
//! five walking into a wall. Prints the player's position once per second.
//!
//! Run with: `RUST_LOG=info cargo run -p ormr --example whitebox`

use std::cell::RefCell;
use std::rc::Rc;

use ormr::prelude::*;

const SCENE: &str = r#"{
    "entities": [
        { "name": "floor",
          "transform": { "translate": [0, -0.5, 0] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [25, 0.5, 25] },
          "tags": ["ground"] },
        { "name": "north_wall",
          "transform": { "translate": [0, 2.5, -8] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [6, 2.5, 0.5] } },
        { "name": "pillar",
          "transform": { "translate": [3, 2, -4] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [0.5, 2, 0.5] },
          "rotator": { "speed": 0.8, "axis": [0, 1, 0] } },
        { "name": "lift",
          "transform": { "translate": [-4, 0.5, -4] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [1, 0.5, 1] },
          "platform": { "speed": 1.0, "dir": [0, 1, 0], "period": 3.0 } }
    ]
}"#;

fn main() {
    env_logger::init();

    let mut store = Store::new();
    load_scene(&mut store, SCENE).expect("whitebox scene is valid");

    let mut controller =
        CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 8.0, 0.0), 16.0 / 9.0);
    let input = Rc::new(RefCell::new(InputState::default()));

    let mut schedule = Schedule::new();
    {
        let input = Rc::clone(&input);
        schedule.add_system(move |store: &mut Store, dt: f32| {
            controller.update(store, &input.borrow(), dt);
        });
    }
    schedule.add_system(collision_step);
    schedule.add_system(behavior_step);

    let clock = FrameClock::new();
    let dt = 1.0 / 60.0;
    let player = store.entity("player").expect("player was spawned");

    for tick in 0..600u32 {
        if tick == 300 {
            // Second half: walk north into the wall.
            input.borrow_mut().forward = true;
            log::info!("walking forward");
        }
        schedule.run(&mut store, dt);

        if tick % 60 == 59 {
            let p = store
                .component::<Transform>(player)
                .expect("player has a transform")
                .position();
            println!(
                "t = {:>2}s  player at ({:>6.2}, {:>5.2}, {:>6.2})",
                (tick + 1) / 60,
                p.x,
                p.y,
                p.z
            );
        }
    }

    let p = store.component::<Transform>(player).unwrap().position();
    println!(
        "done: player rests at ({:.2}, {:.2}, {:.2}) — {} sim ticks in {:.0} ms of wall time",
        p.x,
        p.y,
        p.z,
        600,
        clock.elapsed_secs() * 1000.0
    );
}
