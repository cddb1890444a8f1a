//! Mouse picking — resolve the entity under a few cursor positions.
//!
//! A static camera looks down -Z at three crates. For each simulated
//! cursor position, the picking ray is re-aimed, one collision step runs,
//! and the picked entity (or nothing) is printed.
//!
//! Run with: `RUST_LOG=info cargo run -p ormr --example picking`

use ormr::prelude::*;

fn main() {
    env_logger::init();

    let mut store = Store::new();

    for (name, position) in [
        ("crate_left", Vec3::new(-3.0, 0.0, -8.0)),
        ("crate_center", Vec3::new(0.0, 0.0, -8.0)),
        ("crate_right", Vec3::new(3.0, 0.0, -8.0)),
    ] {
        let e = store.create_entity(name);
        store
            .component_mut::<Transform>(e)
            .expect("entities always have a transform")
            .translate(position);
        store.create_component::<Collider>(e);
    }

    let _observer = CharacterController::spawn_free(
        &mut store,
        "observer",
        Vec3::ZERO,
        Vec3::NEG_Z,
        16.0 / 9.0,
    );
    let picker = PickingRay::spawn(&mut store);

    let viewport = Vec2::new(1600.0, 900.0);
    let probes = [
        ("center", viewport * 0.5),
        ("left of center", Vec2::new(500.0, 450.0)),
        ("right of center", Vec2::new(1100.0, 450.0)),
        ("sky", Vec2::new(800.0, 60.0)),
    ];

    for (label, cursor) in probes {
        picker.aim(&mut store, cursor, viewport);
        collision_step(&mut store, 1.0 / 60.0);

        match picker.picked(&store) {
            Some(id) => println!(
                "{label:>15}: picked \"{}\" at distance {:.2}",
                store.entity_record(id).name,
                store
                    .component::<Collider>(store.entity("picking_ray").unwrap())
                    .unwrap()
                    .collision_distance
            ),
            None => println!("{label:>15}: nothing"),
        }
    }
}
