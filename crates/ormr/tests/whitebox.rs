//! End-to-end simulation: scene load → fixed tick pipeline → gameplay
//! observations (grounding, blocking, picking, behaviors).

use approx::assert_relative_eq;
use ormr::prelude::*;

const SCENE: &str = r#"{
    "entities": [
        { "name": "floor",
          "transform": { "translate": [0, -0.5, 0] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [20, 0.5, 20] },
          "tags": ["ground"] },
        { "name": "wall",
          "transform": { "translate": [0, 2, -3] },
          "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [3, 2, 0.5] },
          "tags": ["static"] },
        { "name": "lift",
          "transform": { "translate": [10, 0, 0] },
          "platform": { "speed": 1.0, "dir": [0, 1, 0], "period": 2.0 } },
        { "name": "beacon",
          "transform": { "translate": [-5, 1, 0] },
          "light": { "color": [1, 1, 0.8] },
          "rotator": { "speed": 1.5708, "axis": [0, 1, 0] } }
    ]
}"#;

const DT: f32 = 1.0 / 60.0;

/// One frame of the fixed pipeline: controller → collision → behaviors.
fn tick(controller: &mut CharacterController, store: &mut Store, input: &InputState) {
    controller.update(store, input, DT);
    collision_step(store, DT);
    behavior_step(store, DT);
}

#[test]
fn whitebox_run_grounds_blocks_and_picks() {
    let mut store = Store::new();
    load_scene(&mut store, SCENE).expect("scene is valid");

    let mut controller =
        CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 6.0, 0.0), 1.0);
    let picker = PickingRay::spawn(&mut store);

    // Fall and settle at the stand-off height above the floor (top y = 0).
    let idle = InputState::default();
    for _ in 0..240 {
        tick(&mut controller, &mut store, &idle);
    }
    let player = store.entity("player").unwrap();
    let grounded_y = store.component::<Transform>(player).unwrap().position().y;
    assert_relative_eq!(grounded_y, 2.0, epsilon = 1e-3);

    // Walk at the wall; the forward ray stops us one ray-length short of
    // its front face (z = -2.5, reach 1.0 → rest at z = -1.5).
    let push = InputState {
        forward: true,
        ..InputState::default()
    };
    for _ in 0..300 {
        tick(&mut controller, &mut store, &push);
    }
    let stopped_z = store.component::<Transform>(player).unwrap().position().z;
    assert!(
        (-1.6..=-1.4).contains(&stopped_z),
        "expected to stop at the wall, z = {stopped_z}"
    );
    // Still grounded while pushing.
    let pushing_y = store.component::<Transform>(player).unwrap().position().y;
    assert_relative_eq!(pushing_y, 2.0, epsilon = 1e-2);

    // The wall fills the view; picking through the screen center finds it.
    let viewport = Vec2::new(1280.0, 720.0);
    picker.aim(&mut store, viewport * 0.5, viewport);
    tick(&mut controller, &mut store, &idle);
    let picked = picker.picked(&store).expect("something under the cursor");
    assert_eq!(picked, store.entity("wall").unwrap());

    // Behaviors ran the whole time: the lift has moved, the beacon has
    // turned.
    let lift = store.entity("lift").unwrap();
    let lift_y = store.component::<Transform>(lift).unwrap().position().y;
    assert!(lift_y.abs() > 1e-3, "lift never moved");

    let beacon = store.entity("beacon").unwrap();
    let local = store.component::<Transform>(beacon).unwrap().local;
    let heading = local.transform_vector3(Vec3::NEG_Z);
    assert!(
        (heading - Vec3::NEG_Z).length() > 0.1,
        "beacon never rotated"
    );

    // Tag queries see the scene.
    assert_eq!(
        entities_with_tag(&store, "ground"),
        vec![store.entity("floor").unwrap()]
    );
}

#[test]
fn collision_results_are_fresh_each_tick() {
    let mut store = Store::new();
    load_scene(&mut store, SCENE).expect("scene is valid");
    let mut controller =
        CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 2.0, 0.0), 1.0);

    let idle = InputState::default();
    for _ in 0..30 {
        tick(&mut controller, &mut store, &idle);
    }

    // Teleport the player far above the floor: the very next sweep must
    // report the new distance, not last frame's.
    let player = store.entity("player").unwrap();
    store
        .component_mut::<Transform>(player)
        .unwrap()
        .set_position(Vec3::new(0.0, 50.0, 0.0));
    collision_step(&mut store, DT);

    let down_slot = {
        let down = store.entity("player down ray").unwrap();
        store.component_slot::<Collider>(down).unwrap()
    };
    let down = store.component_in_array::<Collider>(down_slot);
    assert!(down.colliding);
    assert_relative_eq!(down.collision_distance, 50.0, epsilon = 1e-3);
}
