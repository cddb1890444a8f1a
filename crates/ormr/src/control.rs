//! # Control — Character Movement Driven by Collider State
//!
//! The gameplay consumer of the collision system. A
//! [`CharacterController`] reads the previous tick's collider state to
//! ground the player (snap to a stand-off height above the down ray's hit
//! point), block movement (refuse to translate toward a colliding ray), and
//! integrate gravity and jumping. [`PickingRay`] redirects a dedicated ray
//! collider through the cursor each frame and resolves what it hit.
//!
//! Input arrives as a plain [`InputState`] snapshot — no windowing types —
//! so hosts, demos, and tests can feed it from anywhere.
//!
//! Expected schedule order is controller → collision → behaviors: the
//! controller consumes collision results that are one tick old, which is
//! how the original frame loop worked too.

use log::debug;

use crate::camera::Camera;
use crate::collision::{Collider, ColliderShape};
use crate::ecs::{EntityId, Store};
use crate::math::{DEG2RAD, Quat, Vec2, Vec3};
use crate::transform::Transform;

/// One frame of input, filled in by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Vertical movement, free-fly mode only.
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub run: bool,
    /// Held mouse button that enables look rotation.
    pub rotating: bool,
    /// Cursor movement since last frame, pixels.
    pub mouse_delta: Vec2,
    /// Cursor position, pixels from top-left.
    pub cursor: Vec2,
}

/// How the controller moves the camera entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Fly anywhere; ignores colliders.
    Free,
    /// First-person: grounded, blocked, gravity-bound.
    Fps,
}

/// The five ray collider slots an FPS character carries.
#[derive(Debug, Clone, Copy)]
struct FpsRays {
    down: usize,
    forward: usize,
    back: usize,
    left: usize,
    right: usize,
}

/// Moves the main-camera entity from input and collider state.
///
/// Tuning fields are public; the defaults are the engine's original feel.
#[derive(Debug)]
pub struct CharacterController {
    pub mode: ControlMode,
    pub move_speed: f32,
    /// Radians per pixel of mouse movement, per second.
    pub turn_speed: f32,
    /// Stand-off height kept above the down ray's hit point.
    pub height: f32,
    pub gravity: f32,
    pub jump_initial_force: f32,
    pub jump_force_slowdown: f32,
    pub run_speed: f32,
    jump_force: f32,
    can_jump: bool,
    run_multiplier: f32,
    rays: Option<FpsRays>,
}

impl CharacterController {
    fn new(mode: ControlMode, rays: Option<FpsRays>) -> Self {
        Self {
            mode,
            move_speed: 7.5,
            turn_speed: 0.3,
            height: 2.0,
            gravity: 9.8,
            jump_initial_force: 12.0,
            jump_force_slowdown: 7.0,
            run_speed: 2.0,
            jump_force: 0.0,
            can_jump: true,
            run_multiplier: 1.0,
            rays,
        }
    }

    /// Spawn a free-fly camera entity, make it the main camera, and return
    /// a controller in [`ControlMode::Free`].
    pub fn spawn_free(
        store: &mut Store,
        name: &str,
        position: Vec3,
        forward: Vec3,
        aspect: f32,
    ) -> Self {
        let player = store.create_entity(name);
        store
            .component_mut::<Transform>(player)
            .unwrap()
            .translate(position);
        let camera = store.create_component::<Camera>(player);
        camera.position = position;
        camera.forward = forward;
        camera.set_perspective(60.0 * DEG2RAD, aspect, 0.1, 10_000.0);
        camera.update();
        store.main_camera = store.component_slot::<Camera>(player);

        Self::new(ControlMode::Free, None)
    }

    /// Spawn an FPS player: camera entity plus five child ray-collider
    /// entities (down/forward/back/left/right), each parented to the
    /// player's transform so they follow it through the hierarchy. The
    /// player becomes the main camera.
    pub fn spawn_fps(store: &mut Store, name: &str, position: Vec3, aspect: f32) -> Self {
        let player = store.create_entity(name);
        store
            .component_mut::<Transform>(player)
            .unwrap()
            .translate(position);
        let camera = store.create_component::<Camera>(player);
        camera.position = position;
        camera.forward = Vec3::NEG_Z;
        camera.set_perspective(60.0 * DEG2RAD, aspect, 0.01, 10_000.0);
        camera.update();
        store.main_camera = store.component_slot::<Camera>(player);

        let parent_slot = store
            .component_slot::<Transform>(player)
            .expect("freshly created entity has a transform");

        let mut spawn_ray = |store: &mut Store, ray_name: &str, direction: Vec3, max: f32| {
            let e = store.create_entity(&format!("{name} {ray_name}"));
            store.component_mut::<Transform>(e).unwrap().parent = Some(parent_slot);
            let collider = store.create_component::<Collider>(e);
            collider.shape = ColliderShape::Ray;
            collider.direction = direction;
            collider.max_distance = max;
            store.component_slot::<Collider>(e).unwrap()
        };

        let rays = FpsRays {
            down: spawn_ray(store, "down ray", Vec3::NEG_Y, 100.0),
            forward: spawn_ray(store, "forward ray", Vec3::NEG_Z, 1.0),
            back: spawn_ray(store, "back ray", Vec3::Z, 1.0),
            left: spawn_ray(store, "left ray", Vec3::NEG_X, 1.0),
            right: spawn_ray(store, "right ray", Vec3::X, 1.0),
        };

        Self::new(ControlMode::Fps, Some(rays))
    }

    /// Per-tick update. Reads the previous collision step's results and
    /// moves the main-camera entity; refreshes the camera's matrices at
    /// the end.
    ///
    /// # Panics
    ///
    /// Panics if `store.main_camera` is unset, or in FPS mode if the
    /// controller was built without ray colliders.
    pub fn update(&mut self, store: &mut Store, input: &InputState, dt: f32) {
        match self.mode {
            ControlMode::Free => self.update_free(store, input, dt),
            ControlMode::Fps => self.update_fps(store, input, dt),
        }
    }

    fn update_free(&mut self, store: &mut Store, input: &InputState, dt: f32) {
        let cam_slot = store.main_camera.expect("controller requires store.main_camera");
        let (cam_owner, mut forward, up) = {
            let cam = store.component_in_array::<Camera>(cam_slot);
            (cam.owner, cam.forward, cam.up)
        };

        forward = rotate_forward(forward, input, self.turn_speed * dt);

        let move_dt = self.move_speed * dt;
        let forward_dir = forward.normalize() * move_dt;
        let strafe_dir = forward.cross(Vec3::Y) * move_dt;
        let vertical_dir = up.normalize() * move_dt;

        let transform = store
            .component_mut::<Transform>(cam_owner)
            .expect("camera owner has a transform");
        if input.forward {
            transform.translate(forward_dir);
        }
        if input.back {
            transform.translate(-forward_dir);
        }
        if input.left {
            transform.translate(-strafe_dir);
        }
        if input.right {
            transform.translate(strafe_dir);
        }
        if input.up {
            transform.translate(vertical_dir);
        }
        if input.down {
            transform.translate(-vertical_dir);
        }
        let position = transform.position();

        let cam = store.component_in_array_mut::<Camera>(cam_slot);
        cam.forward = forward;
        cam.position = position;
        cam.update();
    }

    fn update_fps(&mut self, store: &mut Store, input: &InputState, dt: f32) {
        let rays = self.rays.expect("FPS mode requires spawned ray colliders");
        let cam_slot = store.main_camera.expect("controller requires store.main_camera");
        let (cam_owner, mut forward) = {
            let cam = store.component_in_array::<Camera>(cam_slot);
            (cam.owner, cam.forward)
        };

        forward = rotate_forward(forward, input, self.turn_speed * dt);

        let move_dt = self.move_speed * self.run_multiplier * dt;

        // Snapshot last tick's ray results before touching the transform.
        let (down_hit, down_point) = {
            let c = store.component_in_array::<Collider>(rays.down);
            (c.colliding, c.collision_point)
        };
        let forward_blocked = store.component_in_array::<Collider>(rays.forward).colliding;
        let back_blocked = store.component_in_array::<Collider>(rays.back).colliding;
        let left_blocked = store.component_in_array::<Collider>(rays.left).colliding;
        let right_blocked = store.component_in_array::<Collider>(rays.right).colliding;

        let transform = store
            .component_mut::<Transform>(cam_owner)
            .expect("camera owner has a transform");

        // Grounding: hold the player `height` units above the down ray's
        // nearest hit.
        let dist_above_ground = (transform.position() - down_point).length();
        if down_hit && dist_above_ground < self.height + 0.01 {
            if !self.can_jump {
                debug!("player landed at y = {:.3}", down_point.y + self.height);
            }
            self.can_jump = true;
            let p = transform.position();
            transform.set_position(Vec3::new(p.x, down_point.y + self.height, p.z));
        } else {
            // Airborne: decay the jump impulse and fall.
            if self.jump_force > 0.0 {
                self.jump_force -= self.jump_force_slowdown * dt;
            } else {
                self.jump_force = 0.0;
            }
            transform.translate(Vec3::new(0.0, (self.jump_force - self.gravity) * dt, 0.0));

            // We may have fallen through the stand-off band just now.
            let dist_above_ground = (transform.position() - down_point).length();
            if down_hit && dist_above_ground < self.height + 0.01 {
                let p = transform.position();
                transform.set_position(Vec3::new(p.x, down_point.y + self.height, p.z));
            }
        }

        if self.can_jump && input.jump {
            self.can_jump = false;
            self.jump_force = self.jump_initial_force;
            transform.translate(Vec3::new(0.0, self.jump_force * dt, 0.0));
        }

        // Walking happens in the horizontal plane only.
        let mut forward_dir = forward.normalize() * move_dt;
        let mut strafe_dir = forward.cross(Vec3::Y) * move_dt;
        forward_dir.y = 0.0;
        strafe_dir.y = 0.0;

        if input.forward && !forward_blocked {
            transform.translate(forward_dir);
        }
        if input.back && !back_blocked {
            transform.translate(-forward_dir);
        }
        if input.left && !left_blocked {
            transform.translate(-strafe_dir);
        }
        if input.right && !right_blocked {
            transform.translate(strafe_dir);
        }
        self.run_multiplier = if input.run { self.run_speed } else { 1.0 };

        let position = transform.position();
        let cam = store.component_in_array_mut::<Camera>(cam_slot);
        cam.forward = forward;
        cam.position = position;
        cam.update();
    }
}

/// Yaw about world Y, then pitch about the camera's strafe axis, scaled by
/// mouse movement. No-op unless the look button is held.
fn rotate_forward(forward: Vec3, input: &InputState, turn_speed_dt: f32) -> Vec3 {
    if !input.rotating {
        return forward;
    }
    let yaw = Quat::from_axis_angle(Vec3::Y, input.mouse_delta.x * turn_speed_dt);
    let forward = yaw * forward;

    let pitch_axis = forward.normalize().cross(Vec3::Y);
    if pitch_axis.length_squared() < f32::EPSILON {
        return forward; // looking straight up/down, no stable pitch axis
    }
    let pitch = Quat::from_axis_angle(pitch_axis.normalize(), input.mouse_delta.y * turn_speed_dt);
    pitch * forward
}

// ── Picking ──────────────────────────────────────────────────────────────

/// A dedicated, dynamically-redirected ray collider for mouse picking.
///
/// Spawn once; call [`aim`](PickingRay::aim) when the cursor moves; read
/// [`picked`](PickingRay::picked) after the next collision step.
pub struct PickingRay {
    pub entity: EntityId,
    collider_slot: usize,
}

impl PickingRay {
    /// Create the picking-ray entity. The ray starts parked (near-zero
    /// reach) so it hits nothing until aimed.
    pub fn spawn(store: &mut Store) -> Self {
        let entity = store.create_entity("picking_ray");
        let collider = store.create_component::<Collider>(entity);
        collider.shape = ColliderShape::Ray;
        collider.direction = Vec3::NEG_Z;
        collider.max_distance = 0.001;
        let collider_slot = store
            .component_slot::<Collider>(entity)
            .expect("collider was just attached");
        Self {
            entity,
            collider_slot,
        }
    }

    /// Point the ray from the main camera through the cursor. The hit is
    /// computed by the *next* collision step.
    ///
    /// # Panics
    ///
    /// Panics if `store.main_camera` is unset.
    pub fn aim(&self, store: &mut Store, cursor: Vec2, viewport: Vec2) {
        let cam_slot = store.main_camera.expect("picking requires store.main_camera");
        let (cam_position, target) = {
            let cam = store.component_in_array::<Camera>(cam_slot);
            (cam.position, cam.unproject_cursor(cursor, viewport))
        };

        store
            .component_mut::<Transform>(self.entity)
            .expect("picking ray has a transform")
            .set_position(cam_position);
        let collider = store
            .component_mut::<Collider>(self.entity)
            .expect("picking ray has a collider");
        collider.direction = (target - cam_position).normalize();
        collider.max_distance = 1_000_000.0;
    }

    /// The entity owning the box collider the ray hit this tick, if any.
    pub fn picked(&self, store: &Store) -> Option<EntityId> {
        let collider = store.component_in_array::<Collider>(self.collider_slot);
        let other = collider.other?;
        Some(store.component_in_array::<Collider>(other).owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::collision_step;

    fn spawn_floor(store: &mut Store) {
        let floor = store.create_entity("floor");
        store
            .component_mut::<Transform>(floor)
            .unwrap()
            .translate(Vec3::new(0.0, -0.5, 0.0));
        let collider = store.create_component::<Collider>(floor);
        collider.local_halfwidth = Vec3::new(10.0, 0.5, 10.0);
    }

    fn tick(controller: &mut CharacterController, store: &mut Store, input: &InputState) {
        let dt = 1.0 / 60.0;
        controller.update(store, input, dt);
        collision_step(store, dt);
    }

    #[test]
    fn fps_player_settles_at_standoff_height() {
        let mut store = Store::new();
        spawn_floor(&mut store);
        let mut controller =
            CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 5.0, 0.0), 1.0);

        let input = InputState::default();
        for _ in 0..240 {
            tick(&mut controller, &mut store, &input);
        }

        let player = store.entity("player").unwrap();
        let y = store.component::<Transform>(player).unwrap().position().y;
        // Floor top is y = 0; stand-off height is 2.
        assert!((y - 2.0).abs() < 1e-3, "player at y = {y}");
    }

    #[test]
    fn jump_leaves_the_ground_then_lands() {
        let mut store = Store::new();
        spawn_floor(&mut store);
        let mut controller =
            CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 2.0, 0.0), 1.0);

        let idle = InputState::default();
        for _ in 0..60 {
            tick(&mut controller, &mut store, &idle);
        }

        let jump = InputState {
            jump: true,
            ..InputState::default()
        };
        tick(&mut controller, &mut store, &jump);
        for _ in 0..10 {
            tick(&mut controller, &mut store, &idle);
        }
        let player = store.entity("player").unwrap();
        let airborne_y = store.component::<Transform>(player).unwrap().position().y;
        assert!(airborne_y > 2.05, "expected airborne, y = {airborne_y}");

        for _ in 0..300 {
            tick(&mut controller, &mut store, &idle);
        }
        let landed_y = store.component::<Transform>(player).unwrap().position().y;
        assert!((landed_y - 2.0).abs() < 1e-3, "player at y = {landed_y}");
    }

    #[test]
    fn wall_blocks_forward_movement() {
        let mut store = Store::new();
        spawn_floor(&mut store);

        // Wall dead ahead of the player, inside the forward ray's reach.
        let wall = store.create_entity("wall");
        store
            .component_mut::<Transform>(wall)
            .unwrap()
            .translate(Vec3::new(0.0, 2.0, -1.2));
        store.create_component::<Collider>(wall);

        let mut controller =
            CharacterController::spawn_fps(&mut store, "player", Vec3::new(0.0, 2.0, 0.0), 1.0);

        let idle = InputState::default();
        for _ in 0..10 {
            tick(&mut controller, &mut store, &idle);
        }

        let push = InputState {
            forward: true,
            ..InputState::default()
        };
        for _ in 0..30 {
            tick(&mut controller, &mut store, &push);
        }

        let player = store.entity("player").unwrap();
        let z = store.component::<Transform>(player).unwrap().position().z;
        assert!(z.abs() < 1e-4, "blocked player moved to z = {z}");

        // Strafing sideways still works.
        let strafe = InputState {
            right: true,
            ..InputState::default()
        };
        for _ in 0..30 {
            tick(&mut controller, &mut store, &strafe);
        }
        let x = store.component::<Transform>(player).unwrap().position().x;
        assert!(x > 0.5, "strafe should be free, x = {x}");
    }

    #[test]
    fn free_mode_flies_along_forward() {
        let mut store = Store::new();
        let mut controller = CharacterController::spawn_free(
            &mut store,
            "observer",
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::NEG_Z,
            1.0,
        );

        let fly = InputState {
            forward: true,
            ..InputState::default()
        };
        for _ in 0..60 {
            controller.update(&mut store, &fly, 1.0 / 60.0);
        }

        let observer = store.entity("observer").unwrap();
        let p = store.component::<Transform>(observer).unwrap().position();
        assert!(p.z < -7.0, "observer at {p}");
        assert!((p.y - 10.0).abs() < 1e-4, "free flight holds altitude");
    }

    #[test]
    fn picking_resolves_the_box_under_the_cursor() {
        let mut store = Store::new();
        let crate_entity = store.create_entity("crate");
        store
            .component_mut::<Transform>(crate_entity)
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, -5.0));
        store.create_component::<Collider>(crate_entity);

        let _controller = CharacterController::spawn_free(
            &mut store,
            "observer",
            Vec3::ZERO,
            Vec3::NEG_Z,
            1.0,
        );

        let picker = PickingRay::spawn(&mut store);
        let viewport = Vec2::new(800.0, 800.0);
        picker.aim(&mut store, viewport * 0.5, viewport);
        collision_step(&mut store, 1.0 / 60.0);

        assert_eq!(picker.picked(&store), Some(crate_entity));

        // Parked again → next aim elsewhere, nothing under the cursor.
        picker.aim(&mut store, Vec2::new(10.0, 10.0), viewport);
        collision_step(&mut store, 1.0 / 60.0);
        assert_eq!(picker.picked(&store), None);
    }
}
