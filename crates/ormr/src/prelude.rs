//! Convenience re-exports — `use ormr::prelude::*` for the common items.

pub use crate::behavior::{MovingPlatform, Rotator, Tag, behavior_step, entities_with_tag};
pub use crate::camera::Camera;
pub use crate::collision::{Collider, ColliderShape, DISTANCE_SENTINEL, collision_step};
pub use crate::control::{CharacterController, ControlMode, InputState, PickingRay};
pub use crate::ecs::{ComponentKind, Entity, EntityId, Schedule, Store, Stored, System};
pub use crate::gui::{GuiAnchor, GuiElement, GuiText, ScreenBounds};
pub use crate::math::{DEG2RAD, Mat3, Mat4, Quat, RAD2DEG, Vec2, Vec3, Vec4};
pub use crate::render_data::{Light, Mesh};
pub use crate::scene::{
    SceneError, SceneFile, load_scene, load_scene_file, save_scene, save_scene_file,
    save_scene_string,
};
pub use crate::time::FrameClock;
pub use crate::transform::Transform;
