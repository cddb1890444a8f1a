//! Camera component: view/projection state for the renderer and the
//! controllers.
//!
//! `position`, `forward`, and `up` are kept as plain vectors for fast access
//! by control code; [`update`](Camera::update) folds them into the view and
//! view-projection matrices once per frame. Projection setup wraps the
//! perspective/orthographic constructors so callers never touch glam
//! directly.

use crate::ecs::EntityId;
use crate::math::{DEG2RAD, Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone)]
pub struct Camera {
    pub owner: EntityId,
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let position = Vec3::new(0.0, 0.0, 1.0);
        let forward = Vec3::NEG_Z;
        let up = Vec3::Y;
        let view = Mat4::look_at_rh(position, position + forward, up);
        let projection = Mat4::perspective_rh_gl(60.0 * DEG2RAD, 1.0, 0.01, 100.0);
        Self {
            owner: EntityId::DETACHED,
            position,
            forward,
            up,
            view,
            projection,
            view_projection: projection * view,
        }
    }
}

impl Camera {
    /// Rebuild the view matrix from `position`, `forward`, and `up`.
    /// Normalizes `forward` in place.
    pub fn update_view_matrix(&mut self) {
        self.forward = self.forward.normalize();
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
    }

    pub fn set_perspective(&mut self, fov_rad: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh_gl(fov_rad, aspect, near, far);
    }

    pub fn set_orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection = Mat4::orthographic_rh_gl(left, right, bottom, top, near, far);
    }

    /// Per-frame refresh: view matrix, then the combined view-projection.
    pub fn update(&mut self) {
        self.update_view_matrix();
        self.view_projection = self.projection * self.view;
    }

    /// Map a window-space cursor position (pixels, origin top-left) to the
    /// world-space point on the near plane under it. Feed the result to a
    /// picking ray: `direction = (point - camera.position).normalize()`.
    pub fn unproject_cursor(&self, cursor: Vec2, viewport: Vec2) -> Vec3 {
        let ndc_x = (cursor.x / viewport.x) * 2.0 - 1.0;
        let ndc_y = ((viewport.y - cursor.y) / viewport.y) * 2.0 - 1.0;
        let near = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world = self.view_projection.inverse() * near;
        world.truncate() / world.w
    }
}
