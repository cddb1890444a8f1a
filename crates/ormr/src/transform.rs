//! # Transform — Local Matrices Resolved Through a Parent Chain
//!
//! A [`Transform`] is a local-to-parent 4×4 matrix plus an optional parent
//! slot (an index into the Transform array itself, not an entity id). The
//! world matrix is **not cached**: [`world_matrix`](Transform::world_matrix)
//! recomposes it on demand by walking ancestors. At this engine's scene
//! scale that costs less than keeping a dirty-flag protocol honest.
//!
//! ```text
//! world(t) = parent == none ? local(t)
//!                           : world(parent) * local(t)
//! ```
//!
//! The parent graph must be acyclic. A cycle means unbounded recursion;
//! construction is where that's prevented (the scene loader rejects cycles,
//! programmatic `parent` writes are a caller contract) — queries do not
//! re-check it.

use crate::ecs::EntityId;
use crate::math::{Mat4, Vec3};

/// Local-to-parent matrix plus parent link. Attached to every entity at
/// creation.
#[derive(Debug, Clone)]
pub struct Transform {
    /// Owning entity.
    pub owner: EntityId,
    /// Local-to-parent matrix.
    pub local: Mat4,
    /// Slot of the parent transform in the Transform array, or `None` for
    /// a root.
    pub parent: Option<usize>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            local: Mat4::IDENTITY,
            parent: None,
        }
    }
}

impl Transform {
    /// Compose this transform with every ancestor, producing local→world.
    ///
    /// `transforms` must be the store's Transform array — the same one this
    /// transform lives in.
    pub fn world_matrix(&self, transforms: &[Transform]) -> Mat4 {
        match self.parent {
            Some(parent) => transforms[parent].world_matrix(transforms) * self.local,
            None => self.local,
        }
    }

    /// Translation column of the local matrix.
    pub fn position(&self) -> Vec3 {
        self.local.w_axis.truncate()
    }

    /// Overwrite the translation column, leaving rotation/scale untouched.
    pub fn set_position(&mut self, position: Vec3) {
        self.local.w_axis = position.extend(1.0);
    }

    /// Translate in parent space (adds straight onto the translation
    /// column).
    pub fn translate(&mut self, offset: Vec3) {
        self.local.w_axis += offset.extend(0.0);
    }

    /// Translate in this transform's own local space (post-multiply).
    pub fn translate_local(&mut self, offset: Vec3) {
        self.local *= Mat4::from_translation(offset);
    }

    /// Rotate about `axis` in local space (post-multiply).
    pub fn rotate_local(&mut self, angle_rad: f32, axis: Vec3) {
        self.local *= Mat4::from_axis_angle(axis.normalize(), angle_rad);
    }

    /// Scale in local space (post-multiply).
    pub fn scale_local(&mut self, scale: Vec3) {
        self.local *= Mat4::from_scale(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Store, Stored};

    fn transform_with(local: Mat4, parent: Option<usize>) -> Transform {
        Transform {
            owner: EntityId::DETACHED,
            local,
            parent,
        }
    }

    #[test]
    fn root_world_matrix_is_local() {
        let transforms = vec![transform_with(
            Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)),
            None,
        )];
        let world = transforms[0].world_matrix(&transforms);
        assert_eq!(world.w_axis.truncate(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn child_composes_with_parent() {
        // Parent at (10,0,0), child local (1,0,0) → world (11,0,0).
        let transforms = vec![
            transform_with(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)), None),
            transform_with(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)), Some(0)),
        ];
        let world = transforms[1].world_matrix(&transforms);
        assert_eq!(world.w_axis.truncate(), Vec3::new(11.0, 0.0, 0.0));
    }

    #[test]
    fn grandchild_walks_whole_chain() {
        let transforms = vec![
            transform_with(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)), None),
            transform_with(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)), Some(0)),
            transform_with(Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)), Some(1)),
        ];
        let world = transforms[2].world_matrix(&transforms);
        assert_eq!(world.w_axis.truncate(), Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn parent_rotation_affects_child_position() {
        // Parent rotated 90° about Y; child 1 unit down local -Z ends up
        // at parent's -X.
        let transforms = vec![
            transform_with(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2), None),
            transform_with(Mat4::from_translation(Vec3::NEG_Z), Some(0)),
        ];
        let world = transforms[1].world_matrix(&transforms);
        let p = world.w_axis.truncate();
        assert!((p - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn translate_is_parent_space() {
        let mut tf = transform_with(Mat4::from_rotation_y(1.0), None);
        tf.translate(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(tf.position(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn translate_local_follows_orientation() {
        // Facing -X (90° about Y): a local -Z step moves the transform
        // along world -X.
        let mut tf = transform_with(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2), None);
        tf.translate_local(Vec3::NEG_Z);
        assert!((tf.position() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn store_resolves_parented_world_position() {
        let mut store = Store::new();
        let parent = store.create_entity("parent");
        let child = store.create_entity("child");

        store
            .component_mut::<Transform>(parent)
            .unwrap()
            .translate(Vec3::new(10.0, 0.0, 0.0));

        let parent_slot = store.component_slot::<Transform>(parent).unwrap();
        {
            let tf = store.component_mut::<Transform>(child).unwrap();
            tf.translate(Vec3::new(1.0, 0.0, 0.0));
            tf.parent = Some(parent_slot);
        }

        let transforms = Transform::array(&store);
        let child_tf = store.component::<Transform>(child).unwrap();
        let world = child_tf.world_matrix(transforms);
        assert_eq!(world.w_axis.truncate(), Vec3::new(11.0, 0.0, 0.0));
    }
}
