//! Renderer-facing data components.
//!
//! The engine core stores these but never draws them — a renderer is an
//! external consumer that reads the arrays each frame. [`Mesh`] holds
//! resource indices owned by the external asset pipeline; [`Light`] is a
//! bare color until the lighting model grows.

use crate::ecs::EntityId;
use crate::math::Vec3;

/// References into the external geometry/material resource arrays.
///
/// Renderers typically call
/// [`sort_components_by_key`](crate::ecs::Store::sort_components_by_key)
/// with the material index so draw order minimizes state changes.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub owner: EntityId,
    /// Index of the geometry resource.
    pub geometry: usize,
    /// Index of the material resource.
    pub material: usize,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            geometry: 0,
            material: 0,
        }
    }
}

/// A point light. Position comes from the owner's transform.
#[derive(Debug, Clone)]
pub struct Light {
    pub owner: EntityId,
    pub color: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            color: Vec3::ONE,
        }
    }
}
