//! # Collision — Analytic Ray-vs-Box Sweep
//!
//! Colliders come in two shapes: an oriented box (local center offset +
//! half-extents, oriented by the owner's world transform) and a ray (local
//! direction + maximum distance, i.e. a segment). Once per tick,
//! [`collision_step`] resets every collider's transient state and then runs
//! an all-pairs sweep: every ray against every box, each ray keeping only
//! its **nearest** hit.
//!
//! ## The Sweep
//!
//! ```text
//! reset:  colliding = false, other = none, distance = SENTINEL
//! sweep:  for each ray i:
//!           for each box j != i:
//!             test segment-vs-box, bounded by i's current best distance
//!             on hit: write state symmetrically into i and j
//! ```
//!
//! Bounding each test by the ray's running `collision_distance` means later
//! boxes only register if they are closer — the ray ends the tick holding
//! its nearest hit regardless of array order. O(rays × boxes) per tick, no
//! broad phase; fine at scene scale, not for open worlds.
//!
//! ## The Box Test
//!
//! A box is decomposed into six counter-clockwise quads and the segment is
//! tested against each in a fixed order, stopping at the first hit. The
//! quad test (RTCD §5.3.6 style) rejects back-facing planes (`den <= 0`),
//! so from outside a convex box at most one front-facing quad can accept —
//! quad order only breaks exact-tie degeneracies. A consequence worth
//! knowing: a segment starting *inside* the box sees only back faces and
//! reports no hit.
//!
//! Numeric policy: `f32` throughout, strict comparisons, no epsilon. Edge-on
//! and coplanar grazes miss by design; changing that silently changes
//! gameplay, so it stays.

use crate::ecs::{EntityId, Store, Stored};
use crate::math::{Vec3, rotate_direction};
use crate::transform::Transform;

/// Reset value for `collision_distance` — larger than any legitimate scene
/// distance, so the first real hit always wins.
pub const DISTANCE_SENTINEL: f32 = 10_000_000.0;

/// Which geometry a [`Collider`] contributes to the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderShape {
    /// Oriented box: `local_center` + `local_halfwidth`, in the owner's
    /// space.
    Box,
    /// Segment: `local_center` origin offset, `direction`, `max_distance`.
    Ray,
}

/// Collision participant. Shape fields are configuration; the collision
/// state fields are transient — rewritten every tick by [`collision_step`]
/// and meaningless before that tick's step has run.
#[derive(Debug, Clone)]
pub struct Collider {
    pub owner: EntityId,
    pub shape: ColliderShape,
    /// Offset from the owner's transform, in local space. Used by both
    /// shapes (box center, ray origin).
    pub local_center: Vec3,
    /// Box half-extents.
    pub local_halfwidth: Vec3,
    /// Ray direction in local space. Must be non-zero; it is normalized
    /// before use.
    pub direction: Vec3,
    /// Ray length — the segment bound.
    pub max_distance: f32,

    // Per-tick collision state.
    pub colliding: bool,
    /// Slot of the collider hit this tick, in the Collider array.
    pub other: Option<usize>,
    /// World-space hit point.
    pub collision_point: Vec3,
    /// Distance from the ray's world origin to the hit point.
    pub collision_distance: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            shape: ColliderShape::Box,
            local_center: Vec3::ZERO,
            local_halfwidth: Vec3::splat(0.5),
            direction: Vec3::NEG_Z,
            max_distance: DISTANCE_SENTINEL,
            colliding: false,
            other: None,
            collision_point: Vec3::ZERO,
            collision_distance: DISTANCE_SENTINEL,
        }
    }
}

/// One collision tick: reset every collider, then sweep rays against boxes.
///
/// Runs to completion synchronously; consumers (controllers, picking,
/// debug draw) read collider state only after this returns. Fits a
/// [`Schedule`](crate::ecs::Schedule) directly.
pub fn collision_step(store: &mut Store, _dt: f32) {
    for collider in store.all_components_mut::<Collider>().iter_mut() {
        collider.colliding = false;
        collider.other = None;
        collider.collision_distance = DISTANCE_SENTINEL;
    }

    let count = store.all_components::<Collider>().len();
    for i in 0..count {
        if store.all_components::<Collider>()[i].shape != ColliderShape::Ray {
            continue;
        }
        for j in 0..count {
            if j == i {
                continue;
            }
            let hit = {
                let colliders = store.all_components::<Collider>();
                if colliders[j].shape != ColliderShape::Box {
                    None
                } else {
                    // Only look as far as the nearest hit found so far.
                    intersect_segment_box(
                        store,
                        &colliders[i],
                        &colliders[j],
                        colliders[i].collision_distance,
                    )
                }
            };
            if let Some((point, distance)) = hit {
                let colliders = store.all_components_mut::<Collider>();
                colliders[i].colliding = true;
                colliders[j].colliding = true;
                colliders[i].other = Some(j);
                colliders[j].other = Some(i);
                colliders[i].collision_point = point;
                colliders[j].collision_point = point;
                colliders[i].collision_distance = distance;
                colliders[j].collision_distance = distance;
            }
        }
    }
}

/// Test a ray collider (as a segment) against a box collider, both resolved
/// to world space through their owners' transform chains.
///
/// `max_distance` further bounds the segment below the ray's own
/// `max_distance`. Returns the world-space hit point and its distance from
/// the ray origin.
///
/// # Panics
///
/// Panics if either collider's owner is missing its transform (broken store
/// invariant — every entity gets one at creation).
pub fn intersect_segment_box(
    store: &Store,
    ray: &Collider,
    bx: &Collider,
    max_distance: f32,
) -> Option<(Vec3, f32)> {
    let transforms = Transform::array(store);
    let ray_transform = store
        .component::<Transform>(ray.owner)
        .unwrap_or_else(|| panic!("ray collider owner {:?} has no transform", ray.owner));
    let box_transform = store
        .component::<Transform>(bx.owner)
        .unwrap_or_else(|| panic!("box collider owner {:?} has no transform", bx.owner));

    // Box corners: local half-extents around the local center offset, then
    // through the owner's world matrix.
    let box_world = box_transform.world_matrix(transforms);
    let (x, y, z) = (bx.local_halfwidth.x, bx.local_halfwidth.y, bx.local_halfwidth.z);
    let off = bx.local_center;
    let a = box_world.transform_point3(Vec3::new(-x, y, z) + off);
    let b = box_world.transform_point3(Vec3::new(-x, -y, z) + off);
    let c = box_world.transform_point3(Vec3::new(x, -y, z) + off);
    let d = box_world.transform_point3(Vec3::new(x, y, z) + off);
    let e = box_world.transform_point3(Vec3::new(-x, y, -z) + off);
    let f = box_world.transform_point3(Vec3::new(-x, -y, -z) + off);
    let g = box_world.transform_point3(Vec3::new(x, -y, -z) + off);
    let h = box_world.transform_point3(Vec3::new(x, y, -z) + off);

    // Ray origin: world matrix with the local center offset applied in ray
    // space.
    let ray_world = ray_transform.world_matrix(transforms)
        * crate::math::Mat4::from_translation(ray.local_center);
    let p = ray_world.w_axis.truncate();

    // Direction through the normal matrix so rotation survives non-uniform
    // scale. The local direction is normalized; the transformed one keeps
    // whatever length the matrix gives it, as the original did.
    let direction = rotate_direction(ray_world, ray.direction.normalize());

    let test_distance = ray.max_distance.min(max_distance);
    let q = p + direction * test_distance;

    // Six CCW quads in fixed order; first front-facing hit wins.
    let quads = [
        [a, b, c, d],
        [d, c, g, h],
        [h, g, f, e],
        [e, f, b, a],
        [a, d, h, e],
        [b, f, g, c],
    ];
    for [qa, qb, qc, qd] in quads {
        if let Some(point) = intersect_segment_quad(p, q, qa, qb, qc, qd) {
            return Some((point, (p - point).length()));
        }
    }
    None
}

/// Segment `pq` against the counter-clockwise quad `abcd`, front face only.
///
/// Splits the quad into triangles `abc` and `acd` and runs the
/// double-area/barycentric test on each (no square roots until the caller
/// wants a distance). Returns the hit point reconstructed from the
/// barycentric coordinates.
pub fn intersect_segment_quad(p: Vec3, q: Vec3, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Option<Vec3> {
    let ab = b - a;
    let ac = c - a;
    let qp = p - q;

    let n = ab.cross(ac);

    // den <= 0: segment parallel to the plane or approaching from behind.
    let den = qp.dot(n);
    if den <= 0.0 {
        return None;
    }

    // Plane intersection parameter, scaled by den. Outside [0, den] the
    // crossing lies off the segment.
    let ap = p - a;
    let t = ap.dot(n);
    if t < 0.0 || t > den {
        return None;
    }

    let e = qp.cross(ap);

    // Triangle abc.
    let v = ac.dot(e);
    if v >= 0.0 && v <= den {
        let w = -ab.dot(e);
        if w >= 0.0 && v + w <= den {
            let ood = 1.0 / den;
            let (v, w) = (v * ood, w * ood);
            let u = 1.0 - v - w;
            return Some(a * u + b * v + c * w);
        }
    }

    // Triangle acd.
    let ad = d - a;
    let v = ad.dot(e);
    if v < 0.0 || v > den {
        return None;
    }
    let w = -ac.dot(e);
    if w < 0.0 || v + w > den {
        return None;
    }
    let ood = 1.0 / den;
    let (v, w) = (v * ood, w * ood);
    let u = 1.0 - v - w;
    Some(a * u + c * v + d * w)
}

/// Boolean-only segment-vs-triangle variant of the same test.
pub fn intersect_segment_triangle(p: Vec3, q: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    let ab = b - a;
    let ac = c - a;
    let qp = p - q;

    let n = ab.cross(ac);

    let den = qp.dot(n);
    if den <= 0.0 {
        return false;
    }

    let ap = p - a;
    let t = ap.dot(n);
    if t < 0.0 || t > den {
        return false;
    }

    let e = qp.cross(ap);
    let v = ac.dot(e);
    if v < 0.0 || v > den {
        return false;
    }
    let w = -ab.dot(e);
    if w < 0.0 || v + w > den {
        return false;
    }

    true
}

/// Infinite-line variant against quad `abcd` (RTCD §5.3.5). Not used by the
/// sweep — kept for tooling and as the reference the segment test is
/// checked against.
pub fn intersect_line_quad(p: Vec3, q: Vec3, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Option<Vec3> {
    let pq = q - p;
    let pa = a - p;
    let pb = b - p;
    let pc = c - p;

    let m = pc.cross(pq);
    let v = pa.dot(m);
    if v >= 0.0 {
        // Triangle abc.
        let u = -pb.dot(m);
        if u < 0.0 {
            return None;
        }
        let w = pq.cross(pb).dot(pa);
        if w < 0.0 {
            return None;
        }
        let denom = 1.0 / (u + v + w);
        Some(a * (u * denom) + b * (v * denom) + c * (w * denom))
    } else {
        // Triangle dac.
        let pd = d - p;
        let u = pd.dot(m);
        if u < 0.0 {
            return None;
        }
        let w = pq.cross(pa).dot(pd);
        if w < 0.0 {
            return None;
        }
        let v = -v;
        let denom = 1.0 / (u + v + w);
        Some(a * (u * denom) + d * (v * denom) + c * (w * denom))
    }
}
