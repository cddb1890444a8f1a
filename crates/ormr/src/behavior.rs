//! # Behavior Components — Small Scripted Updates
//!
//! Three gameplay components with per-tick behavior of their own:
//! [`Rotator`] spins its owner, [`MovingPlatform`] shuttles its owner back
//! and forth, and [`Tag`] labels entities for group queries. They run in
//! [`behavior_step`], after collision, so anything they move is seen by the
//! *next* tick's sweep — the original engine had the same one-frame
//! latency.
//!
//! Mutating another component (the owner's transform) while iterating a
//! behavior array would alias, so each loop copies the small parameter set
//! out first and then writes through the store.

use crate::ecs::{EntityId, Store};
use crate::math::Vec3;
use crate::transform::Transform;

/// Spins the owner's transform about a local axis.
#[derive(Debug, Clone)]
pub struct Rotator {
    pub owner: EntityId,
    /// Radians per second.
    pub speed: f32,
    pub axis: Vec3,
}

impl Default for Rotator {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            speed: 1.0,
            axis: Vec3::Y,
        }
    }
}

/// String labels for grouping entities ("enemy", "checkpoint", …).
#[derive(Debug, Clone)]
pub struct Tag {
    pub owner: EntityId,
    pub tags: Vec<String>,
}

impl Default for Tag {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            tags: Vec::new(),
        }
    }
}

impl Tag {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Owners of every [`Tag`] component carrying `tag`.
pub fn entities_with_tag(store: &Store, tag: &str) -> Vec<EntityId> {
    store
        .all_components::<Tag>()
        .iter()
        .filter(|t| t.has_tag(tag))
        .map(|t| t.owner)
        .collect()
}

/// Shuttles the owner along `dir`, reversing every `period` seconds.
#[derive(Debug, Clone)]
pub struct MovingPlatform {
    pub owner: EntityId,
    pub speed: f32,
    pub dir: Vec3,
    /// Seconds between direction reversals.
    pub period: f32,
    pub(crate) counter: f32,
}

impl Default for MovingPlatform {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            speed: 1.0,
            dir: Vec3::Y,
            period: 1.0,
            counter: 0.0,
        }
    }
}

/// Per-tick behavior pass: rotators, then moving platforms. Fits a
/// [`Schedule`](crate::ecs::Schedule) directly.
pub fn behavior_step(store: &mut Store, dt: f32) {
    for i in 0..store.all_components::<Rotator>().len() {
        let (owner, speed, axis) = {
            let rotator = &store.all_components::<Rotator>()[i];
            (rotator.owner, rotator.speed, rotator.axis)
        };
        if let Some(transform) = store.component_mut::<Transform>(owner) {
            transform.rotate_local(speed * dt, axis);
        }
    }

    for i in 0..store.all_components::<MovingPlatform>().len() {
        let (owner, dir, speed) = {
            let platform = &mut store.all_components_mut::<MovingPlatform>()[i];
            platform.counter += dt;
            if platform.counter > platform.period {
                platform.counter = 0.0;
                platform.speed = -platform.speed;
            }
            (platform.owner, platform.dir, platform.speed)
        };
        if let Some(transform) = store.component_mut::<Transform>(owner) {
            transform.translate(dir.normalize() * speed * dt);
        }
    }
}
