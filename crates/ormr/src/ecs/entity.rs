//! # Entity — Named Identities With Per-Kind Component Slots
//!
//! An [`Entity`] doesn't "contain" components. It holds one slot per
//! registered [`ComponentKind`](super::component::ComponentKind): either the
//! index of its component in that kind's contiguous array, or nothing. The
//! [`Store`](super::store::Store) owns the arrays; entities are just the
//! index table that ties a name to rows across them.
//!
//! ## Design: Plain Stable Indices
//!
//! [`EntityId`] is a bare index into the registry. There is no generation
//! counter because there is no deletion path: ids are stable for the life of
//! the store, and scene transitions tear down the whole store rather than
//! recycling slots. Generational indices (hecs, bevy_ecs) solve a stale-
//! handle problem this design defines away.

use std::fmt;

use super::component::ComponentKind;

/// A stable handle to an entity in the [`Store`](super::store::Store).
///
/// Ids are creation-ordered indices and remain valid for the store's entire
/// lifetime. An `EntityId` is only meaningful for the store that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Sentinel owner for components built by the safe accessor but never
    /// attached to an entity.
    pub const DETACHED: EntityId = EntityId(usize::MAX);

    /// The raw registry index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::DETACHED {
            write!(f, "EntityId(detached)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record in the entity registry: a display name, an active flag, and
/// the per-kind component slot table.
pub struct Entity {
    /// Display name, used for scene-load-time lookups. Uniqueness is not
    /// enforced; lookups resolve to the first match.
    pub name: String,
    /// Inactive entities are skipped by renderers and editors; the core
    /// systems don't consult this flag.
    pub active: bool,
    /// One slot per component kind: `Some(index)` into that kind's array,
    /// or `None` when the entity has no component of that kind.
    pub(crate) slots: [Option<usize>; ComponentKind::COUNT],
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            slots: [None; ComponentKind::COUNT],
        }
    }

    /// The entity's slot for `kind`, if it has a component of that kind.
    pub fn slot(&self, kind: ComponentKind) -> Option<usize> {
        self.slots[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entity_has_empty_slots() {
        let e = Entity::new("crate_01");
        assert!(e.active);
        for kind in ComponentKind::ALL {
            assert_eq!(e.slot(kind), None);
        }
    }

    #[test]
    fn detached_sentinel_is_distinct() {
        assert_ne!(EntityId::DETACHED, EntityId(0));
        assert_eq!(format!("{:?}", EntityId::DETACHED), "EntityId(detached)");
    }
}
