//! # Store — Per-Kind Arrays Plus the Entity Registry
//!
//! The [`Store`] is the single owner of all component data. Each
//! [`ComponentKind`] gets its own contiguous `Vec`; entities hold only slot
//! indices into those arrays.
//!
//! ## Memory Layout
//!
//! ```text
//! entities:    [ player, floor, pillar ]      ← registry, creation order
//!                 │        │
//!                 │        └ slots: { transform: 1, collider: 0, .. }
//!                 └ slots: { transform: 0, camera: 0, .. }
//!
//! transforms:  [ t0, t1, t2 ]                  ← one dense array per kind
//! colliders:   [ c0 ]
//! cameras:     [ cam0 ]
//! ```
//!
//! A system that updates every collider scans `colliders` front to back —
//! no indirection, no hashing. The price is that cross-kind access (a
//! collider reaching its owner's transform) goes through the entity's slot
//! table.
//!
//! ## Index Stability
//!
//! Slot indices are invalidated only by operations that reorder an array —
//! plain appends never move already-issued slots, because nothing ever
//! caches a raw reference across a structural mutation (all access
//! re-resolves through the store). The one reordering operation,
//! [`sort_components_by_key`](Store::sort_components_by_key), remaps every
//! entity slot table atomically before returning.
//!
//! ## Lifecycle
//!
//! There is no deletion path. `EntityId`s stay valid for the store's whole
//! life; a scene transition drops the store and builds a fresh one.

use log::warn;

use super::component::{ComponentKind, Stored};
use super::entity::{Entity, EntityId};
use crate::behavior::{MovingPlatform, Rotator, Tag};
use crate::camera::Camera;
use crate::collision::Collider;
use crate::gui::{GuiElement, GuiText};
use crate::render_data::{Light, Mesh};
use crate::transform::Transform;

/// Owner of all entities and component arrays.
///
/// Constructed once at simulation start and passed `&mut` to each system in
/// turn — there is no ambient global instance.
pub struct Store {
    entities: Vec<Entity>,
    transforms: Vec<Transform>,
    meshes: Vec<Mesh>,
    cameras: Vec<Camera>,
    lights: Vec<Light>,
    colliders: Vec<Collider>,
    gui_elements: Vec<GuiElement>,
    gui_texts: Vec<GuiText>,
    rotators: Vec<Rotator>,
    tags: Vec<Tag>,
    moving_platforms: Vec<MovingPlatform>,
    /// Slot of the camera the renderer and controllers should use, in the
    /// `Camera` array.
    pub main_camera: Option<usize>,
}

/// Ties a component type to its kind tag and backing array.
macro_rules! impl_stored {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Stored for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn array(store: &Store) -> &[Self] {
                &store.$field
            }

            fn array_mut(store: &mut Store) -> &mut Vec<Self> {
                &mut store.$field
            }

            fn owner(&self) -> EntityId {
                self.owner
            }

            fn set_owner(&mut self, owner: EntityId) {
                self.owner = owner;
            }
        }
    };
}

impl_stored!(Transform, Transform, transforms);
impl_stored!(Mesh, Mesh, meshes);
impl_stored!(Camera, Camera, cameras);
impl_stored!(Light, Light, lights);
impl_stored!(Collider, Collider, colliders);
impl_stored!(GuiElement, GuiElement, gui_elements);
impl_stored!(GuiText, GuiText, gui_texts);
impl_stored!(Rotator, Rotator, rotators);
impl_stored!(Tag, Tag, tags);
impl_stored!(MovingPlatform, MovingPlatform, moving_platforms);

impl Store {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            transforms: Vec::new(),
            meshes: Vec::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
            colliders: Vec::new(),
            gui_elements: Vec::new(),
            gui_texts: Vec::new(),
            rotators: Vec::new(),
            tags: Vec::new(),
            moving_platforms: Vec::new(),
            main_camera: None,
        }
    }

    // ── Entity Registry ──────────────────────────────────────────────

    /// Append a new entity and attach a default [`Transform`] (every entity
    /// has one — systems rely on it). Returns the entity's stable id.
    ///
    /// Duplicate names are permitted; name lookups resolve to the first
    /// match, so a duplicate is logged as a warning.
    pub fn create_entity(&mut self, name: &str) -> EntityId {
        if self.entity(name).is_some() {
            warn!("duplicate entity name \"{name}\" — lookups resolve to the first");
        }
        self.entities.push(Entity::new(name));
        let id = EntityId(self.entities.len() - 1);
        self.create_component::<Transform>(id);
        id
    }

    /// Look up an entity by name. Linear scan, first match — fine at
    /// scene-load scale, not something to call per frame per entity.
    pub fn entity(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|e| e.name == name)
            .map(EntityId)
    }

    /// All entity records, in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The registry record for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn entity_record(&self, id: EntityId) -> &Entity {
        self.entities
            .get(id.0)
            .unwrap_or_else(|| panic!("no entity with id {id:?} in this store"))
    }

    /// Mutable registry record for `id` (rename, toggle `active`).
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn entity_record_mut(&mut self, id: EntityId) -> &mut Entity {
        self.entities
            .get_mut(id.0)
            .unwrap_or_else(|| panic!("no entity with id {id:?} in this store"))
    }

    // ── Component Attach / Lookup ────────────────────────────────────

    /// Append a default-constructed `K`, record its slot on the entity, and
    /// set its `owner` back-reference. Returns the new component.
    ///
    /// If the entity already had a `K`, the old instance stays in the array
    /// (orphaned) and the slot now points at the new one — same behavior as
    /// attaching twice in the original design.
    ///
    /// # Panics
    ///
    /// Panics if `entity` was not issued by this store.
    pub fn create_component<K: Stored>(&mut self, entity: EntityId) -> &mut K {
        assert!(
            entity.0 < self.entities.len(),
            "create_component: no entity with id {entity:?} in this store"
        );
        let slot = {
            let array = K::array_mut(self);
            array.push(K::default());
            array.len() - 1
        };
        self.entities[entity.0].slots[K::KIND as usize] = Some(slot);
        let component = &mut K::array_mut(self)[slot];
        component.set_owner(entity);
        component
    }

    /// The entity's component of kind `K`, if it has one.
    pub fn component<K: Stored>(&self, entity: EntityId) -> Option<&K> {
        let slot = self.entities.get(entity.0)?.slots[K::KIND as usize]?;
        Some(&K::array(self)[slot])
    }

    /// Mutable access to the entity's component of kind `K`.
    pub fn component_mut<K: Stored>(&mut self, entity: EntityId) -> Option<&mut K> {
        let slot = self.entities.get(entity.0)?.slots[K::KIND as usize]?;
        Some(&mut K::array_mut(self)[slot])
    }

    /// Name-keyed variant of [`component`](Store::component).
    pub fn component_by_name<K: Stored>(&self, name: &str) -> Option<&K> {
        self.component::<K>(self.entity(name)?)
    }

    /// The "safe" accessor: a clone of the entity's component when present,
    /// a fresh detached default otherwise. Call sites that treat the
    /// component as optional read data need no branching; each miss returns
    /// an independent instance with `owner == EntityId::DETACHED`.
    pub fn component_or_default<K: Stored + Clone>(&self, entity: EntityId) -> K {
        self.component::<K>(entity).cloned().unwrap_or_default()
    }

    /// Direct slot access, for callers that already hold a slot index
    /// (the main-camera slot, the controller's cached ray slots).
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds for `K`'s array.
    pub fn component_in_array<K: Stored>(&self, slot: usize) -> &K {
        &K::array(self)[slot]
    }

    /// Mutable direct slot access.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds for `K`'s array.
    pub fn component_in_array_mut<K: Stored>(&mut self, slot: usize) -> &mut K {
        &mut K::array_mut(self)[slot]
    }

    /// The whole backing array for `K`, for systems that scan a kind once
    /// per tick.
    pub fn all_components<K: Stored>(&self) -> &[K] {
        K::array(self)
    }

    /// Mutable backing array for `K`.
    pub fn all_components_mut<K: Stored>(&mut self) -> &mut Vec<K> {
        K::array_mut(self)
    }

    /// The entity's slot for kind `K`, or `None` when absent.
    pub fn component_slot<K: Stored>(&self, entity: EntityId) -> Option<usize> {
        self.entities.get(entity.0)?.slots[K::KIND as usize]
    }

    // ── Reordering ───────────────────────────────────────────────────

    /// Stable-sort `K`'s array by `key`, remapping every entity slot table
    /// in the same call so no stale index survives. This is the one
    /// operation that invalidates previously-read slot indices; callers
    /// holding raw slots (not entities) must re-resolve after it.
    ///
    /// Used by renderers to order meshes by material so state changes are
    /// minimized during draw.
    pub fn sort_components_by_key<K: Stored, Key: Ord>(&mut self, key: impl Fn(&K) -> Key) {
        let remap = {
            let array = K::array_mut(self);
            let mut order: Vec<usize> = (0..array.len()).collect();
            order.sort_by_key(|&slot| key(&array[slot]));

            let mut remap = vec![0usize; order.len()];
            for (new_slot, &old_slot) in order.iter().enumerate() {
                remap[old_slot] = new_slot;
            }

            let mut taken: Vec<Option<K>> =
                std::mem::take(array).into_iter().map(Some).collect();
            *array = order
                .iter()
                .map(|&slot| taken[slot].take().expect("slot permuted twice"))
                .collect();
            remap
        };

        for entity in &mut self.entities {
            if let Some(slot) = entity.slots[K::KIND as usize] {
                entity.slots[K::KIND as usize] = Some(remap[slot]);
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
