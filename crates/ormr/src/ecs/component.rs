//! # Component Kinds — The Closed Set of Storable Types
//!
//! The store keeps one contiguous array per component kind. The set of
//! kinds is closed: adding one means adding an enum variant, a field on the
//! store, and a [`Stored`] impl (the `impl_stored!` macro in
//! [`store`](super::store) generates the latter). This replaces open-ended
//! `TypeId` registration with a small enum — every cross-kind lookup is an
//! array index, not a hash probe.
//!
//! ## Comparison
//!
//! - **hecs / bevy_ecs**: open component sets keyed by `TypeId`, archetype
//!   tables grouped by signature. Flexible, but every lookup goes through a
//!   hash map and component sets are unknowable statically.
//! - **EnTT (C++)**: sparse set per component type — structurally the
//!   closest relative of this design.
//! - **ormr**: fixed kinds, one dense `Vec` each, entity-side slot tables.
//!   Systems that touch one kind scan one array front to back.

use super::entity::EntityId;
use super::store::Store;

/// The closed set of component kinds the store can hold.
///
/// The discriminant doubles as the index into each entity's slot table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ComponentKind {
    Transform,
    Mesh,
    Camera,
    Light,
    Collider,
    GuiElement,
    GuiText,
    Rotator,
    Tag,
    MovingPlatform,
}

impl ComponentKind {
    /// Number of registered kinds; the length of every entity's slot table.
    pub const COUNT: usize = 10;

    /// All kinds, in slot-table order.
    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Transform,
        ComponentKind::Mesh,
        ComponentKind::Camera,
        ComponentKind::Light,
        ComponentKind::Collider,
        ComponentKind::GuiElement,
        ComponentKind::GuiText,
        ComponentKind::Rotator,
        ComponentKind::Tag,
        ComponentKind::MovingPlatform,
    ];

    /// Short name for logs and scene files.
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Transform => "transform",
            ComponentKind::Mesh => "mesh",
            ComponentKind::Camera => "camera",
            ComponentKind::Light => "light",
            ComponentKind::Collider => "collider",
            ComponentKind::GuiElement => "gui_element",
            ComponentKind::GuiText => "gui_text",
            ComponentKind::Rotator => "rotator",
            ComponentKind::Tag => "tag",
            ComponentKind::MovingPlatform => "moving_platform",
        }
    }
}

/// Implemented by every component type the [`Store`] can hold.
///
/// Ties a concrete type to its [`ComponentKind`] and to the store field
/// that backs it, and exposes the `owner` back-reference every component
/// carries. Implemented via the `impl_stored!` macro next to the store —
/// never by hand.
pub trait Stored: Default + Sized {
    /// The kind tag for this type; indexes entity slot tables.
    const KIND: ComponentKind;

    /// The backing array for this kind.
    fn array(store: &Store) -> &[Self];

    /// Mutable access to the backing array for this kind.
    fn array_mut(store: &mut Store) -> &mut Vec<Self>;

    /// The entity this component instance belongs to.
    fn owner(&self) -> EntityId;

    /// Set the owning entity. Called by the store on attach.
    fn set_owner(&mut self, owner: EntityId);
}
