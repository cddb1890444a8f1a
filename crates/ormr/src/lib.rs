//! # Ormr — Entity-Component Store and Collision Core
//!
//! The simulation core of a small 3D engine: a typed entity-component
//! store with per-kind contiguous arrays, a parent-relative transform
//! hierarchy resolved on demand, and an analytic ray-vs-box collision
//! system that drives grounding, movement blocking, and mouse picking.
//! Rendering, windowing, and asset IO are external consumers — everything
//! here runs headless.
//!
//! Start with `use ormr::prelude::*`, build a [`Store`](ecs::Store), load
//! or spawn a scene, and run a [`Schedule`](ecs::Schedule) once per frame:
//! controller → collision → behaviors.

pub mod behavior;
pub mod camera;
pub mod collision;
pub mod control;
pub mod ecs;
pub mod gui;
pub mod math;
pub mod prelude;
pub mod render_data;
pub mod scene;
pub mod time;
pub mod transform;
