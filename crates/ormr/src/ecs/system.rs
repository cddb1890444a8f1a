//! # System — Functions That Transform the Store Once Per Tick
//!
//! A system is a function of `(&mut Store, f32)` — the store and the frame's
//! delta time. The [`Schedule`] runs its systems strictly in registration
//! order, once per tick, to completion. That fixed sequence is the whole
//! concurrency model: one writer phase per system, reads only between
//! phases, no locks because there is nothing to lock against.
//!
//! ## Comparison
//!
//! - **hecs**: no system/schedule concept — scheduling is your problem.
//! - **bevy_ecs**: parameter injection, conflict-checked parallelism, run
//!   conditions. A different complexity class.
//!
//! We stay at the "ordered list of functions" level: the collision sweep
//! must finish before any consumer reads collider state, and an ordered
//! list makes that ordering self-evident.

use std::time::Instant;

use log::trace;

use super::store::Store;

/// A system that can be run against a [`Store`].
///
/// Any `FnMut(&mut Store, f32)` implements this, so closures and function
/// pointers work directly.
pub trait System {
    fn run(&mut self, store: &mut Store, dt: f32);
}

impl<F: FnMut(&mut Store, f32)> System for F {
    fn run(&mut self, store: &mut Store, dt: f32) {
        (self)(store, dt);
    }
}

struct NamedSystem {
    name: String,
    system: Box<dyn System>,
}

/// An ordered, sequential pipeline of systems.
///
/// The expected simulation order is controller → collision → behaviors,
/// so each tick's collision results are fresh when gameplay reads them.
pub struct Schedule {
    systems: Vec<NamedSystem>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Append a system to the end of the pipeline.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(NamedSystem {
            name: short_system_name(std::any::type_name::<S>()),
            system: Box::new(system),
        });
    }

    /// Run every system in order. Per-system wall time goes to the `trace`
    /// log level.
    pub fn run(&mut self, store: &mut Store, dt: f32) {
        for named in &mut self.systems {
            let start = Instant::now();
            named.system.run(store, dt);
            trace!(
                "system {} ran in {:.1}µs",
                named.name,
                start.elapsed().as_secs_f64() * 1_000_000.0
            );
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a type name (`ormr::collision::collision_step`
/// → `collision_step`); closures become `<closure>`.
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_system(_store: &mut Store, _dt: f32) {}

    #[test]
    fn captures_function_name() {
        let mut schedule = Schedule::new();
        schedule.add_system(noop_system);
        assert_eq!(schedule.systems[0].name, "noop_system");
    }

    #[test]
    fn closure_name_is_normalized() {
        let mut schedule = Schedule::new();
        schedule.add_system(|_store: &mut Store, _dt: f32| {});
        assert_eq!(schedule.systems[0].name, "<closure>");
    }

    #[test]
    fn runs_in_registration_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut schedule = Schedule::new();
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            schedule.add_system(move |_: &mut Store, _: f32| {
                order.borrow_mut().push(tag);
            });
        }

        let mut store = Store::new();
        schedule.run(&mut store, 0.016);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }
}
