use super::world::World;

/// A unit of behavior stepped once per world update.
///
/// Systems hold no component data of their own; each tick they read and
/// write it through the world's queries. Between queries inside the same
/// update call a system is free to make structural changes too, since it
/// receives the world exclusively.
///
/// # Examples
///
/// ```ignore
/// use hekla_ecs::{System, World};
///
/// struct Integrator;
///
/// impl System for Integrator {
///     fn update(&mut self, world: &mut World, delta_time: f32) {
///         for (_entity, position, velocity) in world.query::<(&mut Position, &Velocity)>() {
///             position.x += velocity.dx * delta_time;
///         }
///     }
/// }
/// ```
pub trait System {
    /// Steps this system against the world.
    ///
    /// `delta_time` is the seconds elapsed since the previous update.
    fn update(&mut self, world: &mut World, delta_time: f32);

    /// Hook run once, at registration time.
    fn initialize(&mut self) {}

    /// Hook run when the system is dropped from the world.
    fn shutdown(&mut self) {}

    /// Disabled systems stay registered but the update loop skips them.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Label used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Position of a system in the update sequence.
///
/// Each update pass walks systems in ascending order value; ties run in
/// registration order. The named constants mark out the usual phases of a
/// frame, and any `i32` in between is fair game for finer placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SystemOrder(pub i32);

impl SystemOrder {
    /// Before every other phase, e.g. input sampling.
    pub const FIRST: SystemOrder = SystemOrder(i32::MIN);
    /// Ahead of the default phase.
    pub const EARLY: SystemOrder = SystemOrder(-1000);
    /// The default phase; most simulation logic lives here.
    pub const NORMAL: SystemOrder = SystemOrder(0);
    /// Behind the default phase.
    pub const LATE: SystemOrder = SystemOrder(1000);
    /// After every other phase, e.g. cleanup.
    pub const LAST: SystemOrder = SystemOrder(i32::MAX);
}

impl Default for SystemOrder {
    fn default() -> Self {
        SystemOrder::NORMAL
    }
}

/// A registered system together with its place in the update sequence.
pub struct SystemEntry {
    pub order: SystemOrder,
    pub system: Box<dyn System>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;

    #[derive(Component, Default)]
    struct Trace {
        calls: Vec<&'static str>,
    }

    #[derive(Component, Default)]
    struct TickComponent {
        ticks: u32,
    }

    struct Labeled(&'static str);

    impl System for Labeled {
        fn update(&mut self, world: &mut World, _delta_time: f32) {
            for (_entity, trace) in world.query::<&mut Trace>() {
                trace.calls.push(self.0);
            }
        }
    }

    struct TickSystem;

    impl System for TickSystem {
        fn update(&mut self, world: &mut World, _delta_time: f32) {
            for (_entity, tick) in world.query::<&mut TickComponent>() {
                tick.ticks += 1;
            }
        }
    }

    struct DisabledSystem;

    impl System for DisabledSystem {
        fn update(&mut self, world: &mut World, _delta_time: f32) {
            // Would be visible in the tick counts if it ever ran.
            for (_entity, tick) in world.query::<&mut TickComponent>() {
                tick.ticks += 100;
            }
        }

        fn is_enabled(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_phase_constants_ascend() {
        let phases = [
            SystemOrder::FIRST,
            SystemOrder::EARLY,
            SystemOrder::NORMAL,
            SystemOrder::LATE,
            SystemOrder::LAST,
        ];
        assert!(phases.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(SystemOrder::default(), SystemOrder::NORMAL);
    }

    #[test]
    fn test_systems_run_in_ascending_order() {
        let mut world = World::new();
        let id = world.create_entity();
        world.add_component(id, Trace::default());

        // Registration order deliberately disagrees with phase order.
        world.register_system(Box::new(Labeled("late")), SystemOrder::LATE);
        world.register_system(Box::new(Labeled("early")), SystemOrder::EARLY);
        world.register_system(Box::new(Labeled("normal")), SystemOrder::NORMAL);

        world.update(0.016);

        let trace = world.get_component::<Trace>(id).unwrap();
        assert_eq!(trace.calls, vec!["early", "normal", "late"]);
    }

    #[test]
    fn test_ties_run_in_registration_order() {
        let mut world = World::new();
        let id = world.create_entity();
        world.add_component(id, Trace::default());

        world.register_system(Box::new(Labeled("a")), SystemOrder::NORMAL);
        world.register_system(Box::new(Labeled("b")), SystemOrder::NORMAL);

        world.update(0.016);

        let trace = world.get_component::<Trace>(id).unwrap();
        assert_eq!(trace.calls, vec!["a", "b"]);
    }

    #[test]
    fn test_system_update_runs_queries() {
        let mut world = World::new();
        let id = world.create_entity();
        world.add_component(id, TickComponent::default());
        world.register_system(Box::new(TickSystem), SystemOrder::NORMAL);
        assert_eq!(world.system_count(), 1);

        world.update(0.016);
        world.update(0.016);
        assert_eq!(world.get_component::<TickComponent>(id).unwrap().ticks, 2);
    }

    #[test]
    fn test_disabled_system_is_skipped() {
        let mut world = World::new();
        let id = world.create_entity();
        world.add_component(id, TickComponent::default());
        world.register_system(Box::new(TickSystem), SystemOrder::NORMAL);
        world.register_system(Box::new(DisabledSystem), SystemOrder::LATE);

        world.update(0.016);
        assert_eq!(world.get_component::<TickComponent>(id).unwrap().ticks, 1);
    }

    #[test]
    fn test_clear_systems() {
        let mut world = World::new();
        world.register_system(Box::new(TickSystem), SystemOrder::NORMAL);
        world.clear_systems();
        assert_eq!(world.system_count(), 0);
    }
}
