//! # System Pipeline
//!
//! Ordered list of per-frame callbacks.
//!
//! Systems declare a [`Phase`] and the component types they read and write.
//! [`Pipeline::build`] stable-sorts by phase; registration order breaks ties.
//! Declared access is logged, not checked: two systems writing the same
//! component are not detected, so the pipeline must run sequentially.

use crate::ecs::{Component, TypeKey, World};

/// Frame phase, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Input and event intake.
    PreUpdate,
    /// Gameplay logic.
    Update,
    /// Reactions to this frame's logic.
    PostUpdate,
    /// Draw submission.
    Render,
    /// Deferred destruction and bookkeeping.
    Cleanup,
}

/// One declared component access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Registry key of the component type.
    pub key: TypeKey,
    /// Component type name.
    pub type_name: &'static str,
}

impl Access {
    fn of<T: Component>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// A named per-frame callback.
///
/// # Example
///
/// ```rust
/// use wikigolf_core::{Component, Phase, Pipeline, System, World};
///
/// struct Spin(f32);
/// impl Component for Spin {}
///
/// let mut pipeline = Pipeline::new();
/// pipeline.add(
///     System::new("spin", Phase::Update, |world: &mut World| {
///         world.each_mut::<Spin>(|_, spin| spin.0 += 1.0);
///     })
///     .writes::<Spin>(),
/// );
/// pipeline.build();
///
/// let mut world = World::new();
/// pipeline.run(&mut world);
/// ```
pub struct System {
    name: String,
    phase: Phase,
    callback: Box<dyn FnMut(&mut World)>,
    reads: Vec<Access>,
    writes: Vec<Access>,
}

impl System {
    /// Creates a system running `callback` during `phase`.
    pub fn new(
        name: impl Into<String>,
        phase: Phase,
        callback: impl FnMut(&mut World) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            phase,
            callback: Box::new(callback),
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Declares a read of `T`.
    #[must_use]
    pub fn reads<T: Component>(mut self) -> Self {
        self.reads.push(Access::of::<T>());
        self
    }

    /// Declares a write of `T`.
    #[must_use]
    pub fn writes<T: Component>(mut self) -> Self {
        self.writes.push(Access::of::<T>());
        self
    }

    /// System name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Declared reads.
    #[must_use]
    pub fn read_set(&self) -> &[Access] {
        &self.reads
    }

    /// Declared writes.
    #[must_use]
    pub fn write_set(&self) -> &[Access] {
        &self.writes
    }
}

/// Phase-ordered, sequential system runner.
#[derive(Default)]
pub struct Pipeline {
    systems: Vec<System>,
    built: bool,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system. The pipeline must be rebuilt before it runs.
    pub fn add(&mut self, system: System) -> &mut Self {
        self.systems.push(system);
        self.built = false;
        self
    }

    /// Stable-sorts systems by phase and logs the final order.
    pub fn build(&mut self) {
        self.systems.sort_by_key(System::phase);
        self.built = true;

        tracing::info!(order = ?self.order(), "pipeline built");
        for system in &self.systems {
            let reads: Vec<&str> = system.reads.iter().map(|a| a.type_name).collect();
            let writes: Vec<&str> = system.writes.iter().map(|a| a.type_name).collect();
            tracing::debug!(
                system = %system.name,
                phase = ?system.phase,
                ?reads,
                ?writes,
                "system access"
            );
        }
    }

    /// Runs every system once, in build order.
    pub fn run(&mut self, world: &mut World) {
        if !self.built {
            tracing::warn!("pipeline run before build, building now");
            self.build();
        }
        for system in &mut self.systems {
            (system.callback)(world);
        }
    }

    /// System names in execution order (registration order until built).
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.systems.iter().map(System::name).collect()
    }

    /// Registered systems.
    #[must_use]
    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);
    impl Component for Counter {}

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> impl FnMut(&mut World) {
        let log = Rc::clone(log);
        move |_| log.borrow_mut().push(name)
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::PreUpdate < Phase::Update);
        assert!(Phase::Update < Phase::PostUpdate);
        assert!(Phase::PostUpdate < Phase::Render);
        assert!(Phase::Render < Phase::Cleanup);
    }

    #[test]
    fn test_build_sorts_stably_by_phase() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new();
        pipeline
            .add(System::new("draw", Phase::Render, recorder(&log, "draw")))
            .add(System::new("physics", Phase::Update, recorder(&log, "physics")))
            .add(System::new("input", Phase::PreUpdate, recorder(&log, "input")))
            .add(System::new("camera", Phase::Update, recorder(&log, "camera")))
            .add(System::new("gc", Phase::Cleanup, recorder(&log, "gc")));
        pipeline.build();

        assert_eq!(pipeline.order(), vec!["input", "physics", "camera", "draw", "gc"]);

        let mut world = World::new();
        pipeline.run(&mut world);
        pipeline.run(&mut world);
        assert_eq!(log.borrow().len(), 10);
        assert_eq!(&log.borrow()[..5], &["input", "physics", "camera", "draw", "gc"]);
    }

    #[test]
    fn test_run_without_build_builds() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new();
        pipeline.add(System::new("late", Phase::Cleanup, recorder(&log, "late")));
        pipeline.add(System::new("early", Phase::PreUpdate, recorder(&log, "early")));

        pipeline.run(&mut World::new());
        assert_eq!(*log.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn test_systems_mutate_world() {
        let mut pipeline = Pipeline::new();
        pipeline.add(
            System::new("tick", Phase::Update, |world: &mut World| {
                world.each_mut::<Counter>(|_, c| c.0 += 1);
            })
            .reads::<Counter>()
            .writes::<Counter>(),
        );
        pipeline.build();

        let mut world = World::new();
        let e = world.create_entity();
        world.add(e, Counter(0));
        for _ in 0..3 {
            pipeline.run(&mut world);
        }
        assert_eq!(world.get::<Counter>(e), Some(&Counter(3)));

        let system = &pipeline.systems()[0];
        assert_eq!(system.read_set()[0].key, TypeKey::of::<Counter>());
        assert_eq!(system.write_set().len(), 1);
        assert_eq!(system.phase(), Phase::Update);
    }
}
