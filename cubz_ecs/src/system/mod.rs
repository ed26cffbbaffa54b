//! Utilities for *systems* in ECS.

use std::any::Any;
use std::collections::{btree_set, BTreeSet};
use std::iter::Copied;

pub use manager::*;
pub use signature::*;

use crate::error::Result;
use crate::world::{DeltaTime, SystemView};
use crate::Entity;

mod manager;
mod signature;
mod tests;

/// Objects of this trait represent *system* of ECS.
///
/// Each registered system tracks entities whose signature contains
/// the signature required by the system. Tracked entities are available
/// through [`SystemView::entities`] during a pass of the system.
///
/// Systems must not change the set of entities or their components directly
/// while they are running: such changes are recorded into
/// [`SystemView::commands`] and applied between frames.
///
pub trait System: Any {
    /// Per-frame entry point of the system.
    ///
    /// Systems which need other entry points (for example, rendering with a camera)
    /// are driven by [`World::run_system`](crate::World::run_system) instead.
    ///
    fn update(&mut self, view: SystemView<'_>, delta_time: DeltaTime) -> Result<()> {
        let _ = (view, delta_time);
        Ok(())
    }

    /// Called when the entity starts to be tracked by this system.
    fn on_entity_added(&mut self, entity: Entity) {
        let _ = entity;
    }

    /// Called when the entity stops to be tracked by this system,
    /// including destruction of the entity.
    fn on_entity_removed(&mut self, entity: Entity) {
        let _ = entity;
    }
}

/// Set of unique entities, ordered by their identifiers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntitySet(BTreeSet<Entity>);

impl EntitySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Copied<btree_set::Iter<'_, Entity>> {
        self.0.iter().copied()
    }

    /// Returns `true` if the entity was not in the set.
    pub(crate) fn insert(&mut self, entity: Entity) -> bool {
        self.0.insert(entity)
    }

    /// Returns `true` if the entity was in the set.
    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        self.0.remove(&entity)
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = Entity;
    type IntoIter = Copied<btree_set::Iter<'a, Entity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Entity> for EntitySet {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// System with its concrete type erased.
pub(crate) trait ErasedSystem {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn update(&mut self, view: SystemView<'_>, delta_time: DeltaTime) -> Result<()>;

    fn on_entity_added(&mut self, entity: Entity);

    fn on_entity_removed(&mut self, entity: Entity);
}

impl<S> ErasedSystem for S
where
    S: System,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, view: SystemView<'_>, delta_time: DeltaTime) -> Result<()> {
        System::update(self, view, delta_time)
    }

    fn on_entity_added(&mut self, entity: Entity) {
        System::on_entity_added(self, entity)
    }

    fn on_entity_removed(&mut self, entity: Entity) {
        System::on_entity_removed(self, entity)
    }
}
