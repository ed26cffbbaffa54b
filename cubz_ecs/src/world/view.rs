//! View of the world available to a system during its pass.

use crate::command::CommandBuffer;
use crate::component::{Component, ComponentManager, ComponentStorage};
use crate::entity::{Entity, EntityRegistry};
use crate::error::{Error, Result};
use crate::system::{EntitySet, Signature};

/// Access to the world from inside a system pass.
///
/// Components of any entity can be read and modified,
/// but entities cannot be created or destroyed and components cannot be
/// attached or detached directly: record such changes into [`commands`](Self::commands)
/// and they will be applied after the pass.
///
pub struct SystemView<'a> {
    entities: &'a EntitySet,
    updated: &'a mut EntitySet,
    registry: &'a EntityRegistry,
    components: &'a mut ComponentManager,
    commands: &'a mut CommandBuffer,
}

impl<'a> SystemView<'a> {
    pub(crate) fn new(
        entities: &'a EntitySet,
        updated: &'a mut EntitySet,
        registry: &'a EntityRegistry,
        components: &'a mut ComponentManager,
        commands: &'a mut CommandBuffer,
    ) -> Self {
        Self {
            entities,
            updated,
            registry,
            components,
            commands,
        }
    }

    /// Entities tracked by the running system.
    ///
    /// The returned set does not borrow the view,
    /// so components can be modified while iterating over it.
    ///
    pub fn entities(&self) -> &'a EntitySet {
        self.entities
    }

    /// Tracked entities marked as updated and not yet taken by a pass of the running system.
    pub fn updated(&self) -> &EntitySet {
        &*self.updated
    }

    /// Takes tracked entities marked as updated, so the next pass sees only new marks.
    ///
    /// Marks are kept until some pass takes them, whether it is
    /// [`System::update`](crate::System::update) or a pass of
    /// [`World::run_system`](crate::World::run_system).
    ///
    pub fn take_updated(&mut self) -> EntitySet {
        std::mem::take(&mut *self.updated)
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature> {
        self.registry.signature(entity)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        self.ensure_alive(entity)?;
        self.components.get(entity)
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        self.ensure_alive(entity)?;
        self.components.get_mut(entity)
    }

    /// Storage with all components of type `T`.
    pub fn storage<T>(&self) -> Result<&ComponentStorage<T>>
    where
        T: Component,
    {
        self.components.storage()
    }

    /// Buffer for changes which will be applied after the pass.
    pub fn commands(&mut self) -> &mut CommandBuffer {
        self.commands
    }

    fn ensure_alive(&self, entity: Entity) -> Result<()> {
        if self.registry.contains(entity) {
            Ok(())
        } else {
            Err(Error::UnknownEntity(entity))
        }
    }
}
