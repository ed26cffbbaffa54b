//! Utilities for deferred changes of ECS.
//!
//! Systems must not create or destroy entities, attach or detach components
//! while they iterate over entities they track: such changes would modify
//! the very set being iterated. Instead, changes are recorded into a
//! [`CommandBuffer`] and applied in order of recording between frames.

use crate::component::Component;
use crate::entity::Entity;
use crate::error::Result;
use crate::World;

type Deferred = Box<dyn FnOnce(&mut World, Entity) -> Result<()>>;

enum Command {
    /// Creates new entity and passes it to the builder.
    Spawn(Deferred),
    Destroy(Entity),
    /// Attaches or detaches component of the entity.
    Change {
        entity: Entity,
        change: Deferred,
    },
}

impl Command {
    fn apply(self, world: &mut World) -> Result<()> {
        match self {
            Command::Spawn(build) => {
                let entity = world.create_entity()?;
                build(world, entity)
            }
            Command::Destroy(entity) => world.destroy_entity(entity),
            Command::Change { entity, change } => change(world, entity),
        }
    }
}

/// Ordered queue of deferred changes of ECS.
#[derive(Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Creates an empty command buffer.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Records creation of new entity.
    ///
    /// The builder receives the world and the created entity,
    /// so it can attach components to it right away.
    ///
    pub fn spawn<F>(&mut self, build: F)
    where
        F: FnOnce(&mut World, Entity) -> Result<()> + 'static,
    {
        self.commands.push(Command::Spawn(Box::new(build)));
    }

    /// Records destruction of the entity.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.commands.push(Command::Destroy(entity));
    }

    /// Records attachment of component to the entity.
    pub fn add_component<T>(&mut self, entity: Entity, component: T)
    where
        T: Component,
    {
        let change = move |world: &mut World, entity| world.add_component(entity, component);
        self.commands.push(Command::Change {
            entity,
            change: Box::new(change),
        });
    }

    /// Records detachment of component of type `T` from the entity.
    pub fn remove_component<T>(&mut self, entity: Entity)
    where
        T: Component,
    {
        let change = |world: &mut World, entity| world.remove_component::<T>(entity).map(drop);
        self.commands.push(Command::Change {
            entity,
            change: Box::new(change),
        });
    }

    /// Count of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Discards all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear()
    }

    /// Applies all commands to the world in order of their recording.
    ///
    /// Returns count of applied commands.
    ///
    pub(crate) fn apply(self, world: &mut World) -> Result<usize> {
        let total = self.commands.len();
        for (index, command) in self.commands.into_iter().enumerate() {
            if let Err(error) = command.apply(world) {
                log::warn!(
                    "command {} of {} failed, {} discarded: {}",
                    index + 1,
                    total,
                    total - index - 1,
                    error,
                );
                return Err(error);
            }
        }
        Ok(total)
    }
}
