//! Utilities for storage of ECS.

use std::time::Duration;

pub use view::SystemView;

use crate::command::CommandBuffer;
use crate::component::{Component, ComponentManager, ComponentStorage, ComponentType};
use crate::config::{Config, ECS_NAME, ECS_VERSION};
use crate::entity::{Entity, EntityRegistry};
use crate::error::Result;
use crate::system::{ComponentSet, EntitySet, Signature, System, SystemManager};

mod view;

/// Type which represents duration between two frames.
pub type DeltaTime = Duration;

/// Storage for entities, components and systems of ECS.
///
/// Every structural change (creation or destruction of an entity,
/// attaching or detaching a component) updates signature of the entity
/// and membership of the entity in each system before returning,
/// so systems never observe an entity in a stale state.
///
/// One world should be created at startup and passed by reference
/// to everything which needs entities or components.
///
pub struct World {
    config: Config,
    /// Storage for all entities with their signatures.
    entities: EntityRegistry,
    /// Storages of components of all registered types.
    components: ComponentManager,
    systems: SystemManager,
    /// Changes deferred by systems until the end of the frame.
    commands: CommandBuffer,
}

impl World {
    /// Creates an empty world with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty world with given configuration.
    pub fn with_config(config: Config) -> Self {
        log::debug!(
            "{} v{}: world created for up to {} entities",
            ECS_NAME,
            *ECS_VERSION,
            config.max_entities(),
        );
        Self {
            config,
            entities: EntityRegistry::new(config.max_entities()),
            components: ComponentManager::new(),
            systems: SystemManager::new(),
            commands: CommandBuffer::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers component type `T`.
    ///
    /// Must be called once before any entity uses `T`.
    ///
    pub fn register_component<T>(&mut self) -> Result<ComponentType>
    where
        T: Component,
    {
        let component_type = self.components.register::<T>()?;
        log::debug!(
            "component `{}` registered as #{}",
            std::any::type_name::<T>(),
            component_type.index(),
        );
        Ok(component_type)
    }

    /// Returns identifier of registered component type `T`,
    /// which can be used to build a [`Signature`].
    pub fn component_type<T>(&self) -> Result<ComponentType>
    where
        T: Component,
    {
        self.components.component_type::<T>()
    }

    /// Builds signature from the set of component types, such as `(Transform, Mesh)`.
    pub fn signature_of<C>(&self) -> Result<Signature>
    where
        C: ComponentSet,
    {
        C::signature(&self.components)
    }

    /// Creates new entity without any components.
    pub fn create_entity(&mut self) -> Result<Entity> {
        let entity = self.entities.create()?;
        log::trace!("entity {:?} created", entity);
        Ok(entity)
    }

    /// Destroys the entity together with all its components.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive.
    /// Nothing is changed in this case.
    ///
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        self.entities.destroy(entity)?;
        let detached = self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        log::trace!(
            "entity {:?} destroyed with {} components",
            entity,
            detached,
        );
        Ok(())
    }

    /// Returns `true` if the entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Count of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Signature of the entity, which contains types of all its components.
    pub fn signature(&self, entity: Entity) -> Result<Signature> {
        self.entities.signature(entity)
    }

    /// Attaches component to the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is not alive, if `T` was not registered
    /// or if the entity already has component of type `T`.
    /// Nothing is changed in these cases.
    ///
    pub fn add_component<T>(&mut self, entity: Entity, component: T) -> Result<()>
    where
        T: Component,
    {
        self.entities.signature(entity)?;
        let component_type = self.components.component_type::<T>()?;
        self.components.insert(entity, component)?;
        let signature = self
            .entities
            .set_signature_bit(entity, component_type, true)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Detaches component of type `T` from the entity.
    ///
    /// Returns component which was attached to the entity.
    ///
    pub fn remove_component<T>(&mut self, entity: Entity) -> Result<T>
    where
        T: Component,
    {
        self.entities.signature(entity)?;
        let component_type = self.components.component_type::<T>()?;
        let component = self.components.remove::<T>(entity)?;
        let signature = self
            .entities
            .set_signature_bit(entity, component_type, false)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(component)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get_component<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        self.entities.signature(entity)?;
        self.components.get(entity)
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_component_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        self.entities.signature(entity)?;
        self.components.get_mut(entity)
    }

    /// Returns `true` if component of type `T` is attached to the entity.
    pub fn has_component<T>(&self, entity: Entity) -> Result<bool>
    where
        T: Component,
    {
        let signature = self.entities.signature(entity)?;
        Ok(signature.contains(self.components.component_type::<T>()?))
    }

    /// Storage with all components of type `T`.
    pub fn components<T>(&self) -> Result<&ComponentStorage<T>>
    where
        T: Component,
    {
        self.components.storage()
    }

    /// Marks the entity as updated for each system which tracks it.
    ///
    /// Systems see such entities in [`SystemView::updated`]
    /// until some pass takes them with [`SystemView::take_updated`].
    ///
    pub fn update_entity(&mut self, entity: Entity) -> Result<()> {
        self.entities.signature(entity)?;
        self.systems.entity_updated(entity);
        Ok(())
    }

    /// Registers the system.
    ///
    /// The system tracks no entities until its signature is set
    /// with [`set_system_signature`](Self::set_system_signature).
    ///
    pub fn register_system<S>(&mut self, system: S) -> Result<&mut S>
    where
        S: System,
    {
        self.systems.register(system)?;
        log::debug!("system `{}` registered", std::any::type_name::<S>());
        self.systems.system_mut()
    }

    /// Sets signature required by system of type `S`
    /// and checks all live entities against it.
    pub fn set_system_signature<S>(&mut self, signature: Signature) -> Result<()>
    where
        S: System,
    {
        self.systems.set_signature::<S>(signature)?;
        self.systems.resync::<S, _>(self.entities.iter())?;
        log::debug!(
            "system `{}` requires {:?} and tracks {} entities",
            std::any::type_name::<S>(),
            signature,
            self.systems.entities::<S>()?.len(),
        );
        Ok(())
    }

    /// Signature required by system of type `S`, if it was set.
    pub fn system_signature<S>(&self) -> Result<Option<Signature>>
    where
        S: System,
    {
        self.systems.signature::<S>()
    }

    /// Retrieves an immutable reference to system of type `S`.
    pub fn system<S>(&self) -> Result<&S>
    where
        S: System,
    {
        self.systems.system()
    }

    /// Retrieves a mutable reference to system of type `S`.
    pub fn system_mut<S>(&mut self) -> Result<&mut S>
    where
        S: System,
    {
        self.systems.system_mut()
    }

    /// Entities tracked by system of type `S`.
    pub fn system_entities<S>(&self) -> Result<&EntitySet>
    where
        S: System,
    {
        self.systems.entities::<S>()
    }

    /// Runs one pass of system of type `S`.
    ///
    /// The closure receives the system and a view of the world:
    /// components can be read and modified through the view,
    /// structural changes are recorded into its command buffer.
    ///
    pub fn run_system<S, R, F>(&mut self, pass: F) -> Result<R>
    where
        S: System,
        F: FnOnce(&mut S, SystemView<'_>) -> R,
    {
        let Self {
            entities,
            components,
            systems,
            commands,
            ..
        } = self;
        let (system, tracked, updated) = systems.lend::<S>()?;
        let view = SystemView::new(tracked, updated, entities, components, commands);
        Ok(pass(system, view))
    }

    /// Runs [`System::update`] of every system in order of registration,
    /// then applies all deferred commands.
    pub fn update(&mut self, delta_time: DeltaTime) -> Result<()> {
        let Self {
            entities,
            components,
            systems,
            commands,
            ..
        } = &mut *self;
        for (system, tracked, updated) in systems.lend_all() {
            let view = SystemView::new(tracked, updated, entities, components, commands);
            system.update(view, delta_time)?;
        }
        self.flush_commands()?;
        Ok(())
    }

    /// Command buffer of the world.
    ///
    /// Commands recorded here are applied by the next [`flush_commands`](Self::flush_commands).
    ///
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut self.commands
    }

    /// Applies all deferred commands in order of their recording.
    ///
    /// Returns count of applied commands.
    ///
    /// # Errors
    ///
    /// The first failed command stops the application and its error is returned.
    /// Remaining commands are discarded.
    ///
    pub fn flush_commands(&mut self) -> Result<usize> {
        let commands = std::mem::take(&mut self.commands);
        commands.apply(self)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
