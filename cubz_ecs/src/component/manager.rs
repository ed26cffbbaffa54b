//! Utilities for managing component storages.

use std::any::TypeId;
use std::collections::HashMap;

use super::{super::Entity, Component, ComponentStorage, ErasedStorage};
use crate::config::MAX_COMPONENTS;
use crate::error::{Capacity, Error, Registration, Result};

/// Stable identifier of registered component type.
///
/// Identifiers are assigned in order of registration starting from zero,
/// so they can be used as bit indices of a [`Signature`](crate::Signature).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentType(u8);

impl ComponentType {
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Index of this component type.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn mask(self) -> u64 {
        1u64 << self.0
    }
}

/// Manager of all components of ECS.
#[derive(Default)]
pub struct ComponentManager {
    types: HashMap<TypeId, ComponentType>,
    /// Storage of component type `i` is placed at index `i`.
    storages: Vec<Box<dyn ErasedStorage>>,
}

impl ComponentManager {
    /// Creates new component manager.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            storages: Vec::new(),
        }
    }

    /// Registers component type `T` and creates storage for it.
    ///
    /// # Errors
    ///
    /// An error is returned if `T` was registered before
    /// or if there are already [`MAX_COMPONENTS`] registered types.
    ///
    pub fn register<T>(&mut self) -> Result<ComponentType>
    where
        T: Component,
    {
        let typeid = TypeId::of::<T>();
        if self.types.contains_key(&typeid) {
            return Err(Error::DuplicateRegistration {
                kind: Registration::Component,
                name: std::any::type_name::<T>(),
            });
        }
        if self.storages.len() >= MAX_COMPONENTS {
            return Err(Error::CapacityExceeded {
                kind: Capacity::ComponentTypes,
                limit: MAX_COMPONENTS,
            });
        }
        let component_type = ComponentType::new(self.storages.len() as u8);
        self.storages.push(Box::new(ComponentStorage::<T>::new()));
        self.types.insert(typeid, component_type);
        Ok(component_type)
    }

    /// Returns identifier of component type `T`.
    pub fn component_type<T>(&self) -> Result<ComponentType>
    where
        T: Component,
    {
        self.types
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(Error::unregistered_component::<T>)
    }

    /// Returns `true` if component type `T` was registered.
    pub fn registered<T>(&self) -> bool
    where
        T: Component,
    {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Count of registered component types.
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Inserts component of type `T` and attaches it to the entity.
    pub fn insert<T>(&mut self, entity: Entity, component: T) -> Result<()>
    where
        T: Component,
    {
        self.storage_mut()?.insert(entity, component)
    }

    /// Removes component of type `T` and detaches it from the entity.
    ///
    /// Returns component that was attached to the entity.
    ///
    pub fn remove<T>(&mut self, entity: Entity) -> Result<T>
    where
        T: Component,
    {
        self.storage_mut()?.remove(entity)
    }

    /// Returns `true` if component of type `T` is attached to the entity.
    pub fn attached<T>(&self, entity: Entity) -> bool
    where
        T: Component,
    {
        self.storage::<T>()
            .map(|storage| storage.attached(entity))
            .unwrap_or(false)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        self.storage::<T>()?
            .get(entity)
            .ok_or_else(|| Error::not_present::<T>(entity))
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        self.storage_mut::<T>()?
            .get_mut(entity)
            .ok_or_else(|| Error::not_present::<T>(entity))
    }

    /// Detaches all components from the destroyed entity.
    ///
    /// Returns count of detached components.
    ///
    pub fn entity_destroyed(&mut self, entity: Entity) -> usize {
        let mut detached = 0;
        for storage in &mut self.storages {
            if storage.remove_entity(entity) {
                detached += 1;
            }
        }
        detached
    }

    /// Storage of component type `T`.
    pub fn storage<T>(&self) -> Result<&ComponentStorage<T>>
    where
        T: Component,
    {
        let component_type = self.component_type::<T>()?;
        self.storages[component_type.index()]
            .as_any()
            .downcast_ref()
            .ok_or_else(Error::unregistered_component::<T>)
    }

    pub fn storage_mut<T>(&mut self) -> Result<&mut ComponentStorage<T>>
    where
        T: Component,
    {
        let component_type = self.component_type::<T>()?;
        self.storages[component_type.index()]
            .as_any_mut()
            .downcast_mut()
            .ok_or_else(Error::unregistered_component::<T>)
    }

    /// Storage of the component type with its type erased.
    pub fn erased(&self, component_type: ComponentType) -> Option<&dyn ErasedStorage> {
        self.storages
            .get(component_type.index())
            .map(|storage| &**storage)
    }
}
