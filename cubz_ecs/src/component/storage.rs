//! Utilities for dense storages of **components** of ECS.

use std::any::Any;
use std::ops::{Index, IndexMut};

use slotmap::{Key, SecondaryMap};

use super::{super::Entity, Component};
use crate::error::{Error, Result};

/// Storage for statically typed components of ECS.
///
/// Components are packed into contiguous array without holes.
/// Removal moves the last component into the freed slot,
/// so order of components is not stable between mutations.
///
pub struct ComponentStorage<T>
where
    T: Component,
{
    /// Components are actually stored here.
    components: Vec<T>,
    /// Owner of the component in the same slot.
    slot_to_entity: Vec<Entity>,
    entity_to_slot: SecondaryMap<Entity, usize>,
}

impl<T> ComponentStorage<T>
where
    T: Component,
{
    /// Creates an empty component storage.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            slot_to_entity: Vec::new(),
            entity_to_slot: SecondaryMap::new(),
        }
    }

    /// Inserts component and attaches it to the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if component was already attached to the entity.
    /// Attached component stays untouched in this case.
    ///
    /// Null entity and entity older than the owner of its slot in this storage
    /// are rejected as unknown, and the storage is left unchanged.
    ///
    pub fn insert(&mut self, entity: Entity, component: T) -> Result<()> {
        if entity.is_null() {
            return Err(Error::UnknownEntity(entity));
        }
        if self.attached(entity) {
            return Err(Error::DuplicateComponent {
                entity,
                component: std::any::type_name::<T>(),
            });
        }
        let slot = self.components.len();
        // Secondary map silently ignores keys older than the slot owner.
        self.entity_to_slot.insert(entity, slot);
        if !self.entity_to_slot.contains_key(entity) {
            return Err(Error::UnknownEntity(entity));
        }
        self.components.push(component);
        self.slot_to_entity.push(entity);
        Ok(())
    }

    /// Removes component and detaches it from the entity.
    ///
    /// Returns component that was attached to the entity.
    ///
    pub fn remove(&mut self, entity: Entity) -> Result<T> {
        let slot = self
            .entity_to_slot
            .remove(entity)
            .ok_or_else(|| Error::not_present::<T>(entity))?;
        let component = self.components.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);

        // Last component was moved into the freed slot.
        if let Some(&moved) = self.slot_to_entity.get(slot) {
            self.entity_to_slot.insert(moved, slot);
        }
        Ok(component)
    }

    /// Replaces component attached to the entity by value.
    pub fn replace(&mut self, entity: Entity, component: T) -> Result<T> {
        let slot = self
            .slot_of(entity)
            .ok_or_else(|| Error::not_present::<T>(entity))?;
        Ok(std::mem::replace(&mut self.components[slot], component))
    }

    /// Returns `true` if component was already attached to the entity.
    pub fn attached(&self, entity: Entity) -> bool {
        self.entity_to_slot.contains_key(entity)
    }

    /// Retrieves an immutable reference to component attached to the entity.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = *self.entity_to_slot.get(entity)?;
        self.components.get(slot)
    }

    /// Retrieves a mutable reference to component attached to the entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.entity_to_slot.get(entity)?;
        self.components.get_mut(slot)
    }

    /// Slot of the dense array where component of the entity is stored.
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_slot.get(entity).copied()
    }

    /// Entity which owns component stored in the slot.
    pub fn entity_at(&self, slot: usize) -> Option<Entity> {
        self.slot_to_entity.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns immutable iterator over all components with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slot_to_entity
            .iter()
            .copied()
            .zip(self.components.iter())
    }

    /// Returns mutable iterator over all components with their entities.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slot_to_entity
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }

    /// Returns all entities which have component of this type, in packing order.
    pub fn entities(&self) -> &[Entity] {
        &self.slot_to_entity
    }

    /// Returns all components, in packing order.
    pub fn components(&self) -> &[T] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }
}

impl<T> Default for ComponentStorage<T>
where
    T: Component,
{
    fn default() -> Self {
        Self::new()
    }
}

pub type IntoIter<T> = std::iter::Zip<std::vec::IntoIter<Entity>, std::vec::IntoIter<T>>;

impl<T> IntoIterator for ComponentStorage<T>
where
    T: Component,
{
    type Item = (Entity, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.slot_to_entity.into_iter().zip(self.components)
    }
}

impl<T> Index<Entity> for ComponentStorage<T>
where
    T: Component,
{
    type Output = T;

    fn index(&self, entity: Entity) -> &Self::Output {
        self.get(entity)
            .expect("there is no component attached to the entity")
    }
}

impl<T> IndexMut<Entity> for ComponentStorage<T>
where
    T: Component,
{
    fn index_mut(&mut self, entity: Entity) -> &mut Self::Output {
        self.get_mut(entity)
            .expect("there is no component attached to the entity")
    }
}

/// Component storage with its component type erased.
///
/// Allows to purge an entity from storage without knowing type of its components.
///
pub trait ErasedStorage: Any {
    /// Detaches component from the entity, if any.
    ///
    /// Returns `true` if component was attached.
    ///
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Returns `true` if component is attached to the entity.
    fn has_entity(&self, entity: Entity) -> bool;

    /// Count of stored components.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the type of stored components.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> ErasedStorage for ComponentStorage<T>
where
    T: Component,
{
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    fn has_entity(&self, entity: Entity) -> bool {
        self.attached(entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
