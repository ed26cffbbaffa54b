//! Utilities for *entities* in ECS.

use slotmap::{new_key_type, Key, SlotMap};

use crate::component::ComponentType;
use crate::config::MAX_ENTITIES;
use crate::error::{Capacity, Error, Result};
use crate::Signature;

new_key_type! {
    /// Unique identifier of the *entity* of ECS.
    ///
    /// Identifiers of destroyed entities are reused by later entities,
    /// but an identifier kept after destruction never refers to the new owner.
    ///
    pub struct Entity;
}

impl Entity {
    /// Returns the packed numeric value of this identifier.
    pub fn id(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Registry of all live entities of ECS and their signatures.
pub struct EntityRegistry {
    signatures: SlotMap<Entity, Signature>,
    capacity: usize,
}

impl EntityRegistry {
    /// Creates an empty registry which can hold up to `capacity` live entities.
    ///
    /// Capacity is clamped to [`MAX_ENTITIES`]. Storage grows on demand.
    ///
    pub fn new(capacity: usize) -> Self {
        Self {
            signatures: SlotMap::with_key(),
            capacity: capacity.min(MAX_ENTITIES),
        }
    }

    /// Creates new entity with empty signature.
    ///
    /// # Errors
    ///
    /// An error is returned if count of live entities has reached capacity.
    ///
    pub fn create(&mut self) -> Result<Entity> {
        if self.signatures.len() >= self.capacity {
            return Err(Error::CapacityExceeded {
                kind: Capacity::Entities,
                limit: self.capacity,
            });
        }
        Ok(self.signatures.insert(Signature::EMPTY))
    }

    /// Destroys the entity, so its identifier can be reused.
    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        self.signatures
            .remove(entity)
            .map(drop)
            .ok_or(Error::UnknownEntity(entity))
    }

    /// Adds or removes one component type in signature of the entity.
    ///
    /// Returns new signature of the entity.
    ///
    pub fn set_signature_bit(
        &mut self,
        entity: Entity,
        component_type: ComponentType,
        value: bool,
    ) -> Result<Signature> {
        let signature = self
            .signatures
            .get_mut(entity)
            .ok_or(Error::UnknownEntity(entity))?;
        signature.set_to(component_type, value);
        Ok(*signature)
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature> {
        self.signatures
            .get(entity)
            .copied()
            .ok_or(Error::UnknownEntity(entity))
    }

    /// Returns `true` if the entity is alive.
    pub fn contains(&self, entity: Entity) -> bool {
        self.signatures.contains_key(entity)
    }

    /// Count of live entities.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Maximum count of live entities.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns iterator over all live entities with their signatures.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.signatures
            .iter()
            .map(|(entity, signature)| (entity, *signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        let mut registry = EntityRegistry::new(2);
        let first = registry.create().unwrap();
        registry.create().unwrap();

        let error = registry.create().unwrap_err();
        assert_eq!(
            error,
            Error::CapacityExceeded {
                kind: Capacity::Entities,
                limit: 2,
            },
        );

        registry.destroy(first).unwrap();
        assert!(registry.create().is_ok());
    }

    #[test]
    fn test_unbounded_capacity() {
        let mut registry = EntityRegistry::new(usize::MAX);
        assert_eq!(registry.capacity(), MAX_ENTITIES);

        let entity = registry.create().unwrap();
        assert!(registry.contains(entity));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_double_destroy() {
        let mut registry = EntityRegistry::new(8);
        let entity = registry.create().unwrap();

        registry.destroy(entity).unwrap();
        assert_eq!(registry.destroy(entity), Err(Error::UnknownEntity(entity)));
        assert_eq!(registry.signature(entity), Err(Error::UnknownEntity(entity)));
        assert_eq!(Entity::default().id(), Entity::null().id());
        assert!(registry.destroy(Entity::null()).is_err());
    }

    #[test]
    fn test_recycling() {
        let mut registry = EntityRegistry::new(8);
        let old = registry.create().unwrap();
        registry
            .set_signature_bit(old, ComponentType::new(3), true)
            .unwrap();
        registry.destroy(old).unwrap();

        let new = registry.create().unwrap();
        assert_ne!(old, new);
        assert!(!registry.contains(old));
        assert_eq!(registry.signature(new), Ok(Signature::EMPTY));
    }

    #[test]
    fn test_signature_bits() {
        let mut registry = EntityRegistry::new(8);
        let entity = registry.create().unwrap();
        let component_type = ComponentType::new(7);

        let signature = registry
            .set_signature_bit(entity, component_type, true)
            .unwrap();
        assert!(signature.contains(component_type));
        assert_eq!(registry.signature(entity), Ok(signature));

        let signature = registry
            .set_signature_bit(entity, component_type, false)
            .unwrap();
        assert!(signature.is_empty());
    }
}
