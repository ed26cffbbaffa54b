//! Utilities for managing systems and entities tracked by them.

use std::any::TypeId;
use std::collections::HashMap;

use super::{EntitySet, ErasedSystem, Signature, System};
use crate::error::{Error, Registration, Result};
use crate::Entity;

struct SystemEntry {
    name: &'static str,
    /// System without signature tracks nothing.
    signature: Option<Signature>,
    entities: EntitySet,
    /// Tracked entities marked as updated and not yet taken by a pass.
    updated: EntitySet,
    system: Box<dyn ErasedSystem>,
}

impl SystemEntry {
    /// Brings membership of the entity in line with its signature.
    fn sync(&mut self, entity: Entity, signature: Signature) {
        match self.signature {
            Some(required) if signature.is_superset_of(required) => {
                if self.entities.insert(entity) {
                    log::trace!("entity {:?} is now tracked by `{}`", entity, self.name);
                    self.system.on_entity_added(entity);
                }
            }
            _ => self.forget(entity),
        }
    }

    fn forget(&mut self, entity: Entity) {
        self.updated.remove(entity);
        if self.entities.remove(entity) {
            log::trace!("entity {:?} is no longer tracked by `{}`", entity, self.name);
            self.system.on_entity_removed(entity);
        }
    }
}

/// Manager of all systems of ECS.
///
/// Systems are kept in order of their registration.
///
#[derive(Default)]
pub struct SystemManager {
    indices: HashMap<TypeId, usize>,
    entries: Vec<SystemEntry>,
}

impl SystemManager {
    /// Creates new system manager.
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Registers the system without signature, so it tracks no entities
    /// until [`set_signature`](Self::set_signature) is called.
    ///
    /// # Errors
    ///
    /// An error is returned if system of type `S` was registered before.
    ///
    pub fn register<S>(&mut self, system: S) -> Result<&mut S>
    where
        S: System,
    {
        let typeid = TypeId::of::<S>();
        let name = std::any::type_name::<S>();
        if self.indices.contains_key(&typeid) {
            return Err(Error::DuplicateRegistration {
                kind: Registration::System,
                name,
            });
        }
        let index = self.entries.len();
        self.entries.push(SystemEntry {
            name,
            signature: None,
            entities: EntitySet::new(),
            updated: EntitySet::new(),
            system: Box::new(system),
        });
        self.indices.insert(typeid, index);
        self.system_mut()
    }

    /// Sets signature required by system of type `S`.
    ///
    /// Entities which are already tracked are not checked against the new signature:
    /// use [`resync`](Self::resync) for that.
    ///
    pub fn set_signature<S>(&mut self, signature: Signature) -> Result<()>
    where
        S: System,
    {
        self.entry_mut::<S>()?.signature = Some(signature);
        Ok(())
    }

    /// Signature required by system of type `S`, if it was set.
    pub fn signature<S>(&self) -> Result<Option<Signature>>
    where
        S: System,
    {
        Ok(self.entry::<S>()?.signature)
    }

    /// Checks all given entities against signature of system of type `S`.
    pub fn resync<S, I>(&mut self, entities: I) -> Result<()>
    where
        S: System,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let entry = self.entry_mut::<S>()?;
        for (entity, signature) in entities {
            entry.sync(entity, signature);
        }
        Ok(())
    }

    /// Stops tracking of the destroyed entity by all systems.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.forget(entity);
        }
    }

    /// Starts or stops tracking of the entity by each system
    /// depending on new signature of the entity.
    ///
    /// Calling this again with the same signature changes nothing.
    ///
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            entry.sync(entity, signature);
        }
    }

    /// Marks the entity as updated for each system which tracks it.
    pub fn entity_updated(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            if entry.entities.contains(entity) {
                entry.updated.insert(entity);
            }
        }
    }

    /// Retrieves an immutable reference to system of type `S`.
    pub fn system<S>(&self) -> Result<&S>
    where
        S: System,
    {
        self.entry::<S>()?
            .system
            .as_any()
            .downcast_ref()
            .ok_or_else(Error::unregistered_system::<S>)
    }

    /// Retrieves a mutable reference to system of type `S`.
    pub fn system_mut<S>(&mut self) -> Result<&mut S>
    where
        S: System,
    {
        self.entry_mut::<S>()?
            .system
            .as_any_mut()
            .downcast_mut()
            .ok_or_else(Error::unregistered_system::<S>)
    }

    /// Entities tracked by system of type `S`.
    pub fn entities<S>(&self) -> Result<&EntitySet>
    where
        S: System,
    {
        Ok(&self.entry::<S>()?.entities)
    }

    /// Count of registered systems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lends system of type `S` for one pass.
    ///
    /// Returns the system, its tracked entities and entities updated since
    /// the updated set was last taken. The updated set is cleared only by its taker.
    ///
    pub(crate) fn lend<S>(&mut self) -> Result<(&mut S, &EntitySet, &mut EntitySet)>
    where
        S: System,
    {
        let SystemEntry {
            system,
            entities,
            updated,
            ..
        } = self.entry_mut::<S>()?;
        let system = system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or_else(Error::unregistered_system::<S>)?;
        Ok((system, &*entities, updated))
    }

    /// Lends all systems for one pass each, in order of registration.
    pub(crate) fn lend_all(
        &mut self,
    ) -> impl Iterator<Item = (&mut (dyn ErasedSystem + 'static), &EntitySet, &mut EntitySet)> {
        self.entries.iter_mut().map(|entry| {
            let SystemEntry {
                system,
                entities,
                updated,
                ..
            } = entry;
            (&mut **system, &*entities, updated)
        })
    }

    fn entry<S>(&self) -> Result<&SystemEntry>
    where
        S: System,
    {
        let index = self
            .indices
            .get(&TypeId::of::<S>())
            .ok_or_else(Error::unregistered_system::<S>)?;
        Ok(&self.entries[*index])
    }

    fn entry_mut<S>(&mut self) -> Result<&mut SystemEntry>
    where
        S: System,
    {
        let index = self
            .indices
            .get(&TypeId::of::<S>())
            .ok_or_else(Error::unregistered_system::<S>)?;
        Ok(&mut self.entries[*index])
    }
}
