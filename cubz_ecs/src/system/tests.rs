#![cfg(test)]

use super::*;
use crate::component::ComponentType;
use crate::entity::EntityRegistry;
use crate::error::{Error, Registration};

/// Records every hook call it receives.
#[derive(Default)]
struct Recorder {
    added: Vec<Entity>,
    removed: Vec<Entity>,
}

impl System for Recorder {
    fn on_entity_added(&mut self, entity: Entity) {
        self.added.push(entity);
    }

    fn on_entity_removed(&mut self, entity: Entity) {
        self.removed.push(entity);
    }
}

#[derive(Debug)]
struct Other;

impl System for Other {}

const TRANSFORM: ComponentType = ComponentType::new(0);
const MESH: ComponentType = ComponentType::new(1);
const LIGHT: ComponentType = ComponentType::new(2);

fn manager() -> SystemManager {
    let mut manager = SystemManager::new();
    manager.register(Recorder::default()).unwrap();
    manager.register(Other).unwrap();
    manager
        .set_signature::<Recorder>(Signature::from_iter([TRANSFORM, MESH]))
        .unwrap();
    manager
        .set_signature::<Other>(Signature::from(LIGHT))
        .unwrap();
    manager
}

#[test]
fn test_registration() {
    let mut manager = manager();
    assert_eq!(manager.len(), 2);

    let error = manager.register(Other).unwrap_err();
    assert!(matches!(
        error,
        Error::DuplicateRegistration {
            kind: Registration::System,
            ..
        }
    ));

    struct Unknown;
    impl System for Unknown {}
    assert!(matches!(
        manager.set_signature::<Unknown>(Signature::EMPTY),
        Err(Error::UnregisteredType {
            kind: Registration::System,
            ..
        })
    ));
    assert!(manager.system::<Unknown>().is_err());
}

#[test]
fn test_signature_changed() {
    let mut entities = EntityRegistry::new(8);
    let entity = entities.create().unwrap();
    let mut manager = manager();

    let mut signature = Signature::from(TRANSFORM);
    manager.entity_signature_changed(entity, signature);
    assert!(manager.entities::<Recorder>().unwrap().is_empty());

    signature.set(MESH);
    signature.set(LIGHT);
    manager.entity_signature_changed(entity, signature);
    assert!(manager.entities::<Recorder>().unwrap().contains(entity));
    assert!(manager.entities::<Other>().unwrap().contains(entity));

    signature.unset(TRANSFORM);
    manager.entity_signature_changed(entity, signature);
    assert!(!manager.entities::<Recorder>().unwrap().contains(entity));
    assert!(manager.entities::<Other>().unwrap().contains(entity));

    let recorder = manager.system::<Recorder>().unwrap();
    assert_eq!(recorder.added, vec![entity]);
    assert_eq!(recorder.removed, vec![entity]);
}

#[test]
fn test_idempotent_resync() {
    let mut entities = EntityRegistry::new(8);
    let first = entities.create().unwrap();
    let second = entities.create().unwrap();
    let mut manager = manager();

    let matching = Signature::from_iter([TRANSFORM, MESH]);
    manager.entity_signature_changed(first, matching);
    manager.entity_signature_changed(second, Signature::EMPTY);
    let before = manager.entities::<Recorder>().unwrap().clone();

    manager.entity_signature_changed(first, matching);
    manager.entity_signature_changed(second, Signature::EMPTY);
    assert_eq!(manager.entities::<Recorder>().unwrap(), &before);
    assert_eq!(before.iter().collect::<Vec<_>>(), vec![first]);

    let recorder = manager.system::<Recorder>().unwrap();
    assert_eq!(recorder.added, vec![first]);
    assert!(recorder.removed.is_empty());
}

#[test]
fn test_entity_destroyed() {
    let mut entities = EntityRegistry::new(8);
    let entity = entities.create().unwrap();
    let mut manager = manager();

    manager.entity_signature_changed(entity, Signature::from_iter([TRANSFORM, MESH, LIGHT]));
    manager.entity_destroyed(entity);
    assert!(manager.entities::<Recorder>().unwrap().is_empty());
    assert!(manager.entities::<Other>().unwrap().is_empty());
    assert_eq!(manager.system::<Recorder>().unwrap().removed, vec![entity]);

    // Entities which were never tracked cause no hook calls.
    manager.entity_destroyed(entity);
    assert_eq!(manager.system::<Recorder>().unwrap().removed.len(), 1);
}

#[test]
fn test_updated() {
    let mut entities = EntityRegistry::new(8);
    let tracked = entities.create().unwrap();
    let untracked = entities.create().unwrap();
    let mut manager = manager();

    manager.entity_signature_changed(tracked, Signature::from_iter([TRANSFORM, MESH]));
    manager.entity_updated(tracked);
    manager.entity_updated(untracked);

    // Marks survive passes which do not take them.
    let (_, _, updated) = manager.lend::<Recorder>().unwrap();
    assert_eq!(updated, &EntitySet::from_iter([tracked]));
    let _ = manager.lend_all().count();
    let (_, _, updated) = manager.lend::<Recorder>().unwrap();
    assert_eq!(std::mem::take(updated), EntitySet::from_iter([tracked]));

    let (_, _, updated) = manager.lend::<Recorder>().unwrap();
    assert!(updated.is_empty());
    let (_, _, updated) = manager.lend::<Other>().unwrap();
    assert!(updated.is_empty());

    // Entity which is no longer tracked loses its mark.
    manager.entity_updated(tracked);
    manager.entity_signature_changed(tracked, Signature::from(TRANSFORM));
    let (_, _, updated) = manager.lend::<Recorder>().unwrap();
    assert!(updated.is_empty());
}

#[test]
fn test_resync() {
    let mut entities = EntityRegistry::new(8);
    let entity = entities.create().unwrap();
    entities.set_signature_bit(entity, LIGHT, true).unwrap();
    let mut manager = manager();

    manager.entity_signature_changed(entity, entities.signature(entity).unwrap());
    assert!(manager.entities::<Other>().unwrap().contains(entity));

    manager.set_signature::<Other>(Signature::from(MESH)).unwrap();
    assert!(manager.entities::<Other>().unwrap().contains(entity));

    manager.resync::<Other, _>(entities.iter()).unwrap();
    assert!(manager.entities::<Other>().unwrap().is_empty());
    assert_eq!(manager.signature::<Other>(), Ok(Some(Signature::from(MESH))));
}

#[test]
fn test_unset_signature() {
    let mut entities = EntityRegistry::new(8);
    let bare = entities.create().unwrap();
    let mesh = entities.create().unwrap();
    entities.set_signature_bit(mesh, MESH, true).unwrap();

    let mut manager = SystemManager::new();
    manager.register(Recorder::default()).unwrap();
    assert_eq!(manager.signature::<Recorder>(), Ok(None));

    // Even the empty signature of a bare entity does not match an unset one.
    manager.resync::<Recorder, _>(entities.iter()).unwrap();
    manager.entity_signature_changed(bare, Signature::EMPTY);
    manager.entity_updated(bare);
    assert!(manager.entities::<Recorder>().unwrap().is_empty());

    manager
        .set_signature::<Recorder>(Signature::from(MESH))
        .unwrap();
    manager.resync::<Recorder, _>(entities.iter()).unwrap();
    assert_eq!(
        manager.entities::<Recorder>().unwrap().iter().collect::<Vec<_>>(),
        vec![mesh]
    );
    let recorder = manager.system::<Recorder>().unwrap();
    assert_eq!(recorder.added, vec![mesh]);
    assert!(recorder.removed.is_empty());
}
