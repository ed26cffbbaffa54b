//! Utilities for ECS error handling.

use std::fmt;

use thiserror::Error;

use crate::Entity;

/// Result of any ECS operation which can return an error.
pub type Result<T> = std::result::Result<T, Error>;

/// What kind of type was (or was not) registered in the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Component,
    System,
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Registration::Component => write!(f, "component"),
            Registration::System => write!(f, "system"),
        }
    }
}

/// Which limit of the ECS was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Entities,
    ComponentTypes,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Capacity::Entities => write!(f, "live entities"),
            Capacity::ComponentTypes => write!(f, "component types"),
        }
    }
}

/// General error type of ECS.
///
/// All variants describe misuse of the ECS by the caller.
/// None of them is transient, so retrying the same call never helps.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{kind} type `{name}` was already registered")]
    DuplicateRegistration {
        kind: Registration,
        name: &'static str,
    },

    #[error("entity {0:?} is not alive")]
    UnknownEntity(Entity),

    #[error("entity {entity:?} has no component of type `{component}`")]
    ComponentNotPresent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity:?} already has component of type `{component}`")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("cannot have more than {limit} {kind}")]
    CapacityExceeded { kind: Capacity, limit: usize },

    #[error("{kind} type `{name}` was never registered")]
    UnregisteredType {
        kind: Registration,
        name: &'static str,
    },
}

impl Error {
    pub(crate) fn not_present<T>(entity: Entity) -> Self {
        Self::ComponentNotPresent {
            entity,
            component: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn unregistered_component<T>() -> Self {
        Self::UnregisteredType {
            kind: Registration::Component,
            name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn unregistered_system<S>() -> Self {
        Self::UnregisteredType {
            kind: Registration::System,
            name: std::any::type_name::<S>(),
        }
    }
}
