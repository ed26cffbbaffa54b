//! Entity Component System (ECS) utilities for game engine.
//!
//! [`World`] owns entities, their components and systems.
//! Each system declares a [`Signature`] of required component types
//! and the world keeps the set of entities tracked by the system
//! equal to the set of entities which have all of these components.
//!
//! ```
//! use cubz_ecs::{System, World};
//!
//! struct Transform(f32, f32, f32);
//! struct Mesh(u32);
//!
//! struct MeshRenderSystem;
//! impl System for MeshRenderSystem {}
//!
//! # fn main() -> cubz_ecs::Result<()> {
//! let mut world = World::new();
//! world.register_component::<Transform>()?;
//! world.register_component::<Mesh>()?;
//!
//! world.register_system(MeshRenderSystem)?;
//! let signature = world.signature_of::<(Transform, Mesh)>()?;
//! world.set_system_signature::<MeshRenderSystem>(signature)?;
//!
//! let entity = world.create_entity()?;
//! world.add_component(entity, Transform(0.0, 0.0, 0.0))?;
//! world.add_component(entity, Mesh(36))?;
//! assert!(world.system_entities::<MeshRenderSystem>()?.contains(entity));
//! # Ok(())
//! # }
//! ```

pub use command::CommandBuffer;
pub use component::{Component, ComponentManager, ComponentStorage, ComponentType, ErasedStorage};
pub use config::{Config, MAX_COMPONENTS, MAX_ENTITIES};
pub use entity::{Entity, EntityRegistry};
pub use error::{Error, Result};
pub use system::{ComponentSet, EntitySet, Signature, System, SystemManager};
pub use world::{DeltaTime, SystemView, World};

pub mod config;
pub mod error;

mod command;
mod component;
mod entity;
mod system;
mod world;
