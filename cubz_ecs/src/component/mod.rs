//! Utilities for *components* in ECS.

use std::any::Any;

pub use manager::*;
pub use storage::*;

mod manager;
mod storage;

/// Objects of this trait represent *component* of ECS.
///
/// Components should be just POD (plain old data).
///
pub trait Component: Any + Send + Sync {}

impl<T> Component for T where T: Any + Send + Sync {}
