//! Utilities for *signatures* in ECS.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::component::{Component, ComponentManager, ComponentType};
use crate::error::Result;

/// Set of component types, stored as a fixed-width bitset.
///
/// Bit `i` is set iff the signature contains component type `i`.
/// Entities own a signature which describes components they currently have,
/// systems own a signature which describes components they require.
///
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// Signature without any component types.
    pub const EMPTY: Self = Self(0);

    /// Creates an empty signature.
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Returns raw bits of this signature.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns copy of this signature with given component type added.
    #[must_use]
    pub const fn with(self, component_type: ComponentType) -> Self {
        Self(self.0 | component_type.mask())
    }

    /// Adds component type to this signature.
    pub fn set(&mut self, component_type: ComponentType) {
        self.0 |= component_type.mask();
    }

    /// Removes component type from this signature.
    pub fn unset(&mut self, component_type: ComponentType) {
        self.0 &= !component_type.mask();
    }

    /// Adds or removes component type depending on `value`.
    pub fn set_to(&mut self, component_type: ComponentType, value: bool) {
        if value {
            self.set(component_type)
        } else {
            self.unset(component_type)
        }
    }

    /// Returns `true` if this signature contains given component type.
    pub const fn contains(self, component_type: ComponentType) -> bool {
        self.0 & component_type.mask() != 0
    }

    /// Returns `true` if every component type of `required` is also in this signature.
    ///
    /// The empty signature is a subset of any signature.
    ///
    pub const fn is_superset_of(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Count of component types in this signature.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns iterator over all component types of this signature in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        (0..u64::BITS as u8)
            .filter(move |&index| self.0 & (1u64 << index) != 0)
            .map(ComponentType::new)
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Signature::with)
    }
}

impl From<ComponentType> for Signature {
    fn from(component_type: ComponentType) -> Self {
        Self::EMPTY.with(component_type)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(ComponentType::index))
            .finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:064b}", self.0)
    }
}

/// Set of component types known statically, such as `(Transform, Mesh)`.
///
/// Used to build a [`Signature`] from types instead of from
/// [`ComponentType`]s obtained one by one.
///
pub trait ComponentSet {
    /// Builds signature of this set.
    ///
    /// # Errors
    ///
    /// An error is returned if any type of this set was never registered.
    ///
    fn signature(components: &ComponentManager) -> Result<Signature>;
}

impl ComponentSet for () {
    fn signature(_: &ComponentManager) -> Result<Signature> {
        Ok(Signature::EMPTY)
    }
}

// Implementations for tuples up to 12 elements.
macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name),+> ComponentSet for ($($name,)+)
        where
            $($name: Component,)+
        {
            fn signature(components: &ComponentManager) -> Result<Signature> {
                let mut signature = Signature::EMPTY;
                $(signature.set(components.component_type::<$name>()?);)+
                Ok(signature)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
impl_component_set!(A, B, C, D, E, F, G, H, I);
impl_component_set!(A, B, C, D, E, F, G, H, I, J);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K, L);
