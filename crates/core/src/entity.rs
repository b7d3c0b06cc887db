//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A shopping list item keeps its generated id across every quantity merge.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
