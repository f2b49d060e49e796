//! Aggregate root trait for catalog models.

/// Aggregate root marker + minimal interface.
///
/// An aggregate is loaded and saved as a unit: children (variants, images,
/// attribute values, ...) are only reachable through their root.
pub trait AggregateRoot {
    /// Natural key the aggregate is looked up by.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of times the aggregate has been saved.
    ///
    /// Zero means the aggregate was created in memory and never persisted.
    fn version(&self) -> u64;
}
