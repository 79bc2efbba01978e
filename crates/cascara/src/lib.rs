//! # cascara: Cascading soft deletes for async persistence layers
//!
//! When a record is soft deleted or restored, its configured relationships
//! are carried through the same transition automatically, recursing through
//! records that cascade in turn.
//!
//! The crate is the orchestration core only: the persistence engine, query
//! execution, and the soft-delete column mechanics stay on the collaborator
//! side, consumed through the [`Model`] and [`Relation`] capability traits.
//! Relationship accessors are registered per model type in a
//! [`CascadeRegistry`], validated before any cascade runs, and walked with a
//! configurable fetch strategy (eager, cursor, lazy batches, or fixed-size
//! chunks) so large fan-out relationships never have to be materialized in
//! memory at once. The persistence layer wires everything together by firing
//! the [`LifecycleHooks`] events around its delete and restore transitions.

pub mod cascade;
pub mod error;
pub mod events;
pub mod fetch;
pub mod hooks;
pub mod model;
pub mod registry;
pub mod relation;

// Re-export core traits and types
pub use cascade::*;
pub use error::*;
pub use events::*;
pub use fetch::*;
pub use hooks::*;
pub use model::*;
pub use registry::*;
pub use relation::*;
