//! Model capability surface consumed by the cascade engines
//!
//! The persistence layer owns the actual entities; the cascade core only
//! needs the lifecycle operations, the soft-delete marker, and the declared
//! cascade configuration. Optional capabilities come with defaults so a
//! backing implementation only overrides what its entity actually has.

use std::any::Any;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::CascadeResult;

/// Boxed model trait object, the unit the cascade engines operate on
pub type ModelRef = Box<dyn Model>;

/// Record surface required by the cascade engines
#[async_trait]
pub trait Model: Send + Sync {
    /// Model type name, used as the key into the relationship registry and hooks
    fn model_name(&self) -> &'static str;

    /// Whether this model type carries the soft-delete marker mechanism
    fn supports_soft_delete(&self) -> bool {
        false
    }

    /// Soft-delete marker timestamp, `None` while the record is active
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Check if this record is currently soft deleted
    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Relationship names configured to cascade with this model's lifecycle
    fn cascade_relationships(&self) -> Vec<String> {
        Vec::new()
    }

    /// True while the in-flight delete is a permanent delete rather than a soft one
    fn is_force_deleting(&self) -> bool {
        false
    }

    /// Join-table record, present when this instance was loaded through a
    /// many-to-many relationship
    fn pivot(&self) -> Option<ModelRef> {
        None
    }

    /// Join-table column values, for records loaded through a many-to-many
    /// relationship
    fn join_attributes(&self) -> HashMap<String, Value> {
        HashMap::new()
    }

    /// Delete this record, honoring its soft-delete configuration. The
    /// implementation is expected to fire the `deleting`/`deleted` lifecycle
    /// hooks around the state change.
    async fn delete(&self) -> CascadeResult<()>;

    /// Permanently delete this record
    async fn force_delete(&self) -> CascadeResult<()> {
        self.delete().await
    }

    /// Clear this record's soft-delete marker. The implementation is expected
    /// to fire the `restoring`/`restored` lifecycle hooks around the change.
    async fn restore(&self) -> CascadeResult<()>;

    /// Downcast support for relationship resolvers that need the concrete type
    fn as_any(&self) -> &dyn Any;
}
