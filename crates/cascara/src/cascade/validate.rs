//! Pre-flight validation for cascade transitions

use crate::error::{CascadeError, CascadeResult};
use crate::model::Model;
use crate::registry::CascadeRegistry;

/// Verify that a record is eligible for cascading before any mutation.
///
/// Fails when the record's type does not support soft deletes, or when one
/// or more of its declared cascade relationships has no registered accessor.
/// All offending names are collected into a single error. Runs on both the
/// delete and restore paths.
pub fn validate_cascade(registry: &CascadeRegistry, record: &dyn Model) -> CascadeResult<()> {
    if !record.supports_soft_delete() {
        return Err(CascadeError::not_soft_deletable(record.model_name()));
    }

    let invalid: Vec<String> = record
        .cascade_relationships()
        .into_iter()
        .filter(|name| !registry.has_relationship(record.model_name(), name))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(CascadeError::invalid_relationships(
            record.model_name(),
            invalid,
        ))
    }
}
