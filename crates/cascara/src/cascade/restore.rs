//! Cascade restore engine

use crate::error::{CascadeError, CascadeResult};
use crate::fetch::Fetcher;
use crate::model::Model;
use crate::registry::CascadeRegistry;

/// Propagate a restore transition to every configured relationship of the
/// record.
///
/// Every configured relationship is walked, without the existence pre-filter
/// the delete path applies. Only the soft-deleted subset of each relationship
/// is fetched, and each record is restored; records that were never deleted
/// are untouched. Restore is a soft-delete-only operation and does not route
/// through join records.
pub async fn run_restores(registry: &CascadeRegistry, record: &dyn Model) -> CascadeResult<()> {
    let fetcher = Fetcher::new(registry.fetch_config(record.model_name()));

    for name in record.cascade_relationships() {
        let relation = registry.resolve(record, &name).ok_or_else(|| {
            CascadeError::configuration(&format!(
                "relationship '{}' is not registered for model '{}'",
                name,
                record.model_name()
            ))
        })?;

        tracing::debug!(
            model = record.model_name(),
            relationship = %name,
            "cascading restore"
        );
        let trashed = relation.only_trashed();
        fetcher
            .each(trashed.as_ref(), |related| async move {
                related.restore().await
            })
            .await?;
    }

    Ok(())
}
