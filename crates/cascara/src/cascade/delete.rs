//! Cascade delete engine

use crate::error::{CascadeError, CascadeResult};
use crate::fetch::Fetcher;
use crate::model::{Model, ModelRef};
use crate::registry::CascadeRegistry;

/// Propagate a delete transition to every configured relationship of the
/// record.
///
/// Relationships with no current members are skipped without fetching their
/// records. The delete mode mirrors the parent: a force delete is applied
/// permanently to every related record, a soft delete soft-deletes them.
/// Records loaded through a many-to-many relationship have the operation
/// applied to their join record instead, leaving the related entity intact.
///
/// Each related record's own `delete` fires its own lifecycle hooks, so the
/// cascade recurses depth-first through participating types. Failures
/// propagate immediately and halt further iteration; transactional wrapping
/// is the caller's responsibility.
pub async fn run_deletes(registry: &CascadeRegistry, record: &dyn Model) -> CascadeResult<()> {
    let fetcher = Fetcher::new(registry.fetch_config(record.model_name()));
    let force = record.is_force_deleting();

    for name in record.cascade_relationships() {
        let relation = registry.resolve(record, &name).ok_or_else(|| {
            CascadeError::configuration(&format!(
                "relationship '{}' is not registered for model '{}'",
                name,
                record.model_name()
            ))
        })?;

        if !relation.exists().await? {
            tracing::debug!(
                model = record.model_name(),
                relationship = %name,
                "cascade delete skipped, no related records"
            );
            continue;
        }

        tracing::debug!(
            model = record.model_name(),
            relationship = %name,
            force,
            "cascading delete"
        );
        fetcher
            .each(relation.as_ref(), |related| apply_delete(related, force))
            .await?;
    }

    Ok(())
}

/// Delete one visited record, routing through its join record when present
async fn apply_delete(record: ModelRef, force: bool) -> CascadeResult<()> {
    let target = match record.pivot() {
        Some(pivot) => pivot,
        None => record,
    };

    if force {
        target.force_delete().await
    } else {
        target.delete().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RelationshipDescriptor;
    use crate::relation::Relation;
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Store {
        deleted: Mutex<Vec<String>>,
        forced: Mutex<Vec<String>>,
    }

    #[derive(Clone)]
    struct Child {
        name: String,
        store: Arc<Store>,
        pivot_row: Option<Box<Child>>,
        fail: bool,
    }

    impl Child {
        fn new(name: &str, store: Arc<Store>) -> Self {
            Self {
                name: name.to_string(),
                store,
                pivot_row: None,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl Model for Child {
        fn model_name(&self) -> &'static str {
            "child"
        }

        fn supports_soft_delete(&self) -> bool {
            true
        }

        fn pivot(&self) -> Option<ModelRef> {
            self.pivot_row
                .as_ref()
                .map(|pivot| Box::new((**pivot).clone()) as ModelRef)
        }

        async fn delete(&self) -> CascadeResult<()> {
            if self.fail {
                return Err(CascadeError::database("foreign key constraint"));
            }
            self.store.deleted.lock().unwrap().push(self.name.clone());
            Ok(())
        }

        async fn force_delete(&self) -> CascadeResult<()> {
            self.store.forced.lock().unwrap().push(self.name.clone());
            Ok(())
        }

        async fn restore(&self) -> CascadeResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Clone)]
    struct StubRelation {
        children: Vec<Child>,
        exists_calls: Arc<AtomicUsize>,
        get_calls: Arc<AtomicUsize>,
    }

    impl StubRelation {
        fn new(children: Vec<Child>) -> Self {
            Self {
                children,
                exists_calls: Arc::new(AtomicUsize::new(0)),
                get_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Relation for StubRelation {
        async fn get(&self) -> CascadeResult<Vec<ModelRef>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .children
                .iter()
                .map(|child| Box::new(child.clone()) as ModelRef)
                .collect())
        }

        async fn exists(&self) -> CascadeResult<bool> {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            Ok(!self.children.is_empty())
        }

        fn only_trashed(&self) -> Box<dyn Relation> {
            Box::new(StubRelation::new(Vec::new()))
        }
    }

    struct Parent {
        cascades: Vec<String>,
        force: bool,
    }

    #[async_trait]
    impl Model for Parent {
        fn model_name(&self) -> &'static str {
            "parent"
        }

        fn supports_soft_delete(&self) -> bool {
            true
        }

        fn cascade_relationships(&self) -> Vec<String> {
            self.cascades.clone()
        }

        fn is_force_deleting(&self) -> bool {
            self.force
        }

        async fn delete(&self) -> CascadeResult<()> {
            Ok(())
        }

        async fn restore(&self) -> CascadeResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn register(registry: &CascadeRegistry, name: &str, relation: StubRelation) {
        registry
            .register(
                "parent",
                RelationshipDescriptor::new(name, move |_record| {
                    Box::new(relation.clone()) as Box<dyn Relation>
                }),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_relationships_are_skipped_without_fetching() {
        let store = Arc::new(Store::default());
        let populated = StubRelation::new(vec![
            Child::new("a1", store.clone()),
            Child::new("a2", store.clone()),
            Child::new("a3", store.clone()),
        ]);
        let empty = StubRelation::new(Vec::new());

        let registry = CascadeRegistry::new();
        register(&registry, "a", populated.clone());
        register(&registry, "b", empty.clone());

        let parent = Parent {
            cascades: vec!["a".to_string(), "b".to_string()],
            force: false,
        };

        run_deletes(&registry, &parent).await.unwrap();

        assert_eq!(
            store.deleted.lock().unwrap().clone(),
            vec!["a1", "a2", "a3"]
        );
        assert_eq!(empty.exists_calls.load(Ordering::SeqCst), 1);
        assert_eq!(empty.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_force_delete_mode_mirrors_to_related_records() {
        let store = Arc::new(Store::default());
        let relation = StubRelation::new(vec![
            Child::new("a1", store.clone()),
            Child::new("a2", store.clone()),
        ]);

        let registry = CascadeRegistry::new();
        register(&registry, "a", relation);

        let parent = Parent {
            cascades: vec!["a".to_string()],
            force: true,
        };

        run_deletes(&registry, &parent).await.unwrap();

        assert_eq!(store.forced.lock().unwrap().clone(), vec!["a1", "a2"]);
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pivot_record_is_deleted_instead_of_related_entity() {
        let store = Arc::new(Store::default());
        let mut tagged = Child::new("tag", store.clone());
        tagged.pivot_row = Some(Box::new(Child::new("post_tag", store.clone())));

        let registry = CascadeRegistry::new();
        register(&registry, "tags", StubRelation::new(vec![tagged]));

        let parent = Parent {
            cascades: vec!["tags".to_string()],
            force: false,
        };

        run_deletes(&registry, &parent).await.unwrap();

        assert_eq!(store.deleted.lock().unwrap().clone(), vec!["post_tag"]);
    }

    #[tokio::test]
    async fn test_unregistered_relationship_is_a_configuration_error() {
        let registry = CascadeRegistry::new();
        let parent = Parent {
            cascades: vec!["ghost".to_string()],
            force: false,
        };

        let result = run_deletes(&registry, &parent).await;
        assert!(matches!(result, Err(CascadeError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_related_record_failure_halts_iteration() {
        let store = Arc::new(Store::default());
        let mut failing = Child::new("a2", store.clone());
        failing.fail = true;
        let relation = StubRelation::new(vec![
            Child::new("a1", store.clone()),
            failing,
            Child::new("a3", store.clone()),
        ]);

        let registry = CascadeRegistry::new();
        register(&registry, "a", relation);

        let parent = Parent {
            cascades: vec!["a".to_string()],
            force: false,
        };

        let result = run_deletes(&registry, &parent).await;

        assert!(matches!(result, Err(CascadeError::Database { .. })));
        assert_eq!(store.deleted.lock().unwrap().clone(), vec!["a1"]);
    }
}
