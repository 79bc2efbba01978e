use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cascade::{run_deletes, run_restores, validate_cascade};
use crate::error::CascadeResult;
use crate::events::ModelObserver;
use crate::model::Model;
use crate::registry::{global_registry, CascadeRegistry};

/// Observer that ties cascade validation and the engines to the lifecycle
/// transitions.
///
/// Validation runs first on both paths; a failure aborts the transition
/// before any related record is touched.
pub struct CascadeObserver {
    registry: CascadeRegistry,
}

impl CascadeObserver {
    pub fn new(registry: CascadeRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ModelObserver for CascadeObserver {
    async fn deleting(&self, model: &dyn Model) -> CascadeResult<()> {
        validate_cascade(&self.registry, model)?;
        run_deletes(&self.registry, model).await
    }

    async fn restoring(&self, model: &dyn Model) -> CascadeResult<()> {
        validate_cascade(&self.registry, model)?;
        run_restores(&self.registry, model).await
    }
}

/// Per-model-type lifecycle event bindings.
///
/// The persistence layer fires the `deleting`/`restoring` events before
/// committing the corresponding state change and aborts the change when a
/// handler fails; the `deleted`/`restored` events fire after it is applied.
/// Observers run in registration order and a failure short-circuits the
/// chain.
pub struct LifecycleHooks {
    registry: CascadeRegistry,
    observers: DashMap<String, Vec<Arc<dyn ModelObserver>>>,
    cascade_bound: DashMap<String, ()>,
}

impl LifecycleHooks {
    pub fn new(registry: CascadeRegistry) -> Self {
        Self {
            registry,
            observers: DashMap::new(),
            cascade_bound: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &CascadeRegistry {
        &self.registry
    }

    /// Register an observer for a model type
    pub fn observe(&self, model_name: &str, observer: Arc<dyn ModelObserver>) {
        self.observers
            .entry(model_name.to_string())
            .or_insert_with(Vec::new)
            .push(observer);
    }

    /// Bind the cascade observer to a model type's lifecycle.
    ///
    /// Idempotent: binding the same model type again is a no-op.
    pub fn attach_cascade(&self, model_name: &str) {
        if self
            .cascade_bound
            .insert(model_name.to_string(), ())
            .is_none()
        {
            tracing::debug!(model = model_name, "binding cascade lifecycle hooks");
            self.observe(
                model_name,
                Arc::new(CascadeObserver::new(self.registry.clone())),
            );
        }
    }

    pub fn is_cascade_bound(&self, model_name: &str) -> bool {
        self.cascade_bound.contains_key(model_name)
    }

    pub fn observer_count(&self, model_name: &str) -> usize {
        self.observers
            .get(model_name)
            .map(|observers| observers.len())
            .unwrap_or(0)
    }

    pub async fn fire_deleting(&self, model: &dyn Model) -> CascadeResult<()> {
        for observer in self.observers_for(model.model_name()) {
            observer.deleting(model).await?;
        }
        Ok(())
    }

    pub async fn fire_deleted(&self, model: &dyn Model) -> CascadeResult<()> {
        for observer in self.observers_for(model.model_name()) {
            observer.deleted(model).await?;
        }
        Ok(())
    }

    pub async fn fire_restoring(&self, model: &dyn Model) -> CascadeResult<()> {
        for observer in self.observers_for(model.model_name()) {
            observer.restoring(model).await?;
        }
        Ok(())
    }

    pub async fn fire_restored(&self, model: &dyn Model) -> CascadeResult<()> {
        for observer in self.observers_for(model.model_name()) {
            observer.restored(model).await?;
        }
        Ok(())
    }

    // Snapshot the observer list so no map guard is held across await
    // points; a cascade re-enters these hooks for related records.
    fn observers_for(&self, model_name: &str) -> Vec<Arc<dyn ModelObserver>> {
        self.observers
            .get(model_name)
            .map(|observers| observers.clone())
            .unwrap_or_default()
    }
}

/// Global lifecycle hooks bound to the global cascade registry
static GLOBAL_HOOKS: OnceLock<LifecycleHooks> = OnceLock::new();

/// Get the global lifecycle hooks
pub fn global_hooks() -> &'static LifecycleHooks {
    GLOBAL_HOOKS.get_or_init(|| LifecycleHooks::new(global_registry().clone()))
}
