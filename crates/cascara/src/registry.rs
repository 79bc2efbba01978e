//! Cascade Registry - Typed relationship resolution and per-type fetch configuration

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::error::{CascadeError, CascadeResult};
use crate::fetch::FetchConfig;
use crate::model::Model;
use crate::relation::Relation;

/// Closure producing a relation scoped to one parent record
pub type RelationResolver = Arc<dyn Fn(&dyn Model) -> Box<dyn Relation> + Send + Sync>;

/// Named relationship accessor for a model type
#[derive(Clone)]
pub struct RelationshipDescriptor {
    name: String,
    resolver: RelationResolver,
}

impl RelationshipDescriptor {
    pub fn new<F>(name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&dyn Model) -> Box<dyn Relation> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce the relation scoped to the given parent record
    pub fn resolve(&self, record: &dyn Model) -> Box<dyn Relation> {
        (self.resolver)(record)
    }
}

impl fmt::Debug for RelationshipDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Thread-safe registry mapping model types to their cascade relationship
/// accessors and fetch configuration
#[derive(Debug, Clone, Default)]
pub struct CascadeRegistry {
    /// Map of model name -> relationship name -> descriptor
    relationships: Arc<DashMap<String, HashMap<String, RelationshipDescriptor>>>,

    /// Per-model fetch strategy overrides
    fetch_configs: Arc<DashMap<String, FetchConfig>>,
}

impl CascadeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            relationships: Arc::new(DashMap::new()),
            fetch_configs: Arc::new(DashMap::new()),
        }
    }

    /// Register a relationship accessor for a model type.
    ///
    /// Registration is the validation point for accessors: an empty name or
    /// a duplicate (model, relationship) pair is a configuration error.
    pub fn register(
        &self,
        model_name: &str,
        descriptor: RelationshipDescriptor,
    ) -> CascadeResult<()> {
        if model_name.is_empty() || descriptor.name().is_empty() {
            return Err(CascadeError::configuration(
                "relationship registration requires a model name and a relationship name",
            ));
        }

        let mut model_relationships = self
            .relationships
            .entry(model_name.to_string())
            .or_insert_with(HashMap::new);

        if model_relationships.contains_key(descriptor.name()) {
            return Err(CascadeError::configuration(&format!(
                "relationship '{}' is already registered for model '{}'",
                descriptor.name(),
                model_name
            )));
        }

        tracing::debug!(
            model = model_name,
            relationship = descriptor.name(),
            "registered cascade relationship"
        );
        model_relationships.insert(descriptor.name().to_string(), descriptor);

        Ok(())
    }

    /// Get a relationship descriptor by model and relationship name
    pub fn relationship(
        &self,
        model_name: &str,
        relationship_name: &str,
    ) -> Option<RelationshipDescriptor> {
        self.relationships
            .get(model_name)?
            .get(relationship_name)
            .cloned()
    }

    /// Check if a relationship accessor is registered
    pub fn has_relationship(&self, model_name: &str, relationship_name: &str) -> bool {
        self.relationships
            .get(model_name)
            .map(|relationships| relationships.contains_key(relationship_name))
            .unwrap_or(false)
    }

    /// Get all registered relationship names for a model
    pub fn relationship_names(&self, model_name: &str) -> Vec<String> {
        self.relationships
            .get(model_name)
            .map(|relationships| relationships.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Resolve a named relationship into a relation scoped to the given record
    pub fn resolve(&self, record: &dyn Model, relationship_name: &str) -> Option<Box<dyn Relation>> {
        self.relationship(record.model_name(), relationship_name)
            .map(|descriptor| descriptor.resolve(record))
    }

    /// Override the fetch configuration for a model type
    pub fn configure_fetch(&self, model_name: &str, config: FetchConfig) {
        self.fetch_configs.insert(model_name.to_string(), config);
    }

    /// Fetch configuration for a model type, falling back to the default
    /// eager strategy
    pub fn fetch_config(&self, model_name: &str) -> FetchConfig {
        self.fetch_configs
            .get(model_name)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    /// Get statistics about the registry
    pub fn stats(&self) -> RegistryStats {
        let total_models = self.relationships.len();
        let total_relationships: usize = self
            .relationships
            .iter()
            .map(|entry| entry.value().len())
            .sum();

        RegistryStats {
            total_models,
            total_relationships,
        }
    }

    /// Clear all registered relationships and fetch overrides
    pub fn clear(&self) {
        self.relationships.clear();
        self.fetch_configs.clear();
    }
}

/// Statistics about the cascade registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_models: usize,
    pub total_relationships: usize,
}

/// Global registry instance for the application
static GLOBAL_REGISTRY: OnceLock<CascadeRegistry> = OnceLock::new();

/// Get the global cascade registry
pub fn global_registry() -> &'static CascadeRegistry {
    GLOBAL_REGISTRY.get_or_init(CascadeRegistry::new)
}

/// Convenience macro for registering cascade relationships against the
/// global registry
#[macro_export]
macro_rules! cascade_relationship {
    ($model:expr, $name:expr, $resolver:expr) => {
        $crate::registry::global_registry()
            .register(
                $model,
                $crate::registry::RelationshipDescriptor::new($name, $resolver),
            )
            .expect("Failed to register cascade relationship");
    };
}
