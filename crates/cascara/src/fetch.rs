//! Fetch strategy selection for walking related records

use std::future::Future;

use futures::TryStreamExt;

use crate::error::CascadeResult;
use crate::model::ModelRef;
use crate::relation::Relation;

/// Default page size for the chunked strategy
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// How related records are fetched while a cascade walks a relationship.
///
/// Eager loading is the simplest but materializes the full related set; the
/// streaming strategies bound peak memory for large fan-out relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchStrategy {
    /// Resolve the full related-record collection, then visit each
    #[default]
    Get,
    /// Stream records one at a time
    Cursor,
    /// Stream records in implementation-default batches
    Lazy,
    /// Fetch in fixed-size pages
    Chunk,
}

/// Per-model-type fetch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub strategy: FetchStrategy,
    pub chunk_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::Get,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FetchConfig {
    pub fn new(strategy: FetchStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn chunked(chunk_size: usize) -> Self {
        Self {
            strategy: FetchStrategy::Chunk,
            chunk_size,
        }
    }
}

/// Visits every record of a relation exactly once, in the order the
/// underlying query returns them, under the configured strategy.
#[derive(Debug, Clone, Copy)]
pub struct Fetcher {
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.config.strategy
    }

    pub async fn each<F, Fut>(&self, relation: &dyn Relation, mut visit: F) -> CascadeResult<()>
    where
        F: FnMut(ModelRef) -> Fut,
        Fut: Future<Output = CascadeResult<()>>,
    {
        match self.config.strategy {
            FetchStrategy::Get => {
                for record in relation.get().await? {
                    visit(record).await?;
                }
            }
            FetchStrategy::Cursor => {
                let mut records = relation.cursor();
                while let Some(record) = records.try_next().await? {
                    visit(record).await?;
                }
            }
            FetchStrategy::Lazy => {
                let mut batches = relation.lazy();
                while let Some(batch) = batches.try_next().await? {
                    for record in batch {
                        visit(record).await?;
                    }
                }
            }
            FetchStrategy::Chunk => {
                let mut pages = relation.chunk(self.config.chunk_size);
                while let Some(page) = pages.try_next().await? {
                    for record in page {
                        visit(record).await?;
                    }
                }
            }
        }

        Ok(())
    }
}
