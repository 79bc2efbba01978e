//! Relation capability surface
//!
//! A relation is a query scoped to the records related to one parent
//! instance. The cascade engines consume it through four access shapes:
//! a materialized fetch, a one-at-a-time cursor, implementation-batched
//! lazy streaming, and fixed-size chunked pages. The streaming accessors
//! default to materializing through `get`, so a minimal backend only has to
//! implement the eager path; real database backends override them to stream
//! without holding the full set in memory.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::{CascadeError, CascadeResult};
use crate::model::ModelRef;

/// Stream of individual related records
pub type RecordStream<'a> = BoxStream<'a, CascadeResult<ModelRef>>;

/// Stream of related-record batches
pub type RecordBatchStream<'a> = BoxStream<'a, CascadeResult<Vec<ModelRef>>>;

/// Batch size used by the lazy accessor
pub const LAZY_BATCH_SIZE: usize = 1000;

/// Query scoped to the records related to one parent instance
#[async_trait]
pub trait Relation: Send + Sync {
    /// Resolve the full related-record collection
    async fn get(&self) -> CascadeResult<Vec<ModelRef>>;

    /// Whether the relation currently matches at least one record.
    ///
    /// The default materializes the collection; backends should override
    /// this with an existence query.
    async fn exists(&self) -> CascadeResult<bool> {
        Ok(!self.get().await?.is_empty())
    }

    /// Restrict the relation to records that are currently soft deleted
    fn only_trashed(&self) -> Box<dyn Relation>;

    /// Stream related records one at a time
    fn cursor(&self) -> RecordStream<'_> {
        stream::once(self.get())
            .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, CascadeError>)))
            .try_flatten()
            .boxed()
    }

    /// Stream related records in implementation-default batches
    fn lazy(&self) -> RecordBatchStream<'_> {
        self.chunk(LAZY_BATCH_SIZE)
    }

    /// Stream related records in fixed-size pages
    fn chunk(&self, size: usize) -> RecordBatchStream<'_> {
        let size = size.max(1);
        stream::once(self.get())
            .map_ok(move |records| {
                let mut pages: Vec<CascadeResult<Vec<ModelRef>>> = Vec::new();
                let mut page: Vec<ModelRef> = Vec::new();
                for record in records {
                    page.push(record);
                    if page.len() == size {
                        pages.push(Ok(std::mem::take(&mut page)));
                    }
                }
                if !page.is_empty() {
                    pages.push(Ok(page));
                }
                stream::iter(pages)
            })
            .try_flatten()
            .boxed()
    }
}
