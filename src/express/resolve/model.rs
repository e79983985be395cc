use super::Filter;
use crate::handler::BoxError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a document store while executing a query.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    #[error("driver error: {0}")]
    Driver(#[from] BoxError),
}

/// A named record type in a document store.
pub trait Model: Send + Sync + 'static {
    type Query: PendingQuery;

    /// Name of the record type, e.g. `"Vod"`.
    fn model_name(&self) -> &str;

    /// Builds, but does not run, a single-record lookup.
    fn find_one(&self, filter: Filter) -> Self::Query;
}

/// A lookup that has been built but not yet executed.
///
/// Implementors expose their own mutation methods (projection, population,
/// ...) which `prepare` hooks call before [`exec`](PendingQuery::exec).
#[async_trait]
pub trait PendingQuery: Send + 'static {
    type Record: Send + Sync + 'static;

    async fn exec(self) -> Result<Option<Self::Record>, StoreError>;
}

/// Record type produced by a model's queries.
pub type RecordOf<M> = <<M as Model>::Query as PendingQuery>::Record;

impl<M: Model> Model for Arc<M> {
    type Query = M::Query;

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn find_one(&self, filter: Filter) -> Self::Query {
        (**self).find_one(filter)
    }
}
