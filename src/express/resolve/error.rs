use super::StoreError;
use crate::handler::BoxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("model name must not be empty")]
    EmptyModelName,

    #[error("failed to compose lookup condition for {model}: {source}")]
    Compose {
        model: String,
        #[source]
        source: BoxError,
    },

    #[error("lookup on {model} failed: {source}")]
    Store {
        model: String,
        #[source]
        source: StoreError,
    },
}
