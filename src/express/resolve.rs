//! Route-param record resolution.
//!
//! A [`ResolveMiddleware`] looks up one record through a [`Model`] using an
//! identifier taken from the route params and stores the outcome in the
//! request's [`Resolved`] container:
//!
//! ```rust,ignore
//! let vods = MemoryModel::new("Vod");
//!
//! app.get("/foo/:vod", resolve(vods, ResolveConfig::default()))?;
//! app.get("/foo/:vod", |req: &mut Request, res: &mut Response| {
//!     let vod = req.resolved().and_then(|r| r.get::<Value>("vod"));
//!     // ...
//! })?;
//! ```
//!
//! A miss is not an error: the key is written with no record and the chain
//! continues. Store and composer failures are handed to the app's error
//! handler.

use crate::express::QueryFlags;
use crate::handler::{
    Request, RequestExt, Response,
    middleware::{Middleware, MiddlewareResult, fail, next},
    request::RouteParams,
};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

mod config;
mod error;
mod filter;
pub mod memory;
mod model;
mod resolved;

pub use config::{Composer, Condition, NamingPolicy, PrepareQuery, ResolveConfig};
pub use error::ResolveError;
pub use filter::Filter;
pub use model::{Model, PendingQuery, RecordOf, StoreError};
pub use resolved::{Resolved, ResolvedKey};

/// Creates a resolver for `model`.
pub fn resolve<M: Model>(model: M, config: ResolveConfig<M::Query>) -> ResolveMiddleware<M> {
    ResolveMiddleware::new(model, config)
}

/// Middleware that resolves one record per request. See the module docs.
pub struct ResolveMiddleware<M: Model> {
    model: M,
    config: ResolveConfig<M::Query>,
}

impl<M: Model> ResolveMiddleware<M> {
    pub fn new(model: M, config: ResolveConfig<M::Query>) -> Self {
        Self { model, config }
    }

    pub fn builder(model: M) -> ResolveBuilder<M> {
        ResolveBuilder {
            model,
            config: ResolveConfig::default(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn config(&self) -> &ResolveConfig<M::Query> {
        &self.config
    }

    /// Key written into [`Resolved`]; depends only on the model name and the
    /// naming policy.
    pub fn property_name(&self) -> Result<String, ResolveError> {
        match self.model.model_name() {
            "" => Err(ResolveError::EmptyModelName),
            name => Ok(self.config.naming.apply(name)),
        }
    }

    /// Typed handle for reading this resolver's record back.
    pub fn key(&self) -> Result<ResolvedKey<RecordOf<M>>, ResolveError> {
        self.property_name().map(ResolvedKey::new)
    }

    /// Builds the lookup filter for `params`. `property` is the fallback
    /// param name when no condition is configured.
    pub fn filter_for(&self, params: &RouteParams, property: &str) -> Result<Filter, ResolveError> {
        match &self.config.condition {
            Some(Condition::ByComposer(compose)) => {
                compose(params).map_err(|source| ResolveError::Compose {
                    model: self.model.model_name().to_string(),
                    source,
                })
            }
            Some(Condition::ByParamName(name)) => Ok(self.by_param(params, name)),
            None => Ok(self.by_param(params, property)),
        }
    }

    fn by_param(&self, params: &RouteParams, name: &str) -> Filter {
        let value = params
            .get(name)
            .map_or(Value::Null, |v| Value::String(v.to_string()));
        Filter::by(self.config.index.clone(), value)
    }

    /// Runs the lookup and records its outcome on `req`.
    pub async fn resolve(&self, req: &mut Request) -> Result<(), ResolveError> {
        let property = self.property_name()?;
        req.resolved_mut();

        let filter = self.filter_for(req.params(), &property)?;
        debug!("resolving {} with {}", self.model.model_name(), filter);

        let mut query = self.model.find_one(filter);
        if let Some(prepare) = &self.config.prepare {
            prepare(&mut query, req.flags());
        }

        let record = query.exec().await.map_err(|source| ResolveError::Store {
            model: self.model.model_name().to_string(),
            source,
        })?;

        debug!(
            "resolved {} -> {}",
            property,
            if record.is_some() { "found" } else { "missing" }
        );
        req.resolved_mut().insert(property, record);

        Ok(())
    }
}

impl<M: Model> fmt::Debug for ResolveMiddleware<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveMiddleware")
            .field("model", &self.model.model_name())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl<M: Model> Middleware for ResolveMiddleware<M> {
    async fn call(&self, req: &mut Request, _res: &mut Response) -> MiddlewareResult {
        match self.resolve(req).await {
            Ok(()) => next(),
            Err(err) => {
                warn!("{} {}: {}", req.method(), req.uri().path(), err);
                fail(err)
            }
        }
    }
}

/// Fluent construction of a [`ResolveMiddleware`].
pub struct ResolveBuilder<M: Model> {
    model: M,
    config: ResolveConfig<M::Query>,
}

impl<M: Model> ResolveBuilder<M> {
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.config.index = index.into();
        self
    }

    /// Reads the identifier from the route param `name`.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.config.condition = Some(Condition::param(name));
        self
    }

    /// Replaces filter construction entirely.
    pub fn compose<F>(mut self, composer: F) -> Self
    where
        F: Fn(&RouteParams) -> Result<Filter, crate::handler::BoxError> + Send + Sync + 'static,
    {
        self.config.condition = Some(Condition::compose(composer));
        self
    }

    pub fn prepare<F>(mut self, prepare: F) -> Self
    where
        F: Fn(&mut M::Query, Option<&QueryFlags>) + Send + Sync + 'static,
    {
        self.config.prepare = Some(Arc::new(prepare));
        self
    }

    pub fn naming(mut self, naming: NamingPolicy) -> Self {
        self.config.naming = naming;
        self
    }

    pub fn build(self) -> ResolveMiddleware<M> {
        ResolveMiddleware::new(self.model, self.config)
    }
}
