use crate::express::default_error_handler;
use crate::handler::{
    BoxError, Middleware, MiddlewareResult, Request, Response,
    request::{RequestExtInternal, RouteParams},
};
use hyper::{
    Method, StatusCode,
    header::{self, HeaderValue},
};
use layer::Layer;
use matchit::Router as MatchitRouter;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

mod layer;
mod path;
mod route;

pub use route::Route;

/// Called with the failure carried by `MiddlewareResult::Error`.
pub type ErrorHandler = Arc<dyn Fn(&BoxError, &Request, &mut Response) + Send + Sync>;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Invalid route pattern {path:?}: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}

#[derive(Clone)]
pub struct Router {
    stack: Vec<Layer>,
    routes: Vec<Route>,
    patterns: FxHashMap<String, usize>,
    matcher: MatchitRouter<usize>,
    error_handler: ErrorHandler,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            routes: Vec::new(),
            patterns: FxHashMap::default(),
            matcher: MatchitRouter::new(),
            error_handler: Arc::new(default_error_handler),
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("stack", &self.stack)
            .field("routes", &self.routes)
            .finish()
    }
}

impl Router {
    /// Returns the route for `path`, creating it (and its stack layer) on
    /// first use. Accepts both `:param` and `{param}` placeholders.
    pub fn route(&mut self, path: impl AsRef<str>) -> Result<&mut Route, RouterError> {
        let pattern = path::normalize(path.as_ref());

        let id = match self.patterns.get(&pattern) {
            Some(id) => *id,
            None => {
                let id = self.routes.len();
                self.matcher
                    .insert(pattern.clone(), id)
                    .map_err(|source| RouterError::InvalidPattern {
                        path: path.as_ref().to_string(),
                        source,
                    })?;
                self.patterns.insert(pattern.clone(), id);
                self.routes.push(Route::new(pattern));
                self.stack.push(Layer::Route(id));
                id
            }
        };

        Ok(&mut self.routes[id])
    }

    pub fn use_with<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.stack.push(Layer::Middleware(Arc::new(middleware)));
        self
    }

    pub fn on_error(&mut self, handler: ErrorHandler) -> &mut Self {
        self.error_handler = handler;
        self
    }

    pub async fn handle(&self, req: &mut Request, res: &mut Response) {
        let (route_id, params) = match self.matcher.at(path::lookup_path(req.uri().path())) {
            Ok(m) => (
                Some(*m.value),
                m.params
                    .iter()
                    .map(|(k, v)| (k, path::decode_param(v)))
                    .collect::<RouteParams>(),
            ),
            Err(_) => (None, RouteParams::default()),
        };
        req.set_params(params);

        let method = req.method().clone();
        let mut method_matched = false;

        for layer in &self.stack {
            let outcome = match layer {
                Layer::Middleware(middleware) => middleware.call(req, res).await,
                Layer::Route(id) => {
                    if route_id != Some(*id) {
                        continue;
                    }

                    let route = &self.routes[*id];
                    if !route.allows(&method) {
                        continue;
                    }

                    method_matched = true;
                    route.dispatch(&method, req, res).await
                }
            };

            match outcome {
                MiddlewareResult::Next => {}
                MiddlewareResult::Stop => return,
                MiddlewareResult::Error(err) => {
                    (self.error_handler)(&err, req, res);
                    return;
                }
            }
        }

        if res.is_ended() {
            return;
        }

        match route_id {
            Some(id) if !method_matched => {
                let allow = self.routes[id]
                    .methods()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    res.header(header::ALLOW, value);
                }
                res.status(StatusCode::METHOD_NOT_ALLOWED)
                    .send("Method Not Allowed");
            }
            _ => {
                res.status(StatusCode::NOT_FOUND).send("Not Found");
            }
        }
    }
}
