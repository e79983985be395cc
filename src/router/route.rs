use crate::handler::{Middleware, MiddlewareResult, Request, Response};
use hyper::Method;
use std::fmt;
use std::sync::Arc;

/// Handlers registered for a single path pattern.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    stack: Vec<(Method, Arc<dyn Middleware>)>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, method: Method, handler: Arc<dyn Middleware>) -> &mut Self {
        self.stack.push((method, handler));
        self
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.stack.iter().any(|(m, _)| m == method)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.stack.iter().map(|(m, _)| m)
    }

    /// Runs every handler registered for `method`, in order, until one of
    /// them stops the chain or fails.
    pub(crate) async fn dispatch(
        &self,
        method: &Method,
        req: &mut Request,
        res: &mut Response,
    ) -> MiddlewareResult {
        for (_, handler) in self.stack.iter().filter(|(m, _)| m == method) {
            match handler.call(req, res).await {
                MiddlewareResult::Next => continue,
                outcome => return outcome,
            }
        }

        MiddlewareResult::Next
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("methods", &self.methods().collect::<Vec<_>>())
            .finish()
    }
}
