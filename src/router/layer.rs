use crate::handler::Middleware;
use std::fmt;
use std::sync::Arc;

/// One entry of the router stack, run in registration order.
#[derive(Clone)]
pub(crate) enum Layer {
    /// Runs for every request that reaches it.
    Middleware(Arc<dyn Middleware>),
    /// Index into `Router::routes`; runs only when that route matched.
    Route(usize),
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Middleware(_) => f.write_str("Middleware(<middleware>)"),
            Layer::Route(id) => f.debug_tuple("Route").field(id).finish(),
        }
    }
}
