pub mod middleware;
pub mod request;
pub mod response;

pub use middleware::{BoxError, Middleware, MiddlewareResult};
pub use request::{Request, RequestExt};
pub use response::Response;
