use crate::application::App;
use crate::handler::{BoxError, Request, Response};
use hyper::{
    StatusCode,
    header::{ACCEPT, HeaderValue},
};
use log::error;
use serde_json::{Value, json};

mod logging;
mod query_flags;
pub mod resolve;

pub use logging::LoggingMiddleware;
pub use query_flags::{QueryFlags, QueryFlagsMiddleware};
pub use resolve::{
    Condition, Filter, Model, NamingPolicy, PendingQuery, ResolveBuilder, ResolveConfig,
    ResolveError, ResolveMiddleware, Resolved, ResolvedKey, StoreError, resolve,
};

pub fn app() -> App {
    App::default()
}

/// Returns `true` when the `Accept` header asks for JSON.
pub(crate) fn client_prefers_json(req: &Request) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Writes an error body as JSON or plain text and ends the response.
pub(crate) fn respond_error(
    res: &mut Response,
    status: StatusCode,
    message: &str,
    body: Value,
    wants_json: bool,
) {
    res.status(status);

    if wants_json && res.json(&body).is_ok() {
        return;
    }

    res.r#type(HeaderValue::from_static("text/plain; charset=utf-8"))
        .send(message);
}

/// Error handler installed on every new router.
///
/// Logs the failure and answers `500 Internal Server Error`. The error text
/// is not sent to the client.
pub fn default_error_handler(err: &BoxError, req: &Request, res: &mut Response) {
    error!("{} {} failed: {}", req.method(), req.uri().path(), err);

    respond_error(
        res,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        json!({ "error": "Internal Server Error" }),
        client_prefers_json(req),
    );
}
