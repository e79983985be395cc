use crate::handler::{
    Request, RequestExt, Response,
    middleware::{Middleware, MiddlewareResult, next},
};
use async_trait::async_trait;
use log::info;

/// Middleware that logs each incoming HTTP request.
///
/// Logs the method, path, captured route parameters and user agent at the
/// point where it sits in the chain. Register it with `use_with` to see
/// every request.
///
/// Example log output:
/// ```text
/// GET /channels/main/vods/abc123 {channel=main, vod=abc123} - User-Agent: curl/8.5.0
/// ```
#[derive(Debug, Clone)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    fn describe(req: &Request) -> String {
        let mut params: Vec<_> = req
            .params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        params.sort();

        format!(
            "{} {} {{{}}} - User-Agent: {}",
            req.method(),
            req.uri().path(),
            params.join(", "),
            req.headers()
                .get("User-Agent")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("Unknown")
        )
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn call(&self, req: &mut Request, _res: &mut Response) -> MiddlewareResult {
        info!("{}", Self::describe(req));
        next()
    }
}
