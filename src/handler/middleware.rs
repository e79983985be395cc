use super::{Request, Response};
use async_trait::async_trait;

/// Type-erased error carried through the middleware chain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a single middleware invocation.
///
/// `Next` continues the chain, `Stop` ends it with whatever the response
/// currently holds, and `Error` hands the failure to the application's
/// error handler.
#[derive(Debug)]
pub enum MiddlewareResult {
    Next,
    Stop,
    Error(BoxError),
}

/// Trait for middleware handlers.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn call(&self, req: &mut Request, res: &mut Response) -> MiddlewareResult;
}

pub fn next() -> MiddlewareResult {
    MiddlewareResult::Next
}

pub fn stop() -> MiddlewareResult {
    MiddlewareResult::Stop
}

pub fn fail(err: impl Into<BoxError>) -> MiddlewareResult {
    MiddlewareResult::Error(err.into())
}

impl MiddlewareResult {
    pub fn is_next(&self) -> bool {
        matches!(self, MiddlewareResult::Next)
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, MiddlewareResult::Stop)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MiddlewareResult::Error(_))
    }
}

/// Blanket impl so plain closures can be registered as handlers.
#[async_trait]
impl<F> Middleware for F
where
    F: Fn(&mut Request, &mut Response) -> MiddlewareResult + Send + Sync + 'static,
{
    async fn call(&self, req: &mut Request, res: &mut Response) -> MiddlewareResult {
        (self)(req, res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn request() -> Request {
        hyper::Request::builder()
            .uri("/")
            .body(Bytes::new())
            .unwrap()
    }

    #[tokio::test]
    async fn closures_are_middleware() {
        let handler = |_req: &mut Request, res: &mut Response| {
            res.send("hi");
            stop()
        };

        let mut req = request();
        let mut res = Response::new();
        let outcome = Middleware::call(&handler, &mut req, &mut res).await;

        assert!(outcome.is_stop());
        assert!(res.is_ended());
        assert_eq!(res.body(), b"hi".as_slice());
    }

    #[test]
    fn fail_boxes_the_error() {
        let outcome = fail(std::io::Error::other("boom"));
        match outcome {
            MiddlewareResult::Error(e) => assert_eq!(e.to_string(), "boom"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
