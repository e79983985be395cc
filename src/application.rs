use crate::handler::{BoxError, Middleware, Request as ExpressRequest, Response as ExpressResponse};
use crate::router::{Route, Router, RouterError};
use crate::server::Server;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use log::{info, warn};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct App {
    router: Arc<Router>,
}

impl App {
    fn router_mut(&mut self) -> &mut Router {
        Arc::make_mut(&mut self.router)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub async fn handle(&self, req: &mut ExpressRequest, res: &mut ExpressResponse) {
        self.router.handle(req, res).await;
    }

    pub fn use_with<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.router_mut().use_with(middleware);
        self
    }

    /// Replaces the handler that turns chain failures into responses.
    pub fn on_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&BoxError, &ExpressRequest, &mut ExpressResponse) + Send + Sync + 'static,
    {
        self.router_mut().on_error(Arc::new(handler));
        self
    }

    pub fn route(&mut self, path: impl AsRef<str>) -> Result<&mut Route, RouterError> {
        self.router_mut().route(path)
    }

    pub async fn listen<T: FnOnce()>(self, port: u16, callback: T) -> Result<(), BoxError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let handler_factory = move || self.clone();

        callback();

        Server::bind(addr, handler_factory).await
    }
}

impl Service<Request<Incoming>> for App {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let app = self.clone();

        Box::pin(async move {
            let start = Instant::now();
            let (parts, body) = req.into_parts();

            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!("failed to read request body: {}", e);
                    let mut res = ExpressResponse::new();
                    res.status(StatusCode::BAD_REQUEST).send("Bad Request");
                    return Ok(res.into_hyper());
                }
            };

            let mut req = ExpressRequest::from_parts(parts, body);
            let mut res = ExpressResponse::new();
            app.handle(&mut req, &mut res).await;

            if cfg!(debug_assertions) {
                info!(
                    "{} {} {} ({} ms)",
                    req.method(),
                    req.uri().path(),
                    res.current_status().as_u16(),
                    start.elapsed().as_millis()
                );
            }

            Ok(res.into_hyper())
        })
    }
}

macro_rules! generate_methods {
    (
        methods: [$($method:ident => $constant:ident),* $(,)?]
    ) => {
        impl App {
            $(
                #[doc = concat!("Registers `handler` for `", stringify!($constant), "` requests on `path`.")]
                pub fn $method<M: Middleware>(
                    &mut self,
                    path: impl AsRef<str>,
                    handler: M,
                ) -> Result<&mut Self, RouterError> {
                    self.router_mut()
                        .route(path)?
                        .push(Method::$constant, Arc::new(handler));
                    Ok(self)
                }
            )*
        }
    };
}

generate_methods! {
    methods: [
        get => GET,
        post => POST,
        put => PUT,
        delete => DELETE,
        patch => PATCH,
        head => HEAD,
        options => OPTIONS,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::middleware::stop;

    #[tokio::test]
    async fn registration_after_clone_does_not_leak() {
        let mut app = App::default();
        app.get("/a", |_: &mut ExpressRequest, res: &mut ExpressResponse| {
            res.send("a");
            stop()
        })
        .unwrap();

        let snapshot = app.clone();
        app.get("/b", |_: &mut ExpressRequest, res: &mut ExpressResponse| {
            res.send("b");
            stop()
        })
        .unwrap();

        let mut req = hyper::Request::builder()
            .uri("/b")
            .body(Bytes::new())
            .unwrap();
        let mut res = ExpressResponse::new();
        snapshot.handle(&mut req, &mut res).await;
        assert_eq!(res.current_status(), StatusCode::NOT_FOUND);

        let mut res = ExpressResponse::new();
        app.handle(&mut req, &mut res).await;
        assert_eq!(res.body(), b"b".as_slice());
    }
}
