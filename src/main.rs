use express_resolve::{
    app,
    express::{
        Filter, LoggingMiddleware, QueryFlags, QueryFlagsMiddleware, ResolveConfig, ResolveMiddleware,
        resolve,
        resolve::memory::{MemoryModel, MemoryQuery},
    },
    handler::{BoxError, MiddlewareResult, Request, RequestExt, Response, middleware::stop},
};
use hyper::StatusCode;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::init();

    let mut app = app();
    const PORT: u16 = 8080;

    let vods = MemoryModel::with_documents(
        "Vod",
        [
            json!({ "id": "abc123", "slug": "intro", "title": "Intro", "channel": "main" }),
            json!({ "id": "def456", "slug": "outro", "title": "Outro", "channel": "main" }),
        ],
    );
    let channels = MemoryModel::with_documents("Channel", [json!({ "id": "main", "name": "Main" })]);

    app.use_with(QueryFlagsMiddleware);
    app.use_with(LoggingMiddleware);

    // GET /vods/abc123?fields=title
    app.get(
        "/vods/:vod",
        ResolveMiddleware::builder(vods.clone())
            .prepare(|query: &mut MemoryQuery, flags: Option<&QueryFlags>| {
                if let Some(fields) = flags.map(|f| f.list("fields")).filter(|f| !f.is_empty()) {
                    query.select(fields);
                }
            })
            .build(),
    )?;
    app.get("/vods/:vod", send_resolved("vod"))?;

    // GET /slugs/intro
    app.get(
        "/slugs/:slug",
        ResolveMiddleware::builder(vods.clone())
            .compose(|params| Ok(Filter::by("slug", params.get("slug").unwrap_or_default())))
            .build(),
    )?;
    app.get("/slugs/:slug", send_resolved("vod"))?;

    // GET /channels/main/vods/def456
    app.get("/channels/:channel/vods/:vod", resolve(channels, ResolveConfig::default()))?;
    app.get("/channels/:channel/vods/:vod", resolve(vods, ResolveConfig::default()))?;
    app.get(
        "/channels/:channel/vods/:vod",
        |req: &mut Request, res: &mut Response| {
            let Some(resolved) = req.resolved() else {
                return stop();
            };

            let body = json!({
                "channel": resolved.get::<Value>("channel"),
                "vod": resolved.get::<Value>("vod"),
            });
            if res.json(body).is_err() {
                res.status(StatusCode::INTERNAL_SERVER_ERROR);
            }
            stop()
        },
    )?;

    app.listen(PORT, || println!("Server listening on port {}", PORT))
        .await
}

/// Answers with the record stored under `key`, or 404 on a miss.
fn send_resolved(key: &'static str) -> impl Fn(&mut Request, &mut Response) -> MiddlewareResult {
    move |req: &mut Request, res: &mut Response| {
        match req.resolved().and_then(|r| r.get::<Value>(key)) {
            Some(record) => {
                if res.json(record).is_err() {
                    res.status(StatusCode::INTERNAL_SERVER_ERROR);
                }
            }
            None => {
                res.status(StatusCode::NOT_FOUND).send("Not Found");
            }
        }
        stop()
    }
}
