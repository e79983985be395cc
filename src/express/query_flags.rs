use crate::handler::{
    Request, Response,
    middleware::{Middleware, MiddlewareResult, next},
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// Flags parsed from the request's query string.
///
/// Resolvers forward them verbatim to their `prepare` hook so a route can
/// honour things like `?fields=title,slug` without knowing about the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryFlags(HashMap<String, String>);

impl QueryFlags {
    /// Parses an `application/x-www-form-urlencoded` query string. Later
    /// duplicates win.
    pub fn parse(query: &str) -> Self {
        Self(
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Splits a comma separated flag into its trimmed, non-empty items.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryFlags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Middleware that stores the parsed query string as [`QueryFlags`].
///
/// Requests without a query string get no flags at all, so downstream
/// `prepare` hooks receive `None`.
#[derive(Debug, Clone, Default)]
pub struct QueryFlagsMiddleware;

#[async_trait]
impl Middleware for QueryFlagsMiddleware {
    async fn call(&self, req: &mut Request, _res: &mut Response) -> MiddlewareResult {
        if let Some(query) = req.uri().query() {
            let flags = QueryFlags::parse(query);
            req.extensions_mut().insert(flags);
        }
        next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RequestExt;
    use bytes::Bytes;

    #[test]
    fn parses_and_splits_lists() {
        let flags = QueryFlags::parse("fields=title,%20slug,&populate=channel");

        assert_eq!(flags.get("populate"), Some("channel"));
        assert_eq!(flags.list("fields"), vec!["title", "slug"]);
        assert!(flags.list("missing").is_empty());
        assert_eq!(flags.len(), 2);
    }

    #[tokio::test]
    async fn middleware_only_sets_flags_when_present() {
        let mut with_query = hyper::Request::builder()
            .uri("/foo?fields=title")
            .body(Bytes::new())
            .unwrap();
        let mut without_query = hyper::Request::builder()
            .uri("/foo")
            .body(Bytes::new())
            .unwrap();
        let mut res = Response::new();

        QueryFlagsMiddleware.call(&mut with_query, &mut res).await;
        QueryFlagsMiddleware.call(&mut without_query, &mut res).await;

        assert_eq!(with_query.flags().unwrap().get("fields"), Some("title"));
        assert!(without_query.flags().is_none());
    }
}
