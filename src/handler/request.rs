use crate::express::{QueryFlags, Resolved};
use bytes::Bytes;
use hyper::Request as HRequest;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Aliased request type. The body is fully buffered before the chain runs.
pub type Request = HRequest<Bytes>;

static EMPTY_PARAMS: Lazy<RouteParams> = Lazy::new(RouteParams::default);

/// Wrapper type for route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Returns a parameter by key as `Option<&str>`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if the specified key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of stored parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
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

/// Public extension trait for the per-request state kept in extensions.
pub trait RequestExt {
    /// Route parameters captured by the router. Empty when no route matched.
    fn params(&self) -> &RouteParams;

    /// Query flags, if `QueryFlagsMiddleware` ran for this request.
    fn flags(&self) -> Option<&QueryFlags>;

    /// Records resolved so far, if any resolver ran for this request.
    fn resolved(&self) -> Option<&Resolved>;

    /// The resolved-records container, created empty on first access.
    fn resolved_mut(&mut self) -> &mut Resolved;
}

/// Internal-only trait for setting route parameters.
pub(crate) trait RequestExtInternal {
    fn set_params(&mut self, params: RouteParams);
}

impl RequestExt for Request {
    fn params(&self) -> &RouteParams {
        self.extensions()
            .get::<RouteParams>()
            .unwrap_or(&EMPTY_PARAMS)
    }

    fn flags(&self) -> Option<&QueryFlags> {
        self.extensions().get::<QueryFlags>()
    }

    fn resolved(&self) -> Option<&Resolved> {
        self.extensions().get::<Resolved>()
    }

    fn resolved_mut(&mut self) -> &mut Resolved {
        self.extensions_mut().get_or_insert_default::<Resolved>()
    }
}

impl RequestExtInternal for Request {
    fn set_params(&mut self, params: RouteParams) {
        self.extensions_mut().insert(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        HRequest::builder().uri("/").body(Bytes::new()).unwrap()
    }

    #[test]
    fn params_default_to_empty() {
        let req = request();
        assert!(req.params().is_empty());
        assert!(req.flags().is_none());
        assert!(req.resolved().is_none());
    }

    #[test]
    fn resolved_is_created_once() {
        let mut req = request();
        req.resolved_mut().insert("vod", Some(1_u32));
        req.resolved_mut();

        assert_eq!(req.resolved().unwrap().get::<u32>("vod"), Some(&1));
    }

    #[test]
    fn set_params_replaces_previous() {
        let mut req = request();
        req.set_params([("vod", "a")].into_iter().collect());
        req.set_params([("vod", "b")].into_iter().collect());
        assert_eq!(req.params().get("vod"), Some("b"));
    }
}
