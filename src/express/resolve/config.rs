use super::Filter;
use crate::express::QueryFlags;
use crate::handler::{BoxError, request::RouteParams};
use std::fmt;
use std::sync::Arc;

/// Builds a filter from the request's route params.
pub type Composer = Arc<dyn Fn(&RouteParams) -> Result<Filter, BoxError> + Send + Sync>;

/// Adjusts a pending query before it runs, given the request's query flags.
pub type PrepareQuery<Q> = Arc<dyn Fn(&mut Q, Option<&QueryFlags>) + Send + Sync>;

/// Where the lookup condition comes from.
#[derive(Clone)]
pub enum Condition {
    /// `{ <index>: params[name] }`
    ByParamName(String),
    /// The composer's filter, used as is.
    ByComposer(Composer),
}

impl Condition {
    pub fn param(name: impl Into<String>) -> Self {
        Condition::ByParamName(name.into())
    }

    pub fn compose<F>(composer: F) -> Self
    where
        F: Fn(&RouteParams) -> Result<Filter, BoxError> + Send + Sync + 'static,
    {
        Condition::ByComposer(Arc::new(composer))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::ByParamName(name) => f.debug_tuple("ByParamName").field(name).finish(),
            Condition::ByComposer(_) => f.write_str("ByComposer(<fn>)"),
        }
    }
}

/// How a model name turns into the property name (and default param name).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingPolicy {
    /// `"Vod"` -> `"vod"`
    #[default]
    Lowercase,
    /// `"vod"` -> `"Vod"`; the rest of the name is kept as is.
    CapitalizeFirst,
}

impl NamingPolicy {
    pub fn apply(self, model_name: &str) -> String {
        match self {
            NamingPolicy::Lowercase => model_name.to_lowercase(),
            NamingPolicy::CapitalizeFirst => {
                let mut chars = model_name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Options fixed when a resolver is created.
pub struct ResolveConfig<Q> {
    /// Filter key used with [`Condition::ByParamName`] and the default
    /// condition. Defaults to `"id"`.
    pub index: String,
    /// `None` reads the param named after the derived property.
    pub condition: Option<Condition>,
    pub prepare: Option<PrepareQuery<Q>>,
    pub naming: NamingPolicy,
}

impl<Q> Default for ResolveConfig<Q> {
    fn default() -> Self {
        Self {
            index: "id".to_string(),
            condition: None,
            prepare: None,
            naming: NamingPolicy::default(),
        }
    }
}

impl<Q> Clone for ResolveConfig<Q> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            condition: self.condition.clone(),
            prepare: self.prepare.clone(),
            naming: self.naming,
        }
    }
}

impl<Q> fmt::Debug for ResolveConfig<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveConfig")
            .field("index", &self.index)
            .field("condition", &self.condition)
            .field("prepare", &self.prepare.as_ref().map(|_| "<fn>"))
            .field("naming", &self.naming)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_policies() {
        assert_eq!(NamingPolicy::Lowercase.apply("Vod"), "vod");
        assert_eq!(NamingPolicy::Lowercase.apply("LiveChannel"), "livechannel");
        assert_eq!(NamingPolicy::CapitalizeFirst.apply("Vod"), "Vod");
        assert_eq!(NamingPolicy::CapitalizeFirst.apply("vod"), "Vod");
        assert_eq!(NamingPolicy::CapitalizeFirst.apply("liveChannel"), "LiveChannel");
        assert_eq!(NamingPolicy::CapitalizeFirst.apply(""), "");
    }

    #[test]
    fn defaults() {
        let config = ResolveConfig::<()>::default();
        assert_eq!(config.index, "id");
        assert!(config.condition.is_none());
        assert!(config.prepare.is_none());
        assert_eq!(config.naming, NamingPolicy::Lowercase);
    }
}
