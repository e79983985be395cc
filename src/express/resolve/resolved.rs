use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Slot = Option<Arc<dyn Any + Send + Sync>>;

/// Records resolved for the current request, keyed by property name.
///
/// Lives in the request extensions and is shared by every resolver in the
/// chain. Entries keep the order in which resolvers ran. A key that is
/// present with no record means the lookup ran and found nothing.
#[derive(Clone, Default)]
pub struct Resolved {
    entries: SmallVec<[(String, Slot); 4]>,
}

/// Typed handle to one entry of [`Resolved`].
pub struct ResolvedKey<T> {
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> ResolvedKey<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for ResolvedKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl<T> fmt::Debug for ResolvedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResolvedKey").field(&self.name).finish()
    }
}

impl Resolved {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome of a lookup. Writing an existing key replaces its
    /// record in place; other keys are never touched.
    pub fn insert<T>(&mut self, key: impl Into<String>, record: Option<T>)
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        let slot: Slot = record.map(|r| Arc::new(r) as Arc<dyn Any + Send + Sync>);

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = slot,
            None => self.entries.push((key, slot)),
        }
    }

    /// The record stored under `key`, if found and of type `T`.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.slot(key)?
            .as_ref()
            .and_then(|record| (**record).downcast_ref::<T>())
    }

    pub fn get_key<T: 'static>(&self, key: &ResolvedKey<T>) -> Option<&T> {
        self.get(key.name())
    }

    /// `true` once a resolver has written `key`, found or not.
    pub fn contains(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    /// `true` if a record was found for `key`.
    pub fn is_found(&self, key: &str) -> bool {
        matches!(self.slot(key), Some(Some(_)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot(&self, key: &str) -> Option<&Slot> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, slot)| slot)
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(k, slot)| (k, if slot.is_some() { "found" } else { "missing" })),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut resolved = Resolved::new();
        resolved.insert("vod", Some("a"));
        resolved.insert("channel", None::<&str>);
        resolved.insert("vod", Some("b"));

        assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["vod", "channel"]);
        assert_eq!(resolved.get::<&str>("vod"), Some(&"b"));
    }

    #[test]
    fn distinguishes_missing_from_unresolved() {
        let mut resolved = Resolved::new();
        resolved.insert("vod", None::<u32>);

        assert!(resolved.contains("vod"));
        assert!(!resolved.is_found("vod"));
        assert!(!resolved.contains("channel"));
        assert_eq!(resolved.get::<u32>("vod"), None);
    }

    #[test]
    fn wrong_type_reads_as_none() {
        let mut resolved = Resolved::new();
        resolved.insert("vod", Some(7_u32));

        assert_eq!(resolved.get::<String>("vod"), None);
        assert_eq!(resolved.get_key(&ResolvedKey::<u32>::new("vod")), Some(&7));
    }
}
