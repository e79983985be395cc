use super::{Filter, Model, PendingQuery, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process document collection.
///
/// Backs the demo binary and tests; clones share the same documents.
#[derive(Debug, Clone)]
pub struct MemoryModel {
    name: String,
    documents: Arc<RwLock<Vec<Value>>>,
}

impl MemoryModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_documents(name, Vec::new())
    }

    pub fn with_documents(name: impl Into<String>, documents: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(RwLock::new(documents.into_iter().collect())),
        }
    }

    pub async fn insert(&self, document: Value) {
        self.documents.write().await.push(document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Model for MemoryModel {
    type Query = MemoryQuery;

    fn model_name(&self) -> &str {
        &self.name
    }

    fn find_one(&self, filter: Filter) -> MemoryQuery {
        MemoryQuery {
            documents: Arc::clone(&self.documents),
            filter,
            projection: None,
        }
    }
}

/// Pending `find_one` against a [`MemoryModel`].
#[derive(Debug)]
pub struct MemoryQuery {
    documents: Arc<RwLock<Vec<Value>>>,
    filter: Filter,
    projection: Option<Vec<String>>,
}

impl MemoryQuery {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Restricts the returned document to `fields`.
    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }
}

fn project(document: Value, fields: &[String]) -> Value {
    match document {
        Value::Object(mut object) => {
            let mut projected = Map::new();
            for field in fields {
                if let Some(value) = object.remove(field) {
                    projected.insert(field.clone(), value);
                }
            }
            Value::Object(projected)
        }
        other => other,
    }
}

#[async_trait]
impl PendingQuery for MemoryQuery {
    type Record = Value;

    async fn exec(self) -> Result<Option<Value>, StoreError> {
        let found = {
            let documents = self.documents.read().await;
            documents.iter().find(|doc| self.filter.matches(doc)).cloned()
        };

        Ok(found.map(|doc| match &self.projection {
            Some(fields) => project(doc, fields),
            None => doc,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vods() -> MemoryModel {
        MemoryModel::with_documents(
            "Vod",
            [
                json!({ "id": "abc123", "slug": "intro", "title": "Intro" }),
                json!({ "id": "def456", "slug": "outro", "title": "Outro" }),
            ],
        )
    }

    #[tokio::test]
    async fn finds_first_match() {
        let found = vods().find_one(Filter::by("slug", "outro")).exec().await.unwrap();
        assert_eq!(found.unwrap()["id"], "def456");
    }

    #[tokio::test]
    async fn miss_is_none() {
        let found = vods().find_one(Filter::by("id", "nope")).exec().await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn select_projects_fields() {
        let mut query = vods().find_one(Filter::by("id", "abc123"));
        query.select(["title"]);

        let found = query.exec().await.unwrap().unwrap();
        assert_eq!(found, json!({ "title": "Intro" }));
    }

    #[tokio::test]
    async fn clones_share_documents() {
        let model = MemoryModel::new("Channel");
        let clone = model.clone();
        clone.insert(json!({ "id": "main" })).await;

        assert_eq!(model.len().await, 1);
    }
}
