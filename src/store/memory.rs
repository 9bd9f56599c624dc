//! In-memory document store
//!
//! Holds one collection in identifier order and enforces the same query
//! rules as the managed engine:
//! - a range clause must carry at least one bound
//! - a positive limit is required
//! - filtering on a field other than the sort field needs a composite
//!   index; under [`IndexPolicy::Declared`] an undeclared combination
//!   fails with [`StoreError::FailedPrecondition`]

use std::collections::BTreeMap;
use std::fs;
use std::future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document::RawDocument;
use super::errors::{StoreError, StoreResult};
use super::filters::PredicateFilter;
use super::sorter::DocumentSorter;
use super::{ListingStore, StoreFuture, StoreQuery};
use crate::model::fields;

type Documents = BTreeMap<String, Map<String, Value>>;

/// A declared multi-field index. Field order is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeIndex {
    fields: Vec<String>,
}

impl CompositeIndex {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns true if this index covers exactly `fields`
    pub fn covers(&self, fields: &[String]) -> bool {
        self.fields.len() == fields.len() && fields.iter().all(|f| self.fields.contains(f))
    }
}

/// Which multi-field query shapes the store will serve
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Every composite shape is assumed to be indexed
    #[default]
    Permissive,
    /// Only the listed composite indexes exist
    Declared { indexes: Vec<CompositeIndex> },
}

impl IndexPolicy {
    pub fn declared(indexes: impl IntoIterator<Item = CompositeIndex>) -> Self {
        IndexPolicy::Declared {
            indexes: indexes.into_iter().collect(),
        }
    }

    fn serves(&self, fields: &[String]) -> bool {
        match self {
            IndexPolicy::Permissive => true,
            IndexPolicy::Declared { indexes } => indexes.iter().any(|i| i.covers(fields)),
        }
    }
}

/// In-memory listing store
#[derive(Debug)]
pub struct MemoryStore {
    collection: String,
    index_policy: IndexPolicy,
    documents: RwLock<Documents>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store with a permissive index policy
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            index_policy: IndexPolicy::Permissive,
            documents: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }

    /// Toggles simulated availability; while unavailable every call fails
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored documents. Fails if the document map is unusable.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Loads documents as-is. An `id` string in a document is used as its
    /// identifier; otherwise one is generated. Missing timestamps are set.
    ///
    /// All-or-nothing: if any document is not a JSON object, nothing is
    /// loaded.
    pub fn seed(&self, documents: impl IntoIterator<Item = Value>) -> StoreResult<usize> {
        let prepared = documents
            .into_iter()
            .map(|document| {
                let mut body = into_body(document)?;
                let id = match body.remove(fields::ID) {
                    Some(Value::String(id)) if !id.is_empty() => id,
                    _ => new_id(),
                };
                let now = now_iso();
                body.entry(fields::CREATED_AT)
                    .or_insert_with(|| Value::String(now.clone()));
                body.entry(fields::UPDATED_AT)
                    .or_insert_with(|| Value::String(now));
                Ok((id, body))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let count = prepared.len();
        self.write()?.extend(prepared);
        Ok(count)
    }

    /// Loads a JSON array of listings from a file
    pub fn seed_from_file(&self, path: &Path) -> StoreResult<usize> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("failed to read {}: {}", path.display(), e)))?;
        let documents: Vec<Value> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Seed(format!("invalid seed JSON in {}: {}", path.display(), e)))?;
        self.seed(documents)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Documents>> {
        self.documents
            .read()
            .map_err(|_| StoreError::unavailable("document map lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Documents>> {
        self.documents
            .write()
            .map_err(|_| StoreError::unavailable("document map lock poisoned"))
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable(format!(
                "collection '{}' is not reachable",
                self.collection
            )))
        }
    }

    fn check_shape(&self, query: &StoreQuery) -> StoreResult<()> {
        if query.limit == 0 {
            return Err(StoreError::invalid_query("limit must be positive"));
        }
        if let Some(range) = &query.range {
            if range.is_unbounded() {
                return Err(StoreError::invalid_query(format!(
                    "range clause on '{}' has no bounds",
                    range.field
                )));
            }
        }
        if query.requires_composite_index() {
            let fields = query.fields();
            if !self.index_policy.serves(&fields) {
                return Err(StoreError::FailedPrecondition {
                    collection: self.collection.clone(),
                    fields,
                });
            }
        }
        Ok(())
    }

    fn run_query(&self, query: &StoreQuery) -> StoreResult<Vec<RawDocument>> {
        self.check_available()?;
        self.check_shape(query)?;

        let predicates = query.predicates();
        let mut matched: Vec<RawDocument> = self
            .read()?
            .iter()
            .filter(|(_, body)| PredicateFilter::matches(body, &predicates))
            .map(|(id, body)| RawDocument::new(id.clone(), body.clone()))
            .collect();

        DocumentSorter::sort(&mut matched, &query.sort);
        matched.truncate(query.limit);
        Ok(matched)
    }

    fn all(&self) -> StoreResult<Vec<RawDocument>> {
        self.check_available()?;
        Ok(self
            .read()?
            .iter()
            .map(|(id, body)| RawDocument::new(id.clone(), body.clone()))
            .collect())
    }

    fn find(&self, id: &str) -> StoreResult<Option<RawDocument>> {
        self.check_available()?;
        Ok(self
            .read()?
            .get(id)
            .map(|body| RawDocument::new(id, body.clone())))
    }

    fn create(&self, mut body: Map<String, Value>) -> StoreResult<RawDocument> {
        self.check_available()?;
        body.remove(fields::ID);
        let now = Value::String(now_iso());
        body.insert(fields::CREATED_AT.to_string(), now.clone());
        body.insert(fields::UPDATED_AT.to_string(), now);

        let id = new_id();
        self.write()?.insert(id.clone(), body.clone());
        Ok(RawDocument::new(id, body))
    }

    fn merge(&self, id: &str, mut changes: Map<String, Value>) -> StoreResult<Option<RawDocument>> {
        self.check_available()?;
        changes.remove(fields::ID);
        changes.remove(fields::CREATED_AT);

        let mut docs = self.write()?;
        let Some(body) = docs.get_mut(id) else {
            return Ok(None);
        };
        body.extend(changes);
        body.insert(fields::UPDATED_AT.to_string(), Value::String(now_iso()));
        Ok(Some(RawDocument::new(id, body.clone())))
    }

    fn remove(&self, id: &str) -> StoreResult<Option<RawDocument>> {
        self.check_available()?;
        Ok(self
            .write()?
            .remove(id)
            .map(|body| RawDocument::new(id, body)))
    }
}

impl ListingStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch<'a>(&'a self, query: &'a StoreQuery) -> StoreFuture<'a, Vec<RawDocument>> {
        Box::pin(future::ready(self.run_query(query)))
    }

    fn fetch_all(&self) -> StoreFuture<'_, Vec<RawDocument>> {
        Box::pin(future::ready(self.all()))
    }

    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RawDocument>> {
        Box::pin(future::ready(self.find(id)))
    }

    fn insert(&self, body: Map<String, Value>) -> StoreFuture<'_, RawDocument> {
        Box::pin(future::ready(self.create(body)))
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        body: Map<String, Value>,
    ) -> StoreFuture<'a, Option<RawDocument>> {
        Box::pin(future::ready(self.merge(id, body)))
    }

    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RawDocument>> {
        Box::pin(future::ready(self.remove(id)))
    }
}

fn into_body(document: Value) -> StoreResult<Map<String, Value>> {
    match document {
        Value::Object(body) => Ok(body),
        other => Err(StoreError::invalid_document(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Predicate, RangeClause, SortSpec};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new("listings");
        store
            .seed(vec![
                json!({"id": "a", "city": "Anytown", "listPrice": 300000, "listingDate": "2024-01-01"}),
                json!({"id": "b", "city": "Anytown", "listPrice": 500000, "listingDate": "2024-03-01"}),
                json!({"id": "c", "city": "Elsewhere", "listPrice": 400000, "listingDate": "2024-02-01"}),
            ])
            .unwrap();
        store
    }

    fn ids(docs: &[RawDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fetch_filters_sorts_and_limits() {
        let store = seeded();
        let query = StoreQuery {
            equality: vec![],
            range: Some(RangeClause::at_least("listPrice", json!(350000))),
            sort: SortSpec::desc("listPrice"),
            limit: 1,
        };
        let docs = store.fetch(&query).await.unwrap();
        assert_eq!(ids(&docs), vec!["b"]);
    }

    #[tokio::test]
    async fn test_fetch_all_in_id_order() {
        let store = seeded();
        let docs = store.fetch_all().await.unwrap();
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
        assert!(docs[0].get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_declared_policy_rejects_unindexed_shape() {
        let store = seeded().with_index_policy(IndexPolicy::declared([CompositeIndex::new([
            "listingDate",
            "city",
        ])]));

        let served = StoreQuery {
            equality: vec![Predicate::eq("city", json!("Anytown"))],
            range: None,
            sort: SortSpec::desc("listingDate"),
            limit: 20,
        };
        assert_eq!(ids(&store.fetch(&served).await.unwrap()), vec!["b", "a"]);

        let rejected = StoreQuery {
            equality: vec![],
            range: Some(RangeClause::at_least("listPrice", json!(1))),
            sort: SortSpec::desc("listingDate"),
            limit: 20,
        };
        let err = store.fetch(&rejected).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::FailedPrecondition {
                collection: "listings".into(),
                fields: vec!["listPrice".into(), "listingDate".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_declared_policy_serves_single_field_shapes() {
        let store = seeded().with_index_policy(IndexPolicy::declared([]));
        let query = StoreQuery {
            equality: vec![],
            range: Some(RangeClause::between("listPrice", Some(json!(1)), Some(json!(450000)))),
            sort: SortSpec::asc("listPrice"),
            limit: 20,
        };
        assert_eq!(ids(&store.fetch(&query).await.unwrap()), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_invalid_shapes_rejected() {
        let store = seeded();
        let unbounded = StoreQuery {
            equality: vec![],
            range: Some(RangeClause::between("listPrice", None, None)),
            sort: SortSpec::asc("listPrice"),
            limit: 20,
        };
        assert!(matches!(
            store.fetch(&unbounded).await,
            Err(StoreError::InvalidQuery(_))
        ));

        let zero_limit = StoreQuery {
            range: None,
            limit: 0,
            ..unbounded
        };
        assert!(matches!(
            store.fetch(&zero_limit).await,
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = seeded();
        store.set_available(false);
        assert!(matches!(
            store.fetch_all().await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_available(true);
        assert_eq!(store.fetch_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new("listings");
        let doc = store
            .insert(body(json!({"id": "ignored", "city": "Anytown"})))
            .await
            .unwrap();

        assert_ne!(doc.id, "ignored");
        assert!(doc.get("id").is_none());
        assert_eq!(doc.get("createdAt"), doc.get("updatedAt"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_created_at() {
        let store = seeded();
        let before = store.get("a").await.unwrap().unwrap();

        let updated = store
            .update(
                "a",
                body(json!({"listPrice": 310000, "createdAt": "1999-01-01T00:00:00.000Z"})),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get("listPrice"), Some(&json!(310000)));
        assert_eq!(updated.get("city"), Some(&json!("Anytown")));
        assert_eq!(updated.get("createdAt"), before.get("createdAt"));

        assert!(store.update("missing", Map::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_document() {
        let store = seeded();
        let removed = store.delete("c").await.unwrap().unwrap();
        assert_eq!(removed.get("city"), Some(&json!("Elsewhere")));
        assert!(store.get("c").await.unwrap().is_none());
        assert!(store.delete("c").await.unwrap().is_none());
    }

    #[test]
    fn test_seed_rejects_non_objects() {
        let store = MemoryStore::new("listings");
        let err = store.seed(vec![json!([1, 2])]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[test]
    fn test_seed_is_all_or_nothing() {
        let store = MemoryStore::new("listings");
        let err = store
            .seed(vec![
                json!({"id": "first", "city": "Anytown"}),
                json!("not a listing"),
                json!({"id": "third", "city": "Anytown"}),
            ])
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidDocument(_)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_len_reports_poisoned_lock() {
        let store = seeded();
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.documents.write();
                panic!("poison the document map");
            })
            .join()
        });

        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
        assert!(store.is_empty().is_err());
    }

    #[test]
    fn test_seed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, r#"[{"city": "Anytown"}, {"id": "fixed", "city": "Elsewhere"}]"#).unwrap();

        let store = MemoryStore::new("listings");
        assert_eq!(store.seed_from_file(&path).unwrap(), 2);
        assert_eq!(store.len().unwrap(), 2);

        let missing = store.seed_from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(StoreError::Seed(_))));
    }

    #[test]
    fn test_index_policy_deserialize() {
        let policy: IndexPolicy = serde_json::from_str(
            r#"{"mode": "declared", "indexes": [["city", "listingDate"]]}"#,
        )
        .unwrap();
        assert_eq!(
            policy,
            IndexPolicy::declared([CompositeIndex::new(["city", "listingDate"])])
        );

        let permissive: IndexPolicy = serde_json::from_str(r#"{"mode": "permissive"}"#).unwrap();
        assert_eq!(permissive, IndexPolicy::Permissive);
    }
}
