//! The document store trait and its implementations.

use crate::{DocumentId, StoreError, StoreResult, DOCUMENT_FILENAME};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The persistence collaborator boundary.
///
/// A store accepts a document-shaped record for creation and returns its
/// identifier; it does not interpret the document beyond (de)serialization.
/// All methods are synchronous; callers treat failures as final (no retry,
/// no rollback of caller-side state).
///
/// Implementations provide the `*_raw` methods, which move JSON text
/// verbatim. Callers that own a strict wire format (for example the report
/// documents, with their path-annotated parse errors) go through the raw
/// seam and do their own parse/render; everything else uses the generic
/// serde methods layered on top.
pub trait DocumentStore {
    /// Persists pre-rendered JSON text in `collection` under a freshly
    /// allocated id.
    fn create_raw(&self, collection: &str, contents: &str) -> StoreResult<DocumentId>;

    /// Reads one document's JSON text, returning `None` when the id is
    /// unknown.
    fn get_raw(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<String>>;

    /// Reads the JSON text of every document in a collection.
    ///
    /// Documents that exist but cannot be read are skipped with a warning;
    /// a missing collection is an empty list, not an error.
    fn list_raw(&self, collection: &str) -> StoreResult<Vec<(DocumentId, String)>>;

    /// Persists `document` in `collection` under a freshly allocated id.
    fn create<T: Serialize>(&self, collection: &str, document: &T) -> StoreResult<DocumentId> {
        let json = serde_json::to_string_pretty(document).map_err(StoreError::Serialization)?;
        self.create_raw(collection, &json)
    }

    /// Reads one document, returning `None` when the id is unknown.
    fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<T>> {
        match self.get_raw(collection, id)? {
            Some(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(StoreError::Deserialization),
            None => Ok(None),
        }
    }

    /// Reads all documents of a collection.
    ///
    /// Documents that exist but cannot be deserialized are skipped with a
    /// warning.
    fn list<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<(DocumentId, T)>> {
        let raw = self.list_raw(collection)?;

        let mut documents = Vec::with_capacity(raw.len());
        for (id, contents) in raw {
            match serde_json::from_str(&contents) {
                Ok(document) => documents.push((id, document)),
                Err(e) => {
                    tracing::warn!("failed to parse document {} in '{}': {}", id, collection, e);
                }
            }
        }
        Ok(documents)
    }
}

/// Rejects collection names that could escape the data directory.
fn validate_collection(collection: &str) -> StoreResult<()> {
    let ok = !collection.is_empty()
        && collection
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'-' | b'_'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(format!(
            "collection must be non-empty lowercase [a-z0-9_-], got: '{}'",
            collection
        )))
    }
}

/// Filesystem-backed document store with sharded JSON layout.
///
/// See the crate docs for the directory scheme. The store is stateless;
/// every operation resolves paths from the base directory.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    base_dir: PathBuf,
}

impl FsDocumentStore {
    /// Creates a store rooted at `base_dir`. The directory is created lazily
    /// on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Allocates a fresh id and creates its sharded directory.
    ///
    /// Guards against pathological id collisions (or pre-existing
    /// directories from external interference) by retrying with new ids a
    /// bounded number of times.
    fn allocate_dir(&self, collection_dir: &Path) -> StoreResult<(DocumentId, PathBuf)> {
        const MAX_ATTEMPTS: usize = 5;

        for _attempt in 0..MAX_ATTEMPTS {
            let id = DocumentId::new();
            let candidate = id.sharded_dir(collection_dir);

            if candidate.exists() {
                continue;
            }

            if let Some(parent) = candidate.parent() {
                fs::create_dir_all(parent).map_err(StoreError::DirCreation)?;
            }

            match fs::create_dir(&candidate) {
                Ok(()) => return Ok((id, candidate)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StoreError::DirCreation(e)),
            }
        }

        Err(StoreError::IdAllocation(MAX_ATTEMPTS))
    }
}

impl DocumentStore for FsDocumentStore {
    fn create_raw(&self, collection: &str, contents: &str) -> StoreResult<DocumentId> {
        validate_collection(collection)?;

        let collection_dir = self.base_dir.join(collection);
        let (id, document_dir) = self.allocate_dir(&collection_dir)?;

        fs::write(document_dir.join(DOCUMENT_FILENAME), contents)
            .map_err(StoreError::FileWrite)?;

        Ok(id)
    }

    fn get_raw(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<String>> {
        validate_collection(collection)?;

        let path = id
            .sharded_dir(&self.base_dir.join(collection))
            .join(DOCUMENT_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(StoreError::FileRead)?;
        Ok(Some(contents))
    }

    fn list_raw(&self, collection: &str) -> StoreResult<Vec<(DocumentId, String)>> {
        validate_collection(collection)?;

        let mut documents = Vec::new();

        let collection_dir = self.base_dir.join(collection);
        let s1_iter = match fs::read_dir(&collection_dir) {
            Ok(it) => it,
            Err(_) => return Ok(documents),
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    if !id_path.is_dir() {
                        continue;
                    }

                    let id = match id_path
                        .file_name()
                        .and_then(|os| os.to_str())
                        .map(DocumentId::parse)
                    {
                        Some(Ok(id)) => id,
                        _ => continue,
                    };

                    let document_path = id_path.join(DOCUMENT_FILENAME);
                    if !document_path.is_file() {
                        continue;
                    }

                    match fs::read_to_string(&document_path) {
                        Ok(contents) => documents.push((id, contents)),
                        Err(e) => {
                            tracing::warn!(
                                "failed to read document: {} - {}",
                                document_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(documents)
    }
}

/// In-memory store for unit tests.
///
/// Keeps raw JSON text per collection behind a mutex so services can share
/// one instance across threads the way they share the filesystem store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

type Collections = HashMap<String, Vec<(DocumentId, String)>>;

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Collections>> {
        self.collections.lock().map_err(|_| {
            StoreError::FileWrite(io::Error::other("memory store mutex poisoned"))
        })
    }
}

impl DocumentStore for MemoryStore {
    fn create_raw(&self, collection: &str, contents: &str) -> StoreResult<DocumentId> {
        validate_collection(collection)?;

        let id = DocumentId::new();
        self.lock()?
            .entry(collection.to_owned())
            .or_default()
            .push((id.clone(), contents.to_owned()));

        Ok(id)
    }

    fn get_raw(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<String>> {
        validate_collection(collection)?;

        let collections = self.lock()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };

        Ok(documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, contents)| contents.clone()))
    }

    fn list_raw(&self, collection: &str) -> StoreResult<Vec<(DocumentId, String)>> {
        validate_collection(collection)?;

        let collections = self.lock()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Doc {
        label: String,
        count: u32,
    }

    fn sample(label: &str) -> Doc {
        Doc {
            label: label.to_owned(),
            count: 7,
        }
    }

    #[test]
    fn fs_store_round_trips_a_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let id = store
            .create("reports", &sample("first"))
            .expect("create should succeed");

        let loaded: Doc = store
            .get("reports", &id)
            .expect("get should succeed")
            .expect("document should exist");
        assert_eq!(loaded, sample("first"));
    }

    #[test]
    fn fs_store_lays_documents_out_in_shards() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let id = store
            .create("reports", &sample("sharded"))
            .expect("create should succeed");

        let expected = id
            .sharded_dir(&temp_dir.path().join("reports"))
            .join(DOCUMENT_FILENAME);
        assert!(expected.is_file(), "document.json should sit in its shard");
    }

    #[test]
    fn fs_store_get_returns_none_for_unknown_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let missing: Option<Doc> = store
            .get("reports", &DocumentId::new())
            .expect("get should succeed");
        assert!(missing.is_none());
    }

    #[test]
    fn fs_store_list_returns_empty_for_missing_collection() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let documents: Vec<(DocumentId, Doc)> =
            store.list("reports").expect("list should succeed");
        assert!(documents.is_empty());
    }

    #[test]
    fn fs_store_list_skips_unparseable_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        store
            .create("reports", &sample("valid"))
            .expect("create should succeed");

        // Write a corrupt document by hand.
        let bad_id = DocumentId::new();
        let bad_dir = bad_id.sharded_dir(&temp_dir.path().join("reports"));
        fs::create_dir_all(&bad_dir).expect("should create shard dir");
        fs::write(bad_dir.join(DOCUMENT_FILENAME), "{not json").expect("should write");

        let documents: Vec<(DocumentId, Doc)> =
            store.list("reports").expect("list should succeed");
        assert_eq!(documents.len(), 1, "corrupt document should be skipped");
        assert_eq!(documents[0].1, sample("valid"));
    }

    #[test]
    fn collection_names_are_validated() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let err = store
            .create("../escape", &sample("nope"))
            .expect_err("should reject traversal");
        assert!(matches!(err, StoreError::InvalidCollection(_)));

        let err = store
            .create("", &sample("nope"))
            .expect_err("should reject empty");
        assert!(matches!(err, StoreError::InvalidCollection(_)));
    }

    #[test]
    fn fs_store_moves_raw_text_verbatim() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FsDocumentStore::new(temp_dir.path());

        let contents = "{\n  \"label\": \"raw\",\n  \"count\": 7\n}";
        let id = store
            .create_raw("reports", contents)
            .expect("create_raw should succeed");

        let read_back = store
            .get_raw("reports", &id)
            .expect("get_raw should succeed")
            .expect("document should exist");
        assert_eq!(read_back, contents, "raw text must not be rewritten");

        let listed = store.list_raw("reports").expect("list_raw should succeed");
        assert_eq!(listed, vec![(id, contents.to_owned())]);
    }

    #[test]
    fn memory_store_round_trips_and_lists() {
        let store = MemoryStore::new();

        let a = store.create("notes", &sample("a")).expect("create a");
        let b = store.create("notes", &sample("b")).expect("create b");
        assert_ne!(a, b);

        let loaded: Option<Doc> = store.get("notes", &a).expect("get should succeed");
        assert_eq!(loaded, Some(sample("a")));

        let documents: Vec<(DocumentId, Doc)> =
            store.list("notes").expect("list should succeed");
        assert_eq!(documents.len(), 2);
    }
}
