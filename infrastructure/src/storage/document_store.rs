//! JSON document store on the local filesystem.
//!
//! Layout: `<root>/<collection>/<id>.json`, one document per file. Writes go
//! to a temporary file in the same directory and are renamed into place, so
//! a reader sees either the old or the new document.
//!
//! Queries are full scans: equality on a dotted field path, and k nearest
//! neighbours by cosine similarity over a numeric array field.

use neighborly_application::RepositoryError;
use neighborly_domain::util::cosine_similarity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

const EXTENSION: &str = "json";

/// A stored document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T> {
    pub id: String,
    pub data: T,
}

#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    root: PathBuf,
}

impl JsonDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, RepositoryError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        Ok(self.root.join(collection).join(format!("{}.{}", id, EXTENSION)))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, RepositoryError> {
        let path = self.document_path(collection, id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RepositoryError::Corrupt {
                id: format!("{}/{}", collection, id),
                message: e.to_string(),
            })
    }

    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), RepositoryError> {
        let path = self.document_path(collection, id)?;
        let dir = self.root.join(collection);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let tmp = dir.join(format!(".{}.{}.tmp", id, std::process::id()));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        trace!(collection, id, bytes = json.len(), "Document written");
        Ok(())
    }

    /// Every readable document in a collection; unreadable ones are skipped
    /// with a warning. A missing collection is empty.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<Document<T>>, RepositoryError> {
        validate_segment(collection)?;
        let dir = self.root.join(collection);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            let path = entry.path();
            let Some(id) = document_id(&path) else {
                continue;
            };
            let parsed = tokio::fs::read(&path)
                .await
                .map_err(|e| e.to_string())
                .and_then(|bytes| serde_json::from_slice::<T>(&bytes).map_err(|e| e.to_string()));
            match parsed {
                Ok(data) => documents.push(Document { id, data }),
                Err(e) => warn!(collection, id = %id, error = %e, "Skipping unreadable document"),
            }
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    /// Documents whose field at `path` (dotted, e.g. `businessProfile.placeId`)
    /// equals `value`.
    pub async fn find_by_field(
        &self,
        collection: &str,
        path: &str,
        value: &Value,
    ) -> Result<Vec<Document<Value>>, RepositoryError> {
        let documents = self.list::<Value>(collection).await?;
        Ok(documents
            .into_iter()
            .filter(|d| field_at(&d.data, path) == Some(value))
            .collect())
    }

    /// The `k` documents whose vector at `field` is most similar to `query`,
    /// best first. Documents without a usable vector are ignored.
    pub async fn find_nearest(
        &self,
        collection: &str,
        field: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(Document<Value>, f32)>, RepositoryError> {
        let documents = self.list::<Value>(collection).await?;
        let mut scored: Vec<_> = documents
            .into_iter()
            .filter_map(|d| {
                let vector = vector_at(&d.data, field)?;
                (vector.len() == query.len()).then(|| {
                    let score = cosine_similarity(query, &vector);
                    (d, score)
                })
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        Ok(scored)
    }
}

fn validate_segment(segment: &str) -> Result<(), RepositoryError> {
    let invalid = segment.is_empty()
        || segment.starts_with('.')
        || segment.contains(['/', '\\'])
        || segment.contains("..");
    if invalid {
        return Err(RepositoryError::Io(format!("Invalid document path segment: {:?}", segment)));
    }
    Ok(())
}

fn document_id(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    (!stem.starts_with('.')).then(|| stem.to_string())
}

fn io_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Io(format!("{}: {}", path.display(), e))
}

/// Resolve a dotted path inside a JSON value.
pub(crate) fn field_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn vector_at(value: &Value, path: &str) -> Option<Vec<f32>> {
    field_at(value, path)?
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}
