//! Document Store
//!
//! Temporary storage for the single active document of each session.
//! Each session owns one subdirectory under the configured base path and
//! holds at most one file at a time: storing a new document deletes the
//! previous one first. The whole tree is removed on shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

// ============================================================================
// Types
// ============================================================================

/// Opaque reference to stored document bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// Unique storage id (also the on-disk file stem)
    pub id: Uuid,

    /// Path of the stored file
    pub path: PathBuf,

    /// Original file name, used only for display and identity comparison
    pub file_name: String,

    /// Raw byte size
    pub size: u64,
}

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Failed to write document: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to create storage directory: {0}")]
    DirectoryFailed(#[source] std::io::Error),
}

// ============================================================================
// Document Store
// ============================================================================

/// Stores the active document of each session on the local filesystem
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<DocumentStoreInner>,
}

struct DocumentStoreInner {
    base_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(DocumentStoreInner { base_dir }),
        }
    }

    /// Store uploaded bytes as the session's active document.
    ///
    /// The storage name is a freshly generated UUID; the client-supplied
    /// file name is never used as a path component. If the session already
    /// has an active document, its file is deleted first (best-effort).
    pub async fn store(
        &self,
        session_id: Uuid,
        previous: Option<&DocumentHandle>,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<DocumentHandle, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyFile);
        }

        if let Some(old) = previous {
            self.remove(old).await;
        }

        let session_dir = self.inner.base_dir.join(session_id.to_string());
        tokio::fs::create_dir_all(&session_dir)
            .await
            .map_err(StorageError::DirectoryFailed)?;

        let id = Uuid::new_v4();
        let path = session_dir.join(format!("{}.pdf", id));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(StorageError::WriteFailed)?;

        tracing::info!(
            session_id = %session_id,
            file_name = %file_name,
            size = bytes.len(),
            path = %path.display(),
            "Document stored"
        );

        Ok(DocumentHandle {
            id,
            path,
            file_name: file_name.to_string(),
            size: bytes.len() as u64,
        })
    }

    /// Delete a stored document. Deletion failure is swallowed, not fatal.
    pub async fn remove(&self, handle: &DocumentHandle) {
        if let Err(e) = tokio::fs::remove_file(&handle.path).await {
            tracing::warn!(
                path = %handle.path.display(),
                error = %e,
                "Failed to delete stored document"
            );
        }
    }

    /// Delete a session's storage directory and everything in it.
    pub async fn remove_session_dir(&self, session_id: Uuid) {
        let session_dir = self.inner.base_dir.join(session_id.to_string());
        if let Err(e) = tokio::fs::remove_dir_all(&session_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to delete session storage directory"
                );
            }
        }
    }

    /// Remove every stored file and the base directory itself.
    ///
    /// Called on graceful shutdown.
    pub async fn cleanup(&self) {
        match tokio::fs::remove_dir_all(&self.inner.base_dir).await {
            Ok(()) => {
                tracing::info!(
                    base_dir = %self.inner.base_dir.display(),
                    "Document storage cleaned up"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    base_dir = %self.inner.base_dir.display(),
                    error = %e,
                    "Failed to clean up document storage"
                );
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("docs"));
        (dir, store)
    }

    #[tokio::test]
    async fn store_writes_bytes_durably() {
        let (_dir, store) = test_store();
        let session_id = Uuid::new_v4();

        let handle = store
            .store(session_id, None, b"%PDF-1.4 fake", "report.pdf")
            .await
            .unwrap();

        assert_eq!(handle.file_name, "report.pdf");
        assert_eq!(handle.size, 13);
        let written = tokio::fs::read(&handle.path).await.unwrap();
        assert_eq!(written, b"%PDF-1.4 fake");
        assert!(handle.path.extension().is_some_and(|e| e == "pdf"));
    }

    #[tokio::test]
    async fn store_rejects_empty_file() {
        let (_dir, store) = test_store();

        let result = store.store(Uuid::new_v4(), None, b"", "empty.pdf").await;
        assert!(matches!(result, Err(StorageError::EmptyFile)));
    }

    #[tokio::test]
    async fn storing_replacement_deletes_previous_file() {
        let (_dir, store) = test_store();
        let session_id = Uuid::new_v4();

        let first = store
            .store(session_id, None, b"first", "a.pdf")
            .await
            .unwrap();
        let second = store
            .store(session_id, Some(&first), b"second", "b.pdf")
            .await
            .unwrap();

        assert!(!first.path.exists());
        assert!(second.path.exists());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn remove_is_best_effort_for_missing_file() {
        let (_dir, store) = test_store();
        let handle = DocumentHandle {
            id: Uuid::new_v4(),
            path: PathBuf::from("/nonexistent/ghost.pdf"),
            file_name: "ghost.pdf".to_string(),
            size: 0,
        };

        // Must not panic or error out
        store.remove(&handle).await;
    }

    #[tokio::test]
    async fn cleanup_removes_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("docs");
        let store = DocumentStore::new(base.clone());
        let session_id = Uuid::new_v4();

        store
            .store(session_id, None, b"data", "doc.pdf")
            .await
            .unwrap();
        assert!(base.exists());

        store.cleanup().await;
        assert!(!base.exists());
    }
}
