//! JSON export and file persistence for documents.

use crate::document::Document;
use crate::elements::Element;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Version number written into exported documents. Imports reject newer
/// versions instead of misparsing them; there is no migration machinery.
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unsupported document format version {0}")]
    UnsupportedVersion(u32),
    #[error("io error: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The on-disk/export envelope: a version tag plus the element sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedDocument {
    /// Format version.
    pub version: u32,
    /// Document name.
    #[serde(default)]
    pub name: String,
    /// All elements.
    pub elements: Vec<Element>,
}

impl ExportedDocument {
    /// Wrap a document for export.
    pub fn from_document(document: &Document) -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            name: document.name.clone(),
            elements: document.elements.clone(),
        }
    }

    /// Unwrap into a fresh document (new id).
    pub fn into_document(self) -> Document {
        Document {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            elements: self.elements,
        }
    }
}

/// Serialize a document to the versioned export JSON.
pub fn export_json(document: &Document) -> StorageResult<String> {
    serde_json::to_string_pretty(&ExportedDocument::from_document(document))
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse export JSON back into a document.
pub fn import_json(json: &str) -> StorageResult<Document> {
    let exported: ExportedDocument =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    if exported.version > DOCUMENT_FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion(exported.version));
    }
    Ok(exported.into_document())
}

/// Write a document to a JSON file.
pub fn save_document(path: &Path, document: &Document) -> StorageResult<()> {
    let json = export_json(document)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("failed to create {}: {}", parent.display(), e)))?;
        }
    }
    fs::write(path, json)
        .map_err(|e| StorageError::Io(format!("failed to write {}: {}", path.display(), e)))?;
    debug!("saved document '{}' to {}", document.name, path.display());
    Ok(())
}

/// Read a document from a JSON file.
pub fn load_document(path: &Path) -> StorageResult<Document> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    let document = import_json(&json)?;
    debug!("loaded document '{}' from {}", document.name, path.display());
    Ok(document)
}

/// Default directory for saved documents.
///
/// On Unix: `~/.local/share/tabula/documents/` (or the platform
/// equivalent of the local data dir).
pub fn default_document_dir() -> StorageResult<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| StorageError::Io("could not determine home directory".to_string()))?;
    Ok(base.join("tabula").join("documents"))
}
