//! Per-user metadata index of generated documents.
//!
//! Lives at `<user_dir>/.index.json`. Records which template and profile
//! revision produced each file so listings need no directory traversal.
//! Directories that predate the index are scanned once and the result persisted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use crate::files::naming::{parse_file_name, DocumentKind, FileExt};

pub const INDEX_FILE_NAME: &str = ".index.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub file_name: String,
    pub kind: DocumentKind,
    pub ext: FileExt,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub size: u64,
    pub mtime_ms: u64,
    /// Unknown for files discovered by a directory scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_revision: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryIndex {
    pub files: Vec<IndexEntry>,
}

impl RegistryIndex {
    fn path(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE_NAME)
    }

    /// Loads the index. `Ok(None)` when the file does not exist or cannot be parsed.
    pub async fn load(dir: &Path) -> std::io::Result<Option<Self>> {
        let raw = match fs::read(Self::path(dir)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        match serde_json::from_slice(&raw) {
            Ok(index) => Ok(Some(index)),
            Err(e) => {
                warn!("Discarding unreadable index in {}: {e}", dir.display());
                Ok(None)
            }
        }
    }

    /// Writes the index next to the files, replacing the old one atomically.
    pub async fn save(&self, dir: &Path) -> std::io::Result<()> {
        let body = serde_json::to_vec_pretty(self)?;
        let tmp = dir.join(format!("{INDEX_FILE_NAME}.tmp"));
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, Self::path(dir)).await
    }

    /// Inserts the entry, replacing any previous entry with the same file name.
    pub fn upsert(&mut self, entry: IndexEntry) {
        match self.files.iter_mut().find(|e| e.file_name == entry.file_name) {
            Some(existing) => *existing = entry,
            None => self.files.push(entry),
        }
    }

    pub fn remove(&mut self, file_name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|e| e.file_name != file_name);
        self.files.len() != before
    }
}

/// Builds an index entry for a file on disk. `Ok(None)` if the file is gone,
/// is not a regular file, or its name falls outside the grammar.
pub async fn describe_file(
    dir: &Path,
    file_name: &str,
    profile_revision: Option<i32>,
) -> std::io::Result<Option<IndexEntry>> {
    let Some(parsed) = parse_file_name(file_name) else {
        return Ok(None);
    };
    let metadata = match fs::metadata(dir.join(file_name)).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if !metadata.is_file() {
        return Ok(None);
    }
    Ok(Some(IndexEntry {
        file_name: file_name.to_string(),
        kind: parsed.kind,
        ext: parsed.ext,
        template_id: parsed.template_id,
        version: parsed.version,
        size: metadata.len(),
        mtime_ms: metadata.modified().map(millis_since_epoch).unwrap_or(0),
        profile_revision,
    }))
}

/// Scans a user directory. `Ok(None)` if the directory does not exist.
pub async fn scan_directory(dir: &Path) -> std::io::Result<Option<RegistryIndex>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut index = RegistryIndex::default();
    while let Some(entry) = entries.next_entry().await? {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if let Some(described) = describe_file(dir, &name, None).await? {
            index.files.push(described);
        }
    }
    Ok(Some(index))
}

fn millis_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
