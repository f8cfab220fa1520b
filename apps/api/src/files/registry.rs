use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::files::index::{describe_file, scan_directory, IndexEntry, RegistryIndex};
use crate::files::naming::{parse_file_name, user_dir_name, DocumentKind, FileExt};

/// A generated document as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: String,
    pub url: String,
    pub size: u64,
    pub mtime_ms: u64,
    pub ext: FileExt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_revision: Option<i32>,
}

/// Each group is ordered most recently modified first; the head is the default file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    pub resumes: Vec<FileInfo>,
    pub cover_letters: Vec<FileInfo>,
}

/// Tracks generated documents under `<root>/<user_dir>/`.
pub struct FileRegistry {
    root: PathBuf,
    public_base: String,
    /// Serializes read-modify-write cycles on index files.
    index_lock: Mutex<()>,
}

impl FileRegistry {
    pub fn new(root: impl Into<PathBuf>, public_app_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_app_url.trim_end_matches('/').to_string(),
            index_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_name(email: &str) -> Result<String, AppError> {
        user_dir_name(email)
            .ok_or_else(|| AppError::Validation(format!("Unusable user identifier '{email}'")))
    }

    pub fn user_dir(&self, email: &str) -> Result<PathBuf, AppError> {
        Ok(self.root.join(Self::dir_name(email)?))
    }

    /// Creates the user's directory if needed and returns its path.
    pub async fn ensure_user_dir(&self, email: &str) -> Result<PathBuf, AppError> {
        let dir = self.user_dir(email)?;
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// `<public base>/static/<user_dir>/<url-encoded file name>`
    pub fn public_url(&self, email: &str, file_name: &str) -> Result<String, AppError> {
        Ok(format!(
            "{}/static/{}/{}",
            self.public_base,
            Self::dir_name(email)?,
            urlencoding::encode(file_name)
        ))
    }

    /// Records a freshly written file in the user's index.
    pub async fn record(
        &self,
        email: &str,
        file_name: &str,
        profile_revision: Option<i32>,
    ) -> Result<(), AppError> {
        let dir = self.user_dir(email)?;
        let _guard = self.index_lock.lock().await;

        let mut index = load_or_rebuild(&dir).await?.unwrap_or_default();
        let entry = describe_file(&dir, file_name, profile_revision)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "Generated file {file_name} is missing or misnamed"
                ))
            })?;
        index.upsert(entry);
        index.save(&dir).await?;
        Ok(())
    }

    /// Lists the user's documents. A user without a directory has no documents.
    pub async fn list(&self, email: &str) -> Result<FileListing, AppError> {
        let dir = self.user_dir(email)?;
        let index = {
            let _guard = self.index_lock.lock().await;
            load_or_rebuild(&dir).await?
        };
        let Some(index) = index else {
            return Ok(FileListing::default());
        };

        let mut listing = FileListing::default();
        for entry in index.files {
            // entries written by hand or by older builds may not follow the grammar
            if parse_file_name(&entry.file_name).is_none() {
                continue;
            }
            let kind = entry.kind;
            let info = self.file_info(email, entry)?;
            match kind {
                DocumentKind::Resume => listing.resumes.push(info),
                DocumentKind::Cover => listing.cover_letters.push(info),
            }
        }
        listing.resumes.sort_by(|a, b| b.mtime_ms.cmp(&a.mtime_ms));
        listing.cover_letters.sort_by(|a, b| b.mtime_ms.cmp(&a.mtime_ms));
        Ok(listing)
    }

    /// Removes a document. Deleting a file that is already gone succeeds.
    pub async fn delete(&self, email: &str, file_name: &str) -> Result<(), AppError> {
        if parse_file_name(file_name).is_none() {
            return Err(AppError::Validation(format!(
                "'{file_name}' is not a generated document name"
            )));
        }
        let dir = self.user_dir(email)?;

        match fs::remove_file(dir.join(file_name)).await {
            Ok(()) => info!("Deleted {file_name} for {email}"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let _guard = self.index_lock.lock().await;
        if let Some(mut index) = RegistryIndex::load(&dir).await? {
            if index.remove(file_name) {
                index.save(&dir).await?;
            }
        }
        Ok(())
    }

    /// Maps a `/static/<user_dir>/<file_name>` request onto disk, refusing
    /// anything that is not a sanitized directory name plus a grammar-conforming file.
    pub fn resolve_static(&self, dir_name: &str, file_name: &str) -> Option<(PathBuf, FileExt)> {
        if user_dir_name(dir_name).as_deref() != Some(dir_name) {
            return None;
        }
        let parsed = parse_file_name(file_name)?;
        Some((self.root.join(dir_name).join(file_name), parsed.ext))
    }

    fn file_info(&self, email: &str, entry: IndexEntry) -> Result<FileInfo, AppError> {
        Ok(FileInfo {
            url: self.public_url(email, &entry.file_name)?,
            file_name: entry.file_name,
            size: entry.size,
            mtime_ms: entry.mtime_ms,
            ext: entry.ext,
            version: entry.version,
            template_id: entry.template_id,
            profile_revision: entry.profile_revision,
        })
    }
}

/// Loads the index, rebuilding and persisting it from a scan when absent.
/// `Ok(None)` if the user directory does not exist.
async fn load_or_rebuild(dir: &Path) -> Result<Option<RegistryIndex>, AppError> {
    if let Some(index) = RegistryIndex::load(dir).await? {
        return Ok(Some(index));
    }
    let Some(index) = scan_directory(dir).await? else {
        return Ok(None);
    };
    info!(
        "Rebuilt file index for {} ({} files)",
        dir.display(),
        index.files.len()
    );
    index.save(dir).await?;
    Ok(Some(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const EMAIL: &str = "ada@example.com";

    fn registry(tmp: &TempDir) -> FileRegistry {
        FileRegistry::new(tmp.path(), "http://localhost:3000/")
    }

    fn write_with_mtime(dir: &Path, name: &str, secs_ago: u64) {
        let path = dir.join(name);
        std::fs::write(&path, b"data").unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_without_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let listing = registry(&tmp).list(EMAIL).await.unwrap();
        assert_eq!(listing, FileListing::default());
    }

    #[tokio::test]
    async fn test_list_rebuilds_index_and_sorts_newest_first() {
        let tmp = TempDir::new().unwrap();
        let reg = registry(&tmp);
        let dir = reg.ensure_user_dir(EMAIL).await.unwrap();
        write_with_mtime(&dir, "resume-simple-ats-v1.pdf", 300);
        write_with_mtime(&dir, "resume-simple-ats-v2.pdf", 10);
        write_with_mtime(&dir, "resume-simple-ats-v2.docx", 200);
        write_with_mtime(&dir, "cover-simple-ats-v3.pdf", 50);
        write_with_mtime(&dir, "scratch.pdf", 1);

        let listing = reg.list(EMAIL).await.unwrap();
        let resumes: Vec<_> = listing.resumes.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            resumes,
            vec![
                "resume-simple-ats-v2.pdf",
                "resume-simple-ats-v2.docx",
                "resume-simple-ats-v1.pdf"
            ]
        );
        assert_eq!(listing.cover_letters.len(), 1);
        assert_eq!(listing.cover_letters[0].version, Some(3));
        assert_eq!(
            listing.cover_letters[0].url,
            "http://localhost:3000/static/ada@example.com/cover-simple-ats-v3.pdf"
        );
        assert!(dir.join(".index.json").exists());
    }

    #[tokio::test]
    async fn test_recorded_file_carries_revision() {
        let tmp = TempDir::new().unwrap();
        let reg = registry(&tmp);
        let dir = reg.ensure_user_dir(EMAIL).await.unwrap();
        std::fs::write(dir.join("resume-simple-ats-v9.pdf"), b"%PDF-1.7").unwrap();

        reg.record(EMAIL, "resume-simple-ats-v9.pdf", Some(4))
            .await
            .unwrap();

        let listing = reg.list(EMAIL).await.unwrap();
        assert_eq!(listing.resumes.len(), 1);
        assert_eq!(listing.resumes[0].profile_revision, Some(4));
        assert_eq!(listing.resumes[0].template_id, "simple-ats");
        assert_eq!(listing.resumes[0].size, 8);
    }

    #[tokio::test]
    async fn test_listing_reads_index_not_directory() {
        let tmp = TempDir::new().unwrap();
        let reg = registry(&tmp);
        let dir = reg.ensure_user_dir(EMAIL).await.unwrap();
        std::fs::write(dir.join("resume-simple-ats-v1.pdf"), b"x").unwrap();
        reg.record(EMAIL, "resume-simple-ats-v1.pdf", Some(1))
            .await
            .unwrap();

        // a file dropped in behind the registry's back is not picked up
        std::fs::write(dir.join("resume-simple-ats-v2.pdf"), b"x").unwrap();
        let listing = reg.list(EMAIL).await.unwrap();
        assert_eq!(listing.resumes.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_updates_index() {
        let tmp = TempDir::new().unwrap();
        let reg = registry(&tmp);
        let dir = reg.ensure_user_dir(EMAIL).await.unwrap();
        std::fs::write(dir.join("cover-simple-ats-v1.pdf"), b"x").unwrap();
        reg.record(EMAIL, "cover-simple-ats-v1.pdf", Some(1))
            .await
            .unwrap();

        reg.delete(EMAIL, "cover-simple-ats-v1.pdf").await.unwrap();
        reg.delete(EMAIL, "cover-simple-ats-v1.pdf").await.unwrap();

        assert!(!dir.join("cover-simple-ats-v1.pdf").exists());
        assert!(reg.list(EMAIL).await.unwrap().cover_letters.is_empty());
    }

    #[tokio::test]
    async fn test_delete_rejects_names_outside_grammar() {
        let tmp = TempDir::new().unwrap();
        let err = registry(&tmp)
            .delete(EMAIL, "../other@example.com/resume-x-v1.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resolve_static_refuses_traversal() {
        let tmp = TempDir::new().unwrap();
        let reg = registry(&tmp);
        assert!(reg.resolve_static("..", "resume-x-v1.pdf").is_none());
        assert!(reg.resolve_static("a/b", "resume-x-v1.pdf").is_none());
        assert!(reg.resolve_static(EMAIL, ".index.json").is_none());

        let (path, ext) = reg.resolve_static(EMAIL, "resume-x-v1.docx").unwrap();
        assert_eq!(path, tmp.path().join(EMAIL).join("resume-x-v1.docx"));
        assert_eq!(ext, FileExt::Docx);
    }
}
