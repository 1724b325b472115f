use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;

const FALLBACK_FILE_NAME: &str = "upload.xlsx";

/// Reduces a client-supplied file name to its final path component.
///
/// Both `/` and `\` count as separators so Windows-style names cannot climb
/// out of the upload directory either.
pub fn sanitize_file_name(raw: Option<&str>) -> String {
    raw.and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}

/// Writes uploaded spreadsheets into the configured upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    upload_dir: PathBuf,
}

impl UploadStore {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            upload_dir: storage.upload_dir.clone(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Saves an upload and returns the path written.
    ///
    /// The stored name is prefixed with a UTC timestamp so concurrent uploads
    /// of the same file do not overwrite each other.
    pub async fn save_upload(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let stored_name = format!(
            "{}_{}",
            Utc::now().format("%Y%m%dT%H%M%S%.3f"),
            sanitize_file_name(Some(file_name))
        );
        let path = self.upload_dir.join(stored_name);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored upload at {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitize_file_name(Some("C:\\Users\\so\\march.xlsx")), "march.xlsx");
        assert_eq!(sanitize_file_name(Some("visits.csv")), "visits.csv");
    }

    #[test]
    fn test_sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_file_name(None), "upload.xlsx");
        assert_eq!(sanitize_file_name(Some("")), "upload.xlsx");
        assert_eq!(sanitize_file_name(Some("reports/..")), "upload.xlsx");
    }

    #[tokio::test]
    async fn test_save_upload_writes_inside_upload_dir() {
        let root = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            upload_dir: root.path().join("uploads"),
            ..StorageConfig::default()
        };
        let store = UploadStore::new(&storage);

        let path = store.save_upload("../march.csv", b"SO NAME\n").await.unwrap();

        assert!(path.starts_with(store.upload_dir()));
        assert!(path.to_string_lossy().ends_with("_march.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"SO NAME\n");
    }
}
