//! Per-run scratch file for the uploaded hand photo.

use crate::error::Result;
use crate::image::UploadedImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SCRATCH_PREFIX: &str = "temp_hand_image";

/// The uploaded photo, persisted for the length of one run.
///
/// Every run gets its own uniquely named file, so concurrent runs never see
/// each other's bytes. The file is deleted when the value is dropped, on every
/// exit path of the run.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Writes the upload into a fresh file inside `dir`.
    pub fn create(dir: &Path, upload: &UploadedImage) -> Result<Self> {
        let suffix = format!(".{}", upload.format.extension());
        let mut file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(&upload.data)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            size_bytes = upload.size(),
            "wrote scratch file"
        );
        Ok(Self { file })
    }

    /// Returns the scratch file path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Re-reads the persisted bytes.
    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path()).await?)
    }

    /// Deletes the file now and reports any failure.
    ///
    /// Dropping the value deletes it too, but silently.
    pub fn close(self) -> Result<()> {
        let path: PathBuf = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!(path = %path.display(), "removed scratch file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedImage {
        UploadedImage::new(vec![7, 8, 9], name, None).unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::create(dir.path(), &upload("hand.jpeg")).unwrap();
        let path = scratch.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("temp_hand_image"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(scratch.read().await.unwrap(), vec![7, 8, 9]);

        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchFile::create(dir.path(), &upload("hand.png")).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_concurrent_runs_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::create(dir.path(), &upload("hand.png")).unwrap();
        let b = ScratchFile::create(dir.path(), &upload("hand.png")).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
