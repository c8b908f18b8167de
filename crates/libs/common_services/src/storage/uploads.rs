use crate::utils::nice_id;
use app_state::StorageSettings;
use chrono::Utc;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

/// The folder uploaded item images live in.
#[derive(Debug, Clone)]
pub struct UploadStore {
    settings: StorageSettings,
}

/// An uploaded image written to a temporary file. The file is deleted when this is
/// dropped, unless it was persisted first.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    stem: String,
    extension: String,
}

/// A staged upload moved to its permanent name in the upload folder. Dropping it deletes
/// the file again; `keep` makes it permanent once the item referencing it is saved.
#[derive(Debug)]
#[must_use]
pub struct StoredUpload {
    path: PathBuf,
    file_name: String,
    kept: bool,
}

impl UploadStore {
    #[must_use]
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.settings.upload_folder
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(self.root()).await
    }

    #[must_use]
    pub fn is_allowed(&self, file_name: &str) -> bool {
        self.settings.is_allowed_file(file_name)
    }

    #[must_use]
    pub fn allowed_extensions(&self) -> &[String] {
        &self.settings.allowed_extensions
    }

    /// Write `bytes` to a fresh temporary file named `<prefix>...<ext>` in the upload
    /// folder, ready to be persisted there.
    pub fn stage(&self, prefix: &str, original_name: &str, bytes: &[u8]) -> io::Result<StagedUpload> {
        stage_in(Some(self.root()), prefix, original_name, bytes)
    }

    /// Write `bytes` to a temporary file in the system temp folder. The upload folder is
    /// served over HTTP, this one is not.
    pub fn stage_private(
        &self,
        prefix: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<StagedUpload> {
        stage_in(None, prefix, original_name, bytes)
    }
}

fn stage_in(
    dir: Option<&Path>,
    prefix: &str,
    original_name: &str,
    bytes: &[u8],
) -> io::Result<StagedUpload> {
    let (stem, extension) = split_file_name(original_name);
    let mut builder = Builder::new();
    builder.prefix(prefix).suffix(&extension);
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(bytes)?;
    file.flush()?;
    debug!("Staged upload at {}", file.path().display());
    Ok(StagedUpload {
        file,
        stem,
        extension,
    })
}

impl StagedUpload {
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Move the staged file to its permanent name, `<prefix>_<unix seconds>_<stem><ext>`.
    /// Never overwrites an existing file.
    pub fn persist(self, store: &UploadStore, prefix: &str) -> io::Result<StoredUpload> {
        let base = format!("{prefix}_{}_{}", Utc::now().timestamp(), self.stem);
        let mut file = self.file;
        let mut file_name = format!("{base}{}", self.extension);
        loop {
            let path = store.root().join(&file_name);
            match file.persist_noclobber(&path) {
                Ok(_) => {
                    return Ok(StoredUpload {
                        path,
                        file_name,
                        kept: false,
                    });
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    file = e.file;
                    file_name = format!("{base}_{}{}", nice_id(6), self.extension);
                }
                Err(e) => return Err(e.error),
            }
        }
    }
}

impl StoredUpload {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed unsaved upload {}", self.path.display()),
            Err(e) => warn!("Could not remove {}: {e}", self.path.display()),
        }
    }
}

/// Split an uploaded file name into a sanitised stem and a lowercased extension (with dot).
fn split_file_name(original_name: &str) -> (String, String) {
    let path = Path::new(original_name);
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    let raw_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem: String = sanitize_filename::sanitize(raw_stem)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('.')
        .to_string();
    if stem.is_empty() {
        ("image".to_string(), extension)
    } else {
        (stem, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{files_in, upload_store};
    use rstest::rstest;

    #[rstest]
    #[case("wallet.JPG", "wallet", ".jpg")]
    #[case("my black wallet.png", "my_black_wallet", ".png")]
    #[case("../../etc/passwd.gif", "passwd", ".gif")]
    #[case("what?.jpeg", "what", ".jpeg")]
    #[case("???.jpg", "image", ".jpg")]
    fn test_split_file_name(#[case] input: &str, #[case] stem: &str, #[case] extension: &str) {
        assert_eq!(
            split_file_name(input),
            (stem.to_string(), extension.to_string())
        );
    }

    #[test]
    fn test_staged_file_is_removed_on_drop() -> color_eyre::Result<()> {
        // ARRANGE
        let dir = tempfile::tempdir()?;
        let store = upload_store(&dir);

        // ACT
        let staged = store.stage("search_", "query.jpg", b"jpeg bytes")?;
        let path = staged.path().to_path_buf();
        let existed = path.exists();
        drop(staged);

        // ASSERT
        assert!(existed);
        assert!(!path.exists());
        assert!(files_in(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_persist_keeps_file_under_final_name() -> color_eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = upload_store(&dir);

        let first_upload = store.stage("found_", "My Keys.PNG", b"one")?.persist(&store, "found")?;
        let second_upload = store.stage("found_", "My Keys.PNG", b"two")?.persist(&store, "found")?;
        let first = first_upload.file_name().to_string();
        let second = second_upload.file_name().to_string();
        first_upload.keep();
        second_upload.keep();

        assert!(first.starts_with("found_"));
        assert!(first.ends_with("_My_Keys.png"));
        assert_ne!(first, second);
        assert_eq!(std::fs::read(dir.path().join(&first))?, b"one");
        assert_eq!(std::fs::read(dir.path().join(&second))?, b"two");
        assert_eq!(files_in(dir.path())?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_private_stage_is_outside_upload_folder() -> color_eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = upload_store(&dir);

        let staged = store.stage_private("search_", "query.jpg", b"jpeg bytes")?;
        let path = staged.path().to_path_buf();

        assert!(!path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path)?, b"jpeg bytes");
        assert!(files_in(dir.path())?.is_empty());
        drop(staged);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_stored_upload_is_removed_unless_kept() -> color_eyre::Result<()> {
        // ARRANGE
        let dir = tempfile::tempdir()?;
        let store = upload_store(&dir);
        let kept = store.stage("found_", "keys.jpg", b"kept")?.persist(&store, "found")?;
        let dropped = store.stage("found_", "bag.jpg", b"dropped")?.persist(&store, "found")?;
        let kept_name = kept.file_name().to_string();

        // ACT
        kept.keep();
        drop(dropped);

        // ASSERT
        assert_eq!(files_in(dir.path())?, vec![kept_name]);
        Ok(())
    }
}
