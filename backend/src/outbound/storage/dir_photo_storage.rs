//! `PhotoStorage` backed by a capability-scoped upload directory.
//!
//! All file access goes through a `cap_std::fs::Dir` opened on the upload
//! root, so stored names can never resolve outside it. Writes are staged
//! under a temporary name and renamed into place.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PhotoStorage, PhotoStorageError};

/// Stores photo bytes as flat files in one directory.
#[derive(Clone)]
pub struct DirPhotoStorage {
    dir: Arc<Dir>,
    /// Prefix reported in stored paths, e.g. `uploads`.
    public_prefix: String,
}

impl DirPhotoStorage {
    /// Open (creating if needed) the upload directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoStorageError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, PhotoStorageError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| io_error("create upload directory", &err))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| io_error("open upload directory", &err))?;
        let public_prefix = root.to_string_lossy().trim_end_matches('/').to_owned();
        Ok(Self {
            dir: Arc::new(dir),
            public_prefix,
        })
    }

    fn stored_path(&self, filename: &str) -> String {
        if self.public_prefix.is_empty() {
            filename.to_owned()
        } else {
            format!("{}/{filename}", self.public_prefix)
        }
    }
}

fn io_error(action: &str, err: &io::Error) -> PhotoStorageError {
    PhotoStorageError::io(format!("{action}: {err}"))
}

/// Accept plain file names only.
fn checked_name(name: &str) -> Result<&str, PhotoStorageError> {
    let rejected = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if rejected {
        return Err(PhotoStorageError::invalid_name(name));
    }
    Ok(name)
}

fn write_staged(dir: &Dir, filename: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".upload-{}", Uuid::new_v4().simple());
    dir.write(&staging, bytes)?;
    dir.rename(&staging, dir, filename).inspect_err(|_| {
        let _ = dir.remove_file(&staging);
    })
}

fn remove_if_present(dir: &Dir, filename: &str) -> io::Result<()> {
    match dir.remove_file(filename) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(filename, "photo already absent");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn blocking<T, F>(task: F) -> Result<T, PhotoStorageError>
where
    F: FnOnce() -> Result<T, PhotoStorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| PhotoStorageError::io(format!("storage task failed: {err}")))?
}

#[async_trait]
impl PhotoStorage for DirPhotoStorage {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, PhotoStorageError> {
        let name = checked_name(filename)?.to_owned();
        let dir = Arc::clone(&self.dir);
        let bytes = bytes.to_vec();
        let staged_name = name.clone();
        blocking(move || {
            write_staged(&dir, &staged_name, &bytes).map_err(|err| io_error("write photo", &err))
        })
        .await?;
        debug!(filename = %name, "photo stored");
        Ok(self.stored_path(&name))
    }

    async fn remove(&self, filename: &str) -> Result<(), PhotoStorageError> {
        let name = checked_name(filename)?.to_owned();
        let dir = Arc::clone(&self.dir);
        blocking(move || remove_if_present(&dir, &name).map_err(|err| io_error("remove photo", &err)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn root() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn store_writes_bytes_and_reports_prefixed_path(root: TempDir) {
        let uploads = root.path().join("uploads");
        let storage = DirPhotoStorage::open(&uploads).expect("open storage");

        let path = storage
            .store("1727784000000-42-cake.jpg", b"jpeg bytes")
            .await
            .expect("stored");

        assert_eq!(
            path,
            format!("{}/1727784000000-42-cake.jpg", uploads.to_string_lossy())
        );
        let dir = Dir::open_ambient_dir(&uploads, ambient_authority()).expect("open dir");
        assert_eq!(dir.read("1727784000000-42-cake.jpg").expect("read"), b"jpeg bytes");
    }

    #[rstest]
    #[tokio::test]
    async fn staging_files_do_not_linger(root: TempDir) {
        let storage = DirPhotoStorage::open(root.path()).expect("open storage");
        storage.store("a.png", b"png").await.expect("stored");

        let dir = Dir::open_ambient_dir(root.path(), ambient_authority()).expect("open dir");
        let names: Vec<String> = dir
            .entries()
            .expect("entries")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png".to_owned()]);
    }

    #[rstest]
    #[case("")]
    #[case("../escape.jpg")]
    #[case("nested/photo.jpg")]
    #[case("back\\slash.jpg")]
    #[case(".hidden")]
    #[tokio::test]
    async fn unsafe_names_are_rejected(root: TempDir, #[case] name: &str) {
        let storage = DirPhotoStorage::open(root.path()).expect("open storage");
        let err = storage.store(name, b"x").await.expect_err("rejected");
        assert_eq!(err, PhotoStorageError::invalid_name(name));
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing_files(root: TempDir) {
        let storage = DirPhotoStorage::open(root.path()).expect("open storage");
        storage.store("gone.webp", b"webp").await.expect("stored");

        storage.remove("gone.webp").await.expect("removed");
        storage.remove("gone.webp").await.expect("second remove is a no-op");

        let dir = Dir::open_ambient_dir(root.path(), ambient_authority()).expect("open dir");
        assert!(!dir.exists("gone.webp"));
    }
}
