use crate::naming::{generate_filename, is_valid_filename};
use crate::traits::{OutputStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Attempts at drawing a fresh name when the generated one already exists
const MAX_NAME_ATTEMPTS: usize = 5;

/// Output directory on the local filesystem
#[derive(Clone)]
pub struct LocalOutputStore {
    base_path: PathBuf,
    name_generator: fn() -> String,
}

impl LocalOutputStore {
    /// Create a new LocalOutputStore, creating `base_path` if it does not exist
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create output directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalOutputStore {
            base_path,
            name_generator: generate_filename,
        })
    }

    /// Replace the filename generator. Generated names must still pass
    /// [`is_valid_filename`] or they could never be served back.
    pub fn with_name_generator(mut self, name_generator: fn() -> String) -> Self {
        self.name_generator = name_generator;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a filename to its path after checking it against the generator pattern
    fn filename_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if !is_valid_filename(filename) {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }
        Ok(self.base_path.join(filename))
    }

    /// Create `path` exclusively and write `data` to it.
    ///
    /// Returns `Ok(false)` when the file already exists.
    async fn write_new(&self, path: &Path, data: &[u8]) -> StorageResult<bool> {
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let written = async {
            file.write_all(data).await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        discard_on_error(path, written).await?;
        Ok(true)
    }
}

/// Remove a file whose write failed so a partial image is never served under a valid name.
async fn discard_on_error(path: &Path, written: std::io::Result<()>) -> StorageResult<()> {
    let Err(write_err) = written else {
        return Ok(());
    };

    if let Err(e) = fs::remove_file(path).await {
        tracing::error!(
            path = %path.display(),
            error = %e,
            "Failed to remove partially written file"
        );
    }

    Err(StorageError::WriteFailed(format!(
        "Failed to write file {}: {}",
        path.display(),
        write_err
    )))
}

#[async_trait]
impl OutputStore for LocalOutputStore {
    async fn store(&self, data: Vec<u8>) -> StorageResult<String> {
        let start = std::time::Instant::now();
        let size = data.len();

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let filename = (self.name_generator)();
            let path = self.filename_to_path(&filename)?;

            if self.write_new(&path, &data).await? {
                tracing::info!(
                    path = %path.display(),
                    filename = %filename,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Stored generated image"
                );
                return Ok(filename);
            }

            tracing::warn!(
                filename = %filename,
                attempt = attempt,
                "Output filename already exists, drawing a new one"
            );
        }

        Err(StorageError::NameCollision(MAX_NAME_ATTEMPTS))
    }

    async fn load(&self, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.filename_to_path(filename)?;
        let start = std::time::Instant::now();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Loaded generated image"
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FIXED_NAME: &str = "generated_20240101_120000_deadbeef.png";

    #[tokio::test]
    async fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("output");

        let store = LocalOutputStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.base_path(), nested.as_path());
    }

    #[tokio::test]
    async fn store_then_load_returns_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        let data = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let filename = store.store(data.clone()).await.unwrap();

        assert!(is_valid_filename(&filename));
        assert_eq!(store.load(&filename).await.unwrap(), data);
        assert_eq!(std::fs::read(dir.path().join(&filename)).unwrap(), data);
    }

    #[tokio::test]
    async fn distinct_requests_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        let a = store.store(vec![1]).await.unwrap();
        let b = store.store(vec![2]).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn colliding_then_fresh() -> String {
        if CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
            FIXED_NAME.to_string()
        } else {
            "generated_20240101_120000_cafebabe.png".to_string()
        }
    }

    #[tokio::test]
    async fn collision_draws_a_new_name_and_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FIXED_NAME), b"original").unwrap();

        let store = LocalOutputStore::new(dir.path())
            .await
            .unwrap()
            .with_name_generator(colliding_then_fresh);

        let filename = store.store(b"new".to_vec()).await.unwrap();
        assert_eq!(filename, "generated_20240101_120000_cafebabe.png");
        assert_eq!(
            std::fs::read(dir.path().join(FIXED_NAME)).unwrap(),
            b"original"
        );
    }

    fn always_fixed() -> String {
        FIXED_NAME.to_string()
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FIXED_NAME), b"original").unwrap();

        let store = LocalOutputStore::new(dir.path())
            .await
            .unwrap()
            .with_name_generator(always_fixed);

        let err = store.store(b"new".to_vec()).await.unwrap_err();
        assert!(matches!(err, StorageError::NameCollision(MAX_NAME_ATTEMPTS)));
    }

    #[tokio::test]
    async fn failed_write_removes_the_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXED_NAME);
        std::fs::write(&path, b"\x89PN").unwrap();

        let written = Err(std::io::Error::other("No space left on device"));
        let err = discard_on_error(&path, written).await.unwrap_err();

        assert!(matches!(err, StorageError::WriteFailed(ref msg) if msg.contains("No space left")));
        assert!(!path.exists());

        let store = LocalOutputStore::new(dir.path()).await.unwrap();
        assert!(matches!(
            store.load(FIXED_NAME).await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn successful_write_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXED_NAME);
        std::fs::write(&path, b"complete").unwrap();

        discard_on_error(&path, Ok(())).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"complete");
    }

    #[tokio::test]
    async fn load_unknown_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        let err = store.load(FIXED_NAME).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn load_rejects_names_outside_the_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"secret").unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        for name in ["notes.txt", "../Cargo.toml", "/etc/passwd"] {
            let err = store.load(name).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "{name}");
        }
    }
}
