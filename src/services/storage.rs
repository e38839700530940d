use anyhow::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::io::AsyncRead;

/// Stat record for a stored entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryStat {
    pub size: u64,
    pub modified: SystemTime,
}

/// Narrow storage seam over the flat files directory.
///
/// Filenames are the only addressing scheme; there are no sidecar metadata
/// files. The store provides no locking or multi-writer coordination:
/// concurrent uploads of the same name may interleave write and inspect
/// steps, so a partially written or about-to-be-rejected file can be
/// momentarily listable or downloadable. That window is an accepted
/// limitation of the design.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Names of the regular files directly inside the storage directory.
    /// Subdirectories and non-regular entries are skipped; no recursion.
    async fn list(&self) -> Result<Vec<String>>;

    /// Size and modification time, or `None` if the entry is absent or not
    /// a regular file.
    async fn stat(&self, name: &str) -> Result<Option<EntryStat>>;

    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Byte stream for downloads.
    async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>>;

    /// Writes the full content, overwriting any existing file of that name.
    async fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    async fn delete(&self, name: &str) -> Result<()>;
}

/// `FileStore` over a single local directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn stat(&self, name: &str) -> Result<Option<EntryStat>> {
        match tokio::fs::metadata(self.path_of(name)).await {
            Ok(md) if md.is_file() => Ok(Some(EntryStat {
                size: md.len(),
                modified: md.modified()?,
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path_of(name)).await?)
    }

    async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let file = tokio::fs::File::open(self.path_of(name)).await?;
        Ok(Box::new(file))
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        tokio::fs::write(self.path_of(name), data).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        tokio::fs::remove_file(self.path_of(name)).await?;
        Ok(())
    }
}
