use crate::services::archive;
use crate::services::storage::FileStore;
use anyhow::Result;

/// Why the zip policy rejected a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipRejection {
    Empty,
    Corrupt,
}

impl ZipRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            ZipRejection::Empty => "empty",
            ZipRejection::Corrupt => "corrupt",
        }
    }
}

/// Enforces the block-empty-or-corrupt-zip policy at both transfer sites.
///
/// With the flag disabled both sites are no-ops and any file, valid or not,
/// is stored and served as-is.
#[derive(Clone)]
pub struct TransferGatekeeper {
    block_empty_zip: bool,
}

impl TransferGatekeeper {
    pub fn new(block_empty_zip: bool) -> Self {
        Self { block_empty_zip }
    }

    async fn screen(&self, store: &dyn FileStore, name: &str) -> Result<Option<ZipRejection>> {
        if !self.block_empty_zip || !archive::is_zip_name(name) {
            return Ok(None);
        }
        let bytes = store.read(name).await?;
        let report = archive::inspect(&bytes);
        if report.is_corrupt {
            Ok(Some(ZipRejection::Corrupt))
        } else if report.is_empty {
            Ok(Some(ZipRejection::Empty))
        } else {
            Ok(None)
        }
    }

    /// Upload-time check, run after the file has landed in storage. A
    /// rejected file is deleted best-effort; a failed deletion of an
    /// already-rejected file does not escalate the outcome.
    pub async fn screen_upload(
        &self,
        store: &dyn FileStore,
        name: &str,
    ) -> Result<Option<ZipRejection>> {
        let rejection = self.screen(store, name).await?;
        if let Some(rejection) = rejection {
            tracing::info!(
                "zip policy rejected upload of {} ({})",
                name,
                rejection.reason()
            );
            if let Err(e) = store.delete(name).await {
                tracing::warn!("failed to delete rejected upload {}: {}", name, e);
            }
        }
        Ok(rejection)
    }

    /// Download-time check. Never deletes; the file stays in place.
    pub async fn screen_download(
        &self,
        store: &dyn FileStore,
        name: &str,
    ) -> Result<Option<ZipRejection>> {
        self.screen(store, name).await
    }
}
