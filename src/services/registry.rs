use crate::models::{StoredFile, ZipInfo};
use crate::services::archive;
use crate::services::storage::FileStore;
use crate::utils::format::human_size;
use crate::utils::hash::digest_prefix;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::time::{SystemTime, UNIX_EPOCH};

/// Builds the listing view over the storage directory.
///
/// Every call re-reads and re-hashes the full content of every file, so the
/// digest always reflects the bytes currently on disk. Cost is O(total bytes
/// across all files) per call; nothing is cached.
pub async fn list_files(store: &dyn FileStore) -> Result<Vec<StoredFile>> {
    let mut out = Vec::new();

    for name in store.list().await? {
        // The entry may disappear between list and stat.
        let Some(stat) = store.stat(&name).await? else {
            continue;
        };
        let bytes = store.read(&name).await?;

        let zip = archive::is_zip_name(&name).then(|| {
            let report = archive::inspect(&bytes);
            ZipInfo {
                count: report.entry_count,
                empty: report.is_empty,
                bad: report.is_corrupt,
            }
        });

        out.push(StoredFile {
            size: stat.size,
            size_h: human_size(stat.size),
            mtime: epoch_secs(stat.modified),
            mtime_iso: format_local(stat.modified),
            sha12: digest_prefix(&bytes),
            zip,
            name,
        });
    }

    // Newest first; name tiebreak keeps the order deterministic.
    out.sort_by(|a, b| b.mtime.cmp(&a.mtime).then_with(|| a.name.cmp(&b.name)));
    Ok(out)
}

fn epoch_secs(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn format_local(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
