use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

/// Structural inspection result for a zip archive.
///
/// A corrupt container reports `entry_count: 0, is_empty: true,
/// is_corrupt: true`; a well-formed archive with zero entries reports
/// `is_empty: true, is_corrupt: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipReport {
    pub entry_count: usize,
    pub is_empty: bool,
    pub is_corrupt: bool,
}

/// Inspects in-memory bytes as a zip container. Corruption is a normal,
/// representable outcome, never an error.
pub fn inspect(bytes: &[u8]) -> ZipReport {
    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => {
            let entry_count = archive.len();
            ZipReport {
                entry_count,
                is_empty: entry_count == 0,
                is_corrupt: false,
            }
        }
        Err(_) => ZipReport {
            entry_count: 0,
            is_empty: true,
            is_corrupt: true,
        },
    }
}

/// Whether a filename carries a `.zip` extension, case-insensitive.
pub fn is_zip_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}
