use serde::{Deserialize, Serialize};

/// Archive inspection result attached to `.zip` listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipInfo {
    pub count: usize,
    pub empty: bool,
    pub bad: bool,
}

/// Transient per-query view of one stored file. Derived from filesystem
/// state on every listing call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub size_h: String,
    pub mtime: i64,
    pub mtime_iso: String,
    pub sha12: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<ZipInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_field_omitted_when_absent() {
        let file = StoredFile {
            name: "a.txt".to_string(),
            size: 3,
            size_h: "3.0 B".to_string(),
            mtime: 1_700_000_000,
            mtime_iso: "2023-11-14 22:13:20".to_string(),
            sha12: "abcdef012345".to_string(),
            zip: None,
        };
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("zip").is_none());
    }

    #[test]
    fn test_zip_field_present_for_archives() {
        let file = StoredFile {
            name: "a.zip".to_string(),
            size: 22,
            size_h: "22.0 B".to_string(),
            mtime: 0,
            mtime_iso: String::new(),
            sha12: String::new(),
            zip: Some(ZipInfo {
                count: 0,
                empty: true,
                bad: false,
            }),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["zip"]["empty"], true);
        assert_eq!(json["zip"]["bad"], false);
        assert_eq!(json["zip"]["count"], 0);
    }
}
