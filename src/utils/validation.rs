use anyhow::{Result, anyhow};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Sanitizes a client-supplied filename to a flat base name.
///
/// Drops any directory components (both `/` and `\` are treated as
/// separators), replaces control and reserved characters with `_`, strips
/// leading dots, and caps the length at 255 bytes. The same function runs on
/// the upload and download paths so one logical name always resolves to the
/// same storage entry.
pub fn sanitize_filename(filename: &str) -> Result<String> {
    // Keep only the final path component.
    let name = filename.rsplit(['/', '\\']).next().unwrap_or("");

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("path components in supplied filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // No hidden files: ".bashrc" stores as "bashrc", ".." collapses to nothing.
    let sanitized = sanitized.trim_start_matches('.').to_string();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    if sanitized.is_empty() {
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILENAME",
            message: "filename is empty after sanitization".to_string(),
        }));
    }

    Ok(sanitized)
}
