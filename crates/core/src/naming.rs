//! Upload file naming: safe filenames and unique storage keys.

use uuid::Uuid;

/// Prefix under which uploaded documents are stored.
pub const DOCUMENT_KEY_PREFIX: &str = "uploads/documents";

/// Fallback used when sanitizing leaves nothing behind.
const FALLBACK_NAME: &str = "document";

/// Reduce an untrusted client filename to a safe ASCII basename.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// other than ASCII alphanumerics, `.`, `-` and `_` is removed. Leading dots
/// and underscores are stripped so the result can never be hidden or
/// relative.
pub fn secure_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased extension of `filename` (text after the last `.`), if any.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a unique storage key for an uploaded document:
/// `uploads/documents/{uuid}_{safe_stem}.{ext}`.
pub fn generate_object_key(filename: &str) -> String {
    let safe = secure_filename(filename);
    let unique = Uuid::new_v4();
    match safe.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => format!(
            "{DOCUMENT_KEY_PREFIX}/{unique}_{stem}.{}",
            ext.to_ascii_lowercase()
        ),
        _ => format!("{DOCUMENT_KEY_PREFIX}/{unique}_{safe}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_and_unsafe_chars() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename(r"C:\docs\My Review (final).pdf"), "My_Review_final.pdf");
    }

    #[test]
    fn never_returns_hidden_or_empty_names() {
        assert_eq!(secure_filename(".bashrc"), "bashrc");
        assert_eq!(secure_filename("???"), "document");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Review.PDF"), Some("pdf".into()));
        assert_eq!(file_extension("archive.tar.docx"), Some("docx".into()));
        assert_eq!(file_extension("no_extension"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn object_key_is_unique_and_prefixed() {
        let a = generate_object_key("My Essay.DOCX");
        let b = generate_object_key("My Essay.DOCX");
        assert_ne!(a, b);
        assert!(a.starts_with("uploads/documents/"));
        assert!(a.ends_with("_My_Essay.docx"));
    }
}
