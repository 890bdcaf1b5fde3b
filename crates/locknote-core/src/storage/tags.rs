//! Tag normalization.

use std::collections::HashSet;

use crate::error::{LockNoteError, Result};

/// Maximum bytes per tag.
pub const MAX_TAG_BYTES: usize = 128;

/// Maximum tags per note.
pub const MAX_TAGS_PER_NOTE: usize = 100;

/// Normalize tag input before it is stored.
///
/// - Splits each input on commas, so `"a, b"` yields two tags
/// - Trims whitespace and drops empty tags
/// - Removes duplicates, keeping first-seen order
/// - Enforces length and count limits
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for tag in tags.iter().flat_map(|raw| raw.split(',')) {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.len() > MAX_TAG_BYTES {
            return Err(LockNoteError::Validation(format!(
                "Tag too long (max {} bytes)",
                MAX_TAG_BYTES
            )));
        }
        if seen.insert(trimmed.to_string()) {
            normalized.push(trimmed.to_string());
        }
    }

    if normalized.len() > MAX_TAGS_PER_NOTE {
        return Err(LockNoteError::Validation(format!(
            "Too many tags (max {})",
            MAX_TAGS_PER_NOTE
        )));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_comma_split_and_trim() {
        let result = normalize_tags(&tags(&["a, b", " c "])).unwrap();
        let set: HashSet<_> = result.iter().map(String::as_str).collect();
        assert_eq!(set, HashSet::from(["a", "b", "c"]));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_empty_and_duplicate_dropped() {
        let result = normalize_tags(&tags(&["work", "", " , ", "work", "home,work"])).unwrap();
        assert_eq!(result, tags(&["work", "home"]));
    }

    #[test]
    fn test_case_preserved() {
        let result = normalize_tags(&tags(&["Work", "work"])).unwrap();
        assert_eq!(result, tags(&["Work", "work"]));
    }

    #[test]
    fn test_tag_too_long() {
        let long = "x".repeat(MAX_TAG_BYTES + 1);
        let result = normalize_tags(&[long]);
        assert!(matches!(result, Err(LockNoteError::Validation(_))));
    }

    #[test]
    fn test_too_many_tags() {
        let many: Vec<String> = (0..=MAX_TAGS_PER_NOTE).map(|i| format!("t{}", i)).collect();
        let result = normalize_tags(&many);
        assert!(matches!(result, Err(LockNoteError::Validation(_))));
    }

    #[test]
    fn test_no_tags() {
        assert!(normalize_tags(&[]).unwrap().is_empty());
    }
}
