// src/utils/ids.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("segment pattern is valid")
});

/// Whether `id` can be used as one path segment of a document path.
pub fn is_valid_segment(id: &str) -> bool {
    SEGMENT_RE.is_match(id)
}

/// Rejects ids that could escape their document path (slashes, dots, empty).
pub fn ensure_segment<'a>(kind: &str, id: &'a str) -> Result<&'a str, AppError> {
    if is_valid_segment(id) {
        Ok(id)
    } else {
        Err(AppError::BadRequest(format!("Invalid {} id", kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        for id in ["u1", "course-101", "Kx9_ZpQ2mRbT3aLw8YvE", "0"] {
            assert!(is_valid_segment(id), "{id}");
        }
    }

    #[test]
    fn rejects_path_escapes() {
        for id in ["", "a/b", "..", "a b", "m%2F", &"x".repeat(129)] {
            assert!(!is_valid_segment(id), "{id}");
        }
        assert!(matches!(ensure_segment("course", "../x"), Err(AppError::BadRequest(_))));
    }
}
