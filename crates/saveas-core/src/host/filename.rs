//! File names for materialized downloads: URL path hints and sanitization.

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Sanitizes a suggested download name for the local filesystem.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims leading/trailing spaces and dots
/// - Collapses consecutive underscores
/// - Limits length to 255 bytes (NAME_MAX)
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    let result = &trimmed[..take];
    if result.is_empty() {
        None
    } else {
        Some(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_path_normal() {
        assert_eq!(
            filename_from_url_path("https://example.com/a/b/file.deb").as_deref(),
            Some("file.deb")
        );
        assert_eq!(
            filename_from_url_path("https://example.com/file.zip?token=abc").as_deref(),
            Some("file.zip")
        );
    }

    #[test]
    fn url_path_root_or_opaque() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("https://example.com"), None);
        assert_eq!(filename_from_url_path("data:text/plain,hi"), None);
        assert_eq!(filename_from_url_path("not a url"), None);
    }

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c.txt").as_deref(), Some("a_b_c.txt"));
    }

    #[test]
    fn keeps_inner_spaces_trims_outer_dots() {
        assert_eq!(
            sanitize_filename("  ..  my report.txt  ..  ").as_deref(),
            Some("my report.txt")
        );
    }

    #[test]
    fn control_chars_collapse() {
        assert_eq!(
            sanitize_filename("file\x00\x01name.txt").as_deref(),
            Some("file_name.txt")
        );
    }

    #[test]
    fn nothing_left() {
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("///"), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long).unwrap();
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
