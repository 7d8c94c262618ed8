/// Validates a sign-in `callback_url` to prevent open redirects.
///
/// Returns `Some(url)` if the URL is a valid relative path, `None` otherwise.
///
/// # Security
///
/// This function prevents open redirect attacks by ensuring URLs:
/// - Start with a single `/` (relative path)
/// - Do not start with `//` (protocol-relative URLs like `//evil.com`)
/// - Do not contain control characters (potential injection)
/// - Do not contain `://` (absolute URLs with schemes like `https://`, `javascript:`)
///
/// # Examples
///
/// ```
/// use ovenlovin_core::auth::validate_callback_url;
///
/// // Valid relative paths
/// assert_eq!(validate_callback_url("/profile"), Some("/profile"));
/// assert_eq!(validate_callback_url("/"), Some("/"));
///
/// // Invalid: protocol-relative URL
/// assert_eq!(validate_callback_url("//evil.com"), None);
///
/// // Invalid: absolute URL
/// assert_eq!(validate_callback_url("https://evil.com"), None);
/// ```
pub fn validate_callback_url(url: &str) -> Option<&str> {
    // Must start with /
    if !url.starts_with('/') {
        return None;
    }

    // Reject protocol-relative URLs (//evil.com)
    if url.starts_with("//") {
        return None;
    }

    // Reject control characters (potential injection attacks)
    if url.chars().any(|c| c.is_control()) {
        return None;
    }

    // Reject URLs with schemes (https://, javascript:, etc.)
    if url.contains("://") {
        return None;
    }

    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_relative_path() {
        assert_eq!(validate_callback_url("/recipes/abc"), Some("/recipes/abc"));
    }

    #[test]
    fn accepts_root_path() {
        assert_eq!(validate_callback_url("/"), Some("/"));
    }

    #[test]
    fn accepts_path_with_query_string() {
        assert_eq!(
            validate_callback_url("/browse?search=ramen"),
            Some("/browse?search=ramen")
        );
    }

    #[test]
    fn rejects_https_url() {
        assert_eq!(validate_callback_url("https://evil.com"), None);
    }

    #[test]
    fn rejects_url_without_leading_slash() {
        assert_eq!(validate_callback_url("profile"), None);
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(validate_callback_url(""), None);
    }

    #[test]
    fn rejects_protocol_relative_url() {
        assert_eq!(validate_callback_url("//evil.com"), None);
        assert_eq!(validate_callback_url("//evil.com/path"), None);
    }

    #[test]
    fn rejects_javascript_url() {
        assert_eq!(validate_callback_url("javascript:alert(1)"), None);
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(validate_callback_url("/path\n/evil"), None);
        assert_eq!(validate_callback_url("/path\r/evil"), None);
        assert_eq!(validate_callback_url("/path\0/evil"), None);
    }

    #[test]
    fn rejects_scheme_embedded_in_path() {
        assert_eq!(validate_callback_url("/redirect?url=https://evil.com"), None);
    }

    #[test]
    fn accepts_colon_without_double_slash() {
        assert_eq!(
            validate_callback_url("/proxy?host=localhost:8080"),
            Some("/proxy?host=localhost:8080")
        );
    }
}
