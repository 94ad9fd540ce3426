use url::Url;

/// Removes every trailing `/` from a base URL
///
/// ```
/// use course_harvest::url::strip_trailing_slashes;
///
/// assert_eq!(strip_trailing_slashes("https://u.ac.uk//"), "https://u.ac.uk");
/// ```
pub fn strip_trailing_slashes(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Returns true if the string parses as a URL with a scheme and a host
pub fn is_absolute(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| url.has_host())
        .unwrap_or(false)
}

/// Normalizes an anchor href into an absolute URL string
///
/// # Normalization Steps
///
/// 1. An href starting with `/` is prefixed with the base URL (trailing
///    slashes stripped). The result is kept as plain concatenation, not
///    re-serialized, so it matches the href byte for byte after the base.
/// 2. An href that is already absolute is returned unchanged.
/// 3. Any other relative href is resolved against the base URL with
///    standard URL joining.
///
/// Returns `None` when no absolute URL can be produced.
///
/// # Examples
///
/// ```
/// use course_harvest::url::normalize_href;
///
/// let url = normalize_href("/postgraduate/taught/ma-x", "https://u.ac.uk/");
/// assert_eq!(url.as_deref(), Some("https://u.ac.uk/postgraduate/taught/ma-x"));
/// ```
pub fn normalize_href(href: &str, base_url: &str) -> Option<String> {
    let candidate = if href.starts_with('/') {
        format!("{}{}", strip_trailing_slashes(base_url), href)
    } else {
        href.to_string()
    };

    if is_absolute(&candidate) {
        return Some(candidate);
    }

    // Relative paths like "ma-x" or "../taught/ma-x"
    let base = Url::parse(base_url).ok()?;
    let joined = base.join(&candidate).ok()?;
    if joined.has_host() {
        Some(joined.to_string())
    } else {
        None
    }
}
