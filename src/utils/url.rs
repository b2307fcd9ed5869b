/// Trim whitespace and any trailing `/` from a configured base URL.
///
/// ```
/// use thrapy::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8001/api/"), "http://localhost:8001/api");
/// assert_eq!(normalize_base_url("http://localhost:8001/api"), "http://localhost:8001/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Endpoint URL under the `/api` base, e.g. `.../api/auth/login`.
///
/// ```
/// use thrapy::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8001/api/", "/auth/login"),
///     "http://localhost:8001/api/auth/login"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}

/// Endpoint URL built from raw path segments, each percent-encoded so a
/// `/`, `?` or `#` inside one cannot change the route.
///
/// Returns `None` for an unparsable base or an empty, `.` or `..` segment.
///
/// ```
/// use thrapy::utils::url::api_url_from_segments;
///
/// let url = api_url_from_segments("http://localhost:8001/api/", &["sessions", "a/b", "chat-history"])
///     .expect("valid segments");
/// assert_eq!(url.as_str(), "http://localhost:8001/api/sessions/a%2Fb/chat-history");
/// ```
pub fn api_url_from_segments(base_url: &str, segments: &[&str]) -> Option<reqwest::Url> {
    if segments
        .iter()
        .any(|segment| matches!(segment.trim(), "" | "." | ".."))
    {
        return None;
    }
    let mut url = reqwest::Url::parse(&normalize_base_url(base_url)).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

/// Whether a configured base URL looks usable for HTTP requests.
pub fn is_http_url(value: &str) -> bool {
    let trimmed = value.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    rest.is_some_and(|host| !host.is_empty() && !host.starts_with('/'))
}
