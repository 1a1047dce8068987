use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when the URL has no host or its host equals `base_host`
///
/// Ports are not part of the comparison.
pub fn same_host(url: &Url, base_host: &str) -> bool {
    match url.host_str() {
        None => true,
        Some(host) => host.is_empty() || host.eq_ignore_ascii_case(base_host),
    }
}
