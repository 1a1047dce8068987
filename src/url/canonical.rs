use crate::UrlError;
use std::fmt;
use url::Url;

/// Dedup key for a URL: its string form with the fragment stripped
///
/// Two URLs that differ only by fragment always map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes the canonical dedup key of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::canonicalize;
///
/// let a = Url::parse("https://example.com/page#intro").unwrap();
/// let b = Url::parse("https://example.com/page").unwrap();
/// assert_eq!(canonicalize(&a), canonicalize(&b));
/// ```
pub fn canonicalize(url: &Url) -> CanonicalKey {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    CanonicalKey(stripped.into())
}

/// Resolves the seed URL given on the command line
///
/// Seeds without an `http://` or `https://` prefix get `https://` prepended.
/// The result must carry a host.
///
/// # Examples
///
/// ```
/// use site_mirror::url::resolve_seed_url;
///
/// let url = resolve_seed_url("example.com/docs/").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/");
/// ```
pub fn resolve_seed_url(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}
