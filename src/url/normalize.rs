use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used for de-duplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Validate scheme: only HTTP and HTTPS are accepted
/// 3. Lowercase scheme and host, strip default ports (the parser already
///    does both for http/https URLs)
/// 4. Normalize path:
///    - Collapse repeated slashes
///    - Remove dot segments (. and ..)
///    - Remove trailing slash (except for root /)
/// 5. Remove fragment (everything after #)
/// 6. Sort query parameters lexicographically by key, then value, and
///    re-encode; an empty query string is removed entirely
///
/// Normalization is idempotent: applying it to its own output returns the
/// same URL.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use terrier::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.EDU:80/a/?b=2&a=1#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.edu/a?a=1&b=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let params = sorted_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Normalizes a URL path by collapsing repeated slashes, resolving dot
/// segments, and dropping the trailing slash (except for the root path)
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Empty segments come from repeated slashes
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Decoded query parameters sorted by key, then value. Blank values are kept.
fn sorted_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();

    params
}
