//! Outbound link classification
//!
//! Resolves each href against the page URL and splits the results into crawl
//! targets (same-domain documents), assets (same-domain files from a fixed
//! extension set), and rejects (foreign hosts, non-http schemes, non-link
//! hrefs). A single malformed href never aborts the rest of the page.

use crate::url::normalize_url;
use url::Url;

/// Extensions routed to the asset log instead of the frontier
pub const ASSET_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".svg", ".pdf", ".zip", ".rar", ".ico",
];

/// Classification of a single resolved link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Same-domain document URL, normalized, to be queued for crawling
    Page(Url),
    /// Same-domain asset URL, to be logged but never crawled
    Asset(Url),
}

/// The links of one page, split by classification
#[derive(Debug, Default)]
pub struct ClassifiedLinks {
    pub pages: Vec<Url>,
    pub assets: Vec<Url>,
    /// Hrefs that failed to resolve and were skipped
    pub malformed: usize,
}

/// Resolves and classifies every outbound href of a page
pub fn classify_links(hrefs: &[String], page_url: &Url, domain: &str) -> ClassifiedLinks {
    let mut result = ClassifiedLinks::default();

    for href in hrefs {
        match classify_link(href, page_url, domain) {
            Ok(Some(LinkClass::Page(url))) => result.pages.push(url),
            Ok(Some(LinkClass::Asset(url))) => result.assets.push(url),
            Ok(None) => {}
            Err(reason) => {
                result.malformed += 1;
                tracing::debug!(
                    href = %href,
                    %page_url,
                    reason = %reason,
                    "skipping link that failed to resolve"
                );
            }
        }
    }

    result
}

/// Classifies one href
///
/// `Ok(None)` means the link is rejected (non-link href, non-http scheme, or
/// foreign host); `Err` means it could not be resolved at all.
pub fn classify_link(
    href: &str,
    page_url: &Url,
    domain: &str,
) -> Result<Option<LinkClass>, String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Ok(None);
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return Ok(None);
    }

    let resolved = page_url.join(href).map_err(|e| e.to_string())?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return Ok(None);
    }

    let normalized = normalize_url(resolved.as_str()).map_err(|e| e.to_string())?;

    // Domain check before the asset check: cross-domain links are dropped
    // entirely, never logged as assets.
    if normalized.host_str() != Some(domain) {
        return Ok(None);
    }

    if is_asset(&normalized) {
        return Ok(Some(LinkClass::Asset(normalized)));
    }

    Ok(Some(LinkClass::Page(normalized)))
}

/// True when the URL path ends in one of the asset extensions
pub fn is_asset(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
