//! HTML content processing
//!
//! Reduces a fetched document to the fields the crawler persists: cleaned
//! visible text, the content hash computed over it, title, first heading,
//! meta description, and the raw outbound hrefs for the link classifier.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Elements whose subtrees never contribute to cleaned text: non-visible
/// content plus layout regions.
const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside",
];

/// Returned when a response does not declare an HTML body
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected HTML content, got '{content_type}'")]
pub struct ContentTypeMismatch {
    pub content_type: String,
}

/// A fetched document reduced to the fields the crawler persists
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// First `<title>` text, trimmed; empty when absent
    pub title: String,
    /// First `<h1>` text, if present
    pub heading: Option<String>,
    /// Content of `<meta name="description">`, if present
    pub meta_description: Option<String>,
    /// Cleaned visible text, whitespace collapsed
    pub text: String,
    /// Hex digest of the cleaned text
    pub content_hash: String,
    /// Raw anchor hrefs, unresolved
    pub links: Vec<String>,
}

/// Checks whether a Content-Type header value declares HTML
pub fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html")
}

/// Parses an HTML body into cleaned text, metadata, and outbound hrefs
///
/// Fails fast when the declared content type is not HTML; the caller must
/// neither persist such a response nor extract links from it.
pub fn process_document(
    body: &str,
    content_type: &str,
) -> Result<ProcessedDocument, ContentTypeMismatch> {
    if !is_html(content_type) {
        return Err(ContentTypeMismatch {
            content_type: content_type.to_string(),
        });
    }

    let document = Html::parse_document(body);

    let text = clean_text(&document);
    let content_hash = hash_text(&text);

    Ok(ProcessedDocument {
        title: extract_title(&document).unwrap_or_default(),
        heading: extract_heading(&document),
        meta_description: extract_meta_description(&document),
        text,
        content_hash,
        links: extract_hrefs(&document),
    })
}

/// Visible text with scripts, styles, layout regions, and comments removed,
/// whitespace runs collapsed to single spaces
fn clean_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Comment(_) => return,
        Node::Text(text) => {
            out.push_str(&text.text);
            out.push(' ');
            return;
        }
        Node::Element(element) if STRIPPED_ELEMENTS.contains(&element.name()) => return,
        _ => {}
    }

    for child in node.children() {
        collect_text(child, out);
    }
}

/// SHA-256 over the cleaned text, hex encoded
fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(body: &str) -> ProcessedDocument {
        process_document(body, "text/html; charset=utf-8").unwrap()
    }

    #[test]
    fn test_content_type_mismatch() {
        let result = process_document("{}", "application/json");
        let err = result.unwrap_err();
        assert_eq!(err.content_type, "application/json");
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));

        assert!(!is_html("application/pdf"));
        assert!(!is_html("application/json"));
        assert!(!is_html(""));
    }

    #[test]
    fn test_extract_title() {
        let doc = process("<html><head><title>  Campus Home  </title></head><body></body></html>");
        assert_eq!(doc.title, "Campus Home");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let doc = process("<html><body><p>text</p></body></html>");
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_extract_heading_and_meta_description() {
        let doc = process(
            r#"<html><head>
            <meta name="description" content="About the campus">
            </head><body><h1> Welcome </h1><h1>Second</h1></body></html>"#,
        );
        assert_eq!(doc.heading, Some("Welcome".to_string()));
        assert_eq!(doc.meta_description, Some("About the campus".to_string()));
    }

    #[test]
    fn test_scripts_styles_and_layout_stripped() {
        let doc = process(
            r#"<html><body>
            <nav>Navigation</nav>
            <header>Banner</header>
            <script>var x = 1;</script>
            <style>p { color: red; }</style>
            <noscript>enable js</noscript>
            <p>Visible content</p>
            <footer>Footer text</footer>
            <aside>Sidebar</aside>
            </body></html>"#,
        );
        assert_eq!(doc.text, "Visible content");
    }

    #[test]
    fn test_comments_stripped() {
        let doc = process("<html><body><!-- hidden --><p>Shown</p></body></html>");
        assert_eq!(doc.text, "Shown");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let doc = process("<html><body><p>a\n\n   b\t c</p></body></html>");
        assert_eq!(doc.text, "a b c");
    }

    #[test]
    fn test_same_text_different_markup_same_hash() {
        let a = process("<html><body><p>Shared   content</p></body></html>");
        let b = process(
            "<html><body><!-- note --><div><span>Shared</span> <b>content</b></div></body></html>",
        );
        assert_eq!(a.text, b.text);
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn test_different_text_different_hash() {
        let a = process("<html><body><p>one</p></body></html>");
        let b = process("<html><body><p>two</p></body></html>");
        assert_ne!(a.content_hash, b.content_hash);
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let doc = process("<html><body><p>x</p></body></html>");
        assert_eq!(doc.content_hash.len(), 64);
        assert!(doc.content_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hrefs_extracted_raw() {
        let doc = process(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="https://other.org/page">Other</a>
            <a href="mailto:admin@example.edu">Mail</a>
            <a href="   ">Blank</a>
            </body></html>"#,
        );
        assert_eq!(
            doc.links,
            vec![
                "/about".to_string(),
                "https://other.org/page".to_string(),
                "mailto:admin@example.edu".to_string()
            ]
        );
    }
}
