//! Page extraction: rendered markup to structured record
//!
//! Pure transformation with no IO and no shared state. Selection policy:
//! title from the first h1, description from the meta description tag,
//! the text of every paragraph in document order, and the target of every
//! anchor in document order.

use chrono::Utc;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::fetcher::RenderedPage;
use crate::sink::PageRecord;

/// Ways extraction can fail
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed content: {0}")]
    MalformedContent(String),
}

/// Extracts a page record plus candidate outbound links from a snapshot
///
/// Candidate links are every resolvable anchor target, including ones the
/// link filter will later reject; the record's `links` field carries the
/// same sequence. Missing title or description are recorded as absent, not
/// as errors.
pub fn extract(page: &RenderedPage) -> Result<(PageRecord, Vec<Url>), ExtractError> {
    if page.html.trim().is_empty() {
        return Err(ExtractError::MalformedContent("empty document".to_string()));
    }

    let document = Html::parse_document(&page.html);

    let title = extract_title(&document);
    let description = extract_description(&document);
    let paragraphs = extract_paragraphs(&document);
    let links = extract_links(&document, &page.url);

    let record = PageRecord {
        url: page.url.clone(),
        title,
        description,
        paragraphs,
        links: links.clone(),
        fetched_at: Utc::now(),
    };

    Ok((record, links))
}

/// Extracts the text of the first h1 element
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the content of the meta description tag
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the text of every paragraph element, in document order
fn extract_paragraphs(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("p") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// Extracts every anchor target in document order, resolved to absolute URLs
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an anchor href to an absolute URL and validates it
///
/// Returns None for targets that cannot name a fetchable page:
/// javascript:/mailto:/tel: schemes, data URIs, fragment-only anchors,
/// unresolvable hrefs, and non-HTTP(S) URLs after resolution.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
