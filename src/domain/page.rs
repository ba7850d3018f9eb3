// ============================================================
// PAGE TYPES
// ============================================================
// Internal page entries and URL classification rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PAGINATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/Page-\d+").unwrap());

/// One indexable URL from the internal pages CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub url: String,

    /// URL path with locale segments stripped, used to match the
    /// same page across locales.
    pub path_pattern: String,
}

impl PageEntry {
    pub fn new(url: String, path_pattern: String) -> Self {
        Self { url, path_pattern }
    }
}

/// Paginated listing pages (`/Page-2`, `/page-17`, ...) go into their
/// own sitemaps.
pub fn is_paginated_url(url: &str) -> bool {
    PAGINATION_PATTERN.is_match(url)
}

/// Split a locale's pages into (regular, paginated).
pub fn partition_pages(pages: Vec<PageEntry>) -> (Vec<PageEntry>, Vec<PageEntry>) {
    pages
        .into_iter()
        .partition(|page| !is_paginated_url(&page.url))
}

/// Extract the locale-independent path pattern from a URL.
///
/// Two-letter uppercase segments (country codes) are dropped, and a
/// two-letter segment followed by a short segment is treated as a
/// language/locale pair and both are dropped. The query string is kept.
pub fn extract_path_pattern(url: &str) -> String {
    let parsed = match url::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return raw_path_of(url),
    };

    let parts: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|p| !p.is_empty())
        .collect();

    let mut cleaned: Vec<&str> = Vec::new();
    let mut skip_next = false;

    for (i, part) in parts.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }

        if is_upper_token(part) {
            continue;
        } else if i < parts.len() - 1 && part.len() == 2 && parts[i + 1].len() <= 5 {
            skip_next = true;
            continue;
        }
        cleaned.push(part);
    }

    let mut path = if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", cleaned.join("/"))
    };

    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    path
}

/// Two characters, at least one alphabetic, all alphabetics uppercase.
fn is_upper_token(part: &str) -> bool {
    part.len() == 2
        && part.chars().any(|c| c.is_alphabetic())
        && part.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase())
}

/// Best-effort path for unparseable URLs.
fn raw_path_of(url: &str) -> String {
    let rest = url.split("://").nth(1).unwrap_or(url);
    match rest.find('/') {
        Some(pos) => rest[pos..].to_string(),
        None => "/".to_string(),
    }
}
