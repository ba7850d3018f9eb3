// ============================================================
// SITEMAP DOCUMENTS
// ============================================================
// Urlset and sitemap-index models plus the protocol limits that
// drive file splitting. No I/O here; serialization lives in
// infrastructure::xml.

use serde::{Deserialize, Serialize};

use super::page::PageEntry;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap protocol limits.
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;
pub const MAX_SITEMAP_BYTES: usize = 50 * 1024 * 1024;

/// Safety cap on files per sitemap group.
pub const MAX_SITEMAPS_PER_GROUP: usize = 100;

/// Serialized bytes per `<url>` entry beyond the URL text itself
/// (tags plus two-space indentation), and for the document envelope.
/// Used to estimate file size without serializing.
const URL_ENTRY_OVERHEAD: usize = 33;
const DOCUMENT_OVERHEAD: usize = 128;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Urlset {
    pub urls: Vec<String>,
}

impl Urlset {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Estimate of the pretty-printed XML size in bytes.
    pub fn estimated_size(&self) -> usize {
        DOCUMENT_OVERHEAD
            + self
                .urls
                .iter()
                .map(|u| u.len() + URL_ENTRY_OVERHEAD)
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub loc: String,
    pub lastmod: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapIndex {
    pub entries: Vec<IndexEntry>,
}

impl SitemapIndex {
    /// Build an index covering `num_sitemaps` files of one group.
    ///
    /// `base_url` is the homepage the sitemaps will be hosted under;
    /// master and paginated groups have none and get a placeholder
    /// domain the user substitutes on upload.
    pub fn build(
        base_url: Option<&str>,
        num_sitemaps: usize,
        identifier: &str,
        date: &str,
        lastmod: &str,
        is_paginated: bool,
    ) -> Self {
        let prefix = if is_paginated { "paginated_" } else { "" };
        let base_filename = format!("{}sitemap_{}_{}", prefix, date, identifier);

        let entries = (1..=num_sitemaps)
            .map(|i| {
                let loc = match base_url {
                    Some(base) => format!("{}/{}_{}.xml.gz", base, base_filename, i),
                    None => format!("https://yourdomain.com/{}_{}.xml.gz", base_filename, i),
                };
                IndexEntry {
                    loc,
                    lastmod: lastmod.to_string(),
                }
            })
            .collect();

        Self { entries }
    }
}

/// One sitemap's worth of URLs cut from a page list.
#[derive(Debug, Clone)]
pub struct SitemapBatch {
    pub urlset: Urlset,

    /// (url, sitemap key) pairs for the CSV report.
    pub url_list: Vec<(String, String)>,

    /// URLs placed in this sitemap (homepage included).
    pub url_count: usize,

    /// Input pages examined, duplicates included. The next batch
    /// starts at this offset.
    pub consumed: usize,
}

/// Fill one sitemap from `pages`, honoring the URL and size limits.
///
/// The homepage (trailing slash enforced) leads the first sitemap of a
/// group; later sitemaps and homepage-less groups start straight from
/// the pages. Duplicate URLs are dropped.
pub fn build_batch(
    homepage: Option<&str>,
    pages: &[PageEntry],
    key: &str,
    sitemap_number: usize,
) -> SitemapBatch {
    let mut urlset = Urlset::default();
    let mut url_list = Vec::new();
    let mut added: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut url_count = 0usize;
    let mut consumed = 0usize;

    if let Some(homepage) = homepage {
        if sitemap_number == 1 {
            let home = if homepage.ends_with('/') {
                homepage.to_string()
            } else {
                format!("{}/", homepage)
            };
            urlset.urls.push(home.clone());
            url_list.push((home.clone(), key.to_string()));
            added.insert(home);
            url_count += 1;
        }
    }

    for page in pages {
        consumed += 1;

        if added.contains(&page.url) {
            continue;
        }

        urlset.urls.push(page.url.clone());
        url_list.push((page.url.clone(), key.to_string()));
        added.insert(page.url.clone());
        url_count += 1;

        if url_count % 100 == 0 && urlset.estimated_size() > MAX_SITEMAP_BYTES {
            break;
        }

        if url_count >= MAX_URLS_PER_SITEMAP {
            break;
        }
    }

    SitemapBatch {
        urlset,
        url_list,
        url_count,
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(urls: &[&str]) -> Vec<PageEntry> {
        urls.iter()
            .map(|u| PageEntry::new(u.to_string(), String::new()))
            .collect()
    }

    #[test]
    fn test_homepage_leads_first_sitemap_with_slash() {
        let batch = build_batch(
            Some("https://example.com/us"),
            &pages(&["https://example.com/us/a"]),
            "EN-US",
            1,
        );
        assert_eq!(batch.urlset.urls[0], "https://example.com/us/");
        assert_eq!(batch.url_count, 2);
    }

    #[test]
    fn test_homepage_skipped_on_later_sitemaps() {
        let batch = build_batch(
            Some("https://example.com/us"),
            &pages(&["https://example.com/us/a"]),
            "EN-US",
            2,
        );
        assert_eq!(batch.urlset.urls[0], "https://example.com/us/a");
        assert_eq!(batch.url_count, 1);
    }

    #[test]
    fn test_duplicate_urls_dropped() {
        let batch = build_batch(
            None,
            &pages(&[
                "https://example.com/a",
                "https://example.com/a",
                "https://example.com/b",
            ]),
            "master",
            1,
        );
        assert_eq!(batch.url_count, 2);
        assert_eq!(batch.consumed, 3);
    }

    #[test]
    fn test_homepage_duplicate_in_pages_dropped() {
        let batch = build_batch(
            Some("https://example.com/us/"),
            &pages(&["https://example.com/us/", "https://example.com/us/a"]),
            "EN-US",
            1,
        );
        assert_eq!(batch.url_count, 2);
        assert_eq!(batch.consumed, 2);
    }

    #[test]
    fn test_url_limit_splits_batch() {
        let many: Vec<PageEntry> = (0..MAX_URLS_PER_SITEMAP + 5)
            .map(|i| PageEntry::new(format!("https://example.com/p{}", i), String::new()))
            .collect();
        let batch = build_batch(None, &many, "master", 1);
        assert_eq!(batch.url_count, MAX_URLS_PER_SITEMAP);
        assert_eq!(batch.consumed, MAX_URLS_PER_SITEMAP);
    }

    #[test]
    fn test_estimated_size_grows_with_urls() {
        let mut urlset = Urlset::default();
        let empty = urlset.estimated_size();
        urlset.urls.push("https://example.com/a".to_string());
        assert!(urlset.estimated_size() > empty);
    }

    #[test]
    fn test_index_locs_under_homepage() {
        let index = SitemapIndex::build(
            Some("https://example.com/us"),
            2,
            "EN-US",
            "20250101",
            "2025-01-01",
            false,
        );
        assert_eq!(index.entries.len(), 2);
        assert_eq!(
            index.entries[0].loc,
            "https://example.com/us/sitemap_20250101_EN-US_1.xml.gz"
        );
        assert_eq!(index.entries[0].lastmod, "2025-01-01");
    }

    #[test]
    fn test_index_placeholder_domain_and_paginated_prefix() {
        let index = SitemapIndex::build(None, 1, "EN-US", "20250101", "2025-01-01", true);
        assert_eq!(
            index.entries[0].loc,
            "https://yourdomain.com/paginated_sitemap_20250101_EN-US_1.xml.gz"
        );
    }
}
