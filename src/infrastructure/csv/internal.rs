// ============================================================
// INTERNAL PAGES CSV PARSER
// ============================================================
// Crawl exports name their columns inconsistently, so the URL and
// indexability columns are discovered by keyword. URLs outside the
// homepage domains are dropped, the rest are grouped by locale.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::domain::error::{AppError, Result};
use crate::domain::locale::HomepageMap;
use crate::domain::page::{extract_path_pattern, PageEntry};

use super::reader::CsvTable;

const URL_KEYWORDS: [&str; 5] = ["url", "address", "link", "href", "page"];
const INDEXABILITY_KEYWORDS: [&str; 5] =
    ["indexability", "indexable", "index", "status", "indexation"];

#[derive(Debug, Default, Clone, Copy)]
pub struct InternalParseStats {
    pub indexable: usize,
    pub non_indexable: usize,
    pub skipped: usize,
}

/// Locale key -> pages for that locale. Unmatched in-domain URLs are
/// grouped under their lowercased origin.
pub type PagesByLocale = BTreeMap<String, Vec<PageEntry>>;

pub fn parse_internal_csv(
    path: &Path,
    homepages: &HomepageMap,
) -> Result<(PagesByLocale, InternalParseStats)> {
    let table = CsvTable::from_file(path)?;
    parse_internal_table(&table, homepages)
}

pub(crate) fn parse_internal_table(
    table: &CsvTable,
    homepages: &HomepageMap,
) -> Result<(PagesByLocale, InternalParseStats)> {
    info!(columns = ?table.headers, "Internal CSV columns");

    let url_column = find_column(&table.headers, &URL_KEYWORDS).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Could not find URL column. Available columns: {}",
            table.headers.join(", ")
        ))
    })?;
    info!(column = %url_column, "Using URL column");

    let indexability_column = find_column(&table.headers, &INDEXABILITY_KEYWORDS);
    if let Some(column) = &indexability_column {
        info!(column = %column, "Using indexability column");
    }

    let base_domains: BTreeSet<String> = homepages
        .values()
        .filter_map(|hp| origin_of(&hp.url))
        .collect();
    info!(domains = ?base_domains, "Base domains to process");

    let mut pages = PagesByLocale::new();
    let mut stats = InternalParseStats::default();

    for (row_num, row) in table.rows.iter().enumerate() {
        let row_num = row_num + 2;

        let url = table.get(row, &url_column).trim();
        if url.is_empty() {
            continue;
        }

        if let Some(column) = &indexability_column {
            if !is_indexable(table.get(row, column)) {
                stats.non_indexable += 1;
                continue;
            }
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(row = row_num, url = %url, error = %e, "Unparseable URL, skipping");
                stats.skipped += 1;
                continue;
            }
        };

        let base_url = match origin_of(url) {
            Some(base) => base,
            None => {
                stats.skipped += 1;
                continue;
            }
        };
        if !base_domains.contains(&base_url) {
            stats.skipped += 1;
            continue;
        }

        let key = match match_homepage(parsed.path(), homepages) {
            Some(key) => key,
            None => base_url.to_lowercase(),
        };

        let pattern = extract_path_pattern(url);
        pages
            .entry(key)
            .or_default()
            .push(PageEntry::new(url.to_string(), pattern));
        stats.indexable += 1;

        if row_num % 1000 == 0 {
            info!(rows = row_num, indexable = stats.indexable, "Processing internal CSV");
        }
    }

    info!(
        indexable = stats.indexable,
        non_indexable = stats.non_indexable,
        skipped = stats.skipped,
        "Internal CSV parsing complete"
    );

    Ok((pages, stats))
}

/// First header whose normalized name contains one of the keywords.
fn find_column(headers: &[String], keywords: &[&str]) -> Option<String> {
    for header in headers {
        let normalized = header.to_lowercase().replace([' ', '_'], "");
        if keywords.iter().any(|kw| normalized.contains(kw)) {
            return Some(header.clone());
        }
    }
    None
}

/// Crawl tools express indexability many ways; treat anything
/// negative-looking as non-indexable.
fn is_indexable(value: &str) -> bool {
    let value = value.trim().to_lowercase();

    if matches!(value.as_str(), "false" | "no" | "n" | "0" | "") {
        return false;
    }
    if value.contains("non")
        || value.contains("not")
        || value.contains("no index")
        || value.contains("noindex")
    {
        return false;
    }
    true
}

fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Locale whose homepage path prefixes the URL path. The longest
/// matching prefix wins, so a root-path default homepage does not
/// capture URLs that belong to a more specific locale.
fn match_homepage(path: &str, homepages: &HomepageMap) -> Option<String> {
    let mut best: Option<(usize, &String)> = None;
    for (key, homepage) in homepages {
        let homepage_path = Url::parse(&homepage.url)
            .map(|u| u.path().trim_end_matches('/').to_string())
            .unwrap_or_default();
        if !path.starts_with(&homepage_path) {
            continue;
        }
        if best.map_or(true, |(len, _)| homepage_path.len() > len) {
            best = Some((homepage_path.len(), key));
        }
    }
    best.map(|(_, key)| key.clone())
}
