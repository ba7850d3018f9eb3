// ============================================================
// SITEMAP GENERATION USE CASE
// ============================================================
// Orchestrates the full run: parse both CSVs, split pages per
// locale into regular/paginated groups, write sitemaps, indexes
// and reports, and drive the progress tracker.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{error, info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::page::{partition_pages, PageEntry};
use crate::domain::sitemap::{
    build_batch, SitemapIndex, MAX_SITEMAPS_PER_GROUP, MAX_URLS_PER_SITEMAP,
};
use crate::infrastructure::archive::write_raw_and_gzip;
use crate::infrastructure::csv::{parse_homepage_csv, parse_internal_csv};
use crate::infrastructure::storage::OutputLayout;
use crate::infrastructure::xml::{render_index, render_urlset};
use crate::shared::activity_log::{add_log, LogEntry};

use super::progress::{locale_percentage, ProgressTracker};
use super::reports::{write_skipped_report, write_url_report, SkippedLocale};

#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub regular_urls: usize,
    pub paginated_urls: usize,
    pub master_sitemaps: usize,
    pub skipped_locales: usize,
}

pub struct SitemapGenerator {
    layout: OutputLayout,
    progress: ProgressTracker,
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

/// Where one sitemap group's files go and what they are called.
struct GroupTarget {
    gz_dir: PathBuf,
    raw_dir: PathBuf,
    file_stem: String,
    index_stem: String,
    index_identifier: String,
    index_base_url: Option<String>,
    is_paginated: bool,
}

impl SitemapGenerator {
    pub fn new(
        layout: OutputLayout,
        progress: ProgressTracker,
        logs: Arc<Mutex<Vec<LogEntry>>>,
    ) -> Self {
        Self {
            layout,
            progress,
            logs,
        }
    }

    /// Run the whole pipeline. On error the caller is expected to
    /// route the message through [`SitemapGenerator::log_error`].
    pub fn run(&self, homepage_path: &Path, internal_path: &Path) -> Result<GenerationSummary> {
        self.progress.reset();

        info!("Parsing homepage CSV");
        let homepages = parse_homepage_csv(homepage_path)?;

        info!("Parsing internal pages CSV");
        let (mut pages_by_locale, _stats) = parse_internal_csv(internal_path, &homepages)?;

        let today = Local::now().format("%Y%m%d").to_string();
        let lastmod = Local::now().format("%Y-%m-%d").to_string();

        let mut all_urls: Vec<(String, String)> = Vec::new();
        let mut master_pages: Vec<PageEntry> = Vec::new();
        let mut all_paginated_urls: Vec<(String, String)> = Vec::new();
        let mut skipped: Vec<SkippedLocale> = Vec::new();

        let total_locales = homepages.len();
        info!(locales = total_locales, "Generating sitemaps");

        for (i, (locale_key, homepage)) in homepages.iter().enumerate() {
            self.progress.set_phase(
                format!("Processing {}", locale_key),
                locale_percentage(i, total_locales),
            );
            add_log(
                &self.logs,
                "INFO",
                "Generator",
                &format!("Processing {} ({}/{})", locale_key, i + 1, total_locales),
            );

            let pages = pages_by_locale.remove(locale_key).unwrap_or_default();
            if pages.is_empty() {
                warn!(locale = %locale_key, "No pages found, skipping sitemap generation");
                skipped.push(SkippedLocale {
                    locale: locale_key.clone(),
                    homepage: homepage.url.clone(),
                    section: homepage.section.clone().unwrap_or_default(),
                    country: homepage.country.clone(),
                });
                continue;
            }

            let (regular, paginated) = partition_pages(pages);
            let file_key = homepage.file_key(locale_key);
            info!(
                locale = %locale_key,
                regular = regular.len(),
                paginated = paginated.len(),
                "Partitioned pages"
            );

            if !regular.is_empty() {
                let home_url = homepage.url_with_slash();
                let target = GroupTarget {
                    gz_dir: self.layout.sitemap_dir(),
                    raw_dir: self.layout.raw_sitemap_dir(),
                    file_stem: format!("sitemap_{}_{}", today, file_key),
                    index_stem: format!("sitemap_index_{}_{}", today, file_key),
                    index_identifier: file_key.clone(),
                    index_base_url: Some(homepage.url.clone()),
                    is_paginated: false,
                };
                let url_list = self.write_group(
                    Some(&home_url),
                    &regular,
                    &file_key,
                    &target,
                    &today,
                    &lastmod,
                )?;
                master_pages.extend(
                    url_list
                        .iter()
                        .map(|(url, _)| PageEntry::new(url.clone(), String::new())),
                );
                all_urls.extend(url_list);
            }

            if !paginated.is_empty() {
                let paginated_key = format!("{}_paginated", file_key);
                let target = GroupTarget {
                    gz_dir: self.layout.paginated_dir(),
                    raw_dir: self.layout.paginated_raw_dir(),
                    file_stem: format!("paginated_sitemap_{}_{}", today, file_key),
                    index_stem: format!("paginated_sitemap_index_{}_{}", today, file_key),
                    index_identifier: file_key.clone(),
                    index_base_url: None,
                    is_paginated: true,
                };
                let url_list =
                    self.write_group(None, &paginated, &paginated_key, &target, &today, &lastmod)?;
                all_paginated_urls.extend(url_list);
            }
        }

        // Master sitemaps: every regular URL across locales.
        self.progress.set_phase("Generating master sitemaps", 90);
        info!(urls = master_pages.len(), "Generating master sitemaps");

        let mut master_sitemaps = 0;
        if !master_pages.is_empty() {
            let target = GroupTarget {
                gz_dir: self.layout.master_dir(),
                raw_dir: self.layout.master_raw_dir(),
                file_stem: format!("master_sitemap_{}", today),
                index_stem: format!("master_sitemap_index_{}", today),
                index_identifier: "master".to_string(),
                index_base_url: None,
                is_paginated: false,
            };
            let url_list =
                self.write_group(None, &master_pages, "master", &target, &today, &lastmod)?;
            master_sitemaps = self.sitemaps_written(url_list.len(), master_pages.len());
        }

        // Reports beside the output folders.
        write_url_report(
            &self.layout.report_path(&format!("all_urls_{}.csv", today)),
            &all_urls,
        )?;
        info!(urls = all_urls.len(), "Wrote URL report");

        if !all_paginated_urls.is_empty() {
            write_url_report(
                &self
                    .layout
                    .report_path(&format!("all_paginated_urls_{}.csv", today)),
                &all_paginated_urls,
            )?;
        }
        if !skipped.is_empty() {
            write_skipped_report(
                &self
                    .layout
                    .report_path(&format!("skipped_locales_{}.csv", today)),
                &skipped,
            )?;
        }

        self.progress.complete();
        let summary = GenerationSummary {
            regular_urls: all_urls.len(),
            paginated_urls: all_paginated_urls.len(),
            master_sitemaps,
            skipped_locales: skipped.len(),
        };
        info!(
            regular = summary.regular_urls,
            paginated = summary.paginated_urls,
            master_sitemaps = summary.master_sitemaps,
            skipped = summary.skipped_locales,
            "Sitemap generation complete"
        );
        add_log(&self.logs, "INFO", "Generator", "Sitemap generation complete");

        Ok(summary)
    }

    /// Write one group (locale regular, locale paginated, or master):
    /// sitemap files split at the protocol limits, plus an index file
    /// when the group needed more than one sitemap.
    fn write_group(
        &self,
        homepage: Option<&str>,
        pages: &[PageEntry],
        report_key: &str,
        target: &GroupTarget,
        today: &str,
        lastmod: &str,
    ) -> Result<Vec<(String, String)>> {
        let mut url_list: Vec<(String, String)> = Vec::new();
        let mut sitemap_number = 1usize;
        let mut offset = 0usize;

        loop {
            let batch = build_batch(homepage, &pages[offset..], report_key, sitemap_number);

            let multi = pages.len() > MAX_URLS_PER_SITEMAP || sitemap_number > 1;
            let stem = if multi {
                format!("{}_{}", target.file_stem, sitemap_number)
            } else {
                target.file_stem.clone()
            };

            let xml = render_urlset(&batch.urlset)?;
            write_raw_and_gzip(
                &xml,
                &target.gz_dir.join(format!("{}.xml.gz", stem)),
                &target.raw_dir.join(format!("{}.xml", stem)),
            )?;

            url_list.extend(batch.url_list);
            offset += batch.consumed;

            if offset >= pages.len() || batch.url_count == 0 {
                break;
            }

            sitemap_number += 1;
            if sitemap_number > MAX_SITEMAPS_PER_GROUP {
                warn!(group = %target.file_stem, "Reached maximum sitemap limit");
                break;
            }
        }

        if sitemap_number > 1 {
            info!(group = %target.file_stem, sitemaps = sitemap_number, "Writing sitemap index");
            let index = SitemapIndex::build(
                target.index_base_url.as_deref(),
                sitemap_number,
                &target.index_identifier,
                today,
                lastmod,
                target.is_paginated,
            );
            let xml = render_index(&index)?;
            write_raw_and_gzip(
                &xml,
                &target.gz_dir.join(format!("{}.xml.gz", target.index_stem)),
                &target.raw_dir.join(format!("{}.xml", target.index_stem)),
            )?;
        }

        Ok(url_list)
    }

    fn sitemaps_written(&self, urls: usize, input_pages: usize) -> usize {
        if urls == 0 {
            0
        } else {
            // Groups split at the URL cap; duplicates make this an
            // upper-bound estimate only when the cap is exceeded.
            (input_pages + MAX_URLS_PER_SITEMAP - 1) / MAX_URLS_PER_SITEMAP
        }
    }

    /// Record a failed run everywhere the original surfaces it: the
    /// process log, a timestamped error file, the in-memory activity
    /// log, and the progress state.
    pub fn log_error(&self, err: &AppError) {
        let message = err.to_string();
        error!(error = %message, "Generation failed");

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = self.layout.log_dir().join(format!("error_log_{}.txt", timestamp));
        if let Err(io_err) =
            std::fs::write(&log_file, format!("{}: {}\n", Local::now(), message))
        {
            error!(error = %io_err, "Failed to write error log file");
        }

        add_log(&self.logs, "ERROR", "Generator", &message);
        self.progress.fail(message);
    }
}
