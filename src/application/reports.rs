// ============================================================
// CSV REPORTS
// ============================================================
// URL listings and the skipped-locale report written next to the
// sitemap output folders.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::Result;

/// Locale that produced no sitemap because it had no internal pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLocale {
    pub locale: String,
    pub homepage: String,
    pub section: String,
    pub country: String,
}

/// `URL,Sitemap` rows for every URL placed in a sitemap group.
pub fn write_url_report(path: &Path, urls: &[(String, String)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["URL", "Sitemap"])?;
    for (url, sitemap) in urls {
        writer.write_record([url, sitemap])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_skipped_report(path: &Path, skipped: &[SkippedLocale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["locale", "homepage", "section", "country"])?;
    for entry in skipped {
        writer.write_record([&entry.locale, &entry.homepage, &entry.section, &entry.country])?;
    }
    writer.flush()?;
    Ok(())
}
