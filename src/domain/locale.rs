// ============================================================
// LOCALE TYPES
// ============================================================
// Homepage entries parsed from the homepage CSV.
// No I/O, no async, no external dependencies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One homepage row: the root URL of a site locale or section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homepage {
    /// Homepage URL with any trailing slash removed
    pub url: String,

    /// Whether this is the default language row (`Language Default` = Y)
    pub is_default: bool,

    pub country: String,
    pub language: String,
    pub locale: String,

    /// Only present for section-schema files
    pub section: Option<String>,
}

/// Locale key -> homepage, ordered for deterministic output.
pub type HomepageMap = BTreeMap<String, Homepage>;

impl Homepage {
    /// Key used in output filenames: `{Section}_{COUNTRY}` for the
    /// section schema, otherwise the uppercased locale key.
    pub fn file_key(&self, locale_key: &str) -> String {
        match &self.section {
            Some(section) if !section.is_empty() => {
                format!("{}_{}", section, self.country.to_uppercase())
            }
            _ => locale_key.to_uppercase(),
        }
    }

    /// Homepage URL with a trailing slash enforced, as published
    /// in the first sitemap of a locale.
    pub fn url_with_slash(&self) -> String {
        if self.url.ends_with('/') {
            self.url.clone()
        } else {
            format!("{}/", self.url)
        }
    }
}

/// Derive the locale key for a locale-schema row.
/// The default-language row keys on language alone.
pub fn locale_key(language: &str, country: &str, is_default: bool) -> String {
    if is_default {
        language.to_lowercase()
    } else {
        format!("{}-{}", language.to_lowercase(), country.to_lowercase())
    }
}

/// Derive the locale key for a section-schema row.
pub fn section_key(section: &str, locale: &str) -> String {
    if locale.is_empty() {
        section.to_lowercase()
    } else {
        locale.to_lowercase()
    }
}
