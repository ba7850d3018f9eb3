// ============================================================
// HOMEPAGE CSV PARSER
// ============================================================
// Two schemas are accepted, detected from the header row:
//   Country/Language (+ optional Locale, Language Default)
//   Section/Locale

use std::path::Path;

use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::locale::{locale_key, section_key, Homepage, HomepageMap};

use super::reader::CsvTable;

pub fn parse_homepage_csv(path: &Path) -> Result<HomepageMap> {
    let table = CsvTable::from_file(path)?;
    parse_homepage_table(&table)
}

pub(crate) fn parse_homepage_table(table: &CsvTable) -> Result<HomepageMap> {
    info!(columns = ?table.headers, "Homepage CSV columns");

    let has_country = table.has_column("Country");
    let has_language = table.has_column("Language");
    let has_section = table.has_column("Section");

    if !has_country && !has_section {
        return Err(AppError::ValidationError(format!(
            "Homepage CSV must have either 'Country' or 'Section' column. Found: {:?}",
            table.headers
        )));
    }

    let mut homepages = HomepageMap::new();

    for (row_num, row) in table.rows.iter().enumerate() {
        let row_num = row_num + 2;

        let url = table.get(row, "Homepage").trim_end_matches('/').to_string();
        if url.is_empty() {
            warn!(row = row_num, "Empty homepage URL, skipping");
            continue;
        }

        let (key, entry) = if has_country && has_language {
            let country = table.get(row, "Country").to_lowercase();
            let language = table.get(row, "Language").to_lowercase();
            let locale = table.get(row, "Locale").to_lowercase();
            let is_default = table.get(row, "Language Default") == "Y";

            let key = locale_key(&language, &country, is_default);
            (
                key,
                Homepage {
                    url,
                    is_default,
                    country,
                    language,
                    locale,
                    section: None,
                },
            )
        } else if has_section {
            let section = table.get(row, "Section").replace(' ', "_");
            let locale = table.get(row, "Locale").to_uppercase();

            let key = section_key(&section, &locale);
            (
                key,
                Homepage {
                    url,
                    is_default: false,
                    country: locale.clone(),
                    language: locale.clone(),
                    locale,
                    section: Some(section),
                },
            )
        } else {
            warn!(row = row_num, "Row matches neither schema, skipping");
            continue;
        };

        info!(row = row_num, key = %key, url = %entry.url, "Added homepage");
        homepages.insert(key, entry);
    }

    if homepages.is_empty() {
        return Err(AppError::ValidationError(
            "No valid homepages found in CSV".to_string(),
        ));
    }

    info!(count = homepages.len(), "Parsed homepages");
    Ok(homepages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALE_CSV: &str = "\
Homepage,Country,Language,Locale,Language Default
https://example.com/us/en/,US,EN,en-US,Y
https://example.com/gb/en/,GB,EN,en-GB,N
https://example.com/fr/fr/,FR,FR,fr-FR,N";

    const SECTION_CSV: &str = "\
Homepage,Section,Locale
https://example.com/outlet/,Outlet Store,EN-US
https://example.com/main/,Main Store,";

    #[test]
    fn test_locale_schema_keys() {
        let table = CsvTable::from_content(LOCALE_CSV).unwrap();
        let homepages = parse_homepage_table(&table).unwrap();

        assert_eq!(homepages.len(), 3);
        // Default-language row keys on language alone
        assert!(homepages.contains_key("en"));
        assert!(homepages.contains_key("en-gb"));
        assert!(homepages.contains_key("fr-fr"));
        assert!(homepages["en"].is_default);
        assert_eq!(homepages["en-gb"].url, "https://example.com/gb/en");
    }

    #[test]
    fn test_section_schema_keys() {
        let table = CsvTable::from_content(SECTION_CSV).unwrap();
        let homepages = parse_homepage_table(&table).unwrap();

        assert_eq!(homepages.len(), 2);
        assert!(homepages.contains_key("en-us"));
        // Without a Locale the section itself becomes the key
        assert!(homepages.contains_key("main_store"));
        assert_eq!(
            homepages["en-us"].section.as_deref(),
            Some("Outlet_Store")
        );
        assert_eq!(homepages["en-us"].country, "EN-US");
    }

    #[test]
    fn test_missing_schema_columns_rejected() {
        let table = CsvTable::from_content("Homepage,Foo\nhttps://a.com,x\n").unwrap();
        let err = parse_homepage_table(&table).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_empty_homepage_rows_skipped() {
        let table =
            CsvTable::from_content("Homepage,Country,Language\n,US,EN\nhttps://a.com,GB,EN\n")
                .unwrap();
        let homepages = parse_homepage_table(&table).unwrap();
        assert_eq!(homepages.len(), 1);
        assert!(homepages.contains_key("en-gb"));
    }

    #[test]
    fn test_all_rows_empty_is_error() {
        let table = CsvTable::from_content("Homepage,Country,Language\n,US,EN\n").unwrap();
        assert!(parse_homepage_table(&table).is_err());
    }
}
