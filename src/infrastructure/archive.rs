// ============================================================
// ARCHIVE OUTPUT
// ============================================================
// Every sitemap is written twice (raw XML and gzip), and whole
// output folders are bundled into in-memory zips for download.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::error::{AppError, Result};

/// Write the XML to `raw_path` and a gzip-compressed copy to `gz_path`.
pub fn write_raw_and_gzip(xml: &[u8], gz_path: &Path, raw_path: &Path) -> Result<()> {
    std::fs::write(raw_path, xml).map_err(|e| {
        AppError::IoError(format!("Failed to write {}: {}", raw_path.display(), e))
    })?;

    let file = File::create(gz_path)
        .map_err(|e| AppError::IoError(format!("Failed to create {}: {}", gz_path.display(), e)))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(xml)?;
    encoder.finish()?;

    info!(sitemap = %gz_path.display(), "Saved sitemap");
    Ok(())
}

/// Zip every file in `folder` (flat, no directory entries) into memory.
pub fn zip_folder(folder: &Path) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if folder.is_dir() {
        let mut names: Vec<_> = std::fs::read_dir(folder)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .collect();
        names.sort_by_key(|entry| entry.file_name());

        for entry in names {
            let name = entry.file_name().to_string_lossy().into_owned();
            zip.start_file(name, options)?;
            zip.write_all(&std::fs::read(entry.path())?)?;
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sitemapgen_archive_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_raw_and_gzip_written() {
        let dir = temp_dir("gz");
        let raw = dir.join("sitemap.xml");
        let gz = dir.join("sitemap.xml.gz");

        write_raw_and_gzip(b"<urlset/>", &gz, &raw).unwrap();

        assert_eq!(std::fs::read(&raw).unwrap(), b"<urlset/>");
        let mut decoder = GzDecoder::new(File::open(&gz).unwrap());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert_eq!(decompressed, b"<urlset/>");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_zip_folder_contains_files() {
        let dir = temp_dir("zip");
        std::fs::write(dir.join("a.xml"), b"aaa").unwrap();
        std::fs::write(dir.join("b.xml"), b"bbb").unwrap();

        let bytes = zip_folder(&dir).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("a.xml").is_ok());
        assert!(archive.by_name("b.xml").is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_zip_missing_folder_is_empty_archive() {
        let dir = std::env::temp_dir().join("sitemapgen_archive_missing_nope");
        let bytes = zip_folder(&dir).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
