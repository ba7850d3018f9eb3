// ============================================================
// OUTPUT LAYOUT
// ============================================================
// Folder structure under the data directory: uploads, sitemap
// output folders (gzip + raw, per group), reports and logs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Folder layout rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn sitemap_dir(&self) -> PathBuf {
        self.root.join("xml_sitemaps")
    }

    pub fn raw_sitemap_dir(&self) -> PathBuf {
        self.root.join("raw_xml_sitemaps")
    }

    pub fn master_dir(&self) -> PathBuf {
        self.root.join("master_xml_sitemaps")
    }

    pub fn master_raw_dir(&self) -> PathBuf {
        self.root.join("master_raw_xml_sitemaps")
    }

    pub fn paginated_dir(&self) -> PathBuf {
        self.root.join("paginated_xml_sitemaps")
    }

    pub fn paginated_raw_dir(&self) -> PathBuf {
        self.root.join("paginated_raw_xml_sitemaps")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Reports live beside the output folders.
    pub fn report_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub fn ensure_all(&self) -> std::io::Result<()> {
        for dir in [
            self.upload_dir(),
            self.sitemap_dir(),
            self.raw_sitemap_dir(),
            self.master_dir(),
            self.master_raw_dir(),
            self.paginated_dir(),
            self.paginated_raw_dir(),
            self.log_dir(),
        ] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }

    /// Date-stamped name an upload is stored under:
    /// `{YYYYMMDD}_{stem}_{kind}.csv`.
    pub fn stamped_upload_name(&self, original: &str, kind: UploadKind) -> String {
        let stem = sanitize_filename(original);
        let stem = stem.rsplit_once('.').map(|(s, _)| s).unwrap_or(&stem);
        format!(
            "{}_{}_{}.csv",
            Local::now().format("%Y%m%d"),
            stem,
            kind.suffix()
        )
    }

    /// Previously uploaded files of one kind, newest name last.
    pub fn list_uploads(&self, kind: UploadKind) -> std::io::Result<Vec<String>> {
        let suffix = format!("_{}.csv", kind.suffix());
        let mut names: Vec<String> = match fs::read_dir(self.upload_dir()) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| name.ends_with(&suffix))
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        Ok(names)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Homepage,
    Internal,
}

impl UploadKind {
    fn suffix(&self) -> &'static str {
        match self {
            UploadKind::Homepage => "homepage",
            UploadKind::Internal => "internal",
        }
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Keep uploads from escaping the upload folder: strip any path
/// components and characters outside a safe set.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
