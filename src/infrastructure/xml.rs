// ============================================================
// SITEMAP XML WRITER
// ============================================================
// Pretty-printed serialization of urlset and sitemapindex documents.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::error::{AppError, Result};
use crate::domain::sitemap::{SitemapIndex, Urlset, SITEMAP_NS};

pub fn render_urlset(urlset: &Urlset) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_decl(&mut writer)?;
    let mut root = BytesStart::new("urlset");
    root.push_attribute(("xmlns", SITEMAP_NS));
    write(&mut writer, Event::Start(root))?;

    for url in &urlset.urls {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", url)?;
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    Ok(finish(writer))
}

pub fn render_index(index: &SitemapIndex) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_decl(&mut writer)?;
    let mut root = BytesStart::new("sitemapindex");
    root.push_attribute(("xmlns", SITEMAP_NS));
    write(&mut writer, Event::Start(root))?;

    for entry in &index.entries {
        write(&mut writer, Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(&mut writer, "lastmod", &entry.lastmod)?;
        write(&mut writer, Event::End(BytesEnd::new("sitemap")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("sitemapindex")))?;
    Ok(finish(writer))
}

fn write_decl(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    write(
        writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::XmlError(e.to_string()))
}

fn finish(writer: Writer<Vec<u8>>) -> Vec<u8> {
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sitemap::IndexEntry;

    #[test]
    fn test_urlset_rendering() {
        let urlset = Urlset {
            urls: vec![
                "https://example.com/".to_string(),
                "https://example.com/shoes".to_string(),
            ],
        };
        let xml = String::from_utf8(render_urlset(&urlset).unwrap()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<loc>https://example.com/shoes</loc>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_urlset_escapes_ampersands() {
        let urlset = Urlset {
            urls: vec!["https://example.com/s?a=1&b=2".to_string()],
        };
        let xml = String::from_utf8(render_urlset(&urlset).unwrap()).unwrap();
        assert!(xml.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_index_rendering() {
        let index = SitemapIndex {
            entries: vec![IndexEntry {
                loc: "https://example.com/sitemap_1.xml.gz".to_string(),
                lastmod: "2025-01-01".to_string(),
            }],
        };
        let xml = String::from_utf8(render_index(&index).unwrap()).unwrap();

        assert!(xml.contains("<sitemapindex xmlns="));
        assert!(xml.contains("<loc>https://example.com/sitemap_1.xml.gz</loc>"));
        assert!(xml.contains("<lastmod>2025-01-01</lastmod>"));
    }

    #[test]
    fn test_size_estimate_tracks_rendered_size() {
        let urlset = Urlset {
            urls: (0..500)
                .map(|i| format!("https://example.com/category/product-{}", i))
                .collect(),
        };
        let rendered = render_urlset(&urlset).unwrap().len();
        let estimated = urlset.estimated_size();

        // The estimate only needs to be close enough to enforce a 50 MB cap.
        let delta = rendered.abs_diff(estimated);
        assert!(
            delta < rendered / 10,
            "estimate {} too far from rendered {}",
            estimated,
            rendered
        );
    }
}
