use crate::crawler::PageRecord;
use chrono::SecondsFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

/// XML namespace of the sitemaps.org protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sitemap is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes records into a sitemap document
///
/// Records are written in the order given, one `<url>` element each. Text is
/// XML-escaped, `lastmod` is RFC 3339 in UTC and `priority` has one decimal.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use sitemap_crawler::crawler::PageRecord;
/// use sitemap_crawler::sitemap::write_sitemap;
///
/// let xml = write_sitemap(&[PageRecord::new("https://example.com/", 0, Utc::now())]).unwrap();
/// assert!(xml.contains("<loc>https://example.com/</loc>"));
/// assert!(xml.contains("<priority>1.0</priority>"));
/// ```
pub fn write_sitemap(records: &[PageRecord]) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset))?;

    for record in records {
        write_url(&mut writer, record)?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn write_url(writer: &mut Writer<Vec<u8>>, record: &PageRecord) -> Result<(), WriteError> {
    let lastmod = record
        .last_modified
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let priority = format!("{:.1}", record.priority);

    writer.write_event(Event::Start(BytesStart::new("url")))?;
    write_text_element(writer, "loc", &record.url)?;
    write_text_element(writer, "lastmod", &lastmod)?;
    write_text_element(writer, "changefreq", record.change_frequency.as_str())?;
    write_text_element(writer, "priority", &priority)?;
    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), WriteError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
