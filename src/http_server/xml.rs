//! DAV Multistatus Rendering
//!
//! Hand-built `207 Multi-Status` bodies for PROPFIND. Only the properties
//! file-manager clients actually read are emitted: resourcetype,
//! displayname, getcontentlength, getlastmodified, creationdate.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a DAV href.
const HREF_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'%');

/// One `<D:response>` entry in a multistatus body.
#[derive(Debug, Clone)]
pub struct DavResource {
    /// Protocol path, un-encoded.
    pub href: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

impl DavResource {
    pub fn directory(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            is_directory: true,
            size: 0,
            modified: None,
            created: None,
        }
    }

    pub fn file(
        href: impl Into<String>,
        size: u64,
        modified: DateTime<Utc>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            href: href.into(),
            is_directory: false,
            size,
            modified: Some(modified),
            created: Some(created),
        }
    }

    fn display_name(&self) -> &str {
        self.href.trim_end_matches('/').rsplit('/').next().unwrap_or("")
    }
}

/// Render a complete multistatus document.
pub fn multistatus(resources: &[DavResource]) -> String {
    let mut out = String::with_capacity(256 * resources.len().max(1));
    out.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    out.push_str(r#"<D:multistatus xmlns:D="DAV:">"#);
    for resource in resources {
        render_response(&mut out, resource);
    }
    out.push_str("</D:multistatus>");
    out
}

fn render_response(out: &mut String, resource: &DavResource) {
    out.push_str("<D:response><D:href>");
    out.push_str(&utf8_percent_encode(&resource.href, HREF_ESCAPE).to_string());
    out.push_str("</D:href><D:propstat><D:prop>");

    out.push_str("<D:displayname>");
    escape_text(out, resource.display_name());
    out.push_str("</D:displayname>");

    if resource.is_directory {
        out.push_str("<D:resourcetype><D:collection/></D:resourcetype>");
    } else {
        out.push_str("<D:resourcetype/>");
        out.push_str("<D:getcontentlength>");
        out.push_str(&resource.size.to_string());
        out.push_str("</D:getcontentlength>");
    }

    if let Some(modified) = resource.modified {
        // getlastmodified wants an HTTP-date.
        out.push_str("<D:getlastmodified>");
        out.push_str(&modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        out.push_str("</D:getlastmodified>");
    }
    if let Some(created) = resource.created {
        out.push_str("<D:creationdate>");
        out.push_str(&created.to_rfc3339());
        out.push_str("</D:creationdate>");
    }

    out.push_str("</D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat></D:response>");
}

/// Escape XML text content.
pub fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_directory_response() {
        let body = multistatus(&[DavResource::directory("/blob/")]);
        assert!(body.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(body.contains("<D:collection/>"));
        assert!(!body.contains("getcontentlength"));
    }

    #[test]
    fn test_file_response() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let body = multistatus(&[DavResource::file("/blob/a.jpg", 12, ts, ts)]);
        assert!(body.contains("<D:href>/blob/a.jpg</D:href>"));
        assert!(body.contains("<D:getcontentlength>12</D:getcontentlength>"));
        assert!(body.contains("<D:getlastmodified>Wed, 01 May 2024 10:00:00 GMT</D:getlastmodified>"));
        assert!(body.contains("<D:displayname>a.jpg</D:displayname>"));
    }

    #[test]
    fn test_href_escaping() {
        let body = multistatus(&[DavResource::directory("/blob/my photo.jpg")]);
        assert!(body.contains("/blob/my%20photo.jpg"));
    }

    #[test]
    fn test_text_escaping() {
        let mut out = String::new();
        escape_text(&mut out, "a<b&c");
        assert_eq!(out, "a&lt;b&amp;c");
    }
}
