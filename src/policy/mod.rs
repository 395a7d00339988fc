//! # Type Policy
//!
//! Pure allow-list predicates gating which media may be stored, plus
//! extension inference for uploads whose name carries no suffix.
//!
//! Two independent lists cover the two entry points: the upload endpoint
//! sees a MIME type header, the WebDAV path only a filename extension.
//! They track the same media families but match on different keys.

/// MIME types accepted by the direct-upload endpoint.
const ALLOWED_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "image/svg+xml",
    "image/heic",
    "image/avif",
    // Videos
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
    "video/webm",
    "video/x-flv",
    "video/x-ms-wmv",
    "video/mp2t",
];

/// Extensions accepted on the WebDAV write path (dot included, lowercase).
const ALLOWED_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff", ".tif", ".svg", ".heic", ".heif",
    ".avif",
    // Videos
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv", ".wmv", ".m4v", ".3gp", ".mpeg", ".mpg",
];

pub fn is_allowed_content_type(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// `ext` includes the leading dot; matching is case-insensitive.
pub fn is_allowed_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&lower.as_str())
}

/// Extension of a filename or key, dot included, or `None` when absent.
pub fn extension_of(name: &str) -> Option<&str> {
    let basename = name.rsplit('/').next().unwrap_or(name);
    match basename.rfind('.') {
        Some(i) if i > 0 => Some(&basename[i..]),
        _ => None,
    }
}

/// Derive a filename suffix from a media MIME type. Container formats
/// whose subtype does not match the conventional extension are mapped
/// explicitly; non-media types yield no suffix.
pub fn infer_extension(mime: &str) -> Option<String> {
    match mime {
        "video/quicktime" => return Some(".mov".to_string()),
        "video/x-msvideo" => return Some(".avi".to_string()),
        "video/x-matroska" => return Some(".mkv".to_string()),
        "video/x-flv" => return Some(".flv".to_string()),
        "video/x-ms-wmv" => return Some(".wmv".to_string()),
        "video/mp2t" => return Some(".mpeg".to_string()),
        _ => {}
    }

    let (family, subtype) = mime.split_once('/')?;
    if family != "image" && family != "video" {
        return None;
    }
    // svg+xml and friends: keep the part before any suffix marker.
    let subtype = subtype.split('+').next().unwrap_or(subtype);
    Some(format!(".{}", subtype))
}
