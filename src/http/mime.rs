//! # Tipos MIME
//! src/http/mime.rs
//!
//! Tabla fija extensión → tipo MIME. Las extensiones desconocidas (o la
//! ausencia de extensión) caen en `application/octet-stream`.

use std::path::Path;

/// Tipo por defecto para extensiones desconocidas
pub const OCTET_STREAM: &str = "application/octet-stream";

const MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("css", "text/css"),
    ("au", "audio/basic"),
    ("wav", "audio/wav"),
    ("avi", "video/x-msvideo"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("mp3", "audio/mpeg"),
];

/// Tipo MIME según la extensión del archivo (sin distinguir mayúsculas)
///
/// # Ejemplo
/// ```
/// use webserver::http::mime_type_for;
/// use std::path::Path;
///
/// assert_eq!(mime_type_for(Path::new("docs/index.HTML")), "text/html");
/// assert_eq!(mime_type_for(Path::new("data.bin")), "application/octet-stream");
/// ```
pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };

    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
