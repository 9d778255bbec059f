//! # Listado de Directorios
//! src/resource/listing.rs
//!
//! Genera la página HTML "Index of" para un directorio sin `index.html`.
//!
//! ```text
//! <HTML>
//! <HEAD><TITLE>Index of /docs/</TITLE></HEAD>
//! <BODY>
//! <H4>Index of /docs/</H4>
//! <table CELLSPACING=8>
//! <tr><th>Name</th><th>Last Modified</th><th>Size</th></tr>
//! <tr><td><A HREF="a.png">a.png</A></td><td>...</td><td>1024</td></tr>
//! </table>
//! <HR>
//! <ADDRESS>webserver/1.0</ADDRESS>
//! </BODY></HTML>
//! ```

use crate::http::http_date;
use crate::resource::filesystem::DirEntry;
use crate::resource::synthesizer::SERVER_NAME;

/// Escapa los caracteres especiales de HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renderiza el listado de `uri` con sus entradas ordenadas por nombre
///
/// Los directorios se enlazan con `/` final (para no provocar un 302)
/// y no muestran tamaño. Los links van percent-encoded, así que nombres
/// con `#`, `?`, `%` o espacios apuntan a la entrada correcta.
pub fn render_listing(uri: &str, entries: &[DirEntry]) -> String {
    let mut sorted: Vec<&DirEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let title = escape_html(uri);
    let mut html = format!(
        "<HTML>\r\n<HEAD><TITLE>Index of {title}</TITLE></HEAD>\r\n\r\n\
         <BODY>\r\n<H4>Index of {title}</H4>\r\n\r\n\
         <table CELLSPACING=8>\r\n\
         <tr><th>Name</th><th>Last Modified</th><th>Size</th></tr>\r\n"
    );

    for entry in sorted {
        let name = escape_html(&entry.name);
        let encoded = urlencoding::encode(&entry.name);
        let href = if entry.is_dir {
            format!("{}/", encoded)
        } else {
            encoded.into_owned()
        };
        let modified = entry.modified.map(http_date).unwrap_or_default();
        let size = if entry.is_dir {
            String::new()
        } else {
            entry.size.to_string()
        };

        html.push_str(&format!(
            "<tr><td><A HREF=\"{href}\">{name}</A></td><td>{modified}</td><td>{size}</td></tr>\r\n"
        ));
    }

    html.push_str(&format!(
        "</table>\r\n\r\n<HR>\r\n\r\n<ADDRESS>{}</ADDRESS>\r\n\r\n</BODY></HTML>\r\n",
        SERVER_NAME
    ));

    html
}
