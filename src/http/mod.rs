//! # Módulo HTTP
//!
//! Este módulo implementa lo mínimo del protocolo HTTP/1.0 que necesita
//! un servidor de archivos estáticos:
//!
//! - Parsing de la request line (los headers del cliente se ignoran)
//! - Construcción de responses HTTP
//! - Manejo de status codes
//! - Tabla de tipos MIME
//!
//! ## Especificación HTTP/1.0
//!
//! El protocolo HTTP/1.0 (RFC 1945) es más simple que HTTP/1.1:
//! - No requiere el header `Host`
//! - No tiene chunked transfer encoding
//! - No mantiene conexiones persistentes por defecto
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 15\r\n
//! \r\n
//! <!DOCTYPE html>
//! ```

pub mod mime;      // Extensión → Content-Type
pub mod request;   // Parsing de la request line
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use mime::mime_type_for;
pub use request::{read_request_line, ParseError, RequestLine};
pub use response::{http_date, Response, HTTP_VERSION};
pub use status::StatusCode;
