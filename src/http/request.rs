//! # Parsing de la Request Line HTTP/1.0
//! src/http/request.rs
//!
//! Sólo se interpreta la primera línea del request; los headers se ignoran.
//!
//! ## Formato
//!
//! ```text
//! GET /docs/index.html HTTP/1.0\r\n
//! ```
//!
//! Una request line es válida sólo si tiene exactamente tres tokens
//! separados por espacios: `METHOD PATH VERSION`.

use std::io::{self, BufRead, Read};
use thiserror::Error;

/// Tamaño máximo aceptado para la request line
pub const MAX_REQUEST_LINE: u64 = 8192;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// La línea no tiene exactamente 3 tokens
    #[error("Invalid request line: expected 3 tokens, got {0}")]
    InvalidRequestLine(usize),
}

/// Request line parseada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    path: String,
    version: String,
}

impl RequestLine {
    /// Parsea una request line
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use webserver::http::RequestLine;
    ///
    /// let line = RequestLine::parse("GET /docs/ HTTP/1.0\r\n").unwrap();
    /// assert_eq!(line.method(), "GET");
    /// assert_eq!(line.path(), "/docs/");
    /// assert_eq!(line.version(), "HTTP/1.0");
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        match parts.as_slice() {
            [method, path, version] => Ok(Self {
                method: (*method).to_string(),
                path: (*path).to_string(),
                version: (*version).to_string(),
            }),
            _ => Err(ParseError::InvalidRequestLine(parts.len())),
        }
    }

    /// Método HTTP tal como llegó (ej: "GET")
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path crudo del request (ej: "/docs/")
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Versión HTTP tal como llegó (ej: "HTTP/1.0")
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Lee la primera línea de un stream
///
/// Lee hasta `\n` o hasta `MAX_REQUEST_LINE` bytes, lo que ocurra primero.
/// Retorna `Ok(None)` si el peer cerró sin enviar nada. Los bytes que no
/// sean UTF-8 válido se reemplazan, y la línea resultante termina
/// clasificada como request inválido si no tiene la forma esperada.
///
/// Si vence el timeout de lectura después de recibir una línea parcial,
/// se retorna lo recibido; el error sólo se propaga si no llegó nada.
pub fn read_request_line<R: BufRead>(reader: R) -> io::Result<Option<String>> {
    let mut buffer = Vec::new();

    // read_until deja en `buffer` todo lo leído antes del error
    match reader.take(MAX_REQUEST_LINE).read_until(b'\n', &mut buffer) {
        Ok(_) => {}
        Err(e) if is_timeout(&e) && !buffer.is_empty() => {}
        Err(e) => return Err(e),
    }

    if buffer.is_empty() {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(&buffer);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_get() {
        let line = RequestLine::parse("GET / HTTP/1.0").unwrap();

        assert_eq!(line.method(), "GET");
        assert_eq!(line.path(), "/");
        assert_eq!(line.version(), "HTTP/1.0");
    }

    #[test]
    fn test_parse_keeps_unknown_method() {
        // El clasificador decide qué hacer con métodos no soportados
        let line = RequestLine::parse("POST /x HTTP/1.0").unwrap();
        assert_eq!(line.method(), "POST");
    }

    #[test]
    fn test_parse_extra_whitespace() {
        let line = RequestLine::parse("GET   /a.html \t HTTP/1.1\r\n").unwrap();
        assert_eq!(line.path(), "/a.html");
        assert_eq!(line.version(), "HTTP/1.1");
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(RequestLine::parse(""), Err(ParseError::EmptyRequest));
        assert_eq!(RequestLine::parse(" \r\n"), Err(ParseError::EmptyRequest));
    }

    #[test]
    fn test_invalid_request_line() {
        assert_eq!(RequestLine::parse("GET"), Err(ParseError::InvalidRequestLine(1)));
        assert_eq!(RequestLine::parse("GET /"), Err(ParseError::InvalidRequestLine(2)));
        assert_eq!(
            RequestLine::parse("GET / HTTP/1.0 extra"),
            Err(ParseError::InvalidRequestLine(4))
        );
    }

    #[test]
    fn test_read_request_line_ignores_headers() {
        let raw = b"GET /index.html HTTP/1.0\r\nHost: localhost\r\n\r\n";
        let line = read_request_line(Cursor::new(&raw[..])).unwrap();
        assert_eq!(line.as_deref(), Some("GET /index.html HTTP/1.0"));
    }

    #[test]
    fn test_read_request_line_peer_closed() {
        let line = read_request_line(Cursor::new(Vec::new())).unwrap();
        assert_eq!(line, None);
    }

    /// Entrega `data` y después falla con `kind` (cliente que se quedó callado)
    struct Stalled {
        data: Cursor<Vec<u8>>,
        kind: io::ErrorKind,
    }

    impl Read for Stalled {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::from(self.kind)),
                n => Ok(n),
            }
        }
    }

    fn stalled(data: &[u8], kind: io::ErrorKind) -> io::BufReader<Stalled> {
        io::BufReader::new(Stalled {
            data: Cursor::new(data.to_vec()),
            kind,
        })
    }

    #[test]
    fn test_read_request_line_partial_before_timeout() {
        let line = read_request_line(stalled(b"GET /index.html HTTP/1.0", io::ErrorKind::WouldBlock)).unwrap();
        assert_eq!(line.as_deref(), Some("GET /index.html HTTP/1.0"));

        let line = read_request_line(stalled(b"GET /ind", io::ErrorKind::TimedOut)).unwrap();
        assert_eq!(line.as_deref(), Some("GET /ind"));
    }

    #[test]
    fn test_read_request_line_timeout_without_data() {
        let err = read_request_line(stalled(b"", io::ErrorKind::WouldBlock)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_read_request_line_other_errors_propagate() {
        let err = read_request_line(stalled(b"GET /", io::ErrorKind::ConnectionReset)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_read_request_line_is_bounded() {
        let raw = vec![b'a'; (MAX_REQUEST_LINE as usize) * 2];
        let line = read_request_line(Cursor::new(raw)).unwrap().unwrap();
        assert_eq!(line.len(), MAX_REQUEST_LINE as usize);
    }
}
