//! # Sintetizador de Respuestas
//! src/resource/synthesizer.rs
//!
//! Convierte un `Outcome` en una `Response` completa:
//!
//! | Outcome            | Status                 | Body                     |
//! |--------------------|------------------------|--------------------------|
//! | `Ok`               | 200 OK                 | bytes del archivo        |
//! | `DirectoryListing` | 200 OK                 | listado HTML             |
//! | `Redirect`         | 302 Found              | HTML + header `Location` |
//! | `BadRequest`       | 400 Bad Request        | HTML fijo                |
//! | `Forbidden`        | 403 Forbidden          | HTML fijo                |
//! | `NotFound`         | 404 Not Found          | HTML fijo                |
//! | `NotImplemented`   | 501 Not Implemented    | HTML fijo                |
//!
//! Orden de headers: `Server`, `Date`, `Location`, `Content-Type`,
//! `Content-Length`, `Last-Modified`, `Connection`.

use crate::http::{http_date, Response, StatusCode};
use crate::resource::classifier::Outcome;
use crate::resource::filesystem::FileSystem;
use crate::resource::listing::render_listing;
use std::io;
use std::time::SystemTime;
use tracing::debug;

/// Valor del header `Server`
pub const SERVER_NAME: &str = "webserver/1.0";

const HTML: &str = "text/html";

/// Construye la respuesta para un resultado, con la hora actual en `Date`
pub fn synthesize<F: FileSystem + ?Sized>(fs: &F, outcome: &Outcome) -> Response {
    synthesize_at(fs, outcome, SystemTime::now())
}

/// Igual que [`synthesize`] pero con la hora de `Date` explícita
pub fn synthesize_at<F: FileSystem + ?Sized>(fs: &F, outcome: &Outcome, now: SystemTime) -> Response {
    match outcome {
        Outcome::Ok { path, mime } => match fs.read(path) {
            Ok(bytes) => {
                let mut response = base(StatusCode::Ok, now)
                    .with_header("Content-Type", mime)
                    .with_body_bytes(bytes);
                if let Some(modified) = fs.modified(path) {
                    response.add_header("Last-Modified", &http_date(modified));
                }
                finish(response)
            }
            // El archivo cambió entre la clasificación y la lectura
            Err(e) => {
                debug!(path = %path.display(), error = %e, "archivo inaccesible al leer");
                let status = if e.kind() == io::ErrorKind::NotFound {
                    StatusCode::NotFound
                } else {
                    StatusCode::Forbidden
                };
                error_page(status, now)
            }
        },

        Outcome::DirectoryListing { uri, entries, .. } => finish(
            base(StatusCode::Ok, now)
                .with_header("Content-Type", HTML)
                .with_body(&render_listing(uri, entries)),
        ),

        Outcome::Redirect { location } => finish(
            base(StatusCode::Found, now)
                .with_header("Location", location)
                .with_header("Content-Type", HTML)
                .with_body(&canned_body(StatusCode::Found)),
        ),

        Outcome::BadRequest
        | Outcome::Forbidden
        | Outcome::NotFound
        | Outcome::NotImplemented => error_page(outcome.status(), now),
    }
}

/// Página HTML fija para un código de estado
pub fn error_page(status: StatusCode, now: SystemTime) -> Response {
    finish(
        base(status, now)
            .with_header("Content-Type", HTML)
            .with_body(&canned_body(status)),
    )
}

fn base(status: StatusCode, now: SystemTime) -> Response {
    Response::new(status)
        .with_header("Server", SERVER_NAME)
        .with_header("Date", &http_date(now))
}

fn finish(response: Response) -> Response {
    response.with_header("Connection", "close")
}

fn canned_body(status: StatusCode) -> String {
    let message = match status {
        StatusCode::Ok => "OK.",
        StatusCode::Found => "Directories must end with a slash.",
        StatusCode::BadRequest => "Bad Request.",
        StatusCode::Forbidden => "Access denied.",
        StatusCode::NotFound => "File not found.",
        StatusCode::NotImplemented => "Method is not supported.",
    };

    format!(
        "<HTML><HEAD><TITLE>{status}</TITLE></HEAD>\r\n<BODY><H4>{status}</H4>\r\n{message}\r\n</BODY></HTML>\r\n"
    )
}
