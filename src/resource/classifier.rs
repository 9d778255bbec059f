//! # Clasificador de Recursos
//! src/resource/classifier.rs
//!
//! Función pura: `(method, path, version, fs) → Outcome`.
//!
//! ## Orden de decisión (gana la primera regla que aplica)
//!
//! 1. La request line no tiene exactamente 3 tokens → `BadRequest`
//! 2. Método distinto de `GET` → `NotImplemented`
//! 3. Se decodifica el percent-encoding (UTF-8 inválido → `BadRequest`) y
//!    se quita un `/` inicial (la raíz servida es implícita); rutas con
//!    `..` o con una raíz absoluta → `Forbidden`
//! 4. Si es un directorio:
//!    a. sin `/` final → `Redirect(path + "/")`
//!    b. existe `index.html` regular → `Ok(index.html, text/html)`
//!    c. algún componente no es atravesable → `Forbidden`
//!    d. → `DirectoryListing` (si no se puede leer → `Forbidden`)
//! 5. No es un archivo regular → `NotFound`
//! 6. No legible, o algún directorio padre no atravesable → `Forbidden`
//! 7. → `Ok(archivo, mime)`

use crate::http::{mime_type_for, RequestLine, StatusCode};
use crate::resource::filesystem::{DirEntry, EntryKind, FileSystem};
use std::path::{Component, Path, PathBuf};

/// Resultado de clasificar un request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Servir el archivo (ruta relativa a la raíz) con su tipo MIME
    Ok { path: PathBuf, mime: &'static str },

    /// Generar un listado del directorio
    DirectoryListing {
        /// Directorio relativo a la raíz
        path: PathBuf,
        /// Path tal como lo pidió el cliente (termina en `/`)
        uri: String,
        entries: Vec<DirEntry>,
    },

    /// Redirigir a la forma canónica del directorio
    Redirect { location: String },

    BadRequest,
    Forbidden,
    NotFound,
    NotImplemented,
}

impl Outcome {
    /// Código de estado que corresponde al resultado
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Ok { .. } | Outcome::DirectoryListing { .. } => StatusCode::Ok,
            Outcome::Redirect { .. } => StatusCode::Found,
            Outcome::BadRequest => StatusCode::BadRequest,
            Outcome::Forbidden => StatusCode::Forbidden,
            Outcome::NotFound => StatusCode::NotFound,
            Outcome::NotImplemented => StatusCode::NotImplemented,
        }
    }
}

/// Clasifica una request line cruda
///
/// # Ejemplo
/// ```
/// use webserver::resource::{classify_line, LocalFs, Outcome};
///
/// let fs = LocalFs::new(".");
/// assert_eq!(classify_line(&fs, "GET /"), Outcome::BadRequest);
/// assert_eq!(classify_line(&fs, "DELETE / HTTP/1.0"), Outcome::NotImplemented);
/// ```
pub fn classify_line<F: FileSystem + ?Sized>(fs: &F, line: &str) -> Outcome {
    match RequestLine::parse(line) {
        Ok(request) => classify(fs, request.method(), request.path(), request.version()),
        Err(_) => Outcome::BadRequest,
    }
}

/// Clasifica un request ya separado en sus tres tokens
pub fn classify<F: FileSystem + ?Sized>(fs: &F, method: &str, raw_path: &str, version: &str) -> Outcome {
    let tokens = [method, raw_path, version];
    if tokens.iter().any(|t| t.is_empty() || t.contains(char::is_whitespace)) {
        return Outcome::BadRequest;
    }

    if method != "GET" {
        return Outcome::NotImplemented;
    }

    let Ok(decoded) = urlencoding::decode(raw_path) else {
        return Outcome::BadRequest;
    };

    let Some(relative) = normalize(&decoded) else {
        return Outcome::Forbidden;
    };

    match fs.kind(&relative) {
        Some(EntryKind::Directory) => classify_directory(fs, raw_path, relative),
        // `archivo/` no nombra nada (stat falla con ENOTDIR)
        Some(EntryKind::File) if decoded.ends_with('/') => Outcome::NotFound,
        Some(EntryKind::File) => classify_file(fs, relative),
        _ => Outcome::NotFound,
    }
}

/// Quita un `/` inicial y valida que la ruta quede dentro de la raíz
fn normalize(raw_path: &str) -> Option<PathBuf> {
    let stripped = raw_path.strip_prefix('/').unwrap_or(raw_path);
    let mut normalized = PathBuf::new();

    for component in Path::new(stripped).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(normalized)
}

fn classify_directory<F: FileSystem + ?Sized>(fs: &F, raw_path: &str, dir: PathBuf) -> Outcome {
    if !raw_path.ends_with('/') {
        return Outcome::Redirect {
            location: format!("{}/", raw_path),
        };
    }

    let index = dir.join("index.html");
    if fs.kind(&index) == Some(EntryKind::File) {
        return Outcome::Ok {
            path: index,
            mime: "text/html",
        };
    }

    if !components_traversable(fs, &dir, true) {
        return Outcome::Forbidden;
    }

    match fs.list(&dir) {
        Ok(entries) => Outcome::DirectoryListing {
            path: dir,
            uri: raw_path.to_string(),
            entries,
        },
        Err(_) => Outcome::Forbidden,
    }
}

fn classify_file<F: FileSystem + ?Sized>(fs: &F, file: PathBuf) -> Outcome {
    if !fs.is_readable(&file) || !components_traversable(fs, &file, false) {
        return Outcome::Forbidden;
    }

    Outcome::Ok {
        mime: mime_type_for(&file),
        path: file,
    }
}

/// Verifica permiso de travesía en cada directorio bajo la raíz
///
/// Con `include_self` también se verifica el último componente.
fn components_traversable<F: FileSystem + ?Sized>(fs: &F, path: &Path, include_self: bool) -> bool {
    let components: Vec<Component<'_>> = path.components().collect();
    let checked = if include_self {
        components.len()
    } else {
        components.len().saturating_sub(1)
    };

    let mut prefix = PathBuf::new();
    for component in &components[..checked] {
        prefix.push(component);
        if !fs.is_traversable(&prefix) {
            return false;
        }
    }

    true
}
