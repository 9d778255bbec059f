//! # Acceso al Sistema de Archivos
//! src/resource/filesystem.rs
//!
//! El clasificador no toca `std::fs` directamente: consulta un
//! `FileSystem`. Todas las rutas son relativas a la raíz servida y se
//! consultan en vivo en cada request (nada se cachea).
//!
//! ## Permisos
//!
//! Los clientes son anónimos, así que "legible" y "atravesable" se evalúan
//! con los bits de permisos de *otros* del modo del archivo:
//! - `S_IROTH` (0o004): el archivo se puede leer
//! - `S_IXOTH` (0o001): el directorio se puede atravesar

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const S_IROTH: u32 = 0o004;
const S_IXOTH: u32 = 0o001;

/// Tipo de una entrada del sistema de archivos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Archivo regular
    File,

    /// Directorio
    Directory,

    /// Cualquier otra cosa (fifo, socket, dispositivo...)
    Other,
}

/// Una entrada de un listado de directorio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Nombre del archivo (sin ruta)
    pub name: String,

    /// Si la entrada es un directorio
    pub is_dir: bool,

    /// Tamaño en bytes
    pub size: u64,

    /// Última modificación, si el sistema la reporta
    pub modified: Option<SystemTime>,
}

/// Consultas de sólo lectura que necesita el clasificador
///
/// Cualquier error de I/O se reporta como la respuesta negativa de la
/// consulta (no existe, no legible, no atravesable).
pub trait FileSystem: Send + Sync {
    /// Tipo de la entrada, o `None` si no existe
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    /// Si el archivo es legible por un cliente anónimo
    fn is_readable(&self, path: &Path) -> bool;

    /// Si el directorio es atravesable por un cliente anónimo
    fn is_traversable(&self, path: &Path) -> bool;

    /// Entradas de un directorio
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Contenido completo de un archivo
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Fecha de última modificación
    fn modified(&self, path: &Path) -> Option<SystemTime>;
}

/// Sistema de archivos local con raíz fija
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Crea un `LocalFs` que sirve el contenido de `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn mode(&self, path: &Path) -> Option<(fs::Metadata, u32)> {
        let metadata = fs::metadata(self.resolve(path)).ok()?;
        let mode = metadata.permissions().mode();
        Some((metadata, mode))
    }
}

impl FileSystem for LocalFs {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let metadata = fs::metadata(self.resolve(path)).ok()?;
        let kind = if metadata.is_file() {
            EntryKind::File
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        };
        Some(kind)
    }

    fn is_readable(&self, path: &Path) -> bool {
        self.mode(path)
            .map(|(_, mode)| mode & S_IROTH != 0)
            .unwrap_or(false)
    }

    fn is_traversable(&self, path: &Path) -> bool {
        self.mode(path)
            .map(|(metadata, mode)| metadata.is_dir() && mode & S_IXOTH != 0)
            .unwrap_or(false)
    }

    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            // Seguir symlinks; si el destino no existe usar el propio link
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(_) => entry.metadata()?,
            };

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.is_dir(),
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(self.resolve(path)).ok()?.modified().ok()
    }
}
