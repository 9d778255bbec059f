//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores:
//! - `ConfigError`: parámetros inválidos al arrancar (fatal)
//! - `PoolError`: no se pudo construir el pool (fatal, sin pool parcial)
//! - `Rejected`: el pool ya no acepta trabajos (esperado durante el apagado)
//! - `ServerError`: agrupa todo lo anterior para el binario

use std::fmt;
use std::io;
use thiserror::Error;

/// Errores de validación de la configuración
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Pool size must be in 1..={max} (got {got})")]
    InvalidPoolSize { got: usize, max: usize },

    #[error("Max queue size must be in 1..={max} (got {got})")]
    InvalidQueueSize { got: usize, max: usize },

    #[error("Read timeout must be > 0")]
    InvalidReadTimeout,

    #[error("Root directory is not a directory: {0}")]
    InvalidRoot(String),
}

/// Errores de inicialización del pool
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Invalid pool size {got} (allowed 1..={max})")]
    InvalidPoolSize { got: usize, max: usize },

    #[error("Invalid queue size {got} (allowed 1..={max})")]
    InvalidQueueSize { got: usize, max: usize },

    #[error("Failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },
}

/// El pool dejó de aceptar trabajos (está en `Draining` o `Stopped`)
///
/// Devuelve el argumento que no se pudo encolar para que el llamador
/// libere sus recursos (por ejemplo, cerrar la conexión). No reintentar.
pub struct Rejected<A>(pub A);

impl<A> Rejected<A> {
    /// Recupera el argumento rechazado
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> fmt::Debug for Rejected<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rejected(..)")
    }
}

impl<A> fmt::Display for Rejected<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thread pool is not accepting work")
    }
}

impl<A> std::error::Error for Rejected<A> {}

/// Error de nivel superior del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Thread pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
