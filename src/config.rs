//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./webserver --port 8080 --root ./public \
//!   --pool-size 8 \
//!   --max-queue 64
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 SERVE_ROOT=./public POOL_SIZE=8 ./webserver
//! ```

use crate::error::ConfigError;
use crate::pool::{MAX_QUEUE_SIZE, MAX_THREADS};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "webserver")]
#[command(about = "Servidor HTTP/1.0 de archivos estáticos con pool de threads acotado")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz que se sirve
    #[arg(long, default_value = ".", env = "SERVE_ROOT")]
    pub root: PathBuf,

    // === Pool ===

    /// Número de workers del pool
    #[arg(long = "pool-size", default_value = "4", env = "POOL_SIZE")]
    pub pool_size: usize,

    /// Capacidad máxima de la cola de conexiones pendientes
    #[arg(long = "max-queue", default_value = "16", env = "MAX_QUEUE")]
    pub max_queue: usize,

    // === Ciclo de vida ===

    /// Cantidad de conexiones a atender antes de apagarse (0 = sin límite)
    #[arg(long = "max-requests", default_value = "0", env = "MAX_REQUESTS")]
    pub max_requests: u64,

    /// Timeout de lectura del request en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use webserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de lectura como `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// El puerto 0 es válido: el sistema asigna uno efímero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 || self.pool_size > MAX_THREADS {
            return Err(ConfigError::InvalidPoolSize {
                got: self.pool_size,
                max: MAX_THREADS,
            });
        }

        if self.max_queue == 0 || self.max_queue > MAX_QUEUE_SIZE {
            return Err(ConfigError::InvalidQueueSize {
                got: self.max_queue,
                max: MAX_QUEUE_SIZE,
            });
        }

        if self.read_timeout_ms == 0 {
            return Err(ConfigError::InvalidReadTimeout);
        }

        if !Path::new(&self.root).is_dir() {
            return Err(ConfigError::InvalidRoot(self.root.display().to_string()));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            root = %self.root.display(),
            pool_size = self.pool_size,
            max_queue = self.max_queue,
            max_requests = self.max_requests,
            read_timeout_ms = self.read_timeout_ms,
            "configuración"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            root: PathBuf::from("."),
            pool_size: 4,
            max_queue: 16,
            max_requests: 0,
            read_timeout_ms: 5_000,
        }
    }
}
