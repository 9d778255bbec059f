//! # webserver
//! src/lib.rs
//!
//! Servidor HTTP/1.0 de archivos estáticos construido sobre un pool de
//! threads con cola acotada. Demuestra conceptos de sistemas operativos:
//! concurrencia, sincronización con mutex y variables de condición,
//! backpressure y apagado ordenado.
//!
//! ## Arquitectura
//!
//! - `pool`: pool de workers con cola FIFO acotada y ciclo de vida
//!   `Running → Draining → Stopped`
//! - `http`: request line, códigos de estado, respuestas y tipos MIME
//! - `resource`: clasificación de requests contra el sistema de archivos y
//!   síntesis de respuestas
//! - `server`: accept loop y dispatcher de conexiones
//! - `config`: argumentos CLI y variables de entorno
//! - `metrics`: contadores y latencias
//! - `error`: tipos de error
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use webserver::config::Config;
//! use webserver::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el accept loop");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod resource;
pub mod server;
