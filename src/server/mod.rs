//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes y las encola en el pool
//! 3. En cada worker lee la request line, clasifica y responde
//! 4. Cierra la conexión (HTTP/1.0, un request por conexión)

pub mod dispatcher;
pub mod tcp;

pub use dispatcher::Dispatcher;
pub use tcp::Server;
