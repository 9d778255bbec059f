//! # Recursos Estáticos
//! src/resource/mod.rs
//!
//! Pipeline sin estado que decide qué responder a un request:
//!
//! ```text
//! request line → classify() → Outcome → synthesize() → Response
//!                    │                        │
//!                    └──── FileSystem ────────┘
//! ```
//!
//! Ninguna parte de este módulo comparte estado mutable; sólo hace
//! consultas de lectura al sistema de archivos, así que es seguro usarlo
//! desde cualquier worker sin sincronización.

pub mod classifier;
pub mod filesystem;
pub mod listing;
pub mod synthesizer;

pub use classifier::{classify, classify_line, Outcome};
pub use filesystem::{DirEntry, EntryKind, FileSystem, LocalFs};
pub use synthesizer::{synthesize, synthesize_at, SERVER_NAME};
