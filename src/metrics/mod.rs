//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección y agregación de métricas del servidor:
//! - Contadores de requests por código de estado
//! - Latencias (p50, p95, p99)
//! - Conexiones rechazadas por el pool

pub mod collector;

pub use collector::{LatencyStats, MetricsCollector, MetricsSnapshot};
