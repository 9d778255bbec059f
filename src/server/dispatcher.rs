//! # Dispatcher de Conexiones
//! src/server/dispatcher.rs
//!
//! Atiende exactamente un request por conexión:
//!
//! ```text
//! leer request line → classify → synthesize → write → close
//! ```
//!
//! Es la rutina que el accept loop le entrega al pool junto con cada
//! `TcpStream`. La conexión se cierra al soltar el stream.

use crate::http::read_request_line;
use crate::metrics::MetricsCollector;
use crate::resource::{classify_line, synthesize, FileSystem};
use std::io::{self, BufReader, Read, Write};
use std::time::Instant;
use tracing::{debug, warn};

/// Sirve requests sobre un `FileSystem` compartido
#[derive(Debug)]
pub struct Dispatcher<F: FileSystem> {
    fs: F,
    metrics: MetricsCollector,
}

impl<F: FileSystem> Dispatcher<F> {
    pub fn new(fs: F, metrics: MetricsCollector) -> Self {
        Self { fs, metrics }
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Atiende una conexión; los errores de socket sólo se registran
    pub fn serve<S: Read + Write>(&self, stream: S) {
        if let Err(e) = self.try_serve(stream) {
            warn!(error = %e, "error de I/O atendiendo conexión");
        }
    }

    fn try_serve<S: Read + Write>(&self, stream: S) -> io::Result<()> {
        let start = Instant::now();
        let mut reader = BufReader::new(stream);

        let Some(line) = read_request_line(&mut reader)? else {
            debug!("conexión cerrada sin request");
            return Ok(());
        };

        let outcome = classify_line(&self.fs, &line);
        let response = synthesize(&self.fs, &outcome);

        let stream = reader.get_mut();
        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        self.metrics.record_request(response.status().as_u16(), latency);

        debug!(
            request = %line,
            status = response.status().as_u16(),
            bytes = response.body().len(),
            latency_us = latency.as_micros() as u64,
            "request atendido"
        );

        Ok(())
    }
}
