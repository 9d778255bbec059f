//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Accept loop del servidor. Cada conexión aceptada se encola en el
//! `ThreadPool` junto con la rutina que la atiende; el accept loop nunca
//! lee ni escribe en los sockets.
//!
//! ```text
//! listener.incoming() ──submit(serve, stream)──▶ [ cola acotada ] ──▶ workers
//!                         │
//!                         └─ Rejected(stream) → drop (cierra la conexión)
//! ```

use crate::config::Config;
use crate::error::{Rejected, ServerError};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::pool::ThreadPool;
use crate::resource::LocalFs;
use crate::server::dispatcher::Dispatcher;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(10);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Espera tras `failures` errores consecutivos de `accept` (EMFILE, ENFILE...)
///
/// Se duplica en cada error hasta `ACCEPT_BACKOFF_MAX`.
fn accept_backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(factor)
        .min(ACCEPT_BACKOFF_MAX)
}

/// Servidor HTTP/1.0 de archivos estáticos
pub struct Server {
    config: Config,
    listener: TcpListener,
    pool: ThreadPool,
    dispatcher: Arc<Dispatcher<LocalFs>>,
    metrics: MetricsCollector,
}

impl Server {
    /// Abre el socket y arranca el pool
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.address())?;
        let pool = ThreadPool::new(config.pool_size, config.max_queue)?;

        let metrics = MetricsCollector::new();
        let fs = LocalFs::new(config.root.clone());
        let dispatcher = Arc::new(Dispatcher::new(fs, metrics.clone()));

        info!(address = %listener.local_addr()?, root = %config.root.display(), "servidor escuchando");

        Ok(Self {
            config,
            listener,
            pool,
            dispatcher,
            metrics,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Acepta conexiones hasta llegar a `max_requests` (0 = sin límite)
    ///
    /// Al terminar apaga el pool de forma ordenada, así que todas las
    /// conexiones ya encoladas reciben respuesta antes de retornar.
    pub fn run(self) -> Result<MetricsSnapshot, ServerError> {
        let Server {
            config,
            listener,
            pool,
            dispatcher,
            metrics,
        } = self;

        let limit = config.max_requests;
        let mut submitted: u64 = 0;
        let mut accept_failures: u32 = 0;

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => {
                    accept_failures = 0;
                    stream
                }
                Err(e) => {
                    accept_failures = accept_failures.saturating_add(1);
                    let delay = accept_backoff(accept_failures);
                    // Sólo el primero de una racha y luego con la espera al máximo
                    if accept_failures == 1 || delay == ACCEPT_BACKOFF_MAX {
                        warn!(error = %e, failures = accept_failures, "error al aceptar conexión");
                    }
                    thread::sleep(delay);
                    continue;
                }
            };

            if let Err(e) = stream.set_read_timeout(Some(config.read_timeout())) {
                warn!(error = %e, "no se pudo configurar el timeout de lectura");
            }

            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            debug!(%peer, "nueva conexión");

            let worker_dispatcher = Arc::clone(&dispatcher);
            match pool.submit(move |stream: TcpStream| worker_dispatcher.serve(stream), stream) {
                Ok(()) => submitted += 1,
                Err(Rejected(stream)) => {
                    drop(stream);
                    metrics.record_rejected();
                    warn!(%peer, "pool no acepta trabajo, conexión cerrada");
                }
            }

            if limit > 0 && submitted >= limit {
                info!(requests = submitted, "límite de requests alcanzado");
                break;
            }
        }

        pool.shutdown();

        let snapshot = metrics.snapshot();
        match snapshot.to_json() {
            Ok(json) => info!(metrics = %json, "servidor detenido"),
            Err(e) => warn!(error = %e, "no se pudieron serializar las métricas"),
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn test_config(root: &TempDir, max_requests: u64) -> Config {
        Config {
            port: 0,
            root: root.path().to_path_buf(),
            pool_size: 2,
            max_queue: 4,
            max_requests,
            ..Config::default()
        }
    }

    fn request(addr: SocketAddr, line: &str) -> String {
        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(line.as_bytes()).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_accept_backoff_grows_and_caps() {
        assert_eq!(accept_backoff(1), Duration::from_millis(10));
        assert_eq!(accept_backoff(2), Duration::from_millis(20));
        assert_eq!(accept_backoff(4), Duration::from_millis(80));
        assert_eq!(accept_backoff(8), ACCEPT_BACKOFF_MAX);
        assert_eq!(accept_backoff(u32::MAX), ACCEPT_BACKOFF_MAX);

        let delays: Vec<_> = (1..=12).map(accept_backoff).collect();
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bind_rejects_invalid_pool() {
        let root = TempDir::new().unwrap();
        let mut config = test_config(&root, 1);
        config.pool_size = 0;

        assert!(matches!(Server::bind(config), Err(ServerError::Pool(_))));
    }

    #[test]
    fn test_stops_after_max_requests() {
        let root = TempDir::new().unwrap();
        let server = Server::bind(test_config(&root, 2)).unwrap();
        let addr = server.local_addr().unwrap();

        let handle = thread::spawn(move || server.run().unwrap());

        assert!(request(addr, "GET /missing HTTP/1.0\r\n\r\n").starts_with("HTTP/1.0 404 Not Found\r\n"));
        assert!(request(addr, "PUT / HTTP/1.0\r\n\r\n").starts_with("HTTP/1.0 501 Not Implemented\r\n"));

        let snapshot = handle.join().unwrap();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.rejected_submissions, 0);
    }
}
