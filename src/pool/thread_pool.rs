//! # Thread Pool Acotado
//! src/pool/thread_pool.rs
//!
//! Pool de workers con una cola FIFO acotada compartida.
//!
//! Todo el estado compartido (cola + ciclo de vida) vive detrás de un único
//! `Mutex`, con tres `Condvar`:
//! - `not_empty`: los workers esperan trabajo
//! - `not_full`: los productores esperan espacio en la cola (backpressure)
//! - `drained`: `shutdown` espera a que la cola se vacíe
//!
//! Las rutinas se ejecutan siempre fuera del lock.

use crate::error::{PoolError, Rejected};
use crate::pool::{BoundedQueue, WorkItem};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Máximo de workers permitidos en un pool
pub const MAX_THREADS: usize = 64;

/// Máxima capacidad permitida para la cola
pub const MAX_QUEUE_SIZE: usize = 1024;

/// Fase del ciclo de vida del pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Acepta trabajos nuevos
    Running,

    /// Rechaza trabajos nuevos, termina los encolados
    Draining,

    /// Cola vacía, los workers salen de su loop
    Stopped,
}

struct PoolState {
    queue: BoundedQueue<WorkItem>,
    lifecycle: Lifecycle,
    next_id: u64,
}

struct Shared {
    state: Mutex<PoolState>,
    not_empty: Condvar,
    not_full: Condvar,
    drained: Condvar,
}

impl Shared {
    fn new(max_queue: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                queue: BoundedQueue::new(max_queue),
                lifecycle: Lifecycle::Running,
                next_id: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    // Las rutinas nunca corren con el lock tomado, así que un envenenamiento
    // sólo puede venir de un pánico interno; el estado sigue siendo coherente.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, cvar: &Condvar, guard: MutexGuard<'a, PoolState>) -> MutexGuard<'a, PoolState> {
        cvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un trabajo, bloqueando mientras la cola esté llena
    fn enqueue<F, A>(&self, routine: F, arg: A) -> Result<u64, Rejected<A>>
    where
        F: FnOnce(A) + Send + 'static,
        A: Send + 'static,
    {
        let mut state = self.lock();

        loop {
            if state.lifecycle != Lifecycle::Running {
                return Err(Rejected(arg));
            }
            if !state.queue.is_full() {
                break;
            }
            state = self.wait(&self.not_full, state);
        }

        let id = state.next_id;
        state.next_id += 1;

        if let Err(item) = state.queue.push(WorkItem::new(id, routine, arg)) {
            unreachable!("queue full right after capacity check: {:?}", item);
        }

        // Despertar a un worker esperando
        self.not_empty.notify_one();

        Ok(id)
    }

    /// Desencola el siguiente trabajo
    ///
    /// Bloquea mientras la cola esté vacía. Retorna `None` cuando el pool
    /// llegó a `Stopped` y ya no queda nada por hacer.
    fn dequeue(&self) -> Option<WorkItem> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.queue.pop() {
                match state.lifecycle {
                    Lifecycle::Running => self.not_full.notify_one(),
                    Lifecycle::Draining if state.queue.is_empty() => self.drained.notify_all(),
                    _ => {}
                }
                return Some(item);
            }

            if state.lifecycle == Lifecycle::Stopped {
                return None;
            }

            state = self.wait(&self.not_empty, state);
        }
    }

    /// Running → Draining → Stopped
    ///
    /// Bloquea hasta que la cola quede vacía.
    fn drain(&self) {
        let mut state = self.lock();

        state.lifecycle = Lifecycle::Draining;
        // Los productores bloqueados por cola llena deben ver el rechazo
        self.not_full.notify_all();

        while !state.queue.is_empty() {
            state = self.wait(&self.drained, state);
        }

        state.lifecycle = Lifecycle::Stopped;
        // Todos los workers deben observar la terminación
        self.not_empty.notify_all();
    }

    /// Detiene el pool sin pasar por `Draining` (sólo con la cola vacía)
    fn stop_now(&self) {
        let mut state = self.lock();
        state.lifecycle = Lifecycle::Stopped;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}

/// Loop principal del worker
fn worker_loop(index: usize, shared: Arc<Shared>) {
    debug!(worker = index, "worker iniciado");

    while let Some(item) = shared.dequeue() {
        let job = item.id();
        if panic::catch_unwind(AssertUnwindSafe(|| item.run())).is_err() {
            error!(worker = index, job, "la rutina del trabajo entró en pánico");
        }
    }

    debug!(worker = index, "worker terminado");
}

/// Hace join de los workers; retorna cuántos terminaron con pánico
fn join_workers(handles: impl IntoIterator<Item = JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            panicked += 1;
            error!("un worker terminó con pánico");
        }
    }
    panicked
}

/// Pool de threads de tamaño fijo con cola acotada
///
/// # Ejemplo
///
/// ```
/// use webserver::pool::ThreadPool;
/// use std::sync::mpsc;
///
/// let pool = ThreadPool::new(2, 8).unwrap();
/// let (tx, rx) = mpsc::channel();
///
/// pool.submit(move |n: u32| tx.send(n + 1).unwrap(), 41).unwrap();
/// pool.shutdown();
///
/// assert_eq!(rx.recv().unwrap(), 42);
/// ```
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    size: usize,
}

impl ThreadPool {
    /// Crea el pool y arranca `pool_size` workers
    ///
    /// # Errores
    ///
    /// - `pool_size` fuera de `1..=MAX_THREADS`
    /// - `max_queue` fuera de `1..=MAX_QUEUE_SIZE`
    /// - fallo al crear un thread (los ya creados se detienen antes de retornar)
    pub fn new(pool_size: usize, max_queue: usize) -> Result<Self, PoolError> {
        if pool_size == 0 || pool_size > MAX_THREADS {
            return Err(PoolError::InvalidPoolSize {
                got: pool_size,
                max: MAX_THREADS,
            });
        }
        if max_queue == 0 || max_queue > MAX_QUEUE_SIZE {
            return Err(PoolError::InvalidQueueSize {
                got: max_queue,
                max: MAX_QUEUE_SIZE,
            });
        }

        let shared = Arc::new(Shared::new(max_queue));
        let mut workers = Vec::with_capacity(pool_size);

        for index in 0..pool_size {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("worker-{}", index))
                .spawn(move || worker_loop(index, worker_shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    shared.stop_now();
                    join_workers(workers);
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        info!(workers = pool_size, queue = max_queue, "thread pool listo");

        Ok(Self {
            shared,
            workers,
            size: pool_size,
        })
    }

    /// Encola `routine(arg)` para ejecutarse en algún worker
    ///
    /// Bloquea mientras la cola esté llena. Si el pool está apagándose
    /// retorna `Rejected(arg)`: el llamador debe liberar `arg` y no reintentar.
    pub fn submit<F, A>(&self, routine: F, arg: A) -> Result<(), Rejected<A>>
    where
        F: FnOnce(A) + Send + 'static,
        A: Send + 'static,
    {
        self.shared.enqueue(routine, arg).map(|_| ())
    }

    /// Handle clonable para encolar desde otros threads
    pub fn submitter(&self) -> Submitter {
        Submitter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.size
    }

    /// Trabajos esperando en la cola
    pub fn queue_len(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Capacidad máxima de la cola
    pub fn capacity(&self) -> usize {
        self.shared.lock().queue.capacity()
    }

    /// Fase actual del ciclo de vida
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lock().lifecycle
    }

    /// Apagado ordenado
    ///
    /// Rechaza trabajos nuevos, espera a que todo lo encolado se ejecute
    /// y hace join de todos los workers. Consume el pool, así que no puede
    /// llamarse dos veces.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        info!(pending = self.queue_len(), "apagando thread pool");
        self.shared.drain();

        join_workers(self.workers.drain(..));

        info!("thread pool detenido");
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Handle para encolar trabajos sin ser dueño del pool
#[derive(Clone)]
pub struct Submitter {
    shared: Arc<Shared>,
}

impl Submitter {
    /// Igual que [`ThreadPool::submit`]
    pub fn submit<F, A>(&self, routine: F, arg: A) -> Result<(), Rejected<A>>
    where
        F: FnOnce(A) + Send + 'static,
        A: Send + 'static,
    {
        self.shared.enqueue(routine, arg).map(|_| ())
    }

    /// Fase actual del ciclo de vida
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lock().lifecycle
    }
}
