//! # Pool de Workers
//! src/pool/mod.rs
//!
//! Pool de threads de tamaño fijo con una cola acotada de trabajos.
//!
//! ## Arquitectura
//!
//! ```text
//! accept loop ──submit──► [ BoundedQueue ] ──dequeue──► worker-0 .. worker-N
//!                   (bloquea si está llena)    (bloquea si está vacía)
//! ```
//!
//! ## Ciclo de vida
//!
//! `Running → Draining → Stopped`. Las transiciones son monótonas:
//! - `Running`: acepta trabajos, los workers los ejecutan en orden FIFO.
//! - `Draining`: rechaza trabajos nuevos, los encolados se siguen ejecutando.
//! - `Stopped`: la cola quedó vacía, los workers terminan.

pub mod queue;
pub mod thread_pool;
pub mod work;

pub use queue::BoundedQueue;
pub use thread_pool::{Lifecycle, Submitter, ThreadPool, MAX_QUEUE_SIZE, MAX_THREADS};
pub use work::WorkItem;
