//! # Cola FIFO Acotada
//! src/pool/queue.rs
//!
//! Estructura de datos pura (sin sincronización): el pool la guarda dentro
//! de su único `Mutex`, así que productores y consumidores nunca la tocan
//! fuera de la sección crítica.

use std::collections::VecDeque;

/// Cola FIFO con capacidad máxima fija
#[derive(Debug)]
pub struct BoundedQueue<T> {
    /// Buffer circular interno
    items: VecDeque<T>,

    /// Capacidad máxima de la cola
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola vacía con capacidad máxima
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Agrega un elemento al final
    ///
    /// Si la cola está llena devuelve el elemento en `Err` sin modificarla.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Remueve el elemento más antiguo
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Verifica si la cola está llena
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
