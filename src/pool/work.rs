//! # Unidad de Trabajo
//! src/pool/work.rs
//!
//! Un `WorkItem` empaqueta una rutina junto con su único argumento
//! (en el servidor, la conexión TCP) para ejecutarla más tarde en un worker.

use std::fmt;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Trabajo diferido: rutina + argumento, con un id secuencial
pub struct WorkItem {
    /// Número de secuencia asignado al encolar
    id: u64,

    /// Rutina ya ligada a su argumento
    task: Task,
}

impl WorkItem {
    /// Crea un trabajo a partir de una rutina y su argumento
    ///
    /// El argumento se mueve dentro del trabajo; a partir de aquí el
    /// único dueño es la cola (y luego el worker que lo ejecute).
    pub fn new<F, A>(id: u64, routine: F, arg: A) -> Self
    where
        F: FnOnce(A) + Send + 'static,
        A: Send + 'static,
    {
        Self {
            id,
            task: Box::new(move || routine(arg)),
        }
    }

    /// Id secuencial del trabajo
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ejecuta la rutina consumiendo el trabajo
    pub fn run(self) {
        (self.task)()
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem").field("id", &self.id).finish()
    }
}
