use crate::error::AppError;
use crate::model::Task;
use std::cell::RefCell;
use std::rc::Rc;

pub mod json_store;

pub use json_store::JsonFileStore;

/// Persistence collaborator: a whole-collection, last-write-wins store.
pub trait StorageAdapter {
    /// Previously saved tasks, or an empty collection when nothing usable is
    /// stored. Malformed payloads are treated the same as an absent one;
    /// a parse failure never propagates past this boundary.
    fn load(&self) -> Vec<Task>;

    /// Overwrite the stored collection with `tasks`. No partial writes,
    /// no merge.
    fn save(&self, tasks: &[Task]) -> Result<(), AppError>;
}

impl<S: StorageAdapter + ?Sized> StorageAdapter for Rc<S> {
    fn load(&self) -> Vec<Task> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        (**self).save(tasks)
    }
}

/// Adapter keeping the collection in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RefCell<Vec<Task>>,
}

impl StorageAdapter for MemoryStore {
    fn load(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}
