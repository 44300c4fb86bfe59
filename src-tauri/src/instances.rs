use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub type InstanceId = Uuid;

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("instance {0} is not mounted")]
    NotMounted(InstanceId),
}

/// Mounted component instances. Each instance owns its state exclusively;
/// unmounting drops it, so anything that arrives later has nowhere to land.
pub struct Instances<T> {
    slots: Mutex<HashMap<InstanceId, T>>,
}

impl<T> Default for Instances<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Instances<T> {
    fn lock(&self) -> MutexGuard<'_, HashMap<InstanceId, T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mount(&self, value: T) -> InstanceId {
        let id = Uuid::new_v4();
        self.lock().insert(id, value);
        id
    }

    pub fn unmount(&self, id: &InstanceId) -> Option<T> {
        self.lock().remove(id)
    }

    pub fn is_mounted(&self, id: &InstanceId) -> bool {
        self.lock().contains_key(id)
    }

    /// Run `f` against a mounted instance. `None` if it is gone.
    pub fn with<R>(&self, id: &InstanceId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.lock().get_mut(id).map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
