use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::json_store::{JsonStore, KeyValueStore, MemoryStore, StorageError};

/// Typed JSON access on top of a [`KeyValueStore`].
///
/// `try_read`/`try_write` report failures. `read`/`write` are the fail-soft
/// accessors the quiz uses: a read that fails yields the default, a write
/// that fails is logged and forgotten.
pub struct Preferences {
    backend: Box<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// On-disk preferences in `dir`, or in-memory ones if it is unusable.
    pub fn open_dir(dir: std::path::PathBuf) -> Self {
        match JsonStore::with_base_dir(dir.clone()) {
            Ok(store) => Self::new(Box::new(store)),
            Err(e) => {
                log::warn!(
                    "cannot use {} for preferences, keeping state in memory: {e}",
                    dir.display()
                );
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn try_write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &json)
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::debug!("falling back to default for {key}: {e}");
                default
            }
        }
    }

    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            log::warn!("could not persist {key}: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Memory backend whose reads or writes can be made to fail.
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_writes: Rc<Cell<bool>>,
        pub fail_reads: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable);
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Unavailable);
            }
            self.inner.set(key, value)
        }
    }

    pub fn failing_writes() -> Preferences {
        Preferences::new(Box::new(FlakyStore {
            inner: MemoryStore::new(),
            fail_writes: Rc::new(Cell::new(true)),
            fail_reads: false,
        }))
    }
}
