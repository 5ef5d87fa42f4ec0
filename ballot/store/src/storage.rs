use {
    crate::{StoreError, StoreResult},
    std::{
        collections::BTreeMap,
        fs,
        io::{ErrorKind, Write},
        path::{Path, PathBuf},
        sync::{Arc, RwLock},
    },
    tempfile::NamedTempFile,
};

/// A durable string key-value store, local to this client.
///
/// Writes must be visible to a subsequent `read` as soon as they return.
pub trait Storage {
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

// ----------------------------------- file ------------------------------------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey {
                key: key.into(),
                reason: "empty",
            });
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::InvalidKey {
                key: key.into(),
                reason: "only ASCII letters, digits, `-` and `_` are allowed",
            });
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write to a temporary file in the same directory, then atomically
    /// rename it over the target, so a crash never leaves a half-written value.
    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir)?;

        let mut tmp_file = NamedTempFile::new_in(&self.dir)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.flush()?;
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(path)?;

        Ok(())
    }
}

// ---------------------------------- memory -----------------------------------

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemStorage {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<K, V>(self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner
            .write()
            .unwrap_or_else(|err| panic!("MemStorage is poisoned: {err:?}"))
            .insert(key.into(), value.into());
        self
    }
}

impl Storage for MemStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self
            .inner
            .read()
            .unwrap_or_else(|err| panic!("MemStorage is poisoned: {err:?}"));

        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(|err| panic!("MemStorage is poisoned: {err:?}"));

        map.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
