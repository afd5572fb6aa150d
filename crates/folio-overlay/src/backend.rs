use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of the persistence layer underneath the overlay.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The backing file exists but is not a JSON object of strings.
    Corrupt { path: PathBuf, message: String },
    /// A value could not be serialized before storing.
    Serialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "overlay io error at {}: {source}", path.display())
            }
            StoreError::Corrupt { path, message } => {
                write!(f, "overlay file {} is corrupt: {message}", path.display())
            }
            StoreError::Serialize(msg) => write!(f, "overlay serialize error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// String key/value persistence, the shape of browser local storage.
///
/// Reads are infallible: a backend that cannot produce a value reports it as
/// absent. Writes and removals may fail; removing an absent key is `Ok(())`.
pub trait OverlayBackend {
    /// Every key currently held, in enumeration order.
    fn keys(&self) -> Vec<String>;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// Session-scoped backend. Keys enumerate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl OverlayBackend for MemoryBackend {
    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileBackend
// ---------------------------------------------------------------------------

/// Backend persisted as one JSON object (`{"key": "value", ...}`) on disk.
///
/// The whole map is held in memory and rewritten on every mutation through a
/// sibling temp file followed by a rename, so a crash leaves either the old or
/// the new contents.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    entries: MemoryBackend,
}

impl FileBackend {
    /// Open the overlay file at `path`. A missing file is an empty overlay.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => MemoryBackend::new(),
            Ok(raw) => {
                let map: BTreeMap<String, String> =
                    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                MemoryBackend { entries: map }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryBackend::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries.entries)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, format!("{json}\n")).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Persist, or put `key` back to `previous` in memory if that fails so the
    /// map never runs ahead of the file.
    fn persist_or_restore(&mut self, key: &str, previous: Option<String>) -> Result<(), StoreError> {
        let Err(e) = self.persist() else {
            return Ok(());
        };
        match previous {
            Some(value) => self.entries.entries.insert(key.to_string(), value),
            None => self.entries.entries.remove(key),
        };
        Err(e)
    }
}

impl OverlayBackend for FileBackend {
    fn keys(&self) -> Vec<String> {
        self.entries.keys()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let previous = self.entries.entries.insert(key.to_string(), value);
        self.persist_or_restore(key, previous)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(previous) = self.entries.entries.remove(key) else {
            return Ok(());
        };
        self.persist_or_restore(key, Some(previous))
    }
}
