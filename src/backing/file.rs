//! File-backed store
//!
//! Each key maps to one JSON file below a root directory.

use std::fmt::Display;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::BackingStore;

// == File Store Error ==
/// Failures raised by [`FileStore`].
#[derive(Error, Debug)]
pub enum FileStoreError {
    /// Reading or writing a value file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value couldn't be encoded or decoded
    #[error("Serialization error on {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// == File Key ==
/// Maps a key to a path relative to the store root.
pub trait FileKey {
    fn relative_path(&self) -> PathBuf;
}

/// Everything but `[A-Za-z0-9_-]` is escaped, so separators and dots
/// can't form path syntax.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

// == Encode Component ==
/// Turns one key part into a single file name that stays below the root.
///
/// Distinct inputs give distinct names. The empty string becomes `%`,
/// which no escaped name can equal.
pub fn encode_component(part: &str) -> String {
    if part.is_empty() {
        return "%".to_string();
    }
    utf8_percent_encode(part, COMPONENT).to_string()
}

macro_rules! display_file_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl FileKey for $t {
                fn relative_path(&self) -> PathBuf {
                    PathBuf::from(encode_component(&self.to_string()))
                }
            }
        )*
    };
}

display_file_key!(String, &str, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// `(x, y)` lives at `x/y`, each part escaped on its own.
impl<A: Display, B: Display> FileKey for (A, B) {
    fn relative_path(&self) -> PathBuf {
        Path::new(&encode_component(&self.0.to_string()))
            .join(encode_component(&self.1.to_string()))
    }
}

// == File Store ==
/// Stores every value as a JSON document at `root/<key path>`.
#[derive(Debug)]
pub struct FileStore<K, V> {
    root: PathBuf,
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> Clone for FileStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K: FileKey, V> FileStore<K, V> {
    // == Constructor ==
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| FileStoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "Opened file backing store");

        Ok(Self {
            root,
            _marker: PhantomData,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the file holding `key`.
    pub fn path_for(&self, key: &K) -> PathBuf {
        self.root.join(key.relative_path())
    }

    // == Discard ==
    /// Deletes the file for `key`. Returns false if there was none.
    pub fn discard(&mut self, key: &K) -> Result<bool, FileStoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FileStoreError::Io { path, source }),
        }
    }
}

impl<K, V> BackingStore<K, V> for FileStore<K, V>
where
    K: FileKey,
    V: Serialize + DeserializeOwned,
{
    type Error = FileStoreError;

    fn store(&mut self, key: &K, value: &V) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| FileStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let data = serde_json::to_vec(value).map_err(|source| FileStoreError::Serde {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, data).map_err(|source| FileStoreError::Io {
            path: path.clone(),
            source,
        })?;

        trace!(path = %path.display(), "Wrote value file");
        Ok(())
    }

    fn fetch(&self, key: &K) -> Result<Option<V>, Self::Error> {
        let path = self.path_for(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FileStoreError::Io { path, source }),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| FileStoreError::Serde { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_key_paths() {
        assert_eq!(42u32.relative_path(), PathBuf::from("42"));
        assert_eq!("abc".relative_path(), PathBuf::from("abc"));
        assert_eq!((1, 2).relative_path(), Path::new("1").join("2"));
        assert_eq!((-1, 2).relative_path(), Path::new("-1").join("2"));
    }

    #[test]
    fn test_file_key_escapes_path_syntax() {
        assert_eq!("a/b".relative_path(), PathBuf::from("a%2Fb"));
        assert_eq!("a\\b".relative_path(), PathBuf::from("a%5Cb"));
        assert_eq!("..".relative_path(), PathBuf::from("%2E%2E"));
        assert_eq!("../x".relative_path(), PathBuf::from("%2E%2E%2Fx"));
        assert_eq!("/abs".relative_path(), PathBuf::from("%2Fabs"));
        assert_eq!("".relative_path(), PathBuf::from("%"));
        assert_eq!("%".relative_path(), PathBuf::from("%25"));
        assert_eq!(("..", "").relative_path(), Path::new("%2E%2E").join("%"));

        for key in ["a/b", "../x", "/abs", "", ".", "a/./b"] {
            assert_eq!(key.relative_path().components().count(), 1, "{key:?}");
        }
    }

    #[test]
    fn test_file_store_keys_stay_below_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("store");
        let mut store: FileStore<String, String> = FileStore::open(&root).unwrap();

        store.store(&"../escaped".to_string(), &"x".to_string()).unwrap();
        store.store(&"/abs".to_string(), &"y".to_string()).unwrap();

        assert!(!dir.path().join("escaped").exists());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 2);
        assert_eq!(
            store.fetch(&"../escaped".to_string()).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(
            store.fetch(&"/abs".to_string()).unwrap(),
            Some("y".to_string())
        );
    }

    #[test]
    fn test_file_store_separator_keys_are_distinct() {
        let dir = TempDir::new().unwrap();
        let mut store: FileStore<String, String> = FileStore::open(dir.path()).unwrap();

        store.store(&"a/b".to_string(), &"x".to_string()).unwrap();

        assert_eq!(store.fetch(&"a".to_string()).unwrap(), None);
        assert_eq!(store.fetch(&"a/./b".to_string()).unwrap(), None);

        store.store(&"a".to_string(), &"plain".to_string()).unwrap();
        store.store(&"".to_string(), &"empty".to_string()).unwrap();
        assert_eq!(store.fetch(&"a".to_string()).unwrap(), Some("plain".to_string()));
        assert_eq!(store.fetch(&"a/b".to_string()).unwrap(), Some("x".to_string()));
        assert_eq!(store.fetch(&"".to_string()).unwrap(), Some("empty".to_string()));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store: FileStore<(u32, u32), String> = FileStore::open(dir.path()).unwrap();

        store.store(&(1, 1), &"one and one".to_string()).unwrap();

        assert!(dir.path().join("1").join("1").is_file());
        assert_eq!(
            store.fetch(&(1, 1)).unwrap(),
            Some("one and one".to_string())
        );
        assert_eq!(store.fetch(&(1, 2)).unwrap(), None);
    }

    #[test]
    fn test_file_store_open_creates_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("store");

        let store: FileStore<String, i64> = FileStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_file_store_discard() {
        let dir = TempDir::new().unwrap();
        let mut store: FileStore<String, i64> = FileStore::open(dir.path()).unwrap();

        store.store(&"k".to_string(), &7).unwrap();
        assert!(store.discard(&"k".to_string()).unwrap());
        assert!(!store.discard(&"k".to_string()).unwrap());
        assert_eq!(store.fetch(&"k".to_string()).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_serde_error() {
        let dir = TempDir::new().unwrap();
        let store: FileStore<String, i64> = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("bad"), b"not json").unwrap();

        let err = store.fetch(&"bad".to_string()).unwrap_err();
        assert!(matches!(err, FileStoreError::Serde { .. }));
    }
}
