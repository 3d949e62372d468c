use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::diary::Diary;
use crate::index::{DiaryIndex, TagIndex};
use crate::utils::DEFAULT_DATETIME_FORMAT;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed record #{index} in {path}: {reason}")]
    Record {
        path: PathBuf,
        index: usize,
        reason: String,
    },
    #[error("Failed to serialize data for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON document, treating a missing file as the empty/default value
pub fn load_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    debug!("read {} ({} bytes)", path.display(), contents.len());
    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a JSON document pretty-printed with 4-space indentation,
/// creating the parent directory first if needed
pub fn save_json<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    fs::write(path, &buffer).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), buffer.len());

    Ok(())
}

/// Handle on a data folder: hands out the tag and diary indexes and diaries
/// bound to it. Nothing touches the filesystem until an operation runs.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    datetime_format: String,
    tags: TagIndex,
    diaries: DiaryIndex,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_datetime_format(data_dir, DEFAULT_DATETIME_FORMAT)
    }

    pub fn with_datetime_format(data_dir: impl Into<PathBuf>, datetime_format: &str) -> Self {
        let data_dir = data_dir.into();
        Self {
            tags: TagIndex::new(&data_dir),
            diaries: DiaryIndex::new(&data_dir),
            datetime_format: datetime_format.to_string(),
            data_dir,
        }
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn diaries(&self) -> &DiaryIndex {
        &self.diaries
    }

    /// Open the diary with the given name in this data folder
    pub fn diary(&self, name: &str) -> Diary {
        Diary::open(name, &self.data_dir).with_datetime_format(&self.datetime_format)
    }
}
