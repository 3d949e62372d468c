use log::{info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::index::DiaryIndex;
use crate::models::Entry;
use crate::store::{StoreError, load_json, save_json};
use crate::utils::DEFAULT_DATETIME_FORMAT;

const RULE: &str = "-------------------------";

/// Map a diary name to its file name, e.g. "Daily Log" -> "daily_log_diary.json".
/// The suffix keeps diary files apart from the index files in the same folder.
pub fn storage_key(name: &str) -> String {
    format!("{}_diary.json", name.to_lowercase().replace(' ', "_"))
}

/// A named diary backed by one JSON file holding its entries in append order.
///
/// Appending reads the whole file, pushes the new record and rewrites it.
/// Concurrent writers to the same diary can lose entries.
#[derive(Debug, Clone)]
pub struct Diary {
    name: String,
    path: PathBuf,
    datetime_format: String,
}

impl Diary {
    /// Bind a diary to its file in `data_dir`. Nothing is read or created yet.
    pub fn open(name: &str, data_dir: &Path) -> Self {
        Self {
            name: name.to_string(),
            path: data_dir.join(storage_key(name)),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }

    /// Format used for display strings and for reading legacy record keys
    pub fn with_datetime_format(mut self, format: &str) -> Self {
        self.datetime_format = format.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry to the diary file and register the diary name
    pub fn append_entry(&self, entry: &Entry, diaries: &DiaryIndex) -> Result<(), StoreError> {
        let mut records: Vec<Value> = load_json(&self.path)?;
        let record = serde_json::to_value(entry.serialize()).map_err(|source| {
            StoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        records.push(record);
        save_json(&self.path, &records)?;
        diaries.add(&self.name)?;

        info!(
            "appended entry {} to diary {:?} ({} entries)",
            entry.timestamp(),
            self.name,
            records.len()
        );
        Ok(())
    }

    /// Load every entry in file order. A missing file is an empty diary;
    /// any malformed record fails the whole load.
    pub fn list_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let records: Vec<Value> = load_json(&self.path)?;
        records
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                if value.is_object() {
                    warn!(
                        "record #{} in {} uses the legacy datetime-keyed layout",
                        index,
                        self.path.display()
                    );
                }
                Entry::from_value(value, &self.datetime_format).map_err(|reason| {
                    StoreError::Record {
                        path: self.path.clone(),
                        index,
                        reason,
                    }
                })
            })
            .collect()
    }

    /// Bordered text summary of the diary and all of its entries
    pub fn render(&self) -> Result<String, StoreError> {
        let entries = self.list_entries()?;
        if entries.is_empty() {
            return Ok(format!("Diary '{}' is empty.", self.name));
        }

        let mut output = format!(
            "{RULE}\nDiary name: {}\nFilepath: {}\n{RULE}",
            self.name,
            self.path.display()
        );
        for entry in &entries {
            output.push('\n');
            output.push_str(&entry.to_string());
            output.push('\n');
            output.push_str(RULE);
        }
        Ok(output)
    }
}
