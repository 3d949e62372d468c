//! Global registries of known tags and diary names.
//!
//! Each index is a sorted, duplicate-free list of strings stored as a JSON
//! array in the data folder. Every mutation loads the whole file, changes it in
//! memory and writes it back. There is no locking: two processes mutating the
//! same index at once can lose an update.

use log::debug;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::store::{StoreError, load_json, save_json};

pub const TAGS_FILENAME: &str = "existing_tags.json";
pub const DIARIES_FILENAME: &str = "existing_diaries.json";

/// Sorted string set backed by one JSON file
#[derive(Debug, Clone)]
struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        let items: Vec<String> = load_json(&self.path)?;
        Ok(items.into_iter().collect())
    }

    fn save(&self, items: &BTreeSet<String>) -> Result<(), StoreError> {
        let items: Vec<&String> = items.iter().collect();
        save_json(&self.path, &items)
    }

    fn add<I>(&self, new_items: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut items = self.load()?;
        for item in new_items {
            if items.insert(item.clone()) {
                debug!("{}: added {:?}", self.path.display(), item);
            }
        }
        self.save(&items)
    }

    fn remove(&self, item: &str) -> Result<(), StoreError> {
        let mut items = self.load()?;
        if items.remove(item) {
            debug!("{}: removed {:?}", self.path.display(), item);
        }
        self.save(&items)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.save(&BTreeSet::new())
    }

    fn contains(&self, item: &str) -> Result<bool, StoreError> {
        Ok(self.load()?.contains(item))
    }

    fn formatted(&self, empty_message: &str) -> Result<String, StoreError> {
        let items = self.load()?;
        if items.is_empty() {
            return Ok(empty_message.to_string());
        }
        Ok(items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Known tags, stored lowercased
#[derive(Debug, Clone)]
pub struct TagIndex {
    file: IndexFile,
}

impl TagIndex {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: IndexFile {
                path: data_dir.join(TAGS_FILENAME),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// All known tags in ascending order; empty if the file does not exist yet
    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.file.load()?.into_iter().collect())
    }

    /// Case-fold and register tags. Already known tags are left alone,
    /// but the file is rewritten either way.
    pub fn add<S: AsRef<str>>(&self, tags: &[S]) -> Result<(), StoreError> {
        self.file
            .add(tags.iter().map(|tag| fold_case(tag.as_ref())))
    }

    pub fn remove(&self, tag: &str) -> Result<(), StoreError> {
        self.file.remove(&fold_case(tag))
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.file.clear()
    }

    pub fn contains(&self, tag: &str) -> Result<bool, StoreError> {
        self.file.contains(&fold_case(tag))
    }

    pub fn formatted(&self) -> Result<String, StoreError> {
        self.file.formatted("No existing tags found.")
    }
}

/// Known diary names, stored as typed
#[derive(Debug, Clone)]
pub struct DiaryIndex {
    file: IndexFile,
}

impl DiaryIndex {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: IndexFile {
                path: data_dir.join(DIARIES_FILENAME),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.file.load()?.into_iter().collect())
    }

    pub fn add(&self, name: &str) -> Result<(), StoreError> {
        self.file.add(std::iter::once(name.to_string()))
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.file.remove(name)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.file.clear()
    }

    pub fn contains(&self, name: &str) -> Result<bool, StoreError> {
        self.file.contains(name)
    }

    pub fn formatted(&self) -> Result<String, StoreError> {
        self.file.formatted("No existing diaries found.")
    }
}

fn fold_case(tag: &str) -> String {
    tag.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn assert_strictly_sorted(items: &[String]) {
        assert!(items.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", items);
    }

    #[test]
    fn test_tag_add_is_case_folded_and_idempotent() {
        let dir = tempdir().unwrap();
        let tags = TagIndex::new(dir.path());

        tags.add(&["Work", "work", "WORK"]).unwrap();

        assert_eq!(tags.load().unwrap(), vec!["work"]);
        assert!(tags.contains("Work").unwrap());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        assert!(DiaryIndex::new(dir.path()).load().unwrap().is_empty());
        assert!(TagIndex::new(dir.path()).load().unwrap().is_empty());
    }

    #[test]
    fn test_sorted_after_mixed_mutations() {
        let dir = tempdir().unwrap();
        let diaries = DiaryIndex::new(dir.path());

        for name in ["Work", "Daily", "Travel", "Daily", "Books"] {
            diaries.add(name).unwrap();
        }
        diaries.remove("Travel").unwrap();
        diaries.remove("Never There").unwrap();
        diaries.add("Art").unwrap();

        let loaded = diaries.load().unwrap();
        assert_eq!(loaded, vec!["Art", "Books", "Daily", "Work"]);
        assert_strictly_sorted(&loaded);
    }

    #[test]
    fn test_persisted_file_is_sorted_list() {
        let dir = tempdir().unwrap();
        let tags = TagIndex::new(dir.path());
        tags.add(&["zeta", "Alpha", "mid"]).unwrap();

        let raw = fs::read_to_string(tags.path()).unwrap();
        let on_disk: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_unsorted_file_is_normalized_on_load() {
        let dir = tempdir().unwrap();
        let diaries = DiaryIndex::new(dir.path());
        fs::write(diaries.path(), r#"["b", "a", "b"]"#).unwrap();

        assert_eq!(diaries.load().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_tag_remove_folds_case() {
        let dir = tempdir().unwrap();
        let tags = TagIndex::new(dir.path());
        tags.add(&["health", "exercise"]).unwrap();

        tags.remove("HEALTH").unwrap();

        assert_eq!(tags.load().unwrap(), vec!["exercise"]);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let diaries = DiaryIndex::new(dir.path());
        diaries.add("Daily").unwrap();

        diaries.clear().unwrap();

        assert!(diaries.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(diaries.path()).unwrap(), "[]");
    }

    #[test]
    fn test_contains_is_exact_for_diaries() {
        let dir = tempdir().unwrap();
        let diaries = DiaryIndex::new(dir.path());
        diaries.add("Daily").unwrap();

        assert!(diaries.contains("Daily").unwrap());
        assert!(!diaries.contains("daily").unwrap());
        assert!(!diaries.contains("Weekly").unwrap());
    }

    #[test]
    fn test_formatted() {
        let dir = tempdir().unwrap();
        let diaries = DiaryIndex::new(dir.path());
        assert_eq!(diaries.formatted().unwrap(), "No existing diaries found.");

        diaries.add("Work").unwrap();
        diaries.add("Daily").unwrap();
        assert_eq!(diaries.formatted().unwrap(), "- Daily\n- Work");

        let tags = TagIndex::new(dir.path());
        assert_eq!(tags.formatted().unwrap(), "No existing tags found.");
    }
}
