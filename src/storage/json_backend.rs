use std::{fmt::Write as _, fs, path::PathBuf};

use crate::utils::{
    paths::{app_data_dir, data_dir_in, ensure_dir},
    persistence::write_atomic,
};

use super::{KeyValueStore, Result};

const VALUE_EXTENSION: &str = "json";

/// File-backed key-value store keeping one document per key under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(|| data_dir_in(&app_data_dir()));
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", file_stem(key), VALUE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        write_atomic(&path, value)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }
}

/// Escapes a key into a file stem. Lowercase ASCII letters, digits and `-`
/// pass through; every other byte becomes `_xx` (lowercase hex), so distinct
/// keys never share a file. The empty key maps to `_`.
fn file_stem(key: &str) -> String {
    if key.is_empty() {
        return "_".into();
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(byte)),
            _ => {
                let _ = write!(stem, "_{byte:02x}");
            }
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BUDGET_KEY, EXPENSES_KEY};
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(Some(temp.path().join("data"))).expect("json store");
        (store, temp)
    }

    #[test]
    fn keys_map_to_escaped_file_names() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.path_for(EXPENSES_KEY);
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("expense_54racker_3aexpenses_3av1.json")
        );
        assert_eq!(file_stem(""), "_");
    }

    #[test]
    fn similar_keys_get_distinct_files() {
        let keys = ["a:b", "a_b", "A:B", "a-b", "ab", "_", ""];
        let mut stems: Vec<String> = keys.iter().map(|key| file_stem(key)).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), keys.len());

        let (store, _guard) = store_with_temp_dir();
        store.set("a:b", "colon").expect("write");
        store.set("a_b", "underscore").expect("write");
        store.set("A:B", "upper").expect("write");
        assert_eq!(store.get("a:b").expect("read").as_deref(), Some("colon"));
        assert_eq!(store.get("a_b").expect("read").as_deref(), Some("underscore"));
        assert_eq!(store.get("A:B").expect("read").as_deref(), Some("upper"));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get(BUDGET_KEY).expect("read"), None);
    }

    #[test]
    fn set_then_get_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        store.set(BUDGET_KEY, "1500").expect("write");
        store.set(BUDGET_KEY, "2500").expect("overwrite");
        assert_eq!(store.get(BUDGET_KEY).expect("read").as_deref(), Some("2500"));
        assert!(!store.path_for(BUDGET_KEY).with_extension("json.tmp").exists());
    }
}
