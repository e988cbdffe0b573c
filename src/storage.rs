use crate::errors::ApiError;
use crate::models::ProfileSnapshot;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::error;

pub const KEY_NAME: &str = "name";
pub const KEY_DOB: &str = "dob";
pub const KEY_PROFILE: &str = "profile";

/// Durable flat string key/value store backed by one JSON file.
///
/// Holds the last-known identity fields and the serialized profile snapshot
/// used as the offline fallback. Every write persists before returning.
pub struct LocalStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    pub async fn open(path: PathBuf) -> Result<Self, ApiError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(ApiError::storage)?;
            }
        }

        let data = load_map(&path).await;
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), ApiError> {
        self.set_many([(key.to_string(), value.into())]).await
    }

    pub async fn set_many(
        &self,
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ApiError> {
        let payload = {
            let mut data = self.data.lock().unwrap();
            for (key, value) in pairs {
                data.insert(key, value);
            }
            serde_json::to_vec_pretty(&*data).map_err(ApiError::storage)?
        };

        fs::write(&self.path, payload)
            .await
            .map_err(ApiError::storage)
    }

    pub async fn remember_identity(&self, name: &str, dob: &str) -> Result<(), ApiError> {
        self.set_many([
            (KEY_NAME.to_string(), name.to_string()),
            (KEY_DOB.to_string(), dob.to_string()),
        ])
        .await
    }

    pub fn identity(&self) -> Option<(String, String)> {
        let name = self.get(KEY_NAME)?;
        let dob = self.get(KEY_DOB)?;
        Some((name, dob))
    }

    pub async fn save_snapshot(&self, snapshot: &ProfileSnapshot) -> Result<(), ApiError> {
        let serialized = serde_json::to_string(snapshot).map_err(ApiError::storage)?;
        self.set(KEY_PROFILE, serialized).await
    }

    pub fn snapshot(&self) -> Option<ProfileSnapshot> {
        let raw = self.get(KEY_PROFILE)?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                error!("failed to parse stored profile snapshot: {err}");
                None
            }
        }
    }
}

async fn load_map(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse local store file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read local store file: {err}");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;

    fn temp_store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("local_store.json")
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);

        let store = LocalStore::open(path.clone()).await.unwrap();
        store.remember_identity("Anna", "2010-05-01").await.unwrap();
        drop(store);

        let reopened = LocalStore::open(path).await.unwrap();
        assert_eq!(
            reopened.identity(),
            Some(("Anna".to_string(), "2010-05-01".to_string()))
        );
    }

    #[tokio::test]
    async fn snapshot_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(temp_store_path(&dir)).await.unwrap();

        let snapshot = ProfileSnapshot::new(true, Profile::draft("Anna", "2010-05-01"));
        store.save_snapshot(&snapshot).await.unwrap();

        let loaded = store.snapshot().unwrap();
        assert!(loaded.is_admin);
        assert_eq!(loaded.profile.name, "Anna");
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);
        fs::write(&path, b"{ not json").await.unwrap();

        let store = LocalStore::open(path).await.unwrap();
        assert!(store.identity().is_none());
    }
}
