use std::{env, path::PathBuf, time::Duration};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const TTL_PROFILE: Duration = Duration::from_secs(60);
pub const TTL_HOMEWORK: Duration = Duration::from_secs(60);
pub const TTL_ADMIN_USERS: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub data_path: PathBuf,
    pub ttl_profile: Duration,
    pub ttl_homework: Duration,
    pub ttl_admin_users: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env::var("CLASS_APP_ENDPOINT")
            .map_err(|_| "CLASS_APP_ENDPOINT is not set".to_string())?;

        Ok(Self {
            endpoint,
            data_path: resolve_data_path(),
            ttl_profile: ttl_with_env("TTL_PROFILE_SECONDS", TTL_PROFILE),
            ttl_homework: ttl_with_env("TTL_HOMEWORK_SECONDS", TTL_HOMEWORK),
            ttl_admin_users: ttl_with_env("TTL_ADMIN_USERS_SECONDS", TTL_ADMIN_USERS),
        })
    }

    pub fn for_endpoint(endpoint: impl Into<String>, data_path: PathBuf) -> Self {
        Self {
            endpoint: endpoint.into(),
            data_path,
            ttl_profile: TTL_PROFILE,
            ttl_homework: TTL_HOMEWORK,
            ttl_admin_users: TTL_ADMIN_USERS,
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/local_store.json")
}

/// TTL with an environment variable override, in whole seconds.
pub fn ttl_with_env(env_key: &str, default_ttl: Duration) -> Duration {
    env::var(env_key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default_ttl)
}
