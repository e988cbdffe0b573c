use crate::cache::CachedGateway;
use crate::config::Config;
use crate::errors::ApiError;
use crate::gateway::Gateway;
use crate::models::{HomeworkResponse, Profile, ProfileResponse, ProfileSnapshot, UserRecord, UsersResponse};
use crate::session::Session;
use crate::storage::LocalStore;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

pub const ACTION_GET_PROFILE: &str = "getProfile";
pub const ACTION_GET_HOMEWORK: &str = "getHomework";
pub const ACTION_REGISTER: &str = "register";
pub const ACTION_ADMIN_LIST_USERS: &str = "adminListUsers";
pub const ACTION_ADMIN_UPDATE_STARS: &str = "adminUpdateStars";
pub const ACTION_ADMIN_SET_HOMEWORK: &str = "adminSetHomework";

/// Typed operations over the cached gateway.
///
/// Reads flow through the fast-path cache with per-action TTLs; mutations
/// bypass it and invalidate the read entries they make stale. Successful
/// profile reads write through to the durable local store.
pub struct ApiClient {
    cached: CachedGateway,
    store: Arc<LocalStore>,
    ttl_profile: Duration,
    ttl_homework: Duration,
    ttl_admin_users: Duration,
    registering: AtomicBool,
}

impl ApiClient {
    pub fn new(config: &Config, session: &Session, store: Arc<LocalStore>) -> Result<Self, ApiError> {
        let gateway = Gateway::new(config.endpoint.clone(), session.init_data.clone())?;
        Ok(Self {
            cached: CachedGateway::new(gateway),
            store,
            ttl_profile: config.ttl_profile,
            ttl_homework: config.ttl_homework,
            ttl_admin_users: config.ttl_admin_users,
            registering: AtomicBool::new(false),
        })
    }

    pub async fn get_profile(&self, force: bool) -> Result<(bool, Option<Profile>), ApiError> {
        let value = self
            .cached
            .call_cached(ACTION_GET_PROFILE, json!({}), self.ttl_profile, force)
            .await?;
        let parsed: ProfileResponse = decode(value)?;

        if let Some(profile) = &parsed.profile {
            self.remember_confirmed(parsed.is_admin, profile).await;
        }

        Ok((parsed.is_admin, parsed.profile))
    }

    pub async fn get_homework(&self, force: bool) -> Result<String, ApiError> {
        let value = self
            .cached
            .call_cached(ACTION_GET_HOMEWORK, json!({}), self.ttl_homework, force)
            .await?;
        let parsed: HomeworkResponse = decode(value)?;
        Ok(parsed.homework_text)
    }

    /// Registers the user, committing the submitted identity locally before
    /// the network call is issued.
    ///
    /// On failure the optimistic draft stays in place; a later successful
    /// profile read reconciles it against server state.
    pub async fn register(&self, name: &str, dob: &str) -> Result<(bool, Profile), ApiError> {
        if self
            .registering
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ApiError::api("registration is already in progress"));
        }

        let result = self.register_inner(name, dob).await;
        self.registering.store(false, Ordering::SeqCst);
        result
    }

    async fn register_inner(&self, name: &str, dob: &str) -> Result<(bool, Profile), ApiError> {
        let name = name.trim();
        let dob = dob.trim();
        if name.is_empty() || dob.is_empty() {
            return Err(ApiError::api("name and date of birth are required"));
        }

        self.store.remember_identity(name, dob).await?;

        let draft = Profile::draft(name, dob);
        self.seed_profile_cache(false, &draft);

        let outcome = self
            .cached
            .call_cached(
                ACTION_REGISTER,
                json!({"name": name, "dob": dob}),
                Duration::ZERO,
                true,
            )
            .await;

        match outcome {
            Ok(value) => {
                let parsed: ProfileResponse = decode(value)?;
                let confirmed = parsed.profile.unwrap_or(draft);
                self.seed_profile_cache(parsed.is_admin, &confirmed);
                self.remember_confirmed(parsed.is_admin, &confirmed).await;
                Ok((parsed.is_admin, confirmed))
            }
            Err(err) => {
                warn!("registration failed, keeping optimistic draft: {err}");
                Err(err)
            }
        }
    }

    pub async fn admin_list_users(&self, force: bool) -> Result<Vec<UserRecord>, ApiError> {
        let value = self
            .cached
            .call_cached(ACTION_ADMIN_LIST_USERS, json!({}), self.ttl_admin_users, force)
            .await?;
        let parsed: UsersResponse = decode(value)?;
        Ok(parsed.users)
    }

    pub async fn admin_update_stars(
        &self,
        tg_id: &str,
        bible: u64,
        truth: u64,
        behavior: u64,
    ) -> Result<(), ApiError> {
        self.cached
            .call_cached(
                ACTION_ADMIN_UPDATE_STARS,
                json!({
                    "tg_id": tg_id,
                    "bible": bible,
                    "truth": truth,
                    "behavior": behavior,
                }),
                Duration::ZERO,
                true,
            )
            .await?;

        self.cached.invalidate_prefix(ACTION_ADMIN_LIST_USERS);
        self.cached.invalidate_prefix(ACTION_GET_PROFILE);
        Ok(())
    }

    pub async fn admin_set_homework(&self, homework_text: &str) -> Result<(), ApiError> {
        self.cached
            .call_cached(
                ACTION_ADMIN_SET_HOMEWORK,
                json!({"homework_text": homework_text}),
                Duration::ZERO,
                true,
            )
            .await?;

        self.cached.invalidate_prefix(ACTION_GET_HOMEWORK);
        Ok(())
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    fn seed_profile_cache(&self, is_admin: bool, profile: &Profile) {
        let value = json!({
            "ok": true,
            "isAdmin": is_admin,
            "profile": profile,
        });
        self.cached.put(ACTION_GET_PROFILE, &json!({}), value);
    }

    async fn remember_confirmed(&self, is_admin: bool, profile: &Profile) {
        let mut pairs = Vec::new();
        if !profile.name.is_empty() {
            pairs.push((crate::storage::KEY_NAME.to_string(), profile.name.clone()));
        }
        if !profile.dob.is_empty() {
            pairs.push((crate::storage::KEY_DOB.to_string(), profile.dob.clone()));
        }
        if !pairs.is_empty() {
            if let Err(err) = self.store.set_many(pairs).await {
                warn!("failed to persist identity: {err}");
            }
        }

        let snapshot = ProfileSnapshot::new(is_admin, profile.clone());
        if let Err(err) = self.store.save_snapshot(&snapshot).await {
            warn!("failed to persist profile snapshot: {err}");
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::transport(format!("unexpected response shape: {err}")))
}
