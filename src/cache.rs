use crate::errors::ApiError;
use crate::gateway::Gateway;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::debug;

type CallOutcome = Result<Value, ApiError>;

struct CacheEntry {
    stored_at: Instant,
    value: Value,
}

enum Slot {
    Leader(watch::Sender<Option<CallOutcome>>),
    Follower(watch::Receiver<Option<CallOutcome>>),
}

/// Gateway wrapper adding a fast-path result cache and in-flight
/// de-duplication.
///
/// A fresh cache entry answers without touching the network. While a call for
/// a key is outstanding, later callers for the same key join it instead of
/// issuing their own request; all of them observe the same outcome. The
/// in-flight slot is cleared on success and on failure, so a failed call never
/// blocks a later retry.
pub struct CachedGateway {
    gateway: Gateway,
    cache: Mutex<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, watch::Receiver<Option<CallOutcome>>>>,
}

impl CachedGateway {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub async fn call_cached(
        &self,
        action: &str,
        params: Value,
        ttl: Duration,
        force_refresh: bool,
    ) -> CallOutcome {
        let key = cache_key(action, &params);

        if !force_refresh {
            let cache = self.cache.lock().unwrap();
            if let Some(entry) = cache.get(&key) {
                if entry.stored_at.elapsed() < ttl {
                    debug!(action, "cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        let slot = {
            let mut in_flight = self.in_flight.lock().unwrap();
            if let Some(rx) = in_flight.get(&key) {
                Slot::Follower(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                in_flight.insert(key.clone(), rx);
                Slot::Leader(tx)
            }
        };

        let tx = match slot {
            Slot::Follower(rx) => {
                debug!(action, "joining in-flight call");
                return await_outcome(rx).await;
            }
            Slot::Leader(tx) => tx,
        };

        let outcome = self.gateway.call(action, params).await;

        if let Ok(value) = &outcome {
            if ttl > Duration::ZERO {
                let mut cache = self.cache.lock().unwrap();
                cache.insert(
                    key.clone(),
                    CacheEntry {
                        stored_at: Instant::now(),
                        value: value.clone(),
                    },
                );
            }
        }

        self.in_flight.lock().unwrap().remove(&key);
        let _ = tx.send(Some(outcome.clone()));

        outcome
    }

    /// Seeds the cache as if `value` had just been fetched for this call.
    pub fn put(&self, action: &str, params: &Value, value: Value) {
        let key = cache_key(action, params);
        self.cache.lock().unwrap().insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drops every entry belonging to `action`, regardless of params.
    ///
    /// Mutations call this for the read actions they make stale, so the next
    /// read goes to the network even inside its TTL window.
    pub fn invalidate_prefix(&self, action: &str) {
        let prefix = format!("{action}|");
        let mut cache = self.cache.lock().unwrap();
        cache.retain(|key, _| !key.starts_with(&prefix));
    }
}

async fn await_outcome(mut rx: watch::Receiver<Option<CallOutcome>>) -> CallOutcome {
    loop {
        {
            let current = rx.borrow_and_update();
            if let Some(outcome) = current.as_ref() {
                return outcome.clone();
            }
        }
        if rx.changed().await.is_err() {
            return Err(ApiError::transport("in-flight call was dropped"));
        }
    }
}

fn cache_key(action: &str, params: &Value) -> String {
    // serde_json maps serialize with sorted keys, so this form is canonical.
    let serialized = serde_json::to_string(params).unwrap_or_default();
    format!("{action}|{serialized}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_is_canonical_across_param_order() {
        let a = json!({"tg_id": "5", "bible": 1});
        let b = json!({"bible": 1, "tg_id": "5"});
        assert_eq!(
            cache_key("adminUpdateStars", &a),
            cache_key("adminUpdateStars", &b)
        );
    }

    #[test]
    fn key_separates_actions_and_params() {
        let params = json!({});
        assert_ne!(
            cache_key("getProfile", &params),
            cache_key("getHomework", &params)
        );
        assert_ne!(
            cache_key("getProfile", &json!({"a": 1})),
            cache_key("getProfile", &json!({"a": 2}))
        );
    }
}
