use crate::client::ApiClient;
use crate::config::Config;
use crate::dates::format_dob;
use crate::errors::ApiError;
use crate::models::Profile;
use crate::session::Session;
use crate::storage::LocalStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// No usable session; the app must be re-entered from the host.
    NeedsHost { message: String },
    Onboarding { error: Option<String> },
    Ready { greeting: String, is_admin: bool },
}

pub struct AppState {
    client: Option<ApiClient>,
    store: Arc<LocalStore>,
    profile: Mutex<Option<Profile>>,
    is_admin: AtomicBool,
    visible: AtomicBool,
    homework_on_screen: AtomicBool,
    pub wake: Notify,
}

impl AppState {
    pub fn new(
        config: &Config,
        session: Option<Session>,
        store: Arc<LocalStore>,
    ) -> Result<Arc<Self>, ApiError> {
        let client = match &session {
            Some(session) => Some(ApiClient::new(config, session, Arc::clone(&store))?),
            None => None,
        };

        Ok(Arc::new(Self {
            client,
            store,
            profile: Mutex::new(None),
            is_admin: AtomicBool::new(false),
            visible: AtomicBool::new(true),
            homework_on_screen: AtomicBool::new(false),
            wake: Notify::new(),
        }))
    }

    pub fn client(&self) -> Option<&ApiClient> {
        self.client.as_ref()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.profile.lock().unwrap().clone()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.load(Ordering::SeqCst)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Visibility gate for the background refresh; becoming visible triggers
    /// an immediate extra tick.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        if visible {
            self.wake.notify_one();
        }
    }

    pub fn set_homework_on_screen(&self, on_screen: bool) {
        self.homework_on_screen.store(on_screen, Ordering::SeqCst);
    }

    pub async fn boot(&self) -> BootOutcome {
        let Some(client) = &self.client else {
            return BootOutcome::NeedsHost {
                message: "Open this app inside the host messenger to continue.".to_string(),
            };
        };

        match client.get_profile(false).await {
            Ok((is_admin, Some(profile))) if profile.is_complete() => {
                self.apply_profile(is_admin, profile.clone());
                BootOutcome::Ready {
                    greeting: greeting_for(&profile.name),
                    is_admin,
                }
            }
            Ok(_) => BootOutcome::Onboarding { error: None },
            Err(err) => match self.fallback_profile() {
                Some((is_admin, profile)) => {
                    debug!("boot using offline fallback: {err}");
                    self.apply_profile(is_admin, profile.clone());
                    BootOutcome::Ready {
                        greeting: greeting_for(&profile.name),
                        is_admin,
                    }
                }
                None => BootOutcome::Onboarding {
                    error: Some(err.to_string()),
                },
            },
        }
    }

    /// One background refresh tick; errors are swallowed and the last good
    /// state stays visible.
    pub async fn refresh_once(&self) {
        if !self.is_visible() {
            return;
        }
        let Some(client) = &self.client else {
            return;
        };

        match client.get_profile(true).await {
            Ok((is_admin, Some(profile))) => self.apply_profile(is_admin, profile),
            Ok(_) => {}
            Err(err) => debug!("profile refresh failed: {err}"),
        }

        if self.homework_on_screen.load(Ordering::SeqCst) {
            if let Err(err) = client.get_homework(true).await {
                debug!("homework refresh failed: {err}");
            }
        }
    }

    pub fn profile_summary(&self) -> Option<String> {
        let profile = self.profile()?;
        Some(format!(
            "{} ({}): bible {}, truth {}, behavior {}",
            profile.name,
            format_dob(&profile.dob),
            profile.bible,
            profile.truth,
            profile.behavior
        ))
    }

    fn apply_profile(&self, is_admin: bool, profile: Profile) {
        self.is_admin.store(is_admin, Ordering::SeqCst);
        *self.profile.lock().unwrap() = Some(profile);
    }

    fn fallback_profile(&self) -> Option<(bool, Profile)> {
        if let Some(snapshot) = self.store.snapshot() {
            if snapshot.profile.is_complete() {
                return Some((snapshot.is_admin, snapshot.profile));
            }
        }

        let (name, dob) = self.store.identity()?;
        let draft = Profile::draft(name, dob);
        draft.is_complete().then_some((false, draft))
    }
}

pub fn greeting_for(name: &str) -> String {
    format!("Great to meet you, {name}!")
}
