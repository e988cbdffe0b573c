use std::env;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
}

/// Surface consumed from the hosting environment: startup identity plus
/// haptics and the host-level back button.
pub trait Host: Send + Sync {
    fn init_data(&self) -> Option<String>;
    fn user_id(&self) -> Option<i64>;

    fn haptic_impact(&self, _style: ImpactStyle) {}
    fn haptic_notify(&self, _kind: NotifyKind) {}
    fn haptic_select(&self) {}
    fn set_back_button(&self, _visible: bool) {}
}

/// Host backed by environment variables; haptics become log lines.
pub struct EnvHost;

impl Host for EnvHost {
    fn init_data(&self) -> Option<String> {
        env::var("TG_INIT_DATA").ok().filter(|v| !v.is_empty())
    }

    fn user_id(&self) -> Option<i64> {
        env::var("TG_USER_ID").ok()?.parse().ok()
    }

    fn haptic_impact(&self, style: ImpactStyle) {
        debug!(?style, "haptic impact");
    }

    fn haptic_notify(&self, kind: NotifyKind) {
        debug!(?kind, "haptic notification");
    }

    fn haptic_select(&self) {
        debug!("haptic selection");
    }

    fn set_back_button(&self, visible: bool) {
        debug!(visible, "host back button");
    }
}

/// Caller identity for the process lifetime.
///
/// Both fields come from the host at startup; if either is missing the app
/// cannot authenticate and must be re-entered from the host.
#[derive(Debug, Clone)]
pub struct Session {
    pub init_data: String,
    pub tg_id: i64,
}

impl Session {
    pub fn from_host(host: &dyn Host) -> Option<Self> {
        let init_data = host.init_data()?;
        let tg_id = host.user_id()?;
        Some(Self { init_data, tg_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubHost {
        init_data: Option<String>,
        user_id: Option<i64>,
    }

    impl Host for StubHost {
        fn init_data(&self) -> Option<String> {
            self.init_data.clone()
        }

        fn user_id(&self) -> Option<i64> {
            self.user_id
        }
    }

    #[test]
    fn session_requires_both_fields() {
        let no_token = StubHost {
            init_data: None,
            user_id: Some(7),
        };
        assert!(Session::from_host(&no_token).is_none());

        let no_id = StubHost {
            init_data: Some("token".into()),
            user_id: None,
        };
        assert!(Session::from_host(&no_id).is_none());

        let full = StubHost {
            init_data: Some("token".into()),
            user_id: Some(7),
        };
        let session = Session::from_host(&full).unwrap();
        assert_eq!(session.tg_id, 7);
        assert_eq!(session.init_data, "token");
    }
}
