use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub bible: u64,
    #[serde(default)]
    pub truth: u64,
    #[serde(default)]
    pub behavior: u64,
}

impl Profile {
    /// A profile counts as registered once both identity fields are filled.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.dob.is_empty()
    }

    pub fn draft(name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dob: dob.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserRecord {
    pub tg_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub bible: u64,
    #[serde(default)]
    pub truth: u64,
    #[serde(default)]
    pub behavior: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeworkResponse {
    #[serde(default)]
    pub homework_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Last confirmed profile state, persisted locally as the offline fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub timestamp: DateTime<Utc>,
    pub is_admin: bool,
    pub profile: Profile,
}

impl ProfileSnapshot {
    pub fn new(is_admin: bool, profile: Profile) -> Self {
        Self {
            timestamp: Utc::now(),
            is_admin,
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_complete_requires_both_fields() {
        assert!(!Profile::default().is_complete());
        assert!(!Profile::draft("Anna", "").is_complete());
        assert!(!Profile::draft("", "2010-05-01").is_complete());
        assert!(Profile::draft("Anna", "2010-05-01").is_complete());
    }

    #[test]
    fn profile_response_tolerates_missing_fields() {
        let parsed: ProfileResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(!parsed.is_admin);
        assert!(parsed.profile.is_none());
    }

    #[test]
    fn profile_response_reads_wire_casing() {
        let parsed: ProfileResponse = serde_json::from_str(
            r#"{"ok":true,"isAdmin":true,"profile":{"name":"Anna","dob":"2010-05-01","bible":2,"truth":1,"behavior":0}}"#,
        )
        .unwrap();
        assert!(parsed.is_admin);
        let profile = parsed.profile.unwrap();
        assert_eq!(profile.name, "Anna");
        assert_eq!(profile.bible, 2);
    }
}
