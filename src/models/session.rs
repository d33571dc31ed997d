use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Language, Theme, UserProfile};

/// Everything the front end keeps for one visitor
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionContext {
    pub id: Uuid,
    pub profile: Option<UserProfile>,
    pub language: Language,
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(language: Language, theme: Theme) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            profile: None,
            language,
            theme,
            created_at: now,
            last_active: now,
        }
    }

    /// Marks the session as used now
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Whether the session was last used at or before `cutoff`
    pub fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active <= cutoff
    }

    /// Replaces the stored profile wholesale
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }
}
