use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};
use crate::i18n::{self, TextKey};

use super::Language;

/// An interest from the fixed vocabulary offered in the profile form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    #[serde(alias = "Restaurants")]
    Restaurants,
    #[serde(alias = "Concerts")]
    Concerts,
    #[serde(alias = "Pubs")]
    Pubs,
    #[serde(alias = "Gatherings")]
    Gatherings,
    #[serde(alias = "Events")]
    Events,
    #[serde(alias = "Outdoor Activities")]
    OutdoorActivities,
}

impl Interest {
    pub const ALL: [Interest; 6] = [
        Interest::Restaurants,
        Interest::Concerts,
        Interest::Pubs,
        Interest::Gatherings,
        Interest::Events,
        Interest::OutdoorActivities,
    ];

    /// Localized display label
    pub fn label(&self, language: Language) -> &'static str {
        let key = match self {
            Interest::Restaurants => TextKey::InterestRestaurants,
            Interest::Concerts => TextKey::InterestConcerts,
            Interest::Pubs => TextKey::InterestPubs,
            Interest::Gatherings => TextKey::InterestGatherings,
            Interest::Events => TextKey::InterestEvents,
            Interest::OutdoorActivities => TextKey::InterestOutdoorActivities,
        };
        i18n::text(key, language)
    }
}

/// City and interests for the current session
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    city: String,
    interests: BTreeSet<Interest>,
}

impl UserProfile {
    /// Builds a profile, trimming the city and rejecting a blank one
    pub fn new(city: &str, interests: impl IntoIterator<Item = Interest>) -> AppResult<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::InvalidInput("Please enter a city.".to_string()));
        }

        Ok(Self {
            city: city.to_string(),
            interests: interests.into_iter().collect(),
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn interests(&self) -> &BTreeSet<Interest> {
        &self.interests
    }

    /// Comma-separated interest labels in the given language
    pub fn interest_list(&self, language: Language) -> String {
        self.interests
            .iter()
            .map(|interest| interest.label(language))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// JSON rendering used inside LLM prompts
    pub fn to_prompt_json(&self, language: Language) -> String {
        let labels: Vec<&str> = self
            .interests
            .iter()
            .map(|interest| interest.label(language))
            .collect();
        serde_json::json!({ "city": self.city, "interests": labels }).to_string()
    }
}
