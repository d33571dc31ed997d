//! Keyed UI and notice strings for every supported language.

use std::collections::BTreeMap;

use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Title,
    Subtitle,
    ProfileTitle,
    CityLabel,
    InterestsLabel,
    SubmitProfile,
    ProfileSaved,
    CityRequired,
    PromptLabel,
    SearchButton,
    ResultsTitle,
    SetProfileFirst,
    NoResults,
    SummaryUnavailable,
    ErrorLlm,
    ErrorSearch,
    RateLimitWarning,
    SearchCancelled,
    InterestRestaurants,
    InterestConcerts,
    InterestPubs,
    InterestGatherings,
    InterestEvents,
    InterestOutdoorActivities,
}

impl TextKey {
    pub const ALL: [TextKey; 24] = [
        TextKey::Title,
        TextKey::Subtitle,
        TextKey::ProfileTitle,
        TextKey::CityLabel,
        TextKey::InterestsLabel,
        TextKey::SubmitProfile,
        TextKey::ProfileSaved,
        TextKey::CityRequired,
        TextKey::PromptLabel,
        TextKey::SearchButton,
        TextKey::ResultsTitle,
        TextKey::SetProfileFirst,
        TextKey::NoResults,
        TextKey::SummaryUnavailable,
        TextKey::ErrorLlm,
        TextKey::ErrorSearch,
        TextKey::RateLimitWarning,
        TextKey::SearchCancelled,
        TextKey::InterestRestaurants,
        TextKey::InterestConcerts,
        TextKey::InterestPubs,
        TextKey::InterestGatherings,
        TextKey::InterestEvents,
        TextKey::InterestOutdoorActivities,
    ];

    /// Stable identifier exposed to front ends
    pub fn name(&self) -> &'static str {
        match self {
            TextKey::Title => "title",
            TextKey::Subtitle => "subtitle",
            TextKey::ProfileTitle => "profile_title",
            TextKey::CityLabel => "city_label",
            TextKey::InterestsLabel => "interests_label",
            TextKey::SubmitProfile => "submit_profile",
            TextKey::ProfileSaved => "profile_saved",
            TextKey::CityRequired => "city_required",
            TextKey::PromptLabel => "prompt_label",
            TextKey::SearchButton => "search_button",
            TextKey::ResultsTitle => "results_title",
            TextKey::SetProfileFirst => "set_profile_first",
            TextKey::NoResults => "no_results",
            TextKey::SummaryUnavailable => "summary_unavailable",
            TextKey::ErrorLlm => "error_llm",
            TextKey::ErrorSearch => "error_search",
            TextKey::RateLimitWarning => "rate_limit_warning",
            TextKey::SearchCancelled => "search_cancelled",
            TextKey::InterestRestaurants => "interest_restaurants",
            TextKey::InterestConcerts => "interest_concerts",
            TextKey::InterestPubs => "interest_pubs",
            TextKey::InterestGatherings => "interest_gatherings",
            TextKey::InterestEvents => "interest_events",
            TextKey::InterestOutdoorActivities => "interest_outdoor_activities",
        }
    }
}

/// Looks up the string for `key` in `language`
pub fn text(key: TextKey, language: Language) -> &'static str {
    match language {
        Language::En => english(key),
        Language::De => german(key),
    }
}

/// Full table for one language, keyed by [`TextKey::name`]
pub fn table(language: Language) -> BTreeMap<&'static str, &'static str> {
    TextKey::ALL
        .iter()
        .map(|key| (key.name(), text(*key, language)))
        .collect()
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "Local Goodies: Discover Positive Vibes by City",
        TextKey::Subtitle => "Find restaurants, concerts, pubs, gatherings & more tailored to you.",
        TextKey::ProfileTitle => "Your Profile",
        TextKey::CityLabel => "Your City",
        TextKey::InterestsLabel => "Interests (select all that apply)",
        TextKey::SubmitProfile => "Save Profile",
        TextKey::ProfileSaved => "Profile saved!",
        TextKey::CityRequired => "Please enter a city.",
        TextKey::PromptLabel => "What are you in the mood for? (e.g., \"cozy dinner spot\")",
        TextKey::SearchButton => "Search",
        TextKey::ResultsTitle => "Your Personalized Suggestions",
        TextKey::SetProfileFirst => "Set your profile first to get started!",
        TextKey::NoResults => "No suggestions found. Try a different prompt!",
        TextKey::SummaryUnavailable => "Suggestions could not be generated.",
        TextKey::ErrorLlm => "Language model error. Check your API key or connection.",
        TextKey::ErrorSearch => "Search failed. Check your connection.",
        TextKey::RateLimitWarning => {
            "The search service is rate limiting requests. Showing suggestions without live search results."
        }
        TextKey::SearchCancelled => "The search was cancelled.",
        TextKey::InterestRestaurants => "Restaurants",
        TextKey::InterestConcerts => "Concerts",
        TextKey::InterestPubs => "Pubs",
        TextKey::InterestGatherings => "Gatherings",
        TextKey::InterestEvents => "Events",
        TextKey::InterestOutdoorActivities => "Outdoor Activities",
    }
}

fn german(key: TextKey) -> &'static str {
    match key {
        TextKey::Title => "Lokale Highlights: Entdecke positive Vibes in deiner Stadt",
        TextKey::Subtitle => {
            "Finde Restaurants, Konzerte, Pubs, Treffen & mehr, maßgeschneidert für dich."
        }
        TextKey::ProfileTitle => "Dein Profil",
        TextKey::CityLabel => "Deine Stadt",
        TextKey::InterestsLabel => "Interessen (wähle alle zutreffenden aus)",
        TextKey::SubmitProfile => "Profil speichern",
        TextKey::ProfileSaved => "Profil gespeichert!",
        TextKey::CityRequired => "Bitte gib eine Stadt ein.",
        TextKey::PromptLabel => "Worauf hast du Lust? (z.B. \"gemütliches Abendessen\")",
        TextKey::SearchButton => "Suchen",
        TextKey::ResultsTitle => "Deine personalisierten Vorschläge",
        TextKey::SetProfileFirst => "Lege zuerst dein Profil an, um loszulegen!",
        TextKey::NoResults => "Keine Vorschläge gefunden. Versuche einen anderen Prompt!",
        TextKey::SummaryUnavailable => "Vorschläge konnten nicht erstellt werden.",
        TextKey::ErrorLlm => {
            "Fehler beim Sprachmodell. Überprüfe deinen API-Schlüssel oder die Verbindung."
        }
        TextKey::ErrorSearch => "Suche fehlgeschlagen. Überprüfe deine Verbindung.",
        TextKey::RateLimitWarning => {
            "Der Suchdienst begrenzt gerade die Anfragen. Vorschläge werden ohne Live-Suchergebnisse angezeigt."
        }
        TextKey::SearchCancelled => "Die Suche wurde abgebrochen.",
        TextKey::InterestRestaurants => "Restaurants",
        TextKey::InterestConcerts => "Konzerte",
        TextKey::InterestPubs => "Pubs",
        TextKey::InterestGatherings => "Treffen",
        TextKey::InterestEvents => "Events",
        TextKey::InterestOutdoorActivities => "Outdoor-Aktivitäten",
    }
}
