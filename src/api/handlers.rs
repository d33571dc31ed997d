use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::i18n::{self, TextKey};
use crate::middleware::request_id::RequestId;
use crate::models::{
    Interest, Language, PipelineOutcome, PipelineRequest, SessionContext, Theme, UserProfile,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct SettingsRequest {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub city: String,
    #[serde(default)]
    pub interests: Vec<Interest>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct OneShotRequest {
    pub city: String,
    #[serde(default)]
    pub interests: Vec<Interest>,
    pub prompt: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct InterestOption {
    pub code: Interest,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TextsResponse {
    pub language: Language,
    pub texts: BTreeMap<&'static str, &'static str>,
    pub interests: Vec<InterestOption>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// UI strings and interest options for one language
pub async fn get_texts(Path(code): Path<String>) -> AppResult<Json<TextsResponse>> {
    let language = Language::parse(&code)
        .ok_or_else(|| AppError::NotFound(format!("Unsupported language '{}'", code)))?;

    let interests = Interest::ALL
        .iter()
        .map(|interest| InterestOption {
            code: *interest,
            label: interest.label(language),
        })
        .collect();

    Ok(Json(TextsResponse {
        language,
        texts: i18n::table(language),
        interests,
    }))
}

/// Start a new session
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<SettingsRequest>,
) -> (StatusCode, Json<SessionContext>) {
    let session = SessionContext::new(
        request.language.unwrap_or_default(),
        request.theme.unwrap_or_default(),
    );

    let mut inner = state.inner.write().await;
    inner.sessions.insert(session.id, session.clone());

    tracing::info!(session_id = %session.id, "Session created");

    (StatusCode::CREATED, Json(session))
}

/// Get a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionContext>> {
    let mut inner = state.inner.write().await;
    let session = inner
        .sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(id))?;
    session.touch();

    Ok(Json(session.clone()))
}

/// End a session and forget its profile
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    inner
        .sessions
        .remove(&id)
        .ok_or_else(|| session_not_found(id))?;

    tracing::info!(session_id = %id, "Session deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Change language and/or theme
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SettingsRequest>,
) -> AppResult<Json<SessionContext>> {
    let mut inner = state.inner.write().await;
    let session = inner
        .sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(id))?;

    if let Some(language) = request.language {
        session.language = language;
    }
    if let Some(theme) = request.theme {
        session.theme = theme;
    }
    session.touch();

    Ok(Json(session.clone()))
}

/// Save the profile form, replacing any previous profile
pub async fn save_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<Json<SessionContext>> {
    let mut inner = state.inner.write().await;
    let session = inner
        .sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(id))?;

    let profile = UserProfile::new(&request.city, request.interests).map_err(|_| {
        AppError::InvalidInput(i18n::text(TextKey::CityRequired, session.language).to_string())
    })?;
    session.set_profile(profile);
    session.touch();

    tracing::info!(
        session_id = %id,
        city = %request.city.trim(),
        "Profile saved"
    );

    Ok(Json(session.clone()))
}

/// Run the recommendation pipeline for a session's profile
pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<PipelineOutcome>> {
    let (profile, language) = {
        let mut inner = state.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| session_not_found(id))?;
        session.touch();
        (session.profile.clone(), session.language)
    };

    let profile = profile.ok_or_else(|| {
        AppError::InvalidInput(i18n::text(TextKey::SetProfileFirst, language).to_string())
    })?;

    run_pipeline(&state, &request_id, profile, request.prompt, language).await
}

/// Run the pipeline without a session
pub async fn recommend_once(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<OneShotRequest>,
) -> AppResult<Json<PipelineOutcome>> {
    let profile = UserProfile::new(&request.city, request.interests).map_err(|_| {
        AppError::InvalidInput(i18n::text(TextKey::CityRequired, request.language).to_string())
    })?;

    run_pipeline(&state, &request_id, profile, request.prompt, request.language).await
}

async fn run_pipeline(
    state: &AppState,
    request_id: &RequestId,
    profile: UserProfile,
    prompt: String,
    language: Language,
) -> AppResult<Json<PipelineOutcome>> {
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::InvalidInput("Prompt cannot be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        city = %profile.city(),
        language = %language,
        "Processing recommendation request"
    );

    let outcome = state
        .pipeline
        .run(
            PipelineRequest {
                profile,
                prompt,
                language,
            },
            state.shutdown.child_token(),
        )
        .await;

    tracing::info!(
        request_id = %request_id,
        used_fallback = outcome.result.used_fallback,
        notices = outcome.notices.len(),
        "Recommendation completed"
    );

    Ok(Json(outcome))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}
