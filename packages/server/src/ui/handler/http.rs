//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{
        Campaign, CampaignId, Challenge, ChallengeId, Character, CharacterId, CharacterUpdate,
        DicePool, DieId, PoolDie, RollRecord, UserId,
    },
    infrastructure::dto::{
        conversion::parse_id,
        http::{
            ConnectionCountDto, CreateCampaignRequest, CreateCharacterRequest,
            CreateChallengeRequest, CreateRollRequest, HealthDto, ManualPoolRequest,
            RollHistoryQuery, UpdateCharacterRequest,
        },
    },
    ui::{error::ApiError, state::AppState},
    usecase::{ChallengeDraft, CharacterProfile, RollRequest},
};

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

fn created<T>(value: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(value)))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

// ========================================
// Campaigns
// ========================================

pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Created<Campaign> {
    let Json(request) = payload?;
    let gm_user_id = UserId::new(request.gm_user_id)?;
    created(
        state
            .campaign_usecase
            .create(&request.name, gm_user_id)
            .await?,
    )
}

/// All campaigns, newest first
pub async fn list_campaigns(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Campaign>> {
    Ok(Json(state.campaign_usecase.list().await?))
}

pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<Campaign> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    Ok(Json(state.campaign_usecase.get(campaign_id).await?))
}

pub async fn increment_day(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<Campaign> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    Ok(Json(state.campaign_usecase.increment_day(campaign_id).await?))
}

/// Live connection count of the campaign's session room
pub async fn count_connections(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<ConnectionCountDto> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    let connections = state.hub.count_in_room(campaign_id).await?;
    Ok(Json(ConnectionCountDto {
        campaign_id: campaign_id.value(),
        connections,
    }))
}

// ========================================
// Characters
// ========================================

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> Created<Character> {
    let Json(request) = payload?;
    created(state.character_usecase.create(CharacterProfile::try_from(request)?).await?)
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<String>,
) -> ApiResult<Character> {
    let character_id: CharacterId = parse_id(&character_id)?;
    Ok(Json(state.character_usecase.get(character_id).await?))
}

/// Replace a character's name, skill and weakness
pub async fn update_character(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<String>,
    payload: Result<Json<UpdateCharacterRequest>, JsonRejection>,
) -> ApiResult<Character> {
    let character_id: CharacterId = parse_id(&character_id)?;
    let Json(request) = payload?;
    Ok(Json(
        state
            .character_usecase
            .update(character_id, CharacterUpdate::from(request))
            .await?,
    ))
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<Vec<Character>> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    Ok(Json(state.character_usecase.list(campaign_id).await?))
}

// ========================================
// Dice pools
// ========================================

pub async fn roll_pool(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<String>,
) -> Created<DicePool> {
    let character_id: CharacterId = parse_id(&character_id)?;
    created(state.dice_pool_usecase.roll_random(character_id).await?)
}

pub async fn roll_manual_pool(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<String>,
    payload: Result<Json<ManualPoolRequest>, JsonRejection>,
) -> Created<DicePool> {
    let character_id: CharacterId = parse_id(&character_id)?;
    let Json(request) = payload?;
    created(
        state
            .dice_pool_usecase
            .roll_manual(character_id, &request.dice_results)
            .await?,
    )
}

pub async fn get_current_pool(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<String>,
) -> ApiResult<DicePool> {
    let character_id: CharacterId = parse_id(&character_id)?;
    Ok(Json(state.dice_pool_usecase.current_pool(character_id).await?))
}

pub async fn use_die(
    State(state): State<Arc<AppState>>,
    Path(die_id): Path<String>,
) -> ApiResult<PoolDie> {
    let die_id: DieId = parse_id(&die_id)?;
    Ok(Json(state.dice_pool_usecase.use_die(die_id).await?))
}

// ========================================
// Rolls
// ========================================

pub async fn record_roll(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRollRequest>, JsonRejection>,
) -> Created<RollRecord> {
    let Json(request) = payload?;
    created(state.record_roll_usecase.execute(RollRequest::try_from(request)?).await?)
}

pub async fn roll_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RollHistoryQuery>,
) -> ApiResult<Vec<RollRecord>> {
    let scope = query.scope()?.ok_or_else(|| {
        ApiError::bad_request("character_id or campaign_id query parameter required")
    })?;
    Ok(Json(state.record_roll_usecase.history(scope).await?))
}

// ========================================
// Challenges
// ========================================

pub async fn create_challenge(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateChallengeRequest>, JsonRejection>,
) -> Created<Challenge> {
    let Json(request) = payload?;
    created(state.challenge_usecase.create(ChallengeDraft::try_from(request)?).await?)
}

pub async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Path(challenge_id): Path<String>,
) -> ApiResult<Challenge> {
    let challenge_id: ChallengeId = parse_id(&challenge_id)?;
    Ok(Json(state.challenge_usecase.complete(challenge_id).await?))
}

pub async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<Vec<Challenge>> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    Ok(Json(state.challenge_usecase.list(campaign_id).await?))
}
