//! Mapping of layer errors onto HTTP responses.
//!
//! Validation failures are 400, missing entities 404, state conflicts (a die already used,
//! a challenge already completed) 409. Bodies are `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{DicePoolError, RepositoryError, ValueObjectError},
    infrastructure::{dto::http::ErrorDto, hub::HubError},
    usecase::{
        CampaignError, ChallengeError, CharacterError, DicePoolUseCaseError, RecordRollError,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}: {}", self.status, self.message);
        } else {
            tracing::debug!("{}: {}", self.status, self.message);
        }
        (
            self.status,
            Json(ErrorDto {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn dice_pool_status(error: &DicePoolError) -> StatusCode {
    match error {
        DicePoolError::DieAlreadyUsed(_) => StatusCode::CONFLICT,
        DicePoolError::EmptyPool
        | DicePoolError::TooManyDice { .. }
        | DicePoolError::DieOutOfRange { .. } => StatusCode::BAD_REQUEST,
    }
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::CampaignNotFound(_)
        | RepositoryError::CharacterNotFound(_)
        | RepositoryError::NoCurrentPool(_)
        | RepositoryError::PoolNotFound(_)
        | RepositoryError::DieNotFound(_)
        | RepositoryError::ChallengeNotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::DicePool(error) => dice_pool_status(error),
        RepositoryError::ChallengeState(_) => StatusCode::CONFLICT,
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        Self::new(repository_status(&error), error.to_string())
    }
}

impl From<HubError> for ApiError {
    fn from(error: HubError) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, error.to_string())
    }
}

impl From<DicePoolUseCaseError> for ApiError {
    fn from(error: DicePoolUseCaseError) -> Self {
        match error {
            DicePoolUseCaseError::InvalidPool(error) => {
                Self::new(dice_pool_status(&error), error.to_string())
            }
            DicePoolUseCaseError::Repository(error) => error.into(),
        }
    }
}

impl From<RecordRollError> for ApiError {
    fn from(error: RecordRollError) -> Self {
        match error {
            RecordRollError::DieNotOwned { .. } | RecordRollError::ChallengeNotInCampaign { .. } => {
                Self::bad_request(error.to_string())
            }
            RecordRollError::Repository(error) => error.into(),
        }
    }
}

impl From<CampaignError> for ApiError {
    fn from(error: CampaignError) -> Self {
        match error {
            CampaignError::EmptyName => Self::bad_request(error.to_string()),
            CampaignError::Repository(error) => error.into(),
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(error: CharacterError) -> Self {
        match error {
            CharacterError::EmptyName | CharacterError::DailyDiceOutOfRange(_) => {
                Self::bad_request(error.to_string())
            }
            CharacterError::Repository(error) => error.into(),
        }
    }
}

impl From<ChallengeError> for ApiError {
    fn from(error: ChallengeError) -> Self {
        match error {
            ChallengeError::EmptyDescription => Self::bad_request(error.to_string()),
            ChallengeError::Repository(error) => error.into(),
        }
    }
}
