use crate::auth::TokenError;
use crate::models::{DetailResponse, Role};
use actix_web::http::StatusCode;
use actix_web::{error::BlockingError, HttpResponse, ResponseError};
use thiserror::Error;

/// Every failure a handler can answer with. Rendered as `{detail, status}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication token missing")]
    MissingToken,

    #[error("Invalid token")]
    MalformedToken,

    #[error("Token expired")]
    ExpiredToken,

    /// Refresh answers any token failure with 403.
    #[error("Invalid Token")]
    RefreshRejected,

    #[error("Only a {0} can perform this action")]
    RoleMismatch(Role),

    #[error("Not allowed to modify this {0}")]
    OwnershipMismatch(&'static str),

    #[error("Username not found")]
    UsernameNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Username exists")]
    UsernameExists,

    #[error("Username not available")]
    UsernameNotAvailable,

    #[error("{0}")]
    Validation(String),

    #[error("password hashing failed")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("token signing failed")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("background task failed")]
    Blocking(#[from] BlockingError),

    #[error("{0}")]
    Internal(&'static str),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => ApiError::MalformedToken,
            TokenError::Expired => ApiError::ExpiredToken,
        }
    }
}

impl ApiError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Hashing(_) | ApiError::Signing(_) | ApiError::Blocking(_) | ApiError::Internal(_)
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken
            | ApiError::MalformedToken
            | ApiError::ExpiredToken
            | ApiError::RoleMismatch(_)
            | ApiError::OwnershipMismatch(_) => StatusCode::UNAUTHORIZED,
            ApiError::RefreshRejected => StatusCode::FORBIDDEN,
            ApiError::UsernameNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::WrongPassword => StatusCode::BAD_REQUEST,
            ApiError::UsernameExists | ApiError::UsernameNotAvailable => StatusCode::NOT_ACCEPTABLE,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Hashing(_) | ApiError::Signing(_) | ApiError::Blocking(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = if self.is_internal() {
            tracing::error!(error = %self, source = ?std::error::Error::source(self), "internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(DetailResponse {
            detail,
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn statuses_follow_http_semantics() {
        assert_eq!(ApiError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::RoleMismatch(Role::Admin).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::RefreshRejected.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::UsernameNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::WrongPassword.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UsernameExists.status_code(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn token_errors_map_to_unauthorized_variants() {
        assert!(matches!(ApiError::from(TokenError::Expired), ApiError::ExpiredToken));
        assert!(matches!(ApiError::from(TokenError::Malformed), ApiError::MalformedToken));
    }

    #[actix_web::test]
    async fn envelope_carries_detail_and_status() {
        let resp = ApiError::RoleMismatch(Role::Recruiter).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let envelope: DetailResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.detail, "Only a recruiter can perform this action");
        assert_eq!(envelope.status, 401);
    }

    #[actix_web::test]
    async fn internal_details_are_not_leaked() {
        let resp = ApiError::Internal("store poisoned").error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let envelope: DetailResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.detail, "Internal server error");
        assert_eq!(envelope.status, 500);
    }
}
