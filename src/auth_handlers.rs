use crate::errors::ApiError;
use crate::models::{IdentityClaim, LoginRequest, TokenResponse};
use crate::user_handlers::check_len;
use crate::AppState;
use actix_web::{post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

fn token_response(detail: &str, token: String, claim: IdentityClaim) -> HttpResponse {
    HttpResponse::Ok().json(TokenResponse {
        detail: detail.to_string(),
        token,
        role: claim.role,
        expiry: claim.expires_at,
        status: 200,
    })
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { username, password } = data.into_inner();
    check_len("username", &username, 1, 255)?;
    check_len("password", &password, 6, 255)?;

    // copy out what we need so the session is not held across bcrypt
    let (user_id, role, digest) = {
        let session = state.store.session().await;
        let user = session.user_by_username(&username).ok_or_else(|| {
            tracing::debug!(%username, "login for unknown username");
            ApiError::UsernameNotFound
        })?;
        (user.id, user.role, user.password.clone())
    };

    let hasher = state.passwords;
    let matched = web::block(move || hasher.matches(&password, &digest)).await?;
    if !matched {
        tracing::warn!(user_id, "login with wrong password");
        return Err(ApiError::WrongPassword);
    }

    let (token, claim) = state.tokens.issue(user_id, role)?;
    tracing::info!(user_id, %role, "login succeeded");
    Ok(token_response("Login Success", token, claim))
}

/// Re-issues a still-valid token with a fresh expiry. The role is carried
/// over from the presented token, not re-read from storage.
#[post("/refresh")]
pub async fn refresh(
    state: web::Data<AppState>,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, ApiError> {
    let credentials = credentials.ok_or(ApiError::MissingToken)?;
    let current = state.tokens.verify(credentials.token()).map_err(|err| {
        tracing::debug!(error = %err, "refresh rejected");
        ApiError::RefreshRejected
    })?;

    let (token, claim) = state.tokens.issue(current.user_id, current.role)?;
    tracing::info!(user_id = claim.user_id, "token refreshed");
    Ok(token_response("Token Refreshed", token, claim))
}
