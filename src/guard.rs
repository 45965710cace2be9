//! Per-request access decisions.
//!
//! Handlers take an [`Authenticated`] argument to require a valid token, then
//! call [`require_role`] or [`require_owner`] before touching any record.

use crate::auth::TokenCodec;
use crate::errors::ApiError;
use crate::models::{IdentityClaim, Role};
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::{ready, Ready};

pub fn authenticate(tokens: &TokenCodec, token: &str) -> Result<IdentityClaim, ApiError> {
    tokens.verify(token).map_err(ApiError::from)
}

/// Exact match; no role implies another.
pub fn authorize(claim: &IdentityClaim, required: Role) -> bool {
    claim.role == required
}

pub fn authorize_ownership(claim: &IdentityClaim, owner_id: i64) -> bool {
    claim.user_id == owner_id
}

pub fn require_role(claim: &IdentityClaim, required: Role) -> Result<(), ApiError> {
    if authorize(claim, required) {
        Ok(())
    } else {
        tracing::warn!(user_id = claim.user_id, role = %claim.role, %required, "role mismatch");
        Err(ApiError::RoleMismatch(required))
    }
}

pub fn require_owner(claim: &IdentityClaim, owner_id: i64, resource: &'static str) -> Result<(), ApiError> {
    if authorize_ownership(claim, owner_id) {
        Ok(())
    } else {
        tracing::warn!(user_id = claim.user_id, owner_id, resource, "ownership mismatch");
        Err(ApiError::OwnershipMismatch(resource))
    }
}

/// Verified identity of the caller, read from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub IdentityClaim);

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<Authenticated, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(ApiError::Internal("application state not configured"))?;
    let header = Authorization::<Bearer>::parse(req).map_err(|_| ApiError::MissingToken)?;
    let bearer = header.into_scheme();

    authenticate(&state.tokens, bearer.token()).map(Authenticated)
}
