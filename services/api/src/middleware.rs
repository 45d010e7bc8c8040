//! Authentication middleware for bearer token validation

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, resolved from a verified bearer token.
/// Public fields only; the password hash never leaves the repository
/// layer.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Authentication gate for protected routes: extract the bearer token,
/// verify it, and resolve the subject to a live user record. Every
/// failure mode collapses into the same generic 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_service.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    // A still-valid token for a deleted account must be rejected here.
    let user = state
        .user_repository
        .find_by_email(&claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to resolve token subject: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        username: user.username,
    });

    Ok(next.run(req).await)
}
