//! Account API endpoints
//!
//! Signup and login for paper-trading accounts. Responses carry sanitized
//! projections only; the credential hash never leaves the services.

use axum::{Router, extract::State, http::StatusCode, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::{AccountRole, Transaction};
use crate::infrastructure::account::{AuthenticatedAccount, ProvisionedAccount};

/// Create the account router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Signup request.
///
/// Fields default to empty strings so a missing field reaches the service's
/// presence validation instead of being rejected by the deserializer; both
/// shapes produce the same 400 response.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup response: identifiers plus the freshly defaulted ledger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub money: Decimal,
    pub present_money: Decimal,
    pub profit: Decimal,
    pub transactions: Vec<Transaction>,
}

impl From<ProvisionedAccount> for SignupResponse {
    fn from(account: ProvisionedAccount) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
            username: account.username,
            money: account.money,
            present_money: account.present_money,
            profit: account.profit,
            transactions: account.transactions,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: AccountRole,
    pub is_verified: bool,
}

impl From<AuthenticatedAccount> for LoginResponse {
    fn from(account: AuthenticatedAccount) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
            username: account.username,
            role: account.role,
            is_verified: account.is_verified,
        }
    }
}

/// Create a new account
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let account = state
        .provisioning_service
        .signup(&request.username, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Verify credentials and return the account projection
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .authentication_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(account.into()))
}
