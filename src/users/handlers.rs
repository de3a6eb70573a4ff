use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateUserRequest, UserResponse};
use super::model::User;
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user).delete(delete_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

fn validate(payload: &mut CreateUserRequest) -> AppResult<()> {
    payload.first_name = payload.first_name.trim().to_string();
    payload.last_name = payload.last_name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.first_name.is_empty() || payload.last_name.is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::validation("Invalid email"));
    }
    if !USERNAME_LEN.contains(&payload.username.chars().count()) {
        return Err(AppError::validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        )));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }
    Ok(())
}

fn conflict_on_unique(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict("User"),
        _ => AppError::from(e),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(mut payload) = payload?;
    if let Err(e) = validate(&mut payload) {
        warn!(email = %payload.email, error = %e, "registration rejected");
        return Err(e);
    }

    let mut user = User::new(
        payload.first_name,
        payload.last_name,
        payload.email,
        payload.username,
        None,
    );
    user.set_password(Some(&payload.password))?;

    let mut session = state.db.session().await?;

    if User::find_by_email(session.conn(), &user.email)
        .await?
        .is_some()
    {
        warn!(email = %user.email, "email already registered");
        return Err(AppError::conflict("Email"));
    }
    if User::find_by_username(session.conn(), &user.username)
        .await?
        .is_some()
    {
        warn!(username = %user.username, "username already taken");
        return Err(AppError::conflict("Username"));
    }

    let user = user
        .insert(session.conn())
        .await
        .map_err(conflict_on_unique)?;
    session.commit().await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(id) = id?;
    let user = User::find_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let mut session = state.db.session().await?;
    if !User::delete(session.conn(), id).await? {
        return Err(AppError::not_found("User"));
    }
    session.commit().await?;
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
