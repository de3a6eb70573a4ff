use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod model;
pub mod password;
pub mod repo;

pub use model::User;
pub use password::UserError;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
