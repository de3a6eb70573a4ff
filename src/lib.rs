//! calcapi: arithmetic over HTTP plus a user account store.
//!
//! - **calculator**: stateless add/subtract/multiply/divide/power and their routes
//! - **users**: the user record, its write-only password, repository and routes
//! - **db**: the pooled persistence handle and scoped sessions
//! - **app**: router assembly and the server loop
//! - **config**, **cli**, **error**, **state**: plumbing

pub mod app;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod users;

pub use error::{AppError, AppResult};
pub use state::AppState;
