//! The user's settings: a single row holding the username, currency symbol
//! and monthly budget, with route handlers for reading and partially
//! updating it.

mod core;
mod get_endpoint;
mod update_endpoint;

pub use core::{
    SETTINGS_ID, Settings, SettingsUpdate, create_settings_table, get_settings, seed_settings,
    update_settings,
};
pub use get_endpoint::get_settings_endpoint;
pub use update_endpoint::{SettingsRequest, update_settings_endpoint};

use axum::extract::FromRef;

use crate::{AppState, db::DbPool};

/// The state needed by the settings route handlers.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The pool to check database connections out of.
    pub db_pool: DbPool,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}
