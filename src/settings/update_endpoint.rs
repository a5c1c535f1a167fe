//! Defines the endpoint for partially updating the settings.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    amount::parse_amount,
    db::acquire,
    response::{ApiError, message_response},
    settings::{Settings, SettingsState, SettingsUpdate, get_settings, update_settings},
};

/// The JSON body for updating the settings, any subset of the fields may be
/// given. Unknown fields are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SettingsRequest {
    /// The new username.
    pub username: Option<String>,
    /// The new currency symbol.
    pub currency_symbol: Option<String>,
    /// A JSON number or a string holding a number.
    pub monthly_budget: Option<Value>,
}

/// The monthly budget in a [SettingsRequest] was not a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid budget amount")]
pub struct InvalidBudget;

impl TryFrom<SettingsRequest> for SettingsUpdate {
    type Error = InvalidBudget;

    fn try_from(request: SettingsRequest) -> Result<Self, Self::Error> {
        let monthly_budget = match request.monthly_budget {
            Some(budget) => Some(parse_amount(&budget).ok_or(InvalidBudget)?),
            None => None,
        };

        Ok(SettingsUpdate {
            username: request.username,
            currency_symbol: request.currency_symbol,
            monthly_budget,
        })
    }
}

/// The fields of [SettingsRequest], none of which may be `null`.
const SETTINGS_FIELDS: [&str; 3] = ["username", "currency_symbol", "monthly_budget"];

const UPDATED_WITHOUT_DETAILS: &str = "Settings updated but couldn't retrieve details";

/// A route handler for updating some or all of the settings.
///
/// Responds with the updated settings. If the update succeeded but the
/// settings cannot be read back, responds with a message instead.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) if !body.is_empty() => body,
        Ok(_) => return ApiError::bad_request("Missing data").into_response(),
        Err(rejection) => {
            tracing::warn!("could not parse settings request: {rejection}");
            return ApiError::bad_request("Missing data").into_response();
        }
    };

    if SETTINGS_FIELDS
        .iter()
        .any(|field| body.get(*field).is_some_and(Value::is_null))
    {
        tracing::warn!("settings request sets a field to null");
        return ApiError::bad_request("Invalid settings data").into_response();
    }

    let request = match serde_json::from_value::<SettingsRequest>(Value::Object(body)) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!("invalid settings request: {error}");
            return ApiError::bad_request("Invalid settings data").into_response();
        }
    };

    let update = match SettingsUpdate::try_from(request) {
        Ok(update) => update,
        Err(error) => return ApiError::bad_request(error.to_string()).into_response(),
    };

    if update.is_empty() {
        return ApiError::bad_request("No valid fields to update").into_response();
    }

    let connection = match acquire(&state.db_pool) {
        Ok(connection) => connection,
        Err(error) => {
            return ApiError::from_db_error(&error, "Failed to update settings").into_response();
        }
    };

    if let Err(error) = update_settings(&update, &connection) {
        return ApiError::from_db_error(&error, "Failed to update settings").into_response();
    }

    match get_settings(&connection).map(<[Settings; 1]>::try_from) {
        Ok(Ok([settings])) => Json(settings).into_response(),
        Ok(Err(rows)) => {
            tracing::warn!("expected one settings row, found {}", rows.len());
            message_response(StatusCode::OK, UPDATED_WITHOUT_DETAILS)
        }
        Err(error) => {
            tracing::warn!("could not read back settings: {error}");
            message_response(StatusCode::OK, UPDATED_WITHOUT_DETAILS)
        }
    }
}
