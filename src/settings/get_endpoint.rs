use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    db::acquire,
    response::ApiError,
    settings::{Settings, SettingsState, get_settings},
};

/// A route handler that responds with the settings.
///
/// Responds with 404 Not Found if the settings row does not exist.
pub async fn get_settings_endpoint(State(state): State<SettingsState>) -> Response {
    let settings = acquire(&state.db_pool)
        .and_then(|connection| get_settings(&connection))
        .map(<[Settings; 1]>::try_from);

    match settings {
        Ok(Ok([settings])) => Json(settings).into_response(),
        Ok(Err(rows)) if rows.is_empty() => {
            ApiError::not_found("Settings not found").into_response()
        }
        Ok(Err(rows)) => {
            tracing::error!("expected one settings row, found {}", rows.len());
            ApiError::internal("Failed to fetch settings").into_response()
        }
        Err(error) => ApiError::from_db_error(&error, "Failed to fetch settings").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        response::ErrorBody,
        settings::Settings,
        test_utils::{get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn responds_with_settings() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::SETTINGS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Settings>(), Settings::default());
    }

    #[tokio::test]
    async fn monthly_budget_is_a_json_number() {
        let state = get_test_state();
        state
            .db_pool
            .get()
            .unwrap()
            .execute("UPDATE settings SET monthly_budget = 19.99", ())
            .unwrap();
        let server = get_test_server(state);

        let response = server.get(endpoints::SETTINGS).await;

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["monthly_budget"], serde_json::json!(19.99));
    }

    #[tokio::test]
    async fn missing_settings_row_is_not_found() {
        let state = get_test_state();
        state
            .db_pool
            .get()
            .unwrap()
            .execute("DELETE FROM settings", ())
            .unwrap();
        let server = get_test_server(state);

        let response = server.get(endpoints::SETTINGS).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorBody>().error, "Settings not found");
    }

    #[tokio::test]
    async fn query_failure_is_server_error() {
        let state = get_test_state();
        state
            .db_pool
            .get()
            .unwrap()
            .execute("DROP TABLE settings", ())
            .unwrap();
        let server = get_test_server(state);

        let response = server.get(endpoints::SETTINGS).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorBody>().error,
            "Failed to fetch settings"
        );
    }
}
