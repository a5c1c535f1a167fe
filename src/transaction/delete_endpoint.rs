use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    database_id::TransactionId,
    db::acquire,
    response::ApiError,
    transaction::{TransactionState, delete_transaction},
};

/// A route handler for deleting a transaction, responds with 204 No Content.
///
/// The transaction is not looked up first, deleting an ID that does not exist
/// also responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Response {
    let transaction_id = match transaction_id {
        Ok(Path(transaction_id)) => transaction_id,
        Err(rejection) => {
            tracing::warn!("invalid transaction ID: {rejection}");
            return ApiError::bad_request("Invalid transaction id").into_response();
        }
    };

    let outcome = acquire(&state.db_pool)
        .and_then(|connection| delete_transaction(transaction_id, &connection));

    match outcome {
        Ok(outcome) => {
            tracing::debug!(
                "deleted transaction {transaction_id}, {} row(s) affected",
                outcome.rows_affected
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}");
            ApiError::from_db_error(&error, "Failed to delete transaction").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        response::ErrorBody,
        test_utils::{get_test_server, get_test_state},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let server = get_test_server(get_test_state());
        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "expense",
                "category": "Rent",
                "amount": 1200,
                "date": "2024-02-01",
            }))
            .await
            .json::<Transaction>();

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, created.id))
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());
        let remaining = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>();
        assert!(remaining.iter().all(|transaction| transaction.id != created.id));
    }

    #[tokio::test]
    async fn deleting_missing_transaction_succeeds() {
        let server = get_test_server(get_test_state());

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, 987654))
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let server = get_test_server(get_test_state());

        let response = server.delete("/api/transactions/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "Invalid transaction id");
    }

    #[tokio::test]
    async fn delete_fails_when_table_is_missing() {
        let state = get_test_state();
        state
            .db_pool
            .get()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();
        let server = get_test_server(state);

        let response = server
            .delete(&format_endpoint(endpoints::TRANSACTION, 1))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorBody>().error,
            "Failed to delete transaction"
        );
    }
}
