use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    db::acquire,
    response::ApiError,
    transaction::{TransactionState, list_transactions},
};

/// A route handler that responds with every transaction as a JSON array.
pub async fn list_transactions_endpoint(State(state): State<TransactionState>) -> Response {
    let transactions =
        acquire(&state.db_pool).and_then(|connection| list_transactions(&connection));

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => {
            ApiError::from_db_error(&error, "Failed to fetch transactions").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        response::ErrorBody,
        test_utils::{get_test_server, get_test_state},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn empty_database_lists_no_transactions() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn lists_created_transaction() {
        let server = get_test_server(get_test_state());
        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "income",
                "category": "Salary",
                "amount": 3000,
                "date": "2024-01-31",
                "note": "January",
            }))
            .await
            .json::<Transaction>();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(transactions, vec![created]);
    }

    #[tokio::test]
    async fn lists_most_recent_date_first() {
        let server = get_test_server(get_test_state());
        for date in ["2024-01-01", "2024-01-03", "2024-01-02"] {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&json!({
                    "type": "expense",
                    "category": "Food",
                    "amount": 10,
                    "date": date,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::TRANSACTIONS).await;

        let dates: Vec<_> = response
            .json::<Vec<serde_json::Value>>()
            .into_iter()
            .map(|transaction| transaction["transaction_date"].clone())
            .collect();
        assert_eq!(
            dates,
            vec![json!("2024-01-03"), json!("2024-01-02"), json!("2024-01-01")]
        );
    }

    #[tokio::test]
    async fn list_fails_when_table_is_missing() {
        let state = get_test_state();
        state
            .db_pool
            .get()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();
        let server = get_test_server(state);

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorBody>().error,
            "Failed to fetch transactions"
        );
    }
}
