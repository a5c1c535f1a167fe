//! Defines the endpoint for creating a new transaction.

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
    row::parse_iso_date,
    transaction::{
        InvalidTransactionKind, NewTransaction, Transaction, TransactionKind, TransactionState,
        create_transaction, get_transactions_by_id,
    },
};

/// The JSON body for creating a transaction.
///
/// Every field is optional here so that a missing field can be reported as
/// a validation error rather than a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionRequest {
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// What the money was for.
    pub category: Option<String>,
    /// A JSON number or a string holding a number.
    pub amount: Option<Value>,
    /// An ISO-8601 date string, anything from the first 'T' on is ignored.
    pub date: Option<Value>,
    /// Free-form text.
    pub note: Option<String>,
}

/// Why a [TransactionRequest] could not become a [NewTransaction].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransactionRequestError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid transaction data")]
    InvalidData,

    #[error("Invalid amount or date format")]
    InvalidAmountOrDate,

    #[error("Invalid transaction type")]
    InvalidKind(#[from] InvalidTransactionKind),
}

impl TryFrom<TransactionRequest> for NewTransaction {
    type Error = TransactionRequestError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        let (Some(kind), Some(category), Some(amount), Some(date)) =
            (request.kind, request.category, request.amount, request.date)
        else {
            return Err(TransactionRequestError::MissingFields);
        };

        let date = date
            .as_str()
            .ok_or(TransactionRequestError::InvalidAmountOrDate)?;
        let day = date.split_once('T').map_or(date, |(day, _)| day);
        let transaction_date =
            parse_iso_date(day).map_err(|_| TransactionRequestError::InvalidAmountOrDate)?;
        let amount = parse_amount(&amount).ok_or(TransactionRequestError::InvalidAmountOrDate)?;
        let kind = kind.parse::<TransactionKind>()?;

        Ok(NewTransaction {
            kind,
            category,
            amount,
            note: request.note,
            transaction_date,
        })
    }
}

const CREATED_WITHOUT_DETAILS: &str = "Transaction added but couldn't retrieve details";

/// A route handler for creating a new transaction.
///
/// Responds with the stored transaction and 201 Created. If the transaction
/// was stored but cannot be read back, the response is still 201 Created but
/// carries a message instead of the transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!("could not parse transaction request: {rejection}");
            return ApiError::bad_request(TransactionRequestError::MissingFields.to_string())
                .into_response();
        }
    };

    let request = match serde_json::from_value::<TransactionRequest>(Value::Object(body)) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!("invalid transaction request: {error}");
            return ApiError::bad_request(TransactionRequestError::InvalidData.to_string())
                .into_response();
        }
    };

    let transaction = match NewTransaction::try_from(request) {
        Ok(transaction) => transaction,
        Err(error) => return ApiError::bad_request(error.to_string()).into_response(),
    };

    let connection = match acquire(&state.db_pool) {
        Ok(connection) => connection,
        Err(error) => {
            return ApiError::from_db_error(&error, "Failed to add transaction").into_response();
        }
    };

    let outcome = match create_transaction(&transaction, &connection) {
        Ok(outcome) => outcome,
        Err(error) => {
            return ApiError::from_db_error(&error, "Failed to add transaction").into_response();
        }
    };

    let Some(id) = outcome.last_insert_id else {
        tracing::warn!("transaction was inserted but no row ID was returned");
        return message_response(StatusCode::CREATED, CREATED_WITHOUT_DETAILS);
    };

    match get_transactions_by_id(id, &connection).map(<[Transaction; 1]>::try_from) {
        Ok(Ok([transaction])) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Ok(Err(transactions)) => {
            tracing::warn!(
                "expected one transaction with ID {id}, found {}",
                transactions.len()
            );
            message_response(StatusCode::CREATED, CREATED_WITHOUT_DETAILS)
        }
        Err(error) => {
            tracing::warn!("could not read back transaction {id}: {error}");
            message_response(StatusCode::CREATED, CREATED_WITHOUT_DETAILS)
        }
    }
}
