//! Application router configuration.

use std::any::Any;

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState, endpoints,
    health::get_hello,
    logging_middleware,
    not_found::get_404_not_found,
    response::ApiError,
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests from any origin are allowed. A handler that panics responds with
/// 500 and the panic message instead of dropping the connection.
pub fn build_router(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(
            endpoints::SETTINGS,
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route(endpoints::HELLO, get(get_hello))
        .fallback(get_404_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer)
        .with_state(state)
}

/// Add a span with the request method, URI and matched route to every request.
pub fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else {
        "unknown error"
    };

    tracing::error!("request handler panicked: {details}");

    ApiError::internal(format!("Server error: {details}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{HeaderValue, StatusCode, header},
        routing::get,
    };
    use axum_test::TestServer;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::handle_panic;
    use crate::{
        response::ErrorBody,
        test_utils::{get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server(get_test_state());

        let response = server.get("/api/budgets").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorBody>().error, "Not found");
    }

    #[tokio::test]
    async fn allows_any_origin() {
        let server = get_test_server(get_test_state());

        let response = server
            .get("/api/hello")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn panic_is_reported_as_server_error() {
        async fn explode() -> &'static str {
            panic!("kaboom")
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/explode").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<ErrorBody>().error, "Server error: kaboom");
    }
}
