//! Last-resort boundary: a panicking handler becomes a JSON 500 the front-end
//! can offer a retry for, instead of a dropped connection.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

pub const BOUNDARY_MESSAGE: &str = "An unexpected error occurred. Please try refreshing the page or contact support if the problem persists.";

pub fn with_error_boundary(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Request handler panicked: {detail}");

    let body = Json(json!({
        "error": {
            "code": "UNEXPECTED",
            "message": BOUNDARY_MESSAGE,
            "retry": true
        }
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn explode() -> &'static str {
        panic!("catalog index out of range")
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let router = with_error_boundary(Router::new().route("/boom", get(explode)));
        let response = router
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "UNEXPECTED");
        assert_eq!(body["error"]["retry"], true);
    }

    #[tokio::test]
    async fn test_healthy_routes_pass_through() {
        let router = with_error_boundary(Router::new().route("/ok", get(|| async { "fine" })));
        let response = router
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
