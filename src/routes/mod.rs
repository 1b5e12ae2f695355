use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{cities, commands};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Chat platform webhook
    let command_routes = Router::new().route("/commands", post(commands::handle_message));

    let city_routes = Router::new()
        .route("/cities/{name}", get(cities::get_city))
        .route(
            "/users/{user_id}/cities",
            get(cities::list_user_cities).post(cities::save_user_city),
        )
        .route("/distance", get(cities::get_distance));

    Router::new()
        .nest("/api", command_routes.merge(city_routes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::test_state;

    async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_get_city() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(test_state(dir.path()).await);

        let (status, body) = send(router.clone(), Method::GET, "/api/cities/Jakarta", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "Jakarta", "lat": -6.2088, "lng": 106.8456 }));

        let (status, body) = send(router, Method::GET, "/api/cities/Atlantis", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "City Atlantis not found");
    }

    #[tokio::test]
    async fn test_user_cities() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(test_state(dir.path()).await);
        let uri = "/api/users/77/cities";

        let (status, _) = send(router.clone(), Method::POST, uri, Some(json!({ "city": "Paris" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(router.clone(), Method::POST, uri, Some(json!({ "city": "Paris" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(router.clone(), Method::POST, uri, Some(json!({ "city": "Atlantis" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router.clone(), Method::POST, uri, Some(json!({ "city": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Paris"]));
    }

    #[tokio::test]
    async fn test_distance() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(test_state(dir.path()).await);

        let (status, body) = send(
            router.clone(),
            Method::GET,
            "/api/distance?from=London&to=Jakarta",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let km = body["distance_km"].as_f64().unwrap();
        assert!(km > 11600.0 && km < 11800.0);

        let (status, _) = send(router, Method::GET, "/api/distance?from=London&to=Atlantis", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_commands_webhook() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(test_state(dir.path()).await);

        let message = json!({ "user_id": 5, "user_name": "budi", "content": "!remember_city Tokyo" });
        let (status, body) = send(router.clone(), Method::POST, "/api/commands", Some(message)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "City Tokyo has been saved!");
        assert_eq!(body["attachment"], Value::Null);

        let message = json!({ "user_id": 5, "user_name": "budi", "content": "!show_my_cities" });
        let (status, body) = send(router.clone(), Method::POST, "/api/commands", Some(message)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attachment"]["filename"], "my_cities_map.png");

        let message = json!({ "user_id": 5, "user_name": "budi", "content": "good morning" });
        let (status, _) = send(router, Method::POST, "/api/commands", Some(message)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
