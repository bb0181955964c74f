use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use database::CatalogStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

/// Builds the JSON API router over the given state.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/venues", get(handlers::list_venues).post(handlers::create_venue))
        .route("/api/venues/search", post(handlers::search_venues))
        .route("/api/venues/:venue_id", get(handlers::show_venue))
        .route("/api/artists", get(handlers::list_artists).post(handlers::create_artist))
        .route("/api/artists/search", post(handlers::search_artists))
        .route("/api/artists/:artist_id", get(handlers::show_artist))
        .route("/api/shows", get(handlers::list_shows).post(handlers::create_show))
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request and its latency.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Serves the API until Ctrl-C. Tracing must already be initialized by the caller.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let backend = state.store.backend_tag();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, backend, "Web server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal.");
            }
            tracing::info!("Shutdown signal received.");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use database::{InMemoryStore, seed_demo};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn seeded() -> (Arc<InMemoryStore>, Router) {
        let store = Arc::new(InMemoryStore::new());
        seed_demo(store.as_ref(), Utc::now()).await.unwrap();
        let router = build_router(AppState::new(store.clone()));
        (store, router)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_, router) = seeded().await;
        let response = router.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn artist_search_is_case_insensitive() {
        let (_, router) = seeded().await;
        let (status, body) = send(
            router.clone(),
            post_form("/api/artists/search", "search_term=A"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["search_term"], "A");

        let (_, body) = send(router, post_form("/api/artists/search", "search_term=band")).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "The Wild Sax Band");
    }

    #[tokio::test]
    async fn venue_search_without_term_lists_everything() {
        let (_, router) = seeded().await;
        let (status, body) = send(router, post_form("/api/venues/search", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn venue_page_partitions_shows() {
        let (_, router) = seeded().await;
        // Park Square has one past show and two upcoming shows in the demo catalog.
        let (status, body) = send(router, get("/api/venues/3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Park Square Live Music & Coffee");
        assert_eq!(body["past_shows_count"], 1);
        assert_eq!(body["upcoming_shows_count"], 2);
        assert_eq!(body["past_shows"][0]["counterpart_name"], "Matt Quevedo");
    }

    #[tokio::test]
    async fn missing_venue_is_404() {
        let (_, router) = seeded().await;
        let (status, body) = send(router, get("/api/venues/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No venue with id 999");
    }

    #[tokio::test]
    async fn artist_page_lists_venues() {
        let (_, router) = seeded().await;
        let (status, body) = send(router, get("/api/artists/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["past_shows"][0]["counterpart_name"], "The Musical Hop");
        assert_eq!(
            body["upcoming_shows"][0]["counterpart_name"],
            "The Dueling Pianos Bar"
        );
    }

    #[tokio::test]
    async fn venue_index_groups_by_area() {
        let (_, router) = seeded().await;
        let (status, body) = send(router, get("/api/venues")).await;
        assert_eq!(status, StatusCode::OK);
        let areas = body.as_array().unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0]["state"], "CA");
        assert_eq!(areas[0]["venues"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn creating_a_venue_returns_201() {
        let (store, router) = seeded().await;
        let (status, body) = send(
            router,
            post_json(
                "/api/venues",
                json!({
                    "name": "The Blue Door",
                    "city": "Austin",
                    "state": "tx",
                    "address": "12 Congress Ave",
                    "genres": ["Blues"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 4);
        assert_eq!(body["state"], "TX");
        assert_eq!(store.list_venues().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn invalid_artist_is_400() {
        let (store, router) = seeded().await;
        let (status, body) = send(
            router,
            post_json(
                "/api/artists",
                json!({ "name": "  ", "city": "Austin", "state": "TX" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("name"));
        assert_eq!(store.list_artists().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn show_with_unknown_artist_is_400() {
        let (_, router) = seeded().await;
        let start = Utc::now() + Duration::days(3);
        let (status, body) = send(
            router,
            post_json(
                "/api/shows",
                json!({ "venue_id": 1, "artist_id": 99, "start_time": start }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Referenced artist 99 does not exist");
    }

    #[tokio::test]
    async fn created_show_appears_on_the_board() {
        let (_, router) = seeded().await;
        let start = Utc::now() + Duration::days(3);
        let (status, _) = send(
            router.clone(),
            post_json(
                "/api/shows",
                json!({ "venue_id": 2, "artist_id": 3, "start_time": start }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, board) = send(router, get("/api/shows")).await;
        let board = board.as_array().unwrap();
        assert_eq!(board.len(), 6);
        assert!(board.iter().any(|row| row["venue_name"] == "The Dueling Pianos Bar"
            && row["artist_name"] == "The Wild Sax Band"));
    }

    #[tokio::test]
    async fn store_outage_is_500() {
        let (store, router) = seeded().await;
        store.set_unavailable(true);
        let (status, body) = send(router, get("/api/artists")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal database error occurred");
    }
}
