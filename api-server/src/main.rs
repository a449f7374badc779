use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use cube_solver::{Solver, SolverConfig};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

mod handlers;
mod models;
mod sessions;

use handlers::{
    classify, create_session, cycle_sticker, delete_session, encode_cube, get_session,
    reset_session, set_sticker, solve, solve_session, validate_cube, AppState,
};
use sessions::SessionStore;

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/stickers", put(set_sticker))
        .route("/api/sessions/{id}/stickers/cycle", post(cycle_sticker))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .route("/api/sessions/{id}/solve", post(solve_session))
        .route("/api/solve", post(solve))
        .route("/api/validate", post(validate_cube))
        .route("/api/encode", post(encode_cube))
        .route("/api/classify", post(classify))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = SolverConfig::from_env().expect("Invalid solver configuration");
    let solver = Solver::from_config(&config).expect("Failed to create HTTP client");

    let origin = env::var("CUBE_API_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let cors = CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>().expect("Invalid CUBE_API_CORS_ORIGIN"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let state = AppState {
        sessions: SessionStore::new(),
        solver: Arc::new(solver),
    };
    let app = build_router(state).layer(cors);

    let addr: SocketAddr = env::var("CUBE_API_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("Invalid CUBE_API_ADDR");

    info!(endpoints = ?config.endpoints, timeout = ?config.timeout, "solver configured");
    println!("Cube solver API server running on http://{}", addr);
    println!("Available endpoints:");
    println!("  POST   /api/sessions                   - Start a cube with only the centers set");
    println!("  GET    /api/sessions/{{id}}              - Cube, validation and facelets");
    println!("  PUT    /api/sessions/{{id}}/stickers     - Set or clear one sticker");
    println!("  POST   /api/sessions/{{id}}/stickers/cycle - Cycle one sticker to the next color");
    println!("  POST   /api/sessions/{{id}}/reset        - Back to centers only");
    println!("  POST   /api/sessions/{{id}}/solve        - Validate and solve the session cube");
    println!("  POST   /api/solve, /api/validate, /api/encode - Same for a posted color string");
    println!("  POST   /api/classify                   - Classify an RGB sample");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
