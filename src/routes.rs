// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, leaderboard, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, leaderboard, users, quiz).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (stores, question generator, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in));

    let leaderboard_routes = Router::new().route("/top", get(leaderboard::top_players));

    let user_routes = Router::new()
        .route("/me", get(leaderboard::get_me))
        .layer(auth.clone());

    let quiz_routes = Router::new()
        .route("/question", get(quiz::generate_question))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/finish", post(quiz::finish_quiz))
                .route("/result", get(quiz::get_result))
                .layer(auth),
        );

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/leaderboard", leaderboard_routes)
        .nest("/api/users", user_routes)
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
