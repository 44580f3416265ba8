// src/routes.rs

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, profile, progress, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, author_middleware},
};

/// Assembles the main application router.
///
/// * Learner routes (quiz, progress, profile) require a bearer token.
/// * Authoring routes additionally require the admin or instructor role.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let course_routes = Router::new()
        .route("/{course_id}/enroll", post(progress::enroll))
        .route("/{course_id}/progress", get(progress::get_course_progress))
        .route(
            "/{course_id}/modules/{module_id}/quiz",
            get(quiz::get_quiz),
        )
        .route(
            "/{course_id}/modules/{module_id}/attempts",
            get(quiz::get_attempt).post(quiz::submit_attempt),
        )
        .route(
            "/{course_id}/modules/{module_id}/attempts/preview",
            post(quiz::preview_attempt),
        )
        .route(
            "/{course_id}/modules/{module_id}/attempts/confirm",
            post(quiz::confirm_attempt),
        )
        .route(
            "/{course_id}/modules/{module_id}/complete",
            post(progress::complete_module),
        );

    let learner_routes = Router::new()
        .nest("/courses", course_routes)
        .route("/progress", get(progress::get_overall_progress))
        .route("/users/me", get(profile::get_me).put(profile::update_me))
        .route("/users/{user_id}", get(profile::get_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Auth first, then role check (layers run outside in)
    let admin_routes = Router::new()
        .route(
            "/courses/{course_id}",
            put(admin::put_course).get(admin::get_course),
        )
        .layer(middleware::from_fn(author_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .nest("/api", learner_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
