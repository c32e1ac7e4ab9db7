pub mod auth;
pub mod health;
pub mod progress;
pub mod routines;
pub mod validation;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::constants::API_V1_PREFIX;
use crate::AppState;

pub use health::{health_check, root};
pub use validation::ValidatedJson;

/// Build the application router with every endpoint mounted
///
/// Cross-cutting layers (CORS, tracing) are added by the caller.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/logout", post(auth::logout));

    let routine_routes = Router::new()
        .route("/", post(routines::create_routine).get(routines::list_routines))
        .route(
            "/:id",
            get(routines::get_routine)
                .put(routines::update_routine)
                .delete(routines::delete_routine),
        )
        .route("/:id/activate", post(routines::activate_routine));

    let progress_routes = Router::new()
        .route("/", post(progress::create_progress))
        .route("/history", get(progress::history))
        .route("/stats", get(progress::progress_stats))
        .route("/routine/:id", get(progress::for_routine))
        .route("/yogasana/:id", get(progress::for_yogasana))
        .route(
            "/:id",
            put(progress::update_progress).delete(progress::delete_progress),
        );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/routines", routine_routes)
        .nest("/progress", progress_routes);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest(API_V1_PREFIX, api)
        .with_state(state)
}
