pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applications::handlers as application_handlers;
use crate::compatibility::handlers as compatibility_handlers;
use crate::state::AppState;
use crate::swipes;
use crate::vacancies;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Vacancy search / reference data
        .route("/api/v1/vacancies", get(vacancies::handle_search_vacancies))
        .route("/api/v1/areas", get(vacancies::handle_list_areas))
        // Swipes
        .route("/api/v1/swipes", post(swipes::handle_record_swipe))
        // Application pipeline
        .route(
            "/api/v1/applications",
            post(application_handlers::handle_submit_application)
                .get(application_handlers::handle_list_applications),
        )
        .route(
            "/api/v1/applications/pending-count",
            get(application_handlers::handle_pending_count),
        )
        .route(
            "/api/v1/applications/:id",
            get(application_handlers::handle_get_application),
        )
        // Compatibility scoring
        .route(
            "/api/v1/compatibility",
            post(compatibility_handlers::handle_score_batch),
        )
        .with_state(state)
}
