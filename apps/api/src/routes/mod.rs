pub mod boundary;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::contact::handlers as contact;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Articles
        .route("/api/v1/articles", get(catalog::handle_list_articles))
        .route("/api/v1/articles/facets", get(catalog::handle_article_facets))
        .route("/api/v1/articles/:id", get(catalog::handle_get_article))
        .route(
            "/api/v1/articles/:id/content",
            get(catalog::handle_get_article_content),
        )
        // Projects
        .route("/api/v1/projects", get(catalog::handle_list_projects))
        .route("/api/v1/projects/facets", get(catalog::handle_project_facets))
        .route("/api/v1/projects/:id", get(catalog::handle_get_project))
        // Contact
        .route("/api/v1/contact", post(contact::handle_submit_contact))
        .route(
            "/api/v1/contact/validate",
            post(contact::handle_validate_fields),
        )
        .route("/api/v1/contact/methods", get(contact::handle_contact_methods))
        .with_state(state);

    boundary::with_error_boundary(router)
}
