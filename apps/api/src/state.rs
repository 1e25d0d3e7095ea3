use std::sync::Arc;

use crate::catalog::content::ArticleContentStore;
use crate::catalog::Catalog;
use crate::contact::service::EmailService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only afterwards.
    pub catalog: Arc<Catalog>,
    pub content: ArticleContentStore,
    pub email: Arc<EmailService>,
}
