//! Page-level filter state for the blog and projects listings.
//!
//! Typing in the search box is debounced; facet toggles apply at once. The
//! visible list is always re-derived from the catalog, never cached.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use crate::catalog::filter::{filter_articles, filter_projects, ArticleFilters, ProjectFilters};
use crate::catalog::models::{Article, Project, ProjectStatus};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};

/// Snapshot of what the listing is currently filtered by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState<F> {
    #[serde(flatten)]
    pub filters: F,
    /// Query the visible list is derived from.
    pub search_query: String,
    /// Raw input that may still be waiting on the debounce.
    pub search_input: String,
}

pub struct CatalogView<F> {
    state: Arc<Mutex<FilterState<F>>>,
    search: Debouncer<()>,
}

pub type ArticleView = CatalogView<ArticleFilters>;
pub type ProjectView = CatalogView<ProjectFilters>;

impl<F> Clone for CatalogView<F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            search: self.search.clone(),
        }
    }
}

impl<F> Default for CatalogView<F>
where
    F: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F> CatalogView<F>
where
    F: Clone + Default + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FilterState::default())),
            search: Debouncer::new(delay),
        }
    }

    /// Records the input now and applies it as the query after the debounce
    /// delay. Needs a tokio runtime.
    pub fn set_search_query(&self, input: impl Into<String>) {
        let input = input.into();
        self.lock().search_input = input.clone();

        let shared = Arc::clone(&self.state);
        self.search.call((), move || {
            lock_state(&shared).search_query = input;
        });
    }

    /// Applies a facet change immediately.
    pub fn update_filters(&self, f: impl FnOnce(&mut F)) {
        f(&mut self.lock().filters);
    }

    /// Drops every facet and the search query, including a pending one.
    pub fn clear(&self) {
        self.search.cancel_all();
        *self.lock() = FilterState::default();
    }

    pub fn state(&self) -> FilterState<F> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, FilterState<F>> {
        lock_state(&self.state)
    }
}

fn lock_state<F>(state: &Mutex<FilterState<F>>) -> MutexGuard<'_, FilterState<F>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl CatalogView<ArticleFilters> {
    pub fn toggle_category(&self, category: &str) {
        self.update_filters(|f| toggle(&mut f.categories, category.to_string()));
    }

    pub fn toggle_tag(&self, tag: &str) {
        self.update_filters(|f| toggle(&mut f.tags, tag.to_string()));
    }

    pub fn toggle_featured(&self) {
        self.update_filters(|f| f.featured = !f.featured);
    }

    pub fn visible<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        let state = self.lock();
        filter_articles(articles, &state.search_query, &state.filters)
    }
}

impl CatalogView<ProjectFilters> {
    pub fn toggle_technology(&self, technology: &str) {
        self.update_filters(|f| toggle(&mut f.technologies, technology.to_string()));
    }

    pub fn toggle_category(&self, category: &str) {
        self.update_filters(|f| toggle(&mut f.categories, category.to_string()));
    }

    pub fn toggle_status(&self, status: ProjectStatus) {
        self.update_filters(|f| toggle(&mut f.statuses, status));
    }

    pub fn toggle_featured(&self) {
        self.update_filters(|f| f.featured = !f.featured);
    }

    pub fn visible<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let state = self.lock();
        filter_projects(projects, &state.search_query, &state.filters)
    }
}
