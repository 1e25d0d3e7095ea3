//! Catalog filtering: pure functions over the static article and project lists.
//!
//! Facets combine with AND; values inside one facet combine with OR. The
//! free-text query is a case-insensitive substring match over the item's
//! searchable text. Both catalogs come back newest first; ties keep catalog
//! order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::models::{Article, Project, ProjectStatus};

// ────────────────────────────────────────────────────────────────────────────
// Filter state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleFilters {
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub featured: bool,
}

impl ArticleFilters {
    pub fn is_active(&self) -> bool {
        !self.categories.is_empty() || !self.tags.is_empty() || self.featured
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFilters {
    pub technologies: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub statuses: BTreeSet<ProjectStatus>,
    pub featured: bool,
}

impl ProjectFilters {
    pub fn is_active(&self) -> bool {
        !self.technologies.is_empty()
            || !self.categories.is_empty()
            || !self.statuses.is_empty()
            || self.featured
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filtering
// ────────────────────────────────────────────────────────────────────────────

fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (!q.is_empty()).then_some(q)
}

fn matches_query<'a>(parts: impl IntoIterator<Item = &'a str>, query: &str) -> bool {
    parts
        .into_iter()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .contains(query)
}

fn any_shared(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}

fn member_of<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

pub fn article_matches(article: &Article, query: Option<&str>, filters: &ArticleFilters) -> bool {
    if let Some(q) = query {
        let parts = [
            article.title.as_str(),
            article.excerpt.as_str(),
            article.author.as_str(),
        ]
        .into_iter()
        .chain(article.tags.iter().map(String::as_str));
        if !matches_query(parts, q) {
            return false;
        }
    }

    member_of(&filters.categories, &article.category)
        && any_shared(&filters.tags, &article.tags)
        && (!filters.featured || article.featured)
}

pub fn project_matches(project: &Project, query: Option<&str>, filters: &ProjectFilters) -> bool {
    if let Some(q) = query {
        let parts = [project.title.as_str(), project.description.as_str()]
            .into_iter()
            .chain(project.technologies.iter().map(String::as_str));
        if !matches_query(parts, q) {
            return false;
        }
    }

    any_shared(&filters.technologies, &project.technologies)
        && member_of(&filters.categories, &project.category)
        && member_of(&filters.statuses, &project.status)
        && (!filters.featured || project.featured)
}

/// Visible articles, newest `published_date` first.
pub fn filter_articles<'a>(
    articles: &'a [Article],
    query: &str,
    filters: &ArticleFilters,
) -> Vec<&'a Article> {
    let query = normalize_query(query);
    let mut visible: Vec<&Article> = articles
        .iter()
        .filter(|a| article_matches(a, query.as_deref(), filters))
        .collect();
    visible.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    visible
}

/// Visible projects, newest `completed_date` first, undated projects last.
pub fn filter_projects<'a>(
    projects: &'a [Project],
    query: &str,
    filters: &ProjectFilters,
) -> Vec<&'a Project> {
    let query = normalize_query(query);
    let mut visible: Vec<&Project> = projects
        .iter()
        .filter(|p| project_matches(p, query.as_deref(), filters))
        .collect();
    // None < Some, so a descending sort leaves undated projects at the end.
    visible.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));
    visible
}

// ────────────────────────────────────────────────────────────────────────────
// Facets and navigation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleFacets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFacets {
    pub technologies: Vec<String>,
    pub categories: Vec<String>,
    pub statuses: Vec<ProjectStatus>,
}

fn non_empty_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct facet values present in the catalog, sorted.
pub fn available_article_facets(articles: &[Article]) -> ArticleFacets {
    ArticleFacets {
        categories: non_empty_sorted(articles.iter().map(|a| &a.category)),
        tags: non_empty_sorted(articles.iter().flat_map(|a| a.tags.iter())),
        authors: non_empty_sorted(articles.iter().map(|a| &a.author)),
    }
}

/// Statuses are ordered by their wire name, like the other facets.
pub fn available_project_facets(projects: &[Project]) -> ProjectFacets {
    let mut statuses: Vec<ProjectStatus> = projects
        .iter()
        .map(|p| p.status)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    statuses.sort_by_key(|status| status.as_str());

    ProjectFacets {
        technologies: non_empty_sorted(projects.iter().flat_map(|p| p.technologies.iter())),
        categories: non_empty_sorted(projects.iter().map(|p| &p.category)),
        statuses,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdjacentArticles<'a> {
    /// Newer neighbour.
    pub prev: Option<&'a Article>,
    /// Older neighbour.
    pub next: Option<&'a Article>,
}

/// Neighbours of `id` in the full catalog ordered newest first.
pub fn adjacent_articles<'a>(articles: &'a [Article], id: &str) -> AdjacentArticles<'a> {
    let ordered = filter_articles(articles, "", &ArticleFilters::default());
    match ordered.iter().position(|a| a.id == id) {
        Some(index) => AdjacentArticles {
            prev: index.checked_sub(1).map(|i| ordered[i]),
            next: ordered.get(index + 1).copied(),
        },
        None => AdjacentArticles::default(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn article_ids(items: &[&Article]) -> Vec<String> {
        items.iter().map(|a| a.id.clone()).collect()
    }

    fn project_ids(items: &[&Project]) -> Vec<String> {
        items.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_no_filters_returns_all_newest_first() {
        let catalog = articles();
        let visible = filter_articles(&catalog, "", &ArticleFilters::default());
        assert_eq!(article_ids(&visible), vec!["mar", "feb", "jan"]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_tags() {
        let catalog = articles();
        let visible = filter_articles(&catalog, "vue", &ArticleFilters::default());
        assert_eq!(article_ids(&visible), vec!["feb"]);

        let visible = filter_articles(&catalog, "  JAVASCRIPT ", &ArticleFilters::default());
        assert_eq!(article_ids(&visible), vec!["jan"]);
    }

    #[test]
    fn test_query_matches_author_and_excerpt() {
        let catalog = articles();
        assert_eq!(filter_articles(&catalog, "test author", &ArticleFilters::default()).len(), 3);
        assert_eq!(
            article_ids(&filter_articles(&catalog, "excerpt for mar", &ArticleFilters::default())),
            vec!["mar"]
        );
    }

    #[test]
    fn test_categories_or_within_facet() {
        let catalog = articles();
        let filters = ArticleFilters {
            categories: ["tutorial", "tips"].map(String::from).into(),
            ..Default::default()
        };
        assert_eq!(article_ids(&filter_articles(&catalog, "", &filters)), vec!["mar", "jan"]);
    }

    #[test]
    fn test_facets_and_across() {
        let catalog = articles();
        let filters = ArticleFilters {
            categories: ["tutorial", "tips"].map(String::from).into(),
            tags: ["Design", "Vue"].map(String::from).into(),
            featured: false,
        };
        assert_eq!(article_ids(&filter_articles(&catalog, "", &filters)), vec!["mar"]);
    }

    #[test]
    fn test_featured_only() {
        let catalog = articles();
        let filters = ArticleFilters {
            featured: true,
            ..Default::default()
        };
        assert_eq!(article_ids(&filter_articles(&catalog, "", &filters)), vec!["jan"]);
        assert!(filters.is_active());
        assert!(!ArticleFilters::default().is_active());
    }

    #[test]
    fn test_filtering_is_idempotent_and_pure() {
        let catalog = articles();
        let before = catalog.clone();
        let filters = ArticleFilters {
            tags: ["React", "CSS"].map(String::from).into(),
            ..Default::default()
        };
        let first = filter_articles(&catalog, "article", &filters);
        let second = filter_articles(&catalog, "article", &filters);
        assert_eq!(first, second);
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_projects_sorted_newest_first_undated_last() {
        let catalog = projects();
        let visible = filter_projects(&catalog, "", &ProjectFilters::default());
        assert_eq!(project_ids(&visible), vec!["new", "old", "wip"]);
    }

    #[test]
    fn test_project_facets() {
        let catalog = projects();
        let filters = ProjectFilters {
            technologies: ["Rust", "CSS"].map(String::from).into(),
            statuses: [ProjectStatus::InProgress].into(),
            ..Default::default()
        };
        assert_eq!(project_ids(&filter_projects(&catalog, "", &filters)), vec!["wip"]);
    }

    #[test]
    fn test_project_query() {
        let catalog = projects();
        let visible = filter_projects(&catalog, "typescript", &ProjectFilters::default());
        assert_eq!(project_ids(&visible), vec!["new"]);
    }

    #[test]
    fn test_available_facets_sorted_and_distinct() {
        let facets = available_article_facets(&articles());
        assert_eq!(facets.categories, vec!["insights", "tips", "tutorial"]);
        assert_eq!(facets.authors, vec!["Test Author"]);
        assert_eq!(facets.tags.first().map(String::as_str), Some("CSS"));

        let facets = available_project_facets(&projects());
        assert_eq!(facets.statuses, vec![ProjectStatus::Completed, ProjectStatus::InProgress]);
        assert_eq!(facets.technologies.len(), 5);
    }

    #[test]
    fn test_status_facets_sorted_by_name() {
        let mut catalog = projects();
        catalog.push(project("gone", None, "api", &[], ProjectStatus::Archived));
        let facets = available_project_facets(&catalog);
        assert_eq!(
            facets.statuses,
            vec![
                ProjectStatus::Archived,
                ProjectStatus::Completed,
                ProjectStatus::InProgress
            ]
        );
    }

    #[test]
    fn test_adjacent_articles() {
        let catalog = articles();
        let adjacent = adjacent_articles(&catalog, "feb");
        assert_eq!(adjacent.prev.map(|a| a.id.as_str()), Some("mar"));
        assert_eq!(adjacent.next.map(|a| a.id.as_str()), Some("jan"));

        let newest = adjacent_articles(&catalog, "mar");
        assert!(newest.prev.is_none());
        assert!(adjacent_articles(&catalog, "missing").next.is_none());
    }
}
