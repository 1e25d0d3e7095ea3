use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::catalog::content::{table_of_contents, TableOfContents};
use crate::catalog::filter::{
    adjacent_articles, available_article_facets, available_project_facets, filter_articles,
    filter_projects, ArticleFacets, ArticleFilters, ProjectFacets, ProjectFilters,
};
use crate::catalog::models::{Article, Project, ProjectStatus};
use crate::errors::AppError;
use crate::state::AppState;

/// Raw query pairs; repeated keys (`?tag=a&tag=b`) select several values.
type QueryPairs = Vec<(String, String)>;

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    pub article: Article,
    pub meta_description: String,
    pub prev: Option<Article>,
    pub next: Option<Article>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleContentResponse {
    pub id: String,
    pub markdown: String,
    pub placeholder: bool,
    pub table_of_contents: TableOfContents,
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "'{key}' must be true or false, got '{other}'"
        ))),
    }
}

/// Returns the search query and article facets. Unknown keys are ignored.
pub fn parse_article_query(pairs: &[(String, String)]) -> Result<(String, ArticleFilters), AppError> {
    let mut query = String::new();
    let mut filters = ArticleFilters::default();
    for (key, value) in pairs {
        match key.as_str() {
            "q" => query = value.clone(),
            "category" => {
                filters.categories.insert(value.clone());
            }
            "tag" => {
                filters.tags.insert(value.clone());
            }
            "featured" => filters.featured = parse_flag(key, value)?,
            _ => {}
        }
    }
    Ok((query, filters))
}

pub fn parse_project_query(pairs: &[(String, String)]) -> Result<(String, ProjectFilters), AppError> {
    let mut query = String::new();
    let mut filters = ProjectFilters::default();
    for (key, value) in pairs {
        match key.as_str() {
            "q" => query = value.clone(),
            "technology" => {
                filters.technologies.insert(value.clone());
            }
            "category" => {
                filters.categories.insert(value.clone());
            }
            "status" => {
                let status: ProjectStatus = value.parse().map_err(AppError::BadRequest)?;
                filters.statuses.insert(status);
            }
            "featured" => filters.featured = parse_flag(key, value)?,
            _ => {}
        }
    }
    Ok((query, filters))
}

/// GET /api/v1/articles
pub async fn handle_list_articles(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<ListResponse<Article>>, AppError> {
    let (query, filters) = parse_article_query(&pairs)?;
    let items: Vec<Article> = filter_articles(&state.catalog.articles, &query, &filters)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ListResponse {
        total: items.len(),
        items,
    }))
}

/// GET /api/v1/articles/facets
pub async fn handle_article_facets(State(state): State<AppState>) -> Json<ArticleFacets> {
    Json(available_article_facets(&state.catalog.articles))
}

/// GET /api/v1/articles/:id
pub async fn handle_get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetailResponse>, AppError> {
    let article = state
        .catalog
        .article(&id)
        .ok_or_else(|| AppError::NotFound(format!("Article {id} not found")))?;
    let adjacent = adjacent_articles(&state.catalog.articles, &id);

    Ok(Json(ArticleDetailResponse {
        meta_description: article.meta_description().to_string(),
        article: article.clone(),
        prev: adjacent.prev.cloned(),
        next: adjacent.next.cloned(),
    }))
}

/// GET /api/v1/articles/:id/content
pub async fn handle_get_article_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleContentResponse>, AppError> {
    let article = state
        .catalog
        .article(&id)
        .ok_or_else(|| AppError::NotFound(format!("Article {id} not found")))?;
    let body = state.content.load(article).await;

    Ok(Json(ArticleContentResponse {
        id,
        table_of_contents: table_of_contents(&body.markdown),
        markdown: body.markdown,
        placeholder: body.placeholder,
    }))
}

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<ListResponse<Project>>, AppError> {
    let (query, filters) = parse_project_query(&pairs)?;
    let items: Vec<Project> = filter_projects(&state.catalog.projects, &query, &filters)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ListResponse {
        total: items.len(),
        items,
    }))
}

/// GET /api/v1/projects/facets
pub async fn handle_project_facets(State(state): State<AppState>) -> Json<ProjectFacets> {
    Json(available_project_facets(&state.catalog.projects))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    state
        .catalog
        .project(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}
