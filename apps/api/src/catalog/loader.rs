//! Loads the bundled article and project catalogs once at startup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::models::{Article, Project};

pub const ARTICLES_FILE: &str = "articles.json";
pub const PROJECTS_FILE: &str = "projects.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Immutable after load; handlers only ever borrow from it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub articles: Vec<Article>,
    pub projects: Vec<Project>,
}

impl Catalog {
    pub async fn load(content_dir: &Path) -> Result<Self, CatalogError> {
        let articles: Vec<Article> = read_records(&content_dir.join(ARTICLES_FILE)).await?;
        let projects: Vec<Project> = read_records(&content_dir.join(PROJECTS_FILE)).await?;
        let catalog = Self::from_parts(articles, projects)?;

        info!(
            "Catalog loaded from {}: {} articles, {} projects",
            content_dir.display(),
            catalog.articles.len(),
            catalog.projects.len()
        );
        Ok(catalog)
    }

    /// Drops unpublished or incomplete records and rejects duplicate ids.
    pub fn from_parts(articles: Vec<Article>, projects: Vec<Project>) -> Result<Self, CatalogError> {
        let total_articles = articles.len();
        let articles: Vec<Article> = articles.into_iter().filter(is_listable_article).collect();
        if articles.len() < total_articles {
            warn!(
                "Skipped {} unpublished or incomplete articles",
                total_articles - articles.len()
            );
        }

        let total_projects = projects.len();
        let projects: Vec<Project> = projects.into_iter().filter(is_listable_project).collect();
        if projects.len() < total_projects {
            warn!(
                "Skipped {} incomplete projects",
                total_projects - projects.len()
            );
        }

        ensure_unique("article", articles.iter().map(|a| a.id.as_str()))?;
        ensure_unique("project", projects.iter().map(|p| p.id.as_str()))?;

        Ok(Self { articles, projects })
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

fn is_listable_article(article: &Article) -> bool {
    article.published
        && !article.id.trim().is_empty()
        && !article.title.trim().is_empty()
        && !article.excerpt.trim().is_empty()
}

fn is_listable_project(project: &Project) -> bool {
    !project.id.trim().is_empty()
        && !project.title.trim().is_empty()
        && !project.description.trim().is_empty()
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Decodes each array element on its own; an element that does not decode
/// (bad date, unknown status, wrong types) is skipped with a warning.
async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let raw: Vec<serde_json::Value> = read_json(path).await?;
    let records = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping record {} in {}: {}", index, path.display(), e);
                None
            }
        })
        .collect();
    Ok(records)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
