use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub author: String,
    #[serde(deserialize_with = "flexible_datetime")]
    pub published_date: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

impl Article {
    /// Meta description for the detail view, falling back to the excerpt.
    pub fn meta_description(&self) -> &str {
        self.seo
            .as_ref()
            .and_then(|seo| seo.meta_description.as_deref())
            .unwrap_or(&self.excerpt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ProjectStatus::Completed,
            ProjectStatus::InProgress,
            ProjectStatus::Archived,
        ]
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| format!("unknown project status '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "flexible_date_opt")]
    pub completed_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn flexible_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_flexible(&raw)
            .map(|dt| Some(dt.date_naive()))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_accepts_timestamp_and_plain_date() {
        let a: Article = serde_json::from_value(json!({
            "id": "a", "title": "A", "publishedDate": "2024-01-01T10:00:00Z"
        }))
        .unwrap();
        let b: Article = serde_json::from_value(json!({
            "id": "b", "title": "B", "publishedDate": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(a.published_date.date_naive(), b.published_date.date_naive());
        assert!(a.published_date > b.published_date);
    }

    #[test]
    fn test_article_rejects_garbage_date() {
        let result: Result<Article, _> = serde_json::from_value(json!({
            "id": "a", "title": "A", "publishedDate": "last tuesday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_project_status_kebab_case() {
        let p: Project = serde_json::from_value(json!({
            "id": "p", "title": "P", "description": "d",
            "status": "in-progress", "completedDate": "2024-05-01"
        }))
        .unwrap();
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!("in-progress".parse::<ProjectStatus>(), Ok(ProjectStatus::InProgress));
        assert!("done".parse::<ProjectStatus>().is_err());
        assert_eq!(p.completed_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_meta_description_falls_back_to_excerpt() {
        let mut a: Article = serde_json::from_value(json!({
            "id": "a", "title": "A", "excerpt": "short", "publishedDate": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(a.meta_description(), "short");
        a.seo = Some(Seo {
            meta_description: Some("meta".to_string()),
            keywords: vec![],
        });
        assert_eq!(a.meta_description(), "meta");
    }
}
