//! Long-form article bodies and their table of contents.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::catalog::models::Article;

/// Tables of contents with fewer headings than this are not shown.
pub const MIN_TOC_HEADINGS: usize = 3;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,4})\s+(.+)$").expect("heading pattern compiles"));

static NON_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleBody {
    pub markdown: String,
    /// True when the stored document could not be read.
    pub placeholder: bool,
}

/// Reads `<dir>/<article id>.md`.
#[derive(Debug, Clone)]
pub struct ArticleContentStore {
    dir: PathBuf,
}

impl ArticleContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Never fails: an unreadable document degrades to a placeholder built
    /// from the article's title and excerpt.
    pub async fn load(&self, article: &Article) -> ArticleBody {
        let path = self.dir.join(format!("{}.md", article.id));
        match tokio::fs::read_to_string(&path).await {
            Ok(markdown) => ArticleBody {
                markdown,
                placeholder: false,
            },
            Err(e) => {
                warn!("Article body {} unavailable: {}", path.display(), e);
                ArticleBody {
                    markdown: placeholder_document(article),
                    placeholder: true,
                }
            }
        }
    }
}

pub fn placeholder_document(article: &Article) -> String {
    format!(
        "# {}\n\n{}\n\nFull content coming soon...",
        article.title, article.excerpt
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    pub headings: Vec<Heading>,
    pub visible: bool,
}

/// Anchor id for a heading: lowercase, runs of anything outside `[a-z0-9]`
/// collapsed to `-`, no leading or trailing `-`.
pub fn slugify(text: &str) -> String {
    NON_SLUG
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Level 1-4 ATX headings, skipping fenced code blocks.
pub fn table_of_contents(markdown: &str) -> TableOfContents {
    let mut headings = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            let text = caps[2].trim().to_string();
            headings.push(Heading {
                id: slugify(&text),
                level: caps[1].len() as u8,
                text,
            });
        }
    }

    TableOfContents {
        visible: headings.len() >= MIN_TOC_HEADINGS,
        headings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::fixtures::article;

    const SAMPLE: &str = "# Test Article\n\nThis is a test article with **bold text**.\n\n\
## Code Example\n\n```javascript\n# not a heading\nfunction hello() {}\n```\n\n\
## List Example\n\n- Item 1\n- Item 2\n\n##### Too deep\n";

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started with React!"), "getting-started-with-react");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
    }

    #[test]
    fn test_headings_extracted_outside_fences() {
        let toc = table_of_contents(SAMPLE);
        let ids: Vec<_> = toc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["test-article", "code-example", "list-example"]);
        assert_eq!(toc.headings[1].level, 2);
        assert!(toc.visible);
    }

    #[test]
    fn test_short_documents_hide_toc() {
        let toc = table_of_contents("# One\n\n## Two\n");
        assert_eq!(toc.headings.len(), 2);
        assert!(!toc.visible);
    }

    #[tokio::test]
    async fn test_load_reads_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jan.md"), SAMPLE).unwrap();
        let store = ArticleContentStore::new(dir.path());

        let body = store
            .load(&article("jan", "2024-01-01", "tips", &[], false))
            .await;
        assert!(!body.placeholder);
        assert_eq!(body.markdown, SAMPLE);
    }

    #[tokio::test]
    async fn test_missing_document_degrades_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleContentStore::new(dir.path());

        let body = store
            .load(&article("feb", "2024-02-01", "tips", &[], false))
            .await;
        assert!(body.placeholder);
        assert_eq!(
            body.markdown,
            "# Article feb\n\nExcerpt for feb\n\nFull content coming soon..."
        );
    }
}
