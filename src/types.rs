//! Content entities shared by the store, the generator and the CLI.
//!
//! These mirror the rows of the content database. The generator only ever
//! reads them; writes go through [`crate::store::SqliteStore`].

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A blog post. Only posts with `published = true` reach the public site.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// URL slug, unique across posts. Output file is `<slug>.html`.
    pub slug: String,
    /// Raw markdown body
    pub content: String,
    /// Comma-joined tag list as stored, e.g. `"rust, web"`
    pub tags: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Split the stored tag string on commas, trimming whitespace.
    ///
    /// An empty tag string yields no tags.
    pub fn tag_list(&self) -> Vec<String> {
        if self.tags.is_empty() {
            return Vec::new();
        }
        self.tags.split(',').map(|t| t.trim().to_string()).collect()
    }
}

/// A portfolio entry. There is no publish flag: every item is public.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    /// Markdown
    pub short_description: String,
    pub project_url: String,
    pub github_url: String,
    pub showcase_image: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A static page such as "About". All pages are rendered; `show_in_nav`
/// only controls whether the page gets a navigation link.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub show_in_nav: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Site-wide settings. Exactly one row exists in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub site_name: String,
    pub show_portfolio_menu: bool,
    pub show_posts_menu: bool,
    /// JSON array of section keys, e.g. `["posts","portfolio","pages"]`.
    /// Kept raw; the navigation builder decides how to interpret it.
    pub menu_order: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A navigation link, derived fresh on every generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
    pub sort_order: i64,
}

/// Fields accepted when creating or updating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: String,
    pub published: bool,
    /// Defaults to "now" when absent
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or updating a page.
#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub show_in_nav: bool,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or updating a portfolio item.
#[derive(Debug, Clone, Default)]
pub struct NewPortfolioItem {
    pub title: String,
    pub short_description: String,
    pub project_url: String,
    pub github_url: String,
    pub showcase_image: String,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Editing
// ============================================================================

// An edit starts from the stored row; `created_at` stays `None` so the
// update keeps the original timestamp.

impl From<&Post> for NewPost {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            published: post.published,
            created_at: None,
        }
    }
}

impl From<&Page> for NewPage {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            content: page.content.clone(),
            show_in_nav: page.show_in_nav,
            sort_order: page.sort_order,
            created_at: None,
        }
    }
}

impl From<&PortfolioItem> for NewPortfolioItem {
    fn from(item: &PortfolioItem) -> Self {
        Self {
            title: item.title.clone(),
            short_description: item.short_description.clone(),
            project_url: item.project_url.clone(),
            github_url: item.github_url.clone(),
            showcase_image: item.showcase_image.clone(),
            sort_order: item.sort_order,
            created_at: None,
        }
    }
}
