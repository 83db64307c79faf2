//! Shared test utilities.
//!
//! Entity builders with fixed timestamps, an in-memory [`ContentStore`], and a
//! minimal template set whose markup the renderer and generator tests assert
//! against.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut store = MemoryStore::default();
//! store.posts = vec![post("hello", 1)];
//! store.pages = vec![page("about", 0, true)];
//!
//! let tmp = TempDir::new().unwrap();
//! write_templates(tmp.path());
//! ```

use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use crate::store::{ContentStore, StoreError};
use crate::types::{Page, PortfolioItem, Post, Settings};

// =========================================================================
// Builders
// =========================================================================

/// Noon UTC on 2023-01-`day`.
pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, day, 12, 0, 0).unwrap()
}

/// A published post titled `Post <slug>`, created on 2023-01-`day`.
pub fn post(slug: &str, day: u32) -> Post {
    Post {
        id: i64::from(day),
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        content: String::new(),
        tags: String::new(),
        published: true,
        created_at: jan(day),
        updated_at: jan(day),
    }
}

/// A page titled after its slug with the first letter capitalized.
pub fn page(slug: &str, sort_order: i64, show_in_nav: bool) -> Page {
    let mut chars = slug.chars();
    let title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Page {
        id: 0,
        title,
        slug: slug.to_string(),
        content: String::new(),
        show_in_nav,
        sort_order,
        created_at: jan(1),
        updated_at: jan(1),
    }
}

pub fn portfolio_item(title: &str, sort_order: i64, day: u32) -> PortfolioItem {
    PortfolioItem {
        id: i64::from(day),
        title: title.to_string(),
        short_description: String::new(),
        project_url: String::new(),
        github_url: String::new(),
        showcase_image: String::new(),
        sort_order,
        created_at: jan(day),
        updated_at: jan(day),
    }
}

/// Settings for a site named `Test Site`.
pub fn settings(menu_order: &str, show_posts_menu: bool, show_portfolio_menu: bool) -> Settings {
    Settings {
        site_name: "Test Site".to_string(),
        show_portfolio_menu,
        show_posts_menu,
        menu_order: menu_order.to_string(),
        created_at: jan(1),
        updated_at: jan(1),
    }
}

// =========================================================================
// In-memory store
// =========================================================================

/// A [`ContentStore`] over plain vectors, ordered the way the SQL backend
/// orders its results.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    pub portfolio: Vec<PortfolioItem>,
    /// `None` behaves like a database without the settings row
    pub settings: Option<Settings>,
    /// Make every page query fail
    pub fail_pages: bool,
    /// Make `all_posts` fail while `published_posts` keeps working
    pub fail_all_posts: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            pages: Vec::new(),
            portfolio: Vec::new(),
            settings: Some(settings(r#"["posts","portfolio","pages"]"#, true, true)),
            fail_pages: false,
            fail_all_posts: false,
        }
    }
}

fn injected(what: &str) -> StoreError {
    StoreError::Io(std::io::Error::other(format!("injected {what} failure")))
}

impl MemoryStore {
    fn sorted_pages(&self) -> Result<Vec<Page>, StoreError> {
        if self.fail_pages {
            return Err(injected("pages"));
        }
        let mut pages = self.pages.clone();
        pages.sort_by_key(|p| (p.sort_order, Reverse(p.created_at)));
        Ok(pages)
    }
}

impl ContentStore for MemoryStore {
    fn published_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self.posts.iter().filter(|p| p.published).cloned().collect();
        posts.sort_by_key(|p| Reverse(p.created_at));
        Ok(posts)
    }

    fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        if self.fail_all_posts {
            return Err(injected("posts"));
        }
        let mut posts = self.posts.clone();
        posts.sort_by_key(|p| Reverse(p.created_at));
        Ok(posts)
    }

    fn all_pages(&self) -> Result<Vec<Page>, StoreError> {
        self.sorted_pages()
    }

    fn navigable_pages(&self) -> Result<Vec<Page>, StoreError> {
        Ok(self
            .sorted_pages()?
            .into_iter()
            .filter(|p| p.show_in_nav)
            .collect())
    }

    fn portfolio_items(&self) -> Result<Vec<PortfolioItem>, StoreError> {
        let mut items = self.portfolio.clone();
        items.sort_by_key(|i| (i.sort_order, Reverse(i.created_at)));
        Ok(items)
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        self.settings.clone().ok_or(StoreError::SettingsMissing)
    }
}

// =========================================================================
// Templates
// =========================================================================

/// Minimal markup for every required template. Markers like
/// `<!-- header -->` and `class="index-post"` are what tests search for.
pub const TEST_TEMPLATES: [(&str, &str); 7] = [
    (
        "header.html",
        concat!(
            "<!-- header --><html><head>",
            "{% if title %}<title>{{ title }} | {{ site_name }}</title>",
            "{% else %}<title>{{ site_name }}</title>{% endif %}",
            "</head><body><nav>",
            "{% for link in nav_links %}<a href=\"{{ link.url | safe }}\">{{ link.title }}</a>{% endfor %}",
            "</nav>\n",
        ),
    ),
    ("footer.html", "<!-- footer -->footer: {{ site_name }}</body></html>\n"),
    (
        "post.html",
        concat!(
            "<article><h1>{{ title }}</h1><time>{{ created_at_formatted }}</time>",
            "{% for tag in tags %}<span class=\"tag\">{{ tag }}</span>{% endfor %}",
            "{{ content | safe }}</article>\n",
        ),
    ),
    (
        "posts.html",
        concat!(
            "{% for post in posts %}<div class=\"post\">",
            "<a href=\"/{{ post.slug }}.html\">{{ post.title }}</a>",
            "<span>{{ post.created_at_formatted }}</span><p>{{ post.excerpt }}</p>",
            "</div>{% endfor %}\n",
        ),
    ),
    (
        "index.html",
        concat!(
            "<ul>{% for post in posts %}<li class=\"index-post\">",
            "<a href=\"/{{ post.slug }}.html\">{{ post.title }}</a> {{ post.created_at_formatted }}",
            "</li>{% endfor %}</ul>",
            "{% for item in portfolio_items %}<div class=\"item\"><h3>{{ item.title }}</h3>",
            "{{ item.short_description | safe }}</div>{% endfor %}\n",
        ),
    ),
    (
        "portfolio.html",
        concat!(
            "<html><title>{{ title }} | {{ site_name }}</title><body>",
            "{% for item in portfolio_items %}<div class=\"item\"><h3>{{ item.title }}</h3>",
            "{{ item.short_description | safe }}</div>{% endfor %}</body></html>\n",
        ),
    ),
    (
        "page.html",
        "<article><h1>{{ title }}</h1>{{ content | safe }}</article>\n",
    ),
];

/// Write [`TEST_TEMPLATES`] into `dir`, creating it if needed.
pub fn write_templates(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for (name, body) in TEST_TEMPLATES {
        fs::write(dir.join(name), body).unwrap();
    }
}
