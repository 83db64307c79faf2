//! Site navigation.
//!
//! The navigation bar is derived on every generation run from two inputs: the
//! settings singleton and the pages flagged `show_in_nav`. Nothing here is
//! persisted.
//!
//! ## Resolution
//!
//! `settings.menu_order` is a JSON array of section keys:
//!
//! | Key | Link |
//! |-----|------|
//! | `"home"` | Home → `/index.html` |
//! | `"posts"` | Blog → `/posts.html` (only if `show_posts_menu`) |
//! | `"portfolio"` | Portfolio → `/portfolio.html` (only if `show_portfolio_menu`) |
//! | `"pages"` | every navigable page, in page order |
//! | `"page:<slug>"` | that one navigable page |
//!
//! Links are emitted in `menu_order` sequence and never re-sorted. Unknown keys
//! are skipped. If the array cannot be parsed at all, the default order
//! `["posts", "portfolio", "pages"]` is used instead. Finally, Home is prepended
//! when no emitted link points at `/index.html`, so it is always reachable.

use crate::types::{NavLink, Page, Settings};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub const HOME_URL: &str = "/index.html";
pub const POSTS_URL: &str = "/posts.html";
pub const PORTFOLIO_URL: &str = "/portfolio.html";

/// Page links sort after the built-in links.
const PAGE_SORT_OFFSET: i64 = 10;

/// Order used when `menu_order` is missing or malformed.
pub const DEFAULT_MENU_ORDER: [&str; 3] = ["posts", "portfolio", "pages"];

/// One entry of `menu_order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuKey {
    Home,
    Posts,
    Portfolio,
    /// Expands to every navigable page
    Pages,
    /// A single page by slug, written `page:<slug>`
    Page(String),
    /// Anything else; resolved to nothing
    Unknown(String),
}

impl MenuKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "home" => MenuKey::Home,
            "posts" => MenuKey::Posts,
            "portfolio" => MenuKey::Portfolio,
            "pages" => MenuKey::Pages,
            _ => match key.strip_prefix("page:") {
                Some(slug) => MenuKey::Page(slug.to_string()),
                None => MenuKey::Unknown(key.to_string()),
            },
        }
    }
}

/// Returned when `menu_order` cannot be parsed; the caller falls back to
/// [`DEFAULT_MENU_ORDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseDefault {
    pub reason: String,
}

/// Parse the raw `menu_order` JSON.
///
/// Only a JSON array of strings is accepted. Anything else, including an
/// empty string, is reported as [`UseDefault`].
pub fn parse_menu_order(raw: &str) -> Result<Vec<MenuKey>, UseDefault> {
    serde_json::from_str::<Vec<String>>(raw)
        .map(|keys| keys.iter().map(|k| MenuKey::parse(k)).collect())
        .map_err(|e| UseDefault {
            reason: e.to_string(),
        })
}

pub fn default_menu_order() -> Vec<MenuKey> {
    DEFAULT_MENU_ORDER.iter().map(|k| MenuKey::parse(k)).collect()
}

fn home_link() -> NavLink {
    NavLink {
        title: "Home".to_string(),
        url: HOME_URL.to_string(),
        sort_order: 0,
    }
}

fn page_link(page: &Page) -> NavLink {
    NavLink {
        title: page.title.clone(),
        url: format!("/{}.html", page.slug),
        sort_order: page.sort_order + PAGE_SORT_OFFSET,
    }
}

/// Build the ordered navigation links for the whole site.
///
/// `nav_pages` are the pages with `show_in_nav = true`. They are re-sorted by
/// `(sort_order, created_at desc)` so the `"pages"` expansion does not depend
/// on how the caller ordered them.
pub fn build_navigation(settings: &Settings, nav_pages: &[Page]) -> Vec<NavLink> {
    let order = match parse_menu_order(&settings.menu_order) {
        Ok(keys) => keys,
        Err(UseDefault { reason }) => {
            warn!(%reason, menu_order = %settings.menu_order, "menu_order unreadable, using default order");
            default_menu_order()
        }
    };

    let mut pages: Vec<&Page> = nav_pages.iter().collect();
    pages.sort_by_key(|p| (p.sort_order, Reverse(p.created_at)));
    let by_slug: HashMap<&str, &Page> = pages.iter().map(|p| (p.slug.as_str(), *p)).collect();

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut emit = |link: NavLink| {
        if seen.insert(link.url.clone()) {
            links.push(link);
        }
    };

    for key in &order {
        match key {
            MenuKey::Home => emit(home_link()),
            MenuKey::Posts if settings.show_posts_menu => emit(NavLink {
                title: "Blog".to_string(),
                url: POSTS_URL.to_string(),
                sort_order: 1,
            }),
            MenuKey::Portfolio if settings.show_portfolio_menu => emit(NavLink {
                title: "Portfolio".to_string(),
                url: PORTFOLIO_URL.to_string(),
                sort_order: 2,
            }),
            MenuKey::Posts | MenuKey::Portfolio => {}
            MenuKey::Pages => pages.iter().for_each(|p| emit(page_link(p))),
            MenuKey::Page(slug) => match by_slug.get(slug.as_str()) {
                Some(page) => emit(page_link(page)),
                None => debug!(%slug, "menu_order names a page that is not navigable"),
            },
            MenuKey::Unknown(raw) => debug!(key = %raw, "skipping unknown menu key"),
        }
    }

    if !links.iter().any(|l| l.url == HOME_URL) {
        links.insert(0, home_link());
    }
    links
}
