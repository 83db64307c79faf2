use super::migrations::MIGRATIONS;
use super::{ContentStore, StoreError};
use crate::slug::is_valid_slug;
use crate::types::{NewPage, NewPortfolioItem, NewPost, Page, PortfolioItem, Post, Settings};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Params, Row, params};
use std::path::Path;
use tracing::{debug, info};

const POST_COLUMNS: &str = "id, title, slug, content, tags, published, created_at, updated_at";
const PAGE_COLUMNS: &str =
    "id, title, slug, content, show_in_nav, sort_order, created_at, updated_at";
const PORTFOLIO_COLUMNS: &str = "id, title, short_description, project_url, github_url, \
     showcase_image, sort_order, created_at, updated_at";

/// SQLite-backed content store.
///
/// Holds a single connection; the generator is synchronous and single-threaded
/// so there is nothing to pool.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    ///
    /// The parent directory is created if needed. Call [`migrate`](Self::migrate)
    /// before first use.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Apply every embedded migration that has not been recorded yet.
    ///
    /// Each migration runs in its own transaction together with its
    /// `schema_migrations` record. Returns the number of migrations applied.
    pub fn migrate(&self) -> Result<usize, StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                id TEXT PRIMARY KEY,
                applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        let mut applied = 0;
        for &(id, sql) in MIGRATIONS {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM schema_migrations WHERE id = ?1",
                [id],
                |row| row.get(0),
            )?;
            if count > 0 {
                continue;
            }

            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(sql)
                .map_err(|source| StoreError::Migration { id, source })?;
            tx.execute("INSERT INTO schema_migrations (id) VALUES (?1)", [id])?;
            tx.commit()?;
            info!(migration = id, "applied migration");
            applied += 1;
        }
        Ok(applied)
    }

    fn query_all<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let items = rows.collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(items)
    }

    fn count(&self, table: &str) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(n as usize)
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub fn create_post(&self, post: &NewPost) -> Result<i64, StoreError> {
        validate_title(&post.title)?;
        validate_slug(&post.slug)?;
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO posts (title, slug, content, tags, published, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    post.title,
                    post.slug,
                    post.content,
                    post.tags,
                    post.published,
                    post.created_at.unwrap_or(now),
                    now
                ],
            )
            .map_err(|e| slug_conflict(e, &post.slug))?;
        let id = self.conn.last_insert_rowid();
        debug!(id, slug = %post.slug, "created post");
        Ok(id)
    }

    pub fn get_post(&self, id: i64) -> Result<Post, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                [id],
                post_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound { kind: "post", id })
    }

    /// Replace a post's fields. `created_at` is kept unless the update sets one.
    pub fn update_post(&self, id: i64, post: &NewPost) -> Result<(), StoreError> {
        validate_title(&post.title)?;
        validate_slug(&post.slug)?;
        let changed = self
            .conn
            .execute(
                "UPDATE posts SET title = ?1, slug = ?2, content = ?3, tags = ?4, published = ?5,
                 created_at = COALESCE(?6, created_at), updated_at = ?7 WHERE id = ?8",
                params![
                    post.title,
                    post.slug,
                    post.content,
                    post.tags,
                    post.published,
                    post.created_at,
                    Utc::now(),
                    id
                ],
            )
            .map_err(|e| slug_conflict(e, &post.slug))?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "post", id });
        }
        Ok(())
    }

    pub fn set_post_published(&self, id: i64, published: bool) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE posts SET published = ?1, updated_at = ?2 WHERE id = ?3",
            params![published, Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "post", id });
        }
        Ok(())
    }

    pub fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "post", id });
        }
        debug!(id, "deleted post");
        Ok(())
    }

    /// One page of posts (newest first) plus the total post count.
    pub fn list_posts(&self, limit: usize, offset: usize) -> Result<(Vec<Post>, usize), StoreError> {
        let posts = self.query_all(
            &format!(
                "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
            post_from_row,
        )?;
        Ok((posts, self.count("posts")?))
    }

    // ========================================================================
    // Pages
    // ========================================================================

    pub fn create_page(&self, page: &NewPage) -> Result<i64, StoreError> {
        validate_title(&page.title)?;
        validate_slug(&page.slug)?;
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO pages (title, slug, content, show_in_nav, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    page.title,
                    page.slug,
                    page.content,
                    page.show_in_nav,
                    page.sort_order,
                    page.created_at.unwrap_or(now),
                    now
                ],
            )
            .map_err(|e| slug_conflict(e, &page.slug))?;
        let id = self.conn.last_insert_rowid();
        debug!(id, slug = %page.slug, "created page");
        Ok(id)
    }

    pub fn get_page(&self, id: i64) -> Result<Page, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1"),
                [id],
                page_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound { kind: "page", id })
    }

    pub fn page_by_slug(&self, slug: &str) -> Result<Page, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = ?1"),
                [slug],
                page_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::SlugNotFound {
                kind: "page",
                slug: slug.to_string(),
            })
    }

    pub fn update_page(&self, id: i64, page: &NewPage) -> Result<(), StoreError> {
        validate_title(&page.title)?;
        validate_slug(&page.slug)?;
        let changed = self
            .conn
            .execute(
                "UPDATE pages SET title = ?1, slug = ?2, content = ?3, show_in_nav = ?4, sort_order = ?5,
                 created_at = COALESCE(?6, created_at), updated_at = ?7 WHERE id = ?8",
                params![
                    page.title,
                    page.slug,
                    page.content,
                    page.show_in_nav,
                    page.sort_order,
                    page.created_at,
                    Utc::now(),
                    id
                ],
            )
            .map_err(|e| slug_conflict(e, &page.slug))?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "page", id });
        }
        Ok(())
    }

    pub fn delete_page(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute("DELETE FROM pages WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { kind: "page", id });
        }
        debug!(id, "deleted page");
        Ok(())
    }

    // ========================================================================
    // Portfolio
    // ========================================================================

    pub fn create_portfolio_item(&self, item: &NewPortfolioItem) -> Result<i64, StoreError> {
        validate_title(&item.title)?;
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO portfolio_items (title, short_description, project_url, github_url,
             showcase_image, sort_order, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item.title,
                item.short_description,
                item.project_url,
                item.github_url,
                item.showcase_image,
                item.sort_order,
                item.created_at.unwrap_or(now),
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, title = %item.title, "created portfolio item");
        Ok(id)
    }

    pub fn get_portfolio_item(&self, id: i64) -> Result<PortfolioItem, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PORTFOLIO_COLUMNS} FROM portfolio_items WHERE id = ?1"),
                [id],
                portfolio_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                kind: "portfolio item",
                id,
            })
    }

    pub fn update_portfolio_item(&self, id: i64, item: &NewPortfolioItem) -> Result<(), StoreError> {
        validate_title(&item.title)?;
        let changed = self.conn.execute(
            "UPDATE portfolio_items SET title = ?1, short_description = ?2, project_url = ?3,
             github_url = ?4, showcase_image = ?5, sort_order = ?6,
             created_at = COALESCE(?7, created_at), updated_at = ?8 WHERE id = ?9",
            params![
                item.title,
                item.short_description,
                item.project_url,
                item.github_url,
                item.showcase_image,
                item.sort_order,
                item.created_at,
                Utc::now(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "portfolio item",
                id,
            });
        }
        Ok(())
    }

    pub fn delete_portfolio_item(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM portfolio_items WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "portfolio item",
                id,
            });
        }
        Ok(())
    }

    pub fn list_portfolio_items(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<PortfolioItem>, usize), StoreError> {
        let items = self.query_all(
            &format!(
                "SELECT {PORTFOLIO_COLUMNS} FROM portfolio_items
                 ORDER BY sort_order ASC, created_at DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
            portfolio_from_row,
        )?;
        Ok((items, self.count("portfolio_items")?))
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Overwrite the settings singleton. Timestamps on `settings` are ignored;
    /// `updated_at` is set to now.
    pub fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE settings SET site_name = ?1, show_portfolio_menu = ?2, show_posts_menu = ?3,
             menu_order = ?4, updated_at = ?5 WHERE id = 1",
            params![
                settings.site_name,
                settings.show_portfolio_menu,
                settings.show_posts_menu,
                settings.menu_order,
                Utc::now()
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::SettingsMissing);
        }
        Ok(())
    }
}

impl ContentStore for SqliteStore {
    fn published_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.query_all(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE published = 1 ORDER BY created_at DESC"),
            [],
            post_from_row,
        )
    }

    fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.query_all(
            &format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"),
            [],
            post_from_row,
        )
    }

    fn all_pages(&self) -> Result<Vec<Page>, StoreError> {
        self.query_all(
            &format!("SELECT {PAGE_COLUMNS} FROM pages ORDER BY sort_order ASC, created_at DESC"),
            [],
            page_from_row,
        )
    }

    fn navigable_pages(&self) -> Result<Vec<Page>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {PAGE_COLUMNS} FROM pages WHERE show_in_nav = 1
                 ORDER BY sort_order ASC, created_at DESC"
            ),
            [],
            page_from_row,
        )
    }

    fn portfolio_items(&self) -> Result<Vec<PortfolioItem>, StoreError> {
        self.query_all(
            &format!(
                "SELECT {PORTFOLIO_COLUMNS} FROM portfolio_items ORDER BY sort_order ASC, created_at DESC"
            ),
            [],
            portfolio_from_row,
        )
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        self.conn
            .query_row(
                "SELECT site_name, show_portfolio_menu, show_posts_menu, menu_order, created_at, updated_at
                 FROM settings WHERE id = 1",
                [],
                settings_from_row,
            )
            .optional()?
            .ok_or(StoreError::SettingsMissing)
    }
}

// ============================================================================
// Row mapping and validation
// ============================================================================

fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        slug: row.get("slug")?,
        content: text(row, "content")?,
        tags: text(row, "tags")?,
        published: row.get("published")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
    Ok(Page {
        id: row.get("id")?,
        title: row.get("title")?,
        slug: row.get("slug")?,
        content: text(row, "content")?,
        show_in_nav: row.get("show_in_nav")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn portfolio_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioItem> {
    Ok(PortfolioItem {
        id: row.get("id")?,
        title: row.get("title")?,
        short_description: text(row, "short_description")?,
        project_url: text(row, "project_url")?,
        github_url: text(row, "github_url")?,
        showcase_image: text(row, "showcase_image")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn settings_from_row(row: &Row<'_>) -> rusqlite::Result<Settings> {
    Ok(Settings {
        site_name: text(row, "site_name")?,
        show_portfolio_menu: row.get("show_portfolio_menu")?,
        show_posts_menu: row.get("show_posts_menu")?,
        menu_order: text(row, "menu_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "title",
            reason: "title is required".into(),
        });
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), StoreError> {
    if slug.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "slug",
            reason: "slug is required".into(),
        });
    }
    if !is_valid_slug(slug) {
        return Err(StoreError::Validation {
            field: "slug",
            reason: "slug must contain only lowercase letters, numbers, and hyphens".into(),
        });
    }
    Ok(())
}

/// Map a UNIQUE violation on insert/update to [`StoreError::SlugTaken`].
fn slug_conflict(err: rusqlite::Error, slug: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::SlugTaken(slug.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    fn new_post(slug: &str, day: u32, published: bool) -> NewPost {
        NewPost {
            title: format!("Post {slug}"),
            slug: slug.to_string(),
            content: "body".into(),
            tags: "a, b".into(),
            published,
            created_at: Some(Utc.with_ymd_and_hms(2023, 1, day, 12, 0, 0).unwrap()),
        }
    }

    fn new_page(slug: &str, sort_order: i64, show_in_nav: bool) -> NewPage {
        NewPage {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            content: "page".into(),
            show_in_nav,
            sort_order,
            created_at: None,
        }
    }

    #[test]
    fn migrate_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.migrate().unwrap(), MIGRATIONS.len());
        assert_eq!(store.migrate().unwrap(), 0);
    }

    #[test]
    fn settings_row_is_seeded() {
        let settings = store().settings().unwrap();
        assert_eq!(settings.site_name, "My Blog");
        assert!(settings.show_posts_menu);
        assert!(settings.show_portfolio_menu);
        assert_eq!(settings.menu_order, r#"["posts","portfolio"]"#);
    }

    #[test]
    fn missing_settings_row_is_an_error() {
        let store = store();
        store.conn.execute("DELETE FROM settings", []).unwrap();
        assert!(matches!(store.settings(), Err(StoreError::SettingsMissing)));
    }

    #[test]
    fn update_settings_round_trips() {
        let store = store();
        let mut settings = store.settings().unwrap();
        settings.site_name = "Field Notes".into();
        settings.show_posts_menu = false;
        settings.menu_order = r#"["pages"]"#.into();
        store.update_settings(&settings).unwrap();

        let reread = store.settings().unwrap();
        assert_eq!(reread.site_name, "Field Notes");
        assert!(!reread.show_posts_menu);
        assert_eq!(reread.menu_order, r#"["pages"]"#);
    }

    #[test]
    fn published_posts_are_newest_first_and_filtered() {
        let store = store();
        store.create_post(&new_post("old", 1, true)).unwrap();
        store.create_post(&new_post("draft", 3, false)).unwrap();
        store.create_post(&new_post("new", 2, true)).unwrap();

        let slugs: Vec<String> = store
            .published_posts()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);
        assert_eq!(store.all_posts().unwrap().len(), 3);
    }

    #[test]
    fn post_fields_round_trip() {
        let store = store();
        let id = store.create_post(&new_post("hello", 5, true)).unwrap();
        let post = store.get_post(id).unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.tags, "a, b");
        assert!(post.published);
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2023, 1, 5, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn duplicate_post_slug_is_rejected() {
        let store = store();
        store.create_post(&new_post("same", 1, true)).unwrap();
        let err = store.create_post(&new_post("same", 2, true)).unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(slug) if slug == "same"));
    }

    #[test]
    fn duplicate_page_slug_is_rejected() {
        let store = store();
        store.create_page(&new_page("about", 0, true)).unwrap();
        let err = store.create_page(&new_page("about", 1, false)).unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(_)));
        assert_eq!(store.all_pages().unwrap().len(), 1);
    }

    #[test]
    fn invalid_slug_is_rejected_before_insert() {
        let store = store();
        let err = store.create_post(&new_post("Bad Slug", 1, true)).unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "slug", .. }));
    }

    #[test]
    fn blank_title_is_rejected() {
        let store = store();
        let mut post = new_post("ok", 1, true);
        post.title = "   ".into();
        assert!(matches!(
            store.create_post(&post),
            Err(StoreError::Validation { field: "title", .. })
        ));
    }

    #[test]
    fn update_keeps_created_at_when_unset() {
        let store = store();
        let id = store.create_post(&new_post("keep", 4, true)).unwrap();
        let mut update = new_post("keep-renamed", 1, false);
        update.created_at = None;
        store.update_post(id, &update).unwrap();

        let post = store.get_post(id).unwrap();
        assert_eq!(post.slug, "keep-renamed");
        assert!(!post.published);
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2023, 1, 4, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn publish_toggle_changes_visibility() {
        let store = store();
        let id = store.create_post(&new_post("toggle", 1, false)).unwrap();
        assert!(store.published_posts().unwrap().is_empty());
        store.set_post_published(id, true).unwrap();
        assert_eq!(store.published_posts().unwrap().len(), 1);
    }

    #[test]
    fn deleting_missing_rows_reports_not_found() {
        let store = store();
        assert!(matches!(
            store.delete_post(42),
            Err(StoreError::NotFound { kind: "post", id: 42 })
        ));
        assert!(matches!(
            store.delete_page(7),
            Err(StoreError::NotFound { kind: "page", .. })
        ));
        assert!(matches!(
            store.delete_portfolio_item(1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn navigable_pages_filter_and_order() {
        let store = store();
        store.create_page(&new_page("contact", 2, true)).unwrap();
        store.create_page(&new_page("hidden", 0, false)).unwrap();
        store.create_page(&new_page("about", 1, true)).unwrap();

        let nav: Vec<String> = store
            .navigable_pages()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(nav, vec!["about", "contact"]);

        let all: Vec<String> = store
            .all_pages()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(all, vec!["hidden", "about", "contact"]);
    }

    #[test]
    fn page_lookup_by_slug() {
        let store = store();
        store.create_page(&new_page("about", 0, true)).unwrap();
        assert_eq!(store.page_by_slug("about").unwrap().title, "ABOUT");
        assert!(matches!(
            store.page_by_slug("nope"),
            Err(StoreError::SlugNotFound { .. })
        ));
    }

    #[test]
    fn portfolio_orders_by_sort_order_then_newest() {
        let store = store();
        let item = |title: &str, sort_order: i64, day: u32| NewPortfolioItem {
            title: title.into(),
            short_description: "desc".into(),
            sort_order,
            created_at: Some(Utc.with_ymd_and_hms(2023, 2, day, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        store.create_portfolio_item(&item("b-old", 1, 1)).unwrap();
        store.create_portfolio_item(&item("a", 0, 1)).unwrap();
        store.create_portfolio_item(&item("b-new", 1, 9)).unwrap();

        let titles: Vec<String> = store
            .portfolio_items()
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["a", "b-new", "b-old"]);
    }

    #[test]
    fn list_posts_paginates_with_total() {
        let store = store();
        for day in 1..=5 {
            store
                .create_post(&new_post(&format!("p{day}"), day, true))
                .unwrap();
        }
        let (page, total) = store.list_posts(2, 2).unwrap();
        assert_eq!(total, 5);
        let slugs: Vec<&str> = page.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["p3", "p2"]);
    }

    // =========================================================================
    // Edits
    // =========================================================================

    #[test]
    fn post_edit_from_stored_row_keeps_untouched_fields() {
        let store = store();
        let id = store.create_post(&new_post("hello", 3, true)).unwrap();
        let mut edit = NewPost::from(&store.get_post(id).unwrap());
        edit.title = "Hello again".into();
        store.update_post(id, &edit).unwrap();

        let post = store.get_post(id).unwrap();
        assert_eq!(post.title, "Hello again");
        assert_eq!(post.slug, "hello");
        assert_eq!(post.tags, "a, b");
        assert!(post.published);
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2023, 1, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn page_edit_round_trips_through_slug_lookup() {
        let store = store();
        let id = store.create_page(&new_page("about", 0, false)).unwrap();
        let mut edit = NewPage::from(&store.get_page(id).unwrap());
        edit.slug = "about-me".into();
        edit.show_in_nav = true;
        store.update_page(id, &edit).unwrap();

        let page = store.page_by_slug("about-me").unwrap();
        assert_eq!(page.id, id);
        assert_eq!(page.title, "ABOUT");
        assert!(page.show_in_nav);
        assert!(matches!(
            store.page_by_slug("about"),
            Err(StoreError::SlugNotFound { kind: "page", .. })
        ));
    }

    #[test]
    fn page_edit_onto_taken_slug_is_rejected() {
        let store = store();
        store.create_page(&new_page("about", 0, true)).unwrap();
        let id = store.create_page(&new_page("contact", 1, true)).unwrap();
        let mut edit = NewPage::from(&store.get_page(id).unwrap());
        edit.slug = "about".into();
        assert!(matches!(
            store.update_page(id, &edit),
            Err(StoreError::SlugTaken(slug)) if slug == "about"
        ));
        assert!(matches!(
            store.update_page(99, &new_page("x", 0, true)),
            Err(StoreError::NotFound { kind: "page", id: 99 })
        ));
    }

    #[test]
    fn portfolio_edit_and_paginated_listing() {
        let store = store();
        let mut ids = Vec::new();
        for (title, order) in [("a", 0), ("b", 1), ("c", 2)] {
            ids.push(
                store
                    .create_portfolio_item(&NewPortfolioItem {
                        title: title.into(),
                        sort_order: order,
                        ..Default::default()
                    })
                    .unwrap(),
            );
        }

        let mut edit = NewPortfolioItem::from(&store.get_portfolio_item(ids[0]).unwrap());
        edit.sort_order = 5;
        edit.github_url = "https://github.com/x/a".into();
        store.update_portfolio_item(ids[0], &edit).unwrap();

        let (items, total) = store.list_portfolio_items(2, 1).unwrap();
        assert_eq!(total, 3);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a"]);
        assert_eq!(items[1].github_url, "https://github.com/x/a");
        assert!(matches!(
            store.get_portfolio_item(404),
            Err(StoreError::NotFound { kind: "portfolio item", id: 404 })
        ));
    }
}
