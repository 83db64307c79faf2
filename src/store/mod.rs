//! Content storage.
//!
//! The generator depends only on [`ContentStore`], the narrow read interface
//! it needs to render a site. [`SqliteStore`] is the production backend and
//! additionally carries the create/update/delete operations used by the CLI.
//!
//! Ordering is part of the contract, not a convenience:
//!
//! | Read | Order |
//! |------|-------|
//! | [`ContentStore::published_posts`] | `created_at` DESC |
//! | [`ContentStore::all_posts`] | `created_at` DESC |
//! | [`ContentStore::all_pages`] | `sort_order` ASC, `created_at` DESC |
//! | [`ContentStore::navigable_pages`] | same as `all_pages`, `show_in_nav` only |
//! | [`ContentStore::portfolio_items`] | `sort_order` ASC, `created_at` DESC |

mod migrations;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::types::{Page, PortfolioItem, Post, Settings};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("{kind} with slug '{slug}' not found")]
    SlugNotFound { kind: &'static str, slug: String },
    #[error("slug already exists: {0}")]
    SlugTaken(String),
    #[error("settings row is missing")]
    SettingsMissing,
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("migration {id} failed: {source}")]
    Migration {
        id: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Read access to site content, as consumed by the site generator.
pub trait ContentStore {
    /// Posts with `published = true`, newest first.
    fn published_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// Every post regardless of publication state, newest first.
    fn all_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// Every page. Pages have no publish gate.
    fn all_pages(&self) -> Result<Vec<Page>, StoreError>;

    /// Pages with `show_in_nav = true`.
    fn navigable_pages(&self) -> Result<Vec<Page>, StoreError>;

    fn portfolio_items(&self) -> Result<Vec<PortfolioItem>, StoreError>;

    /// The settings singleton. Fails with [`StoreError::SettingsMissing`]
    /// when the row is absent.
    fn settings(&self) -> Result<Settings, StoreError>;
}
