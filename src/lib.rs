//! # Folio
//!
//! A personal content manager whose public face is a static site. Posts,
//! pages, portfolio items and site settings live in a SQLite database; one
//! publish run turns them into a flat directory of HTML files that can be
//! dropped on any file server.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! SQLite ──▶ ContentStore ──▶ SiteGenerator ──▶ html-outputs/
//!                                  │
//!                      templates/ ─┤  (Tera, parsed once per run)
//!                   static/css/ ───┘  (copied as-is)
//! ```
//!
//! The generator reads through the narrow [`store::ContentStore`] trait,
//! builds the navigation bar once, renders every output file, copies
//! stylesheets, and stops at the first error. It never reads the environment:
//! paths arrive in a [`generate::GeneratorConfig`] built by the binary from
//! [`config::AppConfig`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `ContentStore` trait, SQLite backend with migrations and CRUD |
//! | [`generate`] | Orchestrates one publish run; stale-output pruning; `publish` |
//! | [`render`] | Template loading, fragment composition, view models, page writers |
//! | [`nav`] | Navigation bar from settings and navigable pages |
//! | [`markdown`] | Markdown → HTML via pulldown-cmark |
//! | [`assets`] | Copies theme stylesheets into the output |
//! | [`templates`] | Template directory browsing, safe editing, starter theme |
//! | [`config`] | `folio.toml` + environment configuration |
//! | [`types`] | Content entities shared by every module |
//! | [`slug`] | Slug validation and derivation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Templates Are User Files
//!
//! The theme is a directory of Tera templates the user edits, not markup
//! compiled into the binary. Each output file is a composition of fragments
//! (`header.html` + body + `footer.html`) rendered against one view, so the
//! header can use the page's own title. `portfolio.html` is the exception and
//! renders as a complete document.
//!
//! ## Flat Output
//!
//! Posts and pages both land at `<slug>.html` in the output root. Links stay
//! short and the site works from any static host, at the cost of a shared
//! slug namespace: a page with a post's slug overwrites it, with a warning.
//!
//! ## Nothing Is Deleted By Default
//!
//! Regeneration overwrites in place. Opt into `prune_stale` to remove files a
//! previous run wrote that the current run no longer produces.

pub mod assets;
pub mod config;
pub mod generate;
pub mod markdown;
pub mod nav;
pub mod output;
pub mod render;
pub mod slug;
pub mod store;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
