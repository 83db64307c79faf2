//! Page rendering.
//!
//! Every output file is produced by executing one or more template fragments
//! against a single view value, in a fixed order, into one file:
//!
//! ```text
//! <slug>.html      header.html + post.html      + footer.html   (per post)
//! index.html       header.html + index.html     + footer.html
//! posts.html       header.html + posts.html     + footer.html
//! portfolio.html   portfolio.html                               (single fragment)
//! <slug>.html      header.html + page.html      + footer.html   (per page)
//! ```
//!
//! ## Template Context
//!
//! Views are plain `Serialize` structs. Each one embeds the shared
//! [`NavigationData`] by flattening, so every fragment (header included) can
//! reference `site_name` and iterate `nav_links` next to the page's own fields.
//!
//! Templates are [Tera](https://keats.github.io/tera/) files with autoescaping
//! on. Converted markdown arrives as an HTML string, so templates print it with
//! `{{ content | safe }}` (or `short_description | safe` for portfolio items).
//!
//! ## Writes
//!
//! Files are created or truncated in place; nothing is written atomically and
//! nothing from a previous run is removed here.

use crate::markdown;
use crate::types::{NavLink, Page, PortfolioItem, Post};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::debug;

pub const HEADER: &str = "header.html";
pub const FOOTER: &str = "footer.html";
pub const POST: &str = "post.html";
pub const POSTS: &str = "posts.html";
pub const INDEX: &str = "index.html";
pub const PORTFOLIO: &str = "portfolio.html";
pub const PAGE: &str = "page.html";

/// Every template the generator needs, all required.
pub const TEMPLATE_NAMES: [&str; 7] = [HEADER, FOOTER, POST, POSTS, INDEX, PORTFOLIO, PAGE];

/// Number of posts shown on the home page.
pub const INDEX_POST_LIMIT: usize = 10;

/// Excerpt length on the posts listing, in characters.
pub const EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template {name} not found at {}", path.display())]
    MissingTemplate { name: &'static str, path: PathBuf },
    #[error("failed to parse templates in {}: {source}", dir.display())]
    Parse {
        dir: PathBuf,
        #[source]
        source: tera::Error,
    },
    #[error("failed to build template context for {target}: {source}")]
    Context {
        target: String,
        #[source]
        source: tera::Error,
    },
    #[error("failed to execute {template} template for {target}: {source}")]
    Execute {
        template: &'static str,
        target: String,
        #[source]
        source: tera::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Templates and composition
// ============================================================================

/// The parsed template set for one generation run.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse all of [`TEMPLATE_NAMES`] from `dir`.
    ///
    /// Fails on the first missing file, or if any template does not parse.
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        let mut files = Vec::with_capacity(TEMPLATE_NAMES.len());
        for name in TEMPLATE_NAMES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(RenderError::MissingTemplate { name, path });
            }
            files.push((path, Some(name)));
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .map_err(|source| RenderError::Parse {
                dir: dir.to_path_buf(),
                source,
            })?;
        debug!(dir = %dir.display(), "parsed templates");
        Ok(Self { tera })
    }
}

/// An ordered list of template fragments executed against one context and
/// concatenated into one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    fragments: Vec<&'static str>,
}

impl Composition {
    /// `header.html`, then `body`, then `footer.html`.
    pub fn framed(body: &'static str) -> Self {
        Self {
            fragments: vec![HEADER, body, FOOTER],
        }
    }

    /// A template that is a complete document on its own.
    pub fn single(name: &'static str) -> Self {
        Self {
            fragments: vec![name],
        }
    }

    pub fn fragments(&self) -> &[&'static str] {
        &self.fragments
    }

    fn render_into<W: Write>(
        &self,
        templates: &Templates,
        context: &Context,
        target: &str,
        out: &mut W,
    ) -> Result<(), RenderError> {
        for &fragment in &self.fragments {
            templates
                .tera
                .render_to(fragment, context, &mut *out)
                .map_err(|source| RenderError::Execute {
                    template: fragment,
                    target: target.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

// ============================================================================
// Views
// ============================================================================

/// Shared by every view: the site name and the navigation bar.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationData {
    pub nav_links: Vec<NavLink>,
    pub site_name: String,
}

#[derive(Debug, Serialize)]
pub struct PostView<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_at_formatted: String,
    #[serde(flatten)]
    pub nav: &'a NavigationData,
}

#[derive(Debug, Serialize)]
pub struct IndexPost<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub created_at: DateTime<Utc>,
    pub created_at_formatted: String,
}

#[derive(Debug, Serialize)]
pub struct PortfolioItemView<'a> {
    pub title: &'a str,
    pub short_description: String,
    pub project_url: &'a str,
    pub github_url: &'a str,
    pub showcase_image: &'a str,
    pub sort_order: i64,
}

#[derive(Debug, Serialize)]
pub struct IndexView<'a> {
    pub title: &'a str,
    pub posts: Vec<IndexPost<'a>>,
    pub portfolio_items: Vec<PortfolioItemView<'a>>,
    #[serde(flatten)]
    pub nav: &'a NavigationData,
}

#[derive(Debug, Serialize)]
pub struct PostListItem<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub created_at: DateTime<Utc>,
    pub created_at_formatted: String,
    pub tags: Vec<String>,
    pub excerpt: String,
}

#[derive(Debug, Serialize)]
pub struct PostsView<'a> {
    pub title: &'a str,
    pub posts: Vec<PostListItem<'a>>,
    #[serde(flatten)]
    pub nav: &'a NavigationData,
}

#[derive(Debug, Serialize)]
pub struct PortfolioView<'a> {
    pub title: &'a str,
    pub portfolio_items: Vec<PortfolioItemView<'a>>,
    #[serde(flatten)]
    pub nav: &'a NavigationData,
}

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: String,
    #[serde(flatten)]
    pub nav: &'a NavigationData,
}

// ============================================================================
// Formatting helpers
// ============================================================================

/// `January 2, 2006`
pub fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// `2006-01-02`
pub fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Plain-text excerpt of raw markdown.
///
/// Newlines become spaces, then the text is cut at [`EXCERPT_CHARS`]
/// characters with `...` appended only when something was cut.
pub fn excerpt(content: &str) -> String {
    let flat = content.replace('\n', " ");
    match flat.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

/// Posts sorted newest first. The sort is stable, so posts with equal
/// timestamps keep their relative input order.
pub fn newest_first(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by_key(|p| Reverse(p.created_at));
    sorted
}

/// Portfolio items by `sort_order` ascending, then newest first.
pub fn portfolio_order(items: &[PortfolioItem]) -> Vec<&PortfolioItem> {
    let mut sorted: Vec<&PortfolioItem> = items.iter().collect();
    sorted.sort_by_key(|i| (i.sort_order, Reverse(i.created_at)));
    sorted
}

fn portfolio_view(item: &PortfolioItem) -> PortfolioItemView<'_> {
    PortfolioItemView {
        title: &item.title,
        short_description: markdown::to_html(&item.short_description),
        project_url: &item.project_url,
        github_url: &item.github_url,
        showcase_image: &item.showcase_image,
        sort_order: item.sort_order,
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders views into files under one output directory.
pub struct Renderer<'a> {
    templates: &'a Templates,
    output_dir: &'a Path,
    nav: &'a NavigationData,
}

impl<'a> Renderer<'a> {
    pub fn new(templates: &'a Templates, output_dir: &'a Path, nav: &'a NavigationData) -> Self {
        Self {
            templates,
            output_dir,
            nav,
        }
    }

    /// Execute `composition` against `view` into `<output_dir>/<file_name>`.
    fn write<V: Serialize>(
        &self,
        file_name: &str,
        composition: &Composition,
        view: &V,
    ) -> Result<PathBuf, RenderError> {
        let context = Context::from_serialize(view).map_err(|source| RenderError::Context {
            target: file_name.to_string(),
            source,
        })?;

        let path = self.output_dir.join(file_name);
        let io_err = |source| RenderError::Io {
            path: path.clone(),
            source,
        };
        let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);
        composition.render_into(self.templates, &context, file_name, &mut out)?;
        out.flush().map_err(io_err)?;

        debug!(file = file_name, "wrote page");
        Ok(path)
    }

    /// One `<slug>.html` per post, in the order given.
    pub fn render_posts(&self, posts: &[Post]) -> Result<Vec<PathBuf>, RenderError> {
        let composition = Composition::framed(POST);
        posts
            .iter()
            .map(|post| {
                let view = PostView {
                    title: &post.title,
                    slug: &post.slug,
                    content: markdown::to_html(&post.content),
                    tags: post.tag_list(),
                    created_at: post.created_at,
                    created_at_formatted: long_date(&post.created_at),
                    nav: self.nav,
                };
                self.write(&format!("{}.html", post.slug), &composition, &view)
            })
            .collect()
    }

    /// `index.html`: the [`INDEX_POST_LIMIT`] newest posts and every portfolio item.
    pub fn render_index(
        &self,
        posts: &[Post],
        items: &[PortfolioItem],
    ) -> Result<PathBuf, RenderError> {
        let view = IndexView {
            title: "",
            posts: newest_first(posts)
                .into_iter()
                .take(INDEX_POST_LIMIT)
                .map(|post| IndexPost {
                    title: &post.title,
                    slug: &post.slug,
                    created_at: post.created_at,
                    created_at_formatted: long_date(&post.created_at),
                })
                .collect(),
            portfolio_items: portfolio_order(items).into_iter().map(portfolio_view).collect(),
            nav: self.nav,
        };
        self.write(INDEX, &Composition::framed(INDEX), &view)
    }

    /// `posts.html`: every post, newest first, with excerpts.
    pub fn render_posts_listing(&self, posts: &[Post]) -> Result<PathBuf, RenderError> {
        let view = PostsView {
            title: "Blog",
            posts: newest_first(posts)
                .into_iter()
                .map(|post| PostListItem {
                    title: &post.title,
                    slug: &post.slug,
                    created_at: post.created_at,
                    created_at_formatted: short_date(&post.created_at),
                    tags: post.tag_list(),
                    excerpt: excerpt(&post.content),
                })
                .collect(),
            nav: self.nav,
        };
        self.write(POSTS, &Composition::framed(POSTS), &view)
    }

    /// `portfolio.html`, rendered from the single portfolio template.
    pub fn render_portfolio(&self, items: &[PortfolioItem]) -> Result<PathBuf, RenderError> {
        let view = PortfolioView {
            title: "Portfolio",
            portfolio_items: portfolio_order(items).into_iter().map(portfolio_view).collect(),
            nav: self.nav,
        };
        self.write(PORTFOLIO, &Composition::single(PORTFOLIO), &view)
    }

    /// One `<slug>.html` per page, in the order given.
    pub fn render_pages(&self, pages: &[Page]) -> Result<Vec<PathBuf>, RenderError> {
        let composition = Composition::framed(PAGE);
        pages
            .iter()
            .map(|page| {
                let view = PageView {
                    title: &page.title,
                    slug: &page.slug,
                    content: markdown::to_html(&page.content),
                    nav: self.nav,
                };
                self.write(&format!("{}.html", page.slug), &composition, &view)
            })
            .collect()
    }
}
