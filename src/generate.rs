//! Static site generation.
//!
//! [`SiteGenerator`] reads everything it needs from a [`ContentStore`] and
//! writes a flat site into the output directory. The run is linear and
//! fail-fast:
//!
//! ```text
//! LoadSettings → LoadPosts → BuildNav → ParseTemplates → EnsureOutputDir
//!   → RenderPosts → RenderIndex → RenderPostsListing → RenderPortfolio → RenderPages
//!   → CopyAssets → (PruneStale) → done
//! ```
//!
//! The first failing step aborts the run. Files written by earlier steps stay
//! on disk; there is no rollback and no retry.
//!
//! ## Output Structure
//!
//! ```text
//! html-outputs/
//! ├── index.html          # 10 newest posts + portfolio
//! ├── posts.html          # every published post with excerpt
//! ├── portfolio.html
//! ├── <post-slug>.html    # one per published post
//! ├── <page-slug>.html    # one per page
//! └── css/
//!     └── style.css       # copied from <theme>/static/css
//! ```
//!
//! Post and page slugs share one namespace. A page whose slug matches a post
//! slug overwrites the post's file (pages render last); the collision is
//! logged and listed in the report.
//!
//! ## Stale Output
//!
//! By default nothing is ever deleted, so a renamed slug leaves its old file
//! behind. With `prune_stale` enabled, each run records the files it wrote in
//! `.folio-manifest.json` and removes files listed by the previous run's
//! manifest that the current run did not produce. Files the generator never
//! wrote are never touched.

use crate::assets::{self, AssetError};
use crate::nav::build_navigation;
use crate::render::{NavigationData, RenderError, Renderer, Templates};
use crate::store::{ContentStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Written into the output directory when `prune_stale` is on.
pub const MANIFEST_FILE: &str = ".folio-manifest.json";

/// Everything the generator needs besides the store. Built by the caller;
/// nothing in the pipeline reads the environment or the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory holding `header.html`, `footer.html`, `post.html`, ...
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Remove files produced by the previous run but not by this one
    pub prune_stale: bool,
}

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadSettings,
    LoadPosts,
    BuildNav,
    ParseTemplates,
    EnsureOutputDir,
    RenderPosts,
    RenderIndex,
    RenderPostsListing,
    RenderPortfolio,
    RenderPages,
    CopyAssets,
    PruneStale,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::LoadSettings => "failed to get settings",
            Step::LoadPosts => "failed to query posts",
            Step::BuildNav => "failed to build navigation data",
            Step::ParseTemplates => "failed to parse templates",
            Step::EnsureOutputDir => "failed to create output directory",
            Step::RenderPosts => "failed to generate posts",
            Step::RenderIndex => "failed to generate index page",
            Step::RenderPostsListing => "failed to generate posts page",
            Step::RenderPortfolio => "failed to generate portfolio page",
            Step::RenderPages => "failed to generate pages",
            Step::CopyAssets => "failed to copy static assets",
            Step::PruneStale => "failed to prune stale output",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum Cause {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed generation run: the step that failed and why.
#[derive(Error, Debug)]
#[error("{step}: {source}")]
pub struct GenerateError {
    pub step: Step,
    pub source: Cause,
}

impl GenerateError {
    fn io(step: Step, path: &Path, source: std::io::Error) -> Self {
        Self {
            step,
            source: Cause::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

fn at<E: Into<Cause>>(step: Step) -> impl FnOnce(E) -> GenerateError {
    move |e| GenerateError {
        step,
        source: e.into(),
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Output-relative paths, in write order. A path written twice (slug
    /// collision) appears twice.
    pub files: Vec<String>,
    pub posts: usize,
    pub pages: usize,
    pub portfolio_items: usize,
    pub stylesheets: usize,
    /// Slugs that are both a post and a page
    pub collisions: Vec<String>,
    /// Output-relative paths removed by stale-output pruning
    pub pruned: Vec<String>,
    pub duration_ms: u64,
}

impl GenerationReport {
    fn record<'p>(&mut self, output_dir: &Path, paths: impl IntoIterator<Item = &'p PathBuf>) {
        self.files
            .extend(paths.into_iter().map(|p| relative_name(output_dir, p)));
    }
}

fn relative_name(output_dir: &Path, path: &Path) -> String {
    path.strip_prefix(output_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OutputManifest {
    files: BTreeSet<String>,
}

/// Renders a complete site from one content store.
pub struct SiteGenerator<'a, S: ContentStore + ?Sized> {
    store: &'a S,
    config: GeneratorConfig,
}

impl<'a, S: ContentStore + ?Sized> SiteGenerator<'a, S> {
    pub fn new(store: &'a S, config: GeneratorConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the whole pipeline once.
    pub fn generate(&self) -> Result<GenerationReport, GenerateError> {
        let started = Instant::now();
        let out = self.config.output_dir.as_path();
        info!(
            templates = %self.config.template_dir.display(),
            output = %out.display(),
            "starting generation"
        );

        let settings = self.store.settings().map_err(at(Step::LoadSettings))?;
        let posts = self.store.published_posts().map_err(at(Step::LoadPosts))?;
        debug!(count = posts.len(), "loaded published posts");

        let nav_pages = self.store.navigable_pages().map_err(at(Step::BuildNav))?;
        let nav = NavigationData {
            nav_links: build_navigation(&settings, &nav_pages),
            site_name: settings.site_name.clone(),
        };
        debug!(links = nav.nav_links.len(), "built navigation");

        let templates =
            Templates::load(&self.config.template_dir).map_err(at(Step::ParseTemplates))?;

        fs::create_dir_all(out).map_err(|e| GenerateError::io(Step::EnsureOutputDir, out, e))?;

        let renderer = Renderer::new(&templates, out, &nav);
        let mut report = GenerationReport::default();

        let written = renderer.render_posts(&posts).map_err(at(Step::RenderPosts))?;
        report.posts = written.len();
        report.record(out, &written);
        info!(count = report.posts, "rendered posts");

        let items = self.store.portfolio_items().map_err(at(Step::RenderIndex))?;
        let index = renderer
            .render_index(&posts, &items)
            .map_err(at(Step::RenderIndex))?;
        report.record(out, [&index]);

        let listing = renderer
            .render_posts_listing(&posts)
            .map_err(at(Step::RenderPostsListing))?;
        report.record(out, [&listing]);

        let portfolio = renderer
            .render_portfolio(&items)
            .map_err(at(Step::RenderPortfolio))?;
        report.portfolio_items = items.len();
        report.record(out, [&portfolio]);
        info!(items = items.len(), "rendered index, listing and portfolio");

        let pages = self.store.all_pages().map_err(at(Step::RenderPages))?;
        let post_slugs: HashSet<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        for page in pages.iter().filter(|p| post_slugs.contains(p.slug.as_str())) {
            warn!(slug = %page.slug, "page slug collides with a post; page overwrites post output");
            report.collisions.push(page.slug.clone());
        }
        let written = renderer.render_pages(&pages).map_err(at(Step::RenderPages))?;
        report.pages = written.len();
        report.record(out, &written);
        info!(count = report.pages, "rendered pages");

        let css = assets::copy_css(&self.config.template_dir, out).map_err(at(Step::CopyAssets))?;
        report.stylesheets = css.len();
        report.record(out, &css);

        if self.config.prune_stale {
            report.pruned = prune_stale(out, &report.files)?;
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            files = report.files.len(),
            duration_ms = report.duration_ms,
            "generation complete"
        );
        Ok(report)
    }
}

/// Delete files named by the previous manifest that `current` no longer
/// contains, then record `current` as the new manifest.
fn prune_stale(output_dir: &Path, current: &[String]) -> Result<Vec<String>, GenerateError> {
    let manifest_path = output_dir.join(MANIFEST_FILE);
    let previous = match fs::read_to_string(&manifest_path) {
        Ok(json) => serde_json::from_str::<OutputManifest>(&json).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable output manifest");
            OutputManifest::default()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => OutputManifest::default(),
        Err(e) => return Err(GenerateError::io(Step::PruneStale, &manifest_path, e)),
    };

    let manifest = OutputManifest {
        files: current.iter().cloned().collect(),
    };

    let mut pruned = Vec::new();
    for stale in previous.files.difference(&manifest.files) {
        if !is_safe_relative(stale) {
            warn!(path = %stale, "refusing to prune path outside the output directory");
            continue;
        }
        let path = output_dir.join(stale);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = %stale, "pruned stale output");
                pruned.push(stale.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(GenerateError::io(Step::PruneStale, &path, e)),
        }
    }

    let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
        GenerateError::io(Step::PruneStale, &manifest_path, std::io::Error::other(e))
    })?;
    fs::write(&manifest_path, json)
        .map_err(|e| GenerateError::io(Step::PruneStale, &manifest_path, e))?;

    if !pruned.is_empty() {
        info!(count = pruned.len(), "pruned stale output files");
    }
    Ok(pruned)
}

fn is_safe_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

// ============================================================================
// Publish
// ============================================================================

/// Result of the administrative "publish" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub message: String,
    /// Published posts at the time of publishing. `None` if counting failed
    /// after a successful generation.
    pub count: Option<usize>,
    pub report: GenerationReport,
}

#[derive(Error, Debug)]
#[error("Generation failed: {0}")]
pub struct PublishError(#[from] pub GenerateError);

/// Generate the site, then count published posts for the caller.
pub fn publish<S: ContentStore + ?Sized>(
    store: &S,
    config: GeneratorConfig,
) -> Result<PublishOutcome, PublishError> {
    let report = SiteGenerator::new(store, config).generate()?;

    let count = match store.all_posts() {
        Ok(posts) => Some(posts.iter().filter(|p| p.published).count()),
        Err(e) => {
            warn!(error = %e, "site generated but counting published posts failed");
            None
        }
    };

    Ok(PublishOutcome {
        message: "Site generated successfully".to_string(),
        count,
        report,
    })
}
