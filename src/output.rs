//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every listed entity follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + title (+ optional marker like `[draft]`)
//! 2. **Context lines**: indented `Slug:`, `Created:`, `Tags:` and so on
//!
//! ```text
//! Posts (2 of 2)
//! 001 Hello World
//!     Slug: hello-world
//!     Created: 2023-01-02  Tags: rust, web
//! 002 Work in progress [draft]
//!     Slug: wip
//!     Created: 2023-01-01
//! ```
//!
//! ## Publish
//!
//! ```text
//! Site generated successfully (2 published posts)
//!     first.html
//!     index.html
//!     ...
//! Generated 2 posts, 1 page, 3 portfolio items, 1 stylesheet in 12ms
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::PublishOutcome;
use crate::render::short_date;
use crate::templates::TemplateEntry;
use crate::types::{Page, PortfolioItem, Post, Settings};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`
fn plural(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

fn entity_header(index: usize, title: &str, marker: Option<&str>) -> String {
    match marker {
        Some(m) => format!("{} {} [{}]", format_index(index), title, m),
        None => format!("{} {}", format_index(index), title),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Publish
// ============================================================================

pub fn format_publish_output(outcome: &PublishOutcome) -> Vec<String> {
    let report = &outcome.report;
    let mut lines = Vec::new();

    match outcome.count {
        Some(n) => lines.push(format!(
            "{} ({} published)",
            outcome.message,
            plural(n, "post")
        )),
        None => lines.push(outcome.message.clone()),
    }
    for file in &report.files {
        lines.push(format!("{}{}", indent(1), file));
    }

    for slug in &report.collisions {
        lines.push(format!(
            "Warning: page '{slug}' overwrote post output {slug}.html"
        ));
    }
    if !report.pruned.is_empty() {
        lines.push("Pruned".to_string());
        for file in &report.pruned {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines.push(format!(
        "Generated {}, {}, {}, {} in {}ms",
        plural(report.posts, "post"),
        plural(report.pages, "page"),
        plural(report.portfolio_items, "portfolio item"),
        plural(report.stylesheets, "stylesheet"),
        report.duration_ms
    ));
    lines
}

pub fn print_publish_output(outcome: &PublishOutcome) {
    print_lines(format_publish_output(outcome));
}

// ============================================================================
// Content listings
// ============================================================================

/// `posts` is one page of results; `total` counts every post.
pub fn format_post_list(posts: &[Post], total: usize) -> Vec<String> {
    let mut lines = vec![format!("Posts ({} of {})", posts.len(), total)];
    for (i, post) in posts.iter().enumerate() {
        let marker = (!post.published).then_some("draft");
        lines.push(entity_header(i + 1, &post.title, marker));
        lines.push(format!("{}Slug: {}", indent(1), post.slug));
        let tags = post.tag_list();
        if tags.is_empty() {
            lines.push(format!("{}Created: {}", indent(1), short_date(&post.created_at)));
        } else {
            lines.push(format!(
                "{}Created: {}  Tags: {}",
                indent(1),
                short_date(&post.created_at),
                tags.join(", ")
            ));
        }
    }
    lines
}

pub fn print_post_list(posts: &[Post], total: usize) {
    print_lines(format_post_list(posts, total));
}

/// A single post with its full markdown body.
pub fn format_post_detail(post: &Post) -> Vec<String> {
    let status = if post.published { "published" } else { "draft" };
    let mut lines = vec![
        format!("{} (#{})", post.title, post.id),
        format!("{}Slug: {}", indent(1), post.slug),
        format!("{}Status: {}", indent(1), status),
        format!("{}Created: {}", indent(1), post.created_at.to_rfc3339()),
        format!("{}Updated: {}", indent(1), post.updated_at.to_rfc3339()),
    ];
    if !post.tags.is_empty() {
        lines.push(format!("{}Tags: {}", indent(1), post.tag_list().join(", ")));
    }
    lines.push(String::new());
    lines.extend(post.content.lines().map(str::to_string));
    lines
}

pub fn print_post_detail(post: &Post) {
    print_lines(format_post_detail(post));
}

pub fn format_page_list(pages: &[Page]) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in pages.iter().enumerate() {
        let marker = (!page.show_in_nav).then_some("hidden");
        lines.push(entity_header(i + 1, &page.title, marker));
        lines.push(format!(
            "{}Slug: {}  Order: {}",
            indent(1),
            page.slug,
            page.sort_order
        ));
    }
    lines
}

pub fn print_page_list(pages: &[Page]) {
    print_lines(format_page_list(pages));
}

pub fn format_page_detail(page: &Page) -> Vec<String> {
    let nav = if page.show_in_nav { "shown" } else { "hidden" };
    let mut lines = vec![
        format!("{} (#{})", page.title, page.id),
        format!("{}Slug: {}", indent(1), page.slug),
        format!("{}Navigation: {}  Order: {}", indent(1), nav, page.sort_order),
        format!("{}Created: {}", indent(1), page.created_at.to_rfc3339()),
        format!("{}Updated: {}", indent(1), page.updated_at.to_rfc3339()),
        String::new(),
    ];
    lines.extend(page.content.lines().map(str::to_string));
    lines
}

pub fn print_page_detail(page: &Page) {
    print_lines(format_page_detail(page));
}

/// `items` is one page of results; `total` counts every item.
pub fn format_portfolio_list(items: &[PortfolioItem], total: usize) -> Vec<String> {
    let mut lines = vec![format!("Portfolio ({} of {})", items.len(), total)];
    for (i, item) in items.iter().enumerate() {
        lines.push(entity_header(i + 1, &item.title, None));
        lines.push(format!("{}Id: {}  Order: {}", indent(1), item.id, item.sort_order));
        for (label, url) in [("Project", &item.project_url), ("GitHub", &item.github_url)] {
            if !url.is_empty() {
                lines.push(format!("{}{}: {}", indent(1), label, url));
            }
        }
    }
    lines
}

pub fn print_portfolio_list(items: &[PortfolioItem], total: usize) {
    print_lines(format_portfolio_list(items, total));
}

pub fn format_portfolio_detail(item: &PortfolioItem) -> Vec<String> {
    let mut lines = vec![
        format!("{} (#{})", item.title, item.id),
        format!("{}Order: {}", indent(1), item.sort_order),
    ];
    for (label, value) in [
        ("Project", &item.project_url),
        ("GitHub", &item.github_url),
        ("Image", &item.showcase_image),
    ] {
        if !value.is_empty() {
            lines.push(format!("{}{}: {}", indent(1), label, value));
        }
    }
    lines.push(format!("{}Created: {}", indent(1), item.created_at.to_rfc3339()));
    lines.push(format!("{}Updated: {}", indent(1), item.updated_at.to_rfc3339()));
    lines.push(String::new());
    lines.extend(item.short_description.lines().map(str::to_string));
    lines
}

pub fn print_portfolio_detail(item: &PortfolioItem) {
    print_lines(format_portfolio_detail(item));
}

pub fn format_settings(settings: &Settings) -> Vec<String> {
    let on_off = |b: bool| if b { "shown" } else { "hidden" };
    vec![
        "Settings".to_string(),
        format!("{}Site name: {}", indent(1), settings.site_name),
        format!("{}Posts menu: {}", indent(1), on_off(settings.show_posts_menu)),
        format!(
            "{}Portfolio menu: {}",
            indent(1),
            on_off(settings.show_portfolio_menu)
        ),
        format!("{}Menu order: {}", indent(1), settings.menu_order),
    ]
}

pub fn print_settings(settings: &Settings) {
    print_lines(format_settings(settings));
}

/// Entries are shown as a tree; non-editable files are marked.
pub fn format_template_list(entries: &[TemplateEntry]) -> Vec<String> {
    let mut lines = vec!["Templates".to_string()];
    for entry in entries {
        let depth = entry.path.matches('/').count() + 1;
        let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        let line = if entry.is_dir {
            format!("{}{}/", indent(depth), name)
        } else if entry.editable {
            format!("{}{}", indent(depth), name)
        } else {
            format!("{}{} (binary)", indent(depth), name)
        };
        lines.push(line);
    }
    lines
}

pub fn print_template_list(entries: &[TemplateEntry]) {
    print_lines(format_template_list(entries));
}

/// `backup` is the `.bak` path when an existing file was replaced.
pub fn format_template_saved(rel: &str, backup: Option<&Path>) -> Vec<String> {
    let mut lines = vec![format!("Saved {rel}")];
    if let Some(bak) = backup {
        lines.push(format!("{}Previous version: {}", indent(1), bak.display()));
    }
    lines
}

pub fn print_template_saved(rel: &str, backup: Option<&Path>) {
    print_lines(format_template_saved(rel, backup));
}
