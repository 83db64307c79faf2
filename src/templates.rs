//! Template workspace: browsing, editing and seeding the theme directory.
//!
//! Every path handed to this module is relative to the template root and may
//! not leave it. Saving over an existing file keeps the previous version as
//! `<name>.bak`, replacing any older backup.

use crate::assets::css_source_dir;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions the editor will open as text.
pub const EDITABLE_EXTENSIONS: [&str; 5] = ["html", "css", "js", "txt", "md"];

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("invalid template path '{0}': must stay inside the template directory")]
    InvalidPath(String),
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> TemplateError + '_ {
    move |source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One file or directory under the template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Relative to the root, `/`-separated
    pub path: String,
    pub is_dir: bool,
    pub editable: bool,
}

fn is_editable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EDITABLE_EXTENSIONS.contains(&ext))
}

/// Every entry below `root`, depth-first, sorted by name within a directory.
pub fn list_templates(root: &Path) -> Result<Vec<TemplateEntry>, TemplateError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| TemplateError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let is_dir = entry.file_type().is_dir();
        entries.push(TemplateEntry {
            path: rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            is_dir,
            editable: !is_dir && is_editable(rel),
        });
    }
    Ok(entries)
}

/// Join `rel` onto `root`, rejecting anything that could escape it.
pub fn resolve(root: &Path, rel: &str) -> Result<PathBuf, TemplateError> {
    let path = Path::new(rel);
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            _ => return Err(TemplateError::InvalidPath(rel.to_string())),
        }
    }
    if normal == 0 {
        return Err(TemplateError::InvalidPath(rel.to_string()));
    }
    Ok(root.join(path))
}

pub fn read_template(root: &Path, rel: &str) -> Result<String, TemplateError> {
    let path = resolve(root, rel)?;
    fs::read_to_string(&path).map_err(io_err(&path))
}

/// Write `content` to `rel`, moving an existing file to `<rel>.bak` first.
///
/// Returns the backup path when one was made.
pub fn save_template(
    root: &Path,
    rel: &str,
    content: &str,
) -> Result<Option<PathBuf>, TemplateError> {
    let path = resolve(root, rel)?;

    let backup = if path.is_file() {
        let mut name = path.as_os_str().to_owned();
        name.push(".bak");
        let bak = PathBuf::from(name);
        fs::rename(&path, &bak).map_err(io_err(&path))?;
        debug!(file = %path.display(), backup = %bak.display(), "backed up template");
        Some(bak)
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        None
    };

    fs::write(&path, content).map_err(io_err(&path))?;
    info!(file = %path.display(), "saved template");
    Ok(backup)
}

// ============================================================================
// Starter theme
// ============================================================================

/// The bundled theme's templates, by file name.
pub const STARTER_TEMPLATES: [(&str, &str); 7] = [
    ("header.html", include_str!("../starter/templates/header.html")),
    ("footer.html", include_str!("../starter/templates/footer.html")),
    ("post.html", include_str!("../starter/templates/post.html")),
    ("posts.html", include_str!("../starter/templates/posts.html")),
    ("index.html", include_str!("../starter/templates/index.html")),
    ("portfolio.html", include_str!("../starter/templates/portfolio.html")),
    ("page.html", include_str!("../starter/templates/page.html")),
];

pub const STARTER_CSS: &str = include_str!("../starter/static/css/style.css");

/// Write the bundled theme into `template_dir`, plus its stylesheet into
/// the sibling `static/css`. Existing files are left untouched.
///
/// Returns the files that were written.
pub fn install_starter(template_dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let css_dir = css_source_dir(template_dir);
    let files = STARTER_TEMPLATES
        .iter()
        .map(|(name, body)| (template_dir.join(name), *body))
        .chain([(css_dir.join("style.css"), STARTER_CSS)]);

    let mut written = Vec::new();
    for (path, body) in files {
        if path.exists() {
            debug!(file = %path.display(), "keeping existing file");
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        fs::write(&path, body).map_err(io_err(&path))?;
        written.push(path);
    }
    info!(dir = %template_dir.display(), files = written.len(), "installed starter theme");
    Ok(written)
}
