//! Static asset copying.
//!
//! Stylesheets live next to the template directory, not inside it:
//!
//! ```text
//! theme/
//! ├── templates/        ← GeneratorConfig::template_dir
//! │   ├── header.html
//! │   └── ...
//! └── static/
//!     └── css/          ← copied flat into <output>/css/
//!         └── style.css
//! ```
//!
//! Only regular `*.css` files at the top level of `static/css` are copied,
//! byte for byte. A theme without `static/css` is valid and copies nothing.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to create CSS output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read CSS source directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy CSS file {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `static/css` as a sibling of the template directory.
pub fn css_source_dir(template_dir: &Path) -> PathBuf {
    template_dir
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("static")
        .join("css")
}

/// Copy the theme's CSS files into `<output_dir>/css`.
///
/// Returns the destination paths of the copied files. When the theme has no
/// `static/css` directory this is a no-op and `css/` is not created.
pub fn copy_css(template_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let source_dir = css_source_dir(template_dir);
    if !source_dir.is_dir() {
        debug!(dir = %source_dir.display(), "no CSS directory, skipping assets");
        return Ok(Vec::new());
    }

    let dest_dir = output_dir.join("css");
    fs::create_dir_all(&dest_dir).map_err(|source| AssetError::CreateDir {
        path: dest_dir.clone(),
        source,
    })?;

    let read_err = |source| AssetError::ReadDir {
        path: source_dir.clone(),
        source,
    };
    let mut copied = Vec::new();
    for entry in fs::read_dir(&source_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let from = entry.path();
        if !from.is_file() || from.extension().is_none_or(|ext| ext != "css") {
            continue;
        }

        let to = dest_dir.join(entry.file_name());
        fs::copy(&from, &to).map_err(|source| AssetError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!(file = %to.display(), "copied stylesheet");
        copied.push(to);
    }
    copied.sort();
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Theme root with an empty `templates/` dir; returns (root, template_dir).
    fn theme() -> (TempDir, PathBuf) {
        let root = TempDir::new().unwrap();
        let templates = root.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        (root, templates)
    }

    #[test]
    fn css_dir_is_sibling_of_templates() {
        assert_eq!(
            css_source_dir(Path::new("/srv/theme/templates")),
            PathBuf::from("/srv/theme/static/css")
        );
    }

    #[test]
    fn missing_css_dir_is_a_noop() {
        let (_root, templates) = theme();
        let out = TempDir::new().unwrap();
        let copied = copy_css(&templates, out.path()).unwrap();
        assert!(copied.is_empty());
        assert!(!out.path().join("css").exists());
    }

    #[test]
    fn css_bytes_are_preserved() {
        let (root, templates) = theme();
        let css = root.path().join("static/css");
        fs::create_dir_all(&css).unwrap();
        let bytes: &[u8] = b"body { color: #123; }\n\xEF\xBB\xBF/* bom-ish */";
        fs::write(css.join("style.css"), bytes).unwrap();
        fs::write(css.join("print.css"), "@media print {}").unwrap();

        let out = TempDir::new().unwrap();
        let copied = copy_css(&templates, out.path()).unwrap();
        assert_eq!(copied.len(), 2);
        assert_eq!(fs::read(out.path().join("css/style.css")).unwrap(), bytes);
        assert_eq!(
            fs::read_to_string(out.path().join("css/print.css")).unwrap(),
            "@media print {}"
        );
    }

    #[test]
    fn non_css_entries_and_subdirs_are_skipped() {
        let (root, templates) = theme();
        let css = root.path().join("static/css");
        fs::create_dir_all(css.join("vendor")).unwrap();
        fs::write(css.join("vendor/reset.css"), "x").unwrap();
        fs::write(css.join("notes.txt"), "x").unwrap();
        fs::write(css.join("main.css"), "x").unwrap();

        let out = TempDir::new().unwrap();
        copy_css(&templates, out.path()).unwrap();

        let mut names: Vec<String> = fs::read_dir(out.path().join("css"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["main.css"]);
    }

    #[test]
    fn empty_css_dir_still_creates_output_dir() {
        let (root, templates) = theme();
        fs::create_dir_all(root.path().join("static/css")).unwrap();
        let out = TempDir::new().unwrap();
        assert!(copy_css(&templates, out.path()).unwrap().is_empty());
        assert!(out.path().join("css").is_dir());
    }
}
