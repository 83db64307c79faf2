//! URL slug rules shared by every entity that becomes an output file.
//!
//! A slug names the generated file directly (`<slug>.html`), so it must be
//! safe as both a URL segment and a filename:
//! - `"hello-world"` → valid
//! - `"Hello World"` → invalid (uppercase, space)
//! - `"../etc"` → invalid
//!
//! [`slugify`] derives a valid slug from a free-form title for the CLI when
//! the user does not pass one explicitly.

/// Check that a slug contains only lowercase ASCII letters, digits and dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a slug from a title.
///
/// - `"Hello, World!"` → `"hello-world"`
/// - `"  Rust 2024  "` → `"rust-2024"`
/// - `"Ünïcode"` → `"n-code"` (non-ASCII is treated as a separator)
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
