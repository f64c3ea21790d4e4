//! Slug derivation for content files.
//!
//! A post's slug is its URL segment and is derived only from the file name:
//! the extension is dropped, the stem is transliterated to ASCII, lowercased,
//! and every run of non-alphanumeric characters becomes one dash.
//!
//! - `blog_post.md` → `blog-post`
//! - `My First Post.md` → `my-first-post`
//! - `Café au lait.md` → `cafe-au-lait`
//!
//! Front matter never overrides the slug, so renaming a file is the only way to
//! move a post.

use deunicode::deunicode;
use std::path::Path;

/// Slug for a content file name, extension excluded.
pub fn slug_from_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    slugify(&stem)
}

/// Turn arbitrary text into a lowercase ASCII slug.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    slug.trim_matches('-').to_string()
}
