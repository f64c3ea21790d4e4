//! CLI output formatting for `check` and `build`.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (section,
//! post, page) leads with its semantic identity (title and positional index),
//! with filesystem paths shown as secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Site
//!     Example
//!     Base URL: https://example.com
//!
//! Sections
//! 001 Home → /index
//! 002 Blog → /blog (2 posts)
//!
//! Posts
//! 001 Second Post
//!     Source: content/blog/second.md
//!     Published: 2023-03-01T09:00:00 · 1 min
//! 002 Hello World
//!     Source: content/blog/hello_world.md
//!     Published: 2023-01-15T09:00:00 · 1 min
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Blog → blog.html
//!     001 Second Post → blog/second.html
//!     002 Hello World → blog/hello-world.html
//!
//! Generated 1 home page, 1 blog index, 2 posts (10 files)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::{BuildReport, PageKind};
use crate::site::Website;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Output path relative to the output directory, for display.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

// ============================================================================
// Check output
// ============================================================================

/// Format the assembled site as a content inventory.
pub fn format_check_output(site: &Website) -> Vec<String> {
    let mut lines = vec!["Site".to_string(), format!("    {}", site.website.title)];
    if !site.base_url.is_empty() {
        lines.push(format!("    Base URL: {}", site.base_url));
    }

    lines.push(String::new());
    lines.push("Sections".to_string());
    lines.push(format!(
        "{} {} \u{2192} {}",
        format_index(1),
        site.home.title,
        site.home.resource_path
    ));
    lines.push(format!(
        "{} {} \u{2192} {} ({})",
        format_index(2),
        site.blog.title,
        site.blog.resource_path,
        plural(site.blog.posts.len(), "post", "posts")
    ));

    if !site.blog.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, post) in site.blog.posts.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), post.title));
            lines.push(format!("    Source: {}", post.source.display()));
            lines.push(format!(
                "    Published: {} \u{b7} {}",
                post.date, post.reading_time
            ));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(site: &Website) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages a build wrote, followed by a one-line summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut posts = 0;

    for page in &report.pages {
        let complete = relative(&page.complete, &report.output_dir);
        match page.kind {
            PageKind::Home | PageKind::BlogIndex => {
                lines.push(format!("{} \u{2192} {}", page.title, complete));
            }
            PageKind::Post => {
                posts += 1;
                lines.push(format!(
                    "    {} {} \u{2192} {}",
                    format_index(posts),
                    page.title,
                    complete
                ));
            }
        }
    }

    let homes = report.pages.iter().filter(|p| p.kind == PageKind::Home).count();
    let indexes = report
        .pages
        .iter()
        .filter(|p| p.kind == PageKind::BlogIndex)
        .count();

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {} ({})",
        plural(homes, "home page", "home pages"),
        plural(indexes, "blog index", "blog indexes"),
        plural(posts, "post", "posts"),
        plural(report.file_count(), "file", "files"),
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::WrittenPage;
    use crate::site::assemble_website;
    use crate::test_helpers::{blog_file, sample_post_markdown, site_config};
    use std::path::PathBuf;

    fn page(kind: PageKind, title: &str, complete: &str, llm: bool) -> WrittenPage {
        let root = PathBuf::from("/out");
        WrittenPage {
            kind,
            title: title.into(),
            complete: root.join(complete),
            hx: root.join("hx.html"),
            llm: llm.then(|| root.join("post.json")),
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn check_output_lists_sections_and_posts() {
        let config = site_config(vec![
            blog_file("hello_world.md", &sample_post_markdown("Hello World", "2023-01-15T09:00:00")),
            blog_file("second.md", &sample_post_markdown("Second Post", "2023-03-01T09:00:00")),
        ]);
        let site = assemble_website(&config).unwrap();
        let lines = format_check_output(&site);

        assert_eq!(lines[0], "Site");
        assert_eq!(lines[1], "    Example");
        assert_eq!(lines[2], "    Base URL: https://example.com");
        assert!(lines.contains(&"001 Home \u{2192} /index".to_string()));
        assert!(lines.contains(&"002 Blog \u{2192} /blog (2 posts)".to_string()));
        assert!(lines.contains(&"001 Second Post".to_string()));
        assert!(lines.contains(&"    Published: 2023-01-15T09:00:00 \u{b7} 1 min".to_string()));
    }

    #[test]
    fn check_output_without_posts_skips_post_list() {
        let site = assemble_website(&site_config(vec![])).unwrap();
        let lines = format_check_output(&site);
        assert!(lines.contains(&"002 Blog \u{2192} /blog (0 posts)".to_string()));
        assert!(!lines.contains(&"Posts".to_string()));
    }

    #[test]
    fn build_output_shows_relative_paths_and_summary() {
        let report = BuildReport {
            output_dir: PathBuf::from("/out"),
            pages: vec![
                page(PageKind::Home, "Example", "index.html", false),
                page(PageKind::BlogIndex, "Blog", "blog.html", false),
                page(PageKind::Post, "Hello", "blog/hello.html", true),
            ],
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            vec![
                "Example \u{2192} index.html",
                "Blog \u{2192} blog.html",
                "    001 Hello \u{2192} blog/hello.html",
                "",
                "Generated 1 home page, 1 blog index, 1 post (7 files)",
            ]
        );
    }
}
