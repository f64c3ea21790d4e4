//! Shared test utilities for the hx-press test suite.
//!
//! Builds in-memory site configs and content files so assembly, view, and
//! render tests never touch the filesystem unless they mean to.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = site_config(vec![
//!     blog_file("hello.md", &sample_post_markdown("Hello", "2023-01-15T09:00:00")),
//! ]);
//! let site = assemble_website(&config).unwrap();
//! let post = find_post(&site, "hello");
//! assert_eq!(post.title, "Hello");
//! ```

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::config::{ReadFrom, Section, Settings, SiteConfig, WebsiteInfo};
use crate::files::FileData;
use crate::frontmatter::{FrontMatter, PublishTime, default_author};
use crate::site::{BlogPost, Website};

pub const BASE_URL: &str = "https://example.com";

// =========================================================================
// Config builders
// =========================================================================

pub fn sample_website() -> WebsiteInfo {
    WebsiteInfo {
        title: "Example".into(),
        description: "An example site".into(),
        image: "https://example.com/image.png".into(),
        locale: "en_US".into(),
    }
}

/// A section whose content is irrelevant to the test.
pub fn sample_section(title: &str, resource_path: &str) -> Section {
    Section {
        title: title.into(),
        description: String::new(),
        resource_path: resource_path.into(),
        read_from: ReadFrom::Plural {
            path: PathBuf::from("content"),
            files: Vec::new(),
        },
    }
}

pub fn site_config_with(sections: Vec<(&str, Section)>) -> SiteConfig {
    SiteConfig {
        base_url: BASE_URL.into(),
        website: sample_website(),
        settings: Settings::default(),
        sections: sections
            .into_iter()
            .map(|(key, section)| (key.to_string(), section))
            .collect(),
    }
}

/// A home page reading `# Welcome` and a blog holding `posts`.
pub fn site_config(posts: Vec<FileData>) -> SiteConfig {
    let home = Section {
        title: "Home".into(),
        description: "Landing page".into(),
        resource_path: "/index".into(),
        read_from: singular("index.md", "# Welcome"),
    };
    let blog = Section {
        title: "Blog".into(),
        description: "Writing".into(),
        resource_path: "/blog".into(),
        read_from: ReadFrom::Plural {
            path: PathBuf::from("content/blog"),
            files: posts,
        },
    };
    site_config_with(vec![("home", home), ("blog", blog)])
}

/// `config` with section `key` moved to `resource_path`.
pub fn with_resource_path(config: SiteConfig, key: &str, resource_path: &str) -> SiteConfig {
    let sections = config
        .sections
        .iter()
        .map(|(name, section)| {
            let mut section = section.clone();
            if name == key {
                section.resource_path = resource_path.into();
            }
            (name.to_string(), section)
        })
        .collect();
    SiteConfig { sections, ..config }
}

// =========================================================================
// Content builders
// =========================================================================

pub fn blog_file(file_name: &str, contents: &str) -> FileData {
    FileData {
        path: PathBuf::from("content/blog").join(file_name),
        file_name: file_name.into(),
        contents: contents.into(),
    }
}

pub fn singular(file_name: &str, contents: &str) -> ReadFrom {
    let file = FileData {
        path: PathBuf::from("content").join(file_name),
        file_name: file_name.into(),
        contents: contents.into(),
    };
    ReadFrom::Singular {
        path: file.path.clone(),
        file,
    }
}

/// A valid post with front matter. `time` is an unquoted YAML timestamp.
pub fn sample_post_markdown(title: &str, time: &str) -> String {
    format!(
        "---\ntitle: \"{title}\"\npublication_time: {time}\nsection: Technology\nimage: https://example.com/cover.png\n---\n# {title}\n\nSome words about {title}.\n"
    )
}

fn datetime(text: &str) -> PublishTime {
    PublishTime::naive(NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").unwrap())
}

pub fn sample_front_matter() -> FrontMatter {
    let published = datetime("2023-01-15T09:00:00");
    FrontMatter {
        title: "Sample Blog Post".into(),
        publication_time: published,
        modified_time: published,
        expiration_time: datetime("2025-01-15T09:00:00"),
        authors: vec![default_author()],
        tags: Vec::new(),
        section: "Technology".into(),
        description: None,
        thumbnail: None,
        image: Some("https://example.com/image.jpg".into()),
        language: "en".into(),
        draft: false,
    }
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(site: &'a Website, slug: &str) -> &'a BlogPost {
    site.blog
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.blog.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}
