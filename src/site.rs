//! Page-tree assembly.
//!
//! Turns a validated [`SiteConfig`], whose section sources are already in
//! memory, into a [`Website`]: the home page, the blog index, and every blog
//! post, each with its breadcrumb chain, navigation snapshot, Open Graph
//! metadata, and the pair of output targets (complete page and htmx fragment).
//!
//! ## Page Tree
//!
//! ```text
//! root ("", site title)            transparent, never rendered
//! ├── home  ("/index")             → /index.html        /index_hx.html
//! └── blog  ("/blog")              → /blog.html         /blog_hx.html
//!     └── post ("my-post")         → /blog/my-post.html /blog_hx/my-post.html
//!                                    /blog/my-post.json
//! ```
//!
//! The `home` section must read from a single file and the `blog` section
//! from a directory. Assembly is all-or-nothing: the first post that fails
//! front matter, Open Graph, or breadcrumb construction aborts the build with
//! an error naming its file. Drafts are skipped unless the config includes
//! them. Posts are ordered newest first.

use crate::breadcrumbs::{
    Breadcrumb, PageTemplate, TargetFiles, Template, generate_hx_url, generate_url, resource_path,
};
use crate::config::{ReadFrom, Section, SiteConfig, WebsiteInfo};
use crate::files::FileData;
use crate::frontmatter::{self, FrontMatterError, PublishTime};
use crate::naming;
use crate::navigation::{NavigationMenu, create_navigation_menu, section_destination};
use crate::opengraph::{self, OpenGraph, OpenGraphArticle, OpenGraphError};
use pulldown_cmark::{Parser, html as md_html};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

pub const HOME_SECTION: &str = "home";
pub const BLOG_SECTION: &str = "blog";

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("section `{0}` is not configured")]
    MissingSection(&'static str),
    #[error("section `{section}` must read from a {expected} source, not {found}")]
    ReadFromMismatch {
        section: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{}: {source}", .file.display())]
    FrontMatter {
        file: PathBuf,
        #[source]
        source: FrontMatterError,
    },
    #[error("{}: {source}", .file.display())]
    PostOpenGraph {
        file: PathBuf,
        #[source]
        source: OpenGraphError,
    },
    #[error("section `{section}`: {source}")]
    SectionOpenGraph {
        section: &'static str,
        #[source]
        source: OpenGraphError,
    },
    #[error("section `{section}` has no usable resource_path (`{path}`)")]
    EmptySectionPath { section: &'static str, path: String },
    #[error("{}: file name does not produce a usable slug", .file.display())]
    EmptySlug { file: PathBuf },
    #[error("{} and {} both map to slug `{slug}`", .first.display(), .second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// The assembled site.
#[derive(Debug, Clone)]
pub struct Website {
    pub base_url: String,
    pub website: WebsiteInfo,
    pub home: HomePage,
    pub blog: Blog,
}

#[derive(Debug, Clone)]
pub struct HomePage {
    pub title: String,
    pub description: String,
    /// Root-relative path without extension, e.g. `/index`.
    pub resource_path: String,
    /// Canonical URL.
    pub url: String,
    pub base_url: String,
    pub breadcrumbs: Rc<Breadcrumb>,
    pub targets: TargetFiles,
    pub contents: String,
    pub navigation: NavigationMenu,
    pub opengraph: OpenGraph,
}

#[derive(Debug, Clone)]
pub struct Blog {
    pub title: String,
    pub description: String,
    pub resource_path: String,
    pub url: String,
    pub base_url: String,
    pub breadcrumbs: Rc<Breadcrumb>,
    pub targets: TargetFiles,
    pub navigation: NavigationMenu,
    pub opengraph: OpenGraph,
    /// Newest first.
    pub posts: Vec<BlogPost>,
}

#[derive(Debug, Clone)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    /// Publication time, ISO 8601.
    pub date: String,
    pub publication_time: PublishTime,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub reading_time: String,
    /// Rendered HTML body.
    pub contents: String,
    pub resource_path: String,
    pub url: String,
    pub base_url: String,
    pub breadcrumbs: Rc<Breadcrumb>,
    pub targets: TargetFiles,
    pub navigation: NavigationMenu,
    pub opengraph: OpenGraph,
    pub article: OpenGraphArticle,
    pub source: PathBuf,
}

/// Render Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Build the whole page tree, or fail on the first broken page.
pub fn assemble_website(config: &SiteConfig) -> Result<Website, AssemblyError> {
    let root = Rc::new(
        Breadcrumb::new("", &config.website.title, None).with_targets(section_targets(
            "index",
            PageTemplate::Index,
            PageTemplate::IndexHx,
        )),
    );

    let home = assemble_home(config, &root)?;
    let blog = assemble_blog(config, &root)?;

    tracing::info!(posts = blog.posts.len(), "assembled site");

    Ok(Website {
        base_url: config.base_url.clone(),
        website: config.website.clone(),
        home,
        blog,
    })
}

fn section<'a>(config: &'a SiteConfig, key: &'static str) -> Result<&'a Section, AssemblyError> {
    config
        .sections
        .get(key)
        .ok_or(AssemblyError::MissingSection(key))
}

fn index_destination(key: &'static str, section: &Section) -> Result<String, AssemblyError> {
    section_destination(key, &section.resource_path).ok_or_else(|| AssemblyError::EmptySectionPath {
        section: key,
        path: section.resource_path.clone(),
    })
}

/// Complete page at `destination`, fragment at `destination_hx`.
fn section_targets(destination: &str, complete: PageTemplate, hx: PageTemplate) -> TargetFiles {
    TargetFiles {
        complete: Template::new(destination, complete, "html"),
        hx: Template::new(format!("{destination}_hx"), hx, "html"),
        llm: None,
    }
}

fn assemble_home(config: &SiteConfig, root: &Rc<Breadcrumb>) -> Result<HomePage, AssemblyError> {
    let home = section(config, HOME_SECTION)?;
    let file = match &home.read_from {
        ReadFrom::Singular { file, .. } => file,
        other => {
            return Err(AssemblyError::ReadFromMismatch {
                section: HOME_SECTION,
                expected: "singular",
                found: other.kind(),
            });
        }
    };

    let destination = index_destination(HOME_SECTION, home)?;
    let targets = section_targets(&destination, PageTemplate::Index, PageTemplate::IndexHx);
    let crumb = Rc::new(
        Breadcrumb::new(&destination, &home.title, Some(Rc::clone(root)))
            .with_targets(targets.clone()),
    );

    let (_, body) = frontmatter::split_front_matter(&file.contents).map_err(|source| {
        AssemblyError::FrontMatter {
            file: file.path.clone(),
            source,
        }
    })?;

    let url = generate_url(&crumb, &config.base_url);
    let opengraph = opengraph::website_opengraph(
        &config.website,
        &config.website.title,
        &config.website.description,
        &url,
    )
    .map_err(|source| AssemblyError::SectionOpenGraph {
        section: HOME_SECTION,
        source,
    })?;

    Ok(HomePage {
        title: home.title.clone(),
        description: home.description.clone(),
        resource_path: resource_path(&crumb),
        url,
        base_url: config.base_url.clone(),
        breadcrumbs: crumb,
        targets,
        contents: markdown_to_html(&body),
        navigation: create_navigation_menu(config, HOME_SECTION),
        opengraph,
    })
}

fn assemble_blog(config: &SiteConfig, root: &Rc<Breadcrumb>) -> Result<Blog, AssemblyError> {
    let blog = section(config, BLOG_SECTION)?;
    let files = match &blog.read_from {
        ReadFrom::Plural { files, .. } => files,
        other => {
            return Err(AssemblyError::ReadFromMismatch {
                section: BLOG_SECTION,
                expected: "plural",
                found: other.kind(),
            });
        }
    };

    let destination = index_destination(BLOG_SECTION, blog)?;
    let targets = section_targets(&destination, PageTemplate::BlogIndex, PageTemplate::BlogIndexHx);
    let crumb = Rc::new(
        Breadcrumb::new(&destination, &blog.title, Some(Rc::clone(root)))
            .with_targets(targets.clone()),
    );
    let url = generate_url(&crumb, &config.base_url);
    let opengraph = opengraph::website_opengraph(&config.website, &blog.title, &blog.description, &url)
        .map_err(|source| AssemblyError::SectionOpenGraph {
            section: BLOG_SECTION,
            source,
        })?;

    let mut posts = Vec::with_capacity(files.len());
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for file in files {
        let Some(post) = assemble_post(config, file, &crumb)? else {
            continue;
        };
        if let Some(first) = seen.insert(post.slug.clone(), file.path.clone()) {
            return Err(AssemblyError::DuplicateSlug {
                slug: post.slug,
                first,
                second: file.path.clone(),
            });
        }
        posts.push(post);
    }
    posts.sort_by(|a, b| {
        b.publication_time
            .cmp(&a.publication_time)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    Ok(Blog {
        title: blog.title.clone(),
        description: blog.description.clone(),
        resource_path: resource_path(&crumb),
        url,
        base_url: config.base_url.clone(),
        breadcrumbs: crumb,
        targets,
        navigation: create_navigation_menu(config, BLOG_SECTION),
        opengraph,
        posts,
    })
}

/// One post, or `None` for a draft the config leaves out.
fn assemble_post(
    config: &SiteConfig,
    file: &FileData,
    blog_crumb: &Rc<Breadcrumb>,
) -> Result<Option<BlogPost>, AssemblyError> {
    let front_matter_err = |source| AssemblyError::FrontMatter {
        file: file.path.clone(),
        source,
    };
    let (metadata, body) = frontmatter::split_front_matter(&file.contents).map_err(front_matter_err)?;
    let front_matter = frontmatter::parse_front_matter(&metadata, config.settings.expiration_days)
        .map_err(front_matter_err)?;

    if front_matter.draft && !config.settings.include_drafts {
        tracing::info!(file = %file.path.display(), "skipping draft");
        return Ok(None);
    }

    let slug = naming::slug_from_file_name(&file.file_name);
    if slug.is_empty() {
        return Err(AssemblyError::EmptySlug {
            file: file.path.clone(),
        });
    }

    let mut targets = TargetFiles {
        complete: Template::new(&slug, PageTemplate::BlogArticle, "html"),
        hx: Template::new(&slug, PageTemplate::BlogArticleHx, "html"),
        llm: None,
    };
    let crumb = Rc::new(
        Breadcrumb::new(&slug, &front_matter.title, Some(Rc::clone(blog_crumb)))
            .with_targets(targets.clone()),
    );
    let path = resource_path(&crumb);
    targets.llm = Some(format!("{path}.json"));

    let url = generate_url(&crumb, &config.base_url);
    let opengraph = opengraph::post_opengraph(&front_matter, &url, &config.website.title).map_err(|source| {
        AssemblyError::PostOpenGraph {
            file: file.path.clone(),
            source,
        }
    })?;
    let article = opengraph::post_article(&front_matter);

    tracing::debug!(slug = %slug, hx = %generate_hx_url(&crumb, ""), "assembled post");

    Ok(Some(BlogPost {
        title: front_matter.title.clone(),
        slug,
        date: front_matter.publication_time.iso_format(),
        publication_time: front_matter.publication_time,
        description: front_matter.description.clone(),
        thumbnail: front_matter.thumbnail.clone(),
        reading_time: frontmatter::estimate_reading_time(&body),
        contents: markdown_to_html(&body),
        resource_path: path,
        url,
        base_url: config.base_url.clone(),
        breadcrumbs: crumb,
        targets,
        navigation: create_navigation_menu(config, BLOG_SECTION),
        opengraph,
        article,
        source: file.path.clone(),
    }))
}

/// schema.org `Article` for a post.
pub fn article_json_ld(post: &BlogPost, website: &WebsiteInfo) -> Value {
    let authors: Vec<Value> = post
        .article
        .authors
        .iter()
        .map(|author| {
            json!({
                "@type": "Person",
                "name": author.full_name(),
                "url": author.url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "image": post.opengraph.image,
        "author": authors,
        "datePublished": post.article.publication_time.iso_format(),
        "dateModified": post.article.modified_time.iso_format(),
        "publisher": {
            "@type": "Organization",
            "name": website.title,
            "logo": website.image,
        },
        "mainEntityOfPage": post.url,
    })
}
