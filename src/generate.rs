//! HTML rendering and output writing.
//!
//! Final stage of the build. Projects the assembled [`Website`] into view
//! models, renders each page through its two templates, and writes the
//! results below the output directory.
//!
//! ## Templates
//!
//! Every page has a complete template and a fragment (`_HX`) template:
//!
//! | Page | Complete | Fragment |
//! |------|----------|----------|
//! | Home | `INDEX` | `INDEX_HX` |
//! | Blog index | `BLOG_INDEX` | `BLOG_INDEX_HX` |
//! | Post | `BLOG_ARTICLE` | `BLOG_ARTICLE_HX` |
//!
//! The fragment is what htmx swaps into `#content`. The complete page wraps
//! the same fragment in a full document: `<head>` with Open Graph tags and
//! JSON-LD, the site header, and navigation. Every internal link carries
//! `hx-get` (fragment URL) and `hx-push-url` (complete URL), so the site works
//! as plain HTML and as a single-page app.
//!
//! ## Output Structure
//!
//! ```text
//! website/
//! ├── index.html           # Home (complete)
//! ├── index_hx.html        # Home (fragment)
//! ├── blog.html            # Blog index
//! ├── blog_hx.html
//! ├── blog/
//! │   ├── my-post.html     # Post (complete)
//! │   └── my-post.json     # Post view model for machine readers
//! └── blog_hx/
//!     └── my-post.html     # Post (fragment)
//! ```
//!
//! The output directory is removed and recreated once before anything is
//! written. A failure part-way leaves the pages written so far in place.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped except the pre-rendered Markdown bodies, the
//! stylesheet, and the JSON-LD blocks.

use crate::breadcrumbs::{BreadcrumbView, PageTemplate, TargetFiles};
use crate::files::{self, FileError};
use crate::navigation::NavigationMenu;
use crate::opengraph::MetaTag;
use crate::site::Website;
use crate::view::{BlogIndexView, HomeView, PageLinks, PostView, project_website};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CSS: &str = include_str!("../static/style.css");
const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";
/// Element fragments are swapped into.
const CONTENT_TARGET: &str = "#content";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("template {} cannot render {data} data", .template.id())]
    TemplateMismatch {
        template: PageTemplate,
        data: &'static str,
    },
}

/// The view model handed to a template.
#[derive(Debug, Clone, Copy)]
pub enum RenderData<'a> {
    Home(&'a HomeView),
    BlogIndex(&'a BlogIndexView),
    Post(&'a PostView),
}

impl RenderData<'_> {
    fn kind(&self) -> &'static str {
        match self {
            RenderData::Home(_) => "home",
            RenderData::BlogIndex(_) => "blog index",
            RenderData::Post(_) => "post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    BlogIndex,
    Post,
}

/// Files written for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub kind: PageKind,
    pub title: String,
    pub complete: PathBuf,
    pub hx: PathBuf,
    pub llm: Option<PathBuf>,
}

/// Everything a build wrote, for the CLI summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pages: Vec<WrittenPage>,
}

impl BuildReport {
    pub fn file_count(&self) -> usize {
        self.pages
            .iter()
            .map(|p| 2 + usize::from(p.llm.is_some()))
            .sum()
    }
}

/// Render every page of `site` into `output_dir`.
pub fn generate(site: &Website, output_dir: &Path) -> Result<BuildReport, GenerateError> {
    files::clean_and_recreate(output_dir)?;
    let view = project_website(site);

    let mut pages = Vec::with_capacity(view.posts.len() + 2);
    pages.push(write_pair(
        output_dir,
        PageKind::Home,
        &view.home.title,
        &view.home.targets,
        &view.home.links,
        RenderData::Home(&view.home),
    )?);
    pages.push(write_pair(
        output_dir,
        PageKind::BlogIndex,
        &view.blog.title,
        &view.blog.targets,
        &view.blog.links,
        RenderData::BlogIndex(&view.blog),
    )?);

    for post in &view.posts {
        let mut written = write_pair(
            output_dir,
            PageKind::Post,
            &post.title,
            &post.targets,
            &post.links,
            RenderData::Post(post),
        )?;
        if let Some(llm) = &post.targets.llm {
            let json = serde_json::to_string_pretty(post)?;
            written.llm = Some(files::write_page(output_dir, llm, &json)?);
        }
        pages.push(written);
    }

    tracing::info!(
        output = %output_dir.display(),
        pages = pages.len(),
        "site generated"
    );

    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        pages,
    })
}

fn write_pair(
    output_dir: &Path,
    kind: PageKind,
    title: &str,
    targets: &TargetFiles,
    links: &PageLinks,
    data: RenderData<'_>,
) -> Result<WrittenPage, GenerateError> {
    let complete = render(targets.complete.template, data)?;
    let hx = render(targets.hx.template, data)?;

    let complete_path = files::write_page(output_dir, &links.push_url, &complete.into_string())?;
    let hx_path = files::write_page(output_dir, &links.hx_url, &hx.into_string())?;
    tracing::debug!(page = title, complete = %links.push_url, hx = %links.hx_url, "wrote page");

    Ok(WrittenPage {
        kind,
        title: title.to_string(),
        complete: complete_path,
        hx: hx_path,
        llm: None,
    })
}

/// Render one template. The data must be the kind the template expects.
pub fn render(template: PageTemplate, data: RenderData<'_>) -> Result<Markup, GenerateError> {
    let markup = match (template, data) {
        (PageTemplate::Index, RenderData::Home(home)) => render_home_page(home),
        (PageTemplate::IndexHx, RenderData::Home(home)) => render_home_fragment(home),
        (PageTemplate::BlogIndex, RenderData::BlogIndex(blog)) => render_blog_index_page(blog),
        (PageTemplate::BlogIndexHx, RenderData::BlogIndex(blog)) => render_blog_index_fragment(blog),
        (PageTemplate::BlogArticle, RenderData::Post(post)) => render_post_page(post),
        (PageTemplate::BlogArticleHx, RenderData::Post(post)) => render_post_fragment(post),
        (template, data) => {
            return Err(GenerateError::TemplateMismatch {
                template,
                data: data.kind(),
            });
        }
    };
    Ok(markup)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Head contents shared by every complete page.
struct Head<'a> {
    title: &'a str,
    canonical: &'a str,
    meta: Vec<&'a MetaTag>,
    json_ld: Vec<&'a str>,
}

/// JSON embedded in a `<script>` must not close the element early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Renders the base HTML document structure
fn base_document(head: Head<'_>, header: Markup, fragment: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) }
                link rel="canonical" href=(head.canonical);
                @for tag in &head.meta {
                    meta property=(tag.property) content=(tag.content);
                }
                @for json in &head.json_ld {
                    script type="application/ld+json" { (PreEscaped(script_safe(json))) }
                }
                style { (PreEscaped(CSS)) }
                script src=(HTMX_SRC) defer {}
            }
            body {
                (header)
                main #content {
                    (fragment)
                }
            }
        }
    }
}

/// A link that works with and without htmx.
fn hx_link(label: &str, links: &PageLinks) -> Markup {
    html! {
        a href=(links.push_url) hx-get=(links.hx_url) hx-push-url=(links.push_url) hx-target=(CONTENT_TARGET) {
            (label)
        }
    }
}

/// Renders the site header with the site title and navigation
fn site_header(site_title: &str, menu: &NavigationMenu) -> Markup {
    html! {
        header.site-header {
            span.site-title { (site_title) }
            (render_nav(menu))
        }
    }
}

/// Renders the navigation menu, marking the active section
pub fn render_nav(menu: &NavigationMenu) -> Markup {
    html! {
        nav.site-nav {
            ul {
                @for section in &menu.sections {
                    li class=[section.active.then_some("current")] {
                        a href=(section.path)
                            hx-get=(section.hx_get)
                            hx-push-url=(section.path)
                            hx-target=(CONTENT_TARGET) {
                            (section.title)
                        }
                    }
                }
            }
        }
    }
}

/// Renders the breadcrumb trail. The last item is the current page.
pub fn render_breadcrumbs(view: &BreadcrumbView) -> Markup {
    let last = view.items.len().saturating_sub(1);
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            ol {
                @for (i, item) in view.items.iter().enumerate() {
                    li {
                        @if i > 0 {
                            span.separator aria-hidden="true" { (view.separator) }
                        }
                        @if i == last {
                            span aria-current="page" { (item.name) }
                        } @else {
                            a href=(item.push_url)
                                hx-get=(item.get_resource)
                                hx-push-url=(item.push_url)
                                hx-target=(CONTENT_TARGET) {
                                (item.name)
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home_fragment(home: &HomeView) -> Markup {
    html! {
        (render_breadcrumbs(&home.breadcrumbs))
        article.home {
            (PreEscaped(&home.contents))
        }
    }
}

fn render_home_page(home: &HomeView) -> Markup {
    let head = Head {
        title: &home.site_title,
        canonical: &home.links.url,
        meta: home.opengraph.iter().collect(),
        json_ld: vec![home.breadcrumbs.json_ld.as_str()],
    };
    base_document(
        head,
        site_header(&home.site_title, &home.navigation),
        render_home_fragment(home),
    )
}

fn render_blog_index_fragment(blog: &BlogIndexView) -> Markup {
    html! {
        (render_breadcrumbs(&blog.breadcrumbs))
        section.blog-index {
            h1 { (blog.title) }
            @if !blog.description.is_empty() {
                p.description { (blog.description) }
            }
            @if blog.posts.is_empty() {
                p.empty { "Nothing published yet." }
            } @else {
                ul.post-list {
                    @for post in &blog.posts {
                        li.post-card {
                            @if let Some(thumbnail) = &post.thumbnail {
                                img.thumbnail src=(thumbnail) alt=(post.title) loading="lazy";
                            }
                            h2 { (hx_link(&post.title, &post.links)) }
                            p.post-meta {
                                time datetime=(post.date) { (post.date) }
                                " · " (post.reading_time)
                            }
                            @if let Some(description) = &post.description {
                                p.description { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_blog_index_page(blog: &BlogIndexView) -> Markup {
    let title = format!("{} · {}", blog.title, blog.site_title);
    let head = Head {
        title: &title,
        canonical: &blog.links.url,
        meta: blog.opengraph.iter().collect(),
        json_ld: vec![blog.breadcrumbs.json_ld.as_str()],
    };
    base_document(
        head,
        site_header(&blog.site_title, &blog.navigation),
        render_blog_index_fragment(blog),
    )
}

fn render_post_fragment(post: &PostView) -> Markup {
    html! {
        (render_breadcrumbs(&post.breadcrumbs))
        article.post {
            header.post-header {
                h1 { (post.title) }
                p.post-meta {
                    time datetime=(post.date) { (post.date) }
                    " · " (post.reading_time)
                    " · " span.section { (post.section) }
                }
                @if !post.tags.is_empty() {
                    ul.tags {
                        @for tag in &post.tags {
                            li { (tag) }
                        }
                    }
                }
            }
            div.post-body {
                (PreEscaped(&post.contents))
            }
            footer.post-footer {
                "By "
                @for (i, author) in post.authors.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(author.url) rel="author" { (author.first_name) " " (author.last_name) }
                }
            }
        }
    }
}

fn render_post_page(post: &PostView) -> Markup {
    let title = format!("{} · {}", post.title, post.site_title);
    let head = Head {
        title: &title,
        canonical: &post.links.url,
        meta: post.opengraph.iter().chain(&post.article_opengraph).collect(),
        json_ld: vec![post.breadcrumbs.json_ld.as_str(), post.article_json_ld.as_str()],
    };
    base_document(
        head,
        site_header(&post.site_title, &post.navigation),
        render_post_fragment(post),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::assemble_website;
    use crate::test_helpers::{blog_file, sample_post_markdown, site_config};
    use crate::view::project_website;
    use std::fs;
    use tempfile::TempDir;

    fn sample_site() -> Website {
        let config = site_config(vec![
            blog_file("hello_world.md", &sample_post_markdown("Hello World", "2023-01-15T09:00:00")),
            blog_file("second.md", &sample_post_markdown("Second <Post>", "2023-02-15T09:00:00")),
        ]);
        assemble_website(&config).unwrap()
    }

    // =========================================================================
    // Templates
    // =========================================================================

    #[test]
    fn complete_page_is_full_document() {
        let view = project_website(&sample_site());
        let html = render(PageTemplate::Index, RenderData::Home(&view.home))
            .unwrap()
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<meta property="og:title" content="Example">"#));
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert!(html.contains(r#"<main id="content">"#));
        assert!(html.contains(HTMX_SRC));
    }

    #[test]
    fn fragment_has_no_document_shell() {
        let view = project_website(&sample_site());
        let html = render(PageTemplate::IndexHx, RenderData::Home(&view.home))
            .unwrap()
            .into_string();
        assert!(!html.contains("<html"));
        assert!(!html.contains("<head>"));
        assert!(html.contains("<h1>Welcome</h1>"));
    }

    #[test]
    fn mismatched_template_is_error() {
        let view = project_website(&sample_site());
        let result = render(PageTemplate::BlogArticle, RenderData::Home(&view.home));
        assert!(matches!(
            result,
            Err(GenerateError::TemplateMismatch {
                template: PageTemplate::BlogArticle,
                data: "home"
            })
        ));
    }

    #[test]
    fn blog_index_links_posts_with_htmx() {
        let view = project_website(&sample_site());
        let html = render(PageTemplate::BlogIndexHx, RenderData::BlogIndex(&view.blog))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"href="/blog/hello-world.html""#));
        assert!(html.contains(r#"hx-get="/blog_hx/hello-world.html""#));
        assert!(html.contains(r#"hx-push-url="/blog/hello-world.html""#));
    }

    #[test]
    fn post_page_carries_article_metadata() {
        let view = project_website(&sample_site());
        let post = view.posts.iter().find(|p| p.slug == "hello-world").unwrap();
        let html = render(PageTemplate::BlogArticle, RenderData::Post(post))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"property="og:article:published_time" content="2023-01-15T09:00:00""#));
        assert!(html.contains(r#""@type":"Article""#));
        assert!(html.contains(r#"<span aria-current="page">Hello World</span>"#));
    }

    #[test]
    fn titles_are_escaped() {
        let view = project_website(&sample_site());
        let post = view.posts.iter().find(|p| p.slug == "second").unwrap();
        let html = render(PageTemplate::BlogArticleHx, RenderData::Post(post))
            .unwrap()
            .into_string();
        assert!(html.contains("Second &lt;Post&gt;"));
    }

    #[test]
    fn nav_marks_active_section() {
        let view = project_website(&sample_site());
        let html = render_nav(&view.blog.navigation).into_string();
        assert!(html.contains(r#"<li class="current"><a href="/blog.html""#));
        assert!(html.contains(r#"hx-get="/index_hx.html""#));
    }

    #[test]
    fn script_safe_escapes_closing_tags() {
        assert_eq!(script_safe(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn generate_writes_every_target() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("website");
        let report = generate(&sample_site(), &out).unwrap();

        for path in [
            "index.html",
            "index_hx.html",
            "blog.html",
            "blog_hx.html",
            "blog/hello-world.html",
            "blog_hx/hello-world.html",
            "blog/hello-world.json",
            "blog/second.html",
        ] {
            assert!(out.join(path).is_file(), "missing {path}");
        }
        assert_eq!(report.pages.len(), 4);
        assert_eq!(report.file_count(), 10);
    }

    #[test]
    fn generate_cleans_stale_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("website");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "old").unwrap();

        generate(&sample_site(), &out).unwrap();
        assert!(!out.join("stale.html").exists());
    }

    #[test]
    fn llm_artifact_is_post_view_json() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("website");
        generate(&sample_site(), &out).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("blog/hello-world.json")).unwrap()).unwrap();
        assert_eq!(json["title"], "Hello World");
        assert_eq!(json["links"]["hx_url"], "/blog_hx/hello-world.html");
        assert_eq!(json["reading_time"], "1 min");
    }
}
