//! Flatten the assembled page tree into plain, serializable view models.
//!
//! Templates never walk breadcrumb chains or build URLs. Everything they
//! print is precomputed here: link targets for `hx-get` and `hx-push-url`,
//! Open Graph meta tags in emission order, and JSON-LD as ready-to-embed
//! strings. The post view doubles as the post's `llm` JSON artifact.

use crate::breadcrumbs::{
    Breadcrumb, BreadcrumbView, TargetFiles, breadcrumb_view_model, generate_hx_url, generate_url,
};
use crate::navigation::NavigationMenu;
use crate::opengraph::{Author, MetaTag, article_tags, opengraph_tags};
use crate::site::{Blog, BlogPost, HomePage, Website, article_json_ld};
use serde::Serialize;

const BREADCRUMB_SEPARATOR: &str = "/";

/// Links for one page: where the browser should show it, and what htmx fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Canonical URL with the site base.
    pub url: String,
    /// Root-relative complete page for `hx-push-url`.
    pub push_url: String,
    /// Root-relative fragment for `hx-get`.
    pub hx_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub site_title: String,
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub resource_path: String,
    pub links: PageLinks,
    pub contents: String,
    pub navigation: NavigationMenu,
    pub breadcrumbs: BreadcrumbView,
    pub opengraph: Vec<MetaTag>,
    pub targets: TargetFiles,
}

/// A post as listed on the blog index.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummaryView {
    pub title: String,
    pub date: String,
    pub reading_time: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub links: PageLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogIndexView {
    pub site_title: String,
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub resource_path: String,
    pub links: PageLinks,
    pub navigation: NavigationMenu,
    pub breadcrumbs: BreadcrumbView,
    pub opengraph: Vec<MetaTag>,
    pub targets: TargetFiles,
    pub posts: Vec<PostSummaryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub site_title: String,
    pub title: String,
    pub slug: String,
    pub date: String,
    pub reading_time: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub section: String,
    pub tags: Vec<String>,
    pub authors: Vec<Author>,
    pub contents: String,
    pub base_url: String,
    pub resource_path: String,
    pub links: PageLinks,
    pub navigation: NavigationMenu,
    pub breadcrumbs: BreadcrumbView,
    pub opengraph: Vec<MetaTag>,
    pub article_opengraph: Vec<MetaTag>,
    /// schema.org `Article`, serialized.
    pub article_json_ld: String,
    pub targets: TargetFiles,
}

/// Every page of the site, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub home: HomeView,
    pub blog: BlogIndexView,
    pub posts: Vec<PostView>,
}

fn links(crumb: &Breadcrumb, base_url: &str) -> PageLinks {
    PageLinks {
        url: generate_url(crumb, base_url),
        push_url: generate_url(crumb, ""),
        hx_url: generate_hx_url(crumb, ""),
    }
}

pub fn home_view(home: &HomePage, site_title: &str) -> HomeView {
    HomeView {
        site_title: site_title.to_string(),
        title: home.title.clone(),
        description: home.description.clone(),
        base_url: home.base_url.clone(),
        resource_path: home.resource_path.clone(),
        links: links(&home.breadcrumbs, &home.base_url),
        contents: home.contents.clone(),
        navigation: home.navigation.clone(),
        breadcrumbs: breadcrumb_view_model(&home.breadcrumbs, &home.base_url, true, BREADCRUMB_SEPARATOR),
        opengraph: opengraph_tags(&home.opengraph),
        targets: home.targets.clone(),
    }
}

pub fn post_summary(post: &BlogPost) -> PostSummaryView {
    PostSummaryView {
        title: post.title.clone(),
        date: post.date.clone(),
        reading_time: post.reading_time.clone(),
        description: post.description.clone(),
        thumbnail: post.thumbnail.clone(),
        links: links(&post.breadcrumbs, &post.base_url),
    }
}

pub fn blog_index_view(blog: &Blog, site_title: &str) -> BlogIndexView {
    BlogIndexView {
        site_title: site_title.to_string(),
        title: blog.title.clone(),
        description: blog.description.clone(),
        base_url: blog.base_url.clone(),
        resource_path: blog.resource_path.clone(),
        links: links(&blog.breadcrumbs, &blog.base_url),
        navigation: blog.navigation.clone(),
        breadcrumbs: breadcrumb_view_model(&blog.breadcrumbs, &blog.base_url, true, BREADCRUMB_SEPARATOR),
        opengraph: opengraph_tags(&blog.opengraph),
        targets: blog.targets.clone(),
        posts: blog.posts.iter().map(post_summary).collect(),
    }
}

pub fn post_view(post: &BlogPost, site: &Website) -> PostView {
    PostView {
        site_title: site.website.title.clone(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        date: post.date.clone(),
        reading_time: post.reading_time.clone(),
        description: post.description.clone(),
        thumbnail: post.thumbnail.clone(),
        section: post.article.section.clone(),
        tags: post.article.tags.clone(),
        authors: post.article.authors.clone(),
        contents: post.contents.clone(),
        base_url: post.base_url.clone(),
        resource_path: post.resource_path.clone(),
        links: links(&post.breadcrumbs, &post.base_url),
        navigation: post.navigation.clone(),
        breadcrumbs: breadcrumb_view_model(&post.breadcrumbs, &post.base_url, true, BREADCRUMB_SEPARATOR),
        opengraph: opengraph_tags(&post.opengraph),
        article_opengraph: article_tags(&post.article),
        article_json_ld: article_json_ld(post, &site.website).to_string(),
        targets: post.targets.clone(),
    }
}

pub fn project_website(site: &Website) -> SiteView {
    SiteView {
        home: home_view(&site.home, &site.website.title),
        blog: blog_index_view(&site.blog, &site.website.title),
        posts: site.blog.posts.iter().map(|post| post_view(post, site)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::assemble_website;
    use crate::test_helpers::{blog_file, sample_post_markdown, site_config};

    fn sample_site() -> Website {
        let config = site_config(vec![
            blog_file("first_post.md", &sample_post_markdown("First", "2023-01-15T09:00:00")),
            blog_file("second.md", &sample_post_markdown("Second", "2023-03-01T09:00:00")),
        ]);
        assemble_website(&config).unwrap()
    }

    #[test]
    fn home_view_links() {
        let view = project_website(&sample_site());
        assert_eq!(view.home.links.push_url, "/index.html");
        assert_eq!(view.home.links.hx_url, "/index_hx.html");
        assert_eq!(view.home.links.url, "https://example.com/index.html");
        assert_eq!(view.home.site_title, "Example");
    }

    #[test]
    fn blog_index_lists_posts_newest_first() {
        let view = project_website(&sample_site());
        let titles: Vec<&str> = view.blog.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_eq!(view.blog.posts[1].links.push_url, "/blog/first-post.html");
        assert_eq!(view.blog.posts[1].links.hx_url, "/blog_hx/first-post.html");
    }

    #[test]
    fn post_view_carries_meta_and_breadcrumbs() {
        let view = project_website(&sample_site());
        let post = view.posts.iter().find(|p| p.slug == "first-post").unwrap();

        assert_eq!(post.opengraph[0].property, "og:title");
        assert_eq!(post.article_opengraph[0].property, "og:article:published_time");
        let names: Vec<&str> = post.breadcrumbs.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Example", "Blog", "First"]);
        assert!(post.article_json_ld.contains("\"@type\":\"Article\""));
    }

    #[test]
    fn post_view_serializes_for_llm_artifact() {
        let view = project_website(&sample_site());
        let json = serde_json::to_value(&view.posts[0]).unwrap();
        assert_eq!(json["title"], "Second");
        assert_eq!(json["targets"]["complete"]["template"], "BLOG_ARTICLE");
        assert_eq!(json["targets"]["llm"], "/blog/second.json");
    }
}
