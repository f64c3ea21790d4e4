//! Open Graph metadata for pages and articles.
//!
//! [`OpenGraph`] is the page-level record every page carries (home, blog
//! index, each post). [`OpenGraphArticle`] adds the `og:article:*` fields a
//! post carries on top. Both flatten to an ordered list of [`MetaTag`]s that
//! templates emit verbatim as `<meta property=… content=…>`.
//!
//! Tag order is fixed: required properties, then the optional ones that are
//! set, then locale alternates. Articles list their timestamps and section
//! before one tag per author and one per tag.

use crate::config::WebsiteInfo;
use crate::frontmatter::{FrontMatter, PublishTime};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OpenGraphError {
    #[error("an image is required for Open Graph metadata")]
    MissingImage,
    #[error("Open Graph `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// <https://ogp.me/#type_profile>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub url: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    Website,
    Article,
}

impl OgType {
    pub fn as_str(self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
        }
    }
}

/// Page-level Open Graph record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGraph {
    pub title: String,
    pub og_type: OgType,
    pub image: String,
    /// Canonical URL of the page.
    pub url: String,
    pub locale: String,
    pub audio: Option<String>,
    pub description: Option<String>,
    pub determiner: Option<String>,
    pub site_name: Option<String>,
    pub video: Option<String>,
    pub locale_alternate: Vec<String>,
}

/// Article-level additions for posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGraphArticle {
    pub publication_time: PublishTime,
    pub modified_time: PublishTime,
    pub expiration_time: PublishTime,
    pub authors: Vec<Author>,
    pub section: String,
    pub tags: Vec<String>,
}

/// One `<meta property=… content=…>` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub property: &'static str,
    pub content: String,
}

impl MetaTag {
    fn new(property: &'static str, content: impl Into<String>) -> Self {
        Self {
            property,
            content: content.into(),
        }
    }
}

/// Open Graph for a section page (home, blog index), built from site info.
pub fn website_opengraph(
    website: &WebsiteInfo,
    title: &str,
    description: &str,
    url: &str,
) -> Result<OpenGraph, OpenGraphError> {
    if website.image.is_empty() {
        return Err(OpenGraphError::MissingImage);
    }
    if title.is_empty() {
        return Err(OpenGraphError::EmptyField("title"));
    }
    Ok(OpenGraph {
        title: title.to_string(),
        og_type: OgType::Website,
        image: website.image.clone(),
        url: url.to_string(),
        locale: website.locale.clone(),
        audio: None,
        description: Some(description.to_string()).filter(|d| !d.is_empty()),
        determiner: None,
        site_name: Some(website.title.clone()).filter(|s| !s.is_empty()),
        video: None,
        locale_alternate: Vec::new(),
    })
}

/// Open Graph for a post. The post must name an image.
pub fn post_opengraph(
    front_matter: &FrontMatter,
    url: &str,
    site_name: &str,
) -> Result<OpenGraph, OpenGraphError> {
    let image = front_matter
        .image
        .clone()
        .ok_or(OpenGraphError::MissingImage)?;
    Ok(OpenGraph {
        title: front_matter.title.clone(),
        og_type: OgType::Article,
        image,
        url: url.to_string(),
        locale: front_matter.language.clone(),
        audio: None,
        description: front_matter.description.clone(),
        determiner: None,
        site_name: Some(site_name.to_string()).filter(|s| !s.is_empty()),
        video: None,
        locale_alternate: Vec::new(),
    })
}

pub fn post_article(front_matter: &FrontMatter) -> OpenGraphArticle {
    OpenGraphArticle {
        publication_time: front_matter.publication_time,
        modified_time: front_matter.modified_time,
        expiration_time: front_matter.expiration_time,
        authors: front_matter.authors.clone(),
        section: front_matter.section.clone(),
        tags: front_matter.tags.clone(),
    }
}

pub fn opengraph_tags(og: &OpenGraph) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::new("og:title", &og.title),
        MetaTag::new("og:type", og.og_type.as_str()),
        MetaTag::new("og:image", &og.image),
        MetaTag::new("og:url", &og.url),
        MetaTag::new("og:locale", &og.locale),
    ];

    let optional = [
        ("og:audio", &og.audio),
        ("og:description", &og.description),
        ("og:determiner", &og.determiner),
        ("og:site_name", &og.site_name),
        ("og:video", &og.video),
    ];
    tags.extend(
        optional
            .into_iter()
            .filter_map(|(property, value)| value.as_ref().map(|v| MetaTag::new(property, v))),
    );

    tags.extend(
        og.locale_alternate
            .iter()
            .map(|locale| MetaTag::new("og:locale:alternate", locale)),
    );
    tags
}

pub fn article_tags(article: &OpenGraphArticle) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::new("og:article:published_time", article.publication_time.iso_format()),
        MetaTag::new("og:article:modified_time", article.modified_time.iso_format()),
        MetaTag::new("og:article:expiration_time", article.expiration_time.iso_format()),
        MetaTag::new("og:article:section", &article.section),
    ];
    tags.extend(
        article
            .authors
            .iter()
            .map(|author| MetaTag::new("og:article:author", &author.url)),
    );
    tags.extend(article.tags.iter().map(|tag| MetaTag::new("og:article:tag", tag)));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_front_matter, sample_website};

    fn properties(tags: &[MetaTag]) -> Vec<&str> {
        tags.iter().map(|t| t.property).collect()
    }

    #[test]
    fn website_opengraph_uses_site_info() {
        let og = website_opengraph(&sample_website(), "Home", "Landing", "https://example.com/").unwrap();
        assert_eq!(og.og_type, OgType::Website);
        assert_eq!(og.image, "https://example.com/image.png");
        assert_eq!(og.locale, "en_US");
        assert_eq!(og.site_name.as_deref(), Some("Example"));
        assert_eq!(og.description.as_deref(), Some("Landing"));
    }

    #[test]
    fn website_opengraph_requires_image() {
        let mut website = sample_website();
        website.image.clear();
        let result = website_opengraph(&website, "Home", "", "/");
        assert_eq!(result, Err(OpenGraphError::MissingImage));
    }

    #[test]
    fn post_opengraph_requires_image() {
        let mut fm = sample_front_matter();
        fm.image = None;
        let result = post_opengraph(&fm, "https://example.com/blog/post.html", "Example");
        assert_eq!(result, Err(OpenGraphError::MissingImage));
    }

    #[test]
    fn post_opengraph_is_article_in_post_language() {
        let mut fm = sample_front_matter();
        fm.language = "pt".into();
        let og = post_opengraph(&fm, "https://example.com/blog/post.html", "Example").unwrap();
        assert_eq!(og.og_type, OgType::Article);
        assert_eq!(og.locale, "pt");
        assert_eq!(og.url, "https://example.com/blog/post.html");
    }

    #[test]
    fn required_tags_come_first_then_set_optionals() {
        let og = website_opengraph(&sample_website(), "Home", "Landing", "/").unwrap();
        assert_eq!(
            properties(&opengraph_tags(&og)),
            vec![
                "og:title",
                "og:type",
                "og:image",
                "og:url",
                "og:locale",
                "og:description",
                "og:site_name",
            ]
        );
    }

    #[test]
    fn locale_alternates_come_last() {
        let mut og = website_opengraph(&sample_website(), "Home", "", "/").unwrap();
        og.audio = Some("/a.mp3".into());
        og.locale_alternate = vec!["pt_PT".into(), "fr_FR".into()];
        let tags = opengraph_tags(&og);
        let props = properties(&tags);
        assert_eq!(props[5], "og:audio");
        assert_eq!(
            props[props.len() - 2..].to_vec(),
            vec!["og:locale:alternate", "og:locale:alternate"]
        );
    }

    #[test]
    fn article_tags_list_authors_and_tags() {
        let mut fm = sample_front_matter();
        fm.tags = vec!["rust".into(), "web".into()];
        let tags = article_tags(&post_article(&fm));
        assert_eq!(
            properties(&tags),
            vec![
                "og:article:published_time",
                "og:article:modified_time",
                "og:article:expiration_time",
                "og:article:section",
                "og:article:author",
                "og:article:tag",
                "og:article:tag",
            ]
        );
        assert_eq!(tags[0].content, "2023-01-15T09:00:00");
        assert_eq!(tags[2].content, "2025-01-15T09:00:00");
        assert_eq!(tags[4].content, "https://portugapt.github.io/about");
    }
}
