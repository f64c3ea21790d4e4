//! Breadcrumb chains and URL composition.
//!
//! Every page owns a [`Breadcrumb`] whose `previous` link points at its parent
//! page, all the way up to the root. Chains are built bottom-up from parents
//! that already exist, so they are finite and acyclic, and siblings share
//! their ancestors through [`Rc`].
//!
//! From a chain this module derives:
//!
//! - the ordered path [`Segment`]s, root first ([`segments_from_root`])
//! - the canonical page URL ([`generate_url`]) and the fragment URL
//!   htmx fetches ([`generate_hx_url`])
//! - a schema.org `BreadcrumbList` ([`to_json_ld`])
//! - the template-facing [`BreadcrumbView`] ([`breadcrumb_view_model`])
//!
//! ## Path Rules
//!
//! Walking from leaf to root, each node's `path` decides what it contributes:
//!
//! | `path` | Contribution |
//! |--------|--------------|
//! | starts with `http` | one absolute segment; ancestors above it are dropped |
//! | empty once `/` is trimmed | nothing; the walk continues upward |
//! | anything else | one relative segment |
//!
//! A relative segment takes its values from the node's [`TargetFiles`]: the
//! complete side from `targets.complete`, the fragment side from `targets.hx`,
//! each with its own extension. Only the last segment's extension is applied.
//!
//! ```text
//! home ("")  →  blog ("/blog")  →  post ("my-post")
//!
//! generate_url(post, "https://example.com")  = https://example.com/blog/my-post.html
//! generate_hx_url(post, "")                  = /blog_hx/my-post.html
//! ```

use serde::Serialize;
use serde_json::{Value, json};
use std::rc::Rc;

/// The fixed set of page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageTemplate {
    Index,
    IndexHx,
    BlogIndex,
    BlogIndexHx,
    BlogArticle,
    BlogArticleHx,
}

impl PageTemplate {
    pub fn id(self) -> &'static str {
        match self {
            PageTemplate::Index => "INDEX",
            PageTemplate::IndexHx => "INDEX_HX",
            PageTemplate::BlogIndex => "BLOG_INDEX",
            PageTemplate::BlogIndexHx => "BLOG_INDEX_HX",
            PageTemplate::BlogArticle => "BLOG_ARTICLE",
            PageTemplate::BlogArticleHx => "BLOG_ARTICLE_HX",
        }
    }

    /// Fragment templates render the page body only, without a document shell.
    pub fn is_fragment(self) -> bool {
        matches!(
            self,
            PageTemplate::IndexHx | PageTemplate::BlogIndexHx | PageTemplate::BlogArticleHx
        )
    }
}

/// One output artifact: where it goes, what renders it, and its extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Logical destination name, e.g. `my-post` or `blog_hx`.
    pub destination: String,
    pub template: PageTemplate,
    /// Extension without the leading dot, e.g. `html`.
    pub extension: String,
}

impl Template {
    pub fn new(destination: impl Into<String>, template: PageTemplate, extension: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            template,
            extension: extension.into(),
        }
    }
}

/// The complete page and its htmx fragment, plus an optional JSON dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFiles {
    pub complete: Template,
    pub hx: Template,
    /// Site path of the machine-readable copy, e.g. `/blog/my-post.json`.
    pub llm: Option<String>,
}

/// One step in a page's ancestry.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    /// Relative slug, absolute URL, or empty for a transparent root.
    pub path: String,
    pub title: String,
    pub targets: Option<TargetFiles>,
    pub previous: Option<Rc<Breadcrumb>>,
    pub data: Option<Value>,
}

impl Breadcrumb {
    pub fn new(path: impl Into<String>, title: impl Into<String>, previous: Option<Rc<Breadcrumb>>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            targets: None,
            previous,
            data: None,
        }
    }

    pub fn with_targets(mut self, targets: TargetFiles) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// True when `path` is a full external URL.
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("http")
    }

    /// This node, then each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Breadcrumb> {
        std::iter::successors(Some(self), |crumb| crumb.previous.as_deref())
    }

    fn segment(&self) -> Option<Segment> {
        if self.is_absolute() {
            let part = SegmentPart {
                value: self.path.clone(),
                extension: String::new(),
            };
            return Some(Segment {
                complete: part.clone(),
                hx: part,
                absolute: true,
            });
        }

        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        let (complete, hx) = match &self.targets {
            Some(targets) => (
                SegmentPart::from_template(&targets.complete, trimmed),
                SegmentPart::from_template(&targets.hx, trimmed),
            ),
            None => (SegmentPart::bare(trimmed), SegmentPart::bare(trimmed)),
        };
        Some(Segment {
            complete,
            hx,
            absolute: false,
        })
    }
}

// Unlink ancestors one at a time so dropping a deep chain never recurses.
impl Drop for Breadcrumb {
    fn drop(&mut self) {
        let mut next = self.previous.take();
        while let Some(parent) = next {
            match Rc::try_unwrap(parent) {
                Ok(mut crumb) => next = crumb.previous.take(),
                Err(_) => break,
            }
        }
    }
}

/// Value and extension contributed to one side of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPart {
    pub value: String,
    pub extension: String,
}

impl SegmentPart {
    fn bare(value: &str) -> Self {
        Self {
            value: value.to_string(),
            extension: String::new(),
        }
    }

    fn from_template(template: &Template, fallback: &str) -> Self {
        let destination = template.destination.trim_matches('/');
        Self {
            value: (if destination.is_empty() { fallback } else { destination }).to_string(),
            extension: template.extension.trim_start_matches('.').to_string(),
        }
    }
}

/// One path segment, with the values for the complete and fragment URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub complete: SegmentPart,
    pub hx: SegmentPart,
    /// Set for a full external URL; only ever the first segment.
    pub absolute: bool,
}

/// Segments of the chain ending at `crumb`, root first.
pub fn segments_from_root(crumb: &Breadcrumb) -> Vec<Segment> {
    let mut segments = Vec::new();
    for node in crumb.ancestors() {
        if let Some(segment) = node.segment() {
            let absolute = segment.absolute;
            segments.push(segment);
            if absolute {
                break;
            }
        }
    }
    segments.reverse();
    segments
}

/// Canonical (complete page) URL for `crumb`.
///
/// With no segments the result is `base_url` itself, or `/` when it is empty.
pub fn generate_url(crumb: &Breadcrumb, base_url: &str) -> String {
    let segments = segments_from_root(crumb);
    if segments.is_empty() {
        return if base_url.is_empty() {
            "/".to_string()
        } else {
            base_url.to_string()
        };
    }
    compose(&segments, |s| &s.complete, base_url)
}

/// Fragment URL for `crumb`, built like [`generate_url`] from the hx side.
///
/// A chain with no segments falls back to the node's own hx target, so the
/// root page still has a fragment to fetch.
pub fn generate_hx_url(crumb: &Breadcrumb, base_url: &str) -> String {
    let segments = segments_from_root(crumb);
    if !segments.is_empty() {
        return compose(&segments, |s| &s.hx, base_url);
    }
    match &crumb.targets {
        Some(targets) => {
            let part = SegmentPart::from_template(&targets.hx, "");
            if part.value.is_empty() {
                return generate_url(crumb, base_url);
            }
            join_relative(base_url, &part.value, &part.extension)
        }
        None => generate_url(crumb, base_url),
    }
}

/// Root-relative complete path with no extension, e.g. `/blog/my-post`.
///
/// Output artifacts that sit beside the complete page (such as the JSON
/// dump) hang their own extension off this.
pub fn resource_path(crumb: &Breadcrumb) -> String {
    let segments = segments_from_root(crumb);
    let joined = segments
        .iter()
        .map(|s| s.complete.value.trim_end_matches('/'))
        .collect::<Vec<_>>()
        .join("/");
    match segments.first() {
        None => "/".to_string(),
        Some(first) if first.absolute => joined,
        Some(_) => format!("/{joined}"),
    }
}

fn compose(segments: &[Segment], side: fn(&Segment) -> &SegmentPart, base_url: &str) -> String {
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return "/".to_string(),
    };
    let extension = segments.last().map_or("", |s| side(s).extension.as_str());

    if first.absolute {
        let head = &side(first).value;
        if rest.is_empty() {
            return head.clone();
        }
        let tail = rest
            .iter()
            .map(|s| side(s).value.as_str())
            .collect::<Vec<_>>()
            .join("/");
        return with_extension(format!("{}/{tail}", head.trim_end_matches('/')), extension);
    }

    let path = segments
        .iter()
        .map(|s| side(s).value.as_str())
        .collect::<Vec<_>>()
        .join("/");
    join_relative(base_url, &path, extension)
}

fn join_relative(base_url: &str, path: &str, extension: &str) -> String {
    let url = if base_url.is_empty() {
        format!("/{path}")
    } else {
        format!("{}/{path}", base_url.trim_end_matches('/'))
    };
    with_extension(url, extension)
}

fn with_extension(url: String, extension: &str) -> String {
    if extension.is_empty() {
        url
    } else {
        format!("{url}.{extension}")
    }
}

/// schema.org `BreadcrumbList` for the chain ending at `crumb`.
///
/// One `ListItem` per node, root first, each pointing at that node's own
/// canonical URL. Nodes above an absolute node are resolved without
/// `base_url`. A chain with no segments yields an empty list.
pub fn to_json_ld(crumb: &Breadcrumb, base_url: &str) -> Value {
    let mut items = Vec::new();
    if !segments_from_root(crumb).is_empty() {
        let urls = node_urls(crumb, base_url);
        for (position, (node, url)) in urls.into_iter().enumerate() {
            items.push(json!({
                "@type": "ListItem",
                "position": position + 1,
                "name": node.title,
                "item": url,
            }));
        }
    }

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// Each node with its canonical URL, root first.
fn node_urls<'a>(crumb: &'a Breadcrumb, base_url: &str) -> Vec<(&'a Breadcrumb, String)> {
    let mut base = base_url;
    let mut urls = Vec::new();
    for node in crumb.ancestors() {
        urls.push((node, generate_url(node, base)));
        if node.is_absolute() {
            base = "";
        }
    }
    urls.reverse();
    urls
}

/// One rendered breadcrumb link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub name: String,
    /// Canonical URL with the site base.
    pub url: String,
    /// Root-relative URL for `hx-push-url`.
    pub push_url: String,
    /// Fragment URL for `hx-get`.
    pub get_resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbView {
    pub items: Vec<BreadcrumbItem>,
    /// Serialized [`to_json_ld`] output. Always includes the root.
    pub json_ld: String,
    pub show_root_item: bool,
    pub separator: String,
}

/// Template-facing breadcrumbs. `show_root_item = false` hides the root link
/// but leaves the JSON-LD untouched.
pub fn breadcrumb_view_model(
    crumb: &Breadcrumb,
    base_url: &str,
    show_root_item: bool,
    separator: &str,
) -> BreadcrumbView {
    let mut items: Vec<BreadcrumbItem> = node_urls(crumb, base_url)
        .into_iter()
        .map(|(node, url)| BreadcrumbItem {
            name: node.title.clone(),
            url,
            push_url: generate_url(node, ""),
            get_resource: generate_hx_url(node, ""),
        })
        .collect();
    if !show_root_item && !items.is_empty() {
        items.remove(0);
    }

    BreadcrumbView {
        items,
        json_ld: to_json_ld(crumb, base_url).to_string(),
        show_root_item,
        separator: separator.to_string(),
    }
}
