//! # hx-press
//!
//! A small static site generator for a personal blog. A JSON config names the
//! site and its sections; Markdown files with YAML front matter become posts.
//! Every page is written twice, as a complete document and as an htmx
//! fragment, so the site navigates like a single-page app while staying plain
//! HTML on disk.
//!
//! # Architecture: Load → Assemble → Render
//!
//! ```text
//! 1. Load      site.json  →  SiteConfig   (config + section files in memory)
//! 2. Assemble  SiteConfig →  Website      (validated page tree, URLs, metadata)
//! 3. Render    Website    →  website/     (view models → HTML + JSON)
//! ```
//!
//! All validation happens in the first two stages. A config that loads and a
//! site that assembles will render; a single bad post aborts the build before
//! anything is written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `site.json` parsing and validation; eager loading of section sources |
//! | [`files`] | Reading content files and writing output pages |
//! | [`frontmatter`] | YAML front matter splitting, timestamp typing, field validation |
//! | [`naming`] | Slugs from file names and free text |
//! | [`breadcrumbs`] | Breadcrumb chains: URL, fragment URL, and JSON-LD generation |
//! | [`navigation`] | Per-page navigation menu with the active section flagged |
//! | [`opengraph`] | Open Graph records and their `<meta>` tag lists |
//! | [`site`] | Page tree assembly: home, blog index, and posts |
//! | [`view`] | Flattening the page tree into serializable view models |
//! | [`generate`] | Maud templates and output writing |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Complete Pages and Fragments
//!
//! Each page has a complete template and an `_HX` fragment template. Links
//! carry `href` and `hx-push-url` pointing at the complete page and `hx-get`
//! pointing at the fragment, so the same link works with JavaScript disabled.
//! Fragments live in a parallel `*_hx` path (`/blog_hx/my-post.html`) rather
//! than a query string so the output can be served by any static file server.
//!
//! ## Breadcrumbs as the URL Source
//!
//! Pages never build URLs by string concatenation. Each page owns a
//! [`breadcrumbs::Breadcrumb`] whose ancestor chain produces its canonical
//! URL, its fragment URL, and its `BreadcrumbList` JSON-LD. Changing a
//! section's path moves every page below it.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed templates are build errors and all
//! interpolation is auto-escaped.

pub mod breadcrumbs;
pub mod config;
pub mod files;
pub mod frontmatter;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod navigation;
pub mod opengraph;
pub mod output;
pub mod site;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
