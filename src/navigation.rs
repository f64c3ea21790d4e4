//! Site navigation menu.
//!
//! The menu lists every configured section in config-file order. It is
//! rebuilt for each page so the page's own section can be flagged `active`.
//! Matching is by section key, so two sections that share a title never
//! both light up.
//!
//! Each entry links to the section's complete page (`{destination}.html`)
//! and names the fragment htmx swaps in (`{destination}_hx.html`). The home
//! section's destination is always `index`; other sections use their
//! `resource_path`.

use crate::config::SiteConfig;
use crate::site::HOME_SECTION;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationSection {
    /// Section key in the config.
    pub key: String,
    pub title: String,
    pub base_url: String,
    /// Root-relative complete page, e.g. `/blog.html`.
    pub path: String,
    /// Root-relative fragment, e.g. `/blog_hx.html`.
    pub hx_get: String,
    pub active: bool,
}

impl NavigationSection {
    /// Absolute link when the site has a base URL.
    pub fn href(&self) -> String {
        if self.base_url.is_empty() {
            self.path.clone()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationMenu {
    pub sections: Vec<NavigationSection>,
}

impl NavigationMenu {
    pub fn active(&self) -> Option<&NavigationSection> {
        self.sections.iter().find(|s| s.active)
    }
}

/// Output file stem for a section's index page.
///
/// The home section is always `index`, wherever its `resource_path` points.
/// Any other section uses its path trimmed of slashes; `None` means the path
/// names no file (`/` or empty).
pub fn section_destination(key: &str, resource_path: &str) -> Option<String> {
    if key == HOME_SECTION {
        return Some("index".to_string());
    }
    let trimmed = resource_path.trim_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Menu for a page belonging to section `requester`. An unknown key yields a
/// menu with nothing active.
pub fn create_navigation_menu(config: &SiteConfig, requester: &str) -> NavigationMenu {
    let sections = config
        .sections
        .iter()
        .map(|(key, section)| {
            // Sections without a file of their own link to the home page.
            let destination = section_destination(key, &section.resource_path)
                .unwrap_or_else(|| "index".to_string());
            let path = format!("/{destination}");
            NavigationSection {
                key: key.to_string(),
                title: section.title.clone(),
                base_url: config.base_url.clone(),
                hx_get: format!("{path}_hx.html"),
                path: format!("{path}.html"),
                active: key == requester,
            }
        })
        .collect();
    NavigationMenu { sections }
}
