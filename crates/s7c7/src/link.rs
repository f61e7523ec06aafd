//! Share links: `<download_url>/<slug>#<password>`.
//!
//! The slug locates the metadata record; the password rides in the fragment,
//! which browsers do not send to the server hosting the download page.

use std::fmt;

use s7c7_core::{Password, Slug};

use crate::error::{PublishError, Result};

/// The recoverable result of a publish.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareLink {
    download_url: String,
    slug: Slug,
    fragment: String,
}

impl ShareLink {
    pub fn new(download_url: &str, slug: Slug, password: &Password) -> Self {
        Self {
            download_url: download_url.trim_end_matches('/').to_string(),
            slug,
            fragment: password.to_link_text(),
        }
    }

    /// Split a link back into its parts.
    pub fn parse(link: &str) -> Result<Self> {
        let (locator, fragment) = link
            .split_once('#')
            .ok_or_else(|| PublishError::InvalidLink("missing #password fragment".into()))?;
        let (download_url, slug) = locator
            .rsplit_once('/')
            .ok_or_else(|| PublishError::InvalidLink("missing /slug".into()))?;

        let slug = Slug::parse(slug)?;
        // validate now so a malformed link fails here, not at decrypt time
        Password::from_link_text(fragment)?;

        Ok(Self {
            download_url: download_url.to_string(),
            slug,
            fragment: fragment.to_string(),
        })
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Decode the password carried in the fragment.
    pub fn password(&self) -> Result<Password> {
        Ok(Password::from_link_text(&self.fragment)?)
    }

    /// Where a recipient fetches the metadata record.
    pub fn metadata_url(&self, meta_url: &str) -> String {
        format!("{}/{}", meta_url.trim_end_matches('/'), self.slug.metadata_path())
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.download_url, self.slug, self.fragment)
    }
}

impl fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareLink({}/{}#<redacted>)", self.download_url, self.slug)
    }
}
