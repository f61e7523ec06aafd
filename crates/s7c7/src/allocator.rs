//! Slug allocation against the metadata store.
//!
//! Candidates are drawn at random and probed until one names a free path.
//! The loop is bounded, and a failed probe aborts allocation: a probe that
//! could not reach the store says nothing about whether the path is free.

use s7c7_core::Slug;
use s7c7_store::RemoteStore;

use crate::config::PublishConfig;
use crate::error::{PublishError, Result};

/// Outcome of probing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Nothing lives at the candidate's metadata path.
    Vacant,
    /// The path is taken; draw again.
    Collision,
}

/// Draws slugs until one is free on the metadata store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugAllocator {
    len: usize,
    max_attempts: u32,
}

impl SlugAllocator {
    pub const fn new(len: usize, max_attempts: u32) -> Self {
        Self { len, max_attempts }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(config.slug_len, config.slug_max_attempts)
    }

    /// Probe a single candidate.
    pub async fn probe<S: RemoteStore + ?Sized>(store: &S, slug: &Slug) -> Result<Probe> {
        if store.exists(&slug.metadata_path()).await? {
            Ok(Probe::Collision)
        } else {
            Ok(Probe::Vacant)
        }
    }

    /// Allocate a slug whose metadata path does not exist on `store`.
    ///
    /// # Errors
    /// - `Store` if a probe fails (no further candidates are tried).
    /// - `SlugSpaceExhausted` after `max_attempts` collisions.
    pub async fn allocate<S: RemoteStore + ?Sized>(&self, store: &S) -> Result<Slug> {
        for attempt in 1..=self.max_attempts {
            let slug = Slug::generate(self.len)?;
            match Self::probe(store, &slug).await? {
                Probe::Vacant => {
                    tracing::debug!(attempt, "allocated slug");
                    return Ok(slug);
                }
                Probe::Collision => {
                    tracing::debug!(attempt, path = %slug.metadata_path(), "slug collision");
                }
            }
        }

        Err(PublishError::SlugSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
