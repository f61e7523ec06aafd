//! The Publisher: runs one file through the pipeline and onto the stores.
//!
//! Order of operations:
//!
//! 1. fresh password, pipeline transform
//! 2. original size decides inline vs. remote storage
//! 3. remote: blob written to the data store at its content address,
//!    skipped when already present
//! 4. metadata record composed
//! 5. slug allocated against the metadata store
//! 6. record written at the slug's path
//!
//! A failure at any step ends the publish. Nothing already written is rolled
//! back; a blob orphaned by a later failure is content-addressed and harmless.

use std::sync::Arc;

use s7c7_core::{BlobPath, MetadataRecord, Password, Slug, StorageDecision};
use s7c7_store::{RemoteStore, RemoteStoreExt, Upload};

use crate::allocator::SlugAllocator;
use crate::config::PublishConfig;
use crate::error::Result;
use crate::link::ShareLink;

/// Where a large blob went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPlacement {
    /// Content address on the data store.
    pub path: BlobPath,
    /// Public fetch URL written into the record.
    pub url: String,
    /// Whether this publish wrote it or found it already stored.
    pub upload: Upload,
}

/// What a successful publish wrote.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub link: ShareLink,
    pub slug: Slug,
    /// Path of the record on the metadata store.
    pub metadata_path: String,
    /// Public URL of the record.
    pub metadata_url: String,
    /// `None` when the blob was embedded in the record.
    pub blob: Option<BlobPlacement>,
    pub record: MetadataRecord,
}

/// Publishes files to a metadata store and a data store.
///
/// The two stores may be the same repository.
pub struct Publisher<M: RemoteStore, D: RemoteStore = M> {
    meta_store: Arc<M>,
    data_store: Arc<D>,
    config: PublishConfig,
    allocator: SlugAllocator,
}

impl<M: RemoteStore, D: RemoteStore> Publisher<M, D> {
    /// Create a publisher. Fails if `config` can never publish.
    pub fn new(meta_store: M, data_store: D, config: PublishConfig) -> Result<Self> {
        Self::from_shared(Arc::new(meta_store), Arc::new(data_store), config)
    }

    /// Create a publisher over stores the caller keeps handles to.
    pub fn from_shared(meta_store: Arc<M>, data_store: Arc<D>, config: PublishConfig) -> Result<Self> {
        config.validate()?;
        if !config.algorithms.encrypts() {
            tracing::warn!(
                spec = config.algorithms.as_str(),
                "pipeline has no encryption stage, content will be published readable"
            );
        }

        Ok(Self {
            meta_store,
            data_store,
            allocator: SlugAllocator::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub fn meta_store(&self) -> &M {
        &self.meta_store
    }

    pub fn data_store(&self) -> &D {
        &self.data_store
    }

    /// Publish `content` under `filename` with a freshly generated password.
    pub async fn publish(&self, filename: &str, content: &[u8]) -> Result<PublishReceipt> {
        self.publish_with_password(filename, content, Password::generate())
            .await
    }

    /// Publish with caller-supplied password material.
    ///
    /// The password must never be reused across publishes; this entry point
    /// exists for deterministic tests and golden vectors.
    pub async fn publish_with_password(
        &self,
        filename: &str,
        content: &[u8],
        password: Password,
    ) -> Result<PublishReceipt> {
        let blob = self.config.algorithms.transform(content, &password)?;

        let placement = if StorageDecision::is_inline(content.len()) {
            None
        } else {
            Some(self.store_blob(&blob).await?)
        };

        let storage = match &placement {
            Some(placement) => StorageDecision::Remote(&placement.url),
            None => StorageDecision::Inline(&blob),
        };
        let record =
            MetadataRecord::compose(content, filename, self.config.algorithms.as_str(), storage);
        tracing::info!(size = record.size, inline = placement.is_none(), "generated metadata");

        let slug = self.allocator.allocate(&*self.meta_store).await?;
        let metadata_path = slug.metadata_path();
        self.meta_store
            .create(&metadata_path, &record.to_json()?)
            .await?;

        let metadata_url = format!("{}/{}", self.config.meta_url, metadata_path);
        tracing::info!(url = %metadata_url, "published metadata");

        Ok(PublishReceipt {
            link: ShareLink::new(&self.config.download_url, slug.clone(), &password),
            slug,
            metadata_path,
            metadata_url,
            blob: placement,
            record,
        })
    }

    async fn store_blob(&self, blob: &[u8]) -> Result<BlobPlacement> {
        let path = BlobPath::of(blob);
        let upload = self.data_store.create_if_absent(path.as_str(), blob).await?;

        match upload {
            Upload::Created => tracing::info!(path = %path, bytes = blob.len(), "uploaded blob"),
            Upload::AlreadyExists => tracing::info!(path = %path, "blob already stored"),
        }

        Ok(BlobPlacement {
            url: format!("{}/{}", self.config.data_url, path),
            path,
            upload,
        })
    }
}
