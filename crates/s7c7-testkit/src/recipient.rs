//! The recipient side: undo a pipeline and resolve a record's data section.
//!
//! Stages are undone in reverse order:
//!
//! - `Encode`: standard base64 decode
//! - `Encrypt`: first 24 bytes are the nonce, the rest is the secretbox
//! - `Compress`: zlib inflate

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use flate2::read::ZlibDecoder;
use thiserror::Error;

use s7c7_core::{AlgorithmSpec, CoreError, DataSection, MetadataRecord, Password, Stage, NONCE_LEN};

/// Failure to recover content from a record.
#[derive(Debug, Error)]
pub enum RecipientError {
    /// A stage could not be undone.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The fetch reference did not resolve.
    #[error("fetch reference did not resolve: {0}")]
    Missing(String),

    /// Content decoded but does not match the record's digests.
    #[error("content does not match the record's size or digests")]
    IntegrityMismatch,
}

/// Undo one stage.
pub fn undo_stage(stage: Stage, input: &[u8], password: &Password) -> Result<Vec<u8>, CoreError> {
    match stage {
        Stage::Encode => STANDARD
            .decode(input)
            .map_err(|e| CoreError::InvalidBase64(e.to_string())),
        Stage::Encrypt => {
            if input.len() < NONCE_LEN {
                return Err(CoreError::Decryption("blob shorter than nonce".into()));
            }
            let (nonce, sealed) = input.split_at(NONCE_LEN);
            let cipher = XSalsa20Poly1305::new_from_slice(password.key())
                .map_err(|e| CoreError::Decryption(e.to_string()))?;
            cipher
                .decrypt(GenericArray::from_slice(nonce), sealed)
                .map_err(|e| CoreError::Decryption(e.to_string()))
        }
        Stage::Compress => {
            let mut out = Vec::new();
            ZlibDecoder::new(input)
                .read_to_end(&mut out)
                .map_err(|e| CoreError::Decompression(e.to_string()))?;
            Ok(out)
        }
    }
}

/// Recover original content from a blob.
pub fn open_blob(blob: &[u8], password: &Password, spec: &AlgorithmSpec) -> Result<Vec<u8>, CoreError> {
    let mut data = blob.to_vec();
    for stage in spec.stages().iter().rev() {
        data = undo_stage(*stage, &data, password)?;
    }
    Ok(data)
}

/// Recover and verify the content a record describes.
///
/// `fetch` resolves a `data.fetch` URL to bytes.
pub fn open_record<F>(record: &MetadataRecord, password: &Password, fetch: F) -> Result<Vec<u8>, RecipientError>
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    let blob = match &record.data {
        DataSection::Fetch(url) => fetch(url).ok_or_else(|| RecipientError::Missing(url.clone()))?,
        inline => inline.inline_bytes()?.unwrap_or_default(),
    };

    let content = open_blob(&blob, password, &AlgorithmSpec::parse(&record.alg))?;
    if content.len() as u64 != record.size || !record.hash.matches(&content) {
        return Err(RecipientError::IntegrityMismatch);
    }
    Ok(content)
}
