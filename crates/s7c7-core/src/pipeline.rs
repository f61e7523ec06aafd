//! The cipher pipeline: an ordered chain of reversible byte transforms.
//!
//! A pipeline is described by a `+`-separated list of stage names, e.g.
//! `deflate+aes+base64`. The text is parsed once into an [`AlgorithmSpec`];
//! the original text is kept verbatim because it is written into the
//! metadata record's `alg` field and recipients replay it.
//!
//! Stage registry:
//!
//! | Stage      | Names               | Transform                                   |
//! |------------|---------------------|---------------------------------------------|
//! | `Compress` | `compress`, `deflate` | zlib-wrapped DEFLATE, default level       |
//! | `Encrypt`  | `encrypt`, `aes`    | XSalsa20-Poly1305, output `nonce‖tag‖ct`    |
//! | `Encode`   | `encode`, `base64`  | standard base64 with padding                |
//!
//! Unknown names are skipped with a warning and the remaining stages still
//! run. This keeps older configurations working but means a typo can drop a
//! stage (including encryption) from the effective pipeline; callers can
//! inspect [`AlgorithmSpec::skipped`] to refuse such specs.
//!
//! The inverse is each stage undone in reverse order: base64-decode, split
//! the leading 24-byte nonce and open the secretbox, zlib-inflate.

use std::fmt;
use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::password::{Password, NONCE_LEN};

/// Pipeline used when no configuration overrides it.
pub const DEFAULT_ALGORITHMS: &str = "deflate+aes+base64";

/// A single pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Compress,
    Encrypt,
    Encode,
}

impl Stage {
    /// Stage names are split on this character.
    pub const SEPARATOR: char = '+';

    /// Look up a stage by name. Both the descriptive and the historical
    /// names are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "compress" | "deflate" => Some(Stage::Compress),
            "encrypt" | "aes" => Some(Stage::Encrypt),
            "encode" | "base64" => Some(Stage::Encode),
            _ => None,
        }
    }

    /// Descriptive name of the stage.
    pub const fn name(&self) -> &'static str {
        match self {
            Stage::Compress => "compress",
            Stage::Encrypt => "encrypt",
            Stage::Encode => "encode",
        }
    }

    /// Run this stage over `input`.
    pub fn apply(self, input: &[u8], password: &Password) -> Result<Vec<u8>> {
        match self {
            Stage::Compress => compress(input),
            Stage::Encrypt => encrypt(input, password),
            Stage::Encode => Ok(encode(input)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed pipeline description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AlgorithmSpec {
    text: String,
    stages: Vec<Stage>,
    skipped: Vec<String>,
}

impl AlgorithmSpec {
    /// Parse a `+`-separated stage list.
    ///
    /// Never fails: unrecognized names are recorded in [`skipped`](Self::skipped)
    /// and reported once here rather than on every transform.
    pub fn parse(text: &str) -> Self {
        let mut stages = Vec::new();
        let mut skipped = Vec::new();

        for token in text.split(Stage::SEPARATOR) {
            match Stage::from_name(token) {
                Some(stage) => stages.push(stage),
                None => {
                    tracing::warn!(stage = token, spec = text, "unsupported pipeline stage, skipping");
                    skipped.push(token.to_string());
                }
            }
        }

        Self {
            text: text.to_string(),
            stages,
            skipped,
        }
    }

    /// The spec text exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Recognized stages, in application order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Tokens that did not name a stage.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Whether the effective pipeline encrypts at all.
    pub fn encrypts(&self) -> bool {
        self.stages.contains(&Stage::Encrypt)
    }

    /// Apply every stage in order, each consuming the previous output.
    pub fn transform(&self, content: &[u8], password: &Password) -> Result<Vec<u8>> {
        let mut data = content.to_vec();
        for stage in &self.stages {
            data = stage.apply(&data, password)?;
        }
        Ok(data)
    }
}

impl Default for AlgorithmSpec {
    fn default() -> Self {
        Self::parse(DEFAULT_ALGORITHMS)
    }
}

impl fmt::Display for AlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for AlgorithmSpec {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for AlgorithmSpec {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<AlgorithmSpec> for String {
    fn from(spec: AlgorithmSpec) -> Self {
        spec.text
    }
}

/// zlib-wrapped DEFLATE at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CoreError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CoreError::Compression(e.to_string()))
}

/// Seal `data` with XSalsa20-Poly1305 and prepend the nonce.
///
/// Output layout: `nonce (24) || tag (16) || ciphertext`.
pub fn encrypt(data: &[u8], password: &Password) -> Result<Vec<u8>> {
    let cipher = XSalsa20Poly1305::new_from_slice(password.key())
        .map_err(|e| CoreError::Encryption(e.to_string()))?;
    let sealed = cipher
        .encrypt(GenericArray::from_slice(password.nonce()), data)
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(password.nonce());
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Standard-alphabet base64 with padding.
pub fn encode(data: &[u8]) -> Vec<u8> {
    STANDARD.encode(data).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::PASSWORD_LEN;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn fixed_password() -> Password {
        let mut bytes = [0u8; PASSWORD_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(7);
        }
        Password::from_bytes(bytes)
    }

    #[test]
    fn test_parse_default() {
        let spec = AlgorithmSpec::default();
        assert_eq!(spec.as_str(), "deflate+aes+base64");
        assert_eq!(spec.stages(), &[Stage::Compress, Stage::Encrypt, Stage::Encode]);
        assert!(spec.skipped().is_empty());
        assert!(spec.encrypts());
    }

    #[test]
    fn test_aliases_parse_identically() {
        let historical = AlgorithmSpec::parse("deflate+aes+base64");
        let descriptive = AlgorithmSpec::parse("compress+encrypt+encode");
        assert_eq!(historical.stages(), descriptive.stages());
        // the text is kept verbatim
        assert_ne!(historical.as_str(), descriptive.as_str());
    }

    #[test]
    fn test_unknown_stage_is_skipped() {
        let spec = AlgorithmSpec::parse("deflate+rot13+base64");
        assert_eq!(spec.stages(), &[Stage::Compress, Stage::Encode]);
        assert_eq!(spec.skipped(), &["rot13".to_string()]);
        assert!(!spec.encrypts());
        assert_eq!(spec.as_str(), "deflate+rot13+base64");
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        let spec = AlgorithmSpec::parse("aes++base64");
        assert_eq!(spec.stages(), &[Stage::Encrypt, Stage::Encode]);
        assert_eq!(spec.skipped(), &[String::new()]);
    }

    #[test]
    fn test_stage_order_is_respected() {
        let password = fixed_password();
        let a = AlgorithmSpec::parse("base64+deflate")
            .transform(b"order matters", &password)
            .unwrap();
        let b = AlgorithmSpec::parse("deflate+base64")
            .transform(b"order matters", &password)
            .unwrap();
        assert_ne!(a, b);
        // base64 last means ascii output
        assert!(b.is_ascii());
    }

    #[test]
    fn test_compress_is_zlib() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let compressed = compress(data).unwrap();
        // zlib header, default level
        assert_eq!(compressed[0], 0x78);
        let mut out = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_encrypt_layout() {
        let password = fixed_password();
        let sealed = encrypt(b"secret", &password).unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 16 + 6);
        assert_eq!(&sealed[..NONCE_LEN], password.nonce());

        let cipher = XSalsa20Poly1305::new_from_slice(password.key()).unwrap();
        let opened = cipher
            .decrypt(GenericArray::from_slice(&sealed[..NONCE_LEN]), &sealed[NONCE_LEN..])
            .unwrap();
        assert_eq!(opened, b"secret");
    }

    #[test]
    fn test_encrypt_matches_nacl_secretbox_vector() {
        // "Cryptography in NaCl" secretbox test vector
        let key = "1b27556473e985d462cd51197a9a46c76009549eac6474f206c4ee0844f68389";
        let nonce = "69696ee955b62b73cd62bda875fc73d68219e0036b7a0b37";
        let message = hex::decode(concat!(
            "be075fc53c81f2d5cf141316ebeb0c7b5228c52a4c62cbd44b66849b64244ffc",
            "e5ecbaaf33bd751a1ac728d45e6c61296cdc3c01233561f41db66cce314adb31",
            "0e3be8250c46f06dceea3a7fa1348057e2f6556ad6b1318a024a838f21af1fde",
            "048977eb48f59ffd4924ca1c60902e52f0a089bc76897040e082f937763848645e0705",
        ))
        .unwrap();

        let material: [u8; PASSWORD_LEN] = hex::decode(format!("{nonce}{key}"))
            .unwrap()
            .try_into()
            .unwrap();
        let password = Password::from_bytes(material);

        let sealed = encrypt(&message, &password).unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 16 + message.len());
        assert_eq!(hex::encode(&sealed[..NONCE_LEN]), nonce);
        assert_eq!(
            hex::encode(&sealed[NONCE_LEN..NONCE_LEN + 16]),
            "f3ffc7703f9400e52a7dfb4b3d3305d9"
        );
        assert_eq!(
            hex::encode(&sealed[NONCE_LEN + 16..NONCE_LEN + 32]),
            "8e993b9f48681273c29650ba32fc76ce"
        );
    }

    #[test]
    fn test_encrypt_detects_tampering() {
        let password = fixed_password();
        let mut sealed = encrypt(b"secret", &password).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;

        let cipher = XSalsa20Poly1305::new_from_slice(password.key()).unwrap();
        assert!(cipher
            .decrypt(GenericArray::from_slice(&sealed[..NONCE_LEN]), &sealed[NONCE_LEN..])
            .is_err());
    }

    #[test]
    fn test_encode_known_answer() {
        assert_eq!(encode(b"hello"), b"aGVsbG8=");
        assert_eq!(encode(b""), b"");
    }

    #[test]
    fn test_transform_is_deterministic_for_fixed_password() {
        let password = fixed_password();
        let spec = AlgorithmSpec::default();
        let a = spec.transform(b"same input", &password).unwrap();
        let b = spec.transform(b"same input", &password).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_spec_is_identity_with_one_skip() {
        let spec = AlgorithmSpec::parse("");
        assert!(spec.stages().is_empty());
        assert_eq!(spec.skipped().len(), 1);
        assert_eq!(spec.transform(b"\x00\xff", &fixed_password()).unwrap(), b"\x00\xff");
    }

    #[test]
    fn test_serde_uses_plain_text() {
        let spec = AlgorithmSpec::parse("aes+base64");
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, "\"aes+base64\"");
        let back: AlgorithmSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
