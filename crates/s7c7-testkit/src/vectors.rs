//! Golden test vectors for deterministic verification.
//!
//! Recipients written in other languages must agree with these: the digests
//! in the `hash` field, the blob content address, and the base64 forms used
//! for filenames and the `encode` stage.

use s7c7_core::{sha256_hex, sha512_hex, BlobPath, MetadataRecord, Stage, StorageDecision};

use crate::fixtures::fixed_password;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input bytes.
    pub input: &'static [u8],
    /// Expected SHA-256 (hex).
    pub sha256: &'static str,
    /// Expected SHA-512 (hex).
    pub sha512: &'static str,
    /// Expected content address when `input` is the blob.
    pub blob_path: &'static str,
    /// Expected output of the `encode` stage.
    pub encoded: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty input",
            input: b"",
            sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sha512: "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                     47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
            blob_path: "cf/83e1357e/efb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                        47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e.bin",
            encoded: "",
        },
        GoldenVector {
            name: "abc",
            input: b"abc",
            sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            sha512: "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                     2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
            blob_path: "dd/af35a193/617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                        2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f.bin",
            encoded: "YWJj",
        },
        GoldenVector {
            name: "filename hello.txt",
            input: b"hello.txt",
            sha256: "",
            sha512: "",
            blob_path: "",
            encoded: "aGVsbG8udHh0",
        },
    ]
}

/// Check one vector. Empty expectations are skipped.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let check = |what: &str, expected: &str, actual: String| {
        if expected.is_empty() || expected == actual {
            Ok(())
        } else {
            Err(format!("{}: {what} expected {expected}, got {actual}", vector.name))
        }
    };

    check("sha256", vector.sha256, sha256_hex(vector.input))?;
    check("sha512", vector.sha512, sha512_hex(vector.input))?;
    check("blob path", vector.blob_path, BlobPath::of(vector.input).to_string())?;

    let encoded = Stage::Encode
        .apply(vector.input, &fixed_password())
        .map_err(|e| e.to_string())?;
    check("encoded", vector.encoded, String::from_utf8_lossy(&encoded).into_owned())?;

    // the record's hash and filename fields use the same primitives
    if let Ok(name) = std::str::from_utf8(vector.input) {
        let record = MetadataRecord::compose(vector.input, name, "", StorageDecision::Inline(b""));
        check("record sha256", vector.sha256, record.hash.sha256)?;
        check("record filename", vector.encoded, record.filename)?;
    }
    Ok(())
}

/// Check every vector, collecting failures.
pub fn verify_all_vectors() -> Vec<String> {
    all_vectors()
        .iter()
        .filter_map(|v| verify_vector(v).err())
        .collect()
}
