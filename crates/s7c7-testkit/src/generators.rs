//! Proptest generators for property-based testing.

use proptest::prelude::*;

use s7c7_core::{AlgorithmSpec, Password, Stage, PASSWORD_LEN};

/// Generate random password material.
pub fn password() -> impl Strategy<Value = Password> {
    prop::collection::vec(any::<u8>(), PASSWORD_LEN).prop_map(|bytes| {
        let mut arr = [0u8; PASSWORD_LEN];
        arr.copy_from_slice(&bytes);
        Password::from_bytes(arr)
    })
}

/// Generate content bytes of at most `max_len`.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a single stage.
pub fn stage() -> impl Strategy<Value = Stage> {
    prop_oneof![Just(Stage::Compress), Just(Stage::Encrypt), Just(Stage::Encode)]
}

/// Generate a stage name, historical or descriptive.
pub fn stage_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("deflate"),
        Just("compress"),
        Just("aes"),
        Just("encrypt"),
        Just("base64"),
        Just("encode"),
    ]
}

/// Generate a pipeline of up to `max_stages` known stages.
pub fn algorithm_spec(max_stages: usize) -> impl Strategy<Value = AlgorithmSpec> {
    prop::collection::vec(stage_name(), 1..=max_stages)
        .prop_map(|names| AlgorithmSpec::parse(&names.join("+")))
}

/// Generate a filename, including non-ASCII ones.
pub fn filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-\\. \u{4e00}-\u{4e20}]{1,40}".prop_map(String::from)
}
